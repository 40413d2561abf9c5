//! # Trendline
//!
//! The immutable output record of the numeric core: a [`Trendline`] is an
//! ordered sequence of [`TrendlinePoint`]s covering every original
//! observation, spikes included.
//!
//! ---

use crate::series::LineEq;

/// Per-observation record describing the fitted trendline at one point.
///
/// See the field docs for the invariants [`crate::reconstruct::Reconstructor`]
/// guarantees when building these.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrendlinePoint {
    /// Original, unfiltered observed value.
    pub val_raw: f64,
    /// Reconstructed value on the chosen segment.
    pub val_fit: f64,
    /// The [`LineEq`] used to produce `val_fit`.
    pub eqn_fit: LineEq,
    /// The [`LineEq`] of the segment extending to the right of this point.
    pub eqn_right: LineEq,
    /// Original calendar date, ISO `YYYY-MM-DD` form.
    pub index_date: String,
    /// Day offset from the first observation.
    pub index_day: i64,
    /// `true` iff the despiker flagged this point as a transient outlier.
    pub spike: bool,
    /// `true` iff this point is a segment endpoint.
    pub vertex: bool,
}

/// An ordered, immutable sequence of [`TrendlinePoint`]s, one per original
/// observation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trendline {
    points: Vec<TrendlinePoint>,
}

impl Trendline {
    /// Wraps a caller-supplied point list into a `Trendline`.
    #[must_use]
    pub(crate) fn new(points: Vec<TrendlinePoint>) -> Self {
        Self { points }
    }

    /// The underlying points, one per original observation.
    #[must_use]
    pub fn points(&self) -> &[TrendlinePoint] {
        &self.points
    }

    /// Number of points (equal to the original observation count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether this trendline has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over just the vertex points, in increasing day-offset order.
    pub fn vertices(&self) -> impl Iterator<Item = &TrendlinePoint> {
        self.points.iter().filter(|p| p.vertex)
    }
}

/// Stateless composer that wraps reconstructed points into a [`Trendline`].
pub struct TrendlineAssembler;

impl TrendlineAssembler {
    /// Assembles a [`Trendline`] from the per-point records produced by
    /// [`crate::reconstruct::Reconstructor::reconstruct`].
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty, or if the vertex subsequence is not
    /// strictly increasing in `index_day` — both indicate a bug in the
    /// reconstructor rather than bad caller input.
    #[must_use]
    pub fn assemble(points: Vec<TrendlinePoint>) -> Trendline {
        crate::validation::assert_non_empty("trendline points", &points);

        let vertex_days: Vec<i64> = points.iter().filter(|p| p.vertex).map(|p| p.index_day).collect();
        for pair in vertex_days.windows(2) {
            if pair[1] <= pair[0] {
                panic!("vertex day offsets must be strictly increasing, found {pair:?}");
            }
        }

        Trendline::new(points)
    }
}
