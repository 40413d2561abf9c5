//! # Reconstructor
//!
//! Given a despiked [`DaySeries`] and the vertex indices chosen by
//! [`crate::segmenter::Segmenter`], derives the per-point fitted value,
//! right-side equation, and fit equation that make up a [`TrendlinePoint`].
//!
//! ---

use crate::error::Result;
use crate::least_squares::LeastSquaresFitter;
use crate::series::{DaySeries, LineEq};
use crate::trendline::TrendlinePoint;

/// Stateless per-point reconstruction pass.
pub struct Reconstructor;

impl Reconstructor {
    /// Reconstructs one [`TrendlinePoint`] per original observation.
    ///
    /// # Arguments
    ///
    /// * `raw` - The original series, before despiking (all values `Some`).
    /// * `despiked` - The same series with spikes replaced by `None`.
    /// * `vertices` - Sorted, deduplicated vertex indices from the segmenter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AnalysisError::EmptySegment`] if a segment
    /// between two chosen vertices has no non-spike points — this should
    /// not happen for vertices produced by the segmenter, since it never
    /// selects an all-missing segment when a cheaper alternative exists.
    ///
    /// # Panics
    ///
    /// Panics if `vertices` is empty, not strictly increasing, or does not
    /// span `[0, raw.len() - 1]` — all programmer/caller invariants.
    pub fn reconstruct(
        raw: &DaySeries,
        despiked: &DaySeries,
        vertices: &[usize],
    ) -> Result<Vec<TrendlinePoint>> {
        crate::validation::assert_non_empty("vertices", vertices);
        crate::validation::assert_strictly_increasing("vertices", vertices);
        crate::validation::assert_in_bounds("vertices[0]", vertices[0], raw.len());
        if vertices[0] != 0 || *vertices.last().expect("non-empty") != raw.len() - 1 {
            panic!("vertices must span the full series, from 0 to len - 1");
        }

        let segments = Self::fit_segments(despiked, vertices)?;
        let last_pos = vertices.len() - 1;

        let mut points = Vec::with_capacity(raw.len());
        for i in 0..raw.len() {
            let pos = vertices.partition_point(|&v| v <= i) - 1;
            let is_vertex = vertices[pos] == i;

            let right_segment_idx = if pos == last_pos { pos - 1 } else { pos };
            let eqn_right = segments[right_segment_idx];

            let val_raw = raw.values[i].expect("raw series must have no missing values");
            let x = raw.day_offsets[i];

            let (eqn_fit, val_fit) = if is_vertex && pos > 0 && pos < last_pos {
                let left = segments[pos - 1];
                let right = segments[pos];
                let left_eval = left.eval(x);
                let right_eval = right.eval(x);
                if (val_raw - left_eval).abs() < (val_raw - right_eval).abs() {
                    (left, left_eval)
                } else {
                    (right, right_eval)
                }
            } else {
                (eqn_right, eqn_right.eval(x))
            };

            points.push(TrendlinePoint {
                val_raw,
                val_fit,
                eqn_fit,
                eqn_right,
                index_date: raw.dates[i].to_string(),
                index_day: x,
                spike: despiked.values[i].is_none(),
                vertex: is_vertex,
            });
        }

        Ok(points)
    }

    /// Fits each segment `[vertices[m], vertices[m + 1]]` on the despiked
    /// series, returning one [`LineEq`] per segment.
    fn fit_segments(despiked: &DaySeries, vertices: &[usize]) -> Result<Vec<LineEq>> {
        vertices
            .windows(2)
            .map(|pair| {
                let (start, end) = (pair[0], pair[1]);
                let xs = &despiked.day_offsets[start..=end];
                let ys = &despiked.values[start..=end];
                LeastSquaresFitter::fit(xs, ys).map(|(eqn, _residual)| eqn)
            })
            .collect()
    }
}
