//! # Series
//!
//! Core value types shared across the trendline pipeline: the caller-facing
//! [`Observation`], the day-indexed [`DaySeries`] produced by
//! [`crate::date_index`], and [`LineEq`], the `y = m*x + c` line equation
//! produced by [`crate::least_squares`] and consumed by
//! [`crate::reconstruct`].
//!
//! ## Structure
//! Per the re-architecture guidance in the design notes, a series is never
//! indexed by a mix of integer and date types: [`DaySeries`] keeps parallel
//! `dates` and `day_offsets` vectors alongside `values`, and nothing in this
//! module overloads `NaN` as a "missing" sentinel — missing values are
//! represented with `Option<f64>`.

use chrono::NaiveDate;

/// A single calendar-dated observation of the index value for one pixel.
///
/// # Invariant
/// Per pixel, no two `Observation`s may share the same `date`; this is
/// enforced by [`crate::date_index::DateIndex::build`], not by this type.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Observation {
    /// Calendar date in `YYYY-MM-DD` form.
    pub date: String,
    /// The observed index value.
    pub val: f64,
}

impl Observation {
    /// Builds an observation from a date string and a value.
    #[must_use]
    pub fn new(date: impl Into<String>, val: f64) -> Self {
        Self {
            date: date.into(),
            val,
        }
    }
}

/// A time series indexed by non-negative day offsets from the first
/// observation, with an optional value per point (`None` once the
/// [`crate::despike::Despiker`] has flagged a point as a spike).
///
/// # Invariant
/// `day_offsets` is strictly increasing and `dates.len() == day_offsets.len()
/// == values.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySeries {
    /// Original calendar dates, one per point, in ISO form.
    pub dates: Vec<NaiveDate>,
    /// Elapsed days since `dates[0]`, strictly increasing.
    pub day_offsets: Vec<i64>,
    /// The observed value, or `None` if this point has been despiked out.
    pub values: Vec<Option<f64>>,
}

impl DaySeries {
    /// Number of points in the series (spikes included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.day_offsets.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.day_offsets.is_empty()
    }

    /// Number of points whose value has not been despiked out.
    #[must_use]
    pub fn non_spike_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// A line `y = slope * x + intercept`, interpreted over the day-offset
/// x-axis.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineEq {
    /// Slope of the line (change in value per day).
    pub slope: f64,
    /// Intercept of the line at `x = 0`.
    pub intercept: f64,
}

impl LineEq {
    /// Builds a line equation from its slope and intercept.
    #[must_use]
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Evaluates the line at a given day offset.
    #[inline]
    #[must_use]
    pub fn eval(&self, x: i64) -> f64 {
        self.slope * (x as f64) + self.intercept
    }
}
