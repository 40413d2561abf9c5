//! # Date Index
//!
//! Converts a pixel's observation list into a [`crate::series::DaySeries`]:
//! calendar dates become non-negative integer day offsets from the first
//! observation.
//!
//! ## When to Use
//! This is always the first stage of the pipeline ([`build`]); every other
//! component operates on day offsets, never on calendar dates directly.
//!
//! ## API Details
//! Input dates must parse as `YYYY-MM-DD`; any malformed string fails with
//! [`AnalysisError::InvalidDate`]. Callers are responsible for sorting
//! observations by date first — `build` does not sort, it only validates
//! that the result is strictly increasing.
//!
//! ---

use chrono::NaiveDate;

use crate::error::{AnalysisError, Result};
use crate::series::{DaySeries, Observation};

/// Stateless converter from calendar-dated observations to a
/// day-offset-indexed [`DaySeries`].
pub struct DateIndex;

impl DateIndex {
    /// Builds a [`DaySeries`] from a caller-ordered slice of observations.
    ///
    /// # Arguments
    ///
    /// * `observations` - Pixel observations, already sorted by date.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidDate`] if any `date` field does not
    /// parse as `YYYY-MM-DD`.
    ///
    /// # Panics
    ///
    /// Panics (an internal invariant, not a caller-data error) if the
    /// resulting day offsets are not strictly increasing — this means the
    /// caller passed unsorted or duplicate-dated observations, which is a
    /// contract violation documented on [`Observation`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use landtrendr_core::date_index::DateIndex;
    /// use landtrendr_core::series::Observation;
    ///
    /// let obs = vec![
    ///     Observation::new("2020-01-01", 1.0),
    ///     Observation::new("2020-01-03", 2.0),
    /// ];
    /// let series = DateIndex::build(&obs).expect("valid dates");
    /// assert_eq!(series.day_offsets, vec![0, 2]);
    /// ```
    pub fn build(observations: &[Observation]) -> Result<DaySeries> {
        let mut dates = Vec::with_capacity(observations.len());
        for obs in observations {
            dates.push(Self::parse_date(&obs.date)?);
        }

        let first = dates.first().copied();
        let day_offsets: Vec<i64> = match first {
            Some(first) => dates.iter().map(|d| (*d - first).num_days()).collect(),
            None => Vec::new(),
        };

        crate::validation::assert_strictly_increasing("day_offsets", &to_usize_for_check(&day_offsets));

        let values = observations.iter().map(|obs| Some(obs.val)).collect();

        Ok(DaySeries {
            dates,
            day_offsets,
            values,
        })
    }

    fn parse_date(date: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|err| AnalysisError::InvalidDate {
            date: date.to_string(),
            reason: err.to_string(),
        })
    }
}

/// `assert_strictly_increasing` takes `&[usize]`; day offsets are
/// non-negative by construction (first date is never after itself), so this
/// cast is lossless for any real calendar span.
fn to_usize_for_check(day_offsets: &[i64]) -> Vec<usize> {
    day_offsets.iter().map(|&d| d as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_day_offsets_from_sorted_dates() {
        let obs = vec![
            Observation::new("2010-12-31", 1.0),
            Observation::new("2011-12-31", 2.0),
            Observation::new("2012-12-31", 3.0),
        ];
        let series = DateIndex::build(&obs).expect("valid dates");
        assert_eq!(series.day_offsets, vec![0, 365, 731]);
        assert_eq!(series.values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn rejects_malformed_date() {
        let obs = vec![Observation::new("not-a-date", 1.0)];
        let err = DateIndex::build(&obs).expect_err("should fail to parse");
        assert!(matches!(err, AnalysisError::InvalidDate { .. }));
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let series = DateIndex::build(&[]).expect("empty input is valid");
        assert!(series.is_empty());
    }

    #[test]
    #[should_panic(expected = "day_offsets must be strictly increasing")]
    fn panics_on_unsorted_input() {
        let obs = vec![
            Observation::new("2012-01-01", 1.0),
            Observation::new("2011-01-01", 2.0),
        ];
        let _ = DateIndex::build(&obs);
    }
}
