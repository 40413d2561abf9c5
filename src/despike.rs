//! # Despiker
//!
//! Flags transient, single-point outliers in an ordered series so the
//! segmenter never has to explain them with an extra segment.
//!
//! ## When to Use
//! Always run between [`crate::date_index::DateIndex`] and
//! [`crate::segmenter::Segmenter`] — the segmenter assumes spikes have
//! already been nulled out.
//!
//! ## Algorithm
//! A single pass over sliding triples `(x, y, z)`. A point is monotone with
//! its neighbors (`x <= y <= z` or `x >= y >= z`) and is always kept. A
//! non-monotone point is flagged a spike only if it deviates from *both*
//! neighbors by more than the series' standard deviation and it differs
//! from the last point actually kept (a run of identical non-monotone
//! values is a plateau, not a spike). The first and last points are never
//! flagged.
//!
//! ---

use crate::series::DaySeries;

/// Stateless despiking pass over a [`DaySeries`].
pub struct Despiker;

impl Despiker {
    /// Returns a new series of the same length with spikes replaced by
    /// `None`, plus the boolean spike mask (`mask[i]` is `true` iff point
    /// `i` was flagged). An empty series is returned unchanged, with an
    /// empty mask — the segmenter's `non_spike_count < 2` check surfaces
    /// that as `InsufficientData`, not a panic.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use landtrendr_core::date_index::DateIndex;
    /// use landtrendr_core::despike::Despiker;
    /// use landtrendr_core::series::Observation;
    ///
    /// let obs = (0..7)
    ///     .map(|i| Observation::new(format!("2020-01-{:02}", i + 1), 1.0))
    ///     .collect::<Vec<_>>();
    /// let mut obs = obs;
    /// obs[3].val = 5.0;
    /// let series = DateIndex::build(&obs).expect("valid dates");
    /// let (despiked, mask) = Despiker::despike(&series);
    /// assert!(mask[3]);
    /// assert_eq!(despiked.values[3], None);
    /// ```
    #[must_use]
    pub fn despike(series: &DaySeries) -> (DaySeries, Vec<bool>) {
        let n = series.len();
        if n == 0 {
            return (series.clone(), Vec::new());
        }

        let raw: Vec<f64> = series
            .values
            .iter()
            .map(|v| v.expect("DaySeries passed to Despiker must have no missing values yet"))
            .collect();

        let mut mask = vec![false; n];

        if n < 3 {
            let (series, mask) = (series.clone(), mask);
            return (series, mask);
        }

        let sigma = population_std_dev(&raw);
        let mut last_kept_value = raw[0];

        for i in 1..n - 1 {
            let (x, y, z) = (raw[i - 1], raw[i], raw[i + 1]);
            let monotone_up = x <= y && y <= z;
            let monotone_down = x >= y && y >= z;

            if monotone_up || monotone_down {
                last_kept_value = y;
                continue;
            }

            let deviates_from_neighbors = (y - x).abs() > sigma && (y - z).abs() > sigma;
            if deviates_from_neighbors && y != last_kept_value {
                mask[i] = true;
            } else {
                last_kept_value = y;
            }
        }

        let values = raw
            .into_iter()
            .zip(mask.iter())
            .map(|(v, &spiked)| if spiked { None } else { Some(v) })
            .collect();

        (
            DaySeries {
                dates: series.dates.clone(),
                day_offsets: series.day_offsets.clone(),
                values,
            },
            mask,
        )
    }
}

fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
