//! # Segmenter
//!
//! Bellman dynamic-programming segmented least squares: chooses the set of
//! vertex indices that minimizes total fit error plus a per-segment
//! complexity penalty (`line_cost`).
//!
//! ## Algorithm
//! 1. Precompute `e[i][j]`, the least-squares SSE of fitting a single line
//!    to the despiked points `[i..=j]`, for every `0 <= i <= j < n`.
//! 2. `OPT[j] = min` over `i in [0..=j]` of `(e[i][j] + line_cost + OPT[i-1])`,
//!    with `OPT[-1] = 0`. Ties go to the smallest `i`.
//! 3. Trace back from `j = n-1`: at each step the `i` that minimized `OPT[j]`
//!    marks `i-1` as a vertex, then recursion continues on `i-1`, until
//!    `i == 0`, at which point `0` itself is recorded as the final vertex.
//!
//! `e` is O(n^2) time and memory and dropped once the vertex set is chosen.
//!
//! ---

use crate::error::{AnalysisError, Result};
use crate::least_squares::LeastSquaresFitter;
use crate::series::DaySeries;

/// Stateless segmented-least-squares vertex selector.
pub struct Segmenter;

impl Segmenter {
    /// Chooses the vertex indices for a despiked series.
    ///
    /// # Arguments
    ///
    /// * `series` - A despiked [`DaySeries`] (spikes represented as `None`).
    /// * `line_cost` - Positive per-segment penalty; higher values favor
    ///   fewer, longer segments.
    ///
    /// # Returns
    ///
    /// The ordered, deduplicated list of vertex indices into `series`,
    /// always including `0` and `series.len() - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientData`] if fewer than two
    /// non-spike points are available.
    ///
    /// # Panics
    ///
    /// Panics if `line_cost` is not strictly positive — this is a
    /// programmer/caller contract violation, not a recoverable data error,
    /// since the positivity requirement is part of the function's
    /// documented precondition.
    #[tracing::instrument(level = "debug", skip(series), fields(n = series.len()))]
    pub fn segment(series: &DaySeries, line_cost: f64) -> Result<Vec<usize>> {
        crate::validation::assert_positive("line_cost", line_cost);

        let non_spike = series.non_spike_count();
        if non_spike < 2 {
            return Err(AnalysisError::InsufficientData {
                non_spike_count: non_spike,
            });
        }

        let n = series.len();
        let sse = Self::pairwise_sse(series);

        let mut opt = vec![0.0_f64; n];
        let mut choice = vec![0usize; n];

        for j in 0..n {
            let mut best_cost = f64::INFINITY;
            let mut best_i = 0usize;
            for i in 0..=j {
                let prev_opt = if i == 0 { 0.0 } else { opt[i - 1] };
                let cost = sse[i][j] + line_cost + prev_opt;
                if cost < best_cost {
                    best_cost = cost;
                    best_i = i;
                }
            }
            opt[j] = best_cost;
            choice[j] = best_i;
        }

        tracing::debug!(total_cost = opt[n - 1], "segmenter chose optimal partition");

        Ok(Self::traceback(&choice, n))
    }

    /// `e[i][j]` for all `0 <= i <= j < n`: least-squares SSE of the
    /// despiked points `[i..=j]`. Segments with no non-spike points get an
    /// infinite cost so the DP never selects them.
    fn pairwise_sse(series: &DaySeries) -> Vec<Vec<f64>> {
        let n = series.len();
        let mut sse = vec![vec![0.0_f64; n]; n];
        for i in 0..n {
            for j in i..n {
                let xs = &series.day_offsets[i..=j];
                let ys = &series.values[i..=j];
                sse[i][j] = match LeastSquaresFitter::fit(xs, ys) {
                    Ok((_, residual)) => residual,
                    Err(AnalysisError::EmptySegment) => f64::INFINITY,
                    Err(other) => {
                        unreachable!("least squares fit failed unexpectedly: {other:?}")
                    }
                };
            }
        }
        sse
    }

    /// Explicit-stack traceback (never recursion) through `choice`,
    /// recovering the vertex set from the chosen breakpoints.
    fn traceback(choice: &[usize], n: usize) -> Vec<usize> {
        let mut vertices = vec![n - 1];
        let mut j = n - 1;
        loop {
            let i = choice[j];
            if i == 0 {
                vertices.push(0);
                break;
            }
            vertices.push(i - 1);
            j = i - 1;
        }
        vertices.sort_unstable();
        vertices.dedup();
        vertices
    }
}
