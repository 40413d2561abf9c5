//! # Least Squares Fitter
//!
//! Ordinary least squares fit of `y = m*x + c` to a contiguous subseries,
//! with missing (despiked) entries dropped before fitting.
//!
//! ## When to Use
//! Used internally by [`crate::segmenter::Segmenter`] to price every
//! candidate segment, and by [`crate::reconstruct::Reconstructor`] to
//! re-derive the equation of the winning segments.
//!
//! ---

use crate::error::{AnalysisError, Result};
use crate::series::LineEq;

/// Stateless OLS fitter over `(day_offset, value)` pairs.
pub struct LeastSquaresFitter;

impl LeastSquaresFitter {
    /// Fits a line to `(x, y)` pairs, dropping any index where `y` is
    /// `None`.
    ///
    /// # Returns
    ///
    /// The fitted [`LineEq`] and the sum of squared residuals over the
    /// points actually used.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptySegment`] if no points remain after
    /// dropping missing entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use landtrendr_core::least_squares::LeastSquaresFitter;
    ///
    /// let xs = [0_i64, 1, 2, 3, 4];
    /// let ys = [Some(1.0), Some(2.1), Some(3.0), Some(4.4), Some(4.7)];
    /// let (eqn, residual) = LeastSquaresFitter::fit(&xs, &ys).expect("non-empty segment");
    /// assert!((eqn.slope - 0.97).abs() < 1e-9);
    /// assert!((residual - 0.243).abs() < 1e-9);
    /// ```
    pub fn fit(xs: &[i64], ys: &[Option<f64>]) -> Result<(LineEq, f64)> {
        debug_assert_eq!(xs.len(), ys.len(), "x/y slices must be the same length");

        let points: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys.iter())
            .filter_map(|(&x, &y)| y.map(|y| (x as f64, y)))
            .collect();

        match points.len() {
            0 => Err(AnalysisError::EmptySegment),
            1 => {
                let (_, y) = points[0];
                Ok((LineEq::new(0.0, y), 0.0))
            }
            n => {
                let mean_x = points.iter().map(|&(x, _)| x).sum::<f64>() / n as f64;
                let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / n as f64;

                let (num, den) = points.iter().fold((0.0, 0.0), |(num, den), &(x, y)| {
                    let dx = x - mean_x;
                    (num + dx * (y - mean_y), den + dx * dx)
                });

                let slope = if den == 0.0 { 0.0 } else { num / den };
                let intercept = mean_y - slope * mean_x;
                let eqn = LineEq::new(slope, intercept);

                let residual = points
                    .iter()
                    .map(|&(x, y)| (y - eqn.eval(x as i64)).powi(2))
                    .sum();

                Ok((eqn, residual))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_known_series() {
        let xs = [0_i64, 1, 2, 3, 4];
        let ys = [Some(1.0), Some(2.1), Some(3.0), Some(4.4), Some(4.7)];
        let (eqn, residual) = LeastSquaresFitter::fit(&xs, &ys).expect("non-empty segment");
        assert!((eqn.slope - 0.97).abs() < 1e-9);
        assert!((eqn.intercept - 1.1).abs() < 1e-9);
        assert!((residual - 0.243).abs() < 1e-9);
    }

    #[test]
    fn single_point_has_zero_residual() {
        let xs = [5_i64];
        let ys = [Some(42.0)];
        let (eqn, residual) = LeastSquaresFitter::fit(&xs, &ys).expect("single point is valid");
        assert_eq!(eqn.slope, 0.0);
        assert_eq!(eqn.intercept, 42.0);
        assert_eq!(residual, 0.0);
    }

    #[test]
    fn drops_missing_entries_before_fitting() {
        let xs = [0_i64, 1, 2];
        let ys = [Some(1.0), None, Some(3.0)];
        let (eqn, _residual) = LeastSquaresFitter::fit(&xs, &ys).expect("two points remain");
        assert!((eqn.slope - 1.0).abs() < 1e-9);
    }

    #[test]
    fn all_missing_is_an_empty_segment_error() {
        let xs = [0_i64, 1];
        let ys = [None, None];
        let err = LeastSquaresFitter::fit(&xs, &ys).expect_err("no points left");
        assert_eq!(err, AnalysisError::EmptySegment);
    }
}
