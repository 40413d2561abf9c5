//! # Batch Driver
//!
//! Embarrassingly-parallel-across-pixels, purely-sequential-within-a-pixel
//! batch entry point, per the concurrency model: pixels are partitioned
//! across worker threads with [`rayon`], cancellation is checked once per
//! pixel (never mid-pixel), and output order always matches input order.
//!
//! ---

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::error::AnalysisError;
use crate::pixel::{analyze_pixel, AnalysisConfig, PixelAnalysis};
use crate::series::Observation;

/// Caller-assigned identifier for a pixel, opaque to the core (typically a
/// WKT point or a raster row/col pair, encoded as a string by the caller).
pub type PixelId = String;

/// One pixel's observation list, tagged with its caller-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelInput {
    /// The pixel's identifier.
    pub id: PixelId,
    /// The pixel's observation list.
    pub observations: Vec<Observation>,
}

/// The outcome of analyzing one pixel within a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Analysis completed successfully.
    Analyzed {
        /// The pixel's identifier.
        id: PixelId,
        /// The pixel's analysis result.
        analysis: PixelAnalysis,
    },
    /// Analysis failed with a typed error.
    Failed {
        /// The pixel's identifier.
        id: PixelId,
        /// Why analysis failed.
        error: AnalysisError,
    },
    /// The batch was cancelled before this pixel's analysis began.
    Cancelled {
        /// The pixel's identifier.
        id: PixelId,
    },
}

/// Analyzes a batch of pixels in parallel, preserving input order in the
/// output.
///
/// # Arguments
///
/// * `inputs` - The pixels to analyze.
/// * `config` - Hyperparameters shared across every pixel.
/// * `cancelled` - Checked once per pixel, before that pixel's analysis
///   starts; once set, every pixel not yet started reports
///   [`BatchOutcome::Cancelled`]. A pixel already in flight always runs to
///   completion.
#[must_use]
pub fn analyze_batch(
    inputs: &[PixelInput],
    config: &AnalysisConfig,
    cancelled: &AtomicBool,
) -> Vec<BatchOutcome> {
    inputs
        .par_iter()
        .map(|input| {
            if cancelled.load(Ordering::Relaxed) {
                return BatchOutcome::Cancelled {
                    id: input.id.clone(),
                };
            }

            match analyze_pixel(&input.observations, config) {
                Ok(analysis) => BatchOutcome::Analyzed {
                    id: input.id.clone(),
                    analysis,
                },
                Err(error) => BatchOutcome::Failed {
                    id: input.id.clone(),
                    error,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: &str, values: &[f64]) -> PixelInput {
        PixelInput {
            id: id.to_string(),
            observations: values
                .iter()
                .enumerate()
                .map(|(i, &v)| Observation::new(format!("{}-12-31", 2010 + i), v))
                .collect(),
        }
    }

    #[test]
    fn preserves_input_order() {
        let inputs = vec![
            input("a", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            input("b", &[5.0, 4.0, 3.0, 2.0, 1.0]),
            input("c", &[1.0, 1.0, 1.0, 1.0, 1.0]),
        ];
        let config = AnalysisConfig::new(2.0, vec![]);
        let results = analyze_batch(&inputs, &config, &AtomicBool::new(false));

        let ids: Vec<&str> = results
            .iter()
            .map(|r| match r {
                BatchOutcome::Analyzed { id, .. } => id.as_str(),
                BatchOutcome::Failed { id, .. } => id.as_str(),
                BatchOutcome::Cancelled { id } => id.as_str(),
            })
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn mixes_success_and_failure_per_pixel() {
        let inputs = vec![input("good", &[1.0, 2.0, 3.0, 4.0, 5.0]), input("bad", &[1.0])];
        let config = AnalysisConfig::new(2.0, vec![]);
        let results = analyze_batch(&inputs, &config, &AtomicBool::new(false));

        assert!(matches!(results[0], BatchOutcome::Analyzed { .. }));
        assert!(matches!(
            results[1],
            BatchOutcome::Failed {
                error: AnalysisError::InsufficientData { .. },
                ..
            }
        ));
    }

    #[test]
    fn pre_cancelled_batch_reports_no_analysis() {
        let inputs = vec![input("a", &[1.0, 2.0, 3.0, 4.0, 5.0])];
        let config = AnalysisConfig::new(2.0, vec![]);
        let results = analyze_batch(&inputs, &config, &AtomicBool::new(true));
        assert!(matches!(results[0], BatchOutcome::Cancelled { .. }));
    }
}
