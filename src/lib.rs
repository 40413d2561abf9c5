//! # landtrendr_core
//!
//! A pure, dependency-free-of-I/O reimplementation of the LandTrendr
//! algorithm's numeric core: given an irregular multi-year sequence of
//! scalar observations for one pixel of a remotely-sensed index, recover a
//! small number of linear segments that best explain the series, flag
//! transient spikes, and classify the resulting disturbance events against
//! a caller-supplied ruleset.
//!
//! ## Pipeline
//! Per-pixel analysis runs leaves-first:
//!
//! 1. [`date_index`] — calendar dates to integer day offsets.
//! 2. [`despike`] — flag transient single-point outliers.
//! 3. [`least_squares`] — fit `y = m*x + c` to a contiguous subsequence.
//! 4. [`segmenter`] — Bellman DP segmented least squares over vertex choices.
//! 5. [`reconstruct`] — per-point fitted value and governing equation.
//! 6. [`trendline`] — the immutable [`trendline::Trendline`] record.
//! 7. [`disturbance`] — ordered disturbance events from vertex pairs.
//! 8. [`rules`] — rule evaluation, winner selection, label aggregation.
//! 9. [`flatten`] — optional flattened emission for map-building.
//!
//! [`pixel::analyze_pixel`] composes the whole pipeline behind one
//! synchronous call; [`batch::analyze_batch`] parallelizes that call across
//! many pixels.
//!
//! ## Error Handling
//! Recoverable failures caused by bad caller data surface through
//! [`error::AnalysisError`]. Conditions that would indicate a bug in the
//! core itself panic via the helpers in [`validation`] instead — see that
//! module's docs for the distinction.
//!
//! ---

#![warn(missing_docs)]

pub mod batch;
pub mod date_index;
pub mod despike;
pub mod disturbance;
pub mod error;
pub mod flatten;
pub mod least_squares;
pub mod pixel;
pub mod reconstruct;
pub mod rules;
pub mod segmenter;
pub mod series;
pub mod trendline;
mod validation;

pub use error::{AnalysisError, Result};
pub use pixel::{analyze_pixel, AnalysisConfig, PixelAnalysis};
pub use series::Observation;
pub use trendline::{Trendline, TrendlinePoint};
