//! Error types for the trendline analysis core.
//!
//! Every recoverable failure that can arise from bad *caller data* (a
//! malformed date, a malformed rule, a segment with no usable points, a
//! series too short to segment) is represented here and surfaces through
//! `Result` at the per-pixel entry point ([`crate::pixel::analyze_pixel`]).
//! Failures that indicate a bug in the core itself rather than bad input
//! still use the `assert_*` panic helpers in [`crate::validation`], since
//! those can never be triggered by caller data once the core is correct.

use thiserror::Error;

/// Errors produced by the trendline analysis core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date {date:?}: {reason}")]
    InvalidDate {
        /// The offending date string.
        date: String,
        /// Why the date was rejected.
        reason: String,
    },

    /// A [`crate::rules::LabelRule`] was constructed with a missing
    /// name/val, an unknown `change_type`, or a filter whose shape is not
    /// a `(qualifier, operand)` pair.
    #[error("invalid label rule {name:?}: {reason}")]
    InvalidRule {
        /// The rule's (possibly empty) name, for diagnostics.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The least-squares fitter was invoked on a subseries with no
    /// non-missing points.
    #[error("least squares fit requested on an empty segment")]
    EmptySegment,

    /// Fewer than two non-spike observations reached the segmenter.
    #[error(
        "insufficient data: only {non_spike_count} non-spike observation(s), need at least 2"
    )]
    InsufficientData {
        /// How many non-spike observations were actually available.
        non_spike_count: usize,
    },
}

/// Convenience alias for `Result`s returned by this crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;
