//! # Per-Pixel Entry Point
//!
//! [`AnalysisConfig`] bundles the hyperparameters that do not vary across
//! pixels within one run (`line_cost`, `label_rules`, an optional reference
//! date carried through for caller context). [`analyze_pixel`] composes the
//! full pipeline — [`DateIndex`] through [`ChangeLabeler`] — into one
//! synchronous call, per the concurrency model's "pure function of its
//! observation list, rule set, and line_cost" contract.
//!
//! ---

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::date_index::DateIndex;
use crate::despike::Despiker;
use crate::error::Result;
use crate::flatten;
use crate::reconstruct::Reconstructor;
use crate::rules::{ChangeLabeler, LabelRule, LabelResult};
use crate::segmenter::Segmenter;
use crate::series::Observation;
use crate::trendline::{Trendline, TrendlineAssembler};

/// Hyperparameters shared across every pixel in a run.
///
/// Passed by reference into [`analyze_pixel`] rather than held in any
/// process-wide state, per the design notes' rejection of a global
/// "settings" module.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Per-segment penalty passed to the [`Segmenter`]. Must be positive.
    pub line_cost: f64,
    /// The rules evaluated by [`ChangeLabeler`] for every pixel.
    pub label_rules: Vec<LabelRule>,
    /// A reference calendar date carried through for callers that frame
    /// `onset_year` semantics relative to "now" or a scene date. Unused by
    /// the core itself.
    pub target_date: Option<NaiveDate>,
}

impl AnalysisConfig {
    /// Builds a config with no reference date.
    #[must_use]
    pub fn new(line_cost: f64, label_rules: Vec<LabelRule>) -> Self {
        Self {
            line_cost,
            label_rules,
            target_date: None,
        }
    }
}

/// The full output of analyzing one pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelAnalysis {
    /// The reconstructed trendline.
    pub trendline: Trendline,
    /// Rule-engine outcomes, keyed by rule name.
    pub labels: LabelResult,
    /// Optional flattened `<date>_<attr> -> value` emission.
    pub flattened: BTreeMap<String, f64>,
}

/// Runs the full trendline pipeline for a single pixel's observation list.
///
/// # Errors
///
/// Returns an [`crate::error::AnalysisError`] if date parsing fails, the
/// series has too few non-spike points to segment, or a segment's fit
/// fails unexpectedly. On any error, the pixel produces no trendline and
/// no labels.
#[tracing::instrument(level = "info", skip(observations, config), fields(n = observations.len()))]
pub fn analyze_pixel(observations: &[Observation], config: &AnalysisConfig) -> Result<PixelAnalysis> {
    let raw = DateIndex::build(observations)?;
    let (despiked, _spike_mask) = Despiker::despike(&raw);
    let vertices = Segmenter::segment(&despiked, config.line_cost)?;
    let points = Reconstructor::reconstruct(&raw, &despiked, &vertices)?;
    let trendline = TrendlineAssembler::assemble(points);

    let labels = ChangeLabeler::label(&trendline, &config.label_rules);
    let flattened = flatten::flatten(&trendline);

    tracing::debug!(
        vertex_count = vertices.len(),
        label_count = labels.len(),
        "pixel analysis complete"
    );

    Ok(PixelAnalysis {
        trendline,
        labels,
        flattened,
    })
}
