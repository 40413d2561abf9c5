//! # Flattened Emission
//!
//! Optional map-building encoder: turns a [`Trendline`] into a flat
//! `<date>_<attr> -> value` map, for collaborators that write per-pixel
//! rasters rather than consuming the structured [`TrendlinePoint`] records
//! directly.
//!
//! ---

use std::collections::BTreeMap;

use crate::trendline::{Trendline, TrendlinePoint};

/// The recognized per-point attributes eligible for flattened emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenedAttribute {
    /// Original, unfiltered observed value.
    ValRaw,
    /// Reconstructed value on the chosen segment.
    ValFit,
    /// Slope of `eqn_fit`.
    EqnFitSlope,
    /// Intercept of `eqn_fit`.
    EqnFitIntercept,
    /// Slope of `eqn_right`.
    EqnRightSlope,
    /// Intercept of `eqn_right`.
    EqnRightIntercept,
    /// Whether the point was flagged a spike, coerced to `0`/`1`.
    Spike,
    /// Whether the point is a vertex, coerced to `0`/`1`.
    Vertex,
}

/// All recognized attributes, in a stable emission order.
pub const ALL_ATTRIBUTES: [FlattenedAttribute; 8] = [
    FlattenedAttribute::ValRaw,
    FlattenedAttribute::ValFit,
    FlattenedAttribute::EqnFitSlope,
    FlattenedAttribute::EqnFitIntercept,
    FlattenedAttribute::EqnRightSlope,
    FlattenedAttribute::EqnRightIntercept,
    FlattenedAttribute::Spike,
    FlattenedAttribute::Vertex,
];

impl FlattenedAttribute {
    /// The attribute's key suffix, as it appears after `<date>_`.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::ValRaw => "val_raw",
            Self::ValFit => "val_fit",
            Self::EqnFitSlope => "eqn_fit_slope",
            Self::EqnFitIntercept => "eqn_fit_intercept",
            Self::EqnRightSlope => "eqn_right_slope",
            Self::EqnRightIntercept => "eqn_right_intercept",
            Self::Spike => "spike",
            Self::Vertex => "vertex",
        }
    }

    /// Reads this attribute's value off a point, coercing booleans to
    /// `0.0`/`1.0`.
    #[must_use]
    pub fn value_of(&self, point: &TrendlinePoint) -> f64 {
        match self {
            Self::ValRaw => point.val_raw,
            Self::ValFit => point.val_fit,
            Self::EqnFitSlope => point.eqn_fit.slope,
            Self::EqnFitIntercept => point.eqn_fit.intercept,
            Self::EqnRightSlope => point.eqn_right.slope,
            Self::EqnRightIntercept => point.eqn_right.intercept,
            Self::Spike => f64::from(point.spike),
            Self::Vertex => f64::from(point.vertex),
        }
    }
}

/// Flattens every point of `trendline` across every recognized attribute
/// into a single `<date>_<attr> -> value` map.
#[must_use]
pub fn flatten(trendline: &Trendline) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    for point in trendline.points() {
        for attr in ALL_ATTRIBUTES {
            out.insert(format!("{}_{}", point.index_date, attr.key()), attr.value_of(point));
        }
    }
    out
}
