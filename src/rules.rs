//! # Rule Engine
//!
//! [`LabelRule`] describes a filter/selection policy over a disturbance
//! list; [`RuleEngine`] evaluates one rule against a [`Trendline`] and picks
//! at most one winning [`Disturbance`]; [`ChangeLabeler`] runs a whole
//! ruleset and assembles the final [`LabelResult`] map.
//!
//! ---

use std::collections::BTreeMap;

use crate::disturbance::{extract_disturbances, Disturbance};
use crate::error::{AnalysisError, Result};
use crate::trendline::Trendline;

/// Qualifier for an `onset_year` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OnsetYearQualifier {
    /// `=`
    #[serde(rename = "=")]
    Equal,
    /// `<=`
    #[serde(rename = "<=")]
    LessOrEqual,
    /// `>=`
    #[serde(rename = ">=")]
    GreaterOrEqual,
}

/// Qualifier for a `duration` or `pre_threshold` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ComparisonQualifier {
    /// `>`
    #[serde(rename = ">")]
    GreaterThan,
    /// `<`
    #[serde(rename = "<")]
    LessThan,
}

/// Which disturbance wins among those surviving a rule's filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ChangeType {
    /// First disturbance: smallest `onset_year`.
    #[serde(rename = "FD")]
    First,
    /// Greatest disturbance: largest `magnitude`.
    #[serde(rename = "GD")]
    Greatest,
    /// Longest disturbance: largest `duration`.
    #[serde(rename = "LD")]
    Longest,
}

/// A labeling rule: a name/value pair, an optional [`ChangeType`] selection
/// policy, and optional filters on a disturbance's onset year, duration, and
/// pre-disturbance value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelRule {
    /// The label's name, used as the key in [`LabelResult`].
    pub name: String,
    /// Integer code assigned to this label when it matches.
    pub val: i64,
    /// Winner-selection policy; `None` means "first surviving disturbance".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<ChangeType>,
    /// Filters disturbances to those whose `onset_year` satisfies the
    /// qualifier against the given year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset_year: Option<(OnsetYearQualifier, i32)>,
    /// Filters disturbances to those whose `duration` satisfies the
    /// qualifier against the given year count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<(ComparisonQualifier, i32)>,
    /// Filters disturbances to those whose `initial_val` satisfies the
    /// qualifier against the given threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_threshold: Option<(ComparisonQualifier, f64)>,
}

impl LabelRule {
    /// Builds a rule, validating that `name` is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidRule`] if `name` is empty. The other
    /// fields are already statically well-formed once they type-check, since
    /// this crate's `LabelRule` has no stringly-typed qualifiers to validate
    /// at runtime — that validation lives at the deserialization boundary of
    /// whatever wire format a caller loads rules from.
    pub fn new(
        name: impl Into<String>,
        val: i64,
        change_type: Option<ChangeType>,
        onset_year: Option<(OnsetYearQualifier, i32)>,
        duration: Option<(ComparisonQualifier, i32)>,
        pre_threshold: Option<(ComparisonQualifier, f64)>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(AnalysisError::InvalidRule {
                name,
                reason: "name required".to_string(),
            });
        }
        if val == 0 {
            return Err(AnalysisError::InvalidRule {
                name,
                reason: "val required".to_string(),
            });
        }
        Ok(Self {
            name,
            val,
            change_type,
            onset_year,
            duration,
            pre_threshold,
        })
    }

    /// Parses a [`LabelRule`] from its wire schema (see `SPEC_FULL.md` §6),
    /// re-validating it the same way [`LabelRule::new`] does.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidRule`] if the JSON does not match the
    /// wire schema, or if the parsed rule fails the `name` validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Self = serde_json::from_str(json).map_err(|err| AnalysisError::InvalidRule {
            name: String::new(),
            reason: format!("malformed label rule json: {err}"),
        })?;
        Self::new(
            raw.name,
            raw.val,
            raw.change_type,
            raw.onset_year,
            raw.duration,
            raw.pre_threshold,
        )
    }

    fn matches_filters(&self, d: &Disturbance) -> bool {
        if let Some((qualifier, year)) = self.onset_year {
            let ok = match qualifier {
                OnsetYearQualifier::Equal => d.onset_year == year,
                OnsetYearQualifier::LessOrEqual => d.onset_year <= year,
                OnsetYearQualifier::GreaterOrEqual => d.onset_year >= year,
            };
            if !ok {
                return false;
            }
        }

        if let Some((qualifier, years)) = self.duration {
            let ok = match qualifier {
                ComparisonQualifier::GreaterThan => d.duration > years,
                ComparisonQualifier::LessThan => d.duration < years,
            };
            if !ok {
                return false;
            }
        }

        if let Some((qualifier, threshold)) = self.pre_threshold {
            let ok = match qualifier {
                ComparisonQualifier::GreaterThan => d.initial_val > threshold,
                ComparisonQualifier::LessThan => d.initial_val < threshold,
            };
            if !ok {
                return false;
            }
        }

        true
    }
}

/// One rule's outcome, ready to be inserted into a [`LabelResult`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelOutcome {
    /// The rule's integer code.
    pub class_val: i64,
    /// Calendar year the winning disturbance began.
    pub onset_year: i32,
    /// Signed magnitude of the winning disturbance.
    pub magnitude: f64,
    /// Duration in years of the winning disturbance.
    pub duration: i32,
}

/// Mapping from rule name to its outcome; empty if no rule matched.
pub type LabelResult = BTreeMap<String, LabelOutcome>;

/// Stateless single-rule evaluator.
pub struct RuleEngine;

impl RuleEngine {
    /// Evaluates `rule` against `trendline`'s disturbances, returning the
    /// winning [`Disturbance`] if any survive the rule's filters.
    #[must_use]
    #[tracing::instrument(level = "debug", skip(trendline), fields(rule = %rule.name))]
    pub fn evaluate(trendline: &Trendline, rule: &LabelRule) -> Option<Disturbance> {
        let mut candidates: Vec<Disturbance> = extract_disturbances(trendline)
            .filter(|d| rule.matches_filters(d))
            .collect();

        candidates.sort_by(|a, b| a.onset_year.cmp(&b.onset_year));

        let winner = candidates.into_iter().reduce(|winner, challenger| {
            let challenger_wins = match rule.change_type {
                Some(ChangeType::First) => challenger.onset_year < winner.onset_year,
                Some(ChangeType::Greatest) => challenger.magnitude > winner.magnitude,
                Some(ChangeType::Longest) => challenger.duration > winner.duration,
                None => false,
            };
            if challenger_wins {
                challenger
            } else {
                winner
            }
        });
        tracing::debug!(matched = winner.is_some(), "rule evaluated");
        winner
    }
}

/// Stateless multi-rule aggregator.
pub struct ChangeLabeler;

impl ChangeLabeler {
    /// Runs [`RuleEngine::evaluate`] against every rule and assembles the
    /// resulting [`LabelResult`]. Rules are independent; a rule that does
    /// not match contributes no entry.
    #[must_use]
    pub fn label(trendline: &Trendline, rules: &[LabelRule]) -> LabelResult {
        let mut result = LabelResult::new();
        for rule in rules {
            if let Some(d) = RuleEngine::evaluate(trendline, rule) {
                result.insert(
                    rule.name.clone(),
                    LabelOutcome {
                        class_val: rule.val,
                        onset_year: d.onset_year,
                        magnitude: d.magnitude,
                        duration: d.duration,
                    },
                );
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_index::DateIndex;
    use crate::despike::Despiker;
    use crate::reconstruct::Reconstructor;
    use crate::segmenter::Segmenter;
    use crate::series::Observation;
    use crate::trendline::TrendlineAssembler;

    fn scenario_3_trendline() -> Trendline {
        let values = [10.0, 10.0, 10.0, 5.0, 5.0, 5.0, 7.0, 9.0, 10.0, 10.0];
        let obs: Vec<Observation> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(format!("{}-12-31", 2010 + i), v))
            .collect();
        let raw = DateIndex::build(&obs).expect("valid dates");
        let (despiked, _mask) = Despiker::despike(&raw);
        let vertices = Segmenter::segment(&despiked, 2.0).expect("enough data");
        let points = Reconstructor::reconstruct(&raw, &despiked, &vertices).expect("reconstructs");
        TrendlineAssembler::assemble(points)
    }

    #[test]
    fn fast_disturbance_matches_expected_stats() {
        let trendline = scenario_3_trendline();
        let rule = LabelRule::new(
            "fast_dist",
            2,
            Some(ChangeType::Greatest),
            None,
            Some((ComparisonQualifier::LessThan, 4)),
            None,
        )
        .expect("valid rule");

        let winner = RuleEngine::evaluate(&trendline, &rule).expect("a match is expected");
        assert_eq!(winner.onset_year, 2010);
        assert!((winner.initial_val - 10.999178383).abs() < 1e-6);
        assert!((winner.magnitude - 6.3993420469846).abs() < 1e-6);
        assert_eq!(winner.duration, 3);
    }

    #[test]
    fn empty_ruleset_yields_empty_labels() {
        let trendline = scenario_3_trendline();
        let labels = ChangeLabeler::label(&trendline, &[]);
        assert!(labels.is_empty());
    }

    #[test]
    fn filter_excludes_all_disturbances() {
        let trendline = scenario_3_trendline();
        let rule = LabelRule::new(
            "fast_dist",
            2,
            Some(ChangeType::Greatest),
            Some((OnsetYearQualifier::Equal, 2099)),
            None,
            None,
        )
        .expect("valid rule");
        let labels = ChangeLabeler::label(&trendline, &[rule]);
        assert!(!labels.contains_key("fast_dist"));
    }

    #[test]
    fn empty_name_is_an_invalid_rule() {
        let err = LabelRule::new("", 1, None, None, None, None).expect_err("empty name rejected");
        assert!(matches!(err, AnalysisError::InvalidRule { .. }));
    }

    #[test]
    fn parses_rule_from_wire_schema() {
        let json = r#"{
            "name": "fast_dist",
            "val": 2,
            "change_type": "GD",
            "duration": ["<", 4]
        }"#;
        let rule = LabelRule::from_json(json).expect("valid wire schema");
        assert_eq!(rule.name, "fast_dist");
        assert_eq!(rule.change_type, Some(ChangeType::Greatest));
        assert_eq!(rule.duration, Some((ComparisonQualifier::LessThan, 4)));
    }

    #[test]
    fn malformed_json_is_an_invalid_rule() {
        let err = LabelRule::from_json("not json").expect_err("malformed json rejected");
        assert!(matches!(err, AnalysisError::InvalidRule { .. }));
    }

    #[test]
    fn fd_gd_ld_pick_different_winners() {
        // Three back-to-back, exactly linear segments with distinct
        // (onset, magnitude, duration) triples: an early small-and-short
        // drop, a middle large-and-short drop, and a late small-and-long
        // drop — so FD, GD and LD are each forced to pick a different one.
        let values = [
            10.0, 9.5, 9.0, // segment A: 2010-2012, magnitude 1, duration 2
            5.0, 1.0, // segment B: 2012-2014, magnitude 8, duration 2
            0.5, 0.0, -0.5, -1.0, -1.5, // segment C: 2014-2019, magnitude 2.5, duration 5
        ];
        let obs: Vec<Observation> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(format!("{}-12-31", 2010 + i), v))
            .collect();
        let raw = DateIndex::build(&obs).expect("valid dates");
        let (despiked, _mask) = Despiker::despike(&raw);
        let vertices = Segmenter::segment(&despiked, 1.0).expect("enough data");
        assert_eq!(vertices, vec![0, 2, 4, 9]);
        let points = Reconstructor::reconstruct(&raw, &despiked, &vertices).expect("reconstructs");
        let trendline = TrendlineAssembler::assemble(points);

        let fd = LabelRule::new("fd", 1, Some(ChangeType::First), None, None, None).expect("valid");
        let gd = LabelRule::new("gd", 2, Some(ChangeType::Greatest), None, None, None).expect("valid");
        let ld = LabelRule::new("ld", 3, Some(ChangeType::Longest), None, None, None).expect("valid");

        let fd_winner = RuleEngine::evaluate(&trendline, &fd).expect("fd matches");
        let gd_winner = RuleEngine::evaluate(&trendline, &gd).expect("gd matches");
        let ld_winner = RuleEngine::evaluate(&trendline, &ld).expect("ld matches");

        assert_eq!(fd_winner.onset_year, 2010);
        assert_eq!(gd_winner.onset_year, 2012);
        assert_eq!(ld_winner.onset_year, 2014);
        assert_eq!(ld_winner.duration, 5);
    }
}
