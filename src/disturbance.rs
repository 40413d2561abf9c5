//! # Disturbance Extractor
//!
//! Walks a [`Trendline`]'s vertices pairwise and derives one [`Disturbance`]
//! per adjacent pair. A free function rather than a `Trendline` method, so
//! that `Trendline` stays a pure value with no dependency on this module —
//! see the design notes on breaking the cyclic Trendline/Disturbance import.
//!
//! ---

use chrono::NaiveDate;

use crate::trendline::{Trendline, TrendlinePoint};

/// A single disturbance event derived from one segment of a trendline.
///
/// `magnitude` is signed: positive means the value decreased (a loss) across
/// the segment, negative means it increased.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Disturbance {
    /// Calendar year of the segment's left (earlier) vertex.
    pub onset_year: i32,
    /// Fitted value at the left vertex.
    pub initial_val: f64,
    /// `left.val_fit - right.val_fit`.
    pub magnitude: f64,
    /// Years elapsed between the left and right vertices.
    pub duration: i32,
}

impl Disturbance {
    fn from_vertex_pair(left: &TrendlinePoint, right: &TrendlinePoint) -> Self {
        let onset_year = year_of(&left.index_date);
        let end_year = year_of(&right.index_date);
        Self {
            onset_year,
            initial_val: left.val_fit,
            magnitude: left.val_fit - right.val_fit,
            duration: end_year - onset_year,
        }
    }
}

/// Derives the ordered list of disturbances from a trendline's vertices.
///
/// Returns one fewer item than the vertex count (each item covers one
/// segment between two consecutive vertices). A single-vertex trendline
/// (degenerate, should not occur given the segmenter's invariants) yields no
/// disturbances.
pub fn extract_disturbances(trendline: &Trendline) -> impl Iterator<Item = Disturbance> + '_ {
    let vertices: Vec<&TrendlinePoint> = trendline.vertices().collect();
    (0..vertices.len().saturating_sub(1))
        .map(move |i| Disturbance::from_vertex_pair(vertices[i], vertices[i + 1]))
}

fn year_of(index_date: &str) -> i32 {
    use chrono::Datelike;
    NaiveDate::parse_from_str(index_date, "%Y-%m-%d")
        .unwrap_or_else(|_| panic!("trendline point carries an unparseable index_date: {index_date:?}"))
        .year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::LineEq;

    fn point(date: &str, val_fit: f64, vertex: bool) -> TrendlinePoint {
        TrendlinePoint {
            val_raw: val_fit,
            val_fit,
            eqn_fit: LineEq::new(0.0, val_fit),
            eqn_right: LineEq::new(0.0, val_fit),
            index_date: date.to_string(),
            index_day: 0,
            spike: false,
            vertex,
        }
    }

    #[test]
    fn extracts_one_disturbance_per_segment() {
        let points = vec![
            point("2010-12-31", 10.0, true),
            point("2012-12-31", 10.0, false),
            point("2013-12-31", 5.0, true),
            point("2016-12-31", 7.0, false),
            point("2019-12-31", 10.0, true),
        ];
        let trendline = crate::trendline::TrendlineAssembler::assemble(points);

        let disturbances: Vec<Disturbance> = extract_disturbances(&trendline).collect();
        assert_eq!(disturbances.len(), 2);

        assert_eq!(disturbances[0].onset_year, 2010);
        assert_eq!(disturbances[0].initial_val, 10.0);
        assert_eq!(disturbances[0].magnitude, 5.0);
        assert_eq!(disturbances[0].duration, 3);

        assert_eq!(disturbances[1].onset_year, 2013);
        assert_eq!(disturbances[1].magnitude, -5.0);
        assert_eq!(disturbances[1].duration, 6);
    }

    #[test]
    fn signed_magnitude_negative_on_increase() {
        let points = vec![point("2010-12-31", 5.0, true), point("2012-12-31", 10.0, true)];
        let trendline = crate::trendline::TrendlineAssembler::assemble(points);
        let disturbances: Vec<Disturbance> = extract_disturbances(&trendline).collect();
        assert_eq!(disturbances[0].magnitude, -5.0);
    }
}
