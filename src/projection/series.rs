//! Series-oriented chart projection.

use serde::{Deserialize, Serialize};

use super::format;
use super::ChartKind;
use crate::payload::{DashboardData, PayloadDescription, AGGREGATE_ID};

/// Fixed palette, assigned by point position
pub const PALETTE: [&str; 10] = [
    "#3366CC", "#DC3912", "#FF9900", "#109618", "#990099", "#0099C6", "#DD4477", "#66AA00",
    "#B82E2E", "#316395",
];

/// Muted fill for points whose value is missing
pub const MISSING_COLOR: &str = "#cccccc";

/// One data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Point name (the field's display label)
    pub name: String,
    /// Numeric value; `0` when the underlying value is missing
    pub value: f64,
    /// Style hint for the rendering engine
    pub color: String,
    /// Whether the underlying value was absent or unparseable. Missing
    /// points still occupy their slot so category axes stay aligned with
    /// the field list.
    pub missing: bool,
}

/// Chart-engine-agnostic series model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesModel {
    /// Chart type name to hand to the engine (`"bar"`, `"line"`, ...)
    pub chart_type: String,
    /// Points in flattened field order
    pub points: Vec<SeriesPoint>,
    /// Category axis labels; empty for pie charts
    pub axis_labels: Vec<String>,
}

/// Build a series over the aggregate entity's values
///
/// Series charts always read the aggregate entity, never per-entity
/// breakdowns. Fields with an empty label are dropped; every kept field
/// becomes exactly one point.
pub(crate) fn build(
    payload: &PayloadDescription,
    data: &DashboardData,
    kind: &ChartKind,
) -> SeriesModel {
    let mut points = Vec::new();
    for field in payload.fields() {
        if field.label.is_empty() {
            continue;
        }
        let numeric = data
            .value_at(AGGREGATE_ID, field.section, field.key)
            .and_then(format::numeric_value);
        let missing = numeric.is_none();
        let color = if missing {
            MISSING_COLOR.to_string()
        } else {
            PALETTE[points.len() % PALETTE.len()].to_string()
        };
        points.push(SeriesPoint {
            name: field.label.to_string(),
            value: numeric.unwrap_or(0.0),
            color,
            missing,
        });
    }

    let axis_labels = if kind.is_pie() {
        Vec::new()
    } else {
        points.iter().map(|p| p.name.clone()).collect()
    };

    SeriesModel {
        chart_type: kind.engine_name().to_string(),
        points,
        axis_labels,
    }
}
