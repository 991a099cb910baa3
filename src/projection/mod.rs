//! Pure projection from payload description + result set to renderable
//! models.
//!
//! [`project`] is deterministic and side-effect free: identical inputs yield
//! identical models, and nothing here touches the network, the clock, or any
//! source of randomness. Absent or malformed data projects to explicit
//! variants, never to an error.

mod format;
mod series;
mod table;

pub use series::{SeriesModel, SeriesPoint, MISSING_COLOR, PALETTE};
pub use table::{
    Cell, Column, PageRequest, Row, SortColumn, SortDirection, TableModel, TableQuery, TableView,
};

use crate::payload::{DashboardData, PayloadDescription};

#[cfg(test)]
mod tests;

/// How to visualize a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartKind {
    /// Row-per-entity table (the default when no hint was given)
    Table,
    Bar,
    Line,
    Pie,
    /// Any other hint, passed through to the rendering engine untouched
    Custom(String),
}

impl ChartKind {
    /// Parse a chart hint; empty or `"table"` means table
    pub fn parse(hint: &str) -> Self {
        let trimmed = hint.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "table" => Self::Table,
            "bar" => Self::Bar,
            "line" => Self::Line,
            "pie" => Self::Pie,
            _ => Self::Custom(trimmed.to_string()),
        }
    }

    /// Whether this is a pie chart (pie series carry no axis labels)
    pub fn is_pie(&self) -> bool {
        matches!(self, Self::Pie)
    }

    /// The type name handed to the rendering engine
    pub(crate) fn engine_name(&self) -> &str {
        match self {
            Self::Table => "table",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Custom(name) => name,
        }
    }
}

impl Default for ChartKind {
    fn default() -> Self {
        Self::Table
    }
}

/// Outcome of a projection
///
/// The three degenerate variants stay distinct so callers can render them
/// differently; together with the caller's fetch state
/// ([`crate::session::ResourceState`]) they cover no-data, loading, error,
/// and ok without ever throwing.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// The payload description names no fields at all
    NothingToDisplay,
    /// The result set is absent or holds no entities
    NoData,
    /// A table model, ready for a table widget
    Table(TableModel),
    /// A series model, ready for a chart widget
    Series(SeriesModel),
}

/// Map `(payload, result set, chart kind)` to a renderable model
pub fn project(
    payload: &PayloadDescription,
    data: Option<&DashboardData>,
    kind: &ChartKind,
) -> Projection {
    if payload.is_empty() {
        return Projection::NothingToDisplay;
    }
    let Some(data) = data.filter(|d| !d.is_empty()) else {
        return Projection::NoData;
    };
    match kind {
        ChartKind::Table => Projection::Table(table::build(payload, data)),
        other => Projection::Series(series::build(payload, data, other)),
    }
}
