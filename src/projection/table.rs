//! Row-oriented table projection.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::format;
use crate::payload::{DashboardData, PayloadDescription, AGGREGATE_ID};

/// One table column, derived from a flattened payload field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Owning payload section
    pub section: String,
    /// Field key within the section
    pub key: String,
    /// Heading shown to people
    pub title: String,
}

/// One formatted cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Display string; the `"-"` sentinel when missing
    pub display: String,
    /// Numeric reading of the raw value, used for sorting
    pub numeric: Option<f64>,
    /// Whether the underlying value was absent or not displayable
    pub missing: bool,
}

impl Cell {
    fn missing_cell() -> Self {
        Self {
            display: format::MISSING.to_string(),
            numeric: None,
            missing: true,
        }
    }
}

/// One row: an entity with one cell per column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Entity id from the result set (internal; not matched by filters)
    pub entity_id: String,
    /// Resolved label: `"Total"` for the aggregate, the agent's name when
    /// known, otherwise the raw id
    pub label: String,
    /// Cells in column order
    pub cells: Vec<Cell>,
}

/// Which column a sort applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    /// The label column
    Label,
    /// A data column, by index into [`TableModel::columns`]
    Field(usize),
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A page request: fixed page size, zero-based page index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index; clamped to the last page
    pub index: usize,
    /// Rows per page; must be non-zero to take effect
    pub size: usize,
}

/// Filter, sort, and pagination to apply on top of a table model
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    /// Case-insensitive substring match over label and cell displays
    pub filter: Option<String>,
    /// Single-column sort
    pub sort: Option<(SortColumn, SortDirection)>,
    /// Fixed-size pagination, applied after filter and sort
    pub page: Option<PageRequest>,
}

/// A filtered/sorted/paginated slice of a table model
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// Rows on the requested page
    pub rows: Vec<Row>,
    /// Rows that matched the filter, across all pages
    pub matched: usize,
    /// Total pages at the requested page size (1 when unpaginated)
    pub page_count: usize,
}

/// Renderable table model: one row per entity, one column per field
///
/// The aggregate entity appears as a synthetic `"Total"` row. Rows are in
/// entity-id order, which is deterministic for identical inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableModel {
    /// Columns in payload order
    pub columns: Vec<Column>,
    /// Rows in entity-id order
    pub rows: Vec<Row>,
}

impl TableModel {
    /// Apply a query, returning the visible slice
    pub fn view(&self, query: &TableQuery) -> TableView {
        let mut rows: Vec<&Row> = self
            .rows
            .iter()
            .filter(|row| match query.filter.as_deref() {
                Some(needle) if !needle.is_empty() => row_matches(row, needle),
                _ => true,
            })
            .collect();

        if let Some((column, direction)) = query.sort {
            // stable sort keeps equal rows in entity order
            rows.sort_by(|a, b| compare_rows(a, b, column, direction));
        }

        let matched = rows.len();
        let (rows, page_count) = match query.page {
            Some(page) if page.size > 0 => {
                let page_count = ((matched + page.size - 1) / page.size).max(1);
                let start = page.index.min(page_count - 1) * page.size;
                let slice = rows
                    .into_iter()
                    .skip(start)
                    .take(page.size)
                    .cloned()
                    .collect();
                (slice, page_count)
            }
            _ => (rows.into_iter().cloned().collect(), 1),
        };

        TableView {
            rows,
            matched,
            page_count,
        }
    }
}

/// Case-insensitive substring match over the row's visible values
fn row_matches(row: &Row, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if row.label.to_lowercase().contains(&needle) {
        return true;
    }
    row.cells
        .iter()
        .any(|cell| cell.display.to_lowercase().contains(&needle))
}

/// Row comparison: numeric when both sides read numeric, string otherwise;
/// missing cells always order last, in either direction
fn compare_rows(a: &Row, b: &Row, column: SortColumn, direction: SortDirection) -> Ordering {
    let ordering = match column {
        SortColumn::Label => compare_text(&a.label, &b.label),
        SortColumn::Field(index) => {
            let (left, right) = (a.cells.get(index), b.cells.get(index));
            let left_missing = left.map_or(true, |c| c.missing);
            let right_missing = right.map_or(true, |c| c.missing);
            match (left_missing, right_missing) {
                (true, true) => return Ordering::Equal,
                (true, false) => return Ordering::Greater,
                (false, true) => return Ordering::Less,
                (false, false) => compare_cells(left.unwrap(), right.unwrap()),
            }
        }
    };
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    if let (Some(x), Some(y)) = (a.numeric, b.numeric) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    compare_text(&a.display, &b.display)
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Build the table model for a payload over a result set
pub(crate) fn build(payload: &PayloadDescription, data: &DashboardData) -> TableModel {
    let columns: Vec<Column> = payload
        .fields()
        .map(|field| Column {
            section: field.section.to_string(),
            key: field.key.to_string(),
            title: field.label.to_string(),
        })
        .collect();

    let fields: Vec<_> = payload.fields().collect();
    let rows = data
        .values
        .keys()
        .map(|entity| {
            let label = if entity == AGGREGATE_ID {
                "Total".to_string()
            } else {
                data.agent_name(entity).unwrap_or(entity).to_string()
            };
            let cells = fields
                .iter()
                .map(|field| {
                    data.value_at(entity, field.section, field.key)
                        .and_then(|raw| {
                            format::display_value(raw, field.kind).map(|display| Cell {
                                numeric: format::numeric_value(raw),
                                display,
                                missing: false,
                            })
                        })
                        .unwrap_or_else(Cell::missing_cell)
                })
                .collect();
            Row {
                entity_id: entity.clone(),
                label,
                cells,
            }
        })
        .collect();

    TableModel { columns, rows }
}
