//! Tests for the projection engine

use super::*;
use crate::payload::{DashboardData, PayloadDescription};
use serde_json::json;

fn payload(value: serde_json::Value) -> PayloadDescription {
    serde_json::from_value(value).unwrap()
}

fn data(value: serde_json::Value) -> DashboardData {
    serde_json::from_value(value).unwrap()
}

fn demo_payload() -> PayloadDescription {
    payload(json!({
        "keyToFieldList": {
            "demo": [
                { "key": "calls", "displayName": "Calls" },
                { "key": "csat", "displayName": "CSAT", "type": "percentage" }
            ]
        }
    }))
}

#[test]
fn test_chart_kind_parse() {
    assert_eq!(ChartKind::parse(""), ChartKind::Table);
    assert_eq!(ChartKind::parse("table"), ChartKind::Table);
    assert_eq!(ChartKind::parse("Bar"), ChartKind::Bar);
    assert_eq!(ChartKind::parse(" pie "), ChartKind::Pie);
    assert_eq!(
        ChartKind::parse("scatter"),
        ChartKind::Custom("scatter".to_string())
    );
}

#[test]
fn test_empty_payload_is_nothing_to_display() {
    let empty = payload(json!({ "keyToFieldList": {} }));
    let result = project(&empty, Some(&DashboardData::default()), &ChartKind::Table);
    assert_eq!(result, Projection::NothingToDisplay);
}

#[test]
fn test_absent_or_empty_data_is_no_data() {
    let description = demo_payload();
    assert_eq!(
        project(&description, None, &ChartKind::Table),
        Projection::NoData
    );
    assert_eq!(
        project(&description, Some(&DashboardData::default()), &ChartKind::Bar),
        Projection::NoData
    );
}

#[test]
fn test_bar_series_scenario() {
    let description = payload(json!({
        "keyToFieldList": { "demo": [{ "key": "calls", "displayName": "Calls" }] }
    }));
    let results = data(json!({
        "agentIdtoFieldToFieldValueMap": {
            "-20": { "demo": { "calls": { "value": "42" } } }
        }
    }));

    match project(&description, Some(&results), &ChartKind::Bar) {
        Projection::Series(series) => {
            assert_eq!(series.chart_type, "bar");
            assert_eq!(series.points.len(), 1);
            assert_eq!(series.points[0].name, "Calls");
            assert_eq!(series.points[0].value, 42.0);
            assert!(!series.points[0].missing);
            assert_eq!(series.points[0].color, PALETTE[0]);
            assert_eq!(series.axis_labels, vec!["Calls"]);
        }
        other => panic!("expected series, got {other:?}"),
    }
}

#[test]
fn test_series_reads_only_the_aggregate_entity() {
    let description = demo_payload();
    let results = data(json!({
        "agentIdtoFieldToFieldValueMap": {
            "-20": { "demo": { "calls": { "value": 10 }, "csat": { "value": 90 } } },
            "7":   { "demo": { "calls": { "value": 999 }, "csat": { "value": 1 } } }
        }
    }));

    let Projection::Series(series) = project(&description, Some(&results), &ChartKind::Line)
    else {
        panic!("expected series");
    };
    let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![10.0, 90.0]);
}

#[test]
fn test_series_missing_point_keeps_its_slot() {
    let description = demo_payload();
    let results = data(json!({
        "agentIdtoFieldToFieldValueMap": {
            "-20": { "demo": { "csat": { "value": "87.5" } } }
        }
    }));

    let Projection::Series(series) = project(&description, Some(&results), &ChartKind::Bar)
    else {
        panic!("expected series");
    };
    assert_eq!(series.points.len(), 2);

    // calls is absent: zero value, muted color, still first on the axis
    assert_eq!(series.points[0].value, 0.0);
    assert!(series.points[0].missing);
    assert_eq!(series.points[0].color, MISSING_COLOR);

    assert_eq!(series.points[1].value, 87.5);
    assert!(!series.points[1].missing);
    assert_eq!(series.axis_labels, vec!["Calls", "CSAT"]);
}

#[test]
fn test_series_lenient_numeric_parse() {
    let description = payload(json!({
        "keyToFieldList": { "demo": [
            { "key": "a" }, { "key": "b" }, { "key": "c" }
        ] }
    }));
    let results = data(json!({
        "agentIdtoFieldToFieldValueMap": {
            "-20": { "demo": {
                "a": { "value": "42 calls" },
                "b": { "value": "n/a" },
                "c": { "value": null }
            } }
        }
    }));

    let Projection::Series(series) = project(&description, Some(&results), &ChartKind::Bar)
    else {
        panic!("expected series");
    };
    assert_eq!(series.points[0].value, 42.0);
    assert!(!series.points[0].missing);
    // unparseable and null both become zero-valued missing points
    assert_eq!(series.points[1].value, 0.0);
    assert!(series.points[1].missing);
    assert_eq!(series.points[2].value, 0.0);
    assert!(series.points[2].missing);
}

#[test]
fn test_pie_series_has_no_axis_labels() {
    let description = demo_payload();
    let results = data(json!({
        "agentIdtoFieldToFieldValueMap": {
            "-20": { "demo": { "calls": { "value": 1 }, "csat": { "value": 2 } } }
        }
    }));

    let Projection::Series(series) = project(&description, Some(&results), &ChartKind::Pie)
    else {
        panic!("expected series");
    };
    assert_eq!(series.chart_type, "pie");
    assert!(series.axis_labels.is_empty());
    assert_eq!(series.points.len(), 2);
}

#[test]
fn test_palette_cycles_by_position() {
    let fields: Vec<serde_json::Value> =
        (0..12).map(|i| json!({ "key": format!("f{i}") })).collect();
    let description = payload(json!({ "keyToFieldList": { "demo": fields } }));
    let mut cells = serde_json::Map::new();
    for i in 0..12 {
        cells.insert(format!("f{i}"), json!({ "value": i }));
    }
    let results = data(json!({
        "agentIdtoFieldToFieldValueMap": { "-20": { "demo": cells } }
    }));

    let Projection::Series(series) = project(&description, Some(&results), &ChartKind::Bar)
    else {
        panic!("expected series");
    };
    assert_eq!(series.points[0].color, PALETTE[0]);
    assert_eq!(series.points[9].color, PALETTE[9]);
    assert_eq!(series.points[10].color, PALETTE[0]);
    assert_eq!(series.points[11].color, PALETTE[1]);
}

fn table_fixture() -> (PayloadDescription, DashboardData) {
    let description = payload(json!({
        "keyToFieldList": {
            "perf": [
                { "key": "calls", "displayName": "Calls", "type": "number" },
                { "key": "revenue", "displayName": "Revenue", "type": "currency" },
                { "key": "csat", "displayName": "CSAT", "type": "percentage" },
                { "key": "joined", "displayName": "Joined", "type": "date" }
            ]
        }
    }));
    let results = data(json!({
        "agentIdtoFieldToFieldValueMap": {
            "-20": { "perf": {
                "calls": { "value": 1234567 },
                "revenue": { "value": 98765.4 },
                "csat": { "value": 87 }
            } },
            "7": { "perf": {
                "calls": { "value": "312" },
                "revenue": { "value": { "unexpected": "object" } },
                "joined": { "value": 1752537600000i64 }
            } },
            "9": { "perf": {
                "calls": { "value": 401 }
            } }
        },
        "agentIdtoAgentDetailMap": {
            "7": { "name": "Dana" }
        }
    }));
    (description, results)
}

#[test]
fn test_table_rows_and_labels() {
    let (description, results) = table_fixture();
    let Projection::Table(table) = project(&description, Some(&results), &ChartKind::Table)
    else {
        panic!("expected table");
    };

    assert_eq!(table.columns.len(), 4);
    assert_eq!(table.columns[1].title, "Revenue");

    // entity-id order: the aggregate sentinel sorts first
    let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Total", "Dana", "9"]);
}

#[test]
fn test_table_cell_formatting() {
    let (description, results) = table_fixture();
    let Projection::Table(table) = project(&description, Some(&results), &ChartKind::Table)
    else {
        panic!("expected table");
    };

    let total = &table.rows[0];
    assert_eq!(total.cells[0].display, "1,234,567");
    assert_eq!(total.cells[1].display, "$98,765.40");
    assert_eq!(total.cells[2].display, "87.0%");
    // no joined value for the aggregate
    assert_eq!(total.cells[3].display, "-");
    assert!(total.cells[3].missing);

    let dana = &table.rows[1];
    assert_eq!(dana.cells[0].display, "312");
    assert_eq!(dana.cells[0].numeric, Some(312.0));
    // structured values are not displayable
    assert_eq!(dana.cells[1].display, "-");
    assert!(dana.cells[1].missing);
    assert_eq!(dana.cells[3].display, "07/15/2025");
}

#[test]
fn test_table_filter_is_case_insensitive() {
    let (description, results) = table_fixture();
    let Projection::Table(table) = project(&description, Some(&results), &ChartKind::Table)
    else {
        panic!("expected table");
    };

    let view = table.view(&TableQuery {
        filter: Some("dana".to_string()),
        ..TableQuery::default()
    });
    assert_eq!(view.matched, 1);
    assert_eq!(view.rows[0].label, "Dana");

    // matches cell content too
    let view = table.view(&TableQuery {
        filter: Some("98,765".to_string()),
        ..TableQuery::default()
    });
    assert_eq!(view.matched, 1);
    assert_eq!(view.rows[0].label, "Total");
}

#[test]
fn test_table_sort_missing_always_last() {
    let (description, results) = table_fixture();
    let Projection::Table(table) = project(&description, Some(&results), &ChartKind::Table)
    else {
        panic!("expected table");
    };

    // revenue: Total has a value, Dana's is an object (missing), 9 is absent
    let ascending = table.view(&TableQuery {
        sort: Some((SortColumn::Field(1), SortDirection::Ascending)),
        ..TableQuery::default()
    });
    let labels: Vec<&str> = ascending.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Total", "Dana", "9"]);

    let descending = table.view(&TableQuery {
        sort: Some((SortColumn::Field(1), SortDirection::Descending)),
        ..TableQuery::default()
    });
    let labels: Vec<&str> = descending.rows.iter().map(|r| r.label.as_str()).collect();
    // direction flips the valued rows but missing rows stay at the end
    assert_eq!(labels[0], "Total");
    assert_eq!(&labels[1..], &["Dana", "9"]);
}

#[test]
fn test_table_numeric_sort() {
    let (description, results) = table_fixture();
    let Projection::Table(table) = project(&description, Some(&results), &ChartKind::Table)
    else {
        panic!("expected table");
    };

    let ascending = table.view(&TableQuery {
        sort: Some((SortColumn::Field(0), SortDirection::Ascending)),
        ..TableQuery::default()
    });
    let calls: Vec<Option<f64>> = ascending
        .rows
        .iter()
        .map(|r| r.cells[0].numeric)
        .collect();
    assert_eq!(calls, vec![Some(312.0), Some(401.0), Some(1234567.0)]);

    let descending = table.view(&TableQuery {
        sort: Some((SortColumn::Field(0), SortDirection::Descending)),
        ..TableQuery::default()
    });
    let calls: Vec<Option<f64>> = descending
        .rows
        .iter()
        .map(|r| r.cells[0].numeric)
        .collect();
    assert_eq!(calls, vec![Some(1234567.0), Some(401.0), Some(312.0)]);
}

#[test]
fn test_table_label_sort_and_pagination() {
    let (description, results) = table_fixture();
    let Projection::Table(table) = project(&description, Some(&results), &ChartKind::Table)
    else {
        panic!("expected table");
    };

    let query = TableQuery {
        sort: Some((SortColumn::Label, SortDirection::Ascending)),
        page: Some(PageRequest { index: 0, size: 2 }),
        ..TableQuery::default()
    };
    let first = table.view(&query);
    assert_eq!(first.matched, 3);
    assert_eq!(first.page_count, 2);
    let labels: Vec<&str> = first.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["9", "Dana"]);

    let second = table.view(&TableQuery {
        page: Some(PageRequest { index: 1, size: 2 }),
        ..query.clone()
    });
    assert_eq!(second.rows.len(), 1);
    assert_eq!(second.rows[0].label, "Total");

    // out-of-range pages clamp to the last page
    let clamped = table.view(&TableQuery {
        page: Some(PageRequest { index: 9, size: 2 }),
        ..query
    });
    assert_eq!(clamped.rows[0].label, "Total");
}

#[test]
fn test_projection_is_deterministic() {
    let (description, results) = table_fixture();
    let first = project(&description, Some(&results), &ChartKind::Table);
    let second = project(&description, Some(&results), &ChartKind::Table);
    assert_eq!(first, second);

    let first = project(&description, Some(&results), &ChartKind::Pie);
    let second = project(&description, Some(&results), &ChartKind::Pie);
    assert_eq!(first, second);
}
