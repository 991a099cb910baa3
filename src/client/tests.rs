//! Tests for client request shapes (no network)

use super::dashboard::DataRequest;
use super::*;
use crate::payload::PayloadDescription;
use crate::session::ChatRequest;
use chrono::TimeZone;
use serde_json::json;

fn demo_payload() -> PayloadDescription {
    serde_json::from_value(json!({
        "keyToFieldList": { "demo": [{ "key": "calls", "displayName": "Calls" }] }
    }))
    .unwrap()
}

#[test]
fn test_chat_request_wire_shape() {
    let request = ChatRequest {
        user_message: "show volumes".to_string(),
        is_new_thread: true,
        thread_id: String::new(),
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["user_message"], "show volumes");
    assert_eq!(value["isNewThread"], true);
    assert_eq!(value["thread_id"], "");
}

#[test]
fn test_data_request_merges_payload_and_filter() {
    let payload = demo_payload();
    let filter = DashboardFilter {
        start_date: 1_000,
        end_date: 2_000,
        not_fetch_emp_data: false,
    };
    let value = serde_json::to_value(DataRequest {
        payload: &payload,
        filter: &filter,
    })
    .unwrap();

    // the payload flattens to the top level, the filter nests beside it
    assert_eq!(value["keyToFieldList"]["demo"][0]["key"], "calls");
    assert_eq!(value["filter"]["startDate"], 1_000);
    assert_eq!(value["filter"]["endDate"], 2_000);
    assert_eq!(value["filter"]["notFetchEmpData"], false);
}

#[test]
fn test_filter_for_day_covers_the_whole_day() {
    let moment = chrono::Utc
        .with_ymd_and_hms(2025, 7, 15, 13, 45, 12)
        .unwrap();
    let filter = DashboardFilter::for_day(moment);

    assert_eq!(filter.start_date, 1_752_537_600_000);
    assert_eq!(filter.end_date, 1_752_623_999_999);
    assert_eq!(filter.end_date - filter.start_date, 86_400_000 - 1);
    assert!(!filter.not_fetch_emp_data);
}

#[test]
fn test_save_config_request_wire_shape() {
    let request =
        SaveConfigRequest::new(&demo_payload(), "bar", "thread-1", "Sales Q4").unwrap();
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["chartType"], "bar");
    assert_eq!(value["threadId"], "thread-1");
    assert_eq!(value["dashboardName"], "Sales Q4");
    // the stored payload is a string, decodable back into the same shape
    let stored: PayloadDescription =
        serde_json::from_str(value["payload"].as_str().unwrap()).unwrap();
    assert_eq!(stored, demo_payload());
}
