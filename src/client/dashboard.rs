//! Analytics data and dashboard config endpoints.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult};
use crate::history::HistoryRecord;
use crate::payload::{DashboardData, PayloadDescription};

/// Day-range filter sent with every dashboard data request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilter {
    /// Range start, epoch milliseconds inclusive
    #[serde(rename = "startDate")]
    pub start_date: i64,
    /// Range end, epoch milliseconds inclusive
    #[serde(rename = "endDate")]
    pub end_date: i64,
    /// Backend switch to skip per-employee data
    #[serde(rename = "notFetchEmpData")]
    pub not_fetch_emp_data: bool,
}

impl DashboardFilter {
    /// Whole-day filter around `moment`: midnight through 23:59:59.999 UTC
    ///
    /// The caller supplies the moment (usually "now"); the core itself never
    /// reads the clock.
    pub fn for_day(moment: DateTime<Utc>) -> Self {
        const DAY_MS: i64 = 86_400_000;
        let start = moment.timestamp_millis().div_euclid(DAY_MS) * DAY_MS;
        Self {
            start_date: start,
            end_date: start + DAY_MS - 1,
            not_fetch_emp_data: false,
        }
    }
}

/// Wire shape of a data request: the payload with a filter alongside
#[derive(Serialize)]
pub(super) struct DataRequest<'a> {
    #[serde(flatten)]
    pub(super) payload: &'a PayloadDescription,
    pub(super) filter: &'a DashboardFilter,
}

/// Wire shape for saving a dashboard config
///
/// The backend stores the payload as a string, so it is stringified here
/// rather than nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveConfigRequest {
    /// Stringified payload description JSON
    pub payload: String,
    /// Chart hint to restore with
    #[serde(rename = "chartType")]
    pub chart_type: String,
    /// Thread the dashboard came from
    #[serde(rename = "threadId")]
    pub thread_id: String,
    /// Name the user gave the dashboard
    #[serde(rename = "dashboardName")]
    pub dashboard_name: String,
}

impl SaveConfigRequest {
    /// Build a save request from typed parts
    pub fn new(
        payload: &PayloadDescription,
        chart_type: impl Into<String>,
        thread_id: impl Into<String>,
        dashboard_name: impl Into<String>,
    ) -> ApiResult<Self> {
        Ok(Self {
            payload: serde_json::to_string(payload)?,
            chart_type: chart_type.into(),
            thread_id: thread_id.into(),
            dashboard_name: dashboard_name.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: HashMap<String, Vec<HistoryRecord>>,
}

/// Client for the analytics and dashboard-config endpoints
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    /// Create a client for a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{}{}", base, path)
    }

    async fn check(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Fetch the result set for a payload description
    pub async fn fetch_data(
        &self,
        payload: &PayloadDescription,
        filter: &DashboardFilter,
    ) -> ApiResult<DashboardData> {
        let response = self
            .client
            .post(self.api_url("/dashboard/performance-dashboard"))
            .json(&DataRequest { payload, filter })
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<DashboardData>().await?)
    }

    /// Fetch all stored conversations: thread id → records
    pub async fn history(&self) -> ApiResult<HashMap<String, Vec<HistoryRecord>>> {
        let response = self
            .client
            .get(self.api_url("/get-all-dashboard-conv-config"))
            .send()
            .await?;
        let response = Self::check(response).await?;
        let envelope = response.json::<HistoryEnvelope>().await?;
        if !envelope.success {
            return Err(ApiError::Api(
                "history endpoint reported failure".to_string(),
            ));
        }
        Ok(envelope.data)
    }

    /// Store a dashboard config
    pub async fn save_config(&self, request: &SaveConfigRequest) -> ApiResult<()> {
        let response = self
            .client
            .post(self.api_url("/save-config"))
            .json(request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Delete the dashboard config stored for a thread
    pub async fn delete_config(&self, thread_id: &str) -> ApiResult<()> {
        let response = self
            .client
            .get(self.api_url("/delete-config-by-threadId"))
            .query(&[("threadId", thread_id)])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let client = DashboardClient::new("http://127.0.0.1:9000");
        assert_eq!(
            client.api_url("/save-config"),
            "http://127.0.0.1:9000/save-config"
        );
    }

    #[test]
    fn test_api_url_with_trailing_slash() {
        let client = DashboardClient::new("http://127.0.0.1:9000/");
        assert_eq!(
            client.api_url("/save-config"),
            "http://127.0.0.1:9000/save-config"
        );
    }
}
