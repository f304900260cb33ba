//! Consumption API: metered usage records.

use serde::Serialize;

use crate::client::{Client, PageSpec};
use crate::error::Error;

use super::types::items;

/// Client for Consumption operations.
///
/// Access via [`Client::consumption`](crate::Client::consumption).
#[derive(Clone, Debug)]
pub struct ConsumptionClient {
    client: Client,
}

impl ConsumptionClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Lists compute usage records for a time window, draining all pages.
    ///
    /// Records are returned untyped; their schema varies by workload type
    /// and billing plan.
    pub async fn list_compute_usage_records(
        &self,
        request: ListComputeUsageRecordsRequest,
    ) -> Result<Vec<serde_json::Value>, Error> {
        let body = serde_json::to_value(&request)?;
        let response = self
            .client
            .inner()
            .post_paginated(
                "/consumption/listComputeUsageRecords",
                body,
                &PageSpec::new("records"),
            )
            .await?;
        items(&response, "records")
    }
}

/// Request for compute usage records over a half-open time window.
///
/// Timestamps are RFC 3339 strings, as the control plane expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListComputeUsageRecordsRequest {
    /// Start of the window, inclusive.
    pub from_timestamp: String,
    /// End of the window, exclusive.
    pub to_timestamp: String,
    /// Page size hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl ListComputeUsageRecordsRequest {
    /// Creates a request covering `[from, to)`.
    pub fn new(from_timestamp: impl Into<String>, to_timestamp: impl Into<String>) -> Self {
        Self {
            from_timestamp: from_timestamp.into(),
            to_timestamp: to_timestamp.into(),
            page_size: None,
        }
    }
}
