//! Datalake API: the per-environment SDX datalake.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{Client, PageSpec};
use crate::error::Error;

use super::types::items;

/// Client for Datalake operations.
///
/// Access via [`Client::datalake`](crate::Client::datalake).
#[derive(Clone, Debug)]
pub struct DatalakeClient {
    client: Client,
}

impl DatalakeClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Lists datalakes, optionally filtered to one environment, draining all
    /// pages.
    pub async fn list_datalakes(
        &self,
        environment_name: Option<&str>,
    ) -> Result<Vec<Datalake>, Error> {
        let mut body = json!({});
        if let Some(name) = environment_name {
            body["environmentName"] = json!(name);
        }
        let response = self
            .client
            .inner()
            .post_paginated("/datalake/listDatalakes", body, &PageSpec::new("datalakes"))
            .await?;
        items(&response, "datalakes")
    }

    /// Finds the datalake attached to an environment.
    ///
    /// An environment carries at most one datalake; `None` when it has none.
    /// A control plane reporting more than one is an ambiguity the caller
    /// cannot resolve, so that is a fatal error rather than an arbitrary
    /// pick.
    pub async fn find_datalake(&self, environment_name: &str) -> Result<Option<Datalake>, Error> {
        let mut datalakes = self.list_datalakes(Some(environment_name)).await?;
        match datalakes.len() {
            0 => Ok(None),
            1 => Ok(datalakes.pop()),
            n => Err(Error::ambiguous(format!(
                "environment '{}' reports {} datalakes",
                environment_name, n
            ))),
        }
    }
}

/// A datalake record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datalake {
    /// The datalake name.
    pub datalake_name: String,
    /// The datalake CRN.
    pub crn: String,
    /// CRN of the environment the datalake is attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_crn: Option<String>,
    /// Current lifecycle status, e.g. `RUNNING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// When the datalake was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    /// Fields beyond the summary set, passed through untyped.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
