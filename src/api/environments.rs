//! Environments API: environment and cloud credential catalogs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{Client, PageSpec};
use crate::error::Error;

use super::types::{field, items, none_on_not_found};

/// Client for Environments operations.
///
/// Access via [`Client::environments`](crate::Client::environments).
#[derive(Clone, Debug)]
pub struct EnvironmentsClient {
    client: Client,
}

impl EnvironmentsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Lists all environments in the account, draining all pages.
    pub async fn list_environments(&self) -> Result<Vec<Environment>, Error> {
        let response = self
            .client
            .inner()
            .post_paginated(
                "/environments2/listEnvironments",
                json!({}),
                &PageSpec::new("environments"),
            )
            .await?;
        items(&response, "environments")
    }

    /// Describes one environment by name or CRN.
    ///
    /// The summary record from `listEnvironments` omits fields like the
    /// network and security access configuration; this returns the full
    /// record. `None` when the environment does not exist.
    pub async fn describe_environment(&self, name: &str) -> Result<Option<Environment>, Error> {
        let result = self
            .client
            .inner()
            .post(
                "/environments2/describeEnvironment",
                &json!({ "environmentName": name }),
            )
            .await;
        match none_on_not_found(result)? {
            Some(response) => Ok(Some(field(&response, "environment")?)),
            None => Ok(None),
        }
    }

    /// Deletes an environment by name.
    ///
    /// `cascading` also tears down resources attached to the environment.
    /// Deletion is asynchronous; the environment transitions through a
    /// freeing status before disappearing from the catalog.
    pub async fn delete_environment(&self, name: &str, cascading: bool) -> Result<(), Error> {
        self.client
            .inner()
            .post(
                "/environments2/deleteEnvironment",
                &json!({ "environmentName": name, "cascading": cascading }),
            )
            .await?;
        Ok(())
    }

    /// Lists the cloud provider credentials registered in the account,
    /// draining all pages.
    pub async fn list_credentials(&self) -> Result<Vec<serde_json::Value>, Error> {
        let response = self
            .client
            .inner()
            .post_paginated(
                "/environments2/listCredentials",
                json!({}),
                &PageSpec::new("credentials"),
            )
            .await?;
        items(&response, "credentials")
    }
}

/// An environment record.
///
/// Fields beyond the common summary set vary by cloud platform and by
/// whether the record came from a list or a describe call; they are kept
/// in [`extra`](Environment::extra) untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// The environment name, unique within the account.
    pub environment_name: String,
    /// The environment CRN.
    pub crn: String,
    /// Current lifecycle status, e.g. `AVAILABLE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// The cloud platform, e.g. `AWS`, `AZURE`, `GCP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_platform: Option<String>,
    /// The cloud region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// The registered credential backing the environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_name: Option<String>,
    /// When the environment was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Platform-specific and describe-only fields, passed through untyped.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
