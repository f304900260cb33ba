//! Machine Learning API: Cloudera ML workspaces.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{Client, PageSpec};
use crate::error::{Error, ErrorKind};
use crate::reconcile::ResourceHandler;

use super::types::{field, items, none_on_not_found};

/// Client for Machine Learning operations.
///
/// Access via [`Client::ml`](crate::Client::ml).
#[derive(Clone, Debug)]
pub struct MlClient {
    client: Client,
}

impl MlClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Lists ML workspaces, optionally filtered to one environment, draining
    /// all pages.
    pub async fn list_workspaces(
        &self,
        environment_name: Option<&str>,
    ) -> Result<Vec<Workspace>, Error> {
        let mut body = json!({});
        if let Some(name) = environment_name {
            body["environmentName"] = json!(name);
        }
        let response = self
            .client
            .inner()
            .post_paginated("/ml/listWorkspaces", body, &PageSpec::new("workspaces"))
            .await?;
        items(&response, "workspaces")
    }

    /// Describes one workspace by name within an environment, `None` when
    /// absent.
    pub async fn describe_workspace(
        &self,
        workspace_name: &str,
        environment_name: &str,
    ) -> Result<Option<Workspace>, Error> {
        let result = self
            .client
            .inner()
            .post(
                "/ml/describeWorkspace",
                &json!({
                    "workspaceName": workspace_name,
                    "environmentName": environment_name,
                }),
            )
            .await;
        match none_on_not_found(result)? {
            Some(response) => Ok(Some(field(&response, "workspace")?)),
            None => Ok(None),
        }
    }

    /// Provisions a workspace.
    ///
    /// Provisioning is asynchronous; the call returns once the request is
    /// accepted and the workspace then moves through provisioning statuses.
    /// Fetch the record with [`describe_workspace`](Self::describe_workspace).
    pub async fn create_workspace(&self, request: CreateWorkspaceRequest) -> Result<(), Error> {
        let body = serde_json::to_value(&request)?;
        self.client.inner().post("/ml/createWorkspace", &body).await?;
        Ok(())
    }

    /// Deletes a workspace. `force` skips the pre-delete validation checks.
    pub async fn delete_workspace(
        &self,
        workspace_name: &str,
        environment_name: &str,
        force: bool,
    ) -> Result<(), Error> {
        self.client
            .inner()
            .post(
                "/ml/deleteWorkspace",
                &json!({
                    "workspaceName": workspace_name,
                    "environmentName": environment_name,
                    "force": force,
                }),
            )
            .await?;
        Ok(())
    }
}

/// An ML workspace record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// The workspace name, unique within its environment.
    #[serde(rename = "instanceName")]
    pub workspace_name: String,
    /// The environment the workspace lives in.
    pub environment_name: String,
    /// The workspace CRN.
    pub crn: String,
    /// Current lifecycle status, e.g. `installation:finished`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_status: Option<String>,
    /// The workspace URL, once provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_url: Option<String>,
    /// When the workspace was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    /// Fields beyond the summary set, passed through untyped.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Request to provision an ML workspace.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceRequest {
    /// The workspace name.
    pub workspace_name: String,
    /// The environment to provision into.
    pub environment_name: String,
    /// Whether to front the workspace with a public load balancer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_public_load_balancer: Option<bool>,
    /// Whether to disable TLS on the workspace endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_tls: Option<bool>,
    /// Provisioning knobs that vary by cloud platform (instance groups,
    /// autoscaling), passed through untyped.
    #[serde(flatten)]
    pub provision_k8s_request: serde_json::Map<String, serde_json::Value>,
}

impl CreateWorkspaceRequest {
    /// Creates a request for the given workspace and environment.
    pub fn new(workspace_name: impl Into<String>, environment_name: impl Into<String>) -> Self {
        Self {
            workspace_name: workspace_name.into(),
            environment_name: environment_name.into(),
            use_public_load_balancer: None,
            disable_tls: None,
            provision_k8s_request: serde_json::Map::new(),
        }
    }

    /// Fronts the workspace with a public load balancer.
    #[must_use]
    pub fn with_public_load_balancer(mut self, public: bool) -> Self {
        self.use_public_load_balancer = Some(public);
        self
    }
}

/// Declarative state for one ML workspace.
///
/// Workspaces are created and deleted, never updated in place; drift in
/// provisioning parameters requires a delete and re-create, which the
/// reconciler does not do implicitly.
#[derive(Debug, Clone)]
pub struct WorkspaceState {
    ml: MlClient,
    request: CreateWorkspaceRequest,
    force_delete: bool,
}

impl WorkspaceState {
    /// Declares a workspace from its provisioning request.
    pub fn new(ml: MlClient, request: CreateWorkspaceRequest) -> Self {
        Self {
            ml,
            request,
            force_delete: false,
        }
    }

    /// Skips pre-delete validation when the workspace is declared absent.
    #[must_use]
    pub fn with_force_delete(mut self, force: bool) -> Self {
        self.force_delete = force;
        self
    }
}

#[async_trait]
impl ResourceHandler for WorkspaceState {
    type Resource = Workspace;

    async fn find(&self) -> Result<Option<Workspace>, Error> {
        self.ml
            .describe_workspace(&self.request.workspace_name, &self.request.environment_name)
            .await
    }

    fn needs_update(&self, _current: &Workspace) -> bool {
        false
    }

    async fn create(&self) -> Result<Workspace, Error> {
        self.ml.create_workspace(self.request.clone()).await?;
        // The accepted workspace is visible immediately, in a provisioning
        // status.
        match self.find().await? {
            Some(workspace) => Ok(workspace),
            None => Err(Error::new(
                ErrorKind::InvalidResponse,
                format!(
                    "workspace '{}' not visible after create was accepted",
                    self.request.workspace_name
                ),
            )),
        }
    }

    async fn update(&self, _current: &Workspace) -> Result<Workspace, Error> {
        Err(Error::invalid_argument(
            "workspaces cannot be updated in place",
        ))
    }

    async fn delete(&self, _current: &Workspace) -> Result<(), Error> {
        self.ml
            .delete_workspace(
                &self.request.workspace_name,
                &self.request.environment_name,
                self.force_delete,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_serializes_camel_case() {
        let request = CreateWorkspaceRequest::new("ws", "env").with_public_load_balancer(true);
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(
            value,
            json!({
                "workspaceName": "ws",
                "environmentName": "env",
                "usePublicLoadBalancer": true
            })
        );
    }

    #[test]
    fn test_workspace_deserializes_instance_name() {
        let workspace: Workspace = serde_json::from_value(json!({
            "instanceName": "ws",
            "environmentName": "env",
            "crn": "crn:ws",
            "instanceStatus": "installation:finished",
            "instanceUrl": "https://ws.example"
        }))
        .unwrap();
        assert_eq!(workspace.workspace_name, "ws");
        assert_eq!(
            workspace.instance_status.as_deref(),
            Some("installation:finished")
        );
    }
}
