//! Data Engineering API: DE services and virtual clusters.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::Client;
use crate::error::Error;

use super::types::{field, items, none_on_not_found};

/// Client for Data Engineering operations.
///
/// Access via [`Client::de`](crate::Client::de).
#[derive(Clone, Debug)]
pub struct DeClient {
    client: Client,
}

impl DeClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Lists DE services, optionally including ones that have been disabled.
    pub async fn list_services(&self, remove_deleted: bool) -> Result<Vec<DeService>, Error> {
        let response = self
            .client
            .inner()
            .post("/de/listServices", &json!({ "removeDeleted": remove_deleted }))
            .await?;
        items(&response, "services")
    }

    /// Describes one DE service by cluster ID, `None` when absent.
    pub async fn describe_service(&self, cluster_id: &str) -> Result<Option<DeService>, Error> {
        let result = self
            .client
            .inner()
            .post("/de/describeService", &json!({ "clusterId": cluster_id }))
            .await;
        match none_on_not_found(result)? {
            Some(response) => Ok(Some(field(&response, "service")?)),
            None => Ok(None),
        }
    }

    /// Enables a DE service in an environment.
    ///
    /// Enablement is asynchronous; the returned record starts in an enabling
    /// status.
    pub async fn enable_service(&self, request: EnableServiceRequest) -> Result<DeService, Error> {
        let body = serde_json::to_value(&request)?;
        let response = self.client.inner().post("/de/enableService", &body).await?;
        field(&response, "service")
    }

    /// Disables a DE service. `force` tears it down without waiting for
    /// running workloads.
    pub async fn disable_service(&self, cluster_id: &str, force: bool) -> Result<(), Error> {
        self.client
            .inner()
            .post(
                "/de/disableService",
                &json!({ "clusterId": cluster_id, "force": force }),
            )
            .await?;
        Ok(())
    }

    /// Lists the virtual clusters within a DE service.
    pub async fn list_virtual_clusters(
        &self,
        cluster_id: &str,
    ) -> Result<Vec<VirtualCluster>, Error> {
        let response = self
            .client
            .inner()
            .post("/de/listVcs", &json!({ "clusterId": cluster_id }))
            .await?;
        items(&response, "vcs")
    }
}

/// A DE service record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeService {
    /// The service's cluster ID, the stable identifier for all DE calls.
    pub cluster_id: String,
    /// The service name.
    pub name: String,
    /// The environment the service is enabled in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_name: Option<String>,
    /// Current lifecycle status, e.g. `ClusterCreationCompleted`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Fields beyond the summary set, passed through untyped.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A DE virtual cluster record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualCluster {
    /// The virtual cluster ID.
    pub vc_id: String,
    /// The virtual cluster name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_name: Option<String>,
    /// Current lifecycle status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Fields beyond the summary set, passed through untyped.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Request to enable a DE service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableServiceRequest {
    /// The service name.
    pub name: String,
    /// The environment to enable the service in.
    pub env: String,
    /// Autoscaling ceiling in instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_instances: Option<u32>,
    /// Autoscaling floor in instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_instances: Option<u32>,
    /// Whether to expose a public endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_public_endpoint: Option<bool>,
    /// Platform-specific enablement knobs, passed through untyped.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EnableServiceRequest {
    /// Creates a request for the given service name and environment.
    pub fn new(name: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            env: env.into(),
            maximum_instances: None,
            minimum_instances: None,
            enable_public_endpoint: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Sets the autoscaling instance range.
    #[must_use]
    pub fn with_instance_range(mut self, minimum: u32, maximum: u32) -> Self {
        self.minimum_instances = Some(minimum);
        self.maximum_instances = Some(maximum);
        self
    }
}

#[cfg(test)]
mod wiremock_tests {
    use super::*;
    use crate::RetryConfig;
    use base64::Engine as _;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_client(server: &MockServer) -> crate::Client {
        crate::Client::builder()
            .base_url(server.uri())
            .credentials(crate::Credentials::new(
                "test_key",
                base64::engine::general_purpose::STANDARD.encode([1u8; 32]),
            ))
            .retry_config(RetryConfig::disabled())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_enable_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/de/enableService"))
            .and(body_json(json!({
                "name": "pipelines",
                "env": "prod",
                "minimumInstances": 1,
                "maximumInstances": 10
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "service": {
                    "clusterId": "cluster-1",
                    "name": "pipelines",
                    "status": "ClusterProvisioningStarted"
                }
            })))
            .mount(&server)
            .await;

        let service = mock_client(&server)
            .await
            .de()
            .enable_service(EnableServiceRequest::new("pipelines", "prod").with_instance_range(1, 10))
            .await
            .unwrap();
        assert_eq!(service.cluster_id, "cluster-1");
    }

    #[tokio::test]
    async fn test_describe_service_absorbs_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/de/describeService"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Service not found"
            })))
            .mount(&server)
            .await;

        let service = mock_client(&server)
            .await
            .de()
            .describe_service("ghost")
            .await
            .unwrap();
        assert!(service.is_none());
    }

    #[tokio::test]
    async fn test_list_virtual_clusters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/de/listVcs"))
            .and(body_json(json!({"clusterId": "cluster-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "vcs": [
                    {"vcId": "vc-1", "vcName": "etl", "status": "AppInstalled"},
                    {"vcId": "vc-2", "vcName": "adhoc"}
                ]
            })))
            .mount(&server)
            .await;

        let vcs = mock_client(&server)
            .await
            .de()
            .list_virtual_clusters("cluster-1")
            .await
            .unwrap();
        assert_eq!(vcs.len(), 2);
        assert_eq!(vcs[0].vc_id, "vc-1");
    }
}
