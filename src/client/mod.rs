//! Client types for connecting to the CDP control plane.
//!
//! [`Client`] owns the connection, credentials, retry policy, and debug
//! buffer for one invocation. Resource clients ([`IamClient`], etc.) are
//! thin views over a shared `Client` and are created through its accessor
//! methods.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cdp_control::{Client, CredentialSource};
//!
//! # async fn run() -> Result<(), cdp_control::Error> {
//! let client = Client::builder()
//!     .base_url("https://api.us-west-1.cdp.cloudera.com")
//!     .credential_source(CredentialSource::new().with_profile("default"))
//!     .build()?;
//!
//! let account = client.iam().get_account().await?;
//! println!("account: {}", account.account_id);
//! # Ok(())
//! # }
//! ```
//!
//! [`IamClient`]: crate::api::IamClient

mod builder;
mod debug_log;
mod inner;
mod pagination;

pub use builder::ClientBuilder;
pub use debug_log::DebugLog;
pub use pagination::PageSpec;

use std::sync::Arc;

use crate::api::{
    ConsumptionClient, DatalakeClient, DeClient, EnvironmentsClient, IamClient, MlClient,
};
use crate::error::Error;

/// The CDP control plane client.
///
/// This is the entry point for the SDK. One instance is constructed per
/// invocation; it may be cloned freely and shared across the resource
/// clients of that invocation (its configuration is immutable), but is never
/// reused across invocations — the debug log buffer is scoped to it.
///
/// ## Example
///
/// ```rust,no_run
/// use cdp_control::Client;
///
/// # async fn run() -> Result<(), cdp_control::Error> {
/// let client = Client::builder()
///     .base_url("https://api.us-west-1.cdp.cloudera.com")
///     .debug(true)
///     .build()?;
///
/// let groups = client.iam().list_groups(Default::default()).await?;
///
/// if let Some(log) = client.take_debug_log() {
///     eprintln!("{}", log.sdk_out);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) inner: Arc<inner::ClientInner>,
}

impl Client {
    /// Creates a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the access key requests are signed as.
    pub fn access_key(&self) -> &str {
        self.inner.access_key()
    }

    /// Drains the captured debug log for this invocation.
    ///
    /// Returns `None` unless the client was built with `debug(true)`. Taking
    /// the log empties the buffer; nothing is retained afterwards.
    pub fn take_debug_log(&self) -> Option<DebugLog> {
        self.inner.take_debug_log()
    }

    /// Returns a client for the IAM API (accounts, groups, machine users).
    pub fn iam(&self) -> IamClient {
        IamClient::new(self.clone())
    }

    /// Returns a client for the Environments API.
    pub fn environments(&self) -> EnvironmentsClient {
        EnvironmentsClient::new(self.clone())
    }

    /// Returns a client for the Datalake API.
    pub fn datalake(&self) -> DatalakeClient {
        DatalakeClient::new(self.clone())
    }

    /// Returns a client for the Machine Learning workspaces API.
    pub fn ml(&self) -> MlClient {
        MlClient::new(self.clone())
    }

    /// Returns a client for the Data Engineering API.
    pub fn de(&self) -> DeClient {
        DeClient::new(self.clone())
    }

    /// Returns a client for the Consumption API.
    pub fn consumption(&self) -> ConsumptionClient {
        ConsumptionClient::new(self.clone())
    }

    /// Makes a signed GET request to an arbitrary control plane path.
    ///
    /// Escape hatch for endpoints without a typed client. The path may
    /// include a query string.
    pub async fn get_raw(&self, path: &str) -> Result<serde_json::Value, Error> {
        self.inner.get(path).await
    }

    /// Makes a signed POST request to an arbitrary control plane path.
    ///
    /// Escape hatch for endpoints without a typed client. No pagination
    /// handling; the raw response page comes back as-is.
    pub async fn post_raw(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        self.inner.post(path, body).await
    }

    pub(crate) fn inner(&self) -> &inner::ClientInner {
        &self.inner
    }
}
