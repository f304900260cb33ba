//! Builder for the control plane client.

use std::sync::Arc;

use url::Url;

use crate::auth::{CredentialSource, Credentials};
use crate::config::{EndpointConfig, RetryConfig};
use crate::error::Error;

use super::inner::ClientInner;
use super::Client;

/// Builder for [`Client`].
///
/// The endpoint URL is required. Credentials can be given directly, or as a
/// [`CredentialSource`] which is resolved (explicit > environment >
/// credentials file) when `build` is called; with neither, the source
/// default applies. `build` performs no network I/O.
///
/// ## Example
///
/// ```rust,no_run
/// use cdp_control::{Client, Credentials, RetryConfig};
///
/// let client = Client::builder()
///     .base_url("https://api.us-west-1.cdp.cloudera.com")
///     .credentials(Credentials::new("access_key", "cHJpdmF0ZS1rZXk="))
///     .http_agent("my-automation/1.0")
///     .verify_tls(true)
///     .debug(false)
///     .retry_config(RetryConfig::new().with_max_retries(5))
///     .build()?;
/// # Ok::<(), cdp_control::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    source: Option<CredentialSource>,
    endpoint: EndpointConfig,
    retry: RetryConfig,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the control plane endpoint URL. Required.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets already-resolved credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets a credential source to resolve at build time.
    #[must_use]
    pub fn credential_source(mut self, source: CredentialSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets whether to validate the endpoint's TLS certificate.
    ///
    /// Defaults to `true`. Disabling is an escape hatch for private control
    /// planes with self-signed certificates.
    #[must_use]
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.endpoint.verify_tls = verify;
        self
    }

    /// Sets the User-Agent application name. Defaults to `cloudera.cloud`.
    #[must_use]
    pub fn http_agent(mut self, agent: impl Into<String>) -> Self {
        self.endpoint.http_agent = agent.into();
        self
    }

    /// Enables per-request debug log capture for this invocation.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.endpoint.debug = debug;
        self
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the client, resolving credentials if needed.
    pub fn build(self) -> Result<Client, Error> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("endpoint URL is required"))?;
        let base_url = Url::parse(&base_url)?;

        let credentials = match (self.credentials, self.source) {
            (Some(_), Some(_)) => {
                return Err(Error::configuration(
                    "credentials and credential_source are mutually exclusive",
                ))
            }
            (Some(credentials), None) => credentials,
            (None, Some(source)) => source.resolve()?,
            (None, None) => CredentialSource::new().resolve()?,
        };

        let inner = ClientInner::new(base_url, credentials, self.endpoint, self.retry)?;
        Ok(Client {
            inner: Arc::new(inner),
        })
    }
}
