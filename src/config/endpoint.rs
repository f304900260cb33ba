//! Endpoint configuration for the control plane connection.

/// Default User-Agent / application name reported to the control plane.
pub const DEFAULT_HTTP_AGENT: &str = "cloudera.cloud";

/// Configuration of the control plane endpoint.
///
/// Immutable for the lifetime of a client instance. Built by
/// [`ClientBuilder`](crate::ClientBuilder); most callers never construct
/// this directly.
///
/// ## Example
///
/// ```rust
/// use cdp_control::EndpointConfig;
///
/// let config = EndpointConfig::new()
///     .with_verify_tls(false)
///     .with_http_agent("my-automation/1.0")
///     .with_debug(true);
/// assert!(!config.verify_tls);
/// ```
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Whether to validate the control plane's TLS certificate.
    ///
    /// Disabling this is a deliberate escape hatch for private control
    /// planes with self-signed certificates.
    pub verify_tls: bool,

    /// Application name sent as the User-Agent header.
    pub http_agent: String,

    /// Whether to capture per-request debug log lines for the invocation.
    pub debug: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            verify_tls: true,
            http_agent: DEFAULT_HTTP_AGENT.to_string(),
            debug: false,
        }
    }
}

impl EndpointConfig {
    /// Creates a new endpoint configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to validate the TLS certificate.
    #[must_use]
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Sets the User-Agent application name.
    #[must_use]
    pub fn with_http_agent(mut self, agent: impl Into<String>) -> Self {
        self.http_agent = agent.into();
        self
    }

    /// Sets whether debug log capture is enabled.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = EndpointConfig::default();
        assert!(config.verify_tls);
        assert!(!config.debug);
        assert_eq!(config.http_agent, "cloudera.cloud");
    }

    #[test]
    fn test_builder() {
        let config = EndpointConfig::new()
            .with_verify_tls(false)
            .with_http_agent("tests/0.0")
            .with_debug(true);
        assert!(!config.verify_tls);
        assert!(config.debug);
        assert_eq!(config.http_agent, "tests/0.0");
    }
}
