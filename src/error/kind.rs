//! Error kind enumeration for categorizing SDK errors.

/// Categorization of SDK errors.
///
/// This enum provides a stable interface for matching on error types, enabling
/// different handling strategies for different failure modes.
///
/// ## Retriable vs Non-Retriable
///
/// | ErrorKind         | Retriable | Action                        |
/// |-------------------|-----------|-------------------------------|
/// | `Unavailable`     | Yes       | Retry with backoff            |
/// | `Timeout`         | Yes       | Retry with backoff            |
/// | `RateLimited`     | Yes       | Use `retry_after()` delay     |
/// | `Connection`      | Yes       | Retry with backoff            |
/// | `Internal`        | Yes       | Retry with backoff (5xx)      |
/// | `Unauthorized`    | No        | Fix credentials               |
/// | `Forbidden`       | No        | Fix permissions               |
/// | `NotFound`        | No        | Resource doesn't exist        |
/// | `Ambiguous`       | No        | Disambiguate the lookup       |
/// | `InvalidArgument` | No        | Fix input                     |
/// | `Configuration`   | No        | Fix client configuration      |
/// | `InvalidResponse` | No        | Control plane returned junk   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid, missing, or conflicting client configuration.
    ///
    /// Raised before any network call, e.g. an access key supplied without
    /// its private key, or both a key pair and a credentials file given at
    /// the same time.
    ///
    /// **Not retriable.** Fix the configuration.
    #[error("configuration error")]
    Configuration,

    /// Authentication failed (invalid or expired credentials).
    ///
    /// HTTP: 401 Unauthorized
    ///
    /// **Not retriable.** Fix credentials and retry.
    #[error("unauthorized")]
    Unauthorized,

    /// Authorization failed (valid credentials but insufficient permissions).
    ///
    /// HTTP: 403 Forbidden
    ///
    /// **Not retriable.** Fix permissions and retry.
    #[error("forbidden")]
    Forbidden,

    /// Requested resource was not found.
    ///
    /// HTTP: 404 Not Found
    ///
    /// **Not retriable.** The resource doesn't exist. Note that singular
    /// `describe_*` lookups translate this into an empty result instead of
    /// an error, so that absent-state reconciliation stays idempotent.
    #[error("not found")]
    NotFound,

    /// Invalid request argument or payload.
    ///
    /// HTTP: 400 Bad Request (and other unrecognized 4xx)
    ///
    /// **Not retriable.** Fix the input and retry.
    #[error("invalid argument")]
    InvalidArgument,

    /// A name resolved to more than one record.
    ///
    /// Raised client-side when a lookup that must return exactly one record
    /// (e.g. the Datalake for an environment) matches several. Never
    /// auto-resolved by picking the first match.
    ///
    /// **Not retriable.** Disambiguate the lookup.
    #[error("ambiguous result")]
    Ambiguous,

    /// Rate limit exceeded.
    ///
    /// HTTP: 429 Too Many Requests
    ///
    /// **Retriable.** Use `Error::retry_after()` for the recommended delay.
    #[error("rate limited")]
    RateLimited,

    /// Service temporarily unavailable.
    ///
    /// HTTP: 503 Service Unavailable
    ///
    /// **Retriable.** Retry with exponential backoff.
    #[error("service unavailable")]
    Unavailable,

    /// Request timed out.
    ///
    /// HTTP: 504 Gateway Timeout or client-side timeout
    ///
    /// **Retriable.** Retry with exponential backoff.
    #[error("timeout")]
    Timeout,

    /// Internal server error.
    ///
    /// HTTP: 500 Internal Server Error (and other unrecognized 5xx)
    ///
    /// **Retriable.** 5xx responses from the control plane are treated as
    /// transient.
    #[error("internal server error")]
    Internal,

    /// Connection error (DNS, TLS handshake, network unreachable).
    ///
    /// **Retriable.** May indicate transient network issues.
    #[error("connection error")]
    Connection,

    /// Invalid response from the control plane.
    ///
    /// An expected field was missing or the body could not be parsed. The
    /// error message names the offending key.
    ///
    /// **Not retriable** without a server-side fix.
    #[error("invalid response")]
    InvalidResponse,

    /// Unknown or unexpected error.
    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cdp_control::ErrorKind;
    ///
    /// assert!(ErrorKind::Timeout.is_retriable());
    /// assert!(!ErrorKind::Unauthorized.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unavailable
                | ErrorKind::Timeout
                | ErrorKind::RateLimited
                | ErrorKind::Connection
                | ErrorKind::Internal
        )
    }

    /// Creates an `ErrorKind` from an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidArgument,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            429 => ErrorKind::RateLimited,
            503 => ErrorKind::Unavailable,
            504 => ErrorKind::Timeout,
            _ if (400..500).contains(&status) => ErrorKind::InvalidArgument,
            _ if status >= 500 => ErrorKind::Internal,
            _ => ErrorKind::Unknown,
        }
    }
}
