//! Read-only lookup helpers for query-style callers.
//!
//! Lookups resolve one or more names to records in a single call and are
//! all-or-nothing: any term that fails to resolve fails the whole lookup,
//! so callers never receive a partial result they could mistake for a
//! complete one.

use serde_json::Value;

use crate::client::Client;
use crate::error::Error;

/// Reduces the matches for one search term to exactly one record.
///
/// Zero matches and multiple matches are both fatal; the term is named in
/// the error either way.
pub fn resolve_unique<T>(term: &str, mut matches: Vec<T>) -> Result<T, Error> {
    match matches.len() {
        0 => Err(Error::not_found(format!("no match for '{}'", term))),
        1 => Ok(matches.remove(0)),
        n => Err(Error::ambiguous(format!("{} matches for '{}'", n, term))),
    }
}

/// Resolves environment names to environment records.
///
/// ## Example
///
/// ```rust,no_run
/// use cdp_control::lookup::EnvironmentLookup;
///
/// # async fn run(client: cdp_control::Client) -> Result<(), cdp_control::Error> {
/// let lookup = EnvironmentLookup::new(client);
///
/// // Full records for two environments; errors if either is missing
/// let records = lookup.resolve(&["dev", "prod"], true).await?;
///
/// // Names only
/// let names = lookup.resolve(&["dev"], false).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct EnvironmentLookup {
    client: Client,
}

impl EnvironmentLookup {
    /// Creates a lookup over the given client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Resolves each term to its environment, in term order.
    ///
    /// With `detailed` the full describe record is returned for each term;
    /// otherwise just the environment name. A term that matches no
    /// environment is fatal, so a successful return always has one entry
    /// per term.
    pub async fn resolve(&self, terms: &[&str], detailed: bool) -> Result<Vec<Value>, Error> {
        let environments = self.client.environments();
        let mut resolved = Vec::with_capacity(terms.len());
        for term in terms {
            let matches: Vec<_> = environments
                .describe_environment(term)
                .await?
                .into_iter()
                .collect();
            let environment = resolve_unique(term, matches)?;
            if detailed {
                resolved.push(serde_json::to_value(&environment)?);
            } else {
                resolved.push(Value::String(environment.environment_name));
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_resolve_unique_single() {
        assert_eq!(resolve_unique("x", vec![7]).unwrap(), 7);
    }

    #[test]
    fn test_resolve_unique_none_is_fatal() {
        let err = resolve_unique::<i32>("ghost", vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("'ghost'"));
    }

    #[test]
    fn test_resolve_unique_multiple_is_fatal() {
        let err = resolve_unique("dup", vec![1, 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Ambiguous);
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
    async fn test_resolve_names_in_term_order() {
        let server = MockServer::start().await;
        for name in ["dev", "prod"] {
            Mock::given(method("POST"))
                .and(path("/environments2/describeEnvironment"))
                .and(body_json(json!({"environmentName": name})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "environment": {"environmentName": name, "crn": format!("crn:{name}")}
                })))
                .mount(&server)
                .await;
        }

        let lookup = EnvironmentLookup::new(mock_client(&server).await);
        let names = lookup.resolve(&["dev", "prod"], false).await.unwrap();
        assert_eq!(names, vec![json!("dev"), json!("prod")]);

        let records = lookup.resolve(&["prod"], true).await.unwrap();
        assert_eq!(records[0]["crn"], "crn:prod");
    }

    #[tokio::test]
    async fn test_missing_term_fails_whole_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/environments2/describeEnvironment"))
            .and(body_json(json!({"environmentName": "dev"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "environment": {"environmentName": "dev", "crn": "crn:dev"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/environments2/describeEnvironment"))
            .and(body_json(json!({"environmentName": "ghost"})))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "not found"
            })))
            .mount(&server)
            .await;

        let lookup = EnvironmentLookup::new(mock_client(&server).await);
        let err = lookup.resolve(&["dev", "ghost"], false).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
    }
}
