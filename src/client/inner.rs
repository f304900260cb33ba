//! Internal REST client implementation.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::auth::signer::{RequestSigner, AUTH_HEADER, DATE_HEADER};
use crate::auth::Credentials;
use crate::config::{EndpointConfig, RetryConfig};
use crate::error::{Error, ErrorKind};

use super::debug_log::{DebugBuffer, DebugLog};
use super::pagination::{merge_responses, PageSpec};

const JSON_CONTENT_TYPE: &str = "application/json";

pub(crate) struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    signer: RequestSigner,
    retry: RetryConfig,
    debug: DebugBuffer,
}

impl ClientInner {
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        endpoint: EndpointConfig,
        retry: RetryConfig,
    ) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().user_agent(endpoint.http_agent.clone());

        // Escape hatch for private control planes with self-signed certs
        if !endpoint.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            signer: RequestSigner::new(credentials)?,
            retry,
            debug: DebugBuffer::new(endpoint.debug),
        })
    }

    pub fn access_key(&self) -> &str {
        self.signer.access_key()
    }

    pub fn take_debug_log(&self) -> Option<DebugLog> {
        self.debug.take()
    }

    fn join(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|e| Error::configuration(format!("invalid URL path '{}': {}", path, e)))
    }

    /// Makes a GET request. The path may carry a query string; it is signed
    /// as given.
    pub async fn get(&self, path: &str) -> Result<Value, Error> {
        self.execute(Method::GET, path, None).await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.execute(Method::POST, path, Some(body)).await
    }

    /// Makes a POST request to a list endpoint, draining all pages.
    ///
    /// A caller-supplied continuation token in the body switches to
    /// single-page mode: the caller is driving pagination and gets the raw
    /// page back, token included.
    pub async fn post_paginated(
        &self,
        path: &str,
        mut body: Value,
        spec: &PageSpec,
    ) -> Result<Value, Error> {
        if !body.is_object() {
            return Err(Error::invalid_argument("list request body must be a JSON object"));
        }

        if body.get(spec.request_token_field).is_some() {
            return self.post(path, &body).await;
        }

        let mut pages = Vec::new();
        loop {
            let response = self.post(path, &body).await?;
            let token = response
                .get(spec.response_token_field)
                .and_then(Value::as_str)
                .map(str::to_string);
            pages.push(response);

            let under_cap = spec.page_cap.map_or(true, |cap| (pages.len() as u32) < cap);
            match token {
                Some(token) if under_cap => {
                    if let Some(map) = body.as_object_mut() {
                        map.insert(spec.request_token_field.to_string(), Value::String(token));
                    }
                }
                _ => break,
            }
        }

        merge_responses(pages, spec)
    }

    /// Executes one request with retry on transient failures.
    ///
    /// 5xx responses, 429, and connection/timeout errors are retried with
    /// exponential backoff up to the configured attempt budget. Other 4xx
    /// responses surface immediately.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = self.join(path)?;
        let max_attempts = self.retry.max_retries + 1;
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            // The date is part of the signature, so each attempt signs fresh.
            let signed = self.signer.sign(method.as_str(), JSON_CONTENT_TYPE, path);
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .header(DATE_HEADER, &signed.date)
                .header(AUTH_HEADER, &signed.auth);
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    self.debug
                        .record(format!("{} {} -> {}", method, path, status.as_u16()));

                    if status.is_success() {
                        tracing::debug!(%method, path, status = status.as_u16(), "request ok");
                        return parse_body(response).await;
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS && attempt < max_attempts {
                        let delay = retry_after(&response)
                            .unwrap_or_else(|| self.retry.delay_for_attempt(attempt));
                        tracing::debug!(path, ?delay, "rate limited, backing off");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    if status.is_server_error() && attempt < max_attempts {
                        let delay = self.retry.delay_for_attempt(attempt);
                        tracing::warn!(
                            path,
                            status = status.as_u16(),
                            attempt,
                            ?delay,
                            "server error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(error_from_response(response).await);
                }
                Err(e) => {
                    self.debug.record(format!("{} {} -> {}", method, path, e));

                    if (e.is_connect() || e.is_timeout()) && attempt < max_attempts {
                        let delay = self.retry.delay_for_attempt(attempt);
                        tracing::warn!(path, attempt, ?delay, error = %e, "transport error, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(map_reqwest_error(e));
                }
            }
        }
    }
}

impl std::fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientInner")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

async fn parse_body(response: reqwest::Response) -> Result<Value, Error> {
    let text = response
        .text()
        .await
        .map_err(|e| Error::connection(format!("failed to read response body: {}", e)))?;

    if text.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_str(&text).map_err(|e| {
        Error::new(
            ErrorKind::InvalidResponse,
            format!("failed to parse response body: {}", e),
        )
    })
}

/// Builds the typed error for a non-success response.
///
/// Control plane errors carry a JSON body with a `message` field; fall back
/// to the raw body text when it isn't there.
async fn error_from_response(response: reqwest::Response) -> Error {
    let status = response.status();
    let retry_hint = retry_after(&response);
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);

    let mut err = Error::from_status(status.as_u16(), message);
    if let Some(delay) = retry_hint {
        err = err.with_retry_after(delay);
    }
    err
}

fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(e.to_string()).with_source(e)
    } else if e.is_connect() {
        Error::connection(e.to_string()).with_source(e)
    } else {
        Error::new(ErrorKind::Unknown, e.to_string()).with_source(e)
    }
}
