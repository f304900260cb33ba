//! # cdp-control
//!
//! An async Rust client for the Cloudera CDP control plane: IAM,
//! Environments, Datalake, Machine Learning, Data Engineering, and
//! Consumption, with declarative present/absent reconciliation on top.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cdp_control::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cdp_control::Error> {
//!     // Credentials resolve from the environment or ~/.cdp/credentials
//!     let client = Client::builder()
//!         .base_url("https://api.us-west-1.cdp.cloudera.com")
//!         .build()?;
//!
//!     let account = client.iam().get_account().await?;
//!     println!("account: {}", account.account_id);
//!
//!     for env in client.environments().list_environments().await? {
//!         println!("{} ({})", env.environment_name, env.crn);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Declarative reconciliation
//!
//! State-changing callers declare a desired state instead of scripting
//! calls; applying the same declaration twice converges to a no-op:
//!
//! ```rust,no_run
//! use cdp_control::api::GroupState;
//! use cdp_control::reconcile::{reconcile, State};
//!
//! # async fn run(client: cdp_control::Client) -> Result<(), cdp_control::Error> {
//! let handler = GroupState::new(client.iam(), "data-scientists")
//!     .with_sync_membership_on_user_login(true);
//!
//! let outcome = reconcile(&handler, State::Present, false).await?;
//! println!("changed: {}", outcome.changed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Credentials
//!
//! Every request is signed with an Ed25519 key pair registered in CDP IAM.
//! Resolution order: explicit [`CredentialSource`] values, then the
//! `CDP_ACCESS_KEY_ID`/`CDP_PRIVATE_KEY` environment variables, then the
//! shared credentials file (`~/.cdp/credentials` by default, profile
//! `default`).
//!
//! ## Features
//!
//! - **Request signing** — Ed25519 (`ed25519v1`) signatures over every call
//! - **Retries** — exponential backoff with jitter for transient failures,
//!   honoring `Retry-After` on rate limits ([`RetryConfig`])
//! - **Pagination** — list calls drain all pages, translating per-surface
//!   token field names (IAM's `startingToken` vs. `pageToken`)
//! - **Debug capture** — per-client request/response log, surfaced as
//!   `sdk_out`/`sdk_out_lines` in invocation results ([`DebugLog`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod api;
mod auth;
mod client;
mod config;
mod error;
pub mod lookup;
pub mod prelude;
pub mod reconcile;

pub use auth::{CredentialSource, Credentials, DEFAULT_PROFILE};
pub use client::{Client, ClientBuilder, DebugLog, PageSpec};
pub use config::{EndpointConfig, RetryConfig};
pub use error::{Error, ErrorKind};

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;
