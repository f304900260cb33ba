//! Authentication for the CDP control plane.
//!
//! CDP authenticates requests with an access key / Ed25519 private key pair.
//! The pair can be given explicitly, through environment variables, or read
//! from a shared credentials file (`~/.cdp/credentials`), with that exact
//! precedence. Resolution happens once, before any network call; the resolved
//! [`Credentials`] are immutable for the lifetime of the client.

mod credentials;
mod resolver;
pub(crate) mod signer;

pub use credentials::Credentials;
pub use resolver::{CredentialSource, DEFAULT_PROFILE};
