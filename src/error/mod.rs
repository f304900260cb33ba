//! Error types for the CDP control plane SDK.
//!
//! All fallible operations return [`Error`], which carries an [`ErrorKind`]
//! for categorization, a human-readable message, and, for errors originating
//! at the control plane, the HTTP status code. Callers distinguish not-found
//! from forbidden from server errors by matching on the kind or inspecting
//! the status code; they never see a raw transport error or stack trace.

#[allow(clippy::module_inception)]
mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;
