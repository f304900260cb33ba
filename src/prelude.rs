//! Convenience re-exports for the common path.
//!
//! ```rust
//! use cdp_control::prelude::*;
//! ```

pub use crate::api::{
    ConsumptionClient, DatalakeClient, DeClient, EnvironmentsClient, IamClient, MlClient,
};
pub use crate::reconcile::{reconcile, InvocationResult, Outcome, Plan, ResourceHandler, State};
pub use crate::{
    Client, ClientBuilder, CredentialSource, Credentials, DebugLog, Error, ErrorKind, RetryConfig,
};
