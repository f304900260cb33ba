//! Configuration types for the CDP control plane client.

mod endpoint;
mod retry;

pub use endpoint::EndpointConfig;
pub use retry::RetryConfig;
