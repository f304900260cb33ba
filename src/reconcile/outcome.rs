//! Reconciliation outcomes and the invocation result envelope.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::DebugLog;
use crate::error::Error;

/// The action a reconciliation decided on.
///
/// Derived per invocation from (desired state, current state) and discarded
/// after execution; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Current state already matches the declaration.
    NoOp,
    /// The resource is missing and will be created.
    Create,
    /// The resource exists but its mutable fields drift.
    Update,
    /// The resource exists and is declared absent.
    Delete,
}

/// Result of one reconciliation.
#[derive(Debug)]
pub struct Outcome<T> {
    /// Whether the invocation changed (or, in check mode, would change)
    /// anything.
    pub changed: bool,
    /// The action that was (or would be) taken.
    pub plan: Plan,
    /// The resource record after reconciliation. `None` after a delete, and
    /// after a create in check mode.
    pub resource: Option<T>,
}

/// JSON-serializable result envelope for one invocation.
///
/// Carries `changed`, the resource-specific payload fields at the top
/// level, and the captured debug log when one was taken.
///
/// ## Example
///
/// ```rust
/// use cdp_control::reconcile::InvocationResult;
///
/// let result = InvocationResult::new(true)
///     .with_resource("group", &serde_json::json!({"groupName": "ops"}))
///     .unwrap();
/// let value = serde_json::to_value(&result).unwrap();
/// assert_eq!(value["changed"], true);
/// assert_eq!(value["group"]["groupName"], "ops");
/// assert!(value.get("sdk_out").is_none());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResult {
    /// Whether the invocation changed anything.
    pub changed: bool,

    /// Resource-specific fields, flattened to the top level.
    #[serde(flatten)]
    pub payload: Map<String, Value>,

    /// Captured debug text, present only when debug capture was enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_out: Option<String>,

    /// Captured debug lines, present only when debug capture was enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_out_lines: Option<Vec<String>>,
}

impl InvocationResult {
    /// Creates an envelope with no payload.
    pub fn new(changed: bool) -> Self {
        Self {
            changed,
            payload: Map::new(),
            sdk_out: None,
            sdk_out_lines: None,
        }
    }

    /// Adds a resource payload under the given key.
    pub fn with_resource<T: Serialize>(mut self, key: &str, resource: &T) -> Result<Self, Error> {
        self.payload
            .insert(key.to_string(), serde_json::to_value(resource)?);
        Ok(self)
    }

    /// Attaches a captured debug log, if any.
    #[must_use]
    pub fn with_debug_log(mut self, log: Option<DebugLog>) -> Self {
        if let Some(log) = log {
            self.sdk_out = Some(log.sdk_out);
            self.sdk_out_lines = Some(log.sdk_out_lines);
        }
        self
    }
}

impl<T: Serialize> Outcome<T> {
    /// Converts this outcome into a result envelope, placing the resource
    /// (when present) under the given key.
    pub fn into_result(self, resource_key: &str) -> Result<InvocationResult, Error> {
        let mut result = InvocationResult::new(self.changed);
        if let Some(resource) = &self.resource {
            result = result.with_resource(resource_key, resource)?;
        }
        Ok(result)
    }
}
