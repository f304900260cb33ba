//! Declarative state reconciliation.
//!
//! State-changing automation declares a desired state (`present` or
//! `absent`) for a named resource; the reconciler fetches the current
//! record, diffs, and issues the minimal set of create/update/delete calls,
//! reporting whether anything changed. Applying the same desired state twice
//! never reports a change on the second run.
//!
//! Each resource type plugs in through the [`ResourceHandler`] trait rather
//! than a class hierarchy: a handler carries the resource client plus the
//! declared fields and supplies the five primitive operations; the engine in
//! [`reconcile`] owns the state machine.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cdp_control::reconcile::{reconcile, State};
//! use cdp_control::api::GroupState;
//!
//! # async fn run(client: cdp_control::Client) -> Result<(), cdp_control::Error> {
//! let handler = GroupState::new(client.iam(), "data-scientists");
//!
//! let outcome = reconcile(&handler, State::Present, false).await?;
//! assert!(outcome.changed);
//!
//! // Second application converges to a no-op
//! let outcome = reconcile(&handler, State::Present, false).await?;
//! assert!(!outcome.changed);
//! # Ok(())
//! # }
//! ```

mod outcome;

pub use outcome::{InvocationResult, Outcome, Plan};

use async_trait::async_trait;

use crate::error::Error;

/// Desired state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The resource should exist with the declared configuration.
    Present,
    /// The resource should not exist.
    Absent,
}

/// The primitive operations the reconciler drives for one resource type.
///
/// Handlers hold the declared (desired) fields and a resource client; they
/// never decide *whether* to act — that is the engine's job.
#[async_trait]
pub trait ResourceHandler {
    /// The resource record type.
    type Resource: Send + Sync;

    /// Fetches the current record by its stable identifier, or `None` when
    /// it does not exist.
    async fn find(&self) -> Result<Option<Self::Resource>, Error>;

    /// Returns `true` when the current record's mutable fields drift from
    /// the declared configuration.
    fn needs_update(&self, current: &Self::Resource) -> bool;

    /// Creates the resource from the declared configuration.
    async fn create(&self) -> Result<Self::Resource, Error>;

    /// Applies the declared configuration to an existing record.
    async fn update(&self, current: &Self::Resource) -> Result<Self::Resource, Error>;

    /// Deletes the existing record.
    async fn delete(&self, current: &Self::Resource) -> Result<(), Error>;
}

/// Converges one resource to the desired state.
///
/// In check mode the same `changed` decision is computed and reported, but
/// no create/update/delete call is issued; the outcome carries the current
/// record (if any) unchanged.
pub async fn reconcile<H: ResourceHandler + Sync>(
    handler: &H,
    desired: State,
    check_mode: bool,
) -> Result<Outcome<H::Resource>, Error> {
    let current = handler.find().await?;

    let plan = match (desired, &current) {
        (State::Present, None) => Plan::Create,
        (State::Present, Some(record)) => {
            if handler.needs_update(record) {
                Plan::Update
            } else {
                Plan::NoOp
            }
        }
        (State::Absent, Some(_)) => Plan::Delete,
        (State::Absent, None) => Plan::NoOp,
    };

    let changed = plan != Plan::NoOp;
    tracing::debug!(?plan, changed, check_mode, "reconciliation plan");

    if check_mode || !changed {
        return Ok(Outcome {
            changed,
            plan,
            resource: current,
        });
    }

    let resource = match plan {
        Plan::Create => Some(handler.create().await?),
        Plan::Update => {
            // current is always Some on the Update path
            match &current {
                Some(record) => Some(handler.update(record).await?),
                None => None,
            }
        }
        Plan::Delete => {
            if let Some(record) = &current {
                handler.delete(record).await?;
            }
            None
        }
        Plan::NoOp => current,
    };

    Ok(Outcome {
        changed,
        plan,
        resource,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// In-memory handler tracking every mutating call.
    struct FakeHandler {
        existing: Option<String>,
        drifted: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeHandler {
        fn new(existing: Option<&str>, drifted: bool) -> Self {
            Self {
                existing: existing.map(String::from),
                drifted,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl ResourceHandler for FakeHandler {
        type Resource = String;

        async fn find(&self) -> Result<Option<String>, Error> {
            self.calls.lock().push("find");
            Ok(self.existing.clone())
        }

        fn needs_update(&self, _current: &String) -> bool {
            self.drifted
        }

        async fn create(&self) -> Result<String, Error> {
            self.calls.lock().push("create");
            Ok("created".to_string())
        }

        async fn update(&self, _current: &String) -> Result<String, Error> {
            self.calls.lock().push("update");
            Ok("updated".to_string())
        }

        async fn delete(&self, _current: &String) -> Result<(), Error> {
            self.calls.lock().push("delete");
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_present_missing_creates() {
        let handler = FakeHandler::new(None, false);
        let outcome = reconcile(&handler, State::Present, false).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.plan, Plan::Create);
        assert_eq!(outcome.resource.as_deref(), Some("created"));
        assert_eq!(handler.calls(), ["find", "create"]);
    }

    #[tokio::test]
    async fn test_present_in_sync_is_noop() {
        let handler = FakeHandler::new(Some("existing"), false);
        let outcome = reconcile(&handler, State::Present, false).await.unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.plan, Plan::NoOp);
        assert_eq!(outcome.resource.as_deref(), Some("existing"));
        assert_eq!(handler.calls(), ["find"]);
    }

    #[tokio::test]
    async fn test_present_drifted_updates() {
        let handler = FakeHandler::new(Some("existing"), true);
        let outcome = reconcile(&handler, State::Present, false).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.plan, Plan::Update);
        assert_eq!(outcome.resource.as_deref(), Some("updated"));
        assert_eq!(handler.calls(), ["find", "update"]);
    }

    #[tokio::test]
    async fn test_absent_present_deletes() {
        let handler = FakeHandler::new(Some("existing"), false);
        let outcome = reconcile(&handler, State::Absent, false).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.plan, Plan::Delete);
        assert!(outcome.resource.is_none());
        assert_eq!(handler.calls(), ["find", "delete"]);
    }

    #[tokio::test]
    async fn test_absent_missing_is_noop_and_issues_no_delete() {
        let handler = FakeHandler::new(None, false);
        let outcome = reconcile(&handler, State::Absent, false).await.unwrap();
        assert!(!outcome.changed);
        assert_eq!(handler.calls(), ["find"]);
    }

    #[tokio::test]
    async fn test_check_mode_reports_change_without_mutating() {
        let handler = FakeHandler::new(None, false);
        let outcome = reconcile(&handler, State::Present, true).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.plan, Plan::Create);
        assert!(outcome.resource.is_none());
        // find only: zero create/update/delete calls under dry run
        assert_eq!(handler.calls(), ["find"]);
    }

    #[tokio::test]
    async fn test_check_mode_delete_keeps_current_record() {
        let handler = FakeHandler::new(Some("existing"), false);
        let outcome = reconcile(&handler, State::Absent, true).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.resource.as_deref(), Some("existing"));
        assert_eq!(handler.calls(), ["find"]);
    }
}
