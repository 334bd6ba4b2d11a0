//! Priority-ordered callback dispatch.
//!
//! Handlers are registered once at startup, tagged with a priority band.
//! For each inbound event the dispatcher walks the bands earliest to
//! latest, asks each handler whether it applies, and invokes the ones that
//! do. There is no cross-handler transaction: a failing handler aborts the
//! remainder of the dispatch but leaves earlier handlers' side effects in
//! place. Handlers are idempotent with respect to their trigger — once
//! their own update is applied, their predicate stops matching.

pub mod diff;
pub mod handlers;

use async_trait::async_trait;
use std::sync::Arc;

use shared_types::{CallbackStage, CaseEvent, DispatchError};

/// Coarse ordering tier for handlers. Cross-band order is the only
/// ordering guarantee; handlers within one band must not depend on each
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DispatchPriority {
    Earliest,
    Early,
    Late,
    Latest,
}

/// One independent reaction to a case event.
#[async_trait]
pub trait CallbackHandler: Send + Sync {
    /// Stable name, used in logs and dispatch reports.
    fn name(&self) -> &'static str;

    fn priority(&self) -> DispatchPriority;

    /// Whether this handler applies to the event. A malformed event (missing
    /// callback stage) is a caller error and fails fast here rather than
    /// returning `false` — malformed input must be surfaced, not swallowed.
    fn can_handle(&self, event: &CaseEvent) -> Result<bool, DispatchError>;

    /// Run the handler's side effects. Invoking a handler whose
    /// `can_handle` is false fails with an explicit cannot-handle error.
    async fn handle(&self, event: &CaseEvent) -> Result<(), DispatchError>;
}

/// Read the callback stage or fail with the required-field caller error.
/// Every handler's `can_handle` goes through this first.
pub fn require_stage(event: &CaseEvent) -> Result<CallbackStage, DispatchError> {
    event
        .stage
        .ok_or_else(|| DispatchError::required_field_missing("callback stage is missing"))
}

/// What a dispatch cycle did, for logging and the callback response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Names of the handlers that ran, in execution order.
    pub handled: Vec<&'static str>,
}

/// The entry point invoked once per inbound case event.
pub struct CallbackDispatcher {
    handlers: Vec<Arc<dyn CallbackHandler>>,
}

impl CallbackDispatcher {
    /// Register handlers. Sorting is stable, so registration order is kept
    /// within a band (though nothing may rely on it).
    pub fn new(mut handlers: Vec<Arc<dyn CallbackHandler>>) -> Self {
        handlers.sort_by_key(|h| h.priority());
        Self { handlers }
    }

    /// Run all applicable handlers for one event, in ascending band order.
    /// The first handler error aborts the cycle and propagates; the
    /// dispatcher never retries.
    #[tracing::instrument(skip(self, event), fields(event = event.event_type.as_str(), case_id = %event.case.case_id))]
    pub async fn dispatch(&self, event: &CaseEvent) -> Result<DispatchReport, DispatchError> {
        let mut report = DispatchReport::default();

        for handler in &self.handlers {
            if handler.can_handle(event)? {
                tracing::info!(handler = handler.name(), "Running handler");
                handler.handle(event).await?;
                report.handled.push(handler.name());
            }
        }

        if report.handled.is_empty() {
            tracing::debug!("No handler applied to event");
        }
        Ok(report)
    }
}
