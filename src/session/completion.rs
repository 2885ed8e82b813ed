use super::Session;
use crate::core::FieldId;
use crate::core::step::StepId;
use crate::core::validation::{CheckJob, StepError, capture_completion};
use crate::core::value::Value;
use crate::runtime::event::{CheckPhase, SequencerEvent};
use indexmap::IndexMap;

pub type CompletionFn = Box<dyn Fn(IndexMap<FieldId, Value>) -> Result<(), String> + Send>;
pub type DeferredCompletionFn = Box<dyn Fn(IndexMap<FieldId, Value>) -> CheckJob + Send>;

/// Receives the full aggregated state once the terminal step's gate
/// passes. Handing the state to an external collaborator (a network
/// call, usually) is its business, not the session's.
pub enum CompletionHandler {
    Inline(CompletionFn),
    Deferred(DeferredCompletionFn),
}

impl CompletionHandler {
    pub fn inline(
        f: impl Fn(IndexMap<FieldId, Value>) -> Result<(), String> + Send + 'static,
    ) -> Self {
        Self::Inline(Box::new(f))
    }

    pub fn deferred(
        f: impl Fn(IndexMap<FieldId, Value>) -> CheckJob + Send + 'static,
    ) -> Self {
        Self::Deferred(Box::new(f))
    }
}

enum CompletionPlan {
    NoHandler,
    Outcome(Result<(), StepError>),
    Dispatch(CheckJob),
}

impl Session {
    /// Runs the completion handler with a snapshot of the aggregated
    /// state. `is_submitting` holds for the handler's whole duration and
    /// drops again on both outcomes; a failure rolls the session back to
    /// the terminal step so the user can retry.
    pub(super) fn begin_completion(&mut self) -> crate::session::NavOutcome {
        use crate::session::NavOutcome;

        let snapshot = self.store.to_owned_snapshot();
        self.runtime.submitting = true;

        let plan = match self.runtime.completion.as_ref() {
            None => CompletionPlan::NoHandler,
            Some(CompletionHandler::Inline(handler)) => {
                CompletionPlan::Outcome(capture_completion(|| handler(snapshot)))
            }
            Some(CompletionHandler::Deferred(make_job)) => {
                CompletionPlan::Dispatch(make_job(snapshot))
            }
        };

        match plan {
            CompletionPlan::NoHandler => {
                self.finish_completion_success();
                NavOutcome::Completed
            }
            CompletionPlan::Outcome(Ok(())) => {
                self.finish_completion_success();
                NavOutcome::Completed
            }
            CompletionPlan::Outcome(Err(error)) => {
                let step_id = self.flow.current_step().id.clone();
                self.fail_completion(step_id, error);
                NavOutcome::Blocked
            }
            CompletionPlan::Dispatch(job) => {
                self.begin_check(CheckPhase::Completion, job);
                NavOutcome::CheckStarted
            }
        }
    }

    pub(super) fn finish_completion_success(&mut self) {
        self.runtime.submitting = false;
        self.flow.complete_current();
        self.runtime.ended = true;
        let state = self.store.to_owned_snapshot();
        tracing::info!(steps = self.flow.len(), fields = state.len(), "flow completed");
        self.runtime.events.push(SequencerEvent::Completed { state });
    }

    pub(super) fn fail_completion(&mut self, step_id: StepId, error: StepError) {
        self.runtime.submitting = false;
        tracing::warn!(step = %step_id, error = %error, "completion failed");
        self.record_error(step_id, error);
    }
}
