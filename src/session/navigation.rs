use super::Session;
use crate::core::context::StepContext;
use crate::core::validation::{CheckJob, GateCheck, StepError, capture_gate};
use crate::runtime::event::CheckPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRejection {
    /// A deferred check or the completion handler is still in flight.
    Busy,
    /// The session has completed or been cancelled.
    Ended,
    AtFirstStep,
    NotOptional,
    JumpDisabled,
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The cursor moved synchronously.
    Moved,
    /// A deferred gate or completion job was dispatched; pump the session
    /// to learn the result.
    CheckStarted,
    /// The gate rejected; the error is recorded for the step.
    Blocked,
    /// The completion handler succeeded and the session ended.
    Completed,
    Rejected(NavRejection),
}

enum GatePlan {
    Pass,
    Fail(StepError),
    Dispatch(CheckJob),
}

impl Session {
    /// Forward transition, gated by the current step's rules and check.
    /// At the terminal step a successful gate hands off to the completion
    /// handler instead of advancing.
    pub fn request_next(&mut self) -> NavOutcome {
        if let Some(rejection) = self.guard() {
            return NavOutcome::Rejected(rejection);
        }

        let ctx = StepContext::from_store(&self.store);

        let rule_failure = {
            let step = self.flow.current_step();
            capture_gate(|| match step.rules.iter().find_map(|rule| rule(&ctx)) {
                Some(message) => Err(message),
                None => Ok(()),
            })
            .err()
        };
        if let Some(error) = rule_failure {
            self.record_gate_failure(error);
            return NavOutcome::Blocked;
        }

        let plan = {
            let step = self.flow.current_step();
            match &step.check {
                None => GatePlan::Pass,
                Some(GateCheck::Inline(check)) => match capture_gate(|| check(&ctx)) {
                    Ok(()) => GatePlan::Pass,
                    Err(error) => GatePlan::Fail(error),
                },
                Some(GateCheck::Deferred(make_job)) => GatePlan::Dispatch(make_job(ctx)),
            }
        };

        match plan {
            GatePlan::Pass => self.advance_after_gate(),
            GatePlan::Fail(error) => {
                self.record_gate_failure(error);
                NavOutcome::Blocked
            }
            GatePlan::Dispatch(job) => {
                self.begin_check(CheckPhase::Gate, job);
                NavOutcome::CheckStarted
            }
        }
    }

    /// Backward transition: unconditional, no re-validation, state kept
    /// exactly as the user last left it.
    pub fn request_previous(&mut self) -> NavOutcome {
        if let Some(rejection) = self.guard() {
            return NavOutcome::Rejected(rejection);
        }
        if !self.flow.has_previous() {
            return NavOutcome::Rejected(NavRejection::AtFirstStep);
        }
        self.flow.retreat();
        self.emit_step_changed();
        NavOutcome::Moved
    }

    /// Direct jump to any valid index, when enabled by configuration.
    /// Deliberately permissive: a forward jump lands on a step whose
    /// predecessors were never validated. The gate still runs before the
    /// user leaves whatever step they jump to.
    pub fn request_jump(&mut self, index: usize) -> NavOutcome {
        if let Some(rejection) = self.guard() {
            return NavOutcome::Rejected(rejection);
        }
        if !self.config.allow_step_navigation {
            return NavOutcome::Rejected(NavRejection::JumpDisabled);
        }
        if index >= self.flow.len() {
            return NavOutcome::Rejected(NavRejection::OutOfRange);
        }
        if index == self.flow.current_index() {
            return NavOutcome::Moved;
        }
        self.flow.jump_to(index);
        self.emit_step_changed();
        NavOutcome::Moved
    }

    /// Like `request_next` with the gate bypassed; only valid on a step
    /// marked optional. On any other step it is a rejected no-op.
    pub fn request_skip(&mut self) -> NavOutcome {
        if let Some(rejection) = self.guard() {
            return NavOutcome::Rejected(rejection);
        }
        if !self.flow.current_step().optional {
            return NavOutcome::Rejected(NavRejection::NotOptional);
        }

        let step_id = self.flow.current_step().id.clone();
        self.validation.clear_error(step_id.as_str());

        if self.flow.has_next() {
            self.flow.advance_skipped();
            self.emit_step_changed();
            NavOutcome::Moved
        } else {
            self.flow.skip_current();
            self.begin_completion()
        }
    }

    pub(super) fn advance_after_gate(&mut self) -> NavOutcome {
        let step_id = self.flow.current_step().id.clone();
        self.validation.clear_error(step_id.as_str());

        if self.flow.has_next() {
            self.flow.advance();
            self.emit_step_changed();
            NavOutcome::Moved
        } else {
            self.begin_completion()
        }
    }

    pub(super) fn record_gate_failure(&mut self, error: StepError) {
        let step_id = self.flow.current_step().id.clone();
        self.record_error(step_id, error);
    }

    fn guard(&self) -> Option<NavRejection> {
        if self.runtime.ended {
            return Some(NavRejection::Ended);
        }
        if self.is_busy() {
            return Some(NavRejection::Busy);
        }
        None
    }
}
