use super::{InFlight, Session};
use crate::core::validation::CheckJob;
use crate::runtime::event::{CheckCompletion, CheckPhase};
use crate::runtime::executor::CheckInvocation;
use std::time::{Duration, Instant};

impl Session {
    pub(super) fn begin_check(&mut self, phase: CheckPhase, job: CheckJob) {
        let run_id = self.runtime.next_run_id();
        let step_id = self.flow.current_step().id.clone();
        tracing::debug!(step = %step_id, run_id, ?phase, "deferred check dispatched");

        self.runtime.in_flight = Some(InFlight { run_id, phase });
        if phase == CheckPhase::Completion {
            self.runtime.submitting = true;
        }
        self.runtime.executor.spawn(CheckInvocation {
            step_id,
            run_id,
            epoch: self.runtime.epoch,
            phase,
            job,
        });
    }

    /// Applies any worker completions that have arrived. Non-blocking;
    /// call from the host's event loop. Returns whether anything changed.
    pub fn pump(&mut self) -> bool {
        let completions = self.runtime.executor.drain_ready();
        let mut changed = false;
        for completion in completions {
            changed |= self.apply_check_completion(completion);
        }
        changed
    }

    /// Blocks until the in-flight operation (and whatever it chains into)
    /// settles or the timeout passes. Returns true when idle.
    pub fn pump_blocking(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.runtime.in_flight.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            let Some(completion) = self.runtime.executor.wait_one(remaining) else {
                return false;
            };
            self.apply_check_completion(completion);
        }
        true
    }

    fn apply_check_completion(&mut self, completion: CheckCompletion) -> bool {
        if completion.epoch != self.runtime.epoch {
            tracing::debug!(
                step = %completion.step_id,
                run_id = completion.run_id,
                "dropping completion from a previous session generation"
            );
            return false;
        }
        let Some(in_flight) = self.runtime.in_flight else {
            return false;
        };
        if in_flight.run_id != completion.run_id {
            tracing::debug!(
                step = %completion.step_id,
                run_id = completion.run_id,
                "dropping stale completion"
            );
            return false;
        }

        self.runtime.in_flight = None;
        match in_flight.phase {
            CheckPhase::Gate => match completion.outcome {
                Ok(()) => {
                    self.advance_after_gate();
                }
                Err(error) => self.record_error(completion.step_id, error),
            },
            CheckPhase::Completion => match completion.outcome {
                Ok(()) => self.finish_completion_success(),
                Err(error) => self.fail_completion(completion.step_id, error),
            },
        }
        true
    }
}
