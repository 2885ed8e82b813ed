use crate::core::step::StepId;
use crate::core::validation::{CheckJob, capture_completion, capture_gate};
use crate::runtime::event::{CheckCompletion, CheckPhase};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// A deferred job headed for a worker thread, tagged with everything the
/// session needs to recognize (or discard) its completion later.
pub struct CheckInvocation {
    pub step_id: StepId,
    pub run_id: u64,
    pub epoch: u64,
    pub phase: CheckPhase,
    pub job: CheckJob,
}

/// Runs deferred gate and completion jobs off the event loop. One thread
/// per job; completions queue on a channel until the session pumps them.
pub struct CheckExecutor {
    completion_tx: Sender<CheckCompletion>,
    completion_rx: Receiver<CheckCompletion>,
}

impl CheckExecutor {
    pub fn new() -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<CheckCompletion>();
        Self {
            completion_tx,
            completion_rx,
        }
    }

    pub fn spawn(&self, invocation: CheckInvocation) {
        let completion_tx = self.completion_tx.clone();
        std::thread::spawn(move || {
            let CheckInvocation {
                step_id,
                run_id,
                epoch,
                phase,
                job,
            } = invocation;
            let outcome = match phase {
                CheckPhase::Gate => capture_gate(job),
                CheckPhase::Completion => capture_completion(job),
            };
            let _ = completion_tx.send(CheckCompletion {
                step_id,
                run_id,
                epoch,
                phase,
                outcome,
            });
        });
    }

    pub fn drain_ready(&self) -> Vec<CheckCompletion> {
        let mut out = Vec::<CheckCompletion>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    pub fn wait_one(&self, timeout: Duration) -> Option<CheckCompletion> {
        match self.completion_rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Default for CheckExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{CheckExecutor, CheckInvocation};
    use crate::core::step::StepId;
    use crate::core::validation::ErrorKind;
    use crate::runtime::event::CheckPhase;
    use std::time::Duration;

    fn invocation(phase: CheckPhase, job: impl FnOnce() -> Result<(), String> + Send + 'static) -> CheckInvocation {
        CheckInvocation {
            step_id: StepId::from("s"),
            run_id: 1,
            epoch: 0,
            phase,
            job: Box::new(job),
        }
    }

    #[test]
    fn reports_success() {
        let executor = CheckExecutor::new();
        executor.spawn(invocation(CheckPhase::Gate, || Ok(())));
        let completion = executor.wait_one(Duration::from_secs(2)).expect("completion");
        assert_eq!(completion.run_id, 1);
        assert!(completion.outcome.is_ok());
    }

    #[test]
    fn gate_rejection_maps_to_validation_failed() {
        let executor = CheckExecutor::new();
        executor.spawn(invocation(CheckPhase::Gate, || Err("nope".to_string())));
        let completion = executor.wait_one(Duration::from_secs(2)).expect("completion");
        let err = completion.outcome.expect_err("err");
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.message(), "nope");
    }

    #[test]
    fn gate_panic_maps_to_validation_crashed() {
        let executor = CheckExecutor::new();
        executor.spawn(invocation(CheckPhase::Gate, || panic!("kaput")));
        let completion = executor.wait_one(Duration::from_secs(2)).expect("completion");
        let err = completion.outcome.expect_err("err");
        assert_eq!(err.kind(), ErrorKind::ValidationCrashed);
        assert_eq!(err.message(), "kaput");
    }

    #[test]
    fn completion_failures_map_to_completion_failed() {
        let executor = CheckExecutor::new();
        executor.spawn(invocation(CheckPhase::Completion, || {
            Err("backend down".to_string())
        }));
        let completion = executor.wait_one(Duration::from_secs(2)).expect("completion");
        let err = completion.outcome.expect_err("err");
        assert_eq!(err.kind(), ErrorKind::CompletionFailed);
    }

    #[test]
    fn drain_is_non_blocking() {
        let executor = CheckExecutor::new();
        assert!(executor.drain_ready().is_empty());
    }
}
