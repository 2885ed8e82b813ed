use crate::core::FieldId;
use crate::core::step::StepId;
use crate::core::validation::StepError;
use crate::core::value::Value;
use indexmap::IndexMap;

/// Events the session queues for its host. Drained with
/// `Session::take_events`; the host decides how to fan them out.
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    /// Fired after every successful forward, backward, jump, or skip
    /// transition, with the state as of the transition.
    StepChanged {
        index: usize,
        snapshot: IndexMap<FieldId, Value>,
    },
    /// A gate check or the completion handler rejected.
    CheckFailed { step_id: StepId, message: String },
    /// Fired exactly once, after the completion handler succeeds.
    Completed { state: IndexMap<FieldId, Value> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPhase {
    Gate,
    Completion,
}

/// Result of a deferred job, reported from a worker thread back to the
/// session. `run_id` and `epoch` let the session drop results that
/// arrive for an operation or a session generation that no longer exists.
#[derive(Debug)]
pub struct CheckCompletion {
    pub step_id: StepId,
    pub run_id: u64,
    pub epoch: u64,
    pub phase: CheckPhase,
    pub outcome: Result<(), StepError>,
}
