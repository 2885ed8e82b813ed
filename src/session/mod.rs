mod checks;
mod completion;
mod navigation;

pub use completion::CompletionHandler;
pub use navigation::{NavOutcome, NavRejection};

use crate::config::SequencerConfig;
use crate::core::FieldId;
use crate::core::context::StepContext;
use crate::core::flow::Flow;
use crate::core::step::{Step, StepStatus};
use crate::core::store::FormStore;
use crate::core::validation::{StepError, ValidationState};
use crate::core::value::Value;
use crate::render::RenderReaction;
use crate::runtime::event::{CheckPhase, SequencerEvent};
use crate::runtime::executor::CheckExecutor;
use crate::terminal::KeyEvent;
use crate::ui::progress::Progress;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub run_id: u64,
    pub phase: CheckPhase,
}

/// Session-side bookkeeping for deferred work and outbound events.
/// `epoch` is bumped whenever the session is reset or cancelled so that
/// completions from a previous generation are dropped on arrival.
pub(crate) struct SessionRuntime {
    pub executor: CheckExecutor,
    pub epoch: u64,
    pub run_seq: u64,
    pub in_flight: Option<InFlight>,
    pub submitting: bool,
    pub ended: bool,
    pub completion: Option<CompletionHandler>,
    pub events: Vec<SequencerEvent>,
}

impl SessionRuntime {
    fn new(completion: Option<CompletionHandler>) -> Self {
        Self {
            executor: CheckExecutor::new(),
            epoch: 0,
            run_seq: 0,
            in_flight: None,
            submitting: false,
            ended: false,
            completion,
            events: Vec::new(),
        }
    }

    pub(crate) fn next_run_id(&mut self) -> u64 {
        self.run_seq = self.run_seq.saturating_add(1);
        self.run_seq
    }

    pub(crate) fn invalidate_in_flight(&mut self) {
        self.epoch = self.epoch.saturating_add(1);
        self.in_flight = None;
        self.submitting = false;
    }
}

/// One run of the sequencer: the flow cursor, the shared form state, the
/// per-step error map, and the single in-flight-operation guard.
pub struct Session {
    pub(crate) flow: Flow,
    pub(crate) store: FormStore,
    pub(crate) validation: ValidationState,
    pub(crate) config: SequencerConfig,
    pub(crate) runtime: SessionRuntime,
}

impl Session {
    pub fn new(steps: Vec<Step>) -> Self {
        Self::builder().steps(steps).build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn current_index(&self) -> usize {
        self.flow.current_index()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.flow.step_at(self.flow.current_index())
    }

    pub fn step_count(&self) -> usize {
        self.flow.len()
    }

    pub fn status_at(&self, index: usize) -> StepStatus {
        self.flow.status_at(index)
    }

    pub fn is_submitting(&self) -> bool {
        self.runtime.submitting
    }

    pub fn has_ended(&self) -> bool {
        self.runtime.ended
    }

    /// True while a deferred check or the completion handler is in flight;
    /// navigation requests are rejected for the duration.
    pub fn is_busy(&self) -> bool {
        self.runtime.in_flight.is_some() || self.runtime.submitting
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &IndexMap<FieldId, Value> {
        self.store.snapshot()
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn error_message(&self, step_id: &str) -> Option<&str> {
        self.validation.message(step_id)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            settled: self.flow.settled_count(),
            total: self.flow.len(),
        }
    }

    /// Shallow-merges a partial update into the form state. The store is
    /// the sole writer; delegates report patches that land here.
    pub fn merge(&mut self, partial: IndexMap<FieldId, Value>) {
        self.store.merge(partial);
    }

    pub fn set_field(&mut self, field: impl Into<FieldId>, value: Value) {
        self.store.set(field, value);
    }

    /// Replaces the form state and rewinds the flow to the first step.
    /// Any in-flight deferred work is orphaned: its completion will be
    /// dropped on arrival.
    pub fn reset(&mut self, initial: IndexMap<FieldId, Value>) {
        self.store.reset(initial);
        self.validation.clear_all();
        self.flow.restart();
        self.runtime.invalidate_in_flight();
        self.runtime.ended = self.flow.is_empty();
        self.runtime.events.clear();
        tracing::debug!("session reset");
    }

    /// Abandons the session; in-flight work is orphaned as in `reset`.
    pub fn cancel(&mut self) {
        self.flow.cancel_current();
        self.runtime.invalidate_in_flight();
        self.runtime.ended = true;
        tracing::debug!(index = self.flow.current_index(), "session cancelled");
    }

    pub fn take_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.runtime.events)
    }

    /// Routes one key to the active step's delegate and applies whatever
    /// it reports. Keys are dropped while deferred work is in flight.
    pub fn dispatch_key(&mut self, key: KeyEvent) -> bool {
        if self.runtime.ended || self.is_busy() {
            return false;
        }
        let ctx = StepContext::from_store(&self.store);
        let reaction = self.flow.current_step_mut().renderer.on_key(key, &ctx);
        self.apply_reaction(reaction)
    }

    pub fn apply_reaction(&mut self, reaction: RenderReaction) -> bool {
        let mut changed = reaction.handled;
        if !reaction.patches.is_empty() {
            let mut partial = IndexMap::<FieldId, Value>::new();
            for patch in reaction.patches {
                partial.insert(patch.field, patch.value);
            }
            self.merge(partial);
            changed = true;
        }
        if reaction.submit {
            self.request_next();
            changed = true;
        }
        changed
    }

    /// Renders the active step against the current state.
    pub fn view(&mut self) -> Vec<String> {
        if self.runtime.ended || self.flow.is_empty() {
            return Vec::new();
        }
        let ctx = StepContext::from_store(&self.store);
        self.flow.current_step_mut().renderer.view(&ctx)
    }

    pub(crate) fn emit_step_changed(&mut self) {
        let index = self.flow.current_index();
        tracing::debug!(index, "step changed");
        self.runtime.events.push(SequencerEvent::StepChanged {
            index,
            snapshot: self.store.to_owned_snapshot(),
        });
    }

    pub(crate) fn record_error(&mut self, step_id: crate::core::step::StepId, error: StepError) {
        tracing::debug!(step = %step_id, kind = ?error.kind(), "step check failed");
        self.runtime.events.push(SequencerEvent::CheckFailed {
            step_id: step_id.clone(),
            message: error.message().to_string(),
        });
        self.validation.set_error(step_id, error);
    }
}

pub struct SessionBuilder {
    steps: Vec<Step>,
    initial: IndexMap<FieldId, Value>,
    config: SequencerConfig,
    completion: Option<CompletionHandler>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            initial: IndexMap::new(),
            config: SequencerConfig::default(),
            completion: None,
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn initial(mut self, initial: IndexMap<FieldId, Value>) -> Self {
        self.initial = initial;
        self
    }

    pub fn config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_complete(
        mut self,
        f: impl Fn(IndexMap<FieldId, Value>) -> Result<(), String> + Send + 'static,
    ) -> Self {
        self.completion = Some(CompletionHandler::inline(f));
        self
    }

    pub fn on_complete_deferred(
        mut self,
        f: impl Fn(IndexMap<FieldId, Value>) -> crate::core::validation::CheckJob + Send + 'static,
    ) -> Self {
        self.completion = Some(CompletionHandler::deferred(f));
        self
    }

    pub fn completion(mut self, handler: CompletionHandler) -> Self {
        self.completion = Some(handler);
        self
    }

    pub fn build(self) -> Session {
        let empty = self.steps.is_empty();
        let mut runtime = SessionRuntime::new(self.completion);
        runtime.ended = empty;
        Session {
            flow: Flow::new(self.steps),
            store: FormStore::with_initial(self.initial),
            validation: ValidationState::default(),
            config: self.config,
            runtime,
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
