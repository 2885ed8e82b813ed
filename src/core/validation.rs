use crate::core::context::StepContext;
use crate::core::step::StepId;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Message used when a predicate rejects without a message channel.
pub const PREDICATE_FAILURE_MESSAGE: &str = "Validation failed for this step";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The step's check rejected the current state.
    ValidationFailed,
    /// The step's check panicked; the payload is surfaced as the message.
    ValidationCrashed,
    /// The completion handler rejected or panicked.
    CompletionFailed,
}

/// A recoverable step-level failure. Never fatal to the session: it blocks
/// the transition that produced it and is surfaced per step id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    kind: ErrorKind,
    message: String,
}

impl StepError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ValidationFailed,
            message: message.into(),
        }
    }

    pub fn crashed(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ValidationCrashed,
            message: message.into(),
        }
    }

    pub fn completion(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::CompletionFailed,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for StepError {}

/// A check job runs once, off the event loop, and reports back.
pub type CheckJob = Box<dyn FnOnce() -> Result<(), String> + Send>;

pub type InlineCheckFn = Box<dyn Fn(&StepContext) -> Result<(), String> + Send>;
pub type DeferredCheckFn = Box<dyn Fn(StepContext) -> CheckJob + Send>;

/// The validation gate in front of a step's forward transition. Inline
/// checks run on the event loop; deferred checks produce a job for the
/// worker executor and the session stays busy until it reports back.
pub enum GateCheck {
    Inline(InlineCheckFn),
    Deferred(DeferredCheckFn),
}

impl GateCheck {
    pub fn inline(f: impl Fn(&StepContext) -> Result<(), String> + Send + 'static) -> Self {
        Self::Inline(Box::new(f))
    }

    /// Boolean predicate; `false` maps to the generic failure message.
    pub fn predicate(f: impl Fn(&StepContext) -> bool + Send + 'static) -> Self {
        Self::Inline(Box::new(move |ctx| {
            if f(ctx) {
                Ok(())
            } else {
                Err(PREDICATE_FAILURE_MESSAGE.to_string())
            }
        }))
    }

    pub fn deferred(f: impl Fn(StepContext) -> CheckJob + Send + 'static) -> Self {
        Self::Deferred(Box::new(f))
    }
}

impl fmt::Debug for GateCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("GateCheck::Inline"),
            Self::Deferred(_) => f.write_str("GateCheck::Deferred"),
        }
    }
}

/// Runs a gate check body, converting a panic into `ValidationCrashed`.
pub fn capture_gate<F>(f: F) -> Result<(), StepError>
where
    F: FnOnce() -> Result<(), String>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(message)) => Err(StepError::failed(message)),
        Err(payload) => Err(StepError::crashed(panic_message(payload))),
    }
}

/// Runs a completion handler body; rejection and panic both map to
/// `CompletionFailed`.
pub fn capture_completion<F>(f: F) -> Result<(), StepError>
where
    F: FnOnce() -> Result<(), String>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(message)) => Err(StepError::completion(message)),
        Err(payload) => Err(StepError::completion(panic_message(payload))),
    }
}

pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "check panicked".to_string()
    }
}

/// Per-step error map. An entry blocks nothing by itself; the session
/// consults and clears it around transitions.
#[derive(Debug, Default, Clone)]
pub struct ValidationState {
    entries: HashMap<StepId, StepError>,
}

impl ValidationState {
    pub fn set_error(&mut self, step_id: StepId, error: StepError) {
        self.entries.insert(step_id, error);
    }

    pub fn clear_error(&mut self, step_id: &str) {
        self.entries.remove(step_id);
    }

    pub fn error(&self, step_id: &str) -> Option<&StepError> {
        self.entries.get(step_id)
    }

    pub fn message(&self, step_id: &str) -> Option<&str> {
        self.error(step_id).map(StepError::message)
    }

    pub fn is_clear(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StepId, &StepError)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ErrorKind, GateCheck, PREDICATE_FAILURE_MESSAGE, StepError, ValidationState, capture_gate,
    };
    use crate::core::context::StepContext;
    use crate::core::step::StepId;

    #[test]
    fn capture_maps_rejection_to_failed() {
        let err = capture_gate(|| Err("too short".to_string())).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.message(), "too short");
    }

    #[test]
    fn capture_maps_panic_to_crashed_with_payload() {
        let err = capture_gate(|| panic!("boom")).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::ValidationCrashed);
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn predicate_false_uses_generic_message() {
        let GateCheck::Inline(check) = GateCheck::predicate(|_| false) else {
            panic!("expected inline check");
        };
        let result = check(&StepContext::default());
        assert_eq!(result, Err(PREDICATE_FAILURE_MESSAGE.to_string()));
    }

    #[test]
    fn error_map_set_clear() {
        let mut state = ValidationState::default();
        state.set_error(StepId::from("a"), StepError::failed("nope"));
        assert_eq!(state.message("a"), Some("nope"));
        assert!(!state.is_clear());

        state.clear_error("a");
        assert!(state.is_clear());
        assert_eq!(state.message("a"), None);
    }
}
