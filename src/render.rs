use crate::core::FieldId;
use crate::core::context::StepContext;
use crate::core::value::Value;
use crate::terminal::KeyEvent;

/// A single field mutation reported by a rendering delegate. Patches are
/// merged through the form store; delegates never write state directly.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPatch {
    pub field: FieldId,
    pub value: Value,
}

impl FieldPatch {
    pub fn new(field: impl Into<FieldId>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

/// What a delegate did with one key of input.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderReaction {
    pub handled: bool,
    pub patches: Vec<FieldPatch>,
    pub submit: bool,
}

impl RenderReaction {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    pub fn patch(field: impl Into<FieldId>, value: Value) -> Self {
        Self {
            handled: true,
            patches: vec![FieldPatch::new(field, value)],
            submit: false,
        }
    }

    pub fn submit() -> Self {
        Self {
            handled: true,
            patches: Vec::new(),
            submit: true,
        }
    }
}

/// Per-step rendering capability. The core hands it the current state
/// snapshot and merges whatever patches come back; what a "view" looks
/// like beyond lines of text is the host's business.
pub trait StepRenderer: Send {
    fn view(&mut self, ctx: &StepContext) -> Vec<String>;

    fn on_key(&mut self, key: KeyEvent, ctx: &StepContext) -> RenderReaction {
        let _ = (key, ctx);
        RenderReaction::ignored()
    }
}

/// Renderer for steps that present nothing of their own.
pub struct BlankView;

impl StepRenderer for BlankView {
    fn view(&mut self, _ctx: &StepContext) -> Vec<String> {
        Vec::new()
    }
}
