use crate::core::FieldId;
use crate::core::context::StepContext;
use crate::core::value::Value;
use crate::render::{RenderReaction, StepRenderer};
use crate::terminal::{KeyCode, KeyEvent};

/// Yes/no toggle bound to one boolean field. Space or y/n flips it,
/// Enter submits the step.
pub struct ConfirmPrompt {
    field: FieldId,
    label: String,
    checked: bool,
    hydrated: bool,
}

impl ConfirmPrompt {
    pub fn new(field: impl Into<FieldId>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            checked: false,
            hydrated: false,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    fn hydrate(&mut self, ctx: &StepContext) {
        if self.hydrated {
            return;
        }
        if let Some(checked) = ctx.value(self.field.as_str()).and_then(Value::as_bool) {
            self.checked = checked;
        }
        self.hydrated = true;
    }

    fn set(&mut self, checked: bool) -> RenderReaction {
        self.checked = checked;
        RenderReaction::patch(self.field.clone(), Value::Bool(self.checked))
    }
}

impl StepRenderer for ConfirmPrompt {
    fn view(&mut self, ctx: &StepContext) -> Vec<String> {
        self.hydrate(ctx);
        let mark = if self.checked { 'x' } else { ' ' };
        vec![format!("[{mark}] {}", self.label)]
    }

    fn on_key(&mut self, key: KeyEvent, ctx: &StepContext) -> RenderReaction {
        self.hydrate(ctx);
        match key.code {
            KeyCode::Char(' ') => {
                let next = !self.checked;
                self.set(next)
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => self.set(true),
            KeyCode::Char('n') | KeyCode::Char('N') => self.set(false),
            KeyCode::Enter => RenderReaction::submit(),
            _ => RenderReaction::ignored(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConfirmPrompt;
    use crate::core::context::StepContext;
    use crate::core::store::FormStore;
    use crate::core::value::Value;
    use crate::render::StepRenderer;
    use crate::terminal::{KeyCode, KeyEvent};

    #[test]
    fn space_toggles_and_patches_bool() {
        let mut prompt = ConfirmPrompt::new("subscribe", "Subscribe?");
        let ctx = StepContext::default();

        let on = prompt.on_key(KeyEvent::char(' '), &ctx);
        assert_eq!(on.patches[0].value, Value::Bool(true));
        let off = prompt.on_key(KeyEvent::char(' '), &ctx);
        assert_eq!(off.patches[0].value, Value::Bool(false));
    }

    #[test]
    fn y_and_n_set_explicitly() {
        let mut prompt = ConfirmPrompt::new("subscribe", "Subscribe?");
        let ctx = StepContext::default();
        assert_eq!(
            prompt.on_key(KeyEvent::char('y'), &ctx).patches[0].value,
            Value::Bool(true)
        );
        assert_eq!(
            prompt.on_key(KeyEvent::char('n'), &ctx).patches[0].value,
            Value::Bool(false)
        );
    }

    #[test]
    fn hydrates_existing_value_before_rendering() {
        let mut store = FormStore::new();
        store.set("subscribe", Value::Bool(true));
        let mut prompt = ConfirmPrompt::new("subscribe", "Subscribe?");
        let lines = prompt.view(&StepContext::from_store(&store));
        assert_eq!(lines[0], "[x] Subscribe?");
        assert!(prompt.is_checked());
    }

    #[test]
    fn enter_submits_without_patch() {
        let mut prompt = ConfirmPrompt::new("subscribe", "Subscribe?");
        let reaction = prompt.on_key(KeyEvent::plain(KeyCode::Enter), &StepContext::default());
        assert!(reaction.submit);
        assert!(reaction.patches.is_empty());
    }
}
