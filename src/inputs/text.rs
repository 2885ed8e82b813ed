use crate::core::FieldId;
use crate::core::context::StepContext;
use crate::core::value::Value;
use crate::render::{RenderReaction, StepRenderer};
use crate::terminal::{KeyCode, KeyEvent};

/// Single-line text entry bound to one field. Every edit is reported as
/// a patch so the store stays the only writer; Enter submits the step.
pub struct TextPrompt {
    field: FieldId,
    label: String,
    buffer: String,
    hydrated: bool,
}

impl TextPrompt {
    pub fn new(field: impl Into<FieldId>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            buffer: String::new(),
            hydrated: false,
        }
    }

    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    /// Pulls the stored value into the edit buffer on first contact, so a
    /// revisited step shows what the user last left there.
    fn hydrate(&mut self, ctx: &StepContext) {
        if self.hydrated {
            return;
        }
        if let Some(text) = ctx.text(self.field.as_str()) {
            self.buffer = text.to_string();
        }
        self.hydrated = true;
    }
}

impl StepRenderer for TextPrompt {
    fn view(&mut self, ctx: &StepContext) -> Vec<String> {
        self.hydrate(ctx);
        vec![self.label.clone(), format!("> {}▏", self.buffer)]
    }

    fn on_key(&mut self, key: KeyEvent, ctx: &StepContext) -> RenderReaction {
        self.hydrate(ctx);
        match key.code {
            KeyCode::Char(c) if !key.modifiers.control && !key.modifiers.alt => {
                self.buffer.push(c);
                RenderReaction::patch(self.field.clone(), Value::text(self.buffer.clone()))
            }
            KeyCode::Backspace => {
                if self.buffer.pop().is_none() {
                    return RenderReaction::handled();
                }
                RenderReaction::patch(self.field.clone(), Value::text(self.buffer.clone()))
            }
            KeyCode::Enter => RenderReaction::submit(),
            _ => RenderReaction::ignored(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TextPrompt;
    use crate::core::context::StepContext;
    use crate::core::store::FormStore;
    use crate::core::value::Value;
    use crate::render::StepRenderer;
    use crate::terminal::{KeyCode, KeyEvent};

    #[test]
    fn typed_characters_accumulate_and_patch() {
        let mut prompt = TextPrompt::new("name", "Name");
        let ctx = StepContext::default();

        prompt.on_key(KeyEvent::char('a'), &ctx);
        let reaction = prompt.on_key(KeyEvent::char('b'), &ctx);

        assert!(reaction.handled);
        assert_eq!(reaction.patches.len(), 1);
        assert_eq!(reaction.patches[0].field, "name");
        assert_eq!(reaction.patches[0].value, Value::text("ab"));
    }

    #[test]
    fn backspace_removes_last_char() {
        let mut prompt = TextPrompt::new("name", "Name");
        let ctx = StepContext::default();
        prompt.on_key(KeyEvent::char('a'), &ctx);
        let reaction = prompt.on_key(KeyEvent::plain(KeyCode::Backspace), &ctx);
        assert_eq!(reaction.patches[0].value, Value::text(""));
    }

    #[test]
    fn enter_requests_submit() {
        let mut prompt = TextPrompt::new("name", "Name");
        let reaction = prompt.on_key(KeyEvent::plain(KeyCode::Enter), &StepContext::default());
        assert!(reaction.submit);
        assert!(reaction.patches.is_empty());
    }

    #[test]
    fn hydrates_from_previous_visit() {
        let mut store = FormStore::new();
        store.set("name", Value::text("kasia"));
        let ctx = StepContext::from_store(&store);

        let mut prompt = TextPrompt::new("name", "Name");
        let lines = prompt.view(&ctx);
        assert!(lines[1].contains("kasia"));
        assert_eq!(prompt.buffer(), "kasia");
    }
}
