use crate::core::context::StepContext;
use crate::core::validation::GateCheck;
use crate::render::{BlankView, StepRenderer};
use std::borrow::Borrow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(String);

impl StepId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for StepId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&String> for StepId {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Done,
    Skipped,
    Cancelled,
}

/// Field-level rule run inline before the step's gate check; returns an
/// error message when the rule rejects.
pub type FieldRule = Box<dyn Fn(&StepContext) -> Option<String> + Send>;

/// One page of the flow. Descriptors are immutable for the lifetime of a
/// session; the renderer is an opaque delegate the core never inspects.
pub struct Step {
    pub id: StepId,
    pub title: String,
    pub description: Option<String>,
    pub renderer: Box<dyn StepRenderer>,
    pub rules: Vec<FieldRule>,
    pub check: Option<GateCheck>,
    pub optional: bool,
}

impl Step {
    pub fn new(
        id: impl Into<StepId>,
        title: impl Into<String>,
        renderer: impl StepRenderer + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            renderer: Box::new(renderer),
            rules: Vec::new(),
            check: None,
            optional: false,
        }
    }

    pub fn builder(id: impl Into<StepId>, title: impl Into<String>) -> StepBuilder {
        StepBuilder::new(id, title)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("rules", &self.rules.len())
            .field("check", &self.check)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

pub struct StepBuilder {
    id: StepId,
    title: String,
    description: Option<String>,
    renderer: Option<Box<dyn StepRenderer>>,
    rules: Vec<FieldRule>,
    check: Option<GateCheck>,
    optional: bool,
}

impl StepBuilder {
    pub fn new(id: impl Into<StepId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            renderer: None,
            rules: Vec::new(),
            check: None,
            optional: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn renderer(mut self, renderer: impl StepRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn check(mut self, check: GateCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Boolean predicate gate; `false` surfaces the generic failure message.
    pub fn predicate(mut self, f: impl Fn(&StepContext) -> bool + Send + 'static) -> Self {
        self.check = Some(GateCheck::predicate(f));
        self
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn require(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        self.rules.push(Box::new(move |ctx: &StepContext| {
            if ctx.is_empty(field.as_str()) {
                Some(message.clone())
            } else {
                None
            }
        }));
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn build(self) -> Step {
        Step {
            id: self.id,
            title: self.title,
            description: self.description,
            renderer: self.renderer.unwrap_or_else(|| Box::new(BlankView)),
            rules: self.rules,
            check: self.check,
            optional: self.optional,
        }
    }
}
