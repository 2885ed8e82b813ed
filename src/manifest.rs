use crate::config::SequencerConfig;
use crate::core::step::Step;
use crate::core::validation::GateCheck;
use crate::render::StepRenderer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Metadata-only step descriptor as it appears in a flow document.
/// Renderers and checks are code; they attach by id via `StepBindings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepManifest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowManifest {
    pub steps: Vec<StepManifest>,
    #[serde(default)]
    pub config: SequencerConfig,
}

impl FlowManifest {
    pub fn from_yaml(text: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_yaml::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.steps.is_empty() {
            return Err(ManifestError::new("manifest declares no steps"));
        }
        let mut seen = HashMap::<&str, usize>::new();
        for (index, step) in self.steps.iter().enumerate() {
            if step.id.trim().is_empty() {
                return Err(ManifestError::new(format!("step {index} has a blank id")));
            }
            if let Some(first) = seen.insert(step.id.as_str(), index) {
                return Err(ManifestError::new(format!(
                    "duplicate step id '{}' (positions {first} and {index})",
                    step.id
                )));
            }
        }
        Ok(())
    }

    /// Turns the manifest into runnable steps, attaching the bound
    /// renderers and checks. Bindings referencing ids the manifest does
    /// not declare are an error; manifest steps with no bound renderer
    /// fall back to a blank view.
    pub fn build_steps(self, bindings: StepBindings) -> Result<Vec<Step>, ManifestError> {
        let StepBindings {
            mut renderers,
            mut checks,
        } = bindings;

        for id in renderers.keys().chain(checks.keys()) {
            if !self.steps.iter().any(|step| step.id == *id) {
                return Err(ManifestError::new(format!(
                    "binding references unknown step id '{id}'"
                )));
            }
        }

        let mut steps = Vec::with_capacity(self.steps.len());
        for manifest in self.steps {
            let mut builder = Step::builder(manifest.id.as_str(), manifest.title);
            if let Some(description) = manifest.description {
                builder = builder.description(description);
            }
            if manifest.optional {
                builder = builder.optional();
            }
            if let Some(renderer) = renderers.remove(manifest.id.as_str()) {
                let mut step = builder.build();
                step.renderer = renderer;
                if let Some(check) = checks.remove(manifest.id.as_str()) {
                    step.check = Some(check);
                }
                steps.push(step);
                continue;
            }
            if let Some(check) = checks.remove(manifest.id.as_str()) {
                builder = builder.check(check);
            }
            steps.push(builder.build());
        }
        Ok(steps)
    }
}

/// Code attachments for a manifest, keyed by step id.
#[derive(Default)]
pub struct StepBindings {
    renderers: HashMap<String, Box<dyn StepRenderer>>,
    checks: HashMap<String, GateCheck>,
}

impl StepBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn renderer(mut self, id: impl Into<String>, renderer: impl StepRenderer + 'static) -> Self {
        self.renderers.insert(id.into(), Box::new(renderer));
        self
    }

    pub fn check(mut self, id: impl Into<String>, check: GateCheck) -> Self {
        self.checks.insert(id.into(), check);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestError {
    message: String,
}

impl ManifestError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for ManifestError {}

impl From<serde_yaml::Error> for ManifestError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::new(error.to_string())
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{FlowManifest, StepBindings};
    use crate::core::validation::GateCheck;

    const FLOW_YAML: &str = "\
steps:
  - id: account
    title: Account
    description: Who are you?
  - id: newsletter
    title: Newsletter
    optional: true
  - id: review
    title: Review
config:
  allow_step_navigation: false
";

    #[test]
    fn parses_yaml_flow() {
        let manifest = FlowManifest::from_yaml(FLOW_YAML).expect("manifest");
        assert_eq!(manifest.steps.len(), 3);
        assert!(manifest.steps[1].optional);
        assert!(!manifest.config.allow_step_navigation);
        assert!(manifest.config.show_progress);
    }

    #[test]
    fn parses_json_flow_with_default_config() {
        let manifest = FlowManifest::from_json(
            r#"{"steps": [{"id": "a", "title": "A"}]}"#,
        )
        .expect("manifest");
        assert_eq!(manifest.steps.len(), 1);
        assert!(manifest.config.allow_step_navigation);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = FlowManifest::from_yaml(
            "steps:\n  - id: a\n    title: A\n  - id: a\n    title: Again\n",
        )
        .expect_err("duplicate");
        assert!(err.to_string().contains("duplicate step id 'a'"));
    }

    #[test]
    fn empty_step_list_is_rejected() {
        assert!(FlowManifest::from_yaml("steps: []").is_err());
    }

    #[test]
    fn build_steps_attaches_bindings_by_id() {
        let manifest = FlowManifest::from_yaml(FLOW_YAML).expect("manifest");
        let bindings = StepBindings::new()
            .check("account", GateCheck::predicate(|ctx| !ctx.is_empty("name")));
        let steps = manifest.build_steps(bindings).expect("steps");

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].id.as_str(), "account");
        assert!(steps[0].check.is_some());
        assert!(steps[1].optional);
        assert!(steps[2].check.is_none());
    }

    #[test]
    fn renderer_bindings_attach_alongside_checks() {
        let manifest = FlowManifest::from_yaml(FLOW_YAML).expect("manifest");
        let bindings = StepBindings::new()
            .renderer("account", crate::render::BlankView)
            .check("account", GateCheck::predicate(|_| true));
        let steps = manifest.build_steps(bindings).expect("steps");
        assert!(steps[0].check.is_some());
    }

    #[test]
    fn binding_for_unknown_id_is_rejected() {
        let manifest = FlowManifest::from_yaml(FLOW_YAML).expect("manifest");
        let bindings =
            StepBindings::new().check("missing", GateCheck::predicate(|_| true));
        assert!(manifest.build_steps(bindings).is_err());
    }
}
