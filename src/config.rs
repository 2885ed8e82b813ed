use serde::{Deserialize, Serialize};
use std::fmt;

/// Options recognized by the sequencer. Unknown keys in a config
/// document are ignored; missing keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Permits `request_jump` to any valid step index.
    #[serde(default = "default_true")]
    pub allow_step_navigation: bool,
    /// Hosts honoring this render the progress line.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            allow_step_navigation: true,
            show_progress: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl SequencerConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_yaml::Error> for ConfigError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::new(error.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::SequencerConfig;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SequencerConfig::from_yaml("{}").expect("config");
        assert_eq!(config, SequencerConfig::default());
        assert!(config.allow_step_navigation);
        assert!(config.show_progress);
    }

    #[test]
    fn partial_yaml_overrides_one_flag() {
        let config =
            SequencerConfig::from_yaml("allow_step_navigation: false").expect("config");
        assert!(!config.allow_step_navigation);
        assert!(config.show_progress);
    }

    #[test]
    fn json_round_trip() {
        let config = SequencerConfig::from_json(r#"{"show_progress": false}"#).expect("config");
        assert!(!config.show_progress);
        let text = serde_json::to_string(&config).expect("serialize");
        let back = SequencerConfig::from_json(text.as_str()).expect("parse");
        assert_eq!(back, config);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(SequencerConfig::from_yaml(": : :").is_err());
        assert!(SequencerConfig::from_json("{").is_err());
    }
}
