pub mod config;
pub mod core;
pub mod inputs;
pub mod manifest;
pub mod render;
pub mod runtime;
pub mod session;
pub mod terminal;
pub mod ui;
pub mod validators;

pub use self::config::SequencerConfig;
pub use self::core::context::StepContext;
pub use self::core::flow::Flow;
pub use self::core::step::{Step, StepBuilder, StepId, StepStatus};
pub use self::core::store::FormStore;
pub use self::core::validation::{ErrorKind, GateCheck, StepError, ValidationState};
pub use self::core::value::Value;
pub use self::manifest::{FlowManifest, StepBindings, StepManifest};
pub use self::render::{FieldPatch, RenderReaction, StepRenderer};
pub use self::runtime::event::SequencerEvent;
pub use self::session::{
    CompletionHandler, NavOutcome, NavRejection, Session, SessionBuilder,
};
