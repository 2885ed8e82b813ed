pub mod confirm;
pub mod text;

pub use confirm::ConfirmPrompt;
pub use text::TextPrompt;
