pub mod narration;

pub use narration::build_narration_prompt;
