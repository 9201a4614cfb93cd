//! Image-edit providers implementing the `checklist-core` editor contract.

pub mod gemini;

pub use gemini::{GeminiEditor, GeminiSettings};
