//! Chat messages, prompts, and the merged history view.

pub mod history;
pub mod prompt;
pub mod service;
