//! # Prompt Template Modules
//!
//! `core` holds the fixed template text; `assembler` combines it with the
//! schema catalog, the example bank and the user's question.

pub mod assembler;
pub mod core;

pub use assembler::{assemble, PromptRequest};
