//! Prompt System - Template loading
//!
//! This module provides functionality for loading prompt templates from files.
//! Templates are plain instruction text and are passed to the model verbatim.

mod loader;

pub use loader::PromptLoader;
