//! Scenegen - prompt-driven Manim scene generation
//!
//! Scenegen turns a natural-language animation request into runnable Manim
//! code through a single Gemini call, with an optional request-filter pass
//! and fenced code block extraction.

pub mod error;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod prompt;

pub use error::{Result, ScenegenError};
