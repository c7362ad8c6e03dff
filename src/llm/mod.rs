//! LLM Client Layer - Gemini API integration
//!
//! This module provides:
//! - Message types for LLM communication
//! - TextGenerator trait for API abstraction
//! - GeminiClient implementation
//! - MockGenerator for tests

pub mod client;
pub mod gemini;
pub mod types;

pub use client::{MockGenerator, TextGenerator};
pub use gemini::{GeminiClient, GeminiConfig};
pub use types::{FinishReason, GenerationRequest, GenerationResponse, Usage};
