//! Generation pipeline - template plus request in, final text out.
//!
//! The pipeline is a straight-line sequence with no retries:
//!
//! 1. Optional filter pass: an independent model call that rewrites the
//!    request using the filter template.
//! 2. Main call: the request is sent with the system template as the
//!    system instruction.
//! 3. Optional extraction: fenced code blocks are pulled out of the reply.
//!
//! By default the filter output is surfaced for inspection only and the
//! main call receives the original request. With chaining enabled, the
//! filter output becomes the main call's input instead.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, ScenegenError};
use crate::extract::extract_code_blocks;
use crate::llm::{GenerationRequest, TextGenerator};

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Filter pass output, when the pass ran.
    pub filtered_request: Option<String>,

    /// Final text after extraction (or the raw reply when extraction is off).
    pub text: String,
}

/// Orchestrates the filter pass, the main call, and extraction.
pub struct ScenePipeline {
    /// Client used for both calls.
    generator: Arc<dyn TextGenerator>,

    /// System instruction for the main call.
    system_template: String,

    /// System instruction for the filter pass, when configured.
    filter_template: Option<String>,

    /// Feed the filter output into the main call instead of the raw request.
    chain_filter: bool,

    /// Run fenced code block extraction on the main reply.
    extract_code: bool,
}

impl ScenePipeline {
    /// Create a new pipeline with the given client and system template.
    pub fn new(generator: Arc<dyn TextGenerator>, system_template: impl Into<String>) -> Self {
        Self {
            generator,
            system_template: system_template.into(),
            filter_template: None,
            chain_filter: false,
            extract_code: true,
        }
    }

    /// Enable the filter pass with the given template.
    pub fn with_filter_template(mut self, template: impl Into<String>) -> Self {
        self.filter_template = Some(template.into());
        self
    }

    /// Set whether the filter output feeds the main call.
    pub fn with_chain_filter(mut self, chain_filter: bool) -> Self {
        self.chain_filter = chain_filter;
        self
    }

    /// Set whether fenced code blocks are extracted from the main reply.
    pub fn with_extract_code(mut self, extract_code: bool) -> Self {
        self.extract_code = extract_code;
        self
    }

    /// Run the filter pass on its own.
    pub async fn filter(&self, request: &str) -> Result<String> {
        let template = self.filter_template.as_ref().ok_or_else(|| {
            ScenegenError::InvalidState("no filter template configured".to_string())
        })?;

        let response = self
            .generator
            .generate(GenerationRequest::new(template, request))
            .await?;

        Ok(response.text)
    }

    /// Run the main call on its own, returning the raw reply.
    pub async fn generate(&self, request: &str) -> Result<String> {
        let response = self
            .generator
            .generate(GenerationRequest::new(&self.system_template, request))
            .await?;

        Ok(response.text)
    }

    /// Run the full sequence.
    ///
    /// Any failure aborts the run; a filter result obtained before a main
    /// call failure is not persisted anywhere.
    pub async fn execute(&self, request: &str) -> Result<PipelineOutput> {
        let filtered_request = if self.filter_template.is_some() {
            Some(self.filter(request).await?)
        } else {
            None
        };

        let main_input = match (&filtered_request, self.chain_filter) {
            (Some(filtered), true) => filtered.as_str(),
            _ => request,
        };

        let raw = self.generate(main_input).await?;

        let text = if self.extract_code {
            extract_code_blocks(&raw)
        } else {
            raw
        };

        Ok(PipelineOutput {
            filtered_request,
            text,
        })
    }
}

/// Overwrite `path` with `text`, creating the file if absent.
pub fn persist(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text)?;
    Ok(())
}
