//! Pipeline integration tests
//!
//! Exercises the full generation flow with a mock client: template loading,
//! the optional filter pass, the main call, extraction, and persistence.

use std::fs;
use std::sync::Arc;

use scenegen::error::{Result, ScenegenError};
use scenegen::llm::{MockGenerator, TextGenerator};
use scenegen::pipeline::{ScenePipeline, persist};
use scenegen::prompt::PromptLoader;
use tempfile::TempDir;

/// Integration test: verify mock client works
#[test]
fn test_mock_generator_creation() {
    let mock = MockGenerator::new();
    assert!(mock.is_ready());
    assert_eq!(mock.model(), "mock-model");
}

/// Integration test: a loaded template flows into the request untouched
#[tokio::test]
async fn test_template_flows_into_generation() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("system.md"), "Echo: ")?;

    let loader = PromptLoader::new(temp_dir.path());
    let system_template = loader.load("system")?;

    let mock = Arc::new(MockGenerator::new().with_text("Echo: hello"));
    let pipeline = ScenePipeline::new(mock.clone(), system_template);

    let output = pipeline.execute("hello").await?;
    assert_eq!(output.text, "Echo: hello");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system_instruction, "Echo: ");
    assert_eq!(requests[0].contents, "hello");

    let out_path = temp_dir.path().join("response.txt");
    persist(&out_path, &output.text)?;
    assert_eq!(fs::read_to_string(&out_path)?, "Echo: hello");

    Ok(())
}

/// Integration test: fenced blocks in the reply end up as bare code on disk
#[tokio::test]
async fn test_fenced_reply_persists_extracted_code() -> Result<()> {
    let reply = "intro\n```python\nprint(1)\n```\nmore\n```python\nprint(2)\n```\ntail";
    let mock = Arc::new(MockGenerator::new().with_text(reply));
    let pipeline = ScenePipeline::new(mock, "You write animation code.");

    let output = pipeline.execute("two prints").await?;
    assert_eq!(output.text, "print(1)\n\nprint(2)");

    let temp_dir = TempDir::new()?;
    let out_path = temp_dir.path().join("response.txt");
    persist(&out_path, &output.text)?;
    assert_eq!(fs::read_to_string(&out_path)?, "print(1)\n\nprint(2)");

    Ok(())
}

/// Integration test: filter and main calls both receive the original request
#[tokio::test]
async fn test_filter_and_generate_full_flow() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("system.md"), "You write animation code.")?;
    fs::write(
        temp_dir.path().join("filter.md"),
        "Rewrite the request precisely.",
    )?;

    let loader = PromptLoader::new(temp_dir.path());
    let mock = Arc::new(
        MockGenerator::new()
            .with_text("a precise request")
            .with_text("```python\nscene = Scene()\n```"),
    );

    let pipeline = ScenePipeline::new(mock.clone(), loader.load("system")?)
        .with_filter_template(loader.load("filter")?);

    let output = pipeline.execute("make something nice").await?;

    assert_eq!(output.filtered_request.as_deref(), Some("a precise request"));
    assert_eq!(output.text, "scene = Scene()");

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].system_instruction, "Rewrite the request precisely.");
    assert_eq!(requests[0].contents, "make something nice");
    assert_eq!(requests[1].system_instruction, "You write animation code.");
    assert_eq!(requests[1].contents, "make something nice");

    Ok(())
}

/// Integration test: a service error leaves an existing output file untouched
#[tokio::test]
async fn test_service_error_leaves_output_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let out_path = temp_dir.path().join("response.txt");
    fs::write(&out_path, "previous run")?;

    let mock = Arc::new(MockGenerator::new().with_error(ScenegenError::Api {
        status: 500,
        message: "overloaded".to_string(),
    }));
    let pipeline = ScenePipeline::new(mock, "system");

    // Persist only runs on success, mirroring the command flow
    let result = pipeline.execute("draw a circle").await;
    if let Ok(outcome) = &result {
        persist(&out_path, &outcome.text)?;
    }

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&out_path)?, "previous run");

    Ok(())
}

/// Integration test: no output file appears when the only call fails
#[tokio::test]
async fn test_service_error_creates_no_output_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let out_path = temp_dir.path().join("response.txt");

    let mock = Arc::new(MockGenerator::new().with_error(ScenegenError::EmptyResponse));
    let pipeline = ScenePipeline::new(mock.clone(), "system");

    let result = pipeline.execute("draw a circle").await;
    if let Ok(outcome) = &result {
        persist(&out_path, &outcome.text)?;
    }

    assert!(result.is_err());
    assert!(!out_path.exists());
    assert_eq!(mock.request_count(), 1);

    Ok(())
}

/// Integration test: a missing template aborts before any service call
#[test]
fn test_missing_template_fails_before_any_call() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let loader = PromptLoader::new(temp_dir.path());
    let mock = Arc::new(MockGenerator::new());

    let result = loader.load("system");
    assert!(matches!(result, Err(ScenegenError::TemplateNotFound(_))));

    // The client is never consulted
    assert_eq!(mock.request_count(), 0);

    Ok(())
}

/// Integration test: template listing reflects the prompts directory
#[test]
fn test_template_listing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("system.md"), "system")?;
    fs::write(temp_dir.path().join("filter.md"), "filter")?;
    fs::write(temp_dir.path().join("notes.txt"), "not a template")?;

    let loader = PromptLoader::new(temp_dir.path());
    let available = loader.list_available()?;

    assert_eq!(available, vec!["filter", "system"]);

    Ok(())
}
