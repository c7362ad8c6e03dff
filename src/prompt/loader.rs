//! Prompt Loader - Load and cache prompt templates from files
//!
//! This module provides the PromptLoader struct which loads prompt templates
//! from a directory and caches them in memory for efficient access.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Result, ScenegenError};

/// Loads and caches prompt templates from a directory
pub struct PromptLoader {
    /// Base directory containing prompt template files
    templates_dir: PathBuf,
    /// In-memory cache of loaded templates
    cache: RwLock<HashMap<String, String>>,
}

impl PromptLoader {
    /// Create a new PromptLoader with the given templates directory
    pub fn new(templates_dir: impl AsRef<Path>) -> Self {
        Self {
            templates_dir: templates_dir.as_ref().to_path_buf(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load a template from disk and cache it
    ///
    /// Content is returned exactly as stored, with no trimming or
    /// normalization.
    ///
    /// # Arguments
    /// * `name` - The template name (without .md extension)
    ///
    /// # Returns
    /// The template content as a string
    pub fn load(&self, name: &str) -> Result<String> {
        // Check cache first
        {
            let cache = self.cache.read().map_err(|e| {
                ScenegenError::InvalidState(format!("Failed to acquire read lock: {}", e))
            })?;
            if let Some(content) = cache.get(name) {
                return Ok(content.clone());
            }
        }

        // Load from disk
        let path = self.template_path(name);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScenegenError::TemplateNotFound(path.clone())
            } else {
                ScenegenError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to load template '{}' from {:?}: {}", name, path, e),
                ))
            }
        })?;

        // Cache the loaded template
        {
            let mut cache = self.cache.write().map_err(|e| {
                ScenegenError::InvalidState(format!("Failed to acquire write lock: {}", e))
            })?;
            cache.insert(name.to_string(), content.clone());
        }

        Ok(content)
    }

    /// Get a cached template without loading from disk
    ///
    /// # Arguments
    /// * `name` - The template name (without .md extension)
    ///
    /// # Returns
    /// The template content if cached, None otherwise
    pub fn get(&self, name: &str) -> Option<String> {
        let cache = self.cache.read().ok()?;
        cache.get(name).cloned()
    }

    /// Check if a template exists on disk
    ///
    /// # Arguments
    /// * `name` - The template name (without .md extension)
    ///
    /// # Returns
    /// true if the template file exists
    pub fn exists(&self, name: &str) -> bool {
        self.template_path(name).exists()
    }

    /// Get the full path for a template by name
    fn template_path(&self, name: &str) -> PathBuf {
        self.templates_dir.join(format!("{}.md", name))
    }

    /// List all available templates in the directory
    pub fn list_available(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.templates_dir).map_err(|e| {
            ScenegenError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to read templates directory {:?}: {}",
                    self.templates_dir, e
                ),
            ))
        })?;

        let mut templates = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md")
                && let Some(stem) = path.file_stem()
                && let Some(name) = stem.to_str()
            {
                templates.push(name.to_string());
            }
        }

        templates.sort();
        Ok(templates)
    }

    /// Preload all templates from the directory into cache
    pub fn preload_all(&self) -> Result<usize> {
        let available = self.list_available()?;
        let mut loaded = 0;
        for name in &available {
            self.load(name)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Clear the template cache
    pub fn clear_cache(&self) -> Result<()> {
        let mut cache = self.cache.write().map_err(|e| {
            ScenegenError::InvalidState(format!("Failed to acquire write lock: {}", e))
        })?;
        cache.clear();
        Ok(())
    }

    /// Get the templates directory path
    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}
