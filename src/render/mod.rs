//! Template rendering
//!
//! The renderer is a seam: the lifecycle only needs `render(config)` to
//! either succeed or fail. [`FileRenderer`] is the built-in implementation;
//! it writes every input verbatim to its output and has no template
//! language of its own.

mod hook;

pub use hook::TemplateInit;

use crate::config::TemplateConfig;
use crate::error::{ExtensionError, Result};
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, config: &TemplateConfig) -> Result<()>;
}

/// Materializes template inputs to their output paths
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRenderer;

impl FileRenderer {
    async fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExtensionError::render(path, e))?;
        }
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| ExtensionError::render(path, e))
    }
}

#[async_trait]
impl Renderer for FileRenderer {
    async fn render(&self, config: &TemplateConfig) -> Result<()> {
        if let Some(inline) = &config.input {
            let output = config
                .output_files
                .first()
                .ok_or(ExtensionError::IncompleteAnonymousTemplate)?;
            tracing::debug!(output = %output.display(), "writing inline template");
            return Self::write_output(output, inline.as_bytes()).await;
        }

        if config.input_files.len() != config.output_files.len() {
            return Err(ExtensionError::IncompleteAnonymousTemplate);
        }

        for (input, output) in config.input_files.iter().zip(&config.output_files) {
            tracing::debug!(
                input = %input.display(),
                output = %output.display(),
                "writing template"
            );
            let contents = tokio::fs::read(input)
                .await
                .map_err(|e| ExtensionError::render(input, e))?;
            Self::write_output(output, &contents).await?;
        }
        Ok(())
    }
}
