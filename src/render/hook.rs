use super::{FileRenderer, Renderer};
use crate::config::TemplateConfig;
use crate::lifecycle::{InitHook, InitOutcome, LifecycleError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Initialization hook that resolves templates from the environment snapshot
/// and renders them once
pub struct TemplateInit {
    environment: Vec<(String, String)>,
    renderer: Arc<dyn Renderer>,
}

impl TemplateInit {
    pub fn new(environment: Vec<(String, String)>) -> Self {
        Self::with_renderer(environment, FileRenderer)
    }

    pub fn with_renderer<R>(environment: Vec<(String, String)>, renderer: R) -> Self
    where
        R: Renderer + 'static,
    {
        Self {
            environment,
            renderer: Arc::new(renderer),
        }
    }
}

#[async_trait]
impl InitHook for TemplateInit {
    async fn initialize(&self) -> Result<InitOutcome> {
        let config = TemplateConfig::from_vars(&self.environment).map_err(|e| {
            LifecycleError::init_failed(format!("parsing template configuration: {e}"))
        })?;

        let Some(config) = config else {
            return Ok(InitOutcome::Skipped);
        };

        self.renderer
            .render(&config)
            .await
            .map_err(|e| LifecycleError::init_failed(e.to_string()))?;

        let build = crate::BuildInfo::current();
        tracing::info!(
            version = build.version,
            commit = build.commit,
            date = %build.date,
            templates = config.template_count(),
            "templates rendered"
        );
        Ok(InitOutcome::Rendered {
            templates: config.template_count(),
        })
    }
}
