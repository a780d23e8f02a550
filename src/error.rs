use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtensionError>;

#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("Missing environment variable: {name}")]
    MissingEnv { name: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },

    #[error(
        "only a single anonymous inline template or one or more named templates can be specified, not both"
    )]
    ConflictingTemplates,

    #[error("a single anonymous template requires both an input and an output")]
    IncompleteAnonymousTemplate,

    #[error("incomplete template detected: {name}")]
    IncompleteTemplate { name: String },

    #[error("Failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
}

impl ExtensionError {
    pub fn render(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Render {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
