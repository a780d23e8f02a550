//! Template configuration resolved from environment variables
//!
//! ```text
//! GOMPLATE_DATASOURCE_<name>=<url>     datasource handed to the renderer
//! GOMPLATE_INPUT_<name>=<path>         named template input file
//! GOMPLATE_OUTPUT_<name>=<path>        named template output file
//! GOMPLATE_INPUT=<path or inline text> the single anonymous template
//! GOMPLATE_OUTPUT=<path>               output of the anonymous template
//! ```

use crate::error::{ExtensionError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DATASOURCE_PREFIX: &str = "GOMPLATE_DATASOURCE_";
const INPUT_PREFIX: &str = "GOMPLATE_INPUT_";
const OUTPUT_PREFIX: &str = "GOMPLATE_OUTPUT_";
const INPUT_VAR: &str = "GOMPLATE_INPUT";
const OUTPUT_VAR: &str = "GOMPLATE_OUTPUT";

/// A named datasource the renderer may read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub name: String,
    pub url: String,
}

/// What the initialization step should render
///
/// Either `input` holds a single inline template, or `input_files` lines up
/// one-to-one with `output_files`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateConfig {
    pub data_sources: Vec<DataSource>,
    pub input: Option<String>,
    pub input_files: Vec<PathBuf>,
    pub output_files: Vec<PathBuf>,
}

#[derive(Default)]
struct NamedTemplate {
    input: Option<String>,
    output: Option<String>,
}

impl TemplateConfig {
    /// Resolve the template configuration from `KEY=VALUE` pairs
    ///
    /// Returns `Ok(None)` when no template is configured at all.
    pub fn from_vars<K, V>(vars: &[(K, V)]) -> Result<Option<Self>>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = TemplateConfig::default();
        let mut named: BTreeMap<&str, NamedTemplate> = BTreeMap::new();
        let mut anonymous_input = None;
        let mut anonymous_output = None;

        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            if let Some(name) = key.strip_prefix(DATASOURCE_PREFIX) {
                config.data_sources.push(DataSource {
                    name: name.to_string(),
                    url: value.to_string(),
                });
            } else if let Some(name) = key.strip_prefix(INPUT_PREFIX) {
                named.entry(name).or_default().input = Some(value.to_string());
            } else if let Some(name) = key.strip_prefix(OUTPUT_PREFIX) {
                named.entry(name).or_default().output = Some(value.to_string());
            } else if key == INPUT_VAR && !value.is_empty() {
                anonymous_input = Some(value);
            } else if key == OUTPUT_VAR && !value.is_empty() {
                anonymous_output = Some(value);
            }
        }

        if (anonymous_input.is_some() || anonymous_output.is_some()) && !named.is_empty() {
            return Err(ExtensionError::ConflictingTemplates);
        }

        match (anonymous_input, anonymous_output) {
            (Some(input), Some(output)) => {
                if Path::new(input).is_file() {
                    config.input_files.push(PathBuf::from(input));
                } else {
                    config.input = Some(input.to_string());
                }
                config.output_files.push(PathBuf::from(output));
                Ok(Some(config))
            }
            (Some(_), None) | (None, Some(_)) => Err(ExtensionError::IncompleteAnonymousTemplate),
            (None, None) if named.is_empty() => Ok(None),
            (None, None) => {
                for (name, template) in named {
                    match (template.input, template.output) {
                        (Some(input), Some(output)) if !input.is_empty() && !output.is_empty() => {
                            config.input_files.push(input.into());
                            config.output_files.push(output.into());
                        }
                        _ => {
                            return Err(ExtensionError::IncompleteTemplate {
                                name: name.to_string(),
                            });
                        }
                    }
                }
                Ok(Some(config))
            }
        }
    }

    /// Number of outputs this configuration produces
    pub fn template_count(&self) -> usize {
        self.output_files.len()
    }
}
