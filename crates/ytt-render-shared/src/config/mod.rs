//! # Pipeline Configuration
//!
//! Typed, immutable configuration for one render request.
//!
//! ## Overview
//!
//! - **Classification rules**: which kinds identify data-values and output documents,
//!   and which fields carry the ytt header, template content, and rendered output
//! - **Engine settings**: binary name and working directory for the ytt subprocess
//! - **Log level**: minimum severity kept in the result sink
//!
//! A [`PipelineConfig`] is built once per request from the function config document
//! (see [`function_config`]) layered on the defaults below, then passed by reference
//! through every pipeline stage.
//!
//! ## Example
//!
//! ```yaml
//! input:
//!   ytt_header: ytt_header
//!   ytt_content: ytt_template_content
//!   ciq_identifier:
//!     kind: YttDataValues
//! output:
//!   kind: Configuration
//!   output_key: data
//! debug:
//!   work_dir: /workspace
//!   bin_name: ytt
//!   log_level: info
//! ```

mod error;
pub mod function_config;

pub use error::ConfigError;
pub use function_config::RawFunctionConfig;

use std::path::{Path, PathBuf};

use bon::Builder;

use crate::results::Severity;

pub const DEFAULT_VALUES_KIND: &str = "YttDataValues";
pub const DEFAULT_HEADER_KEY: &str = "ytt_header";
pub const DEFAULT_CONTENT_KEY: &str = "ytt_template_content";
pub const DEFAULT_OUTPUT_KIND: &str = "Configuration";
pub const DEFAULT_OUTPUT_KEY: &str = "data";
pub const DEFAULT_BINARY_NAME: &str = "ytt";

/// How data-values documents are recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuesIdentifier {
    /// No document is ever treated as a data-values file.
    Disabled,
    /// Documents of this kind are passed with `--data-values-file`.
    Kind(String),
}

impl Default for ValuesIdentifier {
    fn default() -> Self {
        Self::Kind(DEFAULT_VALUES_KIND.to_string())
    }
}

/// Rules that assign each input document a role.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ClassificationRules {
    #[builder(default)]
    pub values: ValuesIdentifier,

    /// Field holding the ytt header (annotations) of a document.
    #[builder(into, default = DEFAULT_HEADER_KEY.to_string())]
    pub header_key: String,

    /// Field holding the ytt template body of a document.
    #[builder(into, default = DEFAULT_CONTENT_KEY.to_string())]
    pub content_key: String,

    /// Kind that marks a document as a rendering target.
    #[builder(into, default = DEFAULT_OUTPUT_KIND.to_string())]
    pub output_kind: String,

    /// Field of an output document that receives the rendered result.
    #[builder(into, default = DEFAULT_OUTPUT_KEY.to_string())]
    pub output_key: String,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClassificationRules {
    /// The data-values kind, if values identification is enabled.
    pub fn values_kind(&self) -> Option<&str> {
        match &self.values {
            ValuesIdentifier::Kind(kind) => Some(kind),
            ValuesIdentifier::Disabled => None,
        }
    }
}

/// Settings for the ytt subprocess.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct EngineSettings {
    #[builder(into, default = DEFAULT_BINARY_NAME.to_string())]
    pub bin_name: String,

    /// Absolute working directory, or a prefix prepended to the current directory.
    #[builder(into, default)]
    pub work_dir: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EngineSettings {
    /// Resolve the directory the engine runs in.
    ///
    /// An absolute `work_dir` is used as-is. Otherwise `work_dir` is prepended verbatim
    /// to the current directory, so an empty value means "the current directory".
    pub fn resolve_work_dir(&self) -> std::io::Result<PathBuf> {
        if Path::new(&self.work_dir).is_absolute() {
            return Ok(PathBuf::from(&self.work_dir));
        }

        let current = std::env::current_dir()?;
        if self.work_dir.is_empty() {
            return Ok(current);
        }

        Ok(PathBuf::from(format!(
            "{}{}",
            self.work_dir,
            current.display()
        )))
    }
}

/// Complete configuration for one render request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct PipelineConfig {
    #[builder(default)]
    pub rules: ClassificationRules,

    #[builder(default)]
    pub engine: EngineSettings,

    #[builder(default)]
    pub log_level: Severity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = ClassificationRules::default();
        assert_eq!(rules.values_kind(), Some(DEFAULT_VALUES_KIND));
        assert_eq!(rules.header_key, "ytt_header");
        assert_eq!(rules.content_key, "ytt_template_content");
        assert_eq!(rules.output_kind, "Configuration");
        assert_eq!(rules.output_key, "data");
    }

    #[test]
    fn test_rules_builder_overrides() {
        let rules = ClassificationRules::builder()
            .values(ValuesIdentifier::Disabled)
            .output_kind("RenderedConfig")
            .build();
        assert_eq!(rules.values_kind(), None);
        assert_eq!(rules.output_kind, "RenderedConfig");
        assert_eq!(rules.output_key, DEFAULT_OUTPUT_KEY);
    }

    #[test]
    fn test_default_pipeline_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.engine.bin_name, "ytt");
        assert!(config.engine.work_dir.is_empty());
        assert_eq!(config.log_level, Severity::Info);
    }

    #[test]
    fn test_resolve_work_dir_absolute() {
        let engine = EngineSettings::builder().work_dir("/opt/ytt").build();
        assert_eq!(engine.resolve_work_dir().unwrap(), PathBuf::from("/opt/ytt"));
    }

    #[test]
    fn test_resolve_work_dir_empty_is_current_dir() {
        let engine = EngineSettings::default();
        assert_eq!(
            engine.resolve_work_dir().unwrap(),
            std::env::current_dir().unwrap()
        );
    }

    #[test]
    fn test_resolve_work_dir_relative_is_prefix() {
        let engine = EngineSettings::builder().work_dir("subDir").build();
        let expected = format!("subDir{}", std::env::current_dir().unwrap().display());
        assert_eq!(engine.resolve_work_dir().unwrap(), PathBuf::from(expected));
    }
}
