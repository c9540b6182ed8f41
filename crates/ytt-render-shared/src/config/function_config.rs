//! Function config parsing (`ResourceList.functionConfig`).
//!
//! Every section and key is optional; empty values leave the default in place.
//! Unknown keys (including `apiVersion`, `kind` and `metadata` of the config
//! document itself) are ignored.

use serde::Deserialize;

use super::{ClassificationRules, ConfigError, EngineSettings, PipelineConfig, ValuesIdentifier};
use crate::resource::ResourceDocument;
use crate::results::Severity;

/// Raw shape of the function config document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawFunctionConfig {
    pub input: Option<InputSection>,
    pub output: Option<OutputSection>,
    pub debug: Option<DebugSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Field holding the ytt header.
    pub ytt_header: Option<String>,
    /// Field holding the template content.
    pub ytt_content: Option<String>,
    pub ciq_identifier: Option<CiqIdentifier>,
}

/// Data-values ("CIQ") document identification.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CiqIdentifier {
    pub kind: Option<String>,
    /// `false` turns values identification off entirely.
    pub enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub kind: Option<String>,
    pub output_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DebugSection {
    pub work_dir: Option<String>,
    pub bin_name: Option<String>,
    pub log_level: Option<String>,
}

impl RawFunctionConfig {
    /// Deserialize from the function config document.
    ///
    /// Goes through YAML text so type errors carry the offending key path
    /// (e.g. `output.kind: invalid type: map, expected a string`).
    pub fn from_document(document: &ResourceDocument) -> Result<Self, ConfigError> {
        let yaml = document.to_yaml()?;
        serde_yaml::from_str(&yaml).map_err(ConfigError::Parse)
    }

    /// Layer these overrides on the default configuration.
    pub fn into_pipeline_config(self) -> Result<PipelineConfig, ConfigError> {
        let mut rules = ClassificationRules::default();
        let mut engine = EngineSettings::default();
        let mut log_level = Severity::default();

        if let Some(input) = self.input {
            if let Some(key) = non_empty(input.ytt_header) {
                rules.header_key = key;
            }
            if let Some(key) = non_empty(input.ytt_content) {
                rules.content_key = key;
            }
            if let Some(ciq) = input.ciq_identifier {
                if let Some(kind) = non_empty(ciq.kind) {
                    rules.values = ValuesIdentifier::Kind(kind);
                }
                if ciq.enabled == Some(false) {
                    rules.values = ValuesIdentifier::Disabled;
                }
            }
        }

        if let Some(output) = self.output {
            if let Some(kind) = non_empty(output.kind) {
                rules.output_kind = kind;
            }
            if let Some(key) = non_empty(output.output_key) {
                rules.output_key = key;
            }
        }

        if let Some(debug) = self.debug {
            if let Some(dir) = non_empty(debug.work_dir) {
                engine.work_dir = dir;
            }
            if let Some(bin) = non_empty(debug.bin_name) {
                engine.bin_name = bin;
            }
            if let Some(level) = non_empty(debug.log_level) {
                log_level = level
                    .parse()
                    .map_err(|_| ConfigError::InvalidLogLevel(level))?;
            }
        }

        Ok(PipelineConfig {
            rules,
            engine,
            log_level,
        })
    }
}

impl PipelineConfig {
    /// Build the request configuration from an optional function config document.
    ///
    /// `None` yields the defaults.
    pub fn from_function_config(document: Option<&ResourceDocument>) -> Result<Self, ConfigError> {
        match document {
            Some(document) => RawFunctionConfig::from_document(document)?.into_pipeline_config(),
            None => Ok(Self::default()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
