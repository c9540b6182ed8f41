//! Shared building blocks for the `ytt-render` KRM function.
//!
//! - [`resource`]: the YAML resource model the pipeline reads and mutates
//! - [`config`]: typed pipeline configuration, built from the function config document
//! - [`results`]: the leveled, tagged result sink reported back in the `ResourceList`

pub mod config;
pub mod resource;
pub mod results;

pub use config::{
    ClassificationRules, ConfigError, EngineSettings, PipelineConfig, ValuesIdentifier,
};
pub use resource::{ResourceDocument, ResourceError, ResourceList};
pub use results::{ResultItem, ResultLog, Severity};
