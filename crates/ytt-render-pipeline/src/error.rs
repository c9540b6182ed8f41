//! Error types for the render pipeline.
//!
//! Every variant is fatal for the current request.

use std::path::PathBuf;

use ytt_render_shared::ResourceError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("staging directory error: {source}")]
    Directory { source: std::io::Error },

    #[error("failed to write staged file '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The engine could not be started or exited non-zero. `stderr` is verbatim.
    #[error("{driver}: {reason} (stderr: {stderr})")]
    Engine {
        driver: &'static str,
        reason: String,
        stderr: String,
    },

    #[error("no output file with kind: {kind} provided")]
    NoOutputDocuments { kind: String },

    #[error("ytt output contained more files than available ({produced} produced, {available} available)")]
    CountMismatch { produced: usize, available: usize },

    #[error("output file: {path}, did not contain required output key: {key}")]
    MissingField { path: String, key: String },

    /// A fragment of engine output is not valid YAML.
    #[error(transparent)]
    Parse(serde_yaml::Error),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
