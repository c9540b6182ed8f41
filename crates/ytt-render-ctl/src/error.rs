use std::path::PathBuf;

use ytt_render_pipeline::PipelineError;
use ytt_render_shared::{ConfigError, ResourceError};

#[derive(Debug, thiserror::Error)]
pub(crate) enum CtlError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read ResourceList from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("invalid input in {origin}: {source}")]
    Input {
        origin: String,
        source: ResourceError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("failed to serialize ResourceList: {0}")]
    Serialize(#[source] ResourceError),

    #[error("failed to write ResourceList to stdout: {0}")]
    Stdout(#[source] std::io::Error),
}
