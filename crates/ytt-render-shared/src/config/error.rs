//! Errors raised while reading the function config.

use crate::resource::ResourceError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid function config: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("invalid function config: debug.log_level '{0}' is not one of debug, info, warning, error")]
    InvalidLogLevel(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}
