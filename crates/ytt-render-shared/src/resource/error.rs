//! Error types for resource parsing and serialization.

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("failed to parse resource YAML: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("failed to serialize resource YAML: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("resource document must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
}
