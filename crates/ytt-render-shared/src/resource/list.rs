//! The KRM function `ResourceList` wire format.

use serde::{Deserialize, Serialize};

use super::{ResourceDocument, ResourceError};
use crate::results::ResultItem;

pub const RESOURCE_LIST_API_VERSION: &str = "config.kubernetes.io/v1";
pub const RESOURCE_LIST_KIND: &str = "ResourceList";

fn default_api_version() -> String {
    RESOURCE_LIST_API_VERSION.to_string()
}

fn default_kind() -> String {
    RESOURCE_LIST_KIND.to_string()
}

/// Input and output envelope of a KRM function invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    /// Resources to transform, in orchestrator order.
    #[serde(default)]
    pub items: Vec<ResourceDocument>,

    /// Function configuration document, if the orchestrator supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_config: Option<ResourceDocument>,

    /// Structured results reported back to the orchestrator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ResultItem>,
}

impl Default for ResourceList {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            items: Vec::new(),
            function_config: None,
            results: Vec::new(),
        }
    }
}

impl ResourceList {
    pub fn from_yaml(yaml: &str) -> Result<Self, ResourceError> {
        serde_yaml::from_str(yaml).map_err(ResourceError::Parse)
    }

    pub fn to_yaml(&self) -> Result<String, ResourceError> {
        serde_yaml::to_string(self).map_err(ResourceError::Serialize)
    }

    /// The function config, treating an empty document as absent.
    pub fn function_config(&self) -> Option<&ResourceDocument> {
        self.function_config
            .as_ref()
            .filter(|config| !config.is_empty())
    }
}
