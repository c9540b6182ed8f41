//! YAML resource model for KRM function input and output.
//!
//! A [`ResourceDocument`] is an ordered YAML mapping with a small accessor surface:
//! kind, name, annotations, and top-level field get/set/remove. Field values are
//! plain [`serde_yaml::Value`] trees.
//!
//! YAML comments do not survive `serde_yaml`, so ytt annotations (`#@ ...`) must be
//! carried in string scalars, usually block literals. [`render_value`] writes string
//! scalars verbatim for exactly that reason.

mod error;
mod list;

pub use error::ResourceError;
pub use list::ResourceList;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Annotation carrying the source path of a resource (kpt v1).
pub const PATH_ANNOTATION: &str = "internal.config.kubernetes.io/path";

/// Legacy path annotation, still emitted by older orchestrators.
pub const LEGACY_PATH_ANNOTATION: &str = "config.kubernetes.io/path";

const KIND: &str = "kind";
const METADATA: &str = "metadata";
const NAME: &str = "name";
const ANNOTATIONS: &str = "annotations";

/// A single KRM resource: an ordered, mutable YAML mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDocument(Mapping);

impl ResourceDocument {
    /// Parse a single YAML document into a resource.
    pub fn parse(yaml: &str) -> Result<Self, ResourceError> {
        let value: Value = serde_yaml::from_str(yaml).map_err(ResourceError::Parse)?;
        Self::from_value(value)
    }

    /// Parse every document of a (possibly multi-document) YAML stream.
    ///
    /// Empty documents are skipped.
    pub fn parse_all(yaml: &str) -> Result<Vec<Self>, ResourceError> {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(yaml) {
            let value = Value::deserialize(document).map_err(ResourceError::Parse)?;
            if value.is_null() {
                continue;
            }
            documents.push(Self::from_value(value)?);
        }
        Ok(documents)
    }

    pub fn from_value(value: Value) -> Result<Self, ResourceError> {
        match value {
            Value::Mapping(mapping) => Ok(Self(mapping)),
            other => Err(ResourceError::NotAMapping {
                found: value_type_name(&other),
            }),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ResourceError> {
        serde_yaml::to_string(&self.0).map_err(ResourceError::Serialize)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get(KIND).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.0
            .get(METADATA)
            .and_then(|metadata| metadata.get(NAME))
            .and_then(Value::as_str)
    }

    /// The `metadata.annotations` mapping, if there is one.
    pub fn annotations(&self) -> Option<&Mapping> {
        self.0
            .get(METADATA)
            .and_then(|metadata| metadata.get(ANNOTATIONS))
            .and_then(Value::as_mapping)
    }

    /// Look up a single `metadata.annotations` entry.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations()
            .and_then(|annotations| annotations.get(key))
            .and_then(Value::as_str)
    }

    /// Set a `metadata.annotations` entry, creating the intermediate mappings.
    pub fn set_annotation(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        with_child_mapping(&mut self.0, METADATA, |metadata| {
            with_child_mapping(metadata, ANNOTATIONS, |annotations| {
                annotations.insert(Value::from(key), Value::from(value));
            });
        });
    }

    /// The source path of this resource, used for diagnostics and staged file names.
    pub fn diagnostic_path(&self) -> Option<&str> {
        self.annotation(PATH_ANNOTATION)
            .or_else(|| self.annotation(LEGACY_PATH_ANNOTATION))
            .filter(|path| !path.is_empty())
    }

    /// Human-readable identity for log messages: the path annotation when present,
    /// `kind/name` otherwise.
    pub fn display_path(&self) -> String {
        match self.diagnostic_path() {
            Some(path) => path.to_string(),
            None => format!(
                "{}/{}",
                self.kind().unwrap_or("<unknown>"),
                self.name().unwrap_or("<unnamed>")
            ),
        }
    }

    /// Value of a top-level field, `None` when the key is absent.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the top-level key is present, even with a null value.
    pub fn has_field(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// True when the field is absent or holds an empty value (see [`is_nil_or_empty`]).
    pub fn field_is_nil_or_empty(&self, key: &str) -> bool {
        self.field(key).map_or(true, is_nil_or_empty)
    }

    /// Set a top-level field in place, returning the previous value.
    ///
    /// Existing keys keep their position in the mapping.
    pub fn set_field(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(Value::from(key), value)
    }

    pub fn remove_field(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }
}

impl From<Mapping> for ResourceDocument {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

/// Null, empty strings, empty mappings and empty sequences count as empty.
pub fn is_nil_or_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Mapping(m) => m.is_empty(),
        Value::Sequence(s) => s.is_empty(),
        Value::Tagged(tagged) => is_nil_or_empty(&tagged.value),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Render a field value as text for the templating engine.
///
/// String scalars are written verbatim; any other subtree is serialized as YAML.
pub fn render_value(value: &Value) -> Result<String, ResourceError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => serde_yaml::to_string(other).map_err(ResourceError::Serialize),
    }
}

/// Parse one YAML fragment into a value tree.
pub fn parse_value(text: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn with_child_mapping<R>(
    parent: &mut Mapping,
    key: &str,
    f: impl FnOnce(&mut Mapping) -> R,
) -> R {
    let slot = parent.entry(Value::from(key)).or_insert(Value::Null);
    let mut child = match std::mem::replace(slot, Value::Null) {
        Value::Mapping(mapping) => mapping,
        _ => Mapping::new(),
    };
    let out = f(&mut child);
    *slot = Value::Mapping(child);
    out
}
