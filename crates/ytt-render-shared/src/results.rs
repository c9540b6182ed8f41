//! Leveled, tagged result sink.
//!
//! Every pipeline diagnostic is recorded here so it can be reported back to the
//! orchestrator in `ResourceList.results`. Each record is mirrored to `tracing`
//! regardless of the sink's minimum level; the level only decides what gets kept.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a result, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[display("debug")]
    Debug,
    #[default]
    #[display("info")]
    Info,
    #[display("warning")]
    Warning,
    #[display("error")]
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity '{0}': expected one of debug, info, warning, error")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

/// A single structured result, in the KRM `results` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ResultItem {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            tags: BTreeMap::new(),
        }
    }
}

/// Per-request collector of [`ResultItem`]s.
#[derive(Debug, Default)]
pub struct ResultLog {
    level: Severity,
    items: Vec<ResultItem>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: Severity) -> Self {
        Self {
            level,
            items: Vec::new(),
        }
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    /// Change the minimum kept severity. Already recorded items are not filtered.
    pub fn set_level(&mut self, level: Severity) {
        self.level = level;
    }

    pub fn record<I, K, V>(&mut self, severity: Severity, message: impl Into<String>, tags: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let item = ResultItem {
            message: message.into(),
            severity,
            tags: tags
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };

        mirror_to_tracing(&item);

        if severity >= self.level {
            self.items.push(item);
        }
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.record(Severity::Debug, message, no_tags());
    }

    pub fn debug_detailed<I, K, V>(&mut self, message: impl Into<String>, tags: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.record(Severity::Debug, message, tags);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Severity::Info, message, no_tags());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.record(Severity::Warning, message, no_tags());
    }

    pub fn warning_detailed<I, K, V>(&mut self, message: impl Into<String>, tags: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.record(Severity::Warning, message, tags);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.record(Severity::Error, message, no_tags());
    }

    pub fn error_detailed<I, K, V>(&mut self, message: impl Into<String>, tags: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.record(Severity::Error, message, tags);
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ResultItem> {
        self.items
    }

    /// Messages recorded at exactly the given severity, in order.
    pub fn messages(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(move |item| item.severity == severity)
            .map(|item| item.message.as_str())
    }
}

fn no_tags() -> [(String, String); 0] {
    []
}

fn mirror_to_tracing(item: &ResultItem) {
    let message = item.message.as_str();
    let tags = &item.tags;
    match item.severity {
        Severity::Debug => tracing::debug!(?tags, "{message}"),
        Severity::Info => tracing::info!(?tags, "{message}"),
        Severity::Warning => tracing::warn!(?tags, "{message}"),
        Severity::Error => tracing::error!(?tags, "{message}"),
    }
}
