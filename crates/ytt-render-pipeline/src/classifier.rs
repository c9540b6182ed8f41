//! Role assignment for input resources.

use ytt_render_shared::{ClassificationRules, ResourceDocument};

/// What the pipeline does with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Role {
    /// Staged and passed to ytt with `-f`.
    Template,
    /// Staged and passed to ytt with `--data-values-file`.
    Values,
    /// Never staged; receives one document of ytt output.
    Output,
}

/// Classify a resource by kind.
///
/// Values identification wins over output identification; everything else is a template.
pub fn classify(document: &ResourceDocument, rules: &ClassificationRules) -> Role {
    let kind = document.kind().unwrap_or_default();

    if rules.values_kind() == Some(kind) {
        return Role::Values;
    }

    if kind == rules.output_kind {
        Role::Output
    } else {
        Role::Template
    }
}
