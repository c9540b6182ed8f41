//! Materialize template and data-values resources as files for ytt.
//!
//! Each non-output resource becomes one file in a fresh [`StagingDirectory`], named
//! after its path annotation. The ytt header and the template content are appended
//! as separate YAML documents, so a file never maps one-to-one to a resource.

mod appender;
mod directory;

pub use directory::StagingDirectory;

use std::path::{Component, Path, PathBuf};

use serde_yaml::Value;

use ytt_render_shared::resource::render_value;
use ytt_render_shared::{ClassificationRules, ResourceDocument, ResultLog};

use crate::classifier::{classify, Role};
use crate::error::{PipelineError, PipelineResult};

use appender::{append_to_file, ensure_file};

/// One resource written to the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub role: Role,
    pub path: PathBuf,
}

/// Staged files in input order, plus the directory that owns them.
#[derive(Debug)]
pub struct StagedSet {
    pub files: Vec<StagedFile>,
    pub directory: StagingDirectory,
}

/// Write every template and data-values resource into a new staging directory.
///
/// Output resources are skipped. Resources that resolve to the same file are appended
/// to it in input order, and every resource still gets its own [`StagedFile`] entry.
pub fn stage(
    documents: &[ResourceDocument],
    rules: &ClassificationRules,
    results: &mut ResultLog,
) -> PipelineResult<StagedSet> {
    let directory = StagingDirectory::create()?;
    let mut files: Vec<StagedFile> = Vec::new();

    for (index, document) in documents.iter().enumerate() {
        let role = classify(document, rules);
        if role == Role::Output {
            continue;
        }

        let path = directory.path().join(staged_file_name(document, index));
        stage_document(document, &path, rules, results)?;

        files.push(StagedFile { role, path });
    }

    Ok(StagedSet { files, directory })
}

fn stage_document(
    document: &ResourceDocument,
    path: &Path,
    rules: &ClassificationRules,
    results: &mut ResultLog,
) -> PipelineResult<()> {
    let header = document
        .field(&rules.header_key)
        .filter(|_| !document.field_is_nil_or_empty(&rules.header_key));
    let content = document
        .field(&rules.content_key)
        .filter(|_| !document.field_is_nil_or_empty(&rules.content_key));

    results.debug_detailed(
        format!("Writing file for ytt processing: {}", path.display()),
        [
            ("fileName", path.display().to_string()),
            ("annotationKey", rules.header_key.clone()),
            ("hasAnnotation", header.is_some().to_string()),
            ("contentKey", rules.content_key.clone()),
            ("hasData", content.is_some().to_string()),
        ],
    );

    // ytt must find every file it is given, even one with nothing in it
    ensure_file(path).map_err(|source| write_error(path, source, results))?;

    if let Some(header) = header {
        let rendered = render_field(header, &rules.header_key, path, results)?;
        let staged = if header.is_string() {
            rendered.as_str()
        } else {
            strip_marker_line(&rendered)
        };
        append_to_file(path, staged).map_err(|source| write_error(path, source, results))?;
    }

    if let Some(content) = content {
        let rendered = render_field(content, &rules.content_key, path, results)?;
        append_to_file(path, &rendered).map_err(|source| write_error(path, source, results))?;
    }

    Ok(())
}

/// Render a header or content field as file text.
///
/// Only string scalars keep `#@` lines; anything else goes through the YAML serializer,
/// which has no comments to write, so a warning is recorded.
fn render_field(
    value: &Value,
    key: &str,
    path: &Path,
    results: &mut ResultLog,
) -> PipelineResult<String> {
    if !value.is_string() {
        results.warning_detailed(
            format!("Field {key} is not a string, ytt annotations in it are lost"),
            [
                ("fileName", path.display().to_string()),
                ("key", key.to_string()),
            ],
        );
    }
    Ok(render_value(value)?)
}

/// Drop the first line of a serialized header.
///
/// A structured header serializes with its wrapping key as the first line, which is
/// not part of the ytt header. A single-line header is therefore empty.
fn strip_marker_line(rendered: &str) -> &str {
    rendered
        .split_once('\n')
        .map_or("", |(_marker, rest)| rest)
}

/// Relative file name for a staged resource.
///
/// Uses the path annotation with root, prefix and `..` components removed so the file
/// stays inside the staging directory. Falls back to `<kind>-<name>-<index>.yaml`.
fn staged_file_name(document: &ResourceDocument, index: usize) -> PathBuf {
    let from_annotation: PathBuf = document
        .diagnostic_path()
        .map(|path| {
            Path::new(path)
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => Some(part),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if !from_annotation.as_os_str().is_empty() {
        return from_annotation;
    }

    PathBuf::from(format!(
        "{}-{}-{}.yaml",
        sanitize(document.kind().unwrap_or("resource")),
        sanitize(document.name().unwrap_or("unnamed")),
        index
    ))
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_error(path: &Path, source: std::io::Error, results: &mut ResultLog) -> PipelineError {
    results.error_detailed(
        format!("Failed to write file for ytt processing: {}", path.display()),
        [("fileName", path.display().to_string()), ("error", source.to_string())],
    );
    PipelineError::FileWrite {
        path: path.to_path_buf(),
        source,
    }
}
