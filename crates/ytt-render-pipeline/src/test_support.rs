//! Shared fixtures for pipeline unit tests.

use std::fs;
use std::path::{Path, PathBuf};

use ytt_render_shared::resource::parse_value;
use ytt_render_shared::ResourceDocument;

pub(crate) fn document(yaml: &str) -> ResourceDocument {
    ResourceDocument::parse(yaml).expect("malformed test input")
}

pub(crate) fn template(name: &str, path: &str, content: &str) -> ResourceDocument {
    let mut doc = document(&format!(
        "apiVersion: v1alpha1\nkind: YttTemplate\nmetadata:\n  name: {name}\n"
    ));
    doc.set_annotation("config.kubernetes.io/path", path);
    doc.set_field("ytt_template_content", content.into());
    doc
}

/// An output resource whose `data` field holds `data` parsed as YAML (null when empty).
pub(crate) fn output(name: &str, path: &str, data: &str) -> ResourceDocument {
    let mut doc = document(&format!(
        "apiVersion: v1alpha1\nkind: Configuration\nmetadata:\n  name: {name}\n"
    ));
    doc.set_annotation("config.kubernetes.io/path", path);
    doc.set_field("data", parse_value(data).expect("malformed test data"));
    doc
}

/// Write an executable `sh` script standing in for the ytt binary.
#[cfg(unix)]
pub(crate) fn fake_engine(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ytt");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
