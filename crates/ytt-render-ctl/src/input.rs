//! Loading the `ResourceList` to process.
//!
//! Either a serialized `ResourceList` (stdin or `--input`), or standalone mode: a
//! function config file plus resource files, assembled into a list here.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use ytt_render_shared::resource::LEGACY_PATH_ANNOTATION;
use ytt_render_shared::{ResourceDocument, ResourceList};

use crate::error::CtlError;

/// Read a serialized `ResourceList` from `path`, or from stdin when `path` is `None`.
pub(crate) fn read_resource_list(path: Option<&Path>) -> Result<ResourceList, CtlError> {
    let (origin, text) = match path {
        Some(path) => (path.display().to_string(), read_file(path)?),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(CtlError::Stdin)?;
            ("stdin".to_string(), text)
        }
    };

    ResourceList::from_yaml(&text).map_err(|source| CtlError::Input { origin, source })
}

/// Build a `ResourceList` from a function config file and resource files.
///
/// Every document of every resource file becomes an item, in file order. Items without
/// a path annotation are stamped with the name of the file they came from.
pub(crate) fn load_standalone(
    function_config: &Path,
    resources: &[PathBuf],
) -> Result<ResourceList, CtlError> {
    let config = ResourceDocument::parse(&read_file(function_config)?).map_err(|source| {
        CtlError::Input {
            origin: function_config.display().to_string(),
            source,
        }
    })?;

    let mut items = Vec::new();
    for path in resources {
        let documents =
            ResourceDocument::parse_all(&read_file(path)?).map_err(|source| CtlError::Input {
                origin: path.display().to_string(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        for mut document in documents {
            if document.diagnostic_path().is_none() {
                document.set_annotation(LEGACY_PATH_ANNOTATION, file_name.clone());
            }
            items.push(document);
        }
    }

    tracing::debug!(
        function_config = %function_config.display(),
        items = items.len(),
        "Loaded standalone input"
    );

    Ok(ResourceList {
        items,
        function_config: Some(config),
        ..ResourceList::default()
    })
}

fn read_file(path: &Path) -> Result<String, CtlError> {
    fs::read_to_string(path).map_err(|source| CtlError::Read {
        path: path.to_path_buf(),
        source,
    })
}
