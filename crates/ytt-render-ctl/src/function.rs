//! The KRM function body: configure, render, report.

use ytt_render_pipeline::render;
use ytt_render_shared::{PipelineConfig, ResourceList, ResultLog};

use crate::error::CtlError;

/// Render `list` in place.
///
/// Results gathered along the way are appended to `list.results` whether or not the
/// request succeeds.
pub(crate) fn process(list: &mut ResourceList) -> Result<(), CtlError> {
    let mut results = ResultLog::new();
    let outcome = run(list, &mut results);
    list.results.extend(results.into_items());
    outcome
}

fn run(list: &mut ResourceList, results: &mut ResultLog) -> Result<(), CtlError> {
    let function_config = list.function_config();
    if function_config.is_none() {
        results.warning("No function config provided. Default values will be used.");
    }

    let config = PipelineConfig::from_function_config(function_config).inspect_err(|err| {
        results.error_detailed(
            "Failed to parse function config",
            [("error", err.to_string())],
        );
    })?;
    results.set_level(config.log_level);

    render(&mut list.items, &config, results)?;
    Ok(())
}
