use ytt_render_shared::{PipelineConfig, ResourceDocument, ResultLog};

use crate::classifier::{classify, Role};
use crate::error::PipelineResult;
use crate::invoker::invoke;
use crate::recomposer::recompose;
use crate::stager::{stage, StagedSet};

/// Render one request: stage the templates, run ytt, and fill the output resources.
///
/// The staging directory is gone by the time this returns, whatever the outcome.
pub fn render(
    items: &mut [ResourceDocument],
    config: &PipelineConfig,
    results: &mut ResultLog,
) -> PipelineResult<()> {
    let StagedSet { files, directory } = stage(items, &config.rules, results)?;
    let output = invoke(&files, &config.engine, results)?;
    directory.close()?;

    let mut targets: Vec<&mut ResourceDocument> = items
        .iter_mut()
        .filter(|item| classify(item, &config.rules) == Role::Output)
        .collect();

    recompose(&output, &mut targets, &config.rules, results)
}
