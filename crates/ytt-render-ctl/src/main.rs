//! `render-ytt`: a KRM function that renders ytt templates embedded in resources.
//!
//! ```bash
//! # As a kpt function: ResourceList on stdin, ResourceList on stdout
//! kpt fn source pkg/ | render-ytt
//!
//! # Standalone: function config plus resource files
//! render-ytt fn-config.yaml templates.yaml outputs.yaml
//! ```
//!
//! Diagnostics are returned in `ResourceList.results`; process logs go to stderr
//! (filtered by `RUST_LOG`, with `ytt_render=info` always enabled).

mod error;
mod function;
mod input;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use ytt_render_shared::ResourceList;

use crate::error::CtlError;

#[derive(Debug, Parser)]
#[command(name = "render-ytt", version)]
#[command(about = "Render ytt templates embedded in KRM resources")]
#[command(styles = output::clap_styles())]
struct Cli {
    /// Read the ResourceList from FILE instead of stdin
    #[arg(long, short, value_name = "FILE", conflicts_with = "function_config")]
    input: Option<PathBuf>,

    /// Function config document (standalone mode)
    #[arg(value_name = "FUNCTION_CONFIG")]
    function_config: Option<PathBuf>,

    /// Resource files to render, each possibly holding several documents (standalone mode)
    #[arg(value_name = "RESOURCE_FILE", requires = "function_config")]
    resources: Vec<PathBuf>,
}

impl Cli {
    fn load(&self) -> Result<ResourceList, CtlError> {
        match &self.function_config {
            Some(function_config) => input::load_standalone(function_config, &self.resources),
            None => input::read_resource_list(self.input.as_deref()),
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ytt_render=info".parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing() {
        output::error(format!("failed to initialize logging: {err}"));
        return ExitCode::FAILURE;
    }

    let mut list = match cli.load() {
        Ok(list) => list,
        Err(err) => {
            output::error(err);
            return ExitCode::FAILURE;
        }
    };

    let outcome = function::process(&mut list);
    if let Err(err) = output::resource_list(&list) {
        output::error(err);
        return ExitCode::FAILURE;
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "render-ytt failed");
            output::error(err);
            ExitCode::FAILURE
        }
    }
}
