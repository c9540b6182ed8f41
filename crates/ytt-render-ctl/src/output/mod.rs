//! Terminal output for `render-ytt`.
//!
//! Stdout carries only the `ResourceList`. Human-facing messages go to stderr,
//! styled through `anstream`, which drops the colors when stderr is not a terminal.

mod styles;

use std::io::{self, Write};

use ytt_render_shared::ResourceList;

use crate::error::CtlError;

pub(crate) use styles::clap_styles;

use styles::ERROR;

/// Print an error message to stderr.
pub(crate) fn error(msg: impl std::fmt::Display) {
    let mut out = anstream::stderr().lock();
    writeln!(out, "{ERROR}✗ {msg}{ERROR:#}").ok();
}

/// Serialize the `ResourceList` to stdout.
pub(crate) fn resource_list(list: &ResourceList) -> Result<(), CtlError> {
    let yaml = list.to_yaml().map_err(CtlError::Serialize)?;
    let mut out = io::stdout().lock();
    out.write_all(yaml.as_bytes())
        .and_then(|()| out.flush())
        .map_err(CtlError::Stdout)
}
