//! Render pipeline for the `ytt-render` KRM function.
//!
//! One request flows through four stages, strictly in sequence:
//!
//! ```text
//! classify → stage → invoke → recompose
//! ```
//!
//! - [`classifier`]: assigns each resource a [`Role`]
//! - [`stager`]: writes template and data-values resources into a fresh staging directory
//! - [`invoker`]: runs the ytt binary over the staged files
//! - [`recomposer`]: splits ytt's output and writes each document into an output resource
//!
//! [`render`] drives the whole flow for one `ResourceList`.

pub mod classifier;
pub mod error;
pub mod invoker;
pub mod recomposer;
mod render;
pub mod stager;

#[cfg(test)]
pub(crate) mod test_support;

pub use classifier::{classify, Role};
pub use error::{PipelineError, PipelineResult};
pub use invoker::{invoke, EngineOutput};
pub use recomposer::recompose;
pub use render::render;
pub use stager::{stage, StagedFile, StagedSet, StagingDirectory};
