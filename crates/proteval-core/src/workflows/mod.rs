//! High-level entry points.
//!
//! The [`metrics`] workflow is the public API of the crate: it takes PDB
//! text and a tool configuration and produces one composite metrics report,
//! orchestrating validation, relabelling, the in-process analyses, and the
//! external-tool runners.

pub mod metrics;
