//! One runner per energy function.
//!
//! BudeFF is evaluated in-process; the other four shell out to their
//! respective tools through [`crate::engine::process`]. Every runner is
//! infallible at its signature: execution failures are captured into an
//! all-`None` result record rather than propagated.

pub mod aggrescan3d;
pub mod budeff;
pub mod dfire2;
pub mod evoef2;
pub mod rosetta;
