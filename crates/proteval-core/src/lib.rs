//! # Proteval Core Library
//!
//! A library for computing structural and energetic quality metrics for protein
//! structures supplied as PDB-format coordinate files.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains the stateless structure data model
//!   (`Structure`, `Chain`, `Residue`, `Atom`), PDB I/O, the pre-flight monomer
//!   validator, and panic-free numeric parsing utilities.
//!
//! - **[`engine`]: The Logic Core.** Owns the heterogeneous scoring subsystems:
//!   the in-process sequence/composition analyzer, one runner per energy function
//!   (BudeFF in-process, EvoEF2/DFIRE2/Rosetta/Aggrescan3D as sandboxed
//!   subprocesses), the fixed-schema result records, and the tool configuration.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It
//!   ties the `engine` and `core` together into a single metrics-aggregation
//!   pipeline that fans out to every scoring subsystem, isolates per-tool
//!   failures, and merges the partial results into one composite report.

pub mod core;
pub mod engine;
pub mod workflows;
