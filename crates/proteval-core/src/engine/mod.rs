pub mod config;
pub mod error;
pub mod process;
pub mod report;
pub mod runners;
pub mod sequence;
