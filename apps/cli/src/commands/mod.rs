//! Command implementations for the `ctutor` CLI.

pub mod explain;
pub mod generate;
pub mod jobs;
pub mod prepare;
pub mod train;
pub mod types;
