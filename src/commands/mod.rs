//! Command implementations
//!
//! Each module corresponds to a subcommand in the CLI.

pub mod cleanup;
pub mod clone;

pub use cleanup::{run as cleanup_run, CleanupOutcome};
pub use clone::{build_plan, run as clone_run, ClonePlan, Endpoint};
