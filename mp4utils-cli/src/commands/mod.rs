//! Command implementations for the CLI.

/// The batch run: plan, confirm, convert, join, clean up.
pub mod run;
