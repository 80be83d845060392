//! Subcommand implementations

pub mod lint;
pub mod rules;
