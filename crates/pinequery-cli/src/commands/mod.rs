//! CLI command handlers

pub mod providers;
pub mod query;
pub mod serve;
