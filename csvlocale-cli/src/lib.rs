//! CLI library for testing purposes
pub mod args;
pub mod config;
pub mod logging;
pub mod report;
pub mod validation;
pub mod watch;
