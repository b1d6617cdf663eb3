//! Command implementations for the CLI
//!
//! - start: Start the HTTP server
//! - estimate: Price a job, once or interactively
//! - test: Test configuration validity
//! - config: Configuration display and validation

pub mod config;
pub mod estimate;
pub mod start;
pub mod test;
