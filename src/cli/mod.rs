//! Command-line interface

/// Crawl command and argument surface
pub mod crawl;

/// CLI error types
pub mod error;

pub use crawl::Cli;
pub use error::CliError;
