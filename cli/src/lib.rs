//! Library entry point for diasys-cli components.
//!
//! Exposes the reusable pieces of the terminal client (configuration, the
//! file-backed token store, output formatting, logging setup) so integration
//! tests can exercise them without going through the binary entry point.

pub mod config;
pub mod credentials;
pub mod error;
pub mod formatter;
pub mod logging;

pub use config::CLIConfiguration;
pub use credentials::FileTokenStore;
pub use error::{CLIError, Result};
pub use formatter::{OutputFormat, OutputFormatter};
