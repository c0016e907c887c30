//! Scrivener CLI library.
//!
//! Wires the proofreading pipeline to plain-text files: configuration
//! loading, cascade assembly, the document collaborator, and report output.
//!
//! ```text
//! scrivener proofread thesis.txt --mode conservative --report run.json
//! scrivener config init
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use document::TextDocument;
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};
