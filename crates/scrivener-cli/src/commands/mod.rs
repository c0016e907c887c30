//! Command implementations.

pub mod config;
pub mod proofread;

pub use self::config::execute_config;
pub use self::proofread::{build_cascade, execute_proofread};
