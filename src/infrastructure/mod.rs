//! Infrastructure layer module
//!
//! Process-level concerns shared by the binary and the library:
//! - Settings loading (figment)
//! - Logging (tracing)

pub mod config;
pub mod logging;
