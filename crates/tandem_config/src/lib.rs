//! Parsing and validation of `tandem.toml`.
//!
//! Every section is optional; a missing file yields [`TandemConfig::default`],
//! which drives Icarus Verilog (`iverilog` + `vvp`) with a 1000-trial
//! harness.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_or_default, CONFIG_FILE_NAME};
pub use types::*;
