//! # Node Runtime Library
//!
//! Bootstraps an in-process Blokka network. The `main.rs` binary wires these
//! pieces to the environment, stdin and Ctrl+C.
//!
//! - `config` - [`RuntimeConfig`] and its environment overrides
//! - `input` - stdin transaction lines
//! - `runtime` - [`NodeRuntime`]: spawn, full-mesh peering, submission

pub mod config;
pub mod input;
pub mod runtime;

pub use config::{load_config, ConfigError, RuntimeConfig};
pub use input::{parse_line, InputError, TransactionRequest};
pub use runtime::NodeRuntime;
