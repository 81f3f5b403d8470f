//! Shared utilities used by the bridge and the exported API.
pub mod config;
pub mod error;
pub mod log;

pub use config::BridgeCfg;
pub use error::{BridgeCode, BridgeError, BridgeResult};
