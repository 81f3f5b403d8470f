// lib.rs - native greeter export and the bridge that loads it
pub mod api;
pub mod common;
pub mod greeter;

pub use common::{BridgeCfg, BridgeCode, BridgeError, BridgeResult};
pub use greeter::{greet_with, Bridge, Greeter, Greeting, NativeLib};
