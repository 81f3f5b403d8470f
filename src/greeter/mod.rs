//! Greeter bridge: load a native library, call `hello_world`, print the reply.

pub mod domain;
pub mod loader;
pub mod service;

pub use domain::{Greeter, Greeting};
pub use loader::NativeLib;
pub use service::{greet_with, Bridge};
