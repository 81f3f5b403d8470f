//! Domain types for the native greeting exchange.

use std::ffi::CStr;
use std::fmt;

use crate::common::error::BridgeResult;

/// Line printed before the native library is touched.
pub const BANNER: &str = "Hello TinyTorch! From Python script.";

/// Name passed to `hello_world` when nothing else is configured.
pub const DEFAULT_NAME: &str = "TinyTorch_Cpp";

/// Exported symbol the bridge binds.
pub const HELLO_WORLD_SYMBOL: &str = "hello_world";

/// Reply buffer size in bytes, terminating NUL included.
pub const MESSAGE_CAPACITY: usize = 40;

/// Reply used when the composed message does not fit the buffer.
pub const OVERFLOW_MESSAGE: &str = "Hello TinyTorch(len<40)! From C++ lib.";

const PREFIX: &[u8] = b"Hello ";
const SUFFIX: &[u8] = b"! From C++ lib.";

/// Build the reply for `name`, falling back to [`OVERFLOW_MESSAGE`] when the
/// result would need more than `MESSAGE_CAPACITY - 1` bytes.
pub fn compose_message(name: &[u8]) -> Vec<u8> {
    let len = PREFIX.len() + name.len() + SUFFIX.len();
    if len > MESSAGE_CAPACITY - 1 {
        return OVERFLOW_MESSAGE.as_bytes().to_vec();
    }

    let mut message = Vec::with_capacity(len);
    message.extend_from_slice(PREFIX);
    message.extend_from_slice(name);
    message.extend_from_slice(SUFFIX);
    message
}

/// Decoded text of one native reply.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Greeting(String);

impl Greeting {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Greeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can answer a `hello_world` call.
///
/// Implemented by [`NativeLib`](super::loader::NativeLib) for real modules.
pub trait Greeter {
    fn hello_world(&self, name: &CStr) -> BridgeResult<Greeting>;
}
