//! Dynamic loading of the native greeter module.
//!
//! The foreign signature is fixed by [`HelloWorldFn`]; a module exporting a
//! differently typed `hello_world` cannot be detected and is undefined
//! behavior to call.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use crate::common::error::{BridgeError, BridgeResult};

use super::domain::{Greeter, Greeting, HELLO_WORLD_SYMBOL};

/// `const char* hello_world(const char* name)`.
pub type HelloWorldFn = unsafe extern "C" fn(*const c_char) -> *const c_char;

/// `uint32_t tinytorch_api_version(void)`.
pub type ApiVersionFn = unsafe extern "C" fn() -> u32;

const API_VERSION_SYMBOL: &str = "tinytorch_api_version";

/// A loaded native module. The module is unloaded when this is dropped.
#[derive(Debug)]
pub struct NativeLib {
    path: PathBuf,
    lib: Library,
}

impl NativeLib {
    /// Load the module at `path`.
    pub fn open(path: &Path) -> BridgeResult<Self> {
        // SAFETY: loading runs the module's initialisers; the module is
        // trusted to be a greeter library built for this platform.
        let lib = unsafe { Library::new(path) }.map_err(|source| BridgeError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded native library {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            lib,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ABI version reported by the module, if it exports one.
    pub fn api_version(&self) -> Option<u32> {
        let version = self.symbol::<ApiVersionFn>(API_VERSION_SYMBOL).ok()?;
        // SAFETY: the symbol is declared with the exported signature.
        Some(unsafe { version() })
    }

    fn symbol<T>(&self, name: &'static str) -> BridgeResult<Symbol<'_, T>> {
        // SAFETY: callers pick `T` to match the exported signature.
        unsafe { self.lib.get::<T>(name.as_bytes()) }.map_err(|source| BridgeError::Symbol {
            symbol: name,
            path: self.path.clone(),
            source,
        })
    }
}

impl Greeter for NativeLib {
    fn hello_world(&self, name: &CStr) -> BridgeResult<Greeting> {
        let hello_world = self.symbol::<HelloWorldFn>(HELLO_WORLD_SYMBOL)?;
        log::debug!("calling {HELLO_WORLD_SYMBOL}({name:?})");

        // SAFETY: `name` is NUL terminated and outlives the call.
        let reply = unsafe { hello_world(name.as_ptr()) };
        if reply.is_null() {
            return Err(BridgeError::null_return(HELLO_WORLD_SYMBOL));
        }

        // SAFETY: the contract promises a NUL terminated string owned by the
        // module; it is copied out before the library handle can drop.
        let text = unsafe { CStr::from_ptr(reply) }
            .to_str()
            .map_err(|_| BridgeError::not_utf8(HELLO_WORLD_SYMBOL))?;
        Ok(Greeting::new(text))
    }
}
