//! C-compatible API exported by the `cdylib`.
//!
//! Returned strings are owned by the library and must not be freed.

use std::cell::RefCell;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;

use crate::greeter::domain::{compose_message, MESSAGE_CAPACITY};

/// ABI version to coordinate with loaders.
pub const API_VERSION: u32 = 1;

thread_local! {
    static REPLY: RefCell<[c_char; MESSAGE_CAPACITY]> =
        const { RefCell::new([0; MESSAGE_CAPACITY]) };
}

#[no_mangle]
pub extern "C" fn tinytorch_api_version() -> u32 {
    API_VERSION
}

/// Greet `name`, returning a NUL terminated reply of at most 39 bytes.
///
/// The reply lives in a per-thread buffer and stays valid until the next
/// call from the same thread. A null `name` yields a null pointer.
///
/// # Safety
///
/// `name` must be null or point to a NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn hello_world(name: *const c_char) -> *const c_char {
    if name.is_null() {
        return ptr::null();
    }

    let name = unsafe { CStr::from_ptr(name) }.to_bytes();
    let message = compose_message(name);

    REPLY.with(|slot| {
        let mut buf = slot.borrow_mut();
        buf.fill(0);
        for (dst, &byte) in buf.iter_mut().zip(&message) {
            *dst = byte as c_char;
        }
        buf.as_ptr()
    })
}
