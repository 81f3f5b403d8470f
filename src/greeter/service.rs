//! Service layer running the banner, load, call and print sequence.

use std::ffi::CString;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::common::config::BridgeCfg;
use crate::common::error::BridgeResult;

use super::domain::{Greeter, Greeting, BANNER, DEFAULT_NAME};
use super::loader::NativeLib;

/// Bridge to one native greeter library, identified by path.
#[derive(Clone, Debug)]
pub struct Bridge {
    library_path: PathBuf,
    name: String,
}

impl Bridge {
    pub fn new(library_path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: library_path.into(),
            name: DEFAULT_NAME.to_string(),
        }
    }

    pub fn from_cfg(cfg: &BridgeCfg) -> Self {
        Self::new(&cfg.cpp_dll_path).with_name(cfg.name.clone())
    }

    /// Replace the name handed to `hello_world`.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn library_path(&self) -> &Path {
        &self.library_path
    }

    /// Print the banner, then load the library, call `hello_world` and print
    /// its reply. The banner is written even when loading or binding fails.
    pub fn greet<W: Write>(&self, out: &mut W) -> BridgeResult<Greeting> {
        write_banner(out)?;
        let lib = NativeLib::open(&self.library_path)?;
        if let Some(version) = lib.api_version() {
            log::debug!("{} reports api version {version}", lib.path().display());
        }
        call_and_print(&lib, &self.name, out)
    }
}

/// Same sequence as [`Bridge::greet`] against an already available greeter.
pub fn greet_with<G: Greeter, W: Write>(
    greeter: &G,
    name: &str,
    out: &mut W,
) -> BridgeResult<Greeting> {
    write_banner(out)?;
    call_and_print(greeter, name, out)
}

fn write_banner<W: Write>(out: &mut W) -> BridgeResult<()> {
    writeln!(out, "{BANNER}")?;
    out.flush()?;
    Ok(())
}

fn call_and_print<G: Greeter, W: Write>(
    greeter: &G,
    name: &str,
    out: &mut W,
) -> BridgeResult<Greeting> {
    let name = CString::new(name)?;
    let greeting = greeter.hello_world(&name)?;
    writeln!(out, "{greeting}")?;
    Ok(greeting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::{BridgeCode, BridgeError};
    use crate::greeter::domain::compose_message;
    use std::cell::RefCell;
    use std::ffi::CStr;

    /// In-process stand-in for a native module.
    #[derive(Default)]
    struct FakeGreeter {
        seen: RefCell<Vec<String>>,
    }

    impl Greeter for FakeGreeter {
        fn hello_world(&self, name: &CStr) -> BridgeResult<Greeting> {
            self.seen
                .borrow_mut()
                .push(name.to_string_lossy().into_owned());
            let reply = compose_message(name.to_bytes());
            Ok(Greeting::new(String::from_utf8(reply).unwrap()))
        }
    }

    struct NullGreeter;

    impl Greeter for NullGreeter {
        fn hello_world(&self, _name: &CStr) -> BridgeResult<Greeting> {
            Err(BridgeError::null_return("hello_world"))
        }
    }

    #[test]
    fn prints_banner_then_greeting() {
        let greeter = FakeGreeter::default();
        let mut out = Vec::new();

        let greeting = greet_with(&greeter, DEFAULT_NAME, &mut out).unwrap();

        assert_eq!(greeting.as_str(), "Hello TinyTorch_Cpp! From C++ lib.");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Hello TinyTorch! From Python script.\nHello TinyTorch_Cpp! From C++ lib.\n"
        );
        assert_eq!(greeter.seen.borrow().as_slice(), ["TinyTorch_Cpp"]);
    }

    #[test]
    fn missing_library_still_prints_banner() {
        let bridge = Bridge::new("/nonexistent/dir/libtinytorch.so");
        let mut out = Vec::new();

        let err = bridge.greet(&mut out).unwrap_err();

        assert_eq!(err.code(), BridgeCode::Load);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{BANNER}\n"));
    }

    #[test]
    fn failed_call_prints_no_greeting() {
        let mut out = Vec::new();
        let err = greet_with(&NullGreeter, DEFAULT_NAME, &mut out).unwrap_err();
        assert_eq!(err.code(), BridgeCode::BadReturn);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{BANNER}\n"));
    }

    #[test]
    fn interior_nul_is_rejected_before_the_call() {
        let greeter = FakeGreeter::default();
        let mut out = Vec::new();
        let err = greet_with(&greeter, "Tiny\0Torch", &mut out).unwrap_err();
        assert_eq!(err.code(), BridgeCode::InvalidArgument);
        assert!(greeter.seen.borrow().is_empty());
    }

    #[test]
    fn from_cfg_carries_path_and_name() {
        let cfg = BridgeCfg {
            cpp_dll_path: PathBuf::from("/opt/tt/libtinytorch.so"),
            name: "Tester".to_string(),
        };
        let bridge = Bridge::from_cfg(&cfg);
        assert_eq!(bridge.library_path(), Path::new("/opt/tt/libtinytorch.so"));
        assert_eq!(bridge.name, "Tester");
    }
}
