//! Runtime configuration loaded from an optional TOML file and the environment.
//!
//! Precedence is defaults, then the file, then environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::error::{BridgeError, BridgeResult};
use crate::greeter::domain::DEFAULT_NAME;

/// File read when `TINYTORCH_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "tinytorch.toml";

/// Snapshot of configuration values consumed by the bridge.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BridgeCfg {
    /// Location of the native greeter library.
    pub cpp_dll_path: PathBuf,
    /// Name handed to `hello_world`.
    pub name: String,
}

/// On-disk shape of `tinytorch.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileCfg {
    cpp_dll_path: Option<PathBuf>,
    name: Option<String>,
}

impl Default for BridgeCfg {
    fn default() -> Self {
        Self {
            cpp_dll_path: default_library_path(),
            name: DEFAULT_NAME.to_string(),
        }
    }
}

/// `./libtinytorch.so`, `./libtinytorch.dylib` or `./tinytorch.dll`.
pub fn default_library_path() -> PathBuf {
    Path::new(".").join(libloading::library_filename("tinytorch"))
}

impl BridgeCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> BridgeResult<Self> {
        Self::from_sources(|key| env::var(key).ok())
    }

    /// Resolve the configuration using `lookup` in place of the environment.
    pub fn from_sources<F>(lookup: F) -> BridgeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        match lookup("TINYTORCH_CONFIG").filter(|v| !v.is_empty()) {
            Some(path) => cfg.merge_file(Path::new(&path))?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    cfg.merge_file(fallback)?;
                }
            }
        }

        if let Some(path) = lookup("TINYTORCH_CPP_DLL_PATH").filter(|v| !v.is_empty()) {
            cfg.cpp_dll_path = PathBuf::from(path);
        }
        if let Some(name) = lookup("TINYTORCH_GREET_NAME") {
            cfg.name = name;
        }

        Ok(cfg)
    }

    /// Overlay the values found in a TOML file onto this snapshot.
    pub fn merge_file(&mut self, path: &Path) -> BridgeResult<()> {
        let raw = fs::read_to_string(path)
            .map_err(|err| BridgeError::config(path, err.to_string()))?;
        let file: FileCfg =
            toml::from_str(&raw).map_err(|err| BridgeError::config(path, err.message()))?;

        if let Some(lib) = file.cpp_dll_path {
            self.cpp_dll_path = if lib.is_relative() {
                path.parent().unwrap_or_else(|| Path::new(".")).join(lib)
            } else {
                lib
            };
        }
        if let Some(name) = file.name {
            self.name = name;
        }
        log::debug!("merged configuration from {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::BridgeCode;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_cfg(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(body.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_point_at_the_platform_library() {
        let cfg = BridgeCfg::default();
        assert_eq!(cfg.name, "TinyTorch_Cpp");
        let file_name = cfg.cpp_dll_path.file_name().unwrap();
        assert_eq!(file_name, libloading::library_filename("tinytorch").as_os_str());
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_cfg("cpp_dll_path = \"/opt/tt/libtt.so\"\nname = \"FromFile\"\n");
        let cfg = BridgeCfg::from_sources(env_of(&[
            ("TINYTORCH_CONFIG", file.path().to_str().unwrap()),
            ("TINYTORCH_GREET_NAME", "FromEnv"),
        ]))
        .unwrap();

        assert_eq!(cfg.cpp_dll_path, PathBuf::from("/opt/tt/libtt.so"));
        assert_eq!(cfg.name, "FromEnv");
    }

    #[test]
    fn relative_library_path_resolves_against_config_dir() {
        let file = write_cfg("cpp_dll_path = \"build/libtt.so\"\n");
        let cfg = BridgeCfg::from_sources(env_of(&[(
            "TINYTORCH_CONFIG",
            file.path().to_str().unwrap(),
        )]))
        .unwrap();

        let expected = file.path().parent().unwrap().join("build/libtt.so");
        assert_eq!(cfg.cpp_dll_path, expected);
    }

    #[test]
    fn empty_library_env_is_ignored() {
        let cfg = BridgeCfg::from_sources(env_of(&[("TINYTORCH_CPP_DLL_PATH", "")])).unwrap();
        assert_eq!(cfg.cpp_dll_path, default_library_path());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = BridgeCfg::from_sources(env_of(&[(
            "TINYTORCH_CONFIG",
            "/definitely/not/here/tinytorch.toml",
        )]))
        .unwrap_err();
        assert_eq!(err.code(), BridgeCode::Config);
    }

    #[test]
    fn empty_config_env_is_ignored() {
        let cfg = BridgeCfg::from_sources(env_of(&[("TINYTORCH_CONFIG", "")])).unwrap();
        assert_eq!(cfg, BridgeCfg::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_cfg("cpp_dll = \"typo.so\"\n");
        let err = BridgeCfg::from_sources(env_of(&[(
            "TINYTORCH_CONFIG",
            file.path().to_str().unwrap(),
        )]))
        .unwrap_err();
        assert_eq!(err.code(), BridgeCode::Config);
    }
}
