//! Error handling primitives shared across the bridge.

use std::path::PathBuf;

use thiserror::Error;

/// Stable error codes. They double as the CLI exit status.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BridgeCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// The native module could not be loaded.
    Load = 1,
    /// The native module does not export the requested symbol.
    Symbol = 2,
    /// An argument could not be passed across the boundary.
    InvalidArgument = 3,
    /// The native call returned a null pointer or undecodable bytes.
    BadReturn = 4,
    /// Writing the output failed.
    Io = 5,
    /// Configuration could not be read or parsed.
    Config = 6,
}

/// Canonical error type for the crate.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to load native library {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("symbol `{symbol}` not found in {}: {source}", .path.display())]
    Symbol {
        symbol: &'static str,
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("argument contains an interior NUL byte at offset {}", .0.nul_position())]
    InvalidArgument(#[from] std::ffi::NulError),

    #[error("`{symbol}` returned {reason}")]
    BadReturn {
        symbol: &'static str,
        reason: &'static str,
    },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

/// Result alias used throughout the crate.
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Machine readable code for this error.
    pub fn code(&self) -> BridgeCode {
        match self {
            BridgeError::Load { .. } => BridgeCode::Load,
            BridgeError::Symbol { .. } => BridgeCode::Symbol,
            BridgeError::InvalidArgument(_) => BridgeCode::InvalidArgument,
            BridgeError::BadReturn { .. } => BridgeCode::BadReturn,
            BridgeError::Io(_) => BridgeCode::Io,
            BridgeError::Config { .. } => BridgeCode::Config,
        }
    }

    pub(crate) const fn null_return(symbol: &'static str) -> Self {
        Self::BadReturn {
            symbol,
            reason: "a null pointer",
        }
    }

    pub(crate) const fn not_utf8(symbol: &'static str) -> Self {
        Self::BadReturn {
            symbol,
            reason: "bytes that are not valid UTF-8",
        }
    }

    pub(crate) fn config<S: Into<String>>(path: impl Into<PathBuf>, reason: S) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
