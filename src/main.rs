use std::io;
use std::process::ExitCode;

use tinytorch::common::log as logging;
use tinytorch::{Bridge, BridgeCfg, BridgeError};

fn main() -> ExitCode {
    logging::init(logging::level_from_env());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("hello-tinytorch: {err}");
            ExitCode::from(err.code() as u8)
        }
    }
}

fn run() -> Result<(), BridgeError> {
    let cfg = BridgeCfg::load()?;
    log::debug!("native library path {}", cfg.cpp_dll_path.display());

    let bridge = Bridge::from_cfg(&cfg);
    let stdout = io::stdout();
    bridge.greet(&mut stdout.lock())?;
    Ok(())
}
