//! Host facts for the `os` command.

use crate::error::{FmError, FmResult};
use std::path::PathBuf;
use sysinfo::{CpuRefreshKind, RefreshKind, System};

#[cfg(windows)]
pub const EOL: &str = "\r\n";
#[cfg(not(windows))]
pub const EOL: &str = "\n";

/// Answers one of the enumerated `os` sub-flags. An unknown flag is an
/// invalid-input outcome, not an operation failure.
pub fn fact(flag: &str) -> FmResult<Vec<String>> {
    match flag {
        "--EOL" => Ok(vec![format!("{EOL:?}")]),
        "--cpus" => Ok(cpu_models()),
        "--homedir" => Ok(vec![home_dir().display().to_string()]),
        "--username" => Ok(vec![whoami::username()]),
        "--architecture" => Ok(vec![architecture().to_string()]),
        _ => Err(FmError::InvalidInput),
    }
}

/// One line per logical CPU with its model name.
fn cpu_models() -> Vec<String> {
    let sys = System::new_with_specifics(
        RefreshKind::new().with_cpu(CpuRefreshKind::everything()),
    );
    sys.cpus()
        .iter()
        .map(|cpu| cpu.brand().trim().to_string())
        .collect()
}

pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Conventional short architecture tokens; the Rust identifier otherwise.
fn architecture() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        other => other,
    }
}
