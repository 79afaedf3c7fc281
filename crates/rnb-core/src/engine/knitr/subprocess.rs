/*
 * engine/knitr/subprocess.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * R subprocess management for the knitr engine.
 */

//! R subprocess management for the knitr engine.
//!
//! # Finding Rscript
//!
//! [`find_rscript`] searches in this order:
//! 1. An explicit hint (the `RNB_R` option): an Rscript binary or an R
//!    installation directory
//! 2. System PATH via `which`
//!
//! # Driver Process
//!
//! [`KnitrProcess`] runs the embedded driver script under Rscript and
//! keeps it alive across requests, so every cell of a refresh shares one R
//! session. The driver announces itself with a first response carrying the
//! knitr version, or a missing-package error.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tempfile::NamedTempFile;

use super::protocol::{KnitrRequest, KnitrResponse};
use crate::codec::normalize_utf8;
use crate::engine::error::RenderError;

/// The driver script, written to a temp file when a process starts.
const DRIVER_SCRIPT: &str = include_str!("resources/driver.R");

// ============================================================================
// Rscript Discovery
// ============================================================================

/// Find the Rscript binary.
///
/// `hint` may point directly at an Rscript binary or at an R installation
/// directory (searched for `bin/Rscript`, then `Rscript`).
pub fn find_rscript(hint: Option<&Path>) -> Option<PathBuf> {
    if let Some(hint) = hint {
        if hint.is_file() && is_rscript(hint) {
            return Some(hint.to_path_buf());
        }

        if hint.is_dir() {
            let rscript_in_bin = hint.join("bin").join(rscript_name());
            if rscript_in_bin.is_file() {
                return Some(rscript_in_bin);
            }

            let rscript_direct = hint.join(rscript_name());
            if rscript_direct.is_file() {
                return Some(rscript_direct);
            }
        }

        tracing::warn!(hint = %hint.display(), "RNB_R does not point at Rscript; searching PATH");
    }

    which::which("Rscript").ok()
}

/// Get the platform-appropriate Rscript binary name.
fn rscript_name() -> &'static str {
    #[cfg(windows)]
    {
        "Rscript.exe"
    }
    #[cfg(not(windows))]
    {
        "Rscript"
    }
}

/// Check if a path looks like an Rscript binary.
fn is_rscript(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name == "Rscript" || name == "Rscript.exe")
}

// ============================================================================
// Driver Process
// ============================================================================

/// A running knitr driver.
pub struct KnitrProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// Kept alive for as long as R may still be reading it.
    _script: NamedTempFile,
}

impl KnitrProcess {
    /// Start the driver under `rscript` in `working_dir`.
    ///
    /// With `quiet`, R's stderr (messages, warnings) is discarded instead of
    /// shown on the console.
    pub fn spawn(rscript: &Path, working_dir: &Path, quiet: bool) -> Result<Self, RenderError> {
        let mut script = NamedTempFile::with_suffix(".R")?;
        script.write_all(DRIVER_SCRIPT.as_bytes())?;
        script.flush()?;

        let mut cmd = Command::new(rscript);
        cmd.args(["--no-save", "--no-restore"])
            .arg(script.path())
            .current_dir(working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(if quiet { Stdio::null() } else { Stdio::inherit() });

        let mut child = cmd.spawn().map_err(|e| {
            RenderError::protocol(
                "knitr",
                format!("failed to spawn Rscript ({}): {}", rscript.display(), e),
            )
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(RenderError::protocol("knitr", "Rscript pipes unavailable"));
        };

        let mut process = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            _script: script,
        };

        let knitr_version = process.read_response()?.into_result()?;
        tracing::info!(
            rscript = %rscript.display(),
            knitr = %knitr_version,
            "Started knitr driver"
        );
        Ok(process)
    }

    /// Send one request and wait for its response.
    pub fn call(&mut self, request: &KnitrRequest<'_>) -> Result<String, RenderError> {
        let mut line = serde_json::to_string(request)
            .map_err(|e| RenderError::protocol("knitr", format!("failed to encode request: {e}")))?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.flush()?;

        self.read_response()?.into_result()
    }

    /// Read stdout until the next driver response.
    fn read_response(&mut self) -> Result<KnitrResponse, RenderError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = self.stdout.read_until(b'\n', &mut buf)?;
            if n == 0 {
                let status = self.child.wait()?;
                return Err(RenderError::protocol(
                    "knitr",
                    format!("R process exited unexpectedly ({status})"),
                ));
            }

            let line = normalize_utf8(&buf).map_err(|e| RenderError::Encoding(e.to_string()))?;
            match KnitrResponse::parse_line(&line) {
                Some(response) => return response,
                None => tracing::debug!(output = line.trim_end(), "R output outside a response"),
            }
        }
    }
}

impl Drop for KnitrProcess {
    fn drop(&mut self) {
        // Closing stdin ends the driver loop; kill in case it is stuck in user code.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
