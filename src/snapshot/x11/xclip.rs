//! Thin wrappers over `xclip -selection clipboard`.
//!
//! Synchronous (`std::process::Command`) to satisfy the reader and
//! writer traits; each call is one short-lived process.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::snapshot::SnapshotError;

/// List the targets the current selection owner offers.
///
/// An empty clipboard (no owner) makes xclip exit non-zero; that is
/// reported as an empty list rather than an error.
pub fn list_targets() -> Result<Vec<String>, SnapshotError> {
    let output = Command::new("xclip")
        .args(["-selection", "clipboard", "-t", "TARGETS", "-o"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| SnapshotError::Read(format!("failed to spawn xclip: {e}")))?;

    if !output.status.success() {
        return Ok(Vec::new());
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Read the bytes of one target. `Ok(None)` if the owner refused it.
pub fn read_target(target: &str) -> Result<Option<Vec<u8>>, SnapshotError> {
    let output = Command::new("xclip")
        .args(["-selection", "clipboard", "-t", target, "-o"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| SnapshotError::Read(format!("failed to spawn xclip -o: {e}")))?;

    if output.status.success() && !output.stdout.is_empty() {
        Ok(Some(output.stdout))
    } else {
        Ok(None)
    }
}

/// Take ownership of the clipboard and serve `content` under `target`.
pub fn write_target(target: &str, content: &[u8]) -> Result<(), SnapshotError> {
    let mut child = Command::new("xclip")
        .args(["-selection", "clipboard", "-t", target, "-i"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| SnapshotError::Write(format!("failed to spawn xclip: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(content)
            .map_err(|e| SnapshotError::Write(format!("failed to write to xclip: {e}")))?;
        // Drop stdin to close the pipe so xclip can fork and exit.
    }

    let status = child
        .wait()
        .map_err(|e| SnapshotError::Write(format!("failed to wait for xclip: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(SnapshotError::Write(format!(
            "xclip exited with status {status}"
        )))
    }
}
