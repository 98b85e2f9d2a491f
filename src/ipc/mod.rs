//! IPC codec and wire protocol: length-prefixed MessagePack over a
//! Unix domain socket.

use std::path::PathBuf;

pub mod codec;
pub mod protocol;

/// Daemon socket path: `$XDG_RUNTIME_DIR/clippo/daemon.sock`.
///
/// `None` when `$XDG_RUNTIME_DIR` is unset.
pub fn socket_path() -> Option<PathBuf> {
    let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR")?;
    Some(PathBuf::from(runtime_dir).join("clippo").join("daemon.sock"))
}
