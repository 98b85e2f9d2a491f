//! Focused-application lookup via `_NET_ACTIVE_WINDOW` and `WM_CLASS`.
//!
//! The class half of `WM_CLASS` is the closest X11 analogue of a macOS
//! bundle identifier and is what the password-manager denylist matches.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{self, Atom, AtomEnum, Window};
use x11rb::rust_connection::RustConnection;

use crate::snapshot::SnapshotError;

/// Upper bound on the `WM_CLASS` read, in 32-bit units.
const WM_CLASS_MAX_LEN: u32 = 256;

pub struct FocusTracker {
    conn: RustConnection,
    root: Window,
    net_active_window: Atom,
}

impl FocusTracker {
    /// Connect to the X11 display named by `$DISPLAY`.
    pub fn connect() -> Result<Self, SnapshotError> {
        let (conn, screen_num) = RustConnection::connect(None)
            .map_err(|e| SnapshotError::Focus(format!("X11 connect failed: {e}")))?;

        let root = conn.setup().roots[screen_num].root;

        let net_active_window = xproto::intern_atom(&conn, false, b"_NET_ACTIVE_WINDOW")
            .map_err(|e| SnapshotError::Focus(format!("intern_atom: {e}")))?
            .reply()
            .map_err(|e| SnapshotError::Focus(format!("intern_atom reply: {e}")))?
            .atom;

        Ok(Self {
            conn,
            root,
            net_active_window,
        })
    }

    /// Class name of the focused window's application, if any.
    pub fn focused_app(&self) -> Result<Option<String>, SnapshotError> {
        let Some(window) = self.active_window()? else {
            return Ok(None);
        };

        let reply = xproto::get_property(
            &self.conn,
            false,
            window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            0,
            WM_CLASS_MAX_LEN,
        )
        .map_err(|e| SnapshotError::Focus(format!("get_property WM_CLASS: {e}")))?
        .reply()
        .map_err(|e| SnapshotError::Focus(format!("get_property reply: {e}")))?;

        if reply.format != 8 {
            return Ok(None);
        }
        Ok(parse_wm_class(&reply.value))
    }

    fn active_window(&self) -> Result<Option<Window>, SnapshotError> {
        let reply = xproto::get_property(
            &self.conn,
            false,
            self.root,
            self.net_active_window,
            AtomEnum::WINDOW,
            0,
            1,
        )
        .map_err(|e| SnapshotError::Focus(format!("get_property _NET_ACTIVE_WINDOW: {e}")))?
        .reply()
        .map_err(|e| SnapshotError::Focus(format!("get_property reply: {e}")))?;

        if reply.format != 32 || reply.value.len() < 4 {
            return Ok(None);
        }

        let window = u32::from_ne_bytes([
            reply.value[0],
            reply.value[1],
            reply.value[2],
            reply.value[3],
        ]);

        Ok((window != 0).then_some(window))
    }
}

/// `WM_CLASS` is `instance\0class\0`. Prefer the class; fall back to the
/// instance when the class is missing.
fn parse_wm_class(value: &[u8]) -> Option<String> {
    let mut parts = value
        .split(|b| *b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned());
    let instance = parts.next()?;
    Some(parts.next().unwrap_or(instance))
}
