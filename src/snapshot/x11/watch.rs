//! Clipboard change counter from XFixes selection-owner notifications.
//!
//! Every `SetSelectionOwner` on CLIPBOARD produces one notify event,
//! including a second copy from the application that already owns it.
//! Counting them gives a change token without reading the selection.

use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xfixes::{self, SelectionEventMask};
use x11rb::protocol::xproto;
use x11rb::rust_connection::RustConnection;

use crate::snapshot::SnapshotError;

pub struct SelectionWatch {
    conn: RustConnection,
    generation: u64,
}

impl SelectionWatch {
    /// Connect to `$DISPLAY` and subscribe to CLIPBOARD owner changes.
    pub fn connect() -> Result<Self, SnapshotError> {
        let (conn, screen_num) = RustConnection::connect(None).map_err(read_err("connect"))?;
        let root = conn.setup().roots[screen_num].root;

        // Required before any other XFixes request.
        xfixes::query_version(&conn, 5, 0)
            .map_err(read_err("xfixes query_version"))?
            .reply()
            .map_err(read_err("xfixes query_version reply"))?;

        let clipboard = xproto::intern_atom(&conn, false, b"CLIPBOARD")
            .map_err(read_err("intern_atom"))?
            .reply()
            .map_err(read_err("intern_atom reply"))?
            .atom;

        xfixes::select_selection_input(
            &conn,
            root,
            clipboard,
            SelectionEventMask::SET_SELECTION_OWNER
                | SelectionEventMask::SELECTION_WINDOW_DESTROY
                | SelectionEventMask::SELECTION_CLIENT_CLOSE,
        )
        .map_err(read_err("select_selection_input"))?;
        conn.flush().map_err(read_err("flush"))?;

        Ok(Self {
            conn,
            generation: 0,
        })
    }

    /// Drain queued notifications and return the number seen so far.
    pub fn generation(&mut self) -> Result<u64, SnapshotError> {
        while let Some(event) = self.conn.poll_for_event().map_err(read_err("poll_for_event"))? {
            if is_owner_change(&event) {
                self.generation += 1;
            }
        }
        Ok(self.generation)
    }
}

fn is_owner_change(event: &Event) -> bool {
    matches!(event, Event::XfixesSelectionNotify(_))
}

fn read_err<E: std::fmt::Display>(what: &'static str) -> impl Fn(E) -> SnapshotError {
    move |e| SnapshotError::Read(format!("X11 {what}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_selection_notify_counts() {
        assert!(!is_owner_change(&Event::Unknown(vec![0; 32])));
    }

    #[test]
    fn errors_name_the_request() {
        let err = read_err("flush")("broken pipe");
        assert_eq!(err.to_string(), "clipboard read: X11 flush: broken pipe");
    }
}
