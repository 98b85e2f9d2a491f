//! Clipboard poll loop.
//!
//! The clipboard is a single mutable slot, so polling coalesces: a burst
//! of copies between two ticks is observed only as its final state.
//! [`Poller`] does blocking I/O through its adapter; the daemon runs it
//! on a dedicated thread and feeds snapshots to the engine.

use crate::snapshot::{
    ChangeToken, ClipboardSnapshot, ClipboardWriter, RestorePayload, SnapshotError, SnapshotReader,
};

/// Last observed change token.
#[derive(Debug, Default, Clone, Copy)]
pub struct PollState {
    last_token: Option<ChangeToken>,
}

impl PollState {
    /// Record `token`. Returns `true` if it differs from the last one.
    pub fn observe(&mut self, token: ChangeToken) -> bool {
        if self.last_token == Some(token) {
            return false;
        }
        self.last_token = Some(token);
        true
    }
}

pub struct Poller<R> {
    reader: R,
    state: PollState,
}

impl<R: SnapshotReader> Poller<R> {
    /// Wrap `reader`, priming the state with the current token so that
    /// whatever is on the clipboard at startup is not captured.
    pub fn new(reader: R) -> Self {
        let mut poller = Self {
            reader,
            state: PollState::default(),
        };
        poller.resync();
        poller
    }

    /// Read the clipboard if its token moved since the last poll.
    ///
    /// Returns `None` when nothing changed or the clipboard could not be
    /// read; a failed read is treated as "no item".
    pub fn poll(&mut self) -> Option<ClipboardSnapshot> {
        let token = match self.reader.change_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::debug!(error = %e, "clipboard change check failed");
                return None;
            }
        };
        if !self.state.observe(token) {
            return None;
        }

        match self.reader.read() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!(error = %e, "clipboard read failed");
                None
            }
        }
    }

    /// Accept the current clipboard state as already seen.
    pub fn resync(&mut self) {
        match self.reader.change_token() {
            Ok(token) => {
                self.state.observe(token);
            }
            Err(e) => tracing::debug!(error = %e, "clipboard token read failed"),
        }
    }
}

impl<R: SnapshotReader + ClipboardWriter> Poller<R> {
    /// Write `payload` to the clipboard and resync, so the write-back
    /// is never captured as a new copy.
    pub fn restore(&mut self, payload: &RestorePayload) -> Result<(), SnapshotError> {
        self.reader.write(payload)?;
        self.resync();
        Ok(())
    }
}
