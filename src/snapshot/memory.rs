//! In-memory clipboard for tests.
//!
//! Cloned handles share one slot, so a test can keep a handle to
//! simulate user copies while the poller owns another. Every `set`
//! bumps the change token, mirroring a pasteboard change counter.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::{
    ChangeToken, ClipboardSnapshot, ClipboardWriter, FileEntry, RestorePayload, SnapshotError,
    SnapshotReader,
};

#[derive(Debug, Default)]
struct Slot {
    counter: u64,
    current: Option<ClipboardSnapshot>,
    writes: Vec<RestorePayload>,
    fail_reads: bool,
    fail_writes: bool,
    read_delay: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the clipboard content. The snapshot's token is replaced
    /// with the next counter value.
    pub fn set(&self, snapshot: ClipboardSnapshot) {
        let mut slot = self.lock();
        slot.counter += 1;
        let token = ChangeToken(slot.counter);
        slot.current = Some(ClipboardSnapshot { token, ..snapshot });
    }

    pub fn set_text(&self, text: &str) {
        self.set(ClipboardSnapshot::new(ChangeToken(0)).with_text(text));
    }

    pub fn set_text_from(&self, text: &str, app: &str) {
        self.set(
            ClipboardSnapshot::new(ChangeToken(0))
                .with_text(text)
                .with_source_app(app),
        );
    }

    /// Make subsequent reads fail until cleared.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make subsequent writes fail until cleared.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Stall every full read by `delay`, like a slow selection owner.
    pub fn delay_reads(&self, delay: Duration) {
        self.lock().read_delay = Some(delay);
    }

    /// Payloads written back so far.
    pub fn writes(&self) -> Vec<RestorePayload> {
        self.lock().writes.clone()
    }
}

impl SnapshotReader for MemoryClipboard {
    fn change_token(&mut self) -> Result<ChangeToken, SnapshotError> {
        let slot = self.lock();
        if slot.fail_reads {
            return Err(SnapshotError::Read("simulated failure".into()));
        }
        Ok(ChangeToken(slot.counter))
    }

    fn read(&mut self) -> Result<Option<ClipboardSnapshot>, SnapshotError> {
        let delay = self.lock().read_delay;
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        let slot = self.lock();
        if slot.fail_reads {
            return Err(SnapshotError::Read("simulated failure".into()));
        }
        Ok(slot.current.clone().filter(|s| !s.is_empty()))
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write(&mut self, payload: &RestorePayload) -> Result<(), SnapshotError> {
        if self.lock().fail_writes {
            return Err(SnapshotError::Write("simulated failure".into()));
        }
        let snapshot = match payload {
            RestorePayload::Data { format, bytes } => {
                ClipboardSnapshot::new(ChangeToken(0)).with_data(format, bytes.clone())
            }
            RestorePayload::Files(paths) => ClipboardSnapshot::new(ChangeToken(0)).with_files(
                paths
                    .iter()
                    .map(|p| {
                        if p.is_dir() {
                            FileEntry::dir(p.clone())
                        } else {
                            FileEntry::file(p.clone())
                        }
                    })
                    .collect(),
            ),
            RestorePayload::Rich {
                representations, ..
            } => ClipboardSnapshot {
                representations: representations.clone(),
                ..ClipboardSnapshot::new(ChangeToken(0))
            },
        };
        self.set(snapshot);
        self.lock().writes.push(payload.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_bumps_token() {
        let mut clip = MemoryClipboard::new();
        let before = clip.change_token().unwrap();
        clip.set_text("a");
        let after = clip.change_token().unwrap();
        assert_ne!(before, after);
        assert_eq!(clip.read().unwrap().unwrap().token, after);
    }

    #[test]
    fn handles_share_state() {
        let writer = MemoryClipboard::new();
        let mut reader = writer.clone();
        writer.set_text("shared");
        assert_eq!(reader.read().unwrap().unwrap().text(), Some("shared"));
    }

    #[test]
    fn write_back_becomes_current() {
        let mut clip = MemoryClipboard::new();
        clip.write(&RestorePayload::Data {
            format: super::super::formats::STRING.into(),
            bytes: b"restored".to_vec(),
        })
        .unwrap();
        assert_eq!(clip.read().unwrap().unwrap().text(), Some("restored"));
        assert_eq!(clip.writes().len(), 1);
    }

    #[test]
    fn simulated_failure() {
        let mut clip = MemoryClipboard::new();
        clip.fail_reads(true);
        assert!(clip.change_token().is_err());
        assert!(clip.read().is_err());

        clip.fail_writes(true);
        let payload = RestorePayload::Files(vec!["/a".into()]);
        assert!(clip.write(&payload).is_err());
        assert!(clip.writes().is_empty());
    }

    #[test]
    fn rich_write_restores_whole_map() {
        let mut clip = MemoryClipboard::new();
        let mut representations = super::super::Representations::new();
        representations.insert("com.figma.node".into(), vec![1]);
        representations.insert(super::super::formats::STRING.into(), b"Frame".to_vec());
        clip.write(&RestorePayload::Rich {
            primary: super::super::formats::STRING.into(),
            representations: representations.clone(),
        })
        .unwrap();
        assert_eq!(clip.read().unwrap().unwrap().representations, representations);
    }
}
