//! Snapshot reader contract: normalized reads of the system clipboard.
//!
//! Platform adapters implement [`SnapshotReader`] (and usually
//! [`ClipboardWriter`]) so the engine never touches OS clipboard APIs.
//! The only assumptions the core makes:
//!
//! - the [`ChangeToken`] changes exactly when clipboard content changes;
//! - each format tag yields bytes or nothing.
//!
//! Format tags are canonicalized by the adapter (see [`formats`]).

pub mod formats;
#[cfg(test)]
pub mod memory;
pub mod x11;

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Format tag → raw bytes. Ordered by tag; equality compares every
/// key and value.
pub type Representations = BTreeMap<String, Vec<u8>>;

/// Opaque value that differs whenever the clipboard content differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeToken(pub u64);

/// A file or folder reference carried by the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl FileEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// One read of the clipboard across every available format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    pub token: ChangeToken,
    /// Every format that yielded bytes.
    pub representations: Representations,
    /// Decoded file references, empty unless files were copied.
    pub files: Vec<FileEntry>,
    /// Identity of the application that had focus at read time
    /// (bundle identifier on macOS, `WM_CLASS` class on X11).
    pub source_app: Option<String>,
}

impl ClipboardSnapshot {
    pub fn new(token: ChangeToken) -> Self {
        Self {
            token,
            representations: Representations::new(),
            files: Vec::new(),
            source_app: None,
        }
    }

    pub fn with_files(mut self, files: Vec<FileEntry>) -> Self {
        self.files = files;
        self
    }

    pub fn with_source_app(mut self, app: &str) -> Self {
        self.source_app = Some(app.to_owned());
        self
    }

    /// Available format tags, in tag order.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.representations.keys().map(String::as_str)
    }

    /// Raw bytes for a format tag.
    pub fn data(&self, tag: &str) -> Option<&[u8]> {
        self.representations.get(tag).map(Vec::as_slice)
    }

    /// The plain-text representation, if present and valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        self.data(formats::STRING)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn is_empty(&self) -> bool {
        self.representations.is_empty() && self.files.is_empty()
    }
}

#[cfg(test)]
impl ClipboardSnapshot {
    pub fn with_text(self, text: &str) -> Self {
        self.with_data(formats::STRING, text.as_bytes().to_vec())
    }

    pub fn with_data(mut self, tag: &str, bytes: Vec<u8>) -> Self {
        self.representations.insert(tag.to_owned(), bytes);
        self
    }
}

/// What to put back on the clipboard when an item is re-selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestorePayload {
    /// Raw bytes under a single canonical format tag.
    Data { format: String, bytes: Vec<u8> },
    /// A list of file references.
    Files(Vec<PathBuf>),
    /// Every representation of a multi-format item. Adapters that can
    /// serve only one format use `primary`.
    Rich {
        primary: String,
        representations: Representations,
    },
}

impl RestorePayload {
    /// The single format and bytes to serve when only one can be offered.
    /// `None` for file lists.
    pub fn primary_data(&self) -> Option<(&str, &[u8])> {
        match self {
            RestorePayload::Data { format, bytes } => Some((format, bytes)),
            RestorePayload::Files(_) => None,
            RestorePayload::Rich {
                primary,
                representations,
            } => representations
                .get_key_value(primary)
                .or_else(|| representations.iter().next())
                .map(|(tag, bytes)| (tag.as_str(), bytes.as_slice())),
        }
    }
}

/// Reads the system clipboard.
///
/// `Send` is required because the daemon loop runs on a tokio task.
pub trait SnapshotReader: Send {
    /// Current change token. Expected to be cheap relative to [`read`].
    ///
    /// [`read`]: SnapshotReader::read
    fn change_token(&mut self) -> Result<ChangeToken, SnapshotError>;

    /// Read the full clipboard state. `Ok(None)` when the clipboard
    /// holds nothing readable.
    fn read(&mut self) -> Result<Option<ClipboardSnapshot>, SnapshotError>;
}

/// Writes an item back onto the system clipboard.
pub trait ClipboardWriter: Send {
    fn write(&mut self, payload: &RestorePayload) -> Result<(), SnapshotError>;
}

/// Errors returned by clipboard adapters.
///
/// Read errors are transient from the core's point of view: the poll
/// tick is skipped. Write errors are reported to whoever asked for the
/// write.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Clipboard read failed (e.g. xclip not found, selection owner gone).
    #[error("clipboard read: {0}")]
    Read(String),

    /// Clipboard write failed.
    #[error("clipboard write: {0}")]
    Write(String),

    /// Focused-application lookup failed.
    #[error("focus: {0}")]
    Focus(String),
}
