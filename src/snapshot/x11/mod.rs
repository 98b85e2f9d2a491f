//! X11 clipboard adapter. Reads and writes CLIPBOARD via `xclip`.
//!
//! The change token counts XFixes selection-owner notifications, so an
//! unchanged clipboard costs no reads. Without XFixes the token is a
//! digest of the full target → bytes read; [`XclipClipboard::change_token`]
//! then performs the read and caches it, and [`XclipClipboard::read`]
//! hands out the cached snapshot for the same token.
//!
//! File copies arrive as `text/uri-list` and are decoded into
//! [`FileEntry`] values, checking the filesystem for directories.

mod focus;
mod watch;
mod xclip;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use url::Url;

use super::formats;
use super::{
    ChangeToken, ClipboardSnapshot, ClipboardWriter, FileEntry, Representations, RestorePayload,
    SnapshotError, SnapshotReader,
};

pub use focus::FocusTracker;
pub use watch::SelectionWatch;

/// How long a write-back may take to show up as a clipboard change.
const SETTLE_TIMEOUT: Duration = Duration::from_millis(250);
const SETTLE_STEP: Duration = Duration::from_millis(10);

/// `xclip`-backed reader and writer.
pub struct XclipClipboard {
    focus: Option<FocusTracker>,
    watch: Option<SelectionWatch>,
    cached: Option<(ChangeToken, Representations)>,
}

impl XclipClipboard {
    /// Create the adapter. Both X11 helpers are optional: without focus
    /// tracking snapshots carry no source application, and without a
    /// selection watch every change check reads the clipboard.
    pub fn new(focus: Option<FocusTracker>, watch: Option<SelectionWatch>) -> Self {
        Self {
            focus,
            watch,
            cached: None,
        }
    }

    /// Connect the X11 helpers, degrading per helper on failure.
    pub fn connect() -> Self {
        let focus = match FocusTracker::connect() {
            Ok(tracker) => Some(tracker),
            Err(e) => {
                tracing::warn!(error = %e, "focus tracking unavailable; source apps will not be recorded");
                None
            }
        };
        let watch = match SelectionWatch::connect() {
            Ok(watch) => Some(watch),
            Err(e) => {
                tracing::warn!(error = %e, "XFixes unavailable; detecting changes by reading the clipboard");
                None
            }
        };
        Self::new(focus, watch)
    }

    /// Owner-change count, or `None` when there is no working watch.
    fn watched_token(&mut self) -> Option<ChangeToken> {
        let watch = self.watch.as_mut()?;
        match watch.generation() {
            Ok(generation) => Some(ChangeToken(generation)),
            Err(e) => {
                tracing::warn!(error = %e, "selection watch lost; falling back to reading the clipboard");
                self.watch = None;
                None
            }
        }
    }

    /// Wait until a write-back is visible as a change, so the poller
    /// resyncs past it rather than capturing it.
    fn settle(&mut self, before: ChangeToken) {
        let deadline = Instant::now() + SETTLE_TIMEOUT;
        while Instant::now() < deadline {
            match self.change_token() {
                Ok(token) if token != before => return,
                Ok(_) => std::thread::sleep(SETTLE_STEP),
                Err(e) => {
                    tracing::debug!(error = %e, "change check after write-back failed");
                    return;
                }
            }
        }
        tracing::debug!("write-back not observed before timeout");
    }

    fn read_all() -> Result<Representations, SnapshotError> {
        let mut reps = Representations::new();
        for target in xclip::list_targets()? {
            let Some(tag) = formats::from_x11_target(&target) else {
                continue;
            };
            // Several X11 targets collapse onto one tag; keep the first.
            if reps.contains_key(tag) {
                continue;
            }
            if let Some(bytes) = xclip::read_target(&target)? {
                reps.insert(tag.to_owned(), bytes);
            }
        }
        Ok(reps)
    }

    fn focused_app(&self) -> Option<String> {
        let tracker = self.focus.as_ref()?;
        match tracker.focused_app() {
            Ok(app) => app,
            Err(e) => {
                tracing::debug!(error = %e, "focused app lookup failed");
                None
            }
        }
    }
}

impl SnapshotReader for XclipClipboard {
    fn change_token(&mut self) -> Result<ChangeToken, SnapshotError> {
        if let Some(token) = self.watched_token() {
            return Ok(token);
        }
        let reps = Self::read_all()?;
        let token = digest(&reps);
        self.cached = Some((token, reps));
        Ok(token)
    }

    fn read(&mut self) -> Result<Option<ClipboardSnapshot>, SnapshotError> {
        let (token, reps) = match self.cached.take() {
            Some(cached) => cached,
            None => {
                let reps = Self::read_all()?;
                let token = self.watched_token().unwrap_or_else(|| digest(&reps));
                (token, reps)
            }
        };
        let files = reps
            .get(formats::FILE_URL)
            .map(|bytes| parse_uri_list(bytes))
            .unwrap_or_default();
        let mut snapshot = ClipboardSnapshot {
            representations: reps,
            ..ClipboardSnapshot::new(token)
        }
        .with_files(files);
        if snapshot.is_empty() {
            return Ok(None);
        }

        if let Some(app) = self.focused_app() {
            snapshot = snapshot.with_source_app(&app);
        }
        Ok(Some(snapshot))
    }
}

impl ClipboardWriter for XclipClipboard {
    fn write(&mut self, payload: &RestorePayload) -> Result<(), SnapshotError> {
        let before = self.change_token().ok();
        self.cached = None;

        // xclip serves a single target per process.
        if let RestorePayload::Files(paths) = payload {
            let list = encode_uri_list(paths);
            xclip::write_target(formats::to_x11_target(formats::FILE_URL), list.as_bytes())?;
        } else {
            let (format, bytes) = payload
                .primary_data()
                .ok_or_else(|| SnapshotError::Write("nothing to write".into()))?;
            xclip::write_target(formats::to_x11_target(format), bytes)?;
        }

        if let Some(before) = before {
            self.settle(before);
        }
        Ok(())
    }
}

fn digest(reps: &Representations) -> ChangeToken {
    let mut hasher = DefaultHasher::new();
    reps.hash(&mut hasher);
    ChangeToken(hasher.finish())
}

/// Decode `text/uri-list` (RFC 2483): one URI per line, `#` comments.
/// Non-`file:` URIs are skipped.
fn parse_uri_list(bytes: &[u8]) -> Vec<FileEntry> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| Url::parse(line).ok())
        .filter(|url| url.scheme() == "file")
        .filter_map(|url| url.to_file_path().ok())
        .map(|path| {
            if path.is_dir() {
                FileEntry::dir(path)
            } else {
                FileEntry::file(path)
            }
        })
        .collect()
}

fn encode_uri_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .filter_map(|p| Url::from_file_path(p).ok())
        .map(|url| format!("{url}\r\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_list_decodes_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes 1.txt");
        std::fs::write(&file, b"x").unwrap();

        let list = format!(
            "# copied\r\n{}\r\n{}\r\nhttps://example.com/\r\n",
            Url::from_file_path(&file).unwrap(),
            Url::from_directory_path(dir.path()).unwrap(),
        );

        let entries = parse_uri_list(list.as_bytes());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, file);
        assert!(!entries[0].is_dir);
        assert!(entries[1].is_dir);
    }

    #[test]
    fn uri_list_encodes_percent_escapes() {
        let encoded = encode_uri_list(&[PathBuf::from("/tmp/a b.txt")]);
        assert_eq!(encoded, "file:///tmp/a%20b.txt\r\n");
    }

    #[test]
    fn uri_list_round_trips_paths() {
        let paths = vec![PathBuf::from("/srv/one"), PathBuf::from("/srv/two words")];
        let decoded: Vec<PathBuf> = parse_uri_list(encode_uri_list(&paths).as_bytes())
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(decoded, paths);
    }

    #[test]
    fn digest_tracks_content() {
        let mut a = Representations::new();
        a.insert(formats::STRING.into(), b"one".to_vec());
        let mut b = a.clone();
        assert_eq!(digest(&a), digest(&b));
        b.insert(formats::STRING.into(), b"two".to_vec());
        assert_ne!(digest(&a), digest(&b));
    }
}
