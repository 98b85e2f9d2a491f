//! Snapshot → candidate item.
//!
//! Detection order matters: file managers put an icon image on the
//! clipboard next to the file reference, so files are checked before
//! images, and images before text. Anything left is kept as opaque
//! application data.

use std::path::Path;

use crate::classify::{self, TextKind};
use crate::snapshot::{ClipboardSnapshot, FileEntry, formats};

use super::item::{Candidate, Category, Payload};

/// Build a candidate from a snapshot. `None` when the snapshot carries
/// nothing capturable.
pub fn normalize(snapshot: &ClipboardSnapshot) -> Option<Candidate> {
    let source_app = snapshot.source_app.clone();

    if !snapshot.files.is_empty() {
        let (category, content) = describe_files(&snapshot.files);
        return Some(Candidate {
            content,
            payload: Payload {
                files: Some(snapshot.files.iter().map(|f| f.path.clone()).collect()),
                ..Payload::default()
            },
            category,
            source_format: formats::FILE_URL.to_owned(),
            source_app,
        });
    }

    for (tag, label) in formats::IMAGE_PREFERENCE {
        if let Some(bytes) = snapshot.data(tag) {
            return Some(Candidate {
                content: (*label).to_owned(),
                payload: Payload {
                    image: Some(bytes.to_vec()),
                    representations: Some(snapshot.representations.clone()),
                    ..Payload::default()
                },
                category: Category::Image,
                source_format: (*tag).to_owned(),
                source_app,
            });
        }
    }

    if let Some(text) = snapshot.text() {
        let kind = classify::classify(text);
        let category = if kind == TextKind::Text && snapshot.formats().any(formats::is_proprietary)
        {
            Category::Other
        } else {
            Category::from(kind)
        };
        return Some(Candidate {
            content: text.to_owned(),
            payload: Payload {
                representations: Some(snapshot.representations.clone()),
                ..Payload::default()
            },
            category,
            source_format: formats::STRING.to_owned(),
            source_app,
        });
    }

    let first_format = snapshot.formats().next()?.to_owned();
    Some(Candidate {
        content: "Data".to_owned(),
        payload: Payload {
            representations: Some(snapshot.representations.clone()),
            ..Payload::default()
        },
        category: Category::Other,
        source_format: first_format,
        source_app,
    })
}

/// Category and label for a file list: the file name for a single
/// entry, `N Folders` when every entry is a folder, `N Files` otherwise.
fn describe_files(files: &[FileEntry]) -> (Category, String) {
    if let [single] = files {
        let category = if single.is_dir {
            Category::Folder
        } else {
            Category::File
        };
        return (category, file_name(&single.path));
    }

    if files.iter().all(|f| f.is_dir) {
        (Category::Folders, format!("{} Folders", files.len()))
    } else {
        (Category::Files, format!("{} Files", files.len()))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
