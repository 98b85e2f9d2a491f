//! History items and the category-specific duplicate rule.

use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

use crate::classify::TextKind;
use crate::snapshot::{Representations, RestorePayload, formats};

/// Unique item identifier. Assigned at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Semantic classification of a captured item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Text,
    Code,
    Url,
    Image,
    File,
    Folder,
    /// Several files, possibly mixed with folders.
    Files,
    /// Several folders and nothing else.
    Folders,
    /// Opaque or multi-representation application data.
    Other,
}

impl Category {
    /// Text, code and URL share one duplicate bucket.
    pub fn is_textual(self) -> bool {
        matches!(self, Category::Text | Category::Code | Category::Url)
    }

    pub fn is_file_like(self) -> bool {
        matches!(
            self,
            Category::File | Category::Folder | Category::Files | Category::Folders
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Code => "code",
            Category::Url => "url",
            Category::Image => "image",
            Category::File => "file",
            Category::Folder => "folder",
            Category::Files => "files",
            Category::Folders => "folders",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TextKind> for Category {
    fn from(kind: TextKind) -> Self {
        match kind {
            TextKind::Url => Category::Url,
            TextKind::Code => Category::Code,
            TextKind::Text => Category::Text,
        }
    }
}

/// Category-specific binary data.
///
/// Image bytes are stored undecoded; a corrupt image is a display
/// problem, not a capture problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub image: Option<Vec<u8>>,
    pub files: Option<Vec<PathBuf>>,
    pub representations: Option<Representations>,
}

/// A normalized capture that has not been admitted to history yet.
///
/// Has no id or timestamp, so duplicates can be detected without
/// minting identifiers that would be thrown away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub content: String,
    pub payload: Payload,
    pub category: Category,
    pub source_format: String,
    pub source_app: Option<String>,
}

impl Candidate {
    /// The copied text, if this candidate came from the plain-text
    /// representation. Used to decide whether the secret check applies.
    pub fn captured_text(&self) -> Option<&str> {
        (self.source_format == formats::STRING).then_some(self.content.as_str())
    }

    /// Whether `item` holds the same clipboard content.
    ///
    /// - text/code/url: same bucket and identical `content`;
    /// - image: identical image bytes;
    /// - file-like: identical category and path list, order-sensitive;
    /// - other: identical format-tag → bytes maps.
    ///
    /// Categories never match across these groups.
    pub fn same_content_as(&self, item: &ClipboardItem) -> bool {
        let (mine, theirs) = (&self.payload, &item.payload);
        match self.category {
            c if c.is_textual() => item.category.is_textual() && item.content == self.content,
            Category::Image => {
                item.category == Category::Image
                    && both_some_and_eq(&mine.image, &theirs.image)
            }
            c if c.is_file_like() => {
                item.category == c && both_some_and_eq(&mine.files, &theirs.files)
            }
            Category::Other => {
                item.category == Category::Other
                    && both_some_and_eq(&mine.representations, &theirs.representations)
            }
            _ => false,
        }
    }

    pub(crate) fn into_item(self, captured_at: u64) -> ClipboardItem {
        ClipboardItem {
            id: ItemId::new(),
            content: self.content,
            payload: self.payload,
            category: self.category,
            source_format: self.source_format,
            source_app: self.source_app,
            captured_at,
        }
    }
}

fn both_some_and_eq<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// One history entry. Immutable once created; promotion moves it
/// without touching any field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub id: ItemId,
    /// Text for text/code/url, a human-readable label otherwise.
    pub content: String,
    pub payload: Payload,
    pub category: Category,
    /// Format the item was captured under; used when writing it back.
    pub source_format: String,
    pub source_app: Option<String>,
    /// Unix epoch milliseconds. Informational; never used for ordering.
    pub captured_at: u64,
}

impl ClipboardItem {
    /// What to write to the clipboard to re-insert this item.
    ///
    /// Files go back as a path list. Images go back as their bytes
    /// under the captured format. Rich application data goes back as
    /// its full representation map, with the captured format as the
    /// primary. Everything else goes back as plain text.
    pub fn restore_payload(&self) -> RestorePayload {
        let payload = &self.payload;
        if let Some(files) = payload.files.as_ref().filter(|_| self.category.is_file_like()) {
            return RestorePayload::Files(files.clone());
        }
        if let Some(bytes) = payload.image.as_ref().filter(|_| self.category == Category::Image) {
            return RestorePayload::Data {
                format: self.source_format.clone(),
                bytes: bytes.clone(),
            };
        }
        if let Some(reps) = payload
            .representations
            .as_ref()
            .filter(|reps| self.category == Category::Other && !reps.is_empty())
        {
            return RestorePayload::Rich {
                primary: self.source_format.clone(),
                representations: reps.clone(),
            };
        }
        RestorePayload::Data {
            format: formats::STRING.to_owned(),
            bytes: self.content.as_bytes().to_vec(),
        }
    }

    /// Size of the primary data in bytes, for listings.
    pub fn byte_length(&self) -> usize {
        let payload = &self.payload;
        match self.category {
            Category::Image => payload.image.as_ref().map_or(0, Vec::len),
            Category::Other => payload
                .representations
                .as_ref()
                .map_or(0, |reps| reps.values().map(Vec::len).sum()),
            _ => self.content.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(category: Category, content: &str) -> Candidate {
        Candidate {
            content: content.into(),
            payload: Payload::default(),
            category,
            source_format: formats::STRING.into(),
            source_app: None,
        }
    }

    fn image(bytes: &[u8]) -> Candidate {
        Candidate {
            content: "Image".into(),
            payload: Payload {
                image: Some(bytes.to_vec()),
                ..Payload::default()
            },
            category: Category::Image,
            source_format: formats::PNG.into(),
            source_app: None,
        }
    }

    fn files(category: Category, paths: &[&str]) -> Candidate {
        Candidate {
            content: "files".into(),
            payload: Payload {
                files: Some(paths.iter().map(PathBuf::from).collect()),
                ..Payload::default()
            },
            category,
            source_format: formats::FILE_URL.into(),
            source_app: None,
        }
    }

    fn other(pairs: &[(&str, u8)]) -> Candidate {
        let reps = pairs
            .iter()
            .map(|(tag, byte)| (tag.to_string(), vec![*byte]))
            .collect();
        Candidate {
            content: "Data".into(),
            payload: Payload {
                representations: Some(reps),
                ..Payload::default()
            },
            category: Category::Other,
            source_format: "A".into(),
            source_app: None,
        }
    }

    #[test]
    fn textual_bucket_ignores_subcategory() {
        let existing = text(Category::Code, "let x = 1; // y").into_item(0);
        assert!(text(Category::Text, "let x = 1; // y").same_content_as(&existing));
        assert!(!text(Category::Text, "let x = 2; // y").same_content_as(&existing));
    }

    #[test]
    fn images_compare_bytes() {
        let existing = image(&[1, 2, 3]).into_item(0);
        assert!(image(&[1, 2, 3]).same_content_as(&existing));
        assert!(!image(&[1, 2, 4]).same_content_as(&existing));
    }

    #[test]
    fn files_compare_category_and_order() {
        let existing = files(Category::Files, &["/a", "/b"]).into_item(0);
        assert!(files(Category::Files, &["/a", "/b"]).same_content_as(&existing));
        assert!(!files(Category::Files, &["/b", "/a"]).same_content_as(&existing));
        assert!(!files(Category::Folders, &["/a", "/b"]).same_content_as(&existing));
    }

    #[test]
    fn other_compares_full_maps() {
        let existing = other(&[("A", 1), ("B", 2)]).into_item(0);
        assert!(other(&[("A", 1), ("B", 2)]).same_content_as(&existing));
        assert!(!other(&[("A", 1), ("B", 3)]).same_content_as(&existing));
        assert!(!other(&[("A", 1)]).same_content_as(&existing));
    }

    #[test]
    fn no_cross_category_matches() {
        let label = text(Category::Text, "Image").into_item(0);
        assert!(!image(&[]).same_content_as(&label));
        let pic = image(&[1]).into_item(0);
        assert!(!text(Category::Text, "Image").same_content_as(&pic));
        let data = other(&[("A", 1)]).into_item(0);
        assert!(!text(Category::Text, "Data").same_content_as(&data));
    }

    #[test]
    fn new_items_get_distinct_ids() {
        let a = text(Category::Text, "same").into_item(0);
        let b = text(Category::Text, "same").into_item(0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn captured_text_only_for_string_format() {
        assert_eq!(text(Category::Text, "hi").captured_text(), Some("hi"));
        assert_eq!(image(&[1]).captured_text(), None);
    }

    #[test]
    fn restore_text_as_string() {
        let item = text(Category::Url, "https://example.com").into_item(0);
        assert_eq!(
            item.restore_payload(),
            RestorePayload::Data {
                format: formats::STRING.into(),
                bytes: b"https://example.com".to_vec(),
            }
        );
    }

    #[test]
    fn restore_image_under_source_format() {
        let item = image(&[9, 9]).into_item(0);
        assert_eq!(
            item.restore_payload(),
            RestorePayload::Data {
                format: formats::PNG.into(),
                bytes: vec![9, 9],
            }
        );
    }

    #[test]
    fn restore_files_as_paths() {
        let item = files(Category::Files, &["/a", "/b"]).into_item(0);
        assert_eq!(
            item.restore_payload(),
            RestorePayload::Files(vec![PathBuf::from("/a"), PathBuf::from("/b")])
        );
    }

    #[test]
    fn restore_other_keeps_every_representation() {
        let item = other(&[("A", 7), ("B", 8)]).into_item(0);
        assert_eq!(
            item.restore_payload(),
            RestorePayload::Rich {
                primary: "A".into(),
                representations: item.payload.representations.clone().unwrap(),
            }
        );
    }

    #[test]
    fn byte_length_per_category() {
        assert_eq!(text(Category::Text, "abcd").into_item(0).byte_length(), 4);
        assert_eq!(image(&[1, 2, 3]).into_item(0).byte_length(), 3);
        assert_eq!(other(&[("A", 1), ("B", 2)]).into_item(0).byte_length(), 2);
    }
}
