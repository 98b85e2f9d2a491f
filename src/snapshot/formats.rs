//! Canonical clipboard format tags.
//!
//! Adapters translate platform identifiers into these tags so that the
//! engine reasons about one vocabulary. Canonical tags use the macOS
//! uniform type identifier spelling; X11 selection targets are mapped
//! through [`from_x11_target`] and back through [`to_x11_target`].
//! Targets with no mapping pass through unchanged.

pub const STRING: &str = "public.utf8-plain-text";
pub const TIFF: &str = "public.tiff";
pub const PNG: &str = "public.png";
pub const PDF: &str = "com.adobe.pdf";
pub const FILE_URL: &str = "public.file-url";

/// Image formats in the order they are preferred during capture.
/// PDF is stored as an image for preview purposes.
pub const IMAGE_PREFERENCE: &[(&str, &str)] = &[
    (TIFF, "Image"),
    (PNG, "Image"),
    (PDF, "PDF content"),
];

/// Namespaces of interchangeable system formats. Unmapped X11 MIME
/// targets in the text and image families count as standard too.
const STANDARD_PREFIXES: &[&str] = &["public.", "com.apple.", "dyn.", "text/", "image/"];
const STANDARD_TAGS: &[&str] = &["NeXT RTFD pasteboard type"];

/// X11 target ↔ canonical tag. The first row for a tag is the one used
/// when writing.
const X11_TARGETS: &[(&str, &str)] = &[
    ("UTF8_STRING", STRING),
    ("text/plain;charset=utf-8", STRING),
    ("text/plain", STRING),
    ("STRING", STRING),
    ("TEXT", STRING),
    ("image/png", PNG),
    ("image/tiff", TIFF),
    ("application/pdf", PDF),
    ("text/uri-list", FILE_URL),
    ("text/html", "public.html"),
    ("text/rtf", "public.rtf"),
    ("image/jpeg", "public.jpeg"),
    ("image/gif", "com.compuserve.gif"),
    ("image/bmp", "com.microsoft.bmp"),
    ("image/webp", "org.webmproject.webp"),
    ("image/svg+xml", "public.svg-image"),
];

/// ICCCM bookkeeping targets that never carry content.
const X11_META_TARGETS: &[&str] = &[
    "TARGETS",
    "TIMESTAMP",
    "MULTIPLE",
    "SAVE_TARGETS",
    "DELETE",
    "INCR",
    "COMPOUND_TEXT",
];

/// Toolkit-private targets offered next to ordinary text. They mirror
/// the text rather than add content, so they are never read.
const X11_TOOLKIT_TARGETS: &[&str] = &[
    "GTK_TEXT_BUFFER_CONTENTS",
    "application/x-gtk-text-buffer-rich-text",
    "text/_moz_htmlcontext",
    "text/_moz_htmlinfo",
    "text/x-moz-url-priv",
];

/// Whether a tag belongs to an application-private namespace.
///
/// Plain text that arrives alongside such a tag is kept as rich
/// application data instead of being reduced to its string form.
pub fn is_proprietary(tag: &str) -> bool {
    !(STANDARD_PREFIXES.iter().any(|p| tag.starts_with(p)) || STANDARD_TAGS.contains(&tag))
}

/// Map an X11 selection target to a canonical tag. `None` for
/// bookkeeping targets.
pub fn from_x11_target(target: &str) -> Option<&str> {
    if X11_META_TARGETS.contains(&target) || X11_TOOLKIT_TARGETS.contains(&target) {
        return None;
    }
    Some(
        X11_TARGETS
            .iter()
            .find(|(x11, _)| x11.eq_ignore_ascii_case(target))
            .map_or(target, |(_, tag)| *tag),
    )
}

/// Map a canonical tag back to the X11 target used for writing.
pub fn to_x11_target(tag: &str) -> &str {
    X11_TARGETS
        .iter()
        .find(|(_, canonical)| *canonical == tag)
        .map_or(tag, |(x11, _)| *x11)
}
