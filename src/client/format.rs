//! Output formatting for CLI client commands.
//!
//! Human-readable tables and status lines on stdout. Previews are
//! already cut to one line by the daemon.

use crate::ipc::protocol::{ItemDescriptor, Message};

/// Print history as a table, newest first.
pub fn print_history(items: &[ItemDescriptor]) {
    if items.is_empty() {
        println!("History is empty");
        return;
    }

    println!(
        "{:>3}  {:<8} {:>9}  {:<20} PREVIEW",
        "#", "CATEGORY", "SIZE", "SOURCE"
    );
    println!("{}", "-".repeat(80));
    for (index, item) in items.iter().enumerate() {
        println!("{}", format_row(index, item));
    }
}

pub fn print_selected(index: u32, item: &ItemDescriptor) {
    println!(
        "Restored #{index} ({}, {}) to the clipboard",
        item.category,
        format_size(item.byte_length)
    );
}

pub fn print_cleared() {
    println!("History cleared");
}

/// Print a pushed event as it arrives.
pub fn print_event(event: &Message) {
    match event {
        Message::Changed { items, .. } => {
            println!("History changed ({} items)", items.len());
            for (index, item) in items.iter().enumerate() {
                println!("{}", format_row(index, item));
            }
        }
        Message::Ignored { reason, .. } => println!("{reason}"),
        _ => {}
    }
}

fn format_row(index: usize, item: &ItemDescriptor) -> String {
    format!(
        "{:>3}  {:<8} {:>9}  {:<20} {}",
        index,
        item.category,
        format_size(item.byte_length),
        truncate(item.source_app.as_deref().unwrap_or("-"), 20),
        item.preview,
    )
}

/// Byte count with a binary unit.
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(source_app: Option<&str>) -> ItemDescriptor {
        ItemDescriptor {
            id: "id".into(),
            category: "code".into(),
            preview: "fn main() {".into(),
            source_format: "public.utf8-plain-text".into(),
            source_app: source_app.map(str::to_owned),
            captured_at: 0,
            byte_length: 2048,
        }
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }

    #[test]
    fn row_fields() {
        let row = format_row(2, &item(Some("Alacritty")));
        assert!(row.starts_with("  2  code"));
        assert!(row.contains("2.0 KiB"));
        assert!(row.contains("Alacritty"));
        assert!(row.ends_with("fn main() {"));
    }

    #[test]
    fn row_without_source() {
        let row = format_row(0, &item(None));
        assert!(row.contains(" - "));
    }
}
