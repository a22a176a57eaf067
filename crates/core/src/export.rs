//! Plain-text and Markdown export of Hall-of-Fame records.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Output document format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
}

impl ExportFormat {
    /// `Content-Type` header value for the rendered document.
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
        }
    }

    /// File extension used in the download filename.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(CoreError::validation(format!(
                "Unknown export format '{other}', expected 'text' or 'markdown'"
            ))),
        }
    }
}

/// Borrowed view of one record to export.
#[derive(Debug, Clone, Copy)]
pub struct ExportEntry<'a> {
    pub star_count: i32,
    pub character_name: Option<&'a str>,
    pub author_id: i64,
    pub content: &'a str,
    pub added_at: Timestamp,
}

/// Render `entries` in the requested format, preserving their order.
pub fn render(format: ExportFormat, entries: &[ExportEntry<'_>]) -> String {
    match format {
        ExportFormat::Text => render_text(entries),
        ExportFormat::Markdown => render_markdown(entries),
    }
}

fn speaker(entry: &ExportEntry<'_>) -> String {
    match entry.character_name {
        Some(name) => format!("{name} (user {})", entry.author_id),
        None => format!("user {}", entry.author_id),
    }
}

fn star_label(count: i32) -> String {
    if count == 1 {
        "1 star".to_string()
    } else {
        format!("{count} stars")
    }
}

fn render_text(entries: &[ExportEntry<'_>]) -> String {
    let mut out = format!("Hall of Fame export ({} messages)\n\n", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "#{} | {}", i + 1, star_label(entry.star_count));
        let _ = writeln!(
            out,
            "{} | {}",
            speaker(entry),
            entry.added_at.format("%Y-%m-%d %H:%M UTC")
        );
        let _ = writeln!(out, "{}", entry.content);
        out.push_str("----------------------------------------\n");
    }
    out
}

fn render_markdown(entries: &[ExportEntry<'_>]) -> String {
    let mut out = String::from("# Hall of Fame\n\n");
    let _ = writeln!(out, "_{} immortalized messages_\n", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "## {}. {} | {}\n",
            i + 1,
            speaker(entry),
            star_label(entry.star_count)
        );
        let _ = writeln!(out, "*Added {}*\n", entry.added_at.format("%Y-%m-%d %H:%M UTC"));
        for line in entry.content.lines() {
            let _ = writeln!(out, "> {line}");
        }
        out.push_str("\n---\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entries() -> Vec<ExportEntry<'static>> {
        let at = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 18, 30, 0).unwrap();
        vec![
            ExportEntry {
                star_count: 14,
                character_name: Some("Vex"),
                author_id: 11,
                content: "The lantern went out.",
                added_at: at,
            },
            ExportEntry {
                star_count: 10,
                character_name: None,
                author_id: 22,
                content: "Nobody move.\nNobody breathe.",
                added_at: at,
            },
        ]
    }

    #[test]
    fn parses_format_aliases() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("TEXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn both_formats_include_each_record_once_with_star_count() {
        let entries = entries();
        for format in [ExportFormat::Text, ExportFormat::Markdown] {
            let doc = render(format, &entries);
            assert_eq!(doc.matches("The lantern went out.").count(), 1, "{format:?}");
            assert_eq!(doc.matches("Nobody breathe.").count(), 1, "{format:?}");
            assert!(doc.contains("14 stars"), "{format:?}");
            assert!(doc.contains("10 stars"), "{format:?}");
        }
    }

    #[test]
    fn markdown_quotes_multiline_content() {
        let doc = render(ExportFormat::Markdown, &entries());
        assert!(doc.contains("> Nobody move.\n> Nobody breathe.\n"));
        assert!(doc.starts_with("# Hall of Fame"));
    }

    #[test]
    fn empty_export_still_has_header() {
        let doc = render(ExportFormat::Text, &[]);
        assert_eq!(doc, "Hall of Fame export (0 messages)\n\n");
    }
}
