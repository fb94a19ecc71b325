/// Text shown next to a bookmark in listings.
use std::path::{Path, PathBuf};

const ELLIPSIS: &str = "...";

/// Returns the trimmed content of `line` in `text`, shortened to `max_chars`.
///
/// Longer lines keep `max_chars - 3` characters followed by `...`.
/// `None` when `text` has no such line.
pub fn line_preview(text: &str, line: usize, max_chars: usize) -> Option<String> {
    let content = text.split('\n').nth(line)?.trim();
    if content.chars().count() <= max_chars {
        return Some(content.to_string());
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut short: String = content.chars().take(keep).collect();
    short.push_str(ELLIPSIS);
    Some(short)
}

/// Shows `path` relative to the first root containing it.
pub fn display_path(path: &Path, roots: &[PathBuf]) -> String {
    roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}
