//! Text extraction from PDF source documents.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Inclusive, 1-based page range. `end: None` runs to the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: Option<u32>,
}

impl Default for PageRange {
    fn default() -> Self {
        Self {
            start: 1,
            end: None,
        }
    }
}

pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Extract the text of `range` from the PDF at `path`, one page per line block.
///
/// An `end` past the last page is clamped. A page whose text cannot be
/// decoded is skipped with a warning.
pub fn extract_text(path: &Path, range: PageRange) -> Result<String> {
    let doc = lopdf::Document::load(path)
        .with_context(|| format!("Failed to open PDF {}", path.display()))?;

    let total = doc.get_pages().len() as u32;
    let end = range.end.unwrap_or(total).min(total);
    if range.start == 0 || range.start > end {
        bail!(
            "Page range {}..={} is outside {} ({} pages)",
            range.start,
            range.end.map_or_else(|| "end".to_string(), |e| e.to_string()),
            path.display(),
            total
        );
    }

    let mut pages = Vec::with_capacity((end - range.start + 1) as usize);
    for page in range.start..=end {
        match doc.extract_text(&[page]) {
            Ok(text) => pages.push(text),
            Err(e) => warn!(page, error = %e, "Page text unreadable, skipped"),
        }
    }
    debug!(first = range.start, last = end, pages = pages.len(), "Extracted PDF text");

    Ok(pages.join("\n"))
}
