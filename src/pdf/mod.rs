pub mod content;
pub mod layout;

use anyhow::Result;

pub use layout::{group_into_rows, reconstruct_text, GlyphRun, ROW_THRESHOLD};

/// Best-effort text of a PDF: each page reconstructed independently,
/// pages separated by a newline.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let pages = content::glyph_runs_by_page(bytes)?;
    Ok(pages
        .into_iter()
        .map(reconstruct_text)
        .collect::<Vec<_>>()
        .join("\n"))
}
