//! Page-ordered text assembly, independent of the PDF backend.

use crate::ExtractError;

/// Anything that can report a page count and per-page text fragments.
///
/// Pages are numbered from 1. Fragments come back in the order the document
/// stores them; no reordering by position happens here.
pub trait PageSource {
    fn page_count(&self) -> u32;

    fn page_fragments(&self, page: u32) -> Result<Vec<String>, ExtractError>;
}

/// Join fragments with a space within a page and pages with a newline, then
/// trim the whole thing.
///
/// Fails on the first unreadable page; nothing partial is returned.
pub fn assemble_text<S: PageSource + ?Sized>(source: &S) -> Result<String, ExtractError> {
    let mut out = String::new();
    for page in 1..=source.page_count() {
        let fragments = source.page_fragments(page)?;
        out.push_str(&fragments.join(" "));
        out.push('\n');
    }
    Ok(out.trim().to_string())
}
