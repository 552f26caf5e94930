//! lopdf-backed page source.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{info, warn};

use crate::ExtractError;
use crate::text::{PageSource, assemble_text};

/// A parsed PDF with its page tree flattened to `page number -> object id`.
pub struct PdfDocument {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfDocument {
    pub fn load_mem(bytes: &[u8]) -> Result<Self, ExtractError> {
        let doc = Document::load_mem(bytes)?;
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<String>, ExtractError> {
        let page_id = *self.pages.get(&page).ok_or_else(|| ExtractError::Content {
            page,
            message: "missing from page tree".into(),
        })?;
        let raw = self.doc.get_page_content(page_id)?;
        let content = Content::decode(&raw).map_err(|e| ExtractError::Content {
            page,
            message: e.to_string(),
        })?;

        let fonts = self.doc.get_page_fonts(page_id);
        let mut encoding: Option<&str> = None;
        let mut fragments = Vec::new();
        for op in &content.operations {
            let fragment = match op.operator.as_str() {
                "Tf" => {
                    encoding = op
                        .operands
                        .first()
                        .and_then(|name| name.as_name().ok())
                        .and_then(|name| fonts.get(name))
                        .map(|font| font.get_font_encoding());
                    None
                }
                "Tj" | "'" => op.operands.first().and_then(|o| string_operand(o, encoding)),
                "\"" => op.operands.get(2).and_then(|o| string_operand(o, encoding)),
                "TJ" => op.operands.first().and_then(|o| array_operand(o, encoding)),
                _ => None,
            };
            if let Some(text) = fragment {
                fragments.push(text);
            }
        }
        Ok(fragments)
    }
}

fn string_operand(obj: &Object, encoding: Option<&str>) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(encoding, bytes)),
        _ => None,
    }
}

/// `TJ` arrays interleave strings with kerning offsets; the strings form one
/// fragment.
fn array_operand(obj: &Object, encoding: Option<&str>) -> Option<String> {
    let Object::Array(items) = obj else {
        return None;
    };
    let text: String = items
        .iter()
        .filter_map(|item| string_operand(item, encoding))
        .collect();
    Some(text)
}

/// Decode a string operand under the current font's encoding.
///
/// A UTF-16BE byte-order mark wins over the font. Without a selected font,
/// or under `Identity-H` (glyph ids, which lopdf cannot map), each byte maps
/// to the code point of the same value.
fn decode_pdf_string(encoding: Option<&str>, bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match encoding {
        Some("Identity-H") | None => bytes.iter().map(|&b| b as char).collect(),
        Some(encoding) => Document::decode_text(Some(encoding), bytes),
    }
}

/// Extract the text of an in-memory PDF.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = PdfDocument::load_mem(bytes)?;
    assemble_text(&doc)
}

/// Read and extract a `.pdf` file from disk.
///
/// The extension is checked before anything is read.
pub async fn extract_file(path: &Path) -> Result<String, ExtractError> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(ExtractError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match extract_text(&bytes) {
        Ok(text) => {
            info!(path = %path.display(), chars = text.len(), "extracted PDF text");
            Ok(text)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "PDF extraction failed");
            Err(e)
        }
    }
}
