//! Document-text extraction: converts an uploaded PDF into the plain text
//! loaded into the editor.

mod error;
mod pdf;
mod text;

pub use error::ExtractError;
pub use pdf::{PdfDocument, extract_file, extract_text};
pub use text::{PageSource, assemble_text};
