//! Resolves an uploaded document's type from its bytes, never its name.

use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
    Txt,
}

impl DocumentKind {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Doc => "doc",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Doc => "application/msword",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Txt => "text/plain; charset=utf-8",
        }
    }
}

pub const CV_KINDS: &[DocumentKind] = &[DocumentKind::Pdf, DocumentKind::Doc, DocumentKind::Docx];

pub const COVER_LETTER_KINDS: &[DocumentKind] = &[
    DocumentKind::Pdf,
    DocumentKind::Doc,
    DocumentKind::Docx,
    DocumentKind::Txt,
];

const PDF_MAGIC: &[u8] = b"%PDF-";
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const DOCX_MAIN_PART: &str = "word/document.xml";

/// Returns the document kind the content actually is, if it is one we know.
pub fn resolve(bytes: &[u8]) -> Option<DocumentKind> {
    if bytes.starts_with(PDF_MAGIC) {
        return Some(DocumentKind::Pdf);
    }
    if bytes.starts_with(OLE2_MAGIC) {
        return Some(DocumentKind::Doc);
    }
    if bytes.starts_with(ZIP_MAGIC) {
        return is_docx(bytes).then_some(DocumentKind::Docx);
    }
    is_plain_text(bytes).then_some(DocumentKind::Txt)
}

/// Resolves the kind and checks it against an allow-list.
pub fn resolve_allowed(bytes: &[u8], allowed: &[DocumentKind]) -> Option<DocumentKind> {
    resolve(bytes).filter(|kind| allowed.contains(kind))
}

fn is_docx(bytes: &[u8]) -> bool {
    match zip::ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive.file_names().any(|name| name == DOCX_MAIN_PART),
        Err(_) => false,
    }
}

fn is_plain_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    let Ok(text) = std::str::from_utf8(bytes) else {
        return false;
    };
    !text
        .chars()
        .any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r' | '\u{000C}'))
}
