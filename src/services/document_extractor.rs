use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};

/// Upload extensions the extractor understands.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "docx"];

/// Empty runs come first so a self-closing `<w:t/>` never opens a text run.
static DOCX_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)<w:t(?:\s[^>]*?)?/>|<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab\s*/>|<w:br(?:\s[^>]*?)?/>|</w:p>",
    )
    .expect("DOCX_TOKEN is a valid regex pattern")
});

static XML_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(lt|gt|quot|apos|amp|#[0-9]+|#x[0-9A-Fa-f]+);")
        .expect("XML_ENTITY is a valid regex pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
    Docx,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "txt" => Some(DocumentFormat::Text),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Returns the text segments of the file at `path`, in document order.
    async fn extract(&self, path: &Path) -> AppResult<Vec<String>>;
}

/// Extracts the whole file as a single segment.
pub struct FileDocumentExtractor;

#[async_trait]
impl DocumentExtractor for FileDocumentExtractor {
    async fn extract(&self, path: &Path) -> AppResult<Vec<String>> {
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            AppError::ValidationError(format!(
                "unsupported file type '{}', expected one of {:?}",
                path.display(),
                SUPPORTED_EXTENSIONS
            ))
        })?;

        let owned: PathBuf = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || extract_blocking(&owned, format))
            .await
            .map_err(|e| AppError::InternalError(format!("extraction task failed: {}", e)))??;

        log::info!(
            "Extracted {} characters from {}",
            text.chars().count(),
            path.display()
        );

        if text.trim().is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![text])
        }
    }
}

fn extract_blocking(path: &Path, format: DocumentFormat) -> AppResult<String> {
    match format {
        DocumentFormat::Text => {
            let bytes = std::fs::read(path)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        DocumentFormat::Pdf => pdf_extract::extract_text(path).map_err(|e| {
            AppError::SourceUnavailable(format!("could not read PDF {}: {}", path.display(), e))
        }),
        DocumentFormat::Docx => read_docx(path),
    }
}

fn read_docx(path: &Path) -> AppResult<String> {
    let unreadable = |e: zip::result::ZipError| {
        AppError::SourceUnavailable(format!("could not read DOCX {}: {}", path.display(), e))
    };

    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(unreadable)?;
    let mut entry = archive.by_name("word/document.xml").map_err(unreadable)?;

    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(docx_xml_to_text(&xml))
}

/// Flattens WordprocessingML body XML into plain text, one line per paragraph.
pub fn docx_xml_to_text(xml: &str) -> String {
    let mut text = String::new();
    for token in DOCX_TOKEN.captures_iter(xml) {
        match token.get(1) {
            Some(run) => text.push_str(&decode_xml_entities(run.as_str())),
            None => match token.get(0).map(|m| m.as_str()) {
                Some("</w:p>") => text.push('\n'),
                Some(tag) if tag.starts_with("<w:tab") => text.push('\t'),
                Some(tag) if tag.starts_with("<w:br") => text.push('\n'),
                _ => {}
            },
        }
    }
    text.trim_end().to_string()
}

/// Decodes named and numeric character references in a single pass. Unknown
/// or invalid references are left as written.
fn decode_xml_entities(value: &str) -> String {
    XML_ENTITY
        .replace_all(value, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => match entity.strip_prefix("#x") {
                    Some(hex) => u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
                    None => entity[1..].parse().ok().and_then(char::from_u32),
                },
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
