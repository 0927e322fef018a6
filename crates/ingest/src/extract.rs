//! PDF element extraction: raw bytes to typed, page-numbered text elements.

use thiserror::Error;

use crate::element::TextElement;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// Extract typed text elements from PDF bytes, in document order.
///
/// pdf-extract returns the whole document as one string with form feeds
/// (`\x0C`) separating pages. Each page is split on blank lines into
/// paragraph elements; short title-like paragraphs are classified as
/// headings. A PDF with no text layer yields zero elements.
pub fn extract_elements(bytes: &[u8]) -> Result<Vec<TextElement>, ExtractError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut elements = Vec::new();
    let pages: Vec<&str> = if text.contains('\x0C') {
        text.split('\x0C').collect()
    } else {
        vec![text.as_str()]
    };

    for (i, page_text) in pages.iter().enumerate() {
        let page = Some(i as u32 + 1);
        for paragraph in split_paragraphs(page_text) {
            let element_type = if looks_like_heading(&paragraph) {
                "heading"
            } else {
                "text"
            };
            elements.push(TextElement::new(paragraph, element_type, page));
        }
    }

    Ok(elements)
}

/// Split a page into paragraphs at blank lines, normalizing line joins.
fn split_paragraphs(page: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in page.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Layout heuristic: a single short line that does not end in sentence
/// punctuation reads as a heading.
fn looks_like_heading(paragraph: &str) -> bool {
    if paragraph.contains('\n') {
        return false;
    }
    let trimmed = paragraph.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 80 {
        return false;
    }
    !trimmed.ends_with(['.', '!', '?', ',', ';', ':'])
}
