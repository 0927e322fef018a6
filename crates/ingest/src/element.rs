//! Typed text elements produced by document extraction.

use serde::{Deserialize, Serialize};

/// One structural unit of a source document: a heading, a paragraph of body
/// text, a table, etc. Produced in document order by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextElement {
    pub text: String,
    /// Structural type ("heading", "text", "table", ...). Extractors that
    /// cannot classify an element omit it; it defaults to "text".
    #[serde(rename = "type", default = "default_element_type")]
    pub element_type: String,
    pub page_number: Option<u32>,
}

fn default_element_type() -> String {
    "text".to_string()
}

impl TextElement {
    pub fn new(text: impl Into<String>, element_type: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            text: text.into(),
            element_type: element_type.into(),
            page_number: page,
        }
    }

    /// Body text on the given page.
    pub fn text(text: impl Into<String>, page: Option<u32>) -> Self {
        Self::new(text, "text", page)
    }

    /// Heading on the given page.
    pub fn heading(text: impl Into<String>, page: Option<u32>) -> Self {
        Self::new(text, "heading", page)
    }
}
