//! Structure-aware chunking of extracted text elements.
//!
//! Elements accumulate into a pending buffer until a heading, a token-budget
//! overflow, or end of input closes the buffer into a `Chunk`. Overflowing
//! elements are split at the best nearby semantic boundary and the tail of
//! the closing chunk is carried into the next one as overlap context.

mod split;
mod types;

use std::collections::BTreeSet;

use tracing::debug;
use uuid::Uuid;

use ragline_core::config::ChunkingConfig;

use crate::element::TextElement;
use split::{clean_text, estimate_tokens, find_semantic_split, floor_char_boundary};
pub use types::{Chunk, ChunkError, ChunkMetadata};

/// Per-flush accumulator: contributed texts plus the page range and section
/// types seen since the last chunk was closed. Reset on every flush.
#[derive(Default)]
struct Accumulator {
    texts: Vec<String>,
    token_estimate: usize,
    start_page: Option<u32>,
    sections: BTreeSet<String>,
}

impl Accumulator {
    fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    fn push(&mut self, text: &str) {
        self.token_estimate += estimate_tokens(text);
        self.texts.push(text.to_string());
    }

    fn note(&mut self, element_type: &str, page: Option<u32>) {
        self.sections.insert(element_type.to_string());
        if self.start_page.is_none() {
            self.start_page = page;
        }
    }
}

/// Converts an ordered element sequence into bounded, overlapping,
/// metadata-tagged chunks. Deterministic for a given input and config.
pub struct ChunkBuilder {
    config: ChunkingConfig,
}

impl ChunkBuilder {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Chunk `elements` in document order. Fails whole-batch on a malformed
    /// stream; an empty input is a valid zero-chunk result.
    pub fn create_chunks(&self, elements: &[TextElement]) -> Result<Vec<Chunk>, ChunkError> {
        let mut chunks = Vec::new();
        let mut acc = Accumulator::default();
        let mut last_page: Option<u32> = None;

        for element in elements {
            if let (Some(previous), Some(current)) = (last_page, element.page_number) {
                if current < previous {
                    return Err(ChunkError::OutOfOrderPage { previous, current });
                }
            }
            // Elements without a page inherit the document's running page.
            let page = element.page_number.or(last_page);
            if element.page_number.is_some() {
                last_page = element.page_number;
            }

            if element.element_type == "heading" {
                // Structural break: close the pending buffer. The heading's
                // type and page seed the next chunk; its text joins no buffer.
                if !acc.is_empty() {
                    chunks.push(self.close(&mut acc, page));
                }
                acc.note(&element.element_type, page);
                continue;
            }

            let tokens = estimate_tokens(&element.text);
            if acc.token_estimate + tokens > self.config.chunk_size {
                let target = self.config.chunk_size * 4;
                match find_semantic_split(&element.text, target) {
                    Some(split) => {
                        acc.note(&element.element_type, page);
                        acc.push(&element.text[..split]);
                        chunks.push(self.close(&mut acc, page));
                        // Seed the new buffer with trailing context from just
                        // before the split point.
                        let seed = floor_char_boundary(
                            &element.text,
                            split.saturating_sub(self.config.chunk_overlap),
                        );
                        acc.note(&element.element_type, page);
                        acc.push(&element.text[seed..]);
                    }
                    None => {
                        // No boundary anywhere: the whole text joins the
                        // closing chunk and the next buffer starts empty.
                        acc.note(&element.element_type, page);
                        acc.push(&element.text);
                        chunks.push(self.close(&mut acc, page));
                    }
                }
            } else {
                acc.note(&element.element_type, page);
                acc.push(&element.text);
            }
        }

        if !acc.is_empty() {
            chunks.push(self.close(&mut acc, last_page));
        }

        Ok(self.post_process(chunks))
    }

    fn close(&self, acc: &mut Accumulator, end_page: Option<u32>) -> Chunk {
        let acc = std::mem::take(acc);
        let original_length: usize = acc.texts.iter().map(|t| t.chars().count()).sum();
        let start_page = acc.start_page.or(end_page).unwrap_or(0);
        let end_page = end_page.or(acc.start_page).unwrap_or(0).max(start_page);
        Chunk {
            chunk_id: Uuid::new_v4(),
            text: acc.texts.join(" "),
            start_page,
            end_page,
            chunk_type: "text".to_string(),
            metadata: ChunkMetadata {
                start_page,
                end_page,
                document_sections: acc.sections,
                original_length,
            },
        }
    }

    /// Drop chunks below the minimum length, then normalize whitespace in
    /// the survivors. The drop is silent by design: quality filtering, not
    /// an error path.
    fn post_process(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let before = chunks.len();
        let processed: Vec<Chunk> = chunks
            .into_iter()
            .filter(|c| c.text.chars().count() >= self.config.min_chunk_size)
            .map(|mut c| {
                c.text = clean_text(&c.text);
                c
            })
            .collect();
        if processed.len() < before {
            debug!(
                "dropped {} chunk(s) below min_chunk_size={}",
                before - processed.len(),
                self.config.min_chunk_size
            );
        }
        processed
    }
}
