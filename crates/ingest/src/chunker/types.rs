//! Chunk output types and errors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A bounded span of document text, the unit of embedding and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: Uuid,
    pub text: String,
    pub start_page: u32,
    pub end_page: u32,
    pub chunk_type: String,
    pub metadata: ChunkMetadata,
}

/// Page range and section provenance for a chunk.
///
/// `document_sections` is an ordered set so serialized output is
/// deterministic. `original_length` is the character count of the
/// contributing texts before whitespace cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub start_page: u32,
    pub end_page: u32,
    pub document_sections: BTreeSet<String>,
    pub original_length: usize,
}

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("element stream pages out of order: page {current} after page {previous}")]
    OutOfOrderPage { previous: u32, current: u32 },
}
