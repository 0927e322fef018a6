pub mod chunker;
pub mod element;
pub mod embedding;
pub mod extract;

pub use chunker::{Chunk, ChunkBuilder, ChunkError, ChunkMetadata};
pub use element::TextElement;
pub use embedding::{
    create_embedder, EmbeddedChunk, EmbeddedMetadata, Embedder, EmbeddingError,
    EmbeddingGenerator,
};
pub use extract::{extract_elements, ExtractError};
