//! Vector embedding: pluggable backends and the normalizing generator.

pub mod generator;
pub mod ollama;
pub mod openai;
pub mod traits;

pub use generator::{create_embedder, EmbeddedChunk, EmbeddedMetadata, EmbeddingGenerator};
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};
