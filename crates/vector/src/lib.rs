//! Vector index: nearest-neighbor search over chunk embeddings with
//! payload-based filtering. Backends: Qdrant over REST, and an in-memory
//! brute-force index for development and tests.

pub mod error;
pub mod index;
pub mod memory;
pub mod qdrant;
pub mod types;

pub use error::IndexError;
pub use index::{create_index, VectorIndex};
pub use memory::MemoryIndex;
pub use qdrant::QdrantIndex;
pub use types::ScoredChunk;
