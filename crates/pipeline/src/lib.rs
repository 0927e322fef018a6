//! Pipeline orchestration: extract -> chunk -> embed -> store for ingestion,
//! embed -> search for retrieval. Sequencing and error propagation only; the
//! algorithmic content lives in the ingest and vector crates.

pub mod error;
pub mod extract;
pub mod pipeline;

pub use error::PipelineError;
pub use extract::{ElementExtractor, ExtractError, PdfExtractor};
pub use pipeline::{DocumentPipeline, IngestReport};
