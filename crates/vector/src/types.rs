use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One search hit: the stored chunk payload plus its similarity score,
/// ordered by descending score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk_id: Uuid,
    pub text: String,
    pub pdf_key: String,
    pub metadata: serde_json::Value,
    pub score: f32,
}
