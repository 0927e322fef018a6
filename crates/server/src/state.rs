use std::sync::Arc;

use ragline_core::Config;
use ragline_pipeline::DocumentPipeline;
use ragline_storage::PdfStore;

pub struct AppState {
    pub config: Config,
    pub store: Arc<PdfStore>,
    pub pipeline: DocumentPipeline,
}
