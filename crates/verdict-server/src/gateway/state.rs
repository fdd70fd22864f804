use std::sync::Arc;

use verdict::pipeline::AskPipeline;
use verdict::vectordb::VectorSearchBackend;

/// Shared handler state: the pipeline behind every route.
pub struct HandlerState<B: VectorSearchBackend + 'static> {
    pub pipeline: Arc<AskPipeline<B>>,
}

impl<B: VectorSearchBackend + 'static> Clone for HandlerState<B> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<B: VectorSearchBackend + 'static> HandlerState<B> {
    pub fn new(pipeline: AskPipeline<B>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
