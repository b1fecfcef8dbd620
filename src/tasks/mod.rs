mod research_service;
mod source_processor;

pub use research_service::ResearchService;
pub use source_processor::{ProcessedSource, SourceProcessor};

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::error;

/// Run a collaborator call, turning a panic into `None`.
async fn guarded<F: Future>(stage: &'static str, call: F) -> Option<F::Output> {
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(output) => Some(output),
        Err(_) => {
            error!(stage, "collaborator panicked");
            None
        }
    }
}
