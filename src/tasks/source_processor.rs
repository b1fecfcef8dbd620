use std::sync::Arc;
use tracing::{debug, instrument};

use super::guarded;
use crate::models::{Language, ProgressEvent, SearchHit, SourceSummary};
use crate::progress::ProgressReporter;
use crate::tools::{ContentExtractor, Summarizer};
use crate::truncation;

/// A source that made it through extraction and summarization.
///
/// It gets its citation number from the caller, once the outcome of every
/// earlier source is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedSource {
    pub title: String,
    pub url: String,
    pub summary: String,
}

impl ProcessedSource {
    pub fn into_summary(self, source_number: usize) -> SourceSummary {
        SourceSummary {
            source_number,
            title: self.title,
            url: self.url,
            summary: self.summary,
        }
    }
}

/// Extract, truncate and summarize one search hit.
#[derive(Clone)]
pub struct SourceProcessor {
    extractor: Arc<dyn ContentExtractor>,
    summarizer: Arc<dyn Summarizer>,
    max_content_chars: usize,
}

impl SourceProcessor {
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        summarizer: Arc<dyn Summarizer>,
        max_content_chars: usize,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            max_content_chars,
        }
    }

    /// `None` when any step fails; a failing source never fails the request.
    ///
    /// Emits `fetching` before extraction and `summarizing` before the model
    /// call, both tagged with `position` out of `total`.
    #[instrument(skip(self, hit, progress), fields(url = %hit.url))]
    pub async fn process(
        &self,
        hit: &SearchHit,
        language: Language,
        position: usize,
        total: usize,
        progress: &ProgressReporter,
    ) -> Option<ProcessedSource> {
        guarded("source", self.run(hit, language, position, total, progress))
            .await
            .flatten()
    }

    async fn run(
        &self,
        hit: &SearchHit,
        language: Language,
        position: usize,
        total: usize,
        progress: &ProgressReporter,
    ) -> Option<ProcessedSource> {
        progress.emit(ProgressEvent::fetching(position, total));
        let Some(document) = self.extractor.extract(&hit.url).await else {
            debug!("dropping source: nothing extracted");
            return None;
        };

        let content = truncation::truncate(&document.content, self.max_content_chars);
        debug!(
            original = document.content.len(),
            truncated = content.len(),
            "content ready for summarization"
        );

        progress.emit(ProgressEvent::summarizing(position, total));
        let Some(summary) = self
            .summarizer
            .summarize(&content, &document.title, language)
            .await
        else {
            debug!("dropping source: no summary");
            return None;
        };

        Some(ProcessedSource {
            title: document.title,
            url: hit.url.clone(),
            summary,
        })
    }
}
