//! External collaborators of the research pipeline.
//!
//! Each concern sits behind a trait so the pipeline can run against any
//! implementation, including in-memory doubles in tests. Implementations never
//! return errors: failures are logged and collapse to an empty list or `None`.

pub mod duckduckgo;
pub mod extractor;
pub mod formatter;
pub mod language;
pub mod llm;
pub mod prompts;
pub mod reporter;
pub mod summarizer;
pub mod tavily;

use async_trait::async_trait;

use crate::models::{ExtractedDocument, FinalReport, Language, OutputFormat, SearchHit, SourceSummary};

pub use duckduckgo::DuckDuckGoSearch;
pub use extractor::HttpExtractor;
pub use formatter::MarkdownJsonFormatter;
pub use language::ScriptLanguageDetector;
pub use reporter::OpenAiReportGenerator;
pub use summarizer::OpenAiSummarizer;
pub use tavily::TavilySearch;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// At most `num_results` hits; an empty list means the search failed.
    async fn search(&self, query: &str, num_results: usize) -> Vec<SearchHit>;
}

#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Option<ExtractedDocument>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, content: &str, source_title: &str, language: Language)
        -> Option<String>;
}

#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(
        &self,
        summaries: &[SourceSummary],
        topic: &str,
        language: Language,
    ) -> Option<FinalReport>;
}

pub trait LanguageDetector: Send + Sync {
    /// Always a supported language; uncertain input falls back to the default.
    fn detect(&self, text: &str) -> Language;
}

pub trait OutputFormatter: Send + Sync {
    fn format(&self, report: &FinalReport, format: OutputFormat) -> String;
}
