use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use super::guarded;
use super::source_processor::{ProcessedSource, SourceProcessor};
use crate::config::{ResearchSettings, SearchBackend, Settings};
use crate::error::{ConfigError, ResearchError};
use crate::models::{Language, ProgressEvent, ResearchResult, SearchHit, SourceSummary, ValidRequest};
use crate::progress::ProgressReporter;
use crate::tools::extractor::USER_AGENT;
use crate::tools::llm::LlmClient;
use crate::tools::{
    ContentExtractor, DuckDuckGoSearch, HttpExtractor, LanguageDetector, MarkdownJsonFormatter,
    OpenAiReportGenerator, OpenAiSummarizer, OutputFormatter, ReportGenerator, ScriptLanguageDetector,
    SearchProvider, Summarizer, TavilySearch,
};

/// Drives one research request from topic to formatted report.
///
/// Stages run in order: language detection, search, per-source processing,
/// report generation, formatting. Search and report failures end the request;
/// individual sources may fail without affecting the rest.
#[derive(Clone)]
pub struct ResearchService {
    search: Arc<dyn SearchProvider>,
    sources: SourceProcessor,
    report_generator: Arc<dyn ReportGenerator>,
    language_detector: Arc<dyn LanguageDetector>,
    formatter: Arc<dyn OutputFormatter>,
    settings: ResearchSettings,
}

impl ResearchService {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        extractor: Arc<dyn ContentExtractor>,
        summarizer: Arc<dyn Summarizer>,
        report_generator: Arc<dyn ReportGenerator>,
        language_detector: Arc<dyn LanguageDetector>,
        formatter: Arc<dyn OutputFormatter>,
        settings: ResearchSettings,
    ) -> Self {
        Self {
            search,
            sources: SourceProcessor::new(extractor, summarizer, settings.max_content_chars),
            report_generator,
            language_detector,
            formatter,
            settings,
        }
    }

    /// Wire the production collaborators from configuration.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let llm = LlmClient::new(&settings.llm)?;
        let http = reqwest::Client::builder()
            .timeout(settings.research.fetch_timeout())
            .user_agent(USER_AGENT)
            .build()?;

        let tavily_key = settings
            .search
            .tavily_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty());
        let search: Arc<dyn SearchProvider> = match (settings.search.provider, tavily_key) {
            (SearchBackend::Tavily, None) => return Err(ConfigError::MissingApiKey("TAVILY_API_KEY")),
            (SearchBackend::Tavily | SearchBackend::Auto, Some(key)) => Arc::new(TavilySearch::new(
                http,
                key,
                &settings.search.tavily_endpoint,
            )),
            (SearchBackend::DuckDuckGo, _) | (SearchBackend::Auto, None) => Arc::new(
                DuckDuckGoSearch::new(http, &settings.search.duckduckgo_endpoint),
            ),
        };

        Ok(Self::new(
            search,
            Arc::new(HttpExtractor::new(settings.research.fetch_timeout())?),
            Arc::new(OpenAiSummarizer::new(llm.clone(), settings.llm.summary_max_tokens)),
            Arc::new(OpenAiReportGenerator::new(llm)),
            Arc::new(ScriptLanguageDetector::new()),
            Arc::new(MarkdownJsonFormatter::new()),
            settings.research.clone(),
        ))
    }

    pub fn settings(&self) -> &ResearchSettings {
        &self.settings
    }

    #[instrument(skip(self, progress), fields(topic = %request.topic, num_sources = request.num_sources))]
    pub async fn research(
        &self,
        request: &ValidRequest,
        progress: &ProgressReporter,
    ) -> Result<ResearchResult, ResearchError> {
        match self.settings.request_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.run(request, progress))
                .await
                .unwrap_or_else(|_| {
                    warn!(?limit, "research request exceeded its deadline");
                    Err(ResearchError::Timeout)
                }),
            None => self.run(request, progress).await,
        }
    }

    async fn run(
        &self,
        request: &ValidRequest,
        progress: &ProgressReporter,
    ) -> Result<ResearchResult, ResearchError> {
        let start_time = Instant::now();
        let language = self.language_detector.detect(&request.topic);
        info!(%language, "Starting research workflow");

        let hits = self
            .search_sources(&request.topic, request.num_sources, progress)
            .await?;

        let summaries = self.process_sources(&hits, language, progress).await;
        if summaries.is_empty() {
            warn!("none of the {} sources could be summarized", hits.len());
            return Err(ResearchError::NoSourcesFound);
        }
        info!("{} of {} sources summarized", summaries.len(), hits.len());

        progress.emit(ProgressEvent::analyzing());
        let report = guarded(
            "report",
            self.report_generator
                .generate(&summaries, &request.topic, language),
        )
        .await
        .flatten()
        .ok_or_else(|| {
            warn!("report generation returned nothing");
            ResearchError::AiService
        })?;

        progress.emit(ProgressEvent::finalizing());
        let content = self.formatter.format(&report, request.output_format);

        progress.emit(ProgressEvent::complete());
        info!(
            citations = report.citations.len(),
            "Research completed in {:?}",
            start_time.elapsed()
        );

        Ok(ResearchResult {
            content,
            format: request.output_format,
            language,
        })
    }

    async fn search_sources(
        &self,
        topic: &str,
        num_sources: usize,
        progress: &ProgressReporter,
    ) -> Result<Vec<SearchHit>, ResearchError> {
        progress.emit(ProgressEvent::searching());

        let mut hits = guarded("search", self.search.search(topic, num_sources))
            .await
            .unwrap_or_default();
        if hits.is_empty() {
            warn!("search returned no results");
            return Err(ResearchError::SearchFailed);
        }
        hits.truncate(num_sources);

        info!("Found {} sources", hits.len());
        progress.emit(ProgressEvent::found(hits.len()));
        Ok(hits)
    }

    /// Numbers are handed out to survivors only, in search order.
    async fn process_sources(
        &self,
        hits: &[SearchHit],
        language: Language,
        progress: &ProgressReporter,
    ) -> Vec<SourceSummary> {
        let total = hits.len();
        let concurrency = self.settings.max_concurrent_sources.max(1);

        let outcomes: Vec<Option<ProcessedSource>> = if concurrency == 1 {
            let mut outcomes = Vec::with_capacity(total);
            for (idx, hit) in hits.iter().enumerate() {
                outcomes.push(self.sources.process(hit, language, idx + 1, total, progress).await);
            }
            outcomes
        } else {
            // Each source reports into its own buffer; buffers are replayed in
            // search order as the ordered stream yields.
            stream::iter(hits.iter().cloned().enumerate())
                .map(|(idx, hit)| async move {
                    let (buffer, mut captured) = ProgressReporter::buffered();
                    let outcome = self.sources.process(&hit, language, idx + 1, total, &buffer).await;
                    drop(buffer);
                    let mut events = Vec::new();
                    while let Ok(event) = captured.try_recv() {
                        events.push(event);
                    }
                    (outcome, events)
                })
                .buffered(concurrency)
                .map(|(outcome, events)| {
                    for event in events {
                        progress.emit(event);
                    }
                    outcome
                })
                .collect()
                .await
        };

        outcomes
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(idx, source)| source.into_summary(idx + 1))
            .collect()
    }
}
