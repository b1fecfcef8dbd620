#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use research_assistant::config::ResearchSettings;
use research_assistant::models::{
    Citation, ExtractedDocument, FinalReport, Language, ProgressEvent, SearchHit, SourceSummary,
};
use research_assistant::tools::{
    ContentExtractor, LanguageDetector, MarkdownJsonFormatter, ReportGenerator, SearchProvider,
    Summarizer,
};
use research_assistant::ResearchService;

pub fn url(i: usize) -> String {
    format!("https://source{i}.example/article")
}

pub fn hits(n: usize) -> Vec<SearchHit> {
    (1..=n)
        .map(|i| SearchHit {
            url: url(i),
            title: format!("Hit {i}"),
            snippet: format!("snippet {i}"),
        })
        .collect()
}

#[derive(Default)]
pub struct StubSearch {
    hits: Vec<SearchHit>,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl StubSearch {
    pub fn returning(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str, num_results: usize) -> Vec<SearchHit> {
        self.calls.lock().unwrap().push((query.to_string(), num_results));
        self.hits.clone()
    }
}

pub struct PanickingSearch;

#[async_trait]
impl SearchProvider for PanickingSearch {
    async fn search(&self, _query: &str, _num_results: usize) -> Vec<SearchHit> {
        panic!("search backend exploded")
    }
}

/// Extracts every URL except the failing ones; the title is derived from the URL.
#[derive(Default)]
pub struct StubExtractor {
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
}

impl StubExtractor {
    pub fn failing(urls: impl IntoIterator<Item = String>) -> Self {
        Self {
            failing: urls.into_iter().collect(),
            delays: HashMap::new(),
        }
    }

    pub fn with_delay(mut self, url: String, delay: Duration) -> Self {
        self.delays.insert(url, delay);
        self
    }
}

pub fn title_for(url: &str) -> String {
    format!("Title of {url}")
}

#[async_trait]
impl ContentExtractor for StubExtractor {
    async fn extract(&self, url: &str) -> Option<ExtractedDocument> {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(url) {
            return None;
        }
        Some(ExtractedDocument {
            url: url.to_string(),
            title: title_for(url),
            content: format!("Intro of {url}.\n\nBody of {url}.\n\nConclusion of {url}."),
        })
    }
}

/// Summarizes everything except sources whose title is listed as failing.
#[derive(Default)]
pub struct StubSummarizer {
    failing_titles: HashSet<String>,
    pub languages: Mutex<Vec<Language>>,
}

impl StubSummarizer {
    pub fn failing_for(urls: impl IntoIterator<Item = String>) -> Self {
        Self {
            failing_titles: urls.into_iter().map(|u| title_for(&u)).collect(),
            languages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, content: &str, source_title: &str, language: Language) -> Option<String> {
        self.languages.lock().unwrap().push(language);
        if self.failing_titles.contains(source_title) || content.is_empty() {
            return None;
        }
        Some(format!("Summary of {source_title}"))
    }
}

/// Builds a report straight from the summaries it receives.
#[derive(Default)]
pub struct EchoReportGenerator {
    fail: bool,
    pub received: Mutex<Vec<SourceSummary>>,
}

impl EchoReportGenerator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            received: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ReportGenerator for EchoReportGenerator {
    async fn generate(
        &self,
        summaries: &[SourceSummary],
        topic: &str,
        language: Language,
    ) -> Option<FinalReport> {
        self.received.lock().unwrap().extend_from_slice(summaries);
        if self.fail {
            return None;
        }
        Some(FinalReport {
            summary: format!("Overview of {topic}"),
            key_points: summaries
                .iter()
                .map(|s| format!("{} [{}]", s.summary, s.source_number))
                .collect(),
            comparison: "The sources broadly agree.".to_string(),
            citations: summaries.iter().map(Citation::from).collect(),
            language,
        })
    }
}

pub struct FixedDetector(pub Language);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Language {
        self.0
    }
}

pub fn settings() -> ResearchSettings {
    ResearchSettings {
        progress_poll_interval_ms: 10,
        ..ResearchSettings::default()
    }
}

pub struct Pipeline {
    pub search: Arc<dyn SearchProvider>,
    pub extractor: StubExtractor,
    pub summarizer: Arc<StubSummarizer>,
    pub report: Arc<EchoReportGenerator>,
    pub language: Language,
    pub settings: ResearchSettings,
}

impl Pipeline {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            search: Arc::new(StubSearch::returning(hits)),
            extractor: StubExtractor::default(),
            summarizer: Arc::new(StubSummarizer::default()),
            report: Arc::new(EchoReportGenerator::default()),
            language: Language::En,
            settings: settings(),
        }
    }

    pub fn build(self) -> ResearchService {
        ResearchService::new(
            self.search,
            Arc::new(self.extractor),
            self.summarizer,
            self.report,
            Arc::new(FixedDetector(self.language)),
            Arc::new(MarkdownJsonFormatter::new()),
            self.settings,
        )
    }
}

pub fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
