use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ResearchSettings;
use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub topic: String,
    #[serde(default)]
    pub num_sources: Option<usize>,
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl ResearchRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            num_sources: None,
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_sources(mut self, num_sources: usize) -> Self {
        self.num_sources = Some(num_sources);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Check the request against the configured limits and fill in defaults.
    pub fn validate(self, limits: &ResearchSettings) -> Result<ValidRequest, ValidationError> {
        if self.topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        let topic_len = self.topic.chars().count();
        if topic_len > limits.max_topic_length {
            return Err(ValidationError::TopicTooLong {
                max: limits.max_topic_length,
            });
        }

        let num_sources = self.num_sources.unwrap_or(limits.default_sources);
        if !(limits.min_sources..=limits.max_sources).contains(&num_sources) {
            return Err(ValidationError::SourceCount {
                min: limits.min_sources,
                max: limits.max_sources,
            });
        }

        Ok(ValidRequest {
            topic: self.topic,
            num_sources,
            output_format: self.output_format,
        })
    }
}

/// A request that passed [`ResearchRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    pub topic: String,
    pub num_sources: usize,
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::Json => "application/json",
        }
    }

    pub fn download_filename(self, base_name: &str) -> String {
        format!("{base_name}.{}", self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Languages a report can be written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fa => "fa",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fa => "Persian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub url: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source_number: usize,
    pub title: String,
    pub url: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub number: usize,
    pub title: String,
    pub url: String,
}

impl From<&SourceSummary> for Citation {
    fn from(source: &SourceSummary) -> Self {
        Self {
            number: source.source_number,
            title: source.title.clone(),
            url: source.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalReport {
    pub summary: String,
    pub key_points: Vec<String>,
    pub comparison: String,
    pub citations: Vec<Citation>,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub content: String,
    pub format: OutputFormat,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStep {
    Searching,
    Found,
    Fetching,
    Summarizing,
    Analyzing,
    Finalizing,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: ProgressStep,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ProgressEvent {
    pub fn new(step: ProgressStep, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
            current: None,
            total: None,
            count: None,
        }
    }

    pub fn searching() -> Self {
        Self::new(ProgressStep::Searching, "Searching...")
    }

    pub fn found(count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::new(ProgressStep::Found, format!("Found {count} sources"))
        }
    }

    pub fn fetching(current: usize, total: usize) -> Self {
        Self::positioned(
            ProgressStep::Fetching,
            format!("Fetching {current}/{total}..."),
            current,
            total,
        )
    }

    pub fn summarizing(current: usize, total: usize) -> Self {
        Self::positioned(
            ProgressStep::Summarizing,
            format!("Summarizing {current}/{total}..."),
            current,
            total,
        )
    }

    pub fn analyzing() -> Self {
        Self::new(ProgressStep::Analyzing, "Analyzing...")
    }

    pub fn finalizing() -> Self {
        Self::new(ProgressStep::Finalizing, "Finalizing...")
    }

    pub fn complete() -> Self {
        Self::new(ProgressStep::Complete, "Complete")
    }

    fn positioned(step: ProgressStep, message: String, current: usize, total: usize) -> Self {
        Self {
            current: Some(current),
            total: Some(total),
            ..Self::new(step, message)
        }
    }

    /// Rough share of the whole request that is done once this event fires.
    ///
    /// Source work spans 0.15 to 0.75 and every source owns an equal slot of
    /// it: fetching opens the slot, summarizing marks its midpoint.
    pub fn fraction(&self) -> f64 {
        let slot = |offset: f64| match (self.current, self.total) {
            (Some(current), Some(total)) if total > 0 => {
                let done = current.saturating_sub(1).min(total) as f64 + offset;
                0.15 + 0.60 * done / total as f64
            }
            _ => 0.15,
        };

        match self.step {
            ProgressStep::Searching => 0.10,
            ProgressStep::Found => 0.15,
            ProgressStep::Fetching => slot(0.0),
            ProgressStep::Summarizing => slot(0.5),
            ProgressStep::Analyzing => 0.80,
            ProgressStep::Finalizing => 0.90,
            ProgressStep::Complete => 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavilySearchRequest {
    pub query: String,
    pub max_results: usize,
    pub search_depth: String,
    pub include_raw_content: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavilySearchResponse {
    #[serde(default)]
    pub results: Vec<TavilyResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavilyResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ResearchSettings {
        ResearchSettings::default()
    }

    #[test]
    fn validate_fills_default_source_count() {
        let valid = ResearchRequest::new("rust async").validate(&limits()).unwrap();
        assert_eq!(valid.num_sources, 5);
        assert_eq!(valid.output_format, OutputFormat::Markdown);
    }

    #[test]
    fn validate_rejects_blank_topic() {
        let err = ResearchRequest::new(" \n\t ").validate(&limits()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyTopic));
    }

    #[test]
    fn validate_rejects_long_topic() {
        let err = ResearchRequest::new("x".repeat(501))
            .validate(&limits())
            .unwrap_err();
        assert!(matches!(err, ValidationError::TopicTooLong { max: 500 }));
        assert!(ResearchRequest::new("x".repeat(500)).validate(&limits()).is_ok());
    }

    #[test]
    fn validate_bounds_source_count() {
        for n in [0, 2, 11] {
            let err = ResearchRequest::new("topic")
                .with_sources(n)
                .validate(&limits())
                .unwrap_err();
            assert!(matches!(err, ValidationError::SourceCount { min: 3, max: 10 }));
        }
        for n in 3..=10 {
            assert!(ResearchRequest::new("topic").with_sources(n).validate(&limits()).is_ok());
        }
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let req: ResearchRequest = serde_json::from_str(r#"{"topic":"x"}"#).unwrap();
        assert_eq!(req.num_sources, None);
        assert_eq!(req.output_format, OutputFormat::Markdown);

        let req: ResearchRequest =
            serde_json::from_str(r#"{"topic":"x","num_sources":7,"output_format":"json"}"#)
                .unwrap();
        assert_eq!(req.num_sources, Some(7));
        assert_eq!(req.output_format, OutputFormat::Json);
    }

    #[test]
    fn download_filename_matches_format() {
        assert_eq!(
            OutputFormat::Markdown.download_filename("research-results"),
            "research-results.md"
        );
        assert_eq!(OutputFormat::Json.download_filename("out"), "out.json");
        assert_eq!(OutputFormat::Json.mime_type(), "application/json");
    }

    #[test]
    fn progress_event_omits_empty_counters() {
        let json = serde_json::to_value(ProgressEvent::searching()).unwrap();
        assert_eq!(json, serde_json::json!({"step": "searching", "message": "Searching..."}));

        let json = serde_json::to_value(ProgressEvent::fetching(2, 5)).unwrap();
        assert_eq!(json["current"], 2);
        assert_eq!(json["total"], 5);
        assert_eq!(json["message"], "Fetching 2/5...");
    }

    #[test]
    fn progress_fraction_is_monotonic_over_a_run() {
        let events = [
            ProgressEvent::searching(),
            ProgressEvent::found(3),
            ProgressEvent::fetching(1, 3),
            ProgressEvent::summarizing(1, 3),
            ProgressEvent::fetching(2, 3),
            ProgressEvent::fetching(3, 3),
            ProgressEvent::summarizing(3, 3),
            ProgressEvent::analyzing(),
            ProgressEvent::finalizing(),
            ProgressEvent::complete(),
        ];
        let fractions: Vec<f64> = events.iter().map(ProgressEvent::fraction).collect();
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(fractions.last().copied(), Some(1.0));
    }

    #[test]
    fn each_source_owns_a_progress_slot() {
        assert_eq!(ProgressEvent::fetching(1, 3).fraction(), 0.15);
        assert!((ProgressEvent::summarizing(1, 3).fraction() - 0.25).abs() < 1e-9);
        assert!((ProgressEvent::fetching(2, 3).fraction() - 0.35).abs() < 1e-9);
        assert!((ProgressEvent::summarizing(3, 3).fraction() - 0.65).abs() < 1e-9);
    }
}
