//! Error types for the research pipeline.
//!
//! `Display` on [`ResearchError`] and [`ValidationError`] is what clients see,
//! so those strings never carry upstream error text.

/// Failures that end a research request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResearchError {
    #[error("Unable to search. Please try again.")]
    SearchFailed,

    #[error("Could not retrieve any sources. Please try a different topic.")]
    NoSourcesFound,

    #[error("AI service unavailable. Please try again later.")]
    AiService,

    #[error("Research took too long. Please try again.")]
    Timeout,

    #[error("An unexpected error occurred. Please try again.")]
    Unexpected,
}

impl ResearchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SearchFailed => "SEARCH_FAILED",
            Self::NoSourcesFound => "NO_SOURCES_FOUND",
            Self::AiService => "AI_SERVICE_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Unexpected => "UNEXPECTED_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Topic cannot be empty or whitespace only")]
    EmptyTopic,

    #[error("Topic must be at most {max} characters")]
    TopicTooLong { max: usize },

    #[error("Number of sources must be between {min} and {max}")]
    SourceCount { min: usize, max: usize },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        "VALIDATION_ERROR"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("{0} is not configured")]
    MissingApiKey(&'static str),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
