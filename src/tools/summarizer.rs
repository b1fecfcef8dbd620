use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::Language;
use crate::tools::llm::LlmClient;
use crate::tools::prompts::{summarization_preamble, summarization_prompt};
use crate::tools::Summarizer;

/// One-paragraph source summaries from an OpenAI chat model.
#[derive(Clone)]
pub struct OpenAiSummarizer {
    llm: LlmClient,
    max_tokens: u64,
}

impl OpenAiSummarizer {
    pub fn new(llm: LlmClient, max_tokens: u64) -> Self {
        Self { llm, max_tokens }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(
        &self,
        content: &str,
        source_title: &str,
        language: Language,
    ) -> Option<String> {
        if content.trim().is_empty() {
            return None;
        }

        let preamble = summarization_preamble(language);
        let prompt = summarization_prompt(source_title, content);

        match self.llm.complete(&preamble, prompt, Some(self.max_tokens)).await {
            Ok(Some(summary)) => {
                debug!(source = source_title, "summary has {} characters", summary.len());
                Some(summary)
            }
            Ok(None) => {
                warn!(source = source_title, "model returned an empty summary");
                None
            }
            Err(e) => {
                warn!(source = source_title, "summarization failed: {e}");
                None
            }
        }
    }
}
