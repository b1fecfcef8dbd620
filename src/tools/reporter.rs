use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::{Citation, FinalReport, Language, SourceSummary};
use crate::tools::llm::LlmClient;
use crate::tools::prompts;
use crate::tools::ReportGenerator;

/// Builds the final report from three model calls run side by side:
/// an overall summary, a key point list and a source comparison.
#[derive(Clone)]
pub struct OpenAiReportGenerator {
    llm: LlmClient,
}

impl OpenAiReportGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn section(&self, name: &str, preamble: String, prompt: String) -> Option<String> {
        match self.llm.complete(&preamble, prompt, None).await {
            Ok(Some(text)) => Some(text),
            Ok(None) => {
                warn!(section = name, "model returned an empty section");
                None
            }
            Err(e) => {
                warn!(section = name, "report section failed: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl ReportGenerator for OpenAiReportGenerator {
    async fn generate(
        &self,
        summaries: &[SourceSummary],
        topic: &str,
        language: Language,
    ) -> Option<FinalReport> {
        if summaries.is_empty() {
            return None;
        }

        let sources = prompts::format_summaries(summaries);
        let (summary, key_points, comparison) = tokio::join!(
            self.section(
                "summary",
                prompts::main_summary_preamble(language),
                prompts::main_summary_prompt(topic, &sources),
            ),
            self.section(
                "key_points",
                prompts::key_points_preamble(language),
                prompts::key_points_prompt(topic, &sources),
            ),
            self.section(
                "comparison",
                prompts::comparison_preamble(language),
                prompts::comparison_prompt(topic, &sources),
            ),
        );

        let key_points = parse_key_points(&key_points?);
        if key_points.is_empty() {
            warn!("no key points could be parsed from the model output");
            return None;
        }

        info!("Generated report with {} key points", key_points.len());
        Some(FinalReport {
            summary: summary?,
            key_points,
            comparison: comparison?,
            citations: summaries.iter().map(Citation::from).collect(),
            language,
        })
    }
}

/// Bullet (`•`, `-`, `*`) or numbered (`1.`, `2)`) lines; anything else is ignored.
pub fn parse_key_points(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            if let Some(rest) = line.strip_prefix(&['•', '-', '*'][..]) {
                return Some(rest.trim().to_string());
            }
            if !line.chars().next()?.is_numeric() {
                return None;
            }
            let marker = line.find(&['.', ')'][..])?;
            Some(line[marker + 1..].trim().to_string())
        })
        .filter(|point| !point.is_empty())
        .collect()
}
