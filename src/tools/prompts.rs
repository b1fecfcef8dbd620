//! Prompt templates for the summarizer and the report generator.

use crate::models::{Language, SourceSummary};

pub const KEY_POINTS_MIN: usize = 5;
pub const KEY_POINTS_MAX: usize = 7;

pub fn language_instruction(language: Language) -> String {
    format!(
        "You MUST write your entire response in {}. Do not use other languages.",
        language.display_name()
    )
}

pub fn summarization_preamble(language: Language) -> String {
    format!(
        r#"You are a research assistant that creates concise, informative summaries.
{}
Your task is to summarize the provided content in exactly one paragraph.
Focus on preserving key facts, findings, and important information.
Keep the summary clear and informative."#,
        language_instruction(language)
    )
}

pub fn summarization_prompt(source_title: &str, content: &str) -> String {
    format!(
        r#"Please summarize the following content from "{}" in one paragraph:

{}"#,
        source_title, content
    )
}

pub fn main_summary_preamble(language: Language) -> String {
    format!(
        r#"You are a research analyst creating comprehensive summaries.
{}
Your task is to synthesize multiple source summaries into a unified, coherent summary.
Focus on the main findings and insights about the topic.
Use citation numbers [1], [2], etc. when referencing specific sources."#,
        language_instruction(language)
    )
}

pub fn main_summary_prompt(topic: &str, summaries: &str) -> String {
    format!(
        r#"Research Topic: {}

Source Summaries:
{}

Create a comprehensive summary (2-3 paragraphs) that synthesizes the key information from all sources about this topic. Include citation numbers when referencing specific sources."#,
        topic, summaries
    )
}

pub fn key_points_preamble(language: Language) -> String {
    format!(
        r#"You are a research analyst identifying key points.
{}
Your task is to extract the most important points from the research summaries.
Each point should be a complete, standalone statement.
Include citation numbers [1], [2], etc. when a point comes from a specific source.
Return exactly {}-{} key points, one per line, starting with a bullet point (•)."#,
        language_instruction(language),
        KEY_POINTS_MIN,
        KEY_POINTS_MAX
    )
}

pub fn key_points_prompt(topic: &str, summaries: &str) -> String {
    format!(
        r#"Research Topic: {}

Source Summaries:
{}

Extract {}-{} key points from these sources. Each point should be on its own line starting with •"#,
        topic, summaries, KEY_POINTS_MIN, KEY_POINTS_MAX
    )
}

pub fn comparison_preamble(language: Language) -> String {
    format!(
        r#"You are a research analyst comparing multiple sources.
{}
Your task is to compare and contrast the different sources.
Identify areas of agreement, disagreement, and unique perspectives.
Use citation numbers [1], [2], etc. when referencing specific sources."#,
        language_instruction(language)
    )
}

pub fn comparison_prompt(topic: &str, summaries: &str) -> String {
    format!(
        r#"Research Topic: {}

Source Summaries:
{}

Write a comparison section (1-2 paragraphs) that analyzes how these sources relate to each other. Highlight agreements, disagreements, and unique contributions from each source."#,
        topic, summaries
    )
}

/// Numbered source block shared by all report prompts.
pub fn format_summaries(summaries: &[SourceSummary]) -> String {
    summaries
        .iter()
        .map(|s| {
            format!(
                "[{}] {}\nURL: {}\nSummary: {}\n",
                s.source_number, s.title, s.url, s.summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
