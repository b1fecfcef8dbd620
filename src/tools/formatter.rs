use serde::Serialize;
use tracing::error;

use crate::models::{Citation, FinalReport, Language, OutputFormat};
use crate::tools::OutputFormatter;

struct SectionTitles {
    summary: &'static str,
    key_points: &'static str,
    comparison: &'static str,
    citations: &'static str,
}

fn section_titles(language: Language) -> SectionTitles {
    match language {
        Language::En => SectionTitles {
            summary: "Summary",
            key_points: "Key Points",
            comparison: "Comparison",
            citations: "Citations",
        },
        Language::Fa => SectionTitles {
            summary: "خلاصه",
            key_points: "نکات کلیدی",
            comparison: "مقایسه",
            citations: "منابع",
        },
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a str,
    key_points: &'a [String],
    comparison: &'a str,
    citations: &'a [Citation],
    language: Language,
}

/// Renders a [`FinalReport`] as Markdown with localized headings, or as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownJsonFormatter;

impl MarkdownJsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn to_json(report: &FinalReport) -> String {
        let view = JsonReport {
            summary: &report.summary,
            key_points: &report.key_points,
            comparison: &report.comparison,
            citations: &report.citations,
            language: report.language,
        };
        // Only strings and integers: serialization cannot fail.
        serde_json::to_string_pretty(&view).unwrap_or_else(|e| {
            error!("report serialization failed: {e}");
            "{}".to_string()
        })
    }

    fn to_markdown(report: &FinalReport) -> String {
        let titles = section_titles(report.language);

        let key_points = report
            .key_points
            .iter()
            .map(|point| format!("- {point}"))
            .collect::<Vec<_>>()
            .join("\n");

        let citations = report
            .citations
            .iter()
            .map(|c| format!("[{}] {} - {}", c.number, c.title, c.url))
            .collect::<Vec<_>>()
            .join("\n\n");

        [
            format!("# {}\n\n{}\n", titles.summary, report.summary),
            format!("# {}\n\n{}\n", titles.key_points, key_points),
            format!("# {}\n\n{}\n", titles.comparison, report.comparison),
            format!("# {}\n\n{}", titles.citations, citations),
        ]
        .join("\n")
    }
}

impl OutputFormatter for MarkdownJsonFormatter {
    fn format(&self, report: &FinalReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(report),
            OutputFormat::Markdown => Self::to_markdown(report),
        }
    }
}
