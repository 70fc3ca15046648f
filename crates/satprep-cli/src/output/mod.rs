//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use satprep_core::{GeneratedAnswer, IngestReport};

/// Format an ingestion report
pub fn format_ingest_report(report: &IngestReport, index: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_ingest_report(report, index),
        OutputFormat::Cli => terminal::format_ingest_report(report, index),
    }
}

/// Format generated questions
pub fn format_answer(answer: &GeneratedAnswer, format: OutputFormat, show_context: bool) -> String {
    match format {
        OutputFormat::Json => json::format_answer(answer, show_context),
        OutputFormat::Cli => terminal::format_answer(answer, show_context),
    }
}
