//! Terminal output formatter

use satprep_core::{GeneratedAnswer, IngestReport};

pub fn format_ingest_report(report: &IngestReport, index: &str) -> String {
    let mut out = format!(
        "Ingested {}/{} PDFs into '{}' ({} chunks)\n",
        report.succeeded(),
        report.total_files(),
        index,
        report.total_chunks()
    );
    for failure in report.failures() {
        if let satprep_core::FileOutcome::Failed { path, error } = failure {
            out.push_str(&format!("Failed to process {}: {}\n", path.display(), error));
        }
    }
    out
}

pub fn format_answer(answer: &GeneratedAnswer, show_context: bool) -> String {
    let mut out = String::new();
    if show_context {
        if answer.context.is_empty() {
            out.push_str("No reference material retrieved.\n\n");
        }
        for (i, entry) in answer.context.iter().enumerate() {
            out.push_str(&format!(
                "--- context {} (score {:.3}, {}) ---\n{}\n\n",
                i + 1,
                entry.score,
                entry.metadata.source,
                entry.text.trim()
            ));
        }
        out.push_str("--- questions ---\n");
    }
    out.push_str(answer.answer.trim_end());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use satprep_core::{EntryMetadata, FileOutcome, ScoredEntry};

    #[test]
    fn test_report_lists_failures() {
        let report = IngestReport {
            outcomes: vec![FileOutcome::Failed {
                path: "b.pdf".into(),
                error: "PDF error: bad xref".into(),
            }],
        };
        let text = format_ingest_report(&report, "sat-math");
        assert!(text.starts_with("Ingested 0/1 PDFs into 'sat-math'"));
        assert!(text.contains("Failed to process b.pdf: PDF error: bad xref"));
    }

    #[test]
    fn test_answer_with_context() {
        let answer = GeneratedAnswer {
            raw: String::new(),
            answer: "1. Q\n2. Q\n3. Q".into(),
            context: vec![ScoredEntry {
                id: "x".into(),
                text: "Solve 2x > 4".into(),
                metadata: EntryMetadata {
                    source: "algebra.pdf".into(),
                    ..Default::default()
                },
                score: 0.91,
            }],
            markers_found: true,
        };
        let text = format_answer(&answer, true);
        assert!(text.contains("score 0.910, algebra.pdf"));
        assert!(text.ends_with("3. Q\n"));
        assert_eq!(format_answer(&answer, false), "1. Q\n2. Q\n3. Q\n");
    }
}
