//! JSON output formatter

use satprep_core::{FileOutcome, GeneratedAnswer, IngestReport};
use serde_json::json;

pub fn format_ingest_report(report: &IngestReport, index: &str) -> String {
    let files: Vec<serde_json::Value> = report
        .outcomes
        .iter()
        .map(|o| match o {
            FileOutcome::Ingested { path, chunks } => json!({
                "path": path.display().to_string(),
                "status": "ingested",
                "chunks": chunks,
            }),
            FileOutcome::Failed { path, error } => json!({
                "path": path.display().to_string(),
                "status": "failed",
                "error": error,
            }),
        })
        .collect();

    let output = json!({
        "index": index,
        "total_files": report.total_files(),
        "succeeded": report.succeeded(),
        "failed": report.failed(),
        "chunks": report.total_chunks(),
        "files": files,
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

pub fn format_answer(answer: &GeneratedAnswer, show_context: bool) -> String {
    let mut output = json!({
        "answer": answer.answer,
        "markers_found": answer.markers_found,
    });
    if show_context {
        output["raw"] = json!(answer.raw);
        output["context"] = json!(answer.context);
    }

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json() {
        let report = IngestReport {
            outcomes: vec![
                FileOutcome::Ingested {
                    path: "a.pdf".into(),
                    chunks: 3,
                },
                FileOutcome::Failed {
                    path: "b.pdf".into(),
                    error: "PDF error: bad".into(),
                },
            ],
        };
        let value: serde_json::Value =
            serde_json::from_str(&format_ingest_report(&report, "sat-math")).unwrap();
        assert_eq!(value["succeeded"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["files"][1]["status"], "failed");
    }

    #[test]
    fn test_answer_json_hides_context_by_default() {
        let answer = GeneratedAnswer {
            raw: "<Answer>1. Q</Answer>".into(),
            answer: "1. Q".into(),
            context: Vec::new(),
            markers_found: true,
        };
        let value: serde_json::Value = serde_json::from_str(&format_answer(&answer, false)).unwrap();
        assert_eq!(value["answer"], "1. Q");
        assert!(value.get("context").is_none());
    }
}
