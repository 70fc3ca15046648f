//! Progress reporting for ingestion

use satprep_core::IngestProgress;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Single-line progress reporter on stderr
#[derive(Default)]
pub struct ProgressReporter {
    total: AtomicUsize,
    processed: AtomicUsize,
    failed: AtomicUsize,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&self, msg: &str) {
        eprint!("\r{:<70}", msg);
        io::stderr().flush().ok();
    }

    /// Record one finished file
    pub fn update(&self, progress: &IngestProgress) {
        self.total.store(progress.total_files, Ordering::Relaxed);
        self.processed
            .store(progress.processed_files, Ordering::Relaxed);
        if !progress.succeeded {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        let name = progress
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.set_message(&format!(
            "[{}/{}] {}",
            progress.processed_files,
            progress.total_files,
            truncate(&name, 55)
        ));
    }

    pub fn finish(&self) {
        let total = self.total.load(Ordering::Relaxed);
        let processed = self.processed.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        eprintln!(
            "\rDone ({}/{}, {} failed){:<40}",
            processed, total, failed, ""
        );
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short.pdf", 20), "short.pdf");
        assert_eq!(truncate("a-very-long-file-name.pdf", 10), "a-very-...");
    }

    #[test]
    fn test_counts_failures() {
        let reporter = ProgressReporter::new();
        reporter.update(&IngestProgress {
            total_files: 2,
            processed_files: 1,
            path: "a.pdf".into(),
            succeeded: false,
        });
        assert_eq!(reporter.failed.load(Ordering::Relaxed), 1);
        assert_eq!(reporter.processed.load(Ordering::Relaxed), 1);
    }
}
