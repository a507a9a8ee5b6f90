// file: src/pipeline/progress.rs
// description: progress reporting and run statistics for a classification run
// reference: uses indicatif for progress bars and tracks processing counts

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub structured_entries: usize,
    pub lines_classified: usize,
    pub lines_unrecognized: usize,
    pub lines_blank: usize,
    pub duration_ms: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn non_blank_lines(&self) -> usize {
        self.lines_classified + self.lines_unrecognized
    }

    pub fn document_success_rate(&self) -> f64 {
        let total = self.documents_processed + self.documents_failed;
        if total == 0 {
            return 0.0;
        }
        (self.documents_processed as f64 / total as f64) * 100.0
    }

    pub fn log_summary(&self) {
        info!(
            "Documents: {} processed, {} failed ({:.1}% ok), {} structured entries",
            self.documents_processed,
            self.documents_failed,
            self.document_success_rate(),
            self.structured_entries
        );
        info!(
            "IOC lines: {} read, {} classified, {} unrecognized, {} blank in {}ms",
            self.non_blank_lines(),
            self.lines_classified,
            self.lines_unrecognized,
            self.lines_blank,
            self.duration_ms
        );
    }
}

/// Progress bar over structured documents. Hidden when disabled.
pub struct ProgressTracker {
    bar: ProgressBar,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_documents: usize, visible: bool) -> Self {
        let bar = ProgressBar::new(total_documents as u64);

        if visible {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓▒░"),
            );
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }

        Self {
            bar,
            start_time: Instant::now(),
        }
    }

    pub fn start_document(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    pub fn finish_document(&self) {
        self.bar.inc(1);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_stats_success_rate() {
        let stats = RunStats {
            documents_processed: 2,
            documents_failed: 1,
            ..RunStats::new()
        };

        assert!((stats.document_success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_run_stats_empty() {
        let stats = RunStats::new();
        assert_eq!(stats.document_success_rate(), 0.0);
        assert_eq!(stats.non_blank_lines(), 0);
    }

    #[test]
    fn test_hidden_tracker_counts() {
        let tracker = ProgressTracker::new(3, false);
        tracker.start_document("a.json");
        tracker.finish_document();
        tracker.finish_document();

        assert_eq!(tracker.bar.position(), 2);
    }
}
