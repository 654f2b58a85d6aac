use crate::extractor::header_writer::{TopicSummary, WriteSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub source_dir: PathBuf,
    pub output_path: PathBuf,
    pub topics: Vec<TopicSummary>,
    pub bytes_written: u64,
    pub generated_at: DateTime<Utc>,
    pub duration: Duration,
}

impl GenerationReport {
    pub fn new(source_dir: &Path, summary: WriteSummary, duration: Duration) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            output_path: summary.path,
            topics: summary.topics,
            bytes_written: summary.bytes_written,
            generated_at: Utc::now(),
            duration,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.topics.iter().map(|t| t.lines).sum()
    }

    pub fn display_summary(&self) -> String {
        let names: Vec<_> = self.topics.iter().map(|t| t.macro_name.as_str()).collect();
        format!(
            "{} topics ({}), {} lines, {} bytes -> {}",
            self.topics.len(),
            names.join(", "),
            self.total_lines(),
            self.bytes_written,
            self.output_path.display()
        )
    }
}
