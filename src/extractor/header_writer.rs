use crate::error::{HelpGenError, Result};
use crate::extractor::help_extractor::HelpText;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const GENERATED_HEADER: &str = "/* This file was automatically generated from RST docs */ \n\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub macro_name: String,
    pub lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub topics: Vec<TopicSummary>,
    pub bytes_written: u64,
}

/// Emits help texts as C string-literal macros:
///
/// ```text
/// #define HELP_A "" \
/// "Line one\n" \
/// "\n"
/// ```
///
/// Line content is copied verbatim; quotes and backslashes in the text are
/// not escaped.
#[derive(Debug, Clone)]
pub struct HeaderWriter {
    skip_lines: usize,
}

impl HeaderWriter {
    pub fn new() -> Self {
        Self { skip_lines: 2 }
    }

    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    pub fn render(&self, texts: &[HelpText]) -> (String, Vec<TopicSummary>) {
        let mut out = String::from(GENERATED_HEADER);
        let mut summaries = Vec::with_capacity(texts.len());

        for text in texts {
            out.push_str(&format!("#define {} \"\" \\\n", text.macro_name));

            let mut lines = 0;
            for line in text.content_lines(self.skip_lines) {
                out.push_str(&format!("\"{}\\n\" \\\n", line));
                lines += 1;
            }
            out.push_str("\"\\n\" \n\n\n");

            summaries.push(TopicSummary {
                macro_name: text.macro_name.clone(),
                lines,
            });
        }

        (out, summaries)
    }

    /// Replace `path` with the rendered header. The file is truncated first,
    /// so an interrupted write can leave it partial.
    pub fn write(&self, texts: &[HelpText], path: &Path) -> Result<WriteSummary> {
        let (content, topics) = self.render(texts);
        let output_error = |source| HelpGenError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(output_error)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes()).map_err(output_error)?;
        writer.flush().map_err(output_error)?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote help header");

        Ok(WriteSummary {
            path: path.to_path_buf(),
            topics,
            bytes_written: content.len() as u64,
        })
    }
}

impl Default for HeaderWriter {
    fn default() -> Self {
        Self::new()
    }
}
