use crate::error::{HelpGenError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One unit of help content: the macro it is emitted as and the document it
/// is rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Topic {
    pub macro_name: String,
    pub source_stem: String,
}

impl Topic {
    pub fn new<N: Into<String>, S: Into<String>>(macro_name: N, source_stem: S) -> Self {
        Self {
            macro_name: macro_name.into(),
            source_stem: source_stem.into(),
        }
    }

    pub fn source_path(&self, source_dir: &Path) -> PathBuf {
        source_dir.join(format!("{}.rst", self.source_stem))
    }

    pub fn html_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.html", self.source_stem))
    }
}

/// Immutable, ordered list of topics. Order here is the order of the
/// generated `#define`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicTable {
    topics: Vec<Topic>,
}

impl TopicTable {
    pub fn new(topics: Vec<Topic>) -> Result<Self> {
        validate_topics(&topics)?;
        Ok(Self { topics })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Topic> {
        self.topics.iter()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn macro_names(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.macro_name.as_str()).collect()
    }
}

impl Default for TopicTable {
    fn default() -> Self {
        Self {
            topics: default_topics(),
        }
    }
}

impl<'a> IntoIterator for &'a TopicTable {
    type Item = &'a Topic;
    type IntoIter = std::slice::Iter<'a, Topic>;

    fn into_iter(self) -> Self::IntoIter {
        self.topics.iter()
    }
}

/// The two SaddleSum programs that embed generated help.
pub fn default_topics() -> Vec<Topic> {
    vec![
        Topic::new("HELP_SADDLESUM", "saddlesum-cli"),
        Topic::new("HELP_SHOW_ETD", "saddlesum-show-etd"),
    ]
}

pub fn validate_topics(topics: &[Topic]) -> Result<()> {
    if topics.is_empty() {
        return Err(HelpGenError::Config {
            message: "At least one topic must be configured".to_string(),
        });
    }

    let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").map_err(|e| HelpGenError::Config {
        message: format!("Invalid identifier pattern: {}", e),
    })?;

    let mut names = HashSet::new();
    let mut stems = HashSet::new();

    for topic in topics {
        if !identifier.is_match(&topic.macro_name) {
            return Err(HelpGenError::Config {
                message: format!("Macro name is not a valid C identifier: {:?}", topic.macro_name),
            });
        }

        let stem = topic.source_stem.trim();
        if stem.is_empty() || stem.contains('/') || stem.contains('\\') {
            return Err(HelpGenError::Config {
                message: format!(
                    "Source stem for {} must be a bare document name: {:?}",
                    topic.macro_name, topic.source_stem
                ),
            });
        }

        if !names.insert(topic.macro_name.as_str()) {
            return Err(HelpGenError::Config {
                message: format!("Duplicate macro name: {}", topic.macro_name),
            });
        }

        if !stems.insert(stem) {
            return Err(HelpGenError::Config {
                message: format!("Duplicate source document: {}", topic.source_stem),
            });
        }
    }

    Ok(())
}
