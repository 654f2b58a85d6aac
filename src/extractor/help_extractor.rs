use crate::error::{HelpGenError, Result};
use crate::extractor::dumper::TextDumper;
use crate::extractor::renderer::{DocRenderer, RenderRequest};
use crate::extractor::scratch::{self, ScratchDir};
use crate::topics::TopicTable;
use crate::ui::GracefulShutdown;
use std::path::{Path, PathBuf};

/// Raw dumped text for one topic, keyed by its macro name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpText {
    pub macro_name: String,
    pub raw_text: String,
}

impl HelpText {
    pub fn new<N: Into<String>, T: Into<String>>(macro_name: N, raw_text: T) -> Self {
        Self {
            macro_name: macro_name.into(),
            raw_text: raw_text.into(),
        }
    }

    /// Lines of help content once the leading boilerplate is dropped.
    pub fn content_lines(&self, skip: usize) -> impl Iterator<Item = &str> {
        self.raw_text.lines().skip(skip)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStage {
    Rendering { documents: usize },
    Dumping { index: usize, total: usize, topic: String },
    Cleanup,
}

/// Renders every configured topic and dumps each page to text, in table
/// order, inside a scratch directory that never outlives the call.
pub struct HelpExtractor<R, D> {
    topics: TopicTable,
    renderer: R,
    dumper: D,
    scratch_path: Option<PathBuf>,
    shutdown: Option<GracefulShutdown>,
    progress_callback: Option<Box<dyn Fn(&ExtractionStage) + Send + Sync>>,
}

impl<R: DocRenderer, D: TextDumper> HelpExtractor<R, D> {
    pub fn new(topics: TopicTable, renderer: R, dumper: D) -> Self {
        Self {
            topics,
            renderer,
            dumper,
            scratch_path: None,
            shutdown: None,
            progress_callback: None,
        }
    }

    pub fn with_scratch_dir<P: Into<PathBuf>>(mut self, path: Option<P>) -> Self {
        self.scratch_path = path.map(Into::into);
        self
    }

    pub fn with_shutdown(mut self, shutdown: GracefulShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ExtractionStage) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    pub fn extract(&self, source_dir: &Path) -> Result<Vec<HelpText>> {
        self.check_shutdown()?;
        let documents = self.source_documents(source_dir)?;
        self.check_scratch_location(&[source_dir])?;

        let scratch = ScratchDir::create(self.scratch_path.as_deref())?;
        tracing::debug!(scratch = %scratch.path().display(), "created scratch directory");

        let result = self.render_and_dump(source_dir, documents, &scratch);

        drop(scratch);
        self.report(&ExtractionStage::Cleanup);

        result
    }

    /// Fail when the configured scratch directory is, or contains, one of
    /// `protected`. A temporary scratch directory never does.
    pub fn check_scratch_location(&self, protected: &[&Path]) -> Result<()> {
        match self.scratch_path {
            Some(ref scratch_path) => scratch::check_scratch_location(scratch_path, protected),
            None => Ok(()),
        }
    }

    /// Every topic's source document, failing on the first one that is
    /// missing.
    pub fn source_documents(&self, source_dir: &Path) -> Result<Vec<PathBuf>> {
        self.topics
            .iter()
            .map(|topic| {
                let path = topic.source_path(source_dir);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(HelpGenError::MissingInput {
                        topic: topic.macro_name.clone(),
                        path,
                    })
                }
            })
            .collect()
    }

    fn render_and_dump(
        &self,
        source_dir: &Path,
        documents: Vec<PathBuf>,
        scratch: &ScratchDir,
    ) -> Result<Vec<HelpText>> {
        self.report(&ExtractionStage::Rendering {
            documents: documents.len(),
        });

        let request = RenderRequest {
            source_dir: source_dir.to_path_buf(),
            output_dir: scratch.path().to_path_buf(),
            doctree_dir: scratch.doctree_dir(),
            documents,
        };
        self.renderer
            .render(&request)
            .map_err(|e| self.interrupted_or(e))?;

        let total = self.topics.len();
        let mut texts = Vec::with_capacity(total);

        for (index, topic) in self.topics.iter().enumerate() {
            self.check_shutdown()?;
            self.report(&ExtractionStage::Dumping {
                index,
                total,
                topic: topic.macro_name.clone(),
            });

            let html_path = topic.html_path(scratch.path());
            if !html_path.is_file() {
                return Err(HelpGenError::render_failure(
                    &topic.macro_name,
                    format!("renderer produced no page at {}", html_path.display()),
                ));
            }

            let raw_text = self.dumper.dump(&html_path).map_err(|e| match e {
                HelpGenError::RenderFailure { reason, .. } => self.interrupted_or(
                    HelpGenError::render_failure(&topic.macro_name, reason),
                ),
                other => other,
            })?;

            if raw_text.trim().is_empty() {
                return Err(HelpGenError::render_failure(
                    &topic.macro_name,
                    "text dump produced no output",
                ));
            }

            tracing::debug!(topic = %topic.macro_name, bytes = raw_text.len(), "captured help text");
            texts.push(HelpText::new(topic.macro_name.clone(), raw_text));
        }

        Ok(texts)
    }

    fn check_shutdown(&self) -> Result<()> {
        match self.shutdown {
            Some(ref shutdown) => shutdown.check_shutdown(),
            None => Ok(()),
        }
    }

    /// A child process killed by the same Ctrl+C reports as a cancellation.
    fn interrupted_or(&self, error: HelpGenError) -> HelpGenError {
        match self.check_shutdown() {
            Err(cancelled) => cancelled,
            Ok(()) => error,
        }
    }

    fn report(&self, stage: &ExtractionStage) {
        if let Some(ref callback) = self.progress_callback {
            callback(stage);
        }
    }
}
