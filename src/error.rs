use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelpGenError {
    #[error("Source document for {topic} not found: {}", .path.display())]
    MissingInput { topic: String, path: PathBuf },

    #[error("Rendering failed at {stage}: {reason}")]
    RenderFailure { stage: String, reason: String },

    #[error("Cannot write output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl HelpGenError {
    pub fn render_failure<S: Into<String>, R: Into<String>>(stage: S, reason: R) -> Self {
        HelpGenError::RenderFailure {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            HelpGenError::Cancelled => 130, // Interrupted (SIGINT)
            HelpGenError::MissingInput { .. } => 3,
            HelpGenError::RenderFailure { .. } => 4,
            HelpGenError::OutputWrite { .. } => 5,
            _ => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for HelpGenError {
    fn user_message(&self) -> String {
        match self {
            HelpGenError::MissingInput { topic, path } => {
                format!("Missing source document for {}: {}", topic, path.display())
            }
            HelpGenError::RenderFailure { stage, reason } => {
                format!("Failed to render {}: {}", stage, reason)
            }
            HelpGenError::OutputWrite { path, source } => {
                format!("Cannot write {}: {}", path.display(), source)
            }
            HelpGenError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            HelpGenError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            HelpGenError::MissingInput { .. } => Some(
                "Check that the source directory contains one .rst document per configured topic.".to_string()
            ),
            HelpGenError::RenderFailure { .. } => Some(
                "Make sure sphinx-build and elinks are installed and on PATH, or point --sphinx-build / --dumper at them.".to_string()
            ),
            HelpGenError::OutputWrite { .. } => Some(
                "Ensure the parent directory of the output file exists and is writable.".to_string()
            ),
            HelpGenError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for HelpGenError {
    fn from(error: toml::de::Error) -> Self {
        HelpGenError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HelpGenError>;
