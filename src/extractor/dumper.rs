use crate::config::DumperConfig;
use crate::error::{HelpGenError, Result};
use crate::extractor::renderer::last_line;
use std::path::Path;
use std::process::{Command, Stdio};

/// Converts one rendered HTML page to plain text.
pub trait TextDumper {
    fn dump(&self, html_path: &Path) -> Result<String>;
}

/// Runs a text browser in dump mode (`elinks -force-html -dump <page>`) and
/// captures its standard output.
#[derive(Debug, Clone)]
pub struct ElinksDumper {
    program: String,
    args: Vec<String>,
}

impl ElinksDumper {
    pub fn new(config: &DumperConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

impl TextDumper for ElinksDumper {
    fn dump(&self, html_path: &Path) -> Result<String> {
        tracing::debug!(program = %self.program, page = %html_path.display(), "dumping page");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(html_path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                HelpGenError::render_failure(&self.program, format!("failed to launch: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HelpGenError::render_failure(
                &self.program,
                format!("{}: {}", output.status, last_line(&stderr)),
            ));
        }

        String::from_utf8(output.stdout).map_err(|e| {
            HelpGenError::render_failure(
                &self.program,
                format!(
                    "output is not valid UTF-8 (invalid byte at offset {}); run it under a UTF-8 locale",
                    e.utf8_error().valid_up_to()
                ),
            )
        })
    }
}
