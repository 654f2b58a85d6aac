use crate::config::RendererConfig;
use crate::error::{HelpGenError, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Page layout used when no templates directory is configured. It drops the
/// theme's navigation bars, sidebars and footer so only the document body
/// reaches the text dump.
pub const BUNDLED_LAYOUT: &str = include_str!("templates/layout.html");

/// Subdirectory of the render output that receives [`BUNDLED_LAYOUT`].
const BUNDLED_TEMPLATES_DIR: &str = "_helpgen_templates";

/// Inputs for one batched render of the topic documents.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub doctree_dir: PathBuf,
    pub documents: Vec<PathBuf>,
}

/// Turns reStructuredText documents into standalone HTML pages, one
/// `<stem>.html` per document in `output_dir`.
pub trait DocRenderer {
    fn render(&self, request: &RenderRequest) -> Result<()>;
}

/// Renders through `sphinx-build`, with permalinks off, the page template
/// told it is not embedded, and templates taken from the configured
/// directory or the bundled layout.
#[derive(Debug, Clone)]
pub struct SphinxRenderer {
    program: String,
    builder: String,
    templates_path: Option<PathBuf>,
    quiet: bool,
    overrides: BTreeMap<String, String>,
}

impl SphinxRenderer {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            program: config.program.clone(),
            builder: config.builder.clone(),
            templates_path: config.templates_path.clone(),
            quiet: config.quiet,
            overrides: config.overrides.clone(),
        }
    }

    pub fn build_args(&self, request: &RenderRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-b".into(),
            self.builder.clone().into(),
            "-d".into(),
            request.doctree_dir.clone().into(),
        ];

        if self.quiet {
            args.push("-Q".into());
        }

        // Older Sphinx reads html_add_permalinks, newer html_permalinks
        args.push("-D".into());
        args.push("html_permalinks=0".into());
        args.push("-D".into());
        args.push("html_add_permalinks=".into());
        args.push("-A".into());
        args.push("embedded=".into());

        let mut setting = OsString::from("templates_path=");
        setting.push(absolute(&self.templates_dir(request)));
        args.push("-D".into());
        args.push(setting);

        for (name, value) in &self.overrides {
            args.push("-D".into());
            args.push(format!("{}={}", name, value).into());
        }

        args.push(request.source_dir.clone().into());
        args.push(request.output_dir.clone().into());
        args.extend(request.documents.iter().map(|d| d.clone().into_os_string()));

        args
    }

    fn templates_dir(&self, request: &RenderRequest) -> PathBuf {
        match self.templates_path {
            Some(ref templates_path) => templates_path.clone(),
            None => request.output_dir.join(BUNDLED_TEMPLATES_DIR),
        }
    }

    fn install_bundled_layout(&self, request: &RenderRequest) -> Result<()> {
        if self.templates_path.is_some() {
            return Ok(());
        }

        let dir = self.templates_dir(request);
        fs::create_dir_all(&dir)
            .and_then(|_| fs::write(dir.join("layout.html"), BUNDLED_LAYOUT))
            .map_err(|e| {
                HelpGenError::render_failure(
                    &self.program,
                    format!("cannot install page layout in {}: {}", dir.display(), e),
                )
            })
    }
}

impl DocRenderer for SphinxRenderer {
    fn render(&self, request: &RenderRequest) -> Result<()> {
        self.install_bundled_layout(request)?;
        let args = self.build_args(request);
        tracing::debug!(program = %self.program, ?args, "invoking renderer");

        let output = Command::new(&self.program)
            .args(&args)
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

        tracing::debug!(documents = request.documents.len(), "renderer finished");
        Ok(())
    }
}

pub(crate) fn last_line(text: &str) -> &str {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no diagnostic output")
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
