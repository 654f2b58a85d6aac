use crate::error::{HelpGenError, Result};
use crate::topics::{default_topics, Topic, TopicTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub renderer: RendererConfig,
    pub dumper: DumperConfig,
    pub output: OutputConfig,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RendererConfig {
    pub program: String,
    pub builder: String,
    pub templates_path: Option<PathBuf>,
    pub quiet: bool,
    /// Extra `-D name=value` settings passed to the renderer.
    pub overrides: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DumperConfig {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub skip_lines: usize,
    pub scratch_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            renderer: RendererConfig::default(),
            dumper: DumperConfig::default(),
            output: OutputConfig::default(),
            topics: default_topics(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "sphinx-build".to_string(),
            builder: "html".to_string(),
            templates_path: None, // Bundled layout without navigation
            quiet: true,
            overrides: BTreeMap::new(),
        }
    }
}

impl Default for DumperConfig {
    fn default() -> Self {
        Self {
            program: "elinks".to_string(),
            args: vec!["-force-html".to_string(), "-dump".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            skip_lines: 2, // Title banner and separator emitted by the dumper
            scratch_dir: None, // Unique temporary directory
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(HelpGenError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| HelpGenError::Config {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| HelpGenError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["helpgen.toml", ".helpgen.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref scratch_dir) = cli_args.scratch_dir {
            self.output.scratch_dir = Some(scratch_dir.clone());
        }

        if let Some(ref program) = cli_args.sphinx_build {
            self.renderer.program = program.clone();
        }

        if let Some(ref program) = cli_args.dumper {
            self.dumper.program = program.clone();
        }

        if let Some(ref templates_path) = cli_args.templates_path {
            self.renderer.templates_path = Some(templates_path.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.topic_table()?;

        if self.renderer.program.trim().is_empty() {
            return Err(HelpGenError::Config {
                message: "Renderer program must not be empty".to_string(),
            });
        }

        if self.renderer.builder.trim().is_empty() {
            return Err(HelpGenError::Config {
                message: "Renderer builder must not be empty".to_string(),
            });
        }

        if self.dumper.program.trim().is_empty() {
            return Err(HelpGenError::Config {
                message: "Dumper program must not be empty".to_string(),
            });
        }

        if let Some(ref templates_path) = self.renderer.templates_path {
            if !templates_path.is_dir() {
                return Err(HelpGenError::Config {
                    message: format!(
                        "Templates directory does not exist: {}",
                        templates_path.display()
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn topic_table(&self) -> Result<TopicTable> {
        TopicTable::new(self.topics.clone())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub scratch_dir: Option<PathBuf>,
    pub sphinx_build: Option<String>,
    pub dumper: Option<String>,
    pub templates_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scratch_dir(mut self, scratch_dir: Option<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir;
        self
    }

    pub fn with_sphinx_build(mut self, program: Option<String>) -> Self {
        self.sphinx_build = program;
        self
    }

    pub fn with_dumper(mut self, program: Option<String>) -> Self {
        self.dumper = program;
        self
    }

    pub fn with_templates_path(mut self, templates_path: Option<PathBuf>) -> Self {
        self.templates_path = templates_path;
        self
    }
}
