use crate::config::{CliOverrides, Config};
use crate::error::{HelpGenError, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "helpgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate embeddable C help text from reStructuredText documentation")]
#[command(
    long_about = "helpgen renders the SaddleSum program documentation with Sphinx, dumps each \
                  page to plain text with elinks and writes the result as C string-literal \
                  macros for the programs' -h output."
)]
#[command(after_help = "EXAMPLES:\n  \
    helpgen doc/source include/help.h\n  \
    helpgen doc/source include/help.h --scratch-dir utils/help/.tmp_help -v\n  \
    helpgen doc/source include/help.h --dumper /usr/local/bin/elinks\n  \
    helpgen doc/source include/help.h --config helpgen.toml --dry-run")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Directory containing the reStructuredText help documents
    #[arg(required_unless_present = "generate_config")]
    pub source_dir: Option<PathBuf>,

    /// Generated header file to write (overwritten)
    #[arg(required_unless_present = "generate_config")]
    pub output_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Scratch directory for intermediate HTML
    #[arg(long, help = "Fixed scratch directory (removed after the run)")]
    pub scratch_dir: Option<PathBuf>,

    /// Documentation renderer executable
    #[arg(long, env = "HELPGEN_SPHINX_BUILD", help = "sphinx-build executable to use")]
    pub sphinx_build: Option<String>,

    /// HTML-to-text dump executable
    #[arg(long, env = "HELPGEN_DUMPER", help = "Text browser used to dump HTML (elinks)")]
    pub dumper: Option<String>,

    /// Extra template directory for the renderer
    #[arg(long, help = "Template directory passed to the renderer")]
    pub templates: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Check inputs and show the plan without running anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_scratch_dir(self.scratch_dir.clone())
            .with_sphinx_build(self.sphinx_build.clone())
            .with_dumper(self.dumper.clone())
            .with_templates_path(self.templates.clone())
    }

    /// Source directory and output file, both required outside of
    /// `--generate-config`.
    pub fn paths(&self) -> Result<(&Path, &Path)> {
        match (&self.source_dir, &self.output_file) {
            (Some(source_dir), Some(output_file)) => Ok((source_dir, output_file)),
            _ => Err(HelpGenError::Config {
                message: "Both <SOURCE_DIR> and <OUTPUT_FILE> are required".to_string(),
            }),
        }
    }

    pub fn config_output_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from("helpgen.toml"))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("helpgen").chain(args.iter().copied()))
    }

    #[test]
    fn test_positional_arguments() {
        let cli = parse(&["doc/source", "include/help.h"]).unwrap();
        let (source, output) = cli.paths().unwrap();
        assert_eq!(source, Path::new("doc/source"));
        assert_eq!(output, Path::new("include/help.h"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_both_positionals_required() {
        assert!(parse(&["doc/source"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_generate_config_without_positionals() {
        let cli = parse(&["--generate-config", "--config", "out.toml"]).unwrap();
        assert!(cli.generate_config);
        assert!(cli.paths().is_err());
        assert_eq!(cli.config_output_path(), PathBuf::from("out.toml"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(parse(&["src", "out.h", "-q", "-v"]).is_err());

        let cli = parse(&["src", "out.h", "-vv"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = parse(&[
            "src",
            "out.h",
            "--scratch-dir",
            "/tmp/help-scratch",
            "--dumper",
            "lynx",
        ])
        .unwrap();

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.scratch_dir, Some(PathBuf::from("/tmp/help-scratch")));
        assert_eq!(overrides.dumper.as_deref(), Some("lynx"));
        assert!(overrides.templates_path.is_none());
    }
}
