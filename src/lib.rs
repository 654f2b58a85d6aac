pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod topics;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, DumperConfig, OutputConfig, RendererConfig};
pub use error::{HelpGenError, Result, UserFriendlyError};
pub use topics::{Topic, TopicTable};

// Core functionality re-exports
pub use extractor::{
    DocRenderer, ElinksDumper, ExtractionStage, GenerationReport, HeaderWriter, HelpExtractor,
    HelpText, SphinxRenderer, TextDumper,
};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;

/// Extract every topic from `source_dir` and write the header to
/// `output_path`. The output file is not touched unless extraction
/// succeeded.
pub fn generate_help<R: DocRenderer, D: TextDumper>(
    extractor: &HelpExtractor<R, D>,
    writer: &HeaderWriter,
    source_dir: &Path,
    output_path: &Path,
) -> Result<GenerationReport> {
    let start_time = Instant::now();

    let output_dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    extractor.check_scratch_location(&[output_dir])?;

    let texts = extractor.extract(source_dir)?;
    let summary = writer.write(&texts, output_path)?;

    Ok(GenerationReport::new(source_dir, summary, start_time.elapsed()))
}

/// Main library interface for helpgen functionality
pub struct HelpGen {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl HelpGen {
    /// Create a new HelpGen instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a new HelpGen instance for testing (no signal handler conflicts)
    #[cfg(test)]
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            progress_manager: ProgressManager::new(false),
            shutdown: GracefulShutdown::new_for_test(),
        }
    }

    /// Create HelpGen instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
    }

    pub fn build_extractor(&self) -> Result<HelpExtractor<SphinxRenderer, ElinksDumper>> {
        let extractor = HelpExtractor::new(
            self.config.topic_table()?,
            SphinxRenderer::new(&self.config.renderer),
            ElinksDumper::new(&self.config.dumper),
        )
        .with_scratch_dir(self.config.output.scratch_dir.clone())
        .with_shutdown(self.shutdown.clone());

        Ok(extractor)
    }

    pub fn build_writer(&self) -> HeaderWriter {
        HeaderWriter::new().with_skip_lines(self.config.output.skip_lines)
    }

    /// Render, dump and write the help header.
    pub async fn generate(&self, source_dir: &Path, output_path: &Path) -> Result<GenerationReport> {
        self.shutdown.check_shutdown()?;

        let extractor = self.build_extractor()?;
        let topic_count = extractor.topics().len() as u64;

        self.output_formatter.start_operation(&format!(
            "Generating help for {} topics from {}",
            topic_count,
            source_dir.display()
        ));

        let topic_progress = self.progress_manager.create_topic_progress(topic_count);
        let extractor = {
            let pb = topic_progress.clone();
            extractor.with_progress(move |stage| ui::progress::update_stage_progress(&pb, stage))
        };

        let writer = self.build_writer();
        let source_dir: PathBuf = source_dir.to_path_buf();
        let output_path: PathBuf = output_path.to_path_buf();

        let result = task::spawn_blocking(move || {
            generate_help(&extractor, &writer, &source_dir, &output_path)
        })
        .await
        .map_err(|e| HelpGenError::Config {
            message: format!("Generation task failed: {}", e),
        })?;

        match result {
            Ok(report) => {
                ui::progress::finish_progress_with_summary(
                    &topic_progress,
                    "Help text generated",
                    report.duration,
                );
                self.output_formatter.debug(&report.display_summary());
                Ok(report)
            }
            Err(e) => {
                topic_progress.abandon();
                Err(e)
            }
        }
    }

    /// Check the inputs a real run would need without launching anything.
    pub fn plan(&self, source_dir: &Path) -> Result<Vec<PathBuf>> {
        let extractor = self.build_extractor()?;
        let documents = extractor.source_documents(source_dir)?;
        extractor.check_scratch_location(&[source_dir])?;
        Ok(documents)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &HelpGenError) {
        self.progress_manager.clear();
        self.output_formatter.print_user_friendly_error(error);
    }
}
