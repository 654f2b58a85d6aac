use crate::error::{HelpGenError, UserFriendlyError};
use crate::extractor::GenerationReport;
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static HINT: Emoji = Emoji("💡 ", "");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

#[derive(Debug, Clone, Copy)]
enum Level {
    Success,
    Error,
    Suggestion,
    Operation,
    Debug,
}

impl Level {
    fn json_name(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Suggestion => "suggestion",
            Level::Operation => "operation_start",
            Level::Debug => "debug",
        }
    }

    fn plain_prefix(self) -> &'static str {
        match self {
            Level::Success => "SUCCESS",
            Level::Error => "ERROR",
            Level::Suggestion => "SUGGESTION",
            Level::Operation => "STARTING",
            Level::Debug => "DEBUG",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Error | Level::Suggestion)
    }
}

/// Prints progress messages, errors and the final report in the selected
/// output mode. Errors are printed even in quiet mode.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            self.emit(Level::Success, message);
        }
    }

    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            self.emit(Level::Debug, message);
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            self.emit(Level::Operation, operation);
        }
    }

    pub fn print_user_friendly_error(&self, error: &HelpGenError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            self.emit(Level::Suggestion, &suggestion);
        }
    }

    pub fn print_generation_report(&self, report: &GenerationReport) {
        match self.mode {
            // Printed even when quiet
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Plain => self.print_plain_report(report),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human if self.use_colors => {
                println!("\n{}\n", style(title).bold().cyan());
            }
            OutputMode::Human | OutputMode::Plain => println!("=== {} ===", title),
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "header",
                "title": title
            })),
        }
    }

    pub fn print_separator(&self) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        if self.use_colors {
            println!("{}", style("─".repeat(60)).dim());
        } else {
            println!("{}", "-".repeat(60));
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn emit(&self, level: Level, message: &str) {
        let line = match self.mode {
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "message",
                    "level": level.json_name(),
                    "message": message,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }));
                return;
            }
            OutputMode::Plain => format!("{}: {}", level.plain_prefix(), message),
            OutputMode::Human => self.human_line(level, message),
        };

        if level.to_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn human_line(&self, level: Level, message: &str) -> String {
        if !self.use_colors {
            return match level {
                Level::Success => format!("✓ {}", message),
                Level::Error => format!("✗ {}", message),
                Level::Suggestion => format!("Suggestion: {}", message),
                Level::Operation => format!("> {}", message),
                Level::Debug => format!("  DEBUG: {}", message),
            };
        }

        match level {
            Level::Success => format!("{}{}", CHECKMARK, style(message).green().bold()),
            Level::Error => format!("{}{}", CROSS, style(message).red().bold()),
            Level::Suggestion => format!("{}{}", HINT, style(message).cyan()),
            Level::Operation => format!("{}{}", ROCKET, style(message).bold()),
            Level::Debug => format!("  {}", style(message).dim()),
        }
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &GenerationReport) {
        self.print_separator();
        self.success("Help text generated");

        for topic in &report.topics {
            let lines = if self.use_colors {
                style(topic.lines).cyan().bold().to_string()
            } else {
                topic.lines.to_string()
            };
            println!("  {:<24} {} lines", topic.macro_name, lines);
        }
        println!("  Output:      {}", report.output_path.display());
        println!("  Bytes:       {}", report.bytes_written);
        println!("  Time taken:  {}", format_duration(report.duration));

        self.print_separator();
    }

    fn print_plain_report(&self, report: &GenerationReport) {
        println!("COMPLETED: Help text generation");
        for topic in &report.topics {
            println!("Topic: {} ({} lines)", topic.macro_name, topic.lines);
        }
        println!("Output: {}", report.output_path.display());
        println!("Bytes written: {}", report.bytes_written);
        println!("Duration: {}", format_duration(report.duration));
    }
}
