use clap::Parser;
use helpgen::{
    logging, Cli, HelpGen, HelpGenError, OutputFormatter, OutputMode, UserFriendlyError,
};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();
    logging::init_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let helpgen = match HelpGen::from_cli(&cli) {
        Ok(helpgen) => helpgen,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    let (source_dir, output_file) = match cli.paths() {
        Ok(paths) => paths,
        Err(e) => {
            helpgen.handle_error(&e);
            return e.exit_code();
        }
    };

    if cli.dry_run {
        return handle_dry_run(&helpgen, source_dir, output_file, cli.quiet);
    }

    match helpgen.generate(source_dir, output_file).await {
        Ok(report) => {
            helpgen.output_formatter().print_generation_report(&report);
            0
        }
        Err(e) => {
            helpgen.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli.config_output_path();

    match HelpGen::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!(
                "  helpgen <source-dir> <output-file> --config {}",
                config_path.display()
            );
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(helpgen: &HelpGen, source_dir: &Path, output_file: &Path, quiet: bool) -> i32 {
    let formatter = helpgen.output_formatter();
    formatter.print_header("DRY RUN - nothing will be rendered or written");

    let config = helpgen.config();
    let documents = match helpgen.plan(source_dir) {
        Ok(documents) => documents,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return e.exit_code();
        }
    };

    if formatter.mode() != OutputMode::Json && !quiet {
        println!("Topics:");
        for (topic, document) in config.topics.iter().zip(&documents) {
            println!("  {:<24} <- {}", topic.macro_name, document.display());
        }
        println!("Renderer: {} -b {}", config.renderer.program, config.renderer.builder);
        println!("Dumper:   {} {}", config.dumper.program, config.dumper.args.join(" "));
        match config.renderer.templates_path {
            Some(ref dir) => println!("Layout:   {}", dir.display()),
            None => println!("Layout:   <bundled>"),
        }
        match config.output.scratch_dir {
            Some(ref dir) => println!("Scratch:  {}", dir.display()),
            None => println!("Scratch:  <temporary directory>"),
        }
        println!("Output:   {}", output_file.display());
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    0
}

fn print_startup_error(error: &HelpGenError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
