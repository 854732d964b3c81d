//! Manjari - Multilingual Transliteration Pipeline
//!
//! This is the main entry point for the Manjari batch tool, which
//! transliterates Devanagari source content into Indic and Roman target
//! scripts while preserving embedded metadata headers.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use manjari::cli::{Args, Commands};
use manjari::config::Config;
use manjari::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load manjari.toml from current directory first
            if std::path::Path::new("manjari.toml").exists() {
                info!("Found manjari.toml in current directory, loading...");
                Config::from_file("manjari.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Execute command
    match args.command {
        Commands::Batch {
            input_dir,
            target_langs,
            output_dir,
            do_splits,
            sentence_ends_only,
        } => {
            let mut config = config;
            config.pipeline.do_splits |= do_splits;
            config.pipeline.process_only_sentence_ends |= sentence_ends_only;

            let targets: Vec<String> = target_langs
                .split(',')
                .map(|lang| lang.trim().to_string())
                .filter(|lang| !lang.is_empty())
                .collect();

            let workflow = Workflow::new(config)?;
            let summary = workflow
                .process_directory(&input_dir, &targets, &output_dir)
                .await?;

            println!(
                "Processed {} files ({} failed), {} lines converted, {} split, {} warnings",
                summary.files_processed,
                summary.files_failed,
                summary.lines_translated,
                summary.lines_split,
                summary.warnings
            );
        }
        Commands::Translate {
            text,
            target_lang,
            do_splits,
        } => {
            let mut config = config;
            config.pipeline.do_splits |= do_splits;

            let workflow = Workflow::new(config)?;
            let out = workflow.translate_line(&text, &target_lang).await?;
            println!("{}", out);
        }
        Commands::Tweak { input_dir, lang } => {
            let workflow = Workflow::new(config)?;
            let summary = workflow.tweak_directory(&input_dir, &lang).await?;
            println!(
                "Tweaked {} files ({} failed)",
                summary.files_processed, summary.files_failed
            );
        }
        Commands::Rules { labels } => {
            let workflow = Workflow::new(config)?;
            match workflow.sandhi_table() {
                Some(table) => {
                    println!(
                        "{} rules loaded ({} malformed lines skipped)",
                        table.len(),
                        table.skipped_lines()
                    );
                    println!("Labels: {}", table.labels().join(", "));

                    if let Some(labels) = labels {
                        let selected: Vec<String> = labels
                            .split(',')
                            .map(|label| label.trim().to_string())
                            .collect();
                        let merged = table.rules_for_labels_ordered(&selected);
                        println!("\nMerged rules for {}:", selected.join(", "));
                        for (original, replacement) in merged {
                            println!("{} -> {}", original, replacement);
                        }
                    }
                }
                None => println!("No sandhi rule file configured."),
            }
        }
        Commands::Init { output } => {
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let manjari_dir = std::env::current_dir()?.join(".manjari");
    let log_dir = manjari_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "manjari.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber.try_init()?;

    Ok(())
}
