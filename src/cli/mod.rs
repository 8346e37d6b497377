//! # CLI Module
//!
//! Command-line interface for the media deduplicator.
//!
//! ## Usage
//! ```bash
//! # Scan the roots listed in the config file
//! media-dedup scan --config ./config.json
//!
//! # Add roots on the command line
//! media-dedup scan --config ./config.json ~/Pictures/phone
//!
//! # Write CSV instead of JSON
//! media-dedup scan --format csv --output report.csv
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use media_dedup::config::Config;
use media_dedup::core::pipeline::{PipelineBuilder, PipelineResult};
use media_dedup::core::probe::{FfmpegProbe, MediaProbe};
use media_dedup::core::reporter::{write_report, ExportFormat};
use media_dedup::error::Result;
use media_dedup::events::{Event, EventChannel, FingerprintEvent, PipelineEvent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Media Dedup - find duplicate and similar photos and videos
#[derive(Parser, Debug)]
#[command(name = "media-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the configured directories and write a report
    Scan {
        /// Configuration file
        #[arg(short, long, default_value = "./config.json")]
        config: PathBuf,

        /// Extra directories to scan, after the configured ones
        paths: Vec<PathBuf>,

        /// Report file (overrides the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, default_value = "json")]
        format: Format,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// JSON, the shape report viewers read
    Json,
    /// One row per file, for spreadsheets
    Csv,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Csv => ExportFormat::Csv,
        }
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            config,
            paths,
            output,
            format,
            verbose,
        } => run_scan(&config, paths, output, format.into(), verbose),
    }
}

fn run_scan(
    config_path: &Path,
    extra_roots: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: ExportFormat,
    verbose: bool,
) -> Result<()> {
    media_dedup::init_tracing(verbose);
    let term = Term::stderr();

    term.write_line(&format!(
        "{} {}",
        style("Media Dedup").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line("").ok();

    let mut config = Config::load(config_path)?;
    config.search.extend(extra_roots);
    if let Some(output) = output {
        config.output = output;
    }

    // Without the probe no video can be fingerprinted; stop before walking
    let probe = FfmpegProbe::new(config.ffmpeg.clone());
    probe.check_available()?;

    let pipeline = PipelineBuilder::from_config(&config)
        .probe(Arc::new(probe))
        .build();

    let (sender, receiver) = EventChannel::new();

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {pos} done {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(120));

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    progress_clone.set_prefix(phase.to_string());
                }
                Event::Fingerprint(FingerprintEvent::Progress {
                    completed,
                    dispatched,
                    path,
                }) => {
                    progress_clone.set_position(completed as u64);
                    if verbose {
                        progress_clone.set_message(format!(
                            "of {} ({})",
                            dispatched,
                            path.file_name().unwrap_or_default().to_string_lossy()
                        ));
                    } else {
                        progress_clone.set_message(format!("of {}", dispatched));
                    }
                }
                Event::Fingerprint(FingerprintEvent::Failed { path, .. }) if verbose => {
                    progress_clone.println(format!(
                        "  {} {}",
                        style("!").red(),
                        display_path(&path)
                    ));
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    progress_clone.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    progress.finish_and_clear();

    let result = result?;
    write_report(&result.report, &config.output, format)?;

    print_pretty_results(&term, &result, &config.output, verbose);
    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, output: &Path, verbose: bool) {
    let summary = &result.summary;

    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} photos and {} videos in {} directories ({}) in {:.1}s",
        style(summary.walk.photos).cyan(),
        style(summary.walk.videos).cyan(),
        summary.walk.directories,
        format_bytes(summary.walk.total_bytes),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate clusters, {} similar clusters, {} other files",
        style(summary.duplicate_clusters).yellow(),
        style(summary.similar_clusters).yellow(),
        summary.other
    ))
    .ok();
    if summary.walk.skipped > 0 {
        term.write_line(&format!(
            "  {} files skipped (unsupported type)",
            style(summary.walk.skipped).dim()
        ))
        .ok();
    }
    term.write_line("").ok();

    if !result.report.duplicate.is_empty() {
        term.write_line(&format!("{}", style("Duplicates:").bold().underlined()))
            .ok();
        for entry in &result.report.duplicate {
            term.write_line(&format!(
                "  {} [{}x{}] {}",
                style("Compare:").bold(),
                entry.compare.width,
                entry.compare.height,
                display_path(Path::new(&entry.compare.path))
            ))
            .ok();
            for path in &entry.withs {
                term.write_line(&format!(
                    "    {} {}",
                    style("=").green(),
                    display_path(Path::new(path))
                ))
                .ok();
            }
        }
        term.write_line("").ok();
    }

    if !result.report.similar.is_empty() {
        term.write_line(&format!("{}", style("Similar:").bold().underlined()))
            .ok();
        for entry in &result.report.similar {
            term.write_line(&format!(
                "  {} [{}x{}] {}",
                style("Compare:").bold(),
                entry.compare.width,
                entry.compare.height,
                display_path(Path::new(&entry.compare.path))
            ))
            .ok();
            for member in &entry.with {
                term.write_line(&format!(
                    "    {} [{}x{}] {} {}",
                    style("~").yellow(),
                    member.width,
                    member.height,
                    display_path(Path::new(&member.path)),
                    style(format!("(distance {})", member.distance)).dim()
                ))
                .ok();
            }
        }
        term.write_line("").ok();
    }

    if verbose && !result.report.other.is_empty() {
        term.write_line(&format!("{}", style("Other:").bold().underlined()))
            .ok();
        for entry in &result.report.other {
            term.write_line(&format!("    {}", display_path(Path::new(&entry.path))))
                .ok();
        }
        term.write_line("").ok();
    }

    term.write_line(&format!(
        "  Report written to {}",
        style(display_path(output)).cyan()
    ))
    .ok();

    if !result.failures.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{} {} files could not be fingerprinted:",
            style("!").red().bold(),
            result.failures.len()
        ))
        .ok();
        for failure in &result.failures {
            term.write_line(&format!(
                "    {} {}",
                style(display_path(&failure.path)).red(),
                style(&failure.error).dim()
            ))
            .ok();
        }
    }
}

/// Show paths under the home directory as `~/...`
fn display_path(path: &Path) -> String {
    let home = dirs::home_dir().unwrap_or_default();
    match path.strip_prefix(&home) {
        Ok(relative) if !home.as_os_str().is_empty() => format!("~/{}", relative.display()),
        _ => path.display().to_string(),
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
