//! Command-line interface module for mediatidy.
//!
//! This module handles:
//! - Argument parsing
//! - Configuration loading and the dependency preflight
//! - Running the organize pass, then the optional subtitle pass
//! - Printing phase summaries

use crate::config::{CompiledConfig, MediaTidyConfig};
use crate::organizer::{MediaOrganizer, OrganizeReport};
use crate::output::OutputFormatter;
use crate::probe::Prober;
use crate::prompt::Prompter;
use crate::subtitles::{RelocateReport, SubtitleMatcher};
use chrono::{DateTime, Local};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

/// Question asked between the organize pass and the subtitle pass.
pub const SUBTITLE_QUESTION: &str =
    "Do you want to move subtitle files that match the media files? (y/n): ";

/// Sort photos and videos into vertical and horizontal folders.
#[derive(Debug, Parser)]
#[command(name = "mediatidy", version, about)]
pub struct CliArgs {
    /// Directory to organize (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Configuration file to use instead of the default lookup
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Outcome of a complete run.
#[derive(Debug)]
pub struct RunSummary {
    pub started_at: DateTime<Local>,
    pub organized: OrganizeReport,
    /// `None` when the operator chose not to move subtitles.
    pub subtitles: Option<RelocateReport>,
}

/// Runs mediatidy on a directory with the external probe tools.
///
/// Configuration is loaded first, then every required tool is checked.
/// If a tool is missing the run stops before any directory is read.
///
/// # Examples
///
/// ```no_run
/// use mediatidy::cli::run_cli;
/// use mediatidy::prompt::ConsolePrompter;
/// use std::path::Path;
///
/// let mut prompter = ConsolePrompter::stdio();
/// match run_cli(Path::new("/path/to/photos"), None, &mut prompter) {
///     Ok(summary) => println!("Processed {} files", summary.organized.processed),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(
    dir_path: &Path,
    config_path: Option<&Path>,
    prompter: &mut dyn Prompter,
) -> Result<RunSummary, String> {
    let config = load_config(config_path)?;

    let tools = config.toolchain.preflight().map_err(|e| e.to_string())?;
    for tool in &tools {
        let location = tool
            .path
            .as_ref()
            .map(|p| format!(" ({})", p.display()))
            .unwrap_or_default();
        OutputFormatter::plain(&format!(
            "Using {} {}{}",
            tool.name,
            tool.version.as_deref().unwrap_or("(unknown version)"),
            location
        ));
    }

    let prober = config.toolchain.prober();
    run_with_prober(dir_path, &config, &prober, prompter)
}

/// Loads and validates configuration.
pub fn load_config(config_path: Option<&Path>) -> Result<CompiledConfig, String> {
    MediaTidyConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?
        .compile()
        .map_err(|e| format!("Error in configuration: {}", e))
}

/// Runs both passes with an already chosen prober.
///
/// 1. Resolves the directory to an absolute path
/// 2. Organizes media files into orientation folders
/// 3. Asks whether to move subtitles, and if so moves them next to their media
pub fn run_with_prober(
    dir_path: &Path,
    config: &CompiledConfig,
    prober: &dyn Prober,
    prompter: &mut dyn Prompter,
) -> Result<RunSummary, String> {
    let started_at = Local::now();

    let root = fs::canonicalize(dir_path)
        .map_err(|e| format!("Error reading directory {}: {}", dir_path.display(), e))?;
    if !root.is_dir() {
        return Err(format!("Not a directory: {}", dir_path.display()));
    }

    OutputFormatter::info(&format!("Processing directory: {}", root.display()));

    let organized = MediaOrganizer::new(&root, config, prober)
        .organize(prompter)
        .map_err(|e| e.to_string())?;

    OutputFormatter::summary(
        "Summary",
        &[
            ("Processed", organized.processed),
            ("Skipped", organized.skipped_count()),
        ],
    );

    let subtitles = if prompter.confirm(SUBTITLE_QUESTION) {
        let report = SubtitleMatcher::new(&root, config)
            .relocate(prompter)
            .map_err(|e| e.to_string())?;
        if report.moved + report.skipped_count() > 0 {
            OutputFormatter::summary(
                "Subtitle summary",
                &[("Moved", report.moved), ("Skipped", report.skipped_count())],
            );
        }
        Some(report)
    } else {
        OutputFormatter::plain("Subtitle file moving skipped.");
        None
    };

    let elapsed = Local::now().signed_duration_since(started_at);
    OutputFormatter::plain(&format!(
        "\nFinished in {:.1}s",
        elapsed.num_milliseconds() as f64 / 1000.0
    ));

    Ok(RunSummary {
        started_at,
        organized,
        subtitles,
    })
}
