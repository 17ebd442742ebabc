//! The scrub command: read a notebook, repair its text fields and write it back.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use nbscrub_core::{merge_config, Notebook, SanitizeReport, Sanitizer, ScrubConfig};

use crate::ui::output_format;
use crate::utils::atomic_write::write_atomic;

/// Options for a single scrub run.
#[derive(Debug, Clone)]
pub struct ScrubOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub check: bool,
    pub json: bool,
    pub quiet: bool,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubOutcome {
    pub report: SanitizeReport,
    /// False for `--check` runs.
    pub written: bool,
}

/// Status lines go to stdout unless the run is quiet or reporting JSON.
struct Status {
    enabled: bool,
    color: bool,
}

impl Status {
    fn new(opts: &ScrubOptions) -> Self {
        Self {
            enabled: !opts.quiet && !opts.json,
            color: io::stdout().is_terminal(),
        }
    }

    fn info(&self, msg: impl AsRef<str>) {
        if self.enabled {
            let _ = output_format::print_info_message(&mut io::stdout(), msg.as_ref(), self.color);
        }
    }

    fn success(&self, msg: impl AsRef<str>) {
        if self.enabled {
            let _ = output_format::print_success_message(&mut io::stdout(), msg.as_ref(), self.color);
        }
    }

    fn warn(&self, msg: impl AsRef<str>) {
        if self.enabled {
            let _ = output_format::print_warn_message(&mut io::stdout(), msg.as_ref(), self.color);
        }
    }
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Loads the embedded defaults and merges the user file over them, if any.
pub fn load_config(path: Option<&PathBuf>) -> Result<ScrubConfig> {
    let defaults = ScrubConfig::load_default()?;
    let user = match path {
        Some(path) => Some(ScrubConfig::load_from_file(path)?),
        None => None,
    };
    let merged = merge_config(defaults, user);
    merged.validate()?;
    Ok(merged)
}

/// The main operation runner for the nbscrub CLI.
///
/// The whole notebook is read and cleaned in memory before anything is
/// written, so INPUT and OUTPUT may be the same file.
pub fn run_scrub(opts: &ScrubOptions) -> Result<ScrubOutcome> {
    info!("Starting scrub operation.");
    let status = Status::new(opts);

    let config = load_config(opts.config.as_ref())?;

    status.info(format!("Reading notebook: {}", opts.input.display()));
    let bytes = fs::read(&opts.input)
        .with_context(|| format!("Failed to read input file: {}", opts.input.display()))?;

    let mut notebook = Notebook::from_bytes(&bytes)
        .with_context(|| format!("Failed to parse notebook: {}", opts.input.display()))?;
    status.info(format!("Cleaning {} cells...", notebook.cell_count()));

    let sanitizer = Sanitizer::from_config(&config)?;
    let report = sanitizer.sanitize(&mut notebook);
    let text = notebook
        .to_json_string(config.write_options())
        .context("Failed to serialize the cleaned notebook")?;
    debug!("Report: {:?}", report);

    if report.replaced_on_read > 0 {
        status.warn(format!(
            "Replaced {} undecodable sequence(s) while reading.",
            report.replaced_on_read
        ));
    }

    let written = if opts.check {
        if report.has_changes() {
            status.info(format!(
                "{} string(s) would change ({} character(s) removed).",
                report.strings_changed, report.characters_removed
            ));
        } else {
            status.success("Notebook is already clean.");
        }
        false
    } else {
        status.info(format!("Writing cleaned notebook: {}", opts.output.display()));
        write_atomic(&opts.output, text.as_bytes())?;
        status.success("Notebook cleaned successfully!");
        true
    };

    if opts.json {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        serde_json::to_writer_pretty(&mut writer, &report)
            .context("Failed to write JSON report")?;
        writeln!(writer)?;
    }

    info!("Scrub operation completed.");
    Ok(ScrubOutcome {
        report,
        written,
    })
}
