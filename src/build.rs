//! Corpus build orchestration.
//!
//! Coordinates file discovery, parallel parsing, failure reporting, and the
//! JSON index dump.
//!
//! # Architecture
//!
//! ```text
//! build_index()
//!     │
//!     ├── load_corpus() ──► collect_posts() ──► CorpusIndex::load_with()
//!     │                                              (rayon, progress bar)
//!     ├── report_failures() ──► (path, error) pairs to stderr
//!     │
//!     └── write_index() ──► index.json for the external renderer
//! ```
//!
//! # Exit Code Contract
//!
//! Per-file failures are warnings: the process still exits 0. Only a fatal
//! condition (empty input, unreadable root, or any failure under strict
//! mode) propagates an error out of here and turns into a non-zero exit.

use crate::{
    config::Config,
    corpus::{CorpusError, CorpusIndex, LoadReport, store},
    elog, log,
    logger::Progress,
};
use anyhow::{Context, Result, bail};
use std::{fs, io::BufWriter, path::PathBuf};

/// Build the corpus index and write it as JSON.
pub fn build_index(config: &'static Config) -> Result<()> {
    let report = load_corpus(config)?;
    report_failures(&report.failures);
    enforce_strict(config, &report.failures)?;

    write_index(&report.index, config)?;
    log!(
        "index";
        "wrote {} documents ({} categories) to {}",
        report.index.len(),
        report.index.categories().count(),
        config.index.output.display()
    );

    Ok(())
}

/// Parse-only validation pass; reports failures, writes nothing.
pub fn check_corpus(config: &'static Config) -> Result<()> {
    let report = load_corpus(config)?;
    report_failures(&report.failures);
    enforce_strict(config, &report.failures)?;

    log!(
        "check";
        "{} documents ok, {} failed",
        report.index.len(),
        report.failures.len()
    );

    Ok(())
}

/// Discover candidate files and parse them all in parallel.
///
/// Only discovery errors (`EmptyInput`) propagate; parse failures land in
/// the returned report.
fn load_corpus(config: &'static Config) -> Result<LoadReport> {
    let files = store::collect_posts(&config.content.dir, &config.content.extensions)?;
    log!("corpus"; "found {} candidate files", files.len());

    let progress = Progress::start("corpus", files.len());
    let report = CorpusIndex::load_with(files, || {
        if let Some(bar) = &progress {
            bar.inc();
        }
    });
    if let Some(bar) = progress {
        bar.finish();
    }

    Ok(report)
}

/// Dump every `(path, error)` pair to stderr.
fn report_failures(failures: &[(PathBuf, CorpusError)]) {
    use std::error::Error as _;

    for (_, error) in failures {
        // The variants already carry their path in the Display text
        match error.source() {
            Some(source) => elog!("error"; "{error}: {source}"),
            None => elog!("error"; "{error}"),
        }
    }
}

/// Under strict mode, any recorded failure fails the whole build.
fn enforce_strict(config: &Config, failures: &[(PathBuf, CorpusError)]) -> Result<()> {
    if config.content.strict && !failures.is_empty() {
        bail!("{} file(s) failed to parse in strict mode", failures.len());
    }
    Ok(())
}

/// Serialize the index to the configured output path.
fn write_index(index: &CorpusIndex, config: &Config) -> Result<()> {
    let output = &config.index.output;
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let file = fs::File::create(output)
        .with_context(|| format!("Failed to create index file: {}", output.display()))?;
    let writer = BufWriter::new(file);

    if config.index.pretty {
        serde_json::to_writer_pretty(writer, index)?;
    } else {
        serde_json::to_writer(writer, index)?;
    }

    Ok(())
}
