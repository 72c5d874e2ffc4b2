//! Blaster command implementation - import a reciprocal BLAST report into Zim pages

use anyhow::{Result, Context};
use std::path::PathBuf;
use zimport_core::{import_records, BlasterParser, ImportSummary, Organism, ScanOptions, WikiLayout, ZimPageSink};

use crate::config::Config;
use crate::error::CliError;

pub fn execute(
    config: &Config,
    report: PathBuf,
    root_page: PathBuf,
    options: ScanOptions,
) -> Result<ImportSummary> {
    log::info!("Starting BLASTer import");
    log::info!("Report: {}", report.display());
    log::info!("Root page: {}", root_page.display());

    // Validate input file exists
    if !report.exists() {
        return Err(CliError::file_not_found(report).into());
    }

    let organism = Organism::from_page_path(&root_page).map_err(CliError::from)?;
    log::info!("Organism: {} ({})", organism.name, organism.initials);

    let style = config.page_style();
    let layout = WikiLayout::prepare(&root_page, &style)
        .context("Failed to prepare wiki tree")?;
    log::debug!("Gene pages go to {}", layout.genes_dir.display());

    let mut sink = ZimPageSink::new(layout, organism.clone(), style);
    let mut records = BlasterParser::iter_file(&report, &organism.initials, options)?;

    let summary = import_records(&mut records, &mut sink)
        .with_context(|| format!("Failed to import {}", report.display()))?;

    let stats = records.stats();
    log::info!(
        "Scanned {} lines: {} reciprocal records, {} non-reciprocal dropped",
        stats.lines, stats.emitted, stats.discarded
    );
    log::info!("Wrote {} pages, skipped {} existing", summary.written, summary.skipped);

    Ok(summary)
}
