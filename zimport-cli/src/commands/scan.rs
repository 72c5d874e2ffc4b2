//! Scan command implementation - list reciprocal records as JSON lines

use anyhow::{Result, Context};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use zimport_core::{BlasterParser, Organism, ReciprocalRecord, ScanOptions};

use crate::config::Config;
use crate::error::CliError;

/// One output line per reciprocal record.
#[derive(Debug, Serialize)]
struct ScanLine<'a> {
    identifier: String,
    locus: String,
    #[serde(flatten)]
    record: &'a ReciprocalRecord,
}

pub fn execute(config: &Config, report: PathBuf, organism: String, options: ScanOptions) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let namespace = &config.wiki.loci_namespace;
    let count = write_records(&mut out, report, organism, namespace, options)?;
    out.flush()?;
    log::info!("Listed {} reciprocal records", count);
    Ok(())
}

/// Accepts either a binomial name or a root page path.
fn parse_organism(organism: &str) -> Result<Organism, CliError> {
    let organism = if organism.split_whitespace().count() > 1 {
        Organism::new(organism.trim())?
    } else {
        Organism::from_page_path(organism)?
    };
    Ok(organism)
}

fn write_records<W: Write>(
    out: &mut W,
    report: PathBuf,
    organism: String,
    namespace: &str,
    options: ScanOptions,
) -> Result<usize> {
    if !report.exists() {
        return Err(CliError::file_not_found(report).into());
    }

    let organism = parse_organism(&organism)?;
    log::debug!("Scanning {} as {} ({})", report.display(), organism.name, organism.initials);

    let mut count = 0;
    for record in BlasterParser::iter_file(&report, &organism.initials, options)? {
        let record = record.with_context(|| format!("Failed to scan {}", report.display()))?;
        let line = ScanLine {
            identifier: record.identifier(),
            locus: record.locus_reference(&organism, namespace),
            record: &record,
        };
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
        count += 1;
    }

    Ok(count)
}
