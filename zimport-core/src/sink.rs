//! Destinations for reciprocal records
//!
//! A sink persists each record at most once per identifier: the first record
//! computing an identifier wins and later ones are reported as
//! [`SinkOutcome::AlreadyExists`]. Duplicates are never errors.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::BlasterError;
use crate::naming::Organism;
use crate::types::ReciprocalRecord;
use crate::zim::{GenePage, PageHeader, PageStyle, WikiLayout};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write page {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read BLAST report: {0}")]
    Scan(#[from] BlasterError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkOutcome {
    Written,
    AlreadyExists,
}

pub trait RecordSink {
    /// Persist `record` unless its identifier is already present.
    fn accept(&mut self, record: &ReciprocalRecord) -> Result<SinkOutcome, SinkError>;
}

/// Keeps records in memory, keyed by identifier.
#[derive(Debug, Default)]
pub struct MemorySink {
    order: Vec<String>,
    records: HashMap<String, ReciprocalRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&ReciprocalRecord> {
        self.records.get(identifier)
    }

    /// Records in the order they were first accepted.
    pub fn records(&self) -> impl Iterator<Item = &ReciprocalRecord> {
        self.order.iter().filter_map(move |id| self.records.get(id))
    }
}

impl RecordSink for MemorySink {
    fn accept(&mut self, record: &ReciprocalRecord) -> Result<SinkOutcome, SinkError> {
        let identifier = record.identifier();
        if self.records.contains_key(&identifier) {
            return Ok(SinkOutcome::AlreadyExists);
        }
        self.order.push(identifier.clone());
        self.records.insert(identifier, record.clone());
        Ok(SinkOutcome::Written)
    }
}

/// Writes one Zim page per record into the genes directory of a wiki tree.
#[derive(Debug)]
pub struct ZimPageSink {
    layout: WikiLayout,
    organism: Organism,
    style: PageStyle,
    created: Option<DateTime<FixedOffset>>,
}

impl ZimPageSink {
    pub fn new(layout: WikiLayout, organism: Organism, style: PageStyle) -> Self {
        Self { layout, organism, style, created: None }
    }

    /// Stamp every page with a fixed creation time instead of the current time.
    pub fn with_created(mut self, created: DateTime<FixedOffset>) -> Self {
        self.created = Some(created);
        self
    }

    pub fn layout(&self) -> &WikiLayout {
        &self.layout
    }

    pub fn page_path(&self, record: &ReciprocalRecord) -> PathBuf {
        self.layout.gene_page_path(&record.identifier())
    }

    fn header(&self, title: String) -> PageHeader {
        match self.created {
            Some(created) => PageHeader::with_created(title, created),
            None => PageHeader::new(title),
        }
    }
}

impl RecordSink for ZimPageSink {
    fn accept(&mut self, record: &ReciprocalRecord) -> Result<SinkOutcome, SinkError> {
        let path = self.page_path(record);
        let header = self.header(record.title());
        let page = GenePage::new(record, &self.organism, &self.style).render(&header);

        let outcome = create_page(&path, |file| file.write_all(page.as_bytes()))?;
        match outcome {
            SinkOutcome::Written => log::trace!("Wrote {}", path.display()),
            SinkOutcome::AlreadyExists => log::debug!("Page already exists, skipping: {}", path.display()),
        }
        Ok(outcome)
    }
}

/// Create `path` and fill it with `write`. A page whose write fails is removed
/// again, so it is not mistaken for an existing page by the next import.
fn create_page<F>(path: &Path, write: F) -> Result<SinkOutcome, SinkError>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    // create_new makes the existence check and the creation one step.
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(SinkOutcome::AlreadyExists),
        Err(source) => return Err(SinkError::Write { path: path.to_path_buf(), source }),
    };

    if let Err(source) = write(&mut file) {
        drop(file);
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Failed to remove incomplete page {}: {}", path.display(), e);
        }
        return Err(SinkError::Write { path: path.to_path_buf(), source });
    }

    Ok(SinkOutcome::Written)
}

/// Outcome counts of one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub emitted: usize,
    pub written: usize,
    pub skipped: usize,
}

/// Drain a record sequence into a sink. Stops at the first read or write error.
pub fn import_records<I, S>(records: I, sink: &mut S) -> Result<ImportSummary, SinkError>
where
    I: IntoIterator<Item = Result<ReciprocalRecord, BlasterError>>,
    S: RecordSink + ?Sized,
{
    let mut summary = ImportSummary::default();

    for record in records {
        let record = record?;
        summary.emitted += 1;
        match sink.accept(&record)? {
            SinkOutcome::Written => summary.written += 1,
            SinkOutcome::AlreadyExists => summary.skipped += 1,
        }
    }

    Ok(summary)
}
