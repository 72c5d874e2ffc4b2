//! Reciprocal BLAST report segmenter
//!
//! A BLASTer report is a loosely structured text dump: one record per query
//! contig, records separated by two consecutive blank lines, and hits confirmed
//! as mutual best hits flagged by a standalone `<<` token. The first token of a
//! record's first line is the contig id and the first token of every flagged
//! line is a gene name.
//!
//! The segmenter is a single forward scan with no lookahead. Records are only
//! known to be complete when the line *after* the closing blank lines arrives,
//! so a record is emitted while reading the first line of the next one.

use std::io::{BufRead, Cursor};
use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{GeneNames, ReciprocalRecord, RECIPROCAL_MARKER};
use super::open_report;

/// Number of consecutive blank lines that closes a record.
pub const BOUNDARY_BLANK_RUN: usize = 2;

#[derive(Debug, Error)]
pub enum BlasterError {
    #[error("IO error reading line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Token flagging a reciprocal hit. Matched against whole tokens only.
    pub marker: String,
    /// Emit a reciprocal record still pending when the input ends.
    pub flush_trailing: bool,
    /// Store the first line of the report once. By default it is stored twice,
    /// as the bootstrap and again by the regular append, matching earlier imports.
    pub dedupe_first_line: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            marker: RECIPROCAL_MARKER.to_string(),
            flush_trailing: false,
            dedupe_first_line: false,
        }
    }
}

/// Where the scanner is relative to record boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// No line read yet.
    Start,
    /// Inside a record; `blank_run` consecutive blank lines seen so far.
    Accumulating { blank_run: usize },
    /// Two blank lines closed the record; the next line decides its fate.
    BoundaryPending,
}

/// What a line does to the scanner, decided before the line is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First line of the input opens the first record.
    Bootstrap,
    /// Line belongs to the record in progress.
    Append,
    /// Blank line after a closed reciprocal record: dropped, boundary stays pending.
    SkipBlank,
    /// Closed reciprocal record is emitted and the line opens the next one.
    Emit,
    /// Closed non-reciprocal record is dropped and the line opens the next one.
    Discard,
}

/// Counters over one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub lines: usize,
    /// Boundaries reached while the record in progress was reciprocal.
    pub reciprocal_boundaries: usize,
    pub emitted: usize,
    pub discarded: usize,
}

#[derive(Debug, Default)]
struct RecordInProgress {
    raw: String,
    contig_id: String,
    gene_names: GeneNames,
    reciprocal: bool,
}

impl RecordInProgress {
    fn open(line: &str, tokens: &[&str]) -> Self {
        Self {
            raw: line.to_string(),
            contig_id: tokens.first().map(|t| t.to_string()).unwrap_or_default(),
            gene_names: GeneNames::new(),
            reciprocal: false,
        }
    }
}

/// The whole mutable state of one scan, advanced one line at a time.
#[derive(Debug)]
pub struct ScannerState {
    phase: ScanPhase,
    record: RecordInProgress,
    initials: String,
    options: ScanOptions,
    stats: ScanStats,
}

impl ScannerState {
    pub fn new<S: Into<String>>(organism_initials: S, options: ScanOptions) -> Self {
        Self {
            phase: ScanPhase::Start,
            record: RecordInProgress::default(),
            initials: organism_initials.into(),
            options,
            stats: ScanStats::default(),
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Whether the record in progress has seen the marker.
    pub fn is_reciprocal(&self) -> bool {
        self.record.reciprocal
    }

    pub fn contig_id(&self) -> &str {
        &self.record.contig_id
    }

    pub fn gene_names(&self) -> &GeneNames {
        &self.record.gene_names
    }

    /// Text buffered for the record in progress.
    pub fn pending_text(&self) -> &str {
        &self.record.raw
    }

    /// The transition a line with the given blankness would take.
    pub fn transition(&self, blank: bool) -> Transition {
        match self.phase {
            ScanPhase::Start => Transition::Bootstrap,
            ScanPhase::Accumulating { .. } => Transition::Append,
            ScanPhase::BoundaryPending if self.record.reciprocal => {
                if blank {
                    Transition::SkipBlank
                } else {
                    Transition::Emit
                }
            }
            ScanPhase::BoundaryPending => Transition::Discard,
        }
    }

    /// Feed one line (with or without its terminator). Returns the record
    /// closed by this line, if any.
    pub fn step(&mut self, line: &str) -> Option<ReciprocalRecord> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let blank = tokens.is_empty();
        self.stats.lines += 1;

        let transition = self.transition(blank);
        let mut emitted = None;
        match transition {
            Transition::Bootstrap => {
                self.record = RecordInProgress::open(line, &tokens);
                if !self.options.dedupe_first_line {
                    self.record.raw.push_str(line);
                }
            }
            Transition::Append => {
                self.record.raw.push_str(line);
            }
            Transition::SkipBlank => {
                log::trace!("Skipping blank line after record {}", self.record.contig_id);
                return None;
            }
            Transition::Emit => {
                self.stats.emitted += 1;
                let closed = std::mem::replace(&mut self.record, RecordInProgress::open(line, &tokens));
                emitted = Some(self.finish(closed));
            }
            Transition::Discard => {
                self.stats.discarded += 1;
                log::trace!("Discarding non-reciprocal record {}", self.record.contig_id);
                self.record = RecordInProgress::open(line, &tokens);
            }
        }

        self.track_blank_run(blank);

        if tokens.iter().any(|t| *t == self.options.marker) {
            self.record.reciprocal = true;
            self.record.gene_names.insert(tokens[0]);
        }

        emitted
    }

    /// Called once the input is exhausted. Only yields a record when trailing
    /// flushing is enabled and the record in progress is reciprocal.
    pub fn finish_input(&mut self) -> Option<ReciprocalRecord> {
        if !self.record.reciprocal {
            return None;
        }
        if !self.options.flush_trailing {
            log::debug!(
                "Trailing record {} was never closed and is not emitted",
                self.record.contig_id
            );
            return None;
        }
        self.stats.emitted += 1;
        let closed = std::mem::take(&mut self.record);
        Some(self.finish(closed))
    }

    fn track_blank_run(&mut self, blank: bool) {
        let previous = match self.phase {
            ScanPhase::Start => 0,
            ScanPhase::Accumulating { blank_run } => blank_run,
            ScanPhase::BoundaryPending => BOUNDARY_BLANK_RUN,
        };
        let blank_run = if blank { previous + 1 } else { 0 };
        self.phase = if blank_run == BOUNDARY_BLANK_RUN {
            if self.record.reciprocal {
                self.stats.reciprocal_boundaries += 1;
            }
            ScanPhase::BoundaryPending
        } else {
            ScanPhase::Accumulating { blank_run }
        };
    }

    fn finish(&self, closed: RecordInProgress) -> ReciprocalRecord {
        let record = ReciprocalRecord {
            organism_initials: self.initials.clone(),
            gene_names: closed.gene_names,
            contig_id: closed.contig_id,
            raw_text: closed.raw,
        };
        log::debug!("Reciprocal record {} ({})", record.identifier(), record.contig_id);
        record
    }
}

/// Lazy, single-pass sequence of reciprocal records read from a report.
pub struct BlasterSegmenter<R: BufRead> {
    reader: R,
    line_buffer: String,
    state: ScannerState,
    done: bool,
}

impl<R: BufRead> BlasterSegmenter<R> {
    pub fn new<S: Into<String>>(reader: R, organism_initials: S) -> Self {
        Self::with_options(reader, organism_initials, ScanOptions::default())
    }

    pub fn with_options<S: Into<String>>(reader: R, organism_initials: S, options: ScanOptions) -> Self {
        Self {
            reader,
            line_buffer: String::new(),
            state: ScannerState::new(organism_initials, options),
            done: false,
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.state.stats()
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }
}

impl<R: BufRead> Iterator for BlasterSegmenter<R> {
    type Item = Result<ReciprocalRecord, BlasterError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            self.line_buffer.clear();

            match self.reader.read_line(&mut self.line_buffer) {
                Ok(0) => {
                    self.done = true;
                    return self.state.finish_input().map(Ok);
                }
                Ok(_) => {
                    if let Some(record) = self.state.step(&self.line_buffer) {
                        return Some(Ok(record));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(BlasterError::Io {
                        line: self.state.stats().lines + 1,
                        source: e,
                    }));
                }
            }
        }
    }
}

/// Convenience entry points mirroring the other line parsers.
pub struct BlasterParser;

impl BlasterParser {
    /// Segment an in-memory report.
    pub fn scan_str<'a>(text: &'a str, organism_initials: &str) -> BlasterSegmenter<Cursor<&'a [u8]>> {
        BlasterSegmenter::new(Cursor::new(text.as_bytes()), organism_initials)
    }

    /// Collect every reciprocal record from any BufRead source.
    pub fn parse_reader<R: BufRead>(
        reader: R,
        organism_initials: &str,
        options: ScanOptions,
    ) -> Result<Vec<ReciprocalRecord>> {
        let segmenter = BlasterSegmenter::with_options(reader, organism_initials, options);
        let records = segmenter.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Collect every reciprocal record from a report file (`.gz` accepted).
    pub fn parse_file<P: AsRef<Path>>(
        path: P,
        organism_initials: &str,
        options: ScanOptions,
    ) -> Result<Vec<ReciprocalRecord>> {
        let segmenter = Self::iter_file(path, organism_initials, options)?;
        let records = segmenter.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Lazily segment a report file.
    pub fn iter_file<P: AsRef<Path>>(
        path: P,
        organism_initials: &str,
        options: ScanOptions,
    ) -> Result<BlasterSegmenter<Box<dyn BufRead>>> {
        let reader = open_report(&path)
            .with_context(|| format!("Failed to open BLAST report: {}", path.as_ref().display()))?;
        Ok(BlasterSegmenter::with_options(reader, organism_initials, options))
    }
}
