//! zimport Core Library
//!
//! Reciprocal BLAST report segmentation, organism naming and Zim wiki pages.

pub mod types;
pub mod naming;
pub mod io;
#[cfg(feature = "io-blaster")] pub mod sink;
pub mod zim;

// Re-export commonly used types and functions
pub use types::{GeneNames, ReciprocalRecord, LOCI_NAMESPACE, RECIPROCAL_MARKER};
pub use naming::{sanitize, NamingError, Organism};
#[cfg(feature = "io-blaster")]
pub use io::{BlasterError, BlasterParser, BlasterSegmenter, ScanOptions, ScanStats};
#[cfg(feature = "io-blaster")]
pub use sink::{import_records, ImportSummary, MemorySink, RecordSink, SinkError, SinkOutcome, ZimPageSink};
pub use zim::{GenePage, PageHeader, PageStyle, WikiLayout};

/// Version information for the zimport core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
