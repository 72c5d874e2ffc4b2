//! Report input for zimport
//!
//! BLAST reports are read line by line. Gzip-compressed reports are
//! decompressed transparently when their name ends in `.gz`.

#[cfg(feature = "io-blaster")] pub mod blaster;

#[cfg(feature = "io-blaster")]
pub use blaster::{
    BlasterError, BlasterParser, BlasterSegmenter, ScanOptions, ScanPhase, ScanStats, ScannerState,
    Transition,
};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use flate2::read::GzDecoder;

/// Whether a path names a gzip-compressed report.
pub fn is_gzipped<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Open a report for line-oriented reading.
pub fn open_report<P: AsRef<Path>>(path: P) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(&path)?;

    if is_gzipped(&path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped("report.txt.gz"));
        assert!(is_gzipped("report.GZ"));
        assert!(!is_gzipped("report.txt"));
        assert!(!is_gzipped("report"));
    }

    #[test]
    fn test_open_plain_report() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "locA").unwrap();
        writeln!(file, "foo <<").unwrap();

        let lines: Vec<String> = open_report(file.path()).unwrap().lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["locA", "foo <<"]);
    }

    #[test]
    fn test_open_gzipped_report() {
        let file = tempfile::Builder::new().suffix(".txt.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(file.as_file(), Compression::default());
        encoder.write_all(b"locA\nfoo <<\n").unwrap();
        encoder.finish().unwrap();

        let lines: Vec<String> = open_report(file.path()).unwrap().lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["locA", "foo <<"]);
    }

    #[test]
    fn test_missing_report() {
        assert!(open_report("/nonexistent/report.txt").is_err());
    }
}
