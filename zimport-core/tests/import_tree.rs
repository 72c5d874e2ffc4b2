use chrono::{FixedOffset, TimeZone};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zimport_core::{
    import_records, BlasterParser, Organism, PageStyle, ScanOptions, WikiLayout, ZimPageSink,
};

const REPORT: &str = "\
Lrub_5432 | frame: +1 | candidates: Six3-6, Optix

Six3/6    sp|Q62233|SIX3_MOUSE   3e-61   229  <<
Optix     sp|Q95ZW3|OPTIX_DROME  1e-58   221

Optix     sp|Q95ZW3|OPTIX_DROME  2e-40   160  <<


Lrub_118 | frame: -2 | candidates: Pax6

Pax6      sp|P26367|PAX6_HUMAN   4e-12    70


Lrub_77/2 | frame: +3 | candidates: Otx

Otx       sp|P80206|OTX_DROME    1e-31   131  <<


Lrub_9000 | frame: +1 | candidates: Tbx

Tbx       sp|Q00000|TBX_MOUSE    1e-10    60  <<
";

fn write_report(dir: &Path, name: &str, gzip: bool) -> std::path::PathBuf {
    let path = dir.join(name);
    if gzip {
        let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(REPORT.as_bytes()).unwrap();
        encoder.finish().unwrap();
    } else {
        fs::write(&path, REPORT).unwrap();
    }
    path
}

fn import(report: &Path, root_page: &Path, options: ScanOptions) -> (WikiLayout, zimport_core::ImportSummary) {
    let organism = Organism::from_page_path(root_page).expect("organism from page name");
    let style = PageStyle::default();
    let layout = WikiLayout::prepare(root_page, &style).expect("prepare wiki tree");
    let created = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
    let mut sink = ZimPageSink::new(layout.clone(), organism.clone(), style).with_created(created);

    let records = BlasterParser::iter_file(report, &organism.initials, options).expect("open report");
    let summary = import_records(records, &mut sink).expect("import records");
    (layout, summary)
}

#[test]
fn import_writes_one_page_per_reciprocal_record() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), "blaster.txt", false);
    let (layout, summary) = import(&report, &dir.path().join("Lineus_ruber.txt"), ScanOptions::default());

    assert_eq!(summary.emitted, 2);
    assert_eq!(summary.written, 2);

    let mut pages: Vec<String> = fs::read_dir(&layout.genes_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    pages.sort();
    assert_eq!(pages, vec!["Lrub_Otx.txt", "Lrub_Six3-6_Optix.txt"]);

    let page = fs::read_to_string(layout.gene_page_path("Lrub_Six3-6_Optix")).unwrap();
    assert!(page.contains("====== Lrub Six3-6 Optix ======"));
    assert!(page.contains("Created Monday 15 January 2024"));
    assert!(page.contains("[[Lineus ruber:Loci:Lrub_5432]]"));
    assert!(page.contains("===== Reciprocal BLASTs ====="));
    assert!(page.contains("Six3/6    sp|Q62233|SIX3_MOUSE   3e-61   229  <<\n"));
    assert!(page.contains(
        "'''\nLrub_5432 | frame: +1 | candidates: Six3-6, Optix\nLrub_5432 | frame: +1 | candidates: Six3-6, Optix\n\nSix3/6"
    ));
    assert!(!page.contains("Lrub_118"));

    let otx = fs::read_to_string(layout.gene_page_path("Lrub_Otx")).unwrap();
    assert!(otx.contains("[[Lineus ruber:Loci:Lrub_77-2]]"));

    let index = fs::read_to_string(&layout.genes_index).unwrap();
    assert!(index.starts_with("Content-Type: text/x-zim-wiki\n"));
}

#[test]
fn import_reads_gzipped_reports() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), "blaster.txt.gz", true);
    let (_, summary) = import(&report, &dir.path().join("Lineus_ruber.txt"), ScanOptions::default());
    assert_eq!(summary.written, 2);
}

#[test]
fn import_flushes_trailing_record_when_asked() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), "blaster.txt", false);
    let options = ScanOptions { flush_trailing: true, ..ScanOptions::default() };
    let (layout, summary) = import(&report, &dir.path().join("Lineus_ruber.txt"), options);

    assert_eq!(summary.written, 3);
    assert!(layout.gene_page_path("Lrub_Tbx").exists());
}

#[test]
fn reimport_leaves_existing_pages_untouched() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), "blaster.txt", false);
    let root_page = dir.path().join("Lineus_ruber.txt");

    let (layout, _) = import(&report, &root_page, ScanOptions::default());
    let page_path = layout.gene_page_path("Lrub_Otx");
    fs::write(&page_path, "edited by hand\n").unwrap();

    let (_, summary) = import(&report, &root_page, ScanOptions::default());
    assert_eq!(summary.written, 0);
    assert_eq!(summary.skipped, 2);
    assert_eq!(fs::read_to_string(&page_path).unwrap(), "edited by hand\n");
}

#[test]
fn missing_report_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = BlasterParser::iter_file(dir.path().join("missing.txt"), "Lrub", ScanOptions::default());
    assert!(result.is_err());
}
