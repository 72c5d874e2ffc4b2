//! Zim desktop wiki pages
//!
//! Zim stores every page as a plain text file with a small header. The import
//! tree for one organism looks like:
//!
//! ```text
//! Lineus_ruber.txt          root page (not touched)
//! Lineus_ruber/
//!     Genes.txt             index page, rewritten on every import
//!     Genes/
//!         Lrub_Pax6.txt     one page per reciprocal record
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local};

use crate::naming::{page_root, Organism};
use crate::types::{ReciprocalRecord, LOCI_NAMESPACE};

pub const CONTENT_TYPE: &str = "text/x-zim-wiki";
pub const WIKI_FORMAT: &str = "zim 0.4";
pub const PAGE_EXTENSION: &str = "txt";

/// Header written at the top of every page.
#[derive(Debug, Clone)]
pub struct PageHeader {
    pub title: String,
    pub created: DateTime<FixedOffset>,
}

impl PageHeader {
    /// Header stamped with the current local time.
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self::with_created(title, Local::now().fixed_offset())
    }

    pub fn with_created<S: Into<String>>(title: S, created: DateTime<FixedOffset>) -> Self {
        Self { title: title.into(), created }
    }

    pub fn render(&self) -> String {
        format!(
            "Content-Type: {}\nWiki-Format: {}\nCreation-Date: {}\n\n====== {} ======\nCreated {}\n\n",
            CONTENT_TYPE,
            WIKI_FORMAT,
            self.created.to_rfc3339(),
            self.title,
            self.created.format("%A %d %B %Y"),
        )
    }
}

/// Section titles and names used when rendering pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStyle {
    pub genes_page: String,
    /// Namespace of the locus pages linked from each gene page.
    pub loci_namespace: String,
    pub section_title: String,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            genes_page: "Genes".to_string(),
            loci_namespace: LOCI_NAMESPACE.to_string(),
            section_title: "Reciprocal BLASTs".to_string(),
        }
    }
}

/// Page body for one reciprocal record.
pub struct GenePage<'a> {
    pub record: &'a ReciprocalRecord,
    pub organism: &'a Organism,
    pub style: &'a PageStyle,
}

impl<'a> GenePage<'a> {
    pub fn new(record: &'a ReciprocalRecord, organism: &'a Organism, style: &'a PageStyle) -> Self {
        Self { record, organism, style }
    }

    pub fn render(&self, header: &PageHeader) -> String {
        let mut page = header.render();
        page.push_str(&self.record.locus_link(self.organism, &self.style.loci_namespace));
        page.push_str("\n\n");
        page.push_str(&format!("===== {} =====\n", self.style.section_title));
        page.push_str("\n'''\n");
        page.push_str(&self.record.raw_text);
        if !self.record.raw_text.is_empty() && !self.record.raw_text.ends_with('\n') {
            page.push('\n');
        }
        page.push_str("'''\n");
        page
    }
}

/// Directory layout of the imported tree for one root page.
#[derive(Debug, Clone)]
pub struct WikiLayout {
    pub root: PathBuf,
    pub genes_index: PathBuf,
    pub genes_dir: PathBuf,
}

impl WikiLayout {
    pub fn new<P: AsRef<Path>>(root_page: P, style: &PageStyle) -> Self {
        let root = page_root(root_page);
        let genes_index = root.join(format!("{}.{}", style.genes_page, PAGE_EXTENSION));
        let genes_dir = root.join(&style.genes_page);
        Self { root, genes_index, genes_dir }
    }

    /// Create the directories and (re)write the genes index page.
    pub fn prepare(root_page: &Path, style: &PageStyle) -> Result<Self> {
        let layout = Self::new(root_page, style);

        fs::create_dir_all(&layout.root)
            .with_context(|| format!("Failed to create directory: {}", layout.root.display()))?;

        let header = PageHeader::new(style.genes_page.clone());
        fs::write(&layout.genes_index, header.render())
            .with_context(|| format!("Failed to write page: {}", layout.genes_index.display()))?;

        fs::create_dir_all(&layout.genes_dir)
            .with_context(|| format!("Failed to create directory: {}", layout.genes_dir.display()))?;

        log::debug!("Prepared wiki tree under {}", layout.root.display());
        Ok(layout)
    }

    /// Path of the page for a given identifier.
    pub fn gene_page_path(&self, identifier: &str) -> PathBuf {
        self.genes_dir.join(format!("{}.{}", identifier, PAGE_EXTENSION))
    }
}
