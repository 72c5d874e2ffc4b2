//! Organism names, initials and page-name sanitization
//!
//! Wiki pages are named after the organism they belong to. The organism is
//! read from the root page path (`Lineus_ruber.txt` → `Lineus ruber`) and its
//! initials (`Lrub`) prefix every gene page identifier.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("Page path has no file name: {0}")]
    EmptyPageName(PathBuf),
    #[error("Organism name needs at least two words (genus and species), got: {0:?}")]
    MissingSpeciesWord(String),
}

/// Replace path separators so the string can be used as a page name.
pub fn sanitize(name: &str) -> String {
    name.replace('/', "-")
}

/// The path of a page without its extension (`Root/Lineus_ruber.txt` → `Root/Lineus_ruber`).
pub fn page_root<P: AsRef<Path>>(page: P) -> PathBuf {
    page.as_ref().with_extension("")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organism {
    pub name: String,
    pub initials: String,
}

impl Organism {
    /// Build from a binomial name such as `Lineus ruber`.
    pub fn new<S: Into<String>>(name: S) -> Result<Self, NamingError> {
        let name = name.into();
        let initials = initials(&name)?;
        Ok(Self { name, initials })
    }

    /// Derive the organism from a root page path: the basename without its
    /// extension, with underscores read as spaces.
    pub fn from_page_path<P: AsRef<Path>>(page: P) -> Result<Self, NamingError> {
        let page = page.as_ref();
        let stem = page
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| NamingError::EmptyPageName(page.to_path_buf()))?;
        Self::new(stem.replace('_', " "))
    }
}

/// First letter of the genus followed by the first three letters of the species.
fn initials(name: &str) -> Result<String, NamingError> {
    let mut words = name.split_whitespace();
    let (genus, species) = match (words.next(), words.next()) {
        (Some(genus), Some(species)) => (genus, species),
        _ => return Err(NamingError::MissingSpeciesWord(name.to_string())),
    };

    let mut initials: String = genus.chars().take(1).collect();
    initials.extend(species.chars().take(3));
    Ok(initials)
}
