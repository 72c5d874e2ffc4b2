//! Configuration handling for zimport
//!
//! Supports loading configuration from zimport.toml files with CLI argument overrides.

use anyhow::{Result, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zimport_core::{PageStyle, ScanOptions, RECIPROCAL_MARKER};

use crate::error::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "zimport.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub wiki: WikiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Token marking reciprocal hits
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Emit a reciprocal record still open when the report ends
    #[serde(default)]
    pub flush_trailing: bool,

    /// Store the first line of the report once instead of twice
    #[serde(default)]
    pub dedupe_first_line: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Name of the genes index page and directory
    #[serde(default = "default_genes_page")]
    pub genes_page: String,

    /// Namespace of the locus pages linked from gene pages
    #[serde(default = "default_loci_namespace")]
    pub loci_namespace: String,

    /// Heading above the raw BLAST text on each gene page
    #[serde(default = "default_section_title")]
    pub section_title: String,
}

// Default value functions
fn default_marker() -> String { RECIPROCAL_MARKER.to_string() }
fn default_genes_page() -> String { PageStyle::default().genes_page }
fn default_loci_namespace() -> String { PageStyle::default().loci_namespace }
fn default_section_title() -> String { PageStyle::default().section_title }

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            flush_trailing: false,
            dedupe_first_line: false,
        }
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            genes_page: default_genes_page(),
            loci_namespace: default_loci_namespace(),
            section_title: default_section_title(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::config(format!(
                        "Configuration file does not exist: {}",
                        path.display()
                    ))
                    .into());
                }
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find zimport.toml in current directory
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default configuration")
    }

    fn validate(&self) -> Result<(), CliError> {
        let marker = &self.scan.marker;
        if marker.is_empty() || marker.split_whitespace().count() != 1 || marker.trim() != marker {
            return Err(CliError::config(format!(
                "scan.marker must be a single token without whitespace, got {:?}",
                marker
            )));
        }
        if self.wiki.genes_page.trim().is_empty() || self.wiki.genes_page.contains('/') {
            return Err(CliError::config(format!(
                "wiki.genes_page must be a plain page name, got {:?}",
                self.wiki.genes_page
            )));
        }
        let namespace = &self.wiki.loci_namespace;
        if namespace.trim().is_empty() || namespace.contains(':') || namespace.contains('/') {
            return Err(CliError::config(format!(
                "wiki.loci_namespace must be a plain page name, got {:?}",
                namespace
            )));
        }
        Ok(())
    }

    /// Scan options with command line flags taking precedence.
    pub fn scan_options(
        &self,
        flush_trailing: bool,
        dedupe_first_line: bool,
        marker: Option<String>,
    ) -> ScanOptions {
        ScanOptions {
            marker: marker.unwrap_or_else(|| self.scan.marker.clone()),
            flush_trailing: flush_trailing || self.scan.flush_trailing,
            dedupe_first_line: dedupe_first_line || self.scan.dedupe_first_line,
        }
    }

    pub fn page_style(&self) -> PageStyle {
        PageStyle {
            genes_page: self.wiki.genes_page.clone(),
            loci_namespace: self.wiki.loci_namespace.clone(),
            section_title: self.wiki.section_title.clone(),
        }
    }
}
