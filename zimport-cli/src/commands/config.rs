//! Config command implementation - print or write an example zimport.toml

use anyhow::{Result, Context};
use std::path::PathBuf;

use crate::config::Config;

pub fn execute(output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            if path.exists() {
                log::warn!("Overwriting existing configuration file: {}", path.display());
            }
            Config::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write example configuration to {}", path.display()))?;
            log::info!("Example configuration written to: {}", path.display());
        }
        None => {
            print!("{}", Config::example_toml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_example_config() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("zimport.toml");

        execute(Some(path.clone()))?;
        let loaded = Config::load(Some(&path))?;
        assert_eq!(loaded.scan.marker, "<<");
        Ok(())
    }
}
