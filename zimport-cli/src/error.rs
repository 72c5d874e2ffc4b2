//! Error handling for zimport CLI

use thiserror::Error;
use std::path::PathBuf;
use zimport_core::NamingError;

/// Main error type for zimport CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid organism name: {message}")]
    Organism { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn organism<S: Into<String>>(message: S) -> Self {
        Self::Organism { message: message.into() }
    }
}

impl From<NamingError> for CliError {
    fn from(err: NamingError) -> Self {
        Self::organism(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    // Add helpful suggestions based on error type
    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file\n\
                 • Compressed reports must end in .gz",
                path.display()
            ));
        }

        CliError::Organism { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Name the root page after the organism, e.g. Lineus_ruber.txt\n\
                 • Use underscores between genus and species in page names\n\
                 • Pass the full binomial name to --organism, e.g. 'Lineus ruber'"
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your zimport.toml configuration file\n\
                 • Use 'zimport config' to generate a sample configuration\n\
                 • Verify that all configuration values are valid"
            );
        }
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("blaster.txt"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_naming_error_conversion() {
        let err: CliError = NamingError::MissingSpeciesWord("Genes".to_string()).into();
        assert!(matches!(err, CliError::Organism { .. }));
        assert!(format_error_with_suggestions(&err).contains("Lineus_ruber.txt"));
    }
}
