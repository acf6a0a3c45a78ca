//! Error handling for the pairdist CLI

use pairdist_core::AlignError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pairdist CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid selection: {message}")]
    Selection { message: String },

    #[error("Input error: {message}")]
    Input { message: String },

    #[error("Alignment error: {message}")]
    Alignment { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn selection<S: Into<String>>(message: S) -> Self {
        Self::Selection { message: message.into() }
    }

    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input { message: message.into() }
    }

    pub fn alignment<S: Into<String>>(message: S) -> Self {
        Self::Alignment { message: message.into() }
    }
}

impl From<AlignError> for CliError {
    fn from(err: AlignError) -> Self {
        match err {
            AlignError::InvalidConfig(message) => Self::config(message),
            AlignError::IndexOutOfRange { .. } => Self::selection(err.to_string()),
            AlignError::EmptyInput(_) | AlignError::Parse(_) | AlignError::Io(_) => {
                Self::input(err.to_string())
            }
            other => Self::alignment(other.to_string()),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Parse a `ROW,COL` cell selection.
pub fn parse_selection(value: &str) -> CliResult<(usize, usize)> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| CliError::selection(format!("expected ROW,COL, got '{}'", value)))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| CliError::selection(format!("'{}' is not an index: {}", part.trim(), e)))
    };
    Ok((parse(row)?, parse(column)?))
}

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::Selection { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Rows and columns are zero-based indices into the loaded sequences\n\
                 • Raise --limit to load more sequences from the file",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your pairdist.toml configuration file\n\
                 • Use 'pairdist --example-config' to generate a sample configuration",
            );
        }

        CliError::Input { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Ensure the input is a non-empty FASTA or FASTQ file",
            );
        }

        CliError::Alignment { .. } => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
