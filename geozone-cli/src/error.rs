//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use geozone::config::ConfigFileError;
use geozone::repository::RepositoryError;
use geozone::service::{RefreshError, ServiceError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Zone source could not be created or read
    Repository(RepositoryError),
    /// Zones could not be loaded
    Refresh(RefreshError),
    /// Serviceability check failed
    Check(ServiceError),
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Failed to read standard input
    Stdin(std::io::Error),
    /// A batch worker thread panicked
    Worker(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Refresh(RefreshError::Repository(RepositoryError::Unavailable(_)))
            | CliError::Refresh(RefreshError::Timeout(_)) => {
                eprintln!();
                eprintln!("Check the [source] section of your config:");
                eprintln!("  geozone config show");
                eprintln!("Or point at a local file with --zones <file>.");
            }
            CliError::Refresh(RefreshError::Repository(RepositoryError::MalformedData(_)))
            | CliError::Repository(RepositoryError::MalformedData(_)) => {
                eprintln!();
                eprintln!("Run 'geozone validate <file>' to see which records were rejected.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }

    /// Process exit code: 2 for retryable failures, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Check(e) if e.is_retryable() => 2,
            CliError::Refresh(RefreshError::Timeout(_)) => 2,
            CliError::Refresh(RefreshError::Repository(RepositoryError::Unavailable(_))) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Repository(e) => write!(f, "Zone source error: {}", e),
            CliError::Refresh(e) => write!(f, "Failed to load zones: {}", e),
            CliError::Check(e) => write!(f, "Serviceability check failed: {}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path.display(), error)
            }
            CliError::Stdin(e) => write!(f, "Failed to read standard input: {}", e),
            CliError::Worker(msg) => write!(f, "Batch worker failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Repository(e) => Some(e),
            CliError::Refresh(e) => Some(e),
            CliError::Check(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::Stdin(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<RepositoryError> for CliError {
    fn from(e: RepositoryError) -> Self {
        CliError::Repository(e)
    }
}

impl From<RefreshError> for CliError {
    fn from(e: RefreshError) -> Self {
        CliError::Refresh(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Check(e)
    }
}
