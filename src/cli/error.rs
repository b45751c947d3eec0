//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::xlsx::WorkbookError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("{0} subtotal discrepancies found")]
    Discrepancies(usize),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Discrepancies(_) => exitcode::FAILURE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Workbook { source, .. } => workbook_exit_code(source),
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn workbook_exit_code(e: &WorkbookError) -> i32 {
    match e {
        WorkbookError::Io(io) => io_exit_code(io),
        _ => exitcode::DATAERR,
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Domain(_) => exitcode::DATAERR,
        ApplicationError::Config { .. } => exitcode::CONFIG,
        ApplicationError::Export { .. } => exitcode::SOFTWARE,
        ApplicationError::OperationFailed { source, .. } => source
            .downcast_ref::<std::io::Error>()
            .map(io_exit_code)
            .unwrap_or(exitcode::SOFTWARE),
    }
}

fn io_exit_code(e: &std::io::Error) -> i32 {
    match e.kind() {
        std::io::ErrorKind::NotFound => exitcode::NOINPUT,
        std::io::ErrorKind::InvalidData => exitcode::DATAERR,
        std::io::ErrorKind::PermissionDenied => exitcode::CANTCREAT,
        _ => exitcode::IOERR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_missing_input_when_mapping_exit_code_then_returns_noinput() {
        let err: CliError = ApplicationError::OperationFailed {
            context: "read tree: missing.json".to_string(),
            source: Box::new(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        }
        .into();

        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_invalid_tree_when_mapping_exit_code_then_returns_dataerr() {
        let err: CliError = ApplicationError::from(DomainError::InvalidTree {
            message: "missing field `value`".to_string(),
        })
        .into();

        assert_eq!(err.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn given_config_error_when_mapping_exit_code_then_returns_config() {
        let err: CliError = ApplicationError::Config {
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }
}
