//! CLI error types.

use std::fmt;

use admarkers::cuesheet::CueSheetError;

/// Errors that can occur while running a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// The cue sheet could not be loaded or validated.
    CueSheet(CueSheetError),

    /// An argument value is out of range.
    InvalidArgument(String),

    /// Installing the Ctrl-C handler failed.
    Signal(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::CueSheet(e) => {
                write!(f, "Cue sheet error: {}", e)
            }
            CliError::InvalidArgument(msg) => {
                write!(f, "Invalid argument: {}", msg)
            }
            CliError::Signal(msg) => {
                write!(f, "Failed to install signal handler: {}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::CueSheet(e) => Some(e),
            CliError::InvalidArgument(_) => None,
            CliError::Signal(_) => None,
        }
    }
}

impl From<CueSheetError> for CliError {
    fn from(e: CueSheetError) -> Self {
        CliError::CueSheet(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_argument_detail() {
        let err = CliError::InvalidArgument("duration must be positive".to_string());
        assert!(err.to_string().contains("duration must be positive"));
    }

    #[test]
    fn test_cue_sheet_errors_convert() {
        let parse_err = admarkers::cuesheet::parse("not json").unwrap_err();
        let err: CliError = parse_err.into();
        assert!(matches!(err, CliError::CueSheet(_)));
    }
}
