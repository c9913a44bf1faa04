use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid freshness pattern: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Template failure: {message}")]
    TemplateError { message: String },

    #[error("Spreadsheet error: {message}")]
    SpreadsheetError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Template,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LabelError {
    pub fn template(message: impl Into<String>) -> Self {
        LabelError::TemplateError {
            message: message.into(),
        }
    }

    pub fn spreadsheet(message: impl Into<String>) -> Self {
        LabelError::SpreadsheetError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LabelError::ConfigError { .. }
            | LabelError::ConfigValidationError { .. }
            | LabelError::InvalidConfigValueError { .. }
            | LabelError::MissingConfigError { .. }
            | LabelError::RegexError(_) => ErrorCategory::Configuration,
            LabelError::CsvError(_)
            | LabelError::ValidationError { .. }
            | LabelError::ProcessingError { .. } => ErrorCategory::Input,
            LabelError::TemplateError { .. } | LabelError::SpreadsheetError { .. } => {
                ErrorCategory::Template
            }
            LabelError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Template => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LabelError::RegexError(_) => {
                "Check the freshness pattern, e.g. ^[A-L](0[1-9]|[12][0-9]|3[01])[0-9]$"
            }
            LabelError::CsvError(_) => {
                "Check that the CSV file is UTF-8 and has the expected header row"
            }
            LabelError::TemplateError { .. } | LabelError::SpreadsheetError { .. } => {
                "Check that the template workbook exists, is a valid .xlsx and matches the block layout"
            }
            LabelError::MissingConfigError { .. }
            | LabelError::ConfigError { .. }
            | LabelError::ConfigValidationError { .. }
            | LabelError::InvalidConfigValueError { .. } => {
                "Review the configuration file or command line flags"
            }
            LabelError::ValidationError { .. } => {
                "Items must look like SKU:CODE or SKU:CODE:COPIES"
            }
            LabelError::ProcessingError { .. } => "Re-run with --verbose for details",
            LabelError::IoError(_) => "Check that the paths exist and are writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Template => {
                format!("The label document was not generated: {}", self)
            }
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LabelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_failures_are_high_severity() {
        let err = LabelError::template("merge A1:E2 rejected");
        assert_eq!(err.category(), ErrorCategory::Template);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("not generated"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = LabelError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
