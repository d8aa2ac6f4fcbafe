//! Error types for the logging facade

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A level specification segment could not be parsed
    #[error("invalid logging specification '{spec}': bad segment '{segment}'")]
    InvalidSpec { spec: String, segment: String },

    /// Unknown argument to the `%{color}` template directive
    #[error("invalid color option: {0}")]
    InvalidColorOption(String),

    /// Bad printf-style argument on a template directive
    #[error("invalid format argument '{argument}' for %{{{verb}}}")]
    InvalidFormatVerb { verb: String, argument: String },

    /// Unknown template directive
    #[error("invalid format directive: %{{{0}}}")]
    UnknownDirective(String),

    /// Unrecognized severity name
    #[error("invalid log level: '{0}'")]
    UnknownLevel(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LoggerError {
    /// Create a bad segment error for a level specification
    pub fn invalid_spec(spec: impl Into<String>, segment: impl Into<String>) -> Self {
        LoggerError::InvalidSpec {
            spec: spec.into(),
            segment: segment.into(),
        }
    }

    /// Create an invalid color option error
    pub fn color_option(option: impl Into<String>) -> Self {
        LoggerError::InvalidColorOption(option.into())
    }

    /// Create an invalid directive argument error
    pub fn format_verb(verb: impl Into<String>, argument: impl Into<String>) -> Self {
        LoggerError::InvalidFormatVerb {
            verb: verb.into(),
            argument: argument.into(),
        }
    }

    /// Whether this error came from the level specification parser
    pub fn is_spec_error(&self) -> bool {
        matches!(self, LoggerError::InvalidSpec { .. })
    }

    /// Whether this error came from format validation
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidColorOption(_)
                | LoggerError::InvalidFormatVerb { .. }
                | LoggerError::UnknownDirective(_)
        )
    }
}
