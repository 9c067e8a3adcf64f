//! Error types for `clickup_tools`.

/// Errors that can occur while talking to ClickUp or running a tool.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No API token is configured.
    #[error("ClickUp integration is not configured.")]
    NotConfigured,

    /// A tool argument is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// A date string could not be parsed.
    #[error(
        "Invalid date '{0}'. Use ISO 8601, e.g. \"2026-03-15\" or \"2026-03-15T14:30:00\"."
    )]
    InvalidDate(String),

    /// A consolidated tool received an action it does not know.
    #[error("Unknown action '{action}'. Use: {}.", .valid.join(", "))]
    UnknownAction {
        /// The action that was requested.
        action: String,
        /// The actions the tool accepts.
        valid: &'static [&'static str],
    },

    /// An HTTP verb outside GET/POST/PUT/DELETE was requested.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Failed to connect to ClickUp API: {0}")]
    Connection(String),

    /// ClickUp answered with a non-success status.
    #[error("ClickUp API error ({status}): {message}{}", format_code(.code.as_deref()))]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The remote error message (or raw body).
        message: String,
        /// The remote `ECODE`, if any.
        code: Option<String>,
    },

    /// A successful response lacked a field the operation depends on.
    #[error("ClickUp response is missing '{0}'")]
    MissingField(&'static str),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client or settings could not be set up.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_code(code: Option<&str>) -> String {
    code.filter(|c| !c.is_empty()).map(|c| format!(" (code: {c})")).unwrap_or_default()
}

/// The category an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The integration has no token.
    Configuration,
    /// Arguments were missing or malformed; detected before any I/O.
    Validation,
    /// The request did not reach ClickUp or timed out.
    Transport,
    /// ClickUp rejected the request.
    Remote,
    /// A consolidated tool got an unrecognized action.
    UnknownAction,
    /// Anything else (local decoding, file access, programming errors).
    Internal,
}

impl Error {
    /// Build a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build the standard "`<field>` is required." validation error.
    pub fn required(field: &str) -> Self {
        Self::Validation(format!("{field} is required."))
    }

    /// Build an unknown-action error listing the accepted actions.
    pub fn unknown_action(action: &str, valid: &'static [&'static str]) -> Self {
        Self::UnknownAction { action: action.to_string(), valid }
    }

    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured => ErrorKind::Configuration,
            Self::Validation(_) | Self::InvalidDate(_) => ErrorKind::Validation,
            Self::Connection(_) => ErrorKind::Transport,
            Self::Api { .. } => ErrorKind::Remote,
            Self::UnknownAction { .. } => ErrorKind::UnknownAction,
            Self::UnsupportedMethod(_)
            | Self::MissingField(_)
            | Self::Json(_)
            | Self::Yaml(_)
            | Self::Io(_)
            | Self::Config(_) => ErrorKind::Internal,
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    ///
    /// Nothing in this crate retries; hosts may use this to decide.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_with_code() {
        let err = Error::Api {
            status: 401,
            message: "Token invalid".to_string(),
            code: Some("OAUTH_025".to_string()),
        };
        assert_eq!(err.to_string(), "ClickUp API error (401): Token invalid (code: OAUTH_025)");
    }

    #[test]
    fn test_api_error_message_without_code() {
        let err = Error::Api { status: 404, message: "Not found".to_string(), code: None };
        assert_eq!(err.to_string(), "ClickUp API error (404): Not found");

        let err = Error::Api { status: 404, message: "Not found".to_string(), code: Some(String::new()) };
        assert_eq!(err.to_string(), "ClickUp API error (404): Not found");
    }

    #[test]
    fn test_unknown_action_lists_valid_actions() {
        let err = Error::unknown_action("bogus", &["start", "stop"]);
        assert_eq!(err.to_string(), "Unknown action 'bogus'. Use: start, stop.");
        assert_eq!(err.kind(), ErrorKind::UnknownAction);
    }

    #[test]
    fn test_required_message() {
        assert_eq!(Error::required("listId").to_string(), "listId is required.");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Error::NotConfigured.kind(), ErrorKind::Configuration);
        assert_eq!(Error::InvalidDate("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(Error::Connection("refused".into()).kind(), ErrorKind::Transport);
        assert_eq!(Error::MissingField("id").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_retryable() {
        assert!(Error::Connection("timeout".into()).is_retryable());
        assert!(Error::Api { status: 503, message: String::new(), code: None }.is_retryable());
        assert!(Error::Api { status: 429, message: String::new(), code: None }.is_retryable());
        assert!(!Error::Api { status: 401, message: String::new(), code: None }.is_retryable());
        assert!(!Error::required("name").is_retryable());
    }
}
