/// Broad failure category, used by callers that need to react differently to
/// "the source moved" versus "the network is down".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad command-line or form input.
    Usage,
    /// Network, HTTP or local file read failure.
    Fetch,
    /// An expected column, label or token set is no longer present.
    SchemaDrift,
    /// Rows existed but none survived cleaning.
    EmptyAfterCleaning,
    /// The wage page text could not be matched.
    WageText,
    /// Export or terminal failure.
    Io,
}

impl ErrorKind {
    fn default_exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage | ErrorKind::Io => 2,
            ErrorKind::EmptyAfterCleaning => 3,
            ErrorKind::Fetch => 4,
            ErrorKind::SchemaDrift | ErrorKind::WageText => 5,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.default_exit_code(),
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, message)
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fetch, message)
    }

    pub fn schema_drift(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaDrift, message)
    }

    pub fn empty_after_cleaning(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyAfterCleaning, message)
    }

    pub fn wage_text(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WageText, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    /// Override the process exit code (terminal failures use 4, like fetches).
    pub fn with_exit_code(mut self, exit_code: u8) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::usage("x").exit_code(), 2);
        assert_eq!(AppError::empty_after_cleaning("x").exit_code(), 3);
        assert_eq!(AppError::fetch("x").exit_code(), 4);
        assert_eq!(AppError::schema_drift("x").exit_code(), 5);
        assert_eq!(AppError::io("x").with_exit_code(4).exit_code(), 4);
    }
}
