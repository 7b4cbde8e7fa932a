use thiserror::Error;

/// Coarse classification of a [`BuildpackError`], preserved through context wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Parse,
    Verification,
    ExternalTool,
    Configuration,
    Network,
    Io,
}

#[derive(Error, Debug)]
pub enum BuildpackError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("unable to parse {what}: {reason}")]
    Parse { what: String, reason: String },

    #[error("unable to verify {what}: expected `{expected}`, found `{actual}`")]
    Verification {
        what: String,
        expected: String,
        actual: String,
    },

    #[error("`{command}` failed: {reason}")]
    ExternalTool { command: String, reason: String },

    #[error("{0}")]
    Configuration(String),

    #[error("network request failed: {0}")]
    Network(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BuildpackError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BuildpackError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn parse(what: impl Into<String>, reason: impl ToString) -> Self {
        BuildpackError::Parse {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildpackError::NotFound(_) => ErrorKind::NotFound,
            BuildpackError::Parse { .. } => ErrorKind::Parse,
            BuildpackError::Verification { .. } => ErrorKind::Verification,
            BuildpackError::ExternalTool { .. } => ErrorKind::ExternalTool,
            BuildpackError::Configuration(_) => ErrorKind::Configuration,
            BuildpackError::Network(_) => ErrorKind::Network,
            BuildpackError::Io { .. } => ErrorKind::Io,
        }
    }
}

pub type Result<T, E = BuildpackError> = std::result::Result<T, E>;

/// Recovers the [`ErrorKind`] of an error that went through `anyhow`
/// context wrapping
pub trait ErrorKindExt {
    fn kind(&self) -> Option<ErrorKind>;
}

impl ErrorKindExt for anyhow::Error {
    /// Kind of the outermost typed cause in the chain. A bare
    /// `std::io::Error` counts as [`ErrorKind::Io`].
    fn kind(&self) -> Option<ErrorKind> {
        self.chain().find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<BuildpackError>() {
                Some(e.kind())
            } else if cause.is::<std::io::Error>() {
                Some(ErrorKind::Io)
            } else {
                None
            }
        })
    }
}
