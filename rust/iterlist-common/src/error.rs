use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    /// Returns `true` for errors that signal a broken storage precondition
    /// rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Fatal { .. })
    }

    pub fn invalid_format(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn value_out_of_range(value: u64, max: u64) -> Error {
        Error(ErrorKind::ValueOutOfRange { value, max }.into())
    }

    pub fn fatal(context: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::Fatal {
                context: context.into(),
                message: message.into(),
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("value {value} exceeds the largest storable value {max}")]
    ValueOutOfRange { value: u64, max: u64 },

    #[error("invalid packed format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("fatal error in '{context}': {message}")]
    Fatal { context: String, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
