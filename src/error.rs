use crate::parser::ParserError;


/// The three failure classes an expression can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Blank input.
    Empty,
    /// Structural problem: parentheses, term shape, dice specifier, modifier text.
    Malformed,
    /// A numeric bound was violated or a number could not be read.
    OutOfRange,
}


/// Error returned when an expression cannot be evaluated.
///
/// Nothing is produced and no caller state is touched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The expression was blank after trimming.
    #[error("Please enter a dice expression")]
    Empty,

    /// The expression has a structural problem the user has to fix.
    #[error("Malformed expression: {0}")]
    Malformed(String),

    /// A dice bound or modifier value is out of range.
    #[error("Out of range: {0}")]
    OutOfRange(String),
}

impl Error {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Empty => ErrorKind::Empty,
            Error::Malformed(_) => ErrorKind::Malformed,
            Error::OutOfRange(_) => ErrorKind::OutOfRange
        }
    }
}

impl From<ParserError> for Error {
    fn from(value: ParserError) -> Self {
        match value.kind() {
            ErrorKind::Empty => Error::Empty,
            ErrorKind::Malformed => Error::Malformed(value.to_string()),
            ErrorKind::OutOfRange => Error::OutOfRange(value.to_string())
        }
    }
}
