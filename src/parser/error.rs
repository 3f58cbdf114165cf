use crate::error::ErrorKind;


/// Why an expression failed to parse.
///
/// Converted into the coarser [`crate::Error`] at the public boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParserError {
    /// Wraps another error with the character offset of the term that caused it.
    #[error("At position {0} - {1}")]
    AtPosition(usize, Box<ParserError>),

    /// The input is blank.
    #[error("Input string is empty")]
    Empty,

    /// The counts of `(` and `)` differ.
    #[error("Mismatched parentheses: {open} opening, {close} closing")]
    UnbalancedParenthesis {
        /// Number of `(`.
        open: usize,
        /// Number of `)`.
        close: usize
    },

    /// A term that is neither an integer, `NdS` nor a parenthesized group.
    #[error("Unrecognized term: {0}")]
    UnrecognizedTerm(String),

    /// A parenthesized group whose first segment is not `NdS`.
    #[error("Invalid dice expression: {0}")]
    DiceSpecifier(String),

    /// A modifier phrase that is not recognized.
    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    /// A modifier without a valid non-negative integer value.
    #[error("Modifier '{0}' needs a numeric value")]
    ModifierOperand(String),

    /// A number that does not fit in `u32`.
    #[error("Number is too large: {0}")]
    NumberTooLarge(String),

    /// Dice count is zero or above the limit.
    #[error("Dice count must be between 1 and {max}, got {count}")]
    DiceCount {
        /// Count as written.
        count: u32,
        /// Largest accepted count.
        max: u16
    },

    /// Number of sides is zero or above the limit.
    #[error("Dice sides must be between 1 and {max}, got {sides}")]
    DiceSides {
        /// Sides as written.
        sides: u32,
        /// Largest accepted number of sides.
        max: u16
    },
}

impl ParserError {
    /// The underlying error, without its position.
    pub fn err(&self) -> &Self {
        match self {
            ParserError::AtPosition(_, err) => err.as_ref(),
            other => other
        }
    }

    /// The position of the error, if known.
    pub fn pos(&self) -> Option<&usize> {
        match self {
            ParserError::AtPosition(position, _) => Some(position),
            _ => None
        }
    }

    /// Attaches `position` unless the error already has one.
    pub fn at_pos(self, position: usize) -> Self {
        match self {
            ParserError::AtPosition(_, _) => self,
            other => ParserError::AtPosition(position, Box::new(other))
        }
    }

    /// Which of the three user-facing failure classes this cause belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self.err() {
            ParserError::Empty => ErrorKind::Empty,

            ParserError::ModifierOperand(_)
            | ParserError::NumberTooLarge(_)
            | ParserError::DiceCount { .. }
            | ParserError::DiceSides { .. } => ErrorKind::OutOfRange,

            _ => ErrorKind::Malformed
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;
