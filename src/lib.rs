//! Dice expression engine.
//!
//! Expressions are sums of signed terms: integers, dice groups such as `2d6` and
//! parenthesized groups with modifiers such as `(4d8, drop lowest 1, minimum value 2)`.
//! Evaluating one yields a total and a readable breakdown of every roll.
//!
//! ```
//! use dice_roller::{evaluate, ScriptedRolls};
//!
//! let outcome = evaluate("(4d8, drop lowest 1) + 3", &mut ScriptedRolls::new([2, 7, 4, 8])).unwrap();
//! assert_eq!(outcome.total, 22);
//! ```

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]


#[cfg(test)]
mod roll_test_strategies;

mod error;
mod random;
mod roll;
mod parser;
mod engine;
mod session;
pub mod config;

pub use error::{Error, ErrorKind};
pub use random::{RandomSource, RngSource, ScriptedRolls};
pub use roll::{DiceGroup, DiceGroupBuilder, DiceLimits, Modifier, RollResult};
pub use parser::{
    ParserError, Parser,
    Term, Sign, Expr, TermKind, ParsedTerm,
    TermOutcome, RollOutcome, HistoryEntry,
    split_terms, parse_to_expr
};
pub use engine::{Engine, evaluate};
pub use session::{Session, SessionRoll, ClearCallback};
pub use crate::config::Settings;
