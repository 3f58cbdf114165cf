mod error;
mod splitter;
mod term;
mod expr;
mod parse;

#[cfg(test)]
pub(crate) mod str_test_strategies;

pub use error::ParserError;
pub use splitter::{Term, split_terms};
pub use expr::{Expr, Sign, TermKind, ParsedTerm, TermOutcome, RollOutcome, HistoryEntry};
pub use parse::{Parser, parse_to_expr};
