use crate::roll::DiceLimits;
use crate::parser::error::*;
use crate::parser::expr::{Expr, ParsedTerm};
use crate::parser::splitter::{check_balance, leading_whitespace, Splitter};
use crate::parser::term::parse_term;


/// Parser for dice expressions.
///
/// The input is split into signed terms and every term is parsed before any
/// dice are rolled, so a bad term anywhere fails the whole expression.
#[derive(Debug)]
pub struct Parser {
    source: String,
    splitter: Splitter,
    limits: DiceLimits,
    /// Whitespace trimmed from the front of the input, added back to term positions.
    offset: usize
}

impl Parser {
    /// Creates a new `Parser` for the given input.
    ///
    /// # Errors
    /// - [`ParserError::Empty`] if the input is blank.
    /// - [`ParserError::UnbalancedParenthesis`] if the `(` and `)` counts differ.
    ///
    /// # Examples
    /// ```
    /// use dice_roller::{DiceLimits, Parser, ParserError};
    ///
    /// assert!(Parser::new("1d6 + 3", DiceLimits::default()).is_ok());
    ///
    /// let err = Parser::new("  ", DiceLimits::default()).unwrap_err();
    /// assert!(matches!(err, ParserError::Empty));
    ///
    /// let err = Parser::new("(1d4", DiceLimits::default()).unwrap_err();
    /// assert!(matches!(err, ParserError::UnbalancedParenthesis { .. }));
    /// ```
    pub fn new(input: &str, limits: DiceLimits) -> Result<Self> {
        let source = input.trim();

        if source.is_empty() {
            return Err(ParserError::Empty);
        }

        check_balance(source)?;

        Ok(Self {
            source: source.to_string(),
            splitter: Splitter::new(source),
            limits,
            offset: leading_whitespace(input)
        })
    }

    /// Parses every term of the input into an [`Expr`].
    ///
    /// # Errors
    /// Returns the first term that fails to parse, wrapped in
    /// [`ParserError::AtPosition`] with the character offset of that term.
    ///
    /// # Examples
    /// ```
    /// use dice_roller::{DiceLimits, Parser, ParserError};
    ///
    /// let mut parser = Parser::new("-3 + (4d8, Drop Lowest 1)", DiceLimits::default()).unwrap();
    /// let expr = parser.parse().unwrap();
    /// assert_eq!(expr.to_string(), "-3 + (4d8, drop lowest 1)");
    ///
    /// let mut parser = Parser::new("2d6 + (2d6, explode 6)", DiceLimits::default()).unwrap();
    /// let err = parser.parse().unwrap_err();
    /// assert_eq!(err.pos(), Some(&6));
    /// assert!(matches!(err.err(), ParserError::UnknownModifier(_)));
    /// ```
    pub fn parse(&mut self) -> Result<Expr> {
        let mut terms = Vec::new();

        while let Some(term) = self.splitter.next_term() {
            let kind = parse_term(&term.text, &self.limits)
                .map_err(|err| err.at_pos(term.position + self.offset))?;

            terms.push(ParsedTerm {
                sign: term.sign,
                text: term.text,
                kind
            });
        }

        Ok(Expr::new(self.source.clone(), terms))
    }
}


/// Parses a dice expression into an [`Expr`] with the given limits.
/// Convenience wrapper around [`Parser::new`] and [`Parser::parse`].
///
/// # Errors
/// Any error of [`Parser::new`] or [`Parser::parse`].
///
/// # Examples
/// ```
/// use dice_roller::{parse_to_expr, DiceLimits};
///
/// let expr = parse_to_expr("2d20 + 5", &DiceLimits::default()).unwrap();
/// assert_eq!(expr.terms().len(), 2);
/// assert_eq!(expr.possible_values(), (7, 45));
/// ```
pub fn parse_to_expr(input: &str, limits: &DiceLimits) -> Result<Expr> {
    Parser::new(input, *limits)?.parse()
}
