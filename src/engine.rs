use crate::Error;
use crate::parser::{Expr, Parser, RollOutcome};
use crate::random::RandomSource;
use crate::roll::DiceLimits;


/// Evaluates dice expressions under a fixed [`DiceLimits`] policy.
///
/// The engine owns no mutable state: every call parses, rolls and returns
/// independently, and the random source is supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engine {
    limits: DiceLimits
}

impl Engine {
    /// Creates an engine that rejects dice outside `limits`.
    pub fn new(limits: DiceLimits) -> Self {
        Self { limits }
    }

    /// The limits in effect.
    pub fn limits(&self) -> &DiceLimits {
        &self.limits
    }

    /// Parses `expression` without rolling anything.
    ///
    /// # Errors
    /// See [`Engine::evaluate`].
    pub fn parse(&self, expression: &str) -> Result<Expr, Error> {
        let expr = Parser::new(expression, self.limits)?.parse()?;
        Ok(expr)
    }

    /// Parses and rolls `expression`, drawing every die from `rng`.
    ///
    /// The whole expression is parsed before the first die is rolled, so on error
    /// `rng` has not been used.
    ///
    /// # Errors
    /// - [`Error::Empty`] if the expression is blank.
    /// - [`Error::Malformed`] for unbalanced parentheses, an unknown modifier or a
    ///   parenthesized group that does not start with `NdS`.
    /// - [`Error::OutOfRange`] for dice outside the limits or a bad modifier value.
    ///
    /// # Examples
    /// ```
    /// use dice_roller::{Engine, DiceLimits, Error, ScriptedRolls};
    ///
    /// let engine = Engine::new(DiceLimits { max_count: 10, max_sides: 100 });
    ///
    /// let outcome = engine.evaluate("(4d8, drop lowest 1)", &mut ScriptedRolls::new([2, 7, 4, 8])).unwrap();
    /// assert_eq!(outcome.total, 19);
    ///
    /// let err = engine.evaluate("20d6", &mut ScriptedRolls::new([1])).unwrap_err();
    /// assert!(matches!(err, Error::OutOfRange(_)));
    /// ```
    pub fn evaluate<R: RandomSource + ?Sized>(&self, expression: &str, rng: &mut R) -> Result<RollOutcome, Error> {
        let expr = self.parse(expression)
            .inspect_err(|err| tracing::debug!(expression, %err, "rejected expression"))?;

        let outcome = expr.evaluate(rng);
        tracing::debug!(
            expression = outcome.expression.as_str(),
            terms = outcome.terms.len(),
            total = outcome.total,
            "evaluated expression"
        );

        Ok(outcome)
    }
}


/// Evaluates `expression` with the default [`DiceLimits`].
///
/// # Errors
/// See [`Engine::evaluate`].
///
/// # Examples
/// ```
/// use dice_roller::{evaluate, Error, ScriptedRolls};
///
/// let outcome = evaluate("2d6", &mut ScriptedRolls::new([3, 5])).unwrap();
/// assert_eq!(outcome.total, 8);
/// assert_eq!(outcome.breakdown, "2d6 (3, 5) = 8");
///
/// assert_eq!(evaluate("", &mut ScriptedRolls::new([])), Err(Error::Empty));
/// ```
pub fn evaluate<R: RandomSource + ?Sized>(expression: &str, rng: &mut R) -> Result<RollOutcome, Error> {
    Engine::default().evaluate(expression, rng)
}
