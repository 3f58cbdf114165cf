use std::fmt::Display;
use crate::random::RandomSource;
use crate::roll::{DiceGroup, RollResult};


/// Sign in front of a term. A term without one is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Sign {
    /// `+`
    Plus,
    /// `-`
    Minus,
}

impl Sign {
    /// Applies the sign to `value`.
    pub fn apply(&self, value: i64) -> i64 {
        match self {
            Sign::Plus => value,
            Sign::Minus => value.saturating_neg()
        }
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-")
        }
    }
}


/// What a term turned out to be once parsed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TermKind {
    /// An integer.
    Literal(u32),
    /// A dice group, bare or parenthesized.
    Dice(DiceGroup),
}

impl TermKind {
    /// Evaluates the term without its sign. `text` is what a literal shows in the trace.
    pub fn evaluate<R: RandomSource + ?Sized>(&self, text: &str, rng: &mut R) -> RollResult {
        match self {
            TermKind::Literal(value) => RollResult::literal(i64::from(*value), text),
            TermKind::Dice(group) => group.roll(rng)
        }
    }

    /// Lowest and highest unsigned values of the term.
    pub fn possible_values(&self) -> (i64, i64) {
        match self {
            TermKind::Literal(value) => (i64::from(*value), i64::from(*value)),
            TermKind::Dice(group) => (group.min(), group.max())
        }
    }
}


/// A term of an [`Expr`]: its sign, the text it was parsed from, and what it is.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParsedTerm {
    /// Sign written before the term.
    pub sign: Sign,
    /// The term as written, without its sign.
    pub text: String,
    /// What the term parsed into.
    pub kind: TermKind,
}


/// A fully parsed expression: every term is known to be valid, no dice rolled yet.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Expr {
    source: String,
    terms: Vec<ParsedTerm>,
}

impl Expr {
    /// Creates an expression from already parsed terms.
    pub fn new(source: impl Into<String>, terms: Vec<ParsedTerm>) -> Self {
        Self { source: source.into(), terms }
    }

    /// The trimmed input the expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The terms, in input order.
    pub fn terms(&self) -> &[ParsedTerm] {
        &self.terms
    }

    /// Rolls every dice term in order and sums the signed values.
    ///
    /// Term traces are joined with ` + ` / ` - `; a negative first term is written `- `.
    pub fn evaluate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> RollOutcome {
        let mut total: i64 = 0;
        let mut breakdown = String::new();
        let mut terms = Vec::with_capacity(self.terms.len());

        for (i, term) in self.terms.iter().enumerate() {
            let result = term.kind.evaluate(term.text.trim(), rng);
            total = total.saturating_add(term.sign.apply(result.value));

            match (i, term.sign) {
                (0, Sign::Plus) => {},
                (0, Sign::Minus) => breakdown.push_str("- "),
                (_, sign) => breakdown.push_str(&format!(" {sign} "))
            }
            breakdown.push_str(&result.render());

            terms.push(TermOutcome {
                sign: term.sign,
                text: term.text.clone(),
                result
            });
        }

        RollOutcome {
            expression: self.source.clone(),
            total,
            breakdown,
            terms
        }
    }

    /// Lowest and highest totals the expression can produce.
    pub fn possible_values(&self) -> (i64, i64) {
        self.terms.iter().fold((0, 0), |(min, max), term| {
            let (low, high) = term.kind.possible_values();
            match term.sign {
                Sign::Plus => (min.saturating_add(low), max.saturating_add(high)),
                Sign::Minus => (min.saturating_sub(high), max.saturating_sub(low))
            }
        })
    }
}

impl Display for Expr {
    /// Writes the terms back in canonical form, e.g. `2d6 + (4d8, drop lowest 1) - 3`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            match (i, term.sign) {
                (0, Sign::Plus) => {},
                (0, Sign::Minus) => write!(f, "-")?,
                (_, sign) => write!(f, " {sign} ")?
            }

            match &term.kind {
                TermKind::Literal(value) => write!(f, "{value}")?,
                TermKind::Dice(group) => write!(f, "{group}")?
            }
        }

        Ok(())
    }
}


/// One evaluated term of a [`RollOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TermOutcome {
    /// Sign written before the term.
    pub sign: Sign,
    /// The term as written, without its sign.
    pub text: String,
    /// Unsigned value, surviving dice and trace.
    pub result: RollResult,
}

impl TermOutcome {
    /// The value with the sign applied.
    pub fn signed_value(&self) -> i64 {
        self.sign.apply(self.result.value)
    }
}


/// A caller-side record of a successful roll.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    /// The trimmed expression.
    pub expression: String,
    /// Total it rolled.
    pub total: i64,
}


/// The result of evaluating a whole expression.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RollOutcome {
    /// The trimmed expression.
    pub expression: String,
    /// Sum of every signed term.
    pub total: i64,
    /// Term traces joined with ` + ` / ` - `.
    pub breakdown: String,
    /// Every term in input order.
    pub terms: Vec<TermOutcome>,
}

impl RollOutcome {
    /// The record a caller keeps in its roll history.
    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            expression: self.expression.clone(),
            total: self.total
        }
    }

    /// The full block shown to a user after a roll.
    ///
    /// # Examples
    /// ```
    /// use dice_roller::{evaluate, ScriptedRolls};
    ///
    /// let outcome = evaluate("2d6 + 1", &mut ScriptedRolls::new([3, 5])).unwrap();
    /// assert_eq!(
    ///     outcome.report(),
    ///     "Rolling: 2d6 + 1\n\nGrand Total: 9\n\nBreakdown:\n2d6 (3, 5) = 8 + 1"
    /// );
    /// ```
    pub fn report(&self) -> String {
        format!(
            "Rolling: {}\n\nGrand Total: {}\n\nBreakdown:\n{}",
            self.expression, self.total, self.breakdown
        )
    }
}
