use crate::parser::error::*;
use crate::parser::expr::Sign;


/// One signed piece of an expression, still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Sign written before the term.
    pub sign: Sign,
    /// The term as written, without its sign.
    pub text: String,
    /// Character offset of `text` in the input.
    pub position: usize,
}


/// Scans an expression left to right and yields its signed terms.
///
/// Three shapes are recognised, in this order: a parenthesized group `(...)`,
/// a dice group `NdS` (count optional) and a bare integer. Each may be preceded by
/// `+` or `-` and whitespace. Anything else between terms is skipped.
#[derive(Debug)]
pub(crate) struct Splitter {
    input: Vec<char>,
    position: usize,
}

impl Splitter {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn next_term(&mut self) -> Option<Term> {
        while self.position < self.input.len() {
            let start = self.position;

            if let Some(term) = self.term_at(start) {
                return Some(term);
            }

            self.position = start + 1;
        }

        None
    }

    fn term_at(&mut self, start: usize) -> Option<Term> {
        let mut cursor = start;

        let sign = match self.input[cursor] {
            '-' => {
                cursor += 1;
                Sign::Minus
            }
            '+' => {
                cursor += 1;
                Sign::Plus
            }
            _ => Sign::Plus
        };

        cursor = self.skip_whitespace(cursor);

        let end = self.read_group(cursor)
            .or_else(|| self.read_dice(cursor))
            .or_else(|| self.read_number(cursor))?;

        self.position = end;
        Some(Term {
            sign,
            text: self.input[cursor..end].iter().collect(),
            position: cursor
        })
    }

    fn skip_whitespace(&self, mut cursor: usize) -> usize {
        while cursor < self.input.len() && self.input[cursor].is_whitespace() {
            cursor += 1;
        }
        cursor
    }

    fn read_digits(&self, mut cursor: usize) -> usize {
        while cursor < self.input.len() && self.input[cursor].is_ascii_digit() {
            cursor += 1;
        }
        cursor
    }

    /// `(` followed by at least one character and the next `)`.
    fn read_group(&self, cursor: usize) -> Option<usize> {
        if self.input.get(cursor) != Some(&'(') {
            return None;
        }

        let close = self.input[cursor + 1..]
            .iter()
            .position(|&ch| ch == ')')?;

        if close == 0 {
            return None;
        }

        Some(cursor + 1 + close + 1)
    }

    fn read_dice(&self, cursor: usize) -> Option<usize> {
        let after_count = self.read_digits(cursor);

        if !matches!(self.input.get(after_count), Some('d' | 'D')) {
            return None;
        }

        let after_sides = self.read_digits(after_count + 1);
        (after_sides > after_count + 1).then_some(after_sides)
    }

    fn read_number(&self, cursor: usize) -> Option<usize> {
        let end = self.read_digits(cursor);
        (end > cursor).then_some(end)
    }
}

impl Iterator for Splitter {
    type Item = Term;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_term()
    }
}


/// Splits an expression into its signed terms.
///
/// # Errors
/// - [`ParserError::Empty`] if the input is blank.
/// - [`ParserError::UnbalancedParenthesis`] if the `(` and `)` counts differ.
///
/// # Examples
/// ```
/// use dice_roller::{split_terms, Sign};
///
/// let terms = split_terms("2d6 + (4d8, drop lowest 1) - 3").unwrap();
/// let texts: Vec<&str> = terms.iter().map(|t| t.text.as_str()).collect();
///
/// assert_eq!(texts, ["2d6", "(4d8, drop lowest 1)", "3"]);
/// assert_eq!(terms[2].sign, Sign::Minus);
/// ```
pub fn split_terms(input: &str) -> Result<Vec<Term>> {
    let leading = leading_whitespace(input);
    let input = input.trim();

    if input.is_empty() {
        return Err(ParserError::Empty);
    }

    check_balance(input)?;
    Ok(Splitter::new(input)
        .map(|term| Term { position: term.position + leading, ..term })
        .collect())
}


/// Number of whitespace characters `trim` removes from the front of `input`.
pub(crate) fn leading_whitespace(input: &str) -> usize {
    input.chars().take_while(|ch| ch.is_whitespace()).count()
}


/// Fails when the input does not have as many `(` as `)`.
pub(crate) fn check_balance(input: &str) -> Result<()> {
    let open = input.chars().filter(|&ch| ch == '(').count();
    let close = input.chars().filter(|&ch| ch == ')').count();

    if open != close {
        return Err(ParserError::UnbalancedParenthesis { open, close });
    }

    Ok(())
}
