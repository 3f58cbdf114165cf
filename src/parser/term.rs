use std::str::FromStr;
use crate::parser::error::*;
use crate::parser::expr::TermKind;
use crate::roll::{DiceGroup, DiceLimits, Modifier};


const MODIFIER_PHRASES: [(&str, fn(u32) -> Modifier); 8] = [
    ("reroll lowest", Modifier::RerollLowest),
    ("reroll highest", Modifier::RerollHighest),
    ("reroll less than", Modifier::RerollLessThan),
    ("reroll greater than", Modifier::RerollGreaterThan),
    ("minimum value", Modifier::MinValue),
    ("maximum value", Modifier::MaxValue),
    ("drop lowest", Modifier::DropLowest),
    ("drop highest", Modifier::DropHighest),
];


impl FromStr for Modifier {
    type Err = ParserError;

    /// Parses one modifier command such as `Drop Lowest 1`.
    /// Case and spacing are ignored.
    ///
    /// # Errors
    /// - [`ParserError::UnknownModifier`] if the command phrase is not recognized.
    /// - [`ParserError::ModifierOperand`] if the value is missing or not a non-negative integer.
    fn from_str(s: &str) -> Result<Self> {
        let command = s.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        for (phrase, modifier) in MODIFIER_PHRASES {
            let Some(rest) = command.strip_prefix(phrase) else {
                continue;
            };

            if !rest.is_empty() && !rest.starts_with(' ') {
                continue;
            }

            return rest.trim()
                .parse::<u32>()
                .map(modifier)
                .map_err(|_| ParserError::ModifierOperand(command.clone()));
        }

        Err(ParserError::UnknownModifier(command))
    }
}


/// Parses one sign-stripped term: a parenthesized dice group with modifiers,
/// a bare `NdS`, or a bare integer.
pub(crate) fn parse_term(text: &str, limits: &DiceLimits) -> Result<TermKind> {
    let text = text.trim();

    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        return parse_group(inner, limits).map(TermKind::Dice);
    }

    if let Some((count, sides)) = dice_spec(text)? {
        return DiceGroup::builder(sides)
            .count(count)
            .build(limits)
            .map(TermKind::Dice);
    }

    if !text.is_empty() && text.chars().all(|ch| ch.is_ascii_digit()) {
        return number(text).map(TermKind::Literal);
    }

    Err(ParserError::UnrecognizedTerm(text.to_string()))
}

fn parse_group(inner: &str, limits: &DiceLimits) -> Result<DiceGroup> {
    let mut segments = inner.split(',');
    let specifier = segments.next().unwrap_or_default().trim();

    let (count, sides) = dice_spec(specifier)?
        .ok_or_else(|| ParserError::DiceSpecifier(specifier.to_string()))?;

    let modifiers = segments
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::parse::<Modifier>)
        .collect::<Result<Vec<_>>>()?;

    DiceGroup::builder(sides)
        .count(count)
        .modifiers(modifiers)
        .grouped(true)
        .build(limits)
}

/// Reads `NdS` (count optional, defaulting to 1).
/// `Ok(None)` when the text does not have that shape.
fn dice_spec(text: &str) -> Result<Option<(u32, u32)>> {
    let Some((count, sides)) = text.split_once(['d', 'D']) else {
        return Ok(None);
    };

    let digits = |s: &str| s.chars().all(|ch| ch.is_ascii_digit());
    if !digits(count) || sides.is_empty() || !digits(sides) {
        return Ok(None);
    }

    let count = if count.is_empty() { 1 } else { number(count)? };
    Ok(Some((count, number(sides)?)))
}

fn number(digits: &str) -> Result<u32> {
    digits.parse()
        .map_err(|_| ParserError::NumberTooLarge(digits.to_string()))
}
