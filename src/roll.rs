use std::fmt::Display;
use crate::parser::ParserError;
use crate::random::RandomSource;


/// Upper bounds accepted for a dice group.
///
/// Counts and sides of zero are always rejected; these limits cap the other end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DiceLimits {
    /// Most dice a single group may roll.
    pub max_count: u16,
    /// Most sides a single die may have.
    pub max_sides: u16,
}

impl DiceLimits {
    /// Default for `max_count`.
    pub const DEFAULT_MAX_COUNT: u16 = 100;
    /// Default for `max_sides`.
    pub const DEFAULT_MAX_SIDES: u16 = 1000;

    /// Checks `count` and `sides` against the limits.
    ///
    /// # Errors
    /// - [`ParserError::DiceCount`] if `count` is zero or above `max_count`.
    /// - [`ParserError::DiceSides`] if `sides` is zero or above `max_sides`.
    pub fn check(&self, count: u32, sides: u32) -> Result<(u16, u16), ParserError> {
        if count == 0 || count > u32::from(self.max_count) {
            return Err(ParserError::DiceCount { count, max: self.max_count });
        }

        if sides == 0 || sides > u32::from(self.max_sides) {
            return Err(ParserError::DiceSides { sides, max: self.max_sides });
        }

        // both fit: the limits are u16
        Ok((count as u16, sides as u16))
    }
}

impl Default for DiceLimits {
    fn default() -> Self {
        Self {
            max_count: Self::DEFAULT_MAX_COUNT,
            max_sides: Self::DEFAULT_MAX_SIDES
        }
    }
}


/// A post-roll command attached to a parenthesized dice group,
/// such as `drop lowest 1` or `minimum value 3`.
///
/// Modifiers are always applied in the same order regardless of how they were written:
/// reroll lowest, reroll highest, reroll less/greater than, minimum value,
/// maximum value, drop lowest, drop highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Modifier {
    /// Reroll the `n` lowest dice once each.
    RerollLowest(u32),
    /// Reroll the `n` highest dice once each.
    RerollHighest(u32),
    /// Reroll, once, every die showing less than the value.
    RerollLessThan(u32),
    /// Reroll, once, every die showing more than the value.
    RerollGreaterThan(u32),
    /// Raise every die below the value up to it.
    MinValue(u32),
    /// Lower every die above the value down to it.
    MaxValue(u32),
    /// Remove the `n` lowest dice from the total.
    DropLowest(u32),
    /// Remove the `n` highest dice from the total.
    DropHighest(u32),
}

impl Modifier {
    /// The numeric operand of the modifier.
    pub fn value(&self) -> u32 {
        match *self {
            Modifier::RerollLowest(n)
            | Modifier::RerollHighest(n)
            | Modifier::RerollLessThan(n)
            | Modifier::RerollGreaterThan(n)
            | Modifier::MinValue(n)
            | Modifier::MaxValue(n)
            | Modifier::DropLowest(n)
            | Modifier::DropHighest(n) => n
        }
    }

    /// The command phrase without its operand, as written in an expression.
    pub fn phrase(&self) -> &'static str {
        match self {
            Modifier::RerollLowest(_) => "reroll lowest",
            Modifier::RerollHighest(_) => "reroll highest",
            Modifier::RerollLessThan(_) => "reroll less than",
            Modifier::RerollGreaterThan(_) => "reroll greater than",
            Modifier::MinValue(_) => "minimum value",
            Modifier::MaxValue(_) => "maximum value",
            Modifier::DropLowest(_) => "drop lowest",
            Modifier::DropHighest(_) => "drop highest"
        }
    }
}

impl Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.phrase(), self.value())
    }
}


/// A dice group `NdS` together with its modifiers.
///
/// Created with [`DiceGroup::builder()`], or by the parser for each dice term of an expression.
/// Call [`DiceGroup::roll()`] to roll it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DiceGroup {
    count: u16,
    sides: u16,
    modifiers: Vec<Modifier>,
    grouped: bool
}

impl DiceGroup {
    /// Creates a new [`DiceGroupBuilder`] for dice with `sides` sides.
    ///
    /// # Examples
    /// ```
    /// use dice_roller::{DiceGroup, DiceLimits, Modifier};
    ///
    /// let group = DiceGroup::builder(8)
    ///     .count(4)
    ///     .modifier(Modifier::DropLowest(1))
    ///     .build(&DiceLimits::default())
    ///     .unwrap();
    ///
    /// assert_eq!(group.to_string(), "(4d8, drop lowest 1)");
    /// ```
    pub fn builder(sides: u32) -> DiceGroupBuilder {
        DiceGroupBuilder::new(sides)
    }

    /// Number of dice rolled.
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Number of sides on each die.
    pub fn sides(&self) -> u16 {
        self.sides
    }

    /// Modifiers in the order they were written.
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Whether the roll is traced step by step (parenthesized form) or on a single line.
    pub fn is_grouped(&self) -> bool {
        self.grouped || !self.modifiers.is_empty()
    }

    /// Rolls the dice, applies every modifier and returns the sum with its trace.
    ///
    /// # Examples
    /// ```
    /// use dice_roller::{DiceGroup, DiceLimits, ScriptedRolls};
    ///
    /// let group = DiceGroup::builder(6).count(2).build(&DiceLimits::default()).unwrap();
    /// let result = group.roll(&mut ScriptedRolls::new([3, 5]));
    ///
    /// assert_eq!(result.value, 8);
    /// assert_eq!(result.render(), "2d6 (3, 5) = 8");
    /// ```
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> RollResult {
        let mut dice: Vec<u16> = (0..self.count)
            .map(|_| draw(rng, self.sides))
            .collect();

        let header = format!("{}d{} ({})", self.count, self.sides, join(&dice, ", "));

        if !self.is_grouped() {
            let total = sum(&dice);
            return RollResult::new(total, dice, vec![format!("{header} = {total}")]);
        }

        let mut trace = vec![header];
        let plan = ModifierPlan::new(&self.modifiers);
        let mut step = Step { sides: self.sides, rng, trace: &mut trace };

        if plan.reroll_lowest > 0 {
            step.reroll_ranked(&mut dice, plan.reroll_lowest, false);
        }

        if plan.reroll_highest > 0 {
            step.reroll_ranked(&mut dice, plan.reroll_highest, true);
        }

        for threshold in &plan.thresholds {
            step.reroll_matching(&mut dice, *threshold);
        }

        for &min in &plan.min_values {
            step.clamp(&mut dice, Clamp::Min(min));
        }

        for &max in &plan.max_values {
            step.clamp(&mut dice, Clamp::Max(max));
        }

        if plan.drop_lowest > 0 {
            step.drop_ranked(&mut dice, plan.drop_lowest, false);
        }

        if plan.drop_highest > 0 {
            step.drop_ranked(&mut dice, plan.drop_highest, true);
        }

        let total = sum(&dice);
        trace.push(format!("= {total}"));

        RollResult::new(total, dice, trace)
    }

    /// Smallest sum the group can produce.
    ///
    /// Rerolls run before the clamps and drops, so they never move a roll outside these bounds.
    pub fn min(&self) -> i64 {
        self.bound(1)
    }

    /// Largest sum the group can produce.
    pub fn max(&self) -> i64 {
        self.bound(self.sides)
    }

    fn bound(&self, face: u16) -> i64 {
        let plan = ModifierPlan::new(&self.modifiers);

        let mut face = face;
        for &min in &plan.min_values {
            face = face.max(clamp_operand(min, self.sides));
        }
        for &max in &plan.max_values {
            face = face.min(clamp_operand(max, self.sides));
        }

        let dropped = plan.drop_lowest.saturating_add(plan.drop_highest);
        let kept = u32::from(self.count).saturating_sub(dropped);

        i64::from(kept) * i64::from(face)
    }
}

impl Display for DiceGroup {
    /// Formats the group the way it would be written in an expression.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_grouped() {
            return write!(f, "{}d{}", self.count, self.sides);
        }

        write!(f, "({}d{}", self.count, self.sides)?;
        for modifier in &self.modifiers {
            write!(f, ", {modifier}")?;
        }
        write!(f, ")")
    }
}


/// A builder for [`DiceGroup`] instances.
///
/// Start with [`DiceGroup::builder()`], chain [`DiceGroupBuilder::count()`]
/// and [`DiceGroupBuilder::modifier()`], then call [`DiceGroupBuilder::build()`].
#[derive(Debug, Clone)]
pub struct DiceGroupBuilder {
    sides: u32,
    count: u32,
    modifiers: Vec<Modifier>,
    grouped: bool
}

impl DiceGroupBuilder {
    /// The count defaults to 1 and no modifiers are set.
    fn new(sides: u32) -> Self {
        Self {
            sides,
            count: 1,
            modifiers: Vec::new(),
            grouped: false
        }
    }

    /// Sets the number of dice.
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Adds one modifier.
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Adds several modifiers.
    pub fn modifiers<I: IntoIterator<Item = Modifier>>(mut self, modifiers: I) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    /// Marks the group as written in parenthesized form, so its trace is step by step
    /// even without modifiers.
    pub fn grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    /// Validates the configuration against `limits`.
    ///
    /// # Errors
    /// - [`ParserError::DiceCount`] if the count is 0 or above the limit.
    /// - [`ParserError::DiceSides`] if the sides are 0 or above the limit.
    ///
    /// # Examples
    /// ```
    /// use dice_roller::{DiceGroup, DiceLimits, ParserError};
    ///
    /// let limits = DiceLimits::default();
    /// assert!(DiceGroup::builder(6).count(3).build(&limits).is_ok());
    ///
    /// let err = DiceGroup::builder(6).count(101).build(&limits).unwrap_err();
    /// assert_eq!(err, ParserError::DiceCount { count: 101, max: 100 });
    /// ```
    pub fn build(self, limits: &DiceLimits) -> Result<DiceGroup, ParserError> {
        let (count, sides) = limits.check(self.count, self.sides)?;

        Ok(DiceGroup {
            count,
            sides,
            modifiers: self.modifiers,
            grouped: self.grouped
        })
    }
}


/// The evaluation of a single term: its unsigned value, the dice that
/// survived every modifier, and the trace lines that explain it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RollResult {
    /// Sum of the surviving dice, or the literal value.
    pub value: i64,
    /// Dice left after every modifier.
    pub dice: Vec<u16>,
    /// Trace lines, first line being the initial roll.
    pub trace: Vec<String>
}

impl RollResult {
    /// Creates a result from its parts.
    pub fn new(value: i64, dice: Vec<u16>, trace: Vec<String>) -> Self {
        Self { value, dice, trace }
    }

    /// A literal number: no dice, and the trace is the number as written.
    pub fn literal(value: i64, text: &str) -> Self {
        Self {
            value,
            dice: Vec::new(),
            trace: vec![text.to_string()]
        }
    }

    /// Joins the trace lines, indenting every line after the first.
    pub fn render(&self) -> String {
        self.trace.join("\n    ")
    }
}


/// Modifiers folded into the fixed application order.
#[derive(Debug, Default)]
struct ModifierPlan {
    reroll_lowest: u32,
    reroll_highest: u32,
    thresholds: Vec<Threshold>,
    min_values: Vec<u32>,
    max_values: Vec<u32>,
    drop_lowest: u32,
    drop_highest: u32
}

impl ModifierPlan {
    fn new(modifiers: &[Modifier]) -> Self {
        let mut plan = Self::default();

        for modifier in modifiers {
            match *modifier {
                Modifier::RerollLowest(n) => plan.reroll_lowest = plan.reroll_lowest.saturating_add(n),
                Modifier::RerollHighest(n) => plan.reroll_highest = plan.reroll_highest.saturating_add(n),
                Modifier::RerollLessThan(v) if v > 0 => plan.thresholds.push(Threshold::LessThan(v)),
                Modifier::RerollGreaterThan(v) if v > 0 => plan.thresholds.push(Threshold::GreaterThan(v)),
                Modifier::MinValue(v) if v > 0 => plan.min_values.push(v),
                Modifier::MaxValue(v) if v > 0 => plan.max_values.push(v),
                Modifier::DropLowest(n) => plan.drop_lowest = plan.drop_lowest.saturating_add(n),
                Modifier::DropHighest(n) => plan.drop_highest = plan.drop_highest.saturating_add(n),
                _ => {}
            }
        }

        plan
    }
}


#[derive(Debug, Clone, Copy)]
enum Threshold {
    LessThan(u32),
    GreaterThan(u32)
}

impl Threshold {
    fn matches(self, die: u16) -> bool {
        match self {
            Threshold::LessThan(v) => u32::from(die) < v,
            Threshold::GreaterThan(v) => u32::from(die) > v
        }
    }
}


#[derive(Debug, Clone, Copy)]
enum Clamp {
    Min(u32),
    Max(u32)
}


/// Mutable state shared by the modifier steps of one roll.
struct Step<'a, R: RandomSource + ?Sized> {
    sides: u16,
    rng: &'a mut R,
    trace: &'a mut Vec<String>
}

impl<R: RandomSource + ?Sized> Step<'_, R> {
    fn reroll_ranked(&mut self, dice: &mut [u16], n: u32, highest: bool) {
        let label = if highest { "Reroll Highest" } else { "Reroll Lowest" };

        for index in ranked(dice, highest).into_iter().take(n as usize) {
            let new = draw(&mut *self.rng, self.sides);
            self.trace.push(format!("{label}: {}→{new}", dice[index]));
            dice[index] = new;
        }

        tracing::trace!(n, highest, "rerolled ranked dice");
        self.snapshot(dice);
    }

    fn reroll_matching(&mut self, dice: &mut [u16], threshold: Threshold) {
        let mut rerolled = false;

        for die in dice.iter_mut().filter(|die| threshold.matches(**die)) {
            let new = draw(&mut *self.rng, self.sides);
            self.trace.push(format!("Reroll Val: {die}→{new}"));
            *die = new;
            rerolled = true;
        }

        if rerolled {
            tracing::trace!(?threshold, "rerolled dice past threshold");
            self.snapshot(dice);
        }
    }

    fn clamp(&mut self, dice: &mut [u16], clamp: Clamp) {
        let (label, bound) = match clamp {
            Clamp::Min(v) => ("Min Val", clamp_operand(v, self.sides)),
            Clamp::Max(v) => ("Max Val", clamp_operand(v, self.sides))
        };

        let mut changed = false;
        for die in dice.iter_mut() {
            let clamped = match clamp {
                Clamp::Min(_) => (*die).max(bound),
                Clamp::Max(_) => (*die).min(bound)
            };

            if clamped != *die {
                *die = clamped;
                changed = true;
            }
        }

        if changed {
            tracing::trace!(?clamp, bound, "clamped dice");
            self.trace.push(format!("{label} {bound}: → ({})", join(dice, ",")));
        }
    }

    fn drop_ranked(&mut self, dice: &mut Vec<u16>, n: u32, highest: bool) {
        let mut dropped = vec![false; dice.len()];
        for index in ranked(dice, highest).into_iter().take(n as usize) {
            dropped[index] = true;
        }

        let mut flags = dropped.into_iter();
        dice.retain(|_| !flags.next().unwrap_or(false));

        tracing::trace!(n, highest, remaining = dice.len(), "dropped dice");
        let label = if highest { 'H' } else { 'L' };
        self.trace.push(format!("Drop {label}{n}: → ({})", join(dice, ",")));
    }

    fn snapshot(&mut self, dice: &[u16]) {
        self.trace.push(format!("→ ({})", join(dice, ",")));
    }
}


/// Indexes of `values` ordered from lowest (or highest) value.
/// Equal values keep their original order, so the earliest die is picked first.
fn ranked(values: &[u16], highest: bool) -> Vec<usize> {
    let mut indexed: Vec<(usize, u16)> = values.iter()
        .copied()
        .enumerate()
        .collect();

    if highest {
        indexed.sort_by(|a, b| b.1.cmp(&a.1));
    } else {
        indexed.sort_by(|a, b| a.1.cmp(&b.1));
    }

    indexed.into_iter()
        .map(|(i, _)| i)
        .collect()
}

/// One die from `rng`, forced into `1..=sides` whatever the source returns.
fn draw<R: RandomSource + ?Sized>(rng: &mut R, sides: u16) -> u16 {
    rng.roll_between(1, sides).clamp(1, sides)
}

fn clamp_operand(value: u32, sides: u16) -> u16 {
    value.clamp(1, u32::from(sides)) as u16
}

fn sum(dice: &[u16]) -> i64 {
    dice.iter().map(|&d| i64::from(d)).sum()
}

fn join(dice: &[u16], separator: &str) -> String {
    dice.iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}


/// A macro for conveniently creating [`DiceGroup`] instances with the default limits.
///
/// # Syntax
/// - `dice!(SIDES)`: a single die (e.g., `dice!(20)` for 1d20).
/// - `dice!(SIDES, COUNT)`: `COUNT` dice (e.g., `dice!(6, 3)` for 3d6).
/// - `dice!(SIDES, COUNT, MODIFIER(N), ...)`: with modifiers, each one a [`Modifier`] variant
///   (e.g., `dice!(8, 4, DropLowest(1))`).
///
/// # Returns
/// `Result<DiceGroup, ParserError>` - The result of [`DiceGroupBuilder::build()`].
///
/// # Examples
/// ```
/// use dice_roller::dice;
///
/// assert_eq!(dice!(6).unwrap().to_string(), "1d6");
/// assert_eq!(dice!(10, 3).unwrap().to_string(), "3d10");
/// assert_eq!(
///     dice!(8, 4, DropLowest(1), MinValue(2)).unwrap().to_string(),
///     "(4d8, drop lowest 1, minimum value 2)"
/// );
/// assert!(dice!(6, 0).is_err());
/// ```
#[macro_export]
macro_rules! dice {
    ($sides:literal) => {
        $crate::DiceGroup::builder($sides)
            .build(&$crate::DiceLimits::default())
    };

    ($sides:literal, $count:literal) => {
        $crate::DiceGroup::builder($sides)
            .count($count)
            .build(&$crate::DiceLimits::default())
    };

    ($sides:literal, $count:literal, $($modifier:ident($n:literal)),+ $(,)?) => {
        $crate::DiceGroup::builder($sides)
            .count($count)
            $(.modifier($crate::Modifier::$modifier($n)))+
            .build(&$crate::DiceLimits::default())
    };
}


#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use super::*;
    use crate::random::ScriptedRolls;
    use crate::roll_test_strategies::{dice_group_strategy, values_strategy};


    fn group(sides: u32, count: u32, modifiers: &[Modifier]) -> DiceGroup {
        DiceGroup::builder(sides)
            .count(count)
            .modifiers(modifiers.iter().copied())
            .grouped(true)
            .build(&DiceLimits::default())
            .unwrap()
    }

    #[test]
    fn test_bare_trace_is_one_line() {
        let result = dice!(6, 2).unwrap().roll(&mut ScriptedRolls::new([3, 5]));

        assert_eq!(result.value, 8);
        assert_eq!(result.trace, vec!["2d6 (3, 5) = 8"]);
    }

    #[test]
    fn test_grouped_without_modifiers() {
        let result = group(6, 2, &[]).roll(&mut ScriptedRolls::new([3, 5]));

        assert_eq!(result.value, 8);
        assert_eq!(result.render(), "2d6 (3, 5)\n    = 8");
    }

    #[test]
    fn test_source_out_of_range_is_clamped() {
        let low = dice!(6, 2).unwrap().roll(&mut |_: u16, _: u16| 0u16);
        assert_eq!(low.dice, vec![1, 1]);
        assert_eq!(low.render(), "2d6 (1, 1) = 2");

        let high = dice!(6, 2).unwrap().roll(&mut |_: u16, _: u16| 50u16);
        assert_eq!(high.dice, vec![6, 6]);
        assert_eq!(high.value, 12);
    }

    #[test]
    fn test_rerolls_from_out_of_range_source_are_clamped() {
        let mut draws = [3u16, 0, 50].into_iter();
        let result = group(6, 1, &[Modifier::RerollLowest(1), Modifier::RerollLessThan(2)])
            .roll(&mut move |_: u16, _: u16| draws.next().unwrap_or(4));

        assert_eq!(result.trace, vec![
            "1d6 (3)",
            "Reroll Lowest: 3→1",
            "→ (1)",
            "Reroll Val: 1→6",
            "→ (6)",
            "= 6",
        ]);
    }

    #[test]
    fn test_drop_lowest() {
        let result = group(8, 4, &[Modifier::DropLowest(1)])
            .roll(&mut ScriptedRolls::new([2, 7, 4, 8]));

        assert_eq!(result.value, 19);
        assert_eq!(result.dice, vec![7, 4, 8]);
        assert_eq!(result.trace, vec!["4d8 (2, 7, 4, 8)", "Drop L1: → (7,4,8)", "= 19"]);
    }

    #[test]
    fn test_drop_lowest_then_highest() {
        let result = group(6, 5, &[Modifier::DropHighest(1), Modifier::DropLowest(2)])
            .roll(&mut ScriptedRolls::new([5, 1, 6, 3, 6]));

        // lowest first regardless of the order they were written in
        assert_eq!(result.trace[1], "Drop L2: → (5,6,6)");
        assert_eq!(result.trace[2], "Drop H1: → (5,6)");
        assert_eq!(result.value, 11);
    }

    #[test]
    fn test_drop_more_than_rolled() {
        let result = group(6, 2, &[Modifier::DropLowest(5), Modifier::DropHighest(1)])
            .roll(&mut ScriptedRolls::new([4, 2]));

        assert_eq!(result.value, 0);
        assert!(result.dice.is_empty());
        assert_eq!(result.trace, vec!["2d6 (4, 2)", "Drop L5: → ()", "Drop H1: → ()", "= 0"]);
    }

    #[test]
    fn test_drop_ties_remove_earliest() {
        let result = group(6, 4, &[Modifier::DropLowest(1), Modifier::DropHighest(1)])
            .roll(&mut ScriptedRolls::new([2, 5, 2, 5]));

        assert_eq!(result.dice, vec![2, 5]);
    }

    #[test]
    fn test_reroll_lowest() {
        let result = group(6, 3, &[Modifier::RerollLowest(1)])
            .roll(&mut ScriptedRolls::new([4, 1, 3, 6]));

        assert_eq!(result.trace, vec![
            "3d6 (4, 1, 3)",
            "Reroll Lowest: 1→6",
            "→ (4,6,3)",
            "= 13"
        ]);
    }

    #[test]
    fn test_reroll_highest_ties_pick_earliest() {
        let result = group(6, 3, &[Modifier::RerollHighest(1)])
            .roll(&mut ScriptedRolls::new([6, 2, 6, 1]));

        assert_eq!(result.dice, vec![1, 2, 6]);
        assert_eq!(result.trace[1], "Reroll Highest: 6→1");
    }

    #[test]
    fn test_reroll_lowest_capped_at_count() {
        let mut rng = ScriptedRolls::new([1, 2, 5, 5]);
        let result = group(6, 2, &[Modifier::RerollLowest(10)]).roll(&mut rng);

        assert_eq!(rng.consumed(), 4);
        assert_eq!(result.dice, vec![5, 5]);
    }

    #[test]
    fn test_reroll_less_than() {
        let result = group(6, 3, &[Modifier::RerollLessThan(3)])
            .roll(&mut ScriptedRolls::new([1, 4, 2, 6, 2]));

        // each die is rerolled once, even when the new value still matches
        assert_eq!(result.trace, vec![
            "3d6 (1, 4, 2)",
            "Reroll Val: 1→6",
            "Reroll Val: 2→2",
            "→ (6,4,2)",
            "= 12"
        ]);
    }

    #[test]
    fn test_reroll_greater_than_without_match_is_silent() {
        let result = group(6, 2, &[Modifier::RerollGreaterThan(5)])
            .roll(&mut ScriptedRolls::new([3, 4]));

        assert_eq!(result.trace, vec!["2d6 (3, 4)", "= 7"]);
    }

    #[test]
    fn test_min_and_max_value() {
        let result = group(10, 4, &[Modifier::MaxValue(8), Modifier::MinValue(3)])
            .roll(&mut ScriptedRolls::new([1, 9, 5, 2]));

        assert_eq!(result.trace, vec![
            "4d10 (1, 9, 5, 2)",
            "Min Val 3: → (3,9,5,3)",
            "Max Val 8: → (3,8,5,3)",
            "= 19"
        ]);
    }

    #[test]
    fn test_min_value_above_sides_is_capped() {
        let result = group(6, 2, &[Modifier::MinValue(9)])
            .roll(&mut ScriptedRolls::new([1, 6]));

        assert_eq!(result.dice, vec![6, 6]);
        assert_eq!(result.trace[1], "Min Val 6: → (6,6)");
    }

    #[test]
    fn test_zero_operands_are_skipped() {
        let modifiers = [
            Modifier::RerollLowest(0),
            Modifier::RerollGreaterThan(0),
            Modifier::MinValue(0),
            Modifier::MaxValue(0),
            Modifier::DropLowest(0),
            Modifier::DropHighest(0),
        ];
        let result = group(6, 2, &modifiers).roll(&mut ScriptedRolls::new([2, 3]));

        assert_eq!(result.trace, vec!["2d6 (2, 3)", "= 5"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(dice!(20).unwrap().to_string(), "1d20");
        assert_eq!(group(6, 3, &[]).to_string(), "(3d6)");
        assert_eq!(Modifier::RerollLessThan(2).to_string(), "reroll less than 2");
    }

    #[test]
    fn test_limits_check() {
        let limits = DiceLimits { max_count: 5, max_sides: 12 };

        assert_eq!(limits.check(5, 12), Ok((5, 12)));
        assert!(matches!(limits.check(0, 6), Err(ParserError::DiceCount { .. })));
        assert!(matches!(limits.check(6, 6), Err(ParserError::DiceCount { .. })));
        assert!(matches!(limits.check(1, 0), Err(ParserError::DiceSides { .. })));
        assert!(matches!(limits.check(1, 13), Err(ParserError::DiceSides { .. })));
    }

    proptest! {
        #[test]
        fn test_fixed_value_total(count in 1..=100u32, sides in 1..=1000u32, v in 1..=1000u16) {
            let v = v.min(sides as u16);
            let group = DiceGroup::builder(sides).count(count).build(&DiceLimits::default()).unwrap();
            let result = group.roll(&mut |_low: u16, _high: u16| v);

            prop_assert_eq!(result.value, i64::from(count) * i64::from(v));
        }

        #[test]
        fn test_dice_stay_in_range(group in dice_group_strategy(), values in values_strategy()) {
            let result = group.roll(&mut ScriptedRolls::new(values));

            for die in &result.dice {
                prop_assert!((1..=group.sides()).contains(die));
            }
            prop_assert!(result.value >= 0);
        }

        #[test]
        fn test_drop_count(
            count in 1..=30u32,
            low in 0..40u32,
            high in 0..40u32,
            values in values_strategy()
        ) {
            let plain = group(20, count, &[]).roll(&mut ScriptedRolls::new(values.clone()));
            let dropped = group(20, count, &[Modifier::DropLowest(low), Modifier::DropHighest(high)])
                .roll(&mut ScriptedRolls::new(values));

            let after_low = count - low.min(count);
            let expected = after_low - high.min(after_low);

            prop_assert_eq!(dropped.dice.len(), expected as usize);
            prop_assert!(dropped.value <= plain.value);
        }

        #[test]
        fn test_clamp_bounds(min in 1..=20u32, max in 1..=20u32, values in values_strategy()) {
            let result = group(20, 10, &[Modifier::MinValue(min), Modifier::MaxValue(max)])
                .roll(&mut ScriptedRolls::new(values));

            // max runs after min, so it wins when they cross
            for &die in &result.dice {
                prop_assert!(u32::from(die) <= max);
                if min <= max {
                    prop_assert!(u32::from(die) >= min);
                }
            }
        }

        #[test]
        fn test_min_value_idempotent(min in 1..=12u32, values in values_strategy()) {
            let once = group(12, 8, &[Modifier::MinValue(min)])
                .roll(&mut ScriptedRolls::new(values.clone()));
            let twice = group(12, 8, &[Modifier::MinValue(min), Modifier::MinValue(min)])
                .roll(&mut ScriptedRolls::new(values));

            prop_assert_eq!(once.dice, twice.dice);
            prop_assert_eq!(once.trace, twice.trace);
        }

        #[test]
        fn test_min_max_bounds(group in dice_group_strategy(), values in values_strategy()) {
            let result = group.roll(&mut ScriptedRolls::new(values));
            prop_assert!(result.value >= group.min());
            prop_assert!(result.value <= group.max());
        }

        #[test]
        fn test_ranked(values in prop::collection::vec(1..20u16, 0..20), highest: bool) {
            let order = ranked(&values, highest);
            prop_assert_eq!(order.len(), values.len());

            for pair in order.windows(2) {
                let (a, b) = (values[pair[0]], values[pair[1]]);
                if a == b {
                    prop_assert!(pair[0] < pair[1]);
                } else if highest {
                    prop_assert!(a > b);
                } else {
                    prop_assert!(a < b);
                }
            }
        }
    }
}
