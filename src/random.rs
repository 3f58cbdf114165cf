use rand::Rng;


/// Source of die values used by the engine.
///
/// Every die rolled during an evaluation goes through [`RandomSource::roll_between`],
/// so swapping the source makes evaluation fully reproducible.
///
/// Any `FnMut(u16, u16) -> u16` closure is a source:
/// ```
/// use dice_roller::evaluate;
///
/// let outcome = evaluate("3d6", &mut |_low: u16, _high: u16| 4u16).unwrap();
/// assert_eq!(outcome.total, 12);
/// ```
pub trait RandomSource {
    /// Returns a uniformly distributed value in `low..=high`.
    fn roll_between(&mut self, low: u16, high: u16) -> u16;
}

impl<F> RandomSource for F
where
    F: FnMut(u16, u16) -> u16
{
    fn roll_between(&mut self, low: u16, high: u16) -> u16 {
        self(low, high)
    }
}


/// Adapts any [`rand::Rng`] into a [`RandomSource`].
///
/// # Examples
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use dice_roller::{evaluate, RngSource};
///
/// let mut first = RngSource::new(StdRng::seed_from_u64(7));
/// let mut second = RngSource::new(StdRng::seed_from_u64(7));
///
/// let a = evaluate("4d20", &mut first).unwrap();
/// let b = evaluate("4d20", &mut second).unwrap();
/// assert_eq!(a.breakdown, b.breakdown);
/// ```
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    /// Wraps `rng`.
    pub fn new(rng: R) -> Self {
        Self(rng)
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl RngSource<rand::rngs::ThreadRng> {
    /// A source backed by the thread-local generator.
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll_between(&mut self, low: u16, high: u16) -> u16 {
        self.0.random_range(low..=high)
    }
}


/// Replays a fixed list of values, starting over when it runs out.
///
/// Values outside the requested range are clamped into it, so a die never
/// leaves `1..=sides` even when the script does not fit the dice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRolls {
    values: Vec<u16>,
    next: usize,
}

impl ScriptedRolls {
    /// Replays `values` in order. An empty list always rolls the lowest face.
    pub fn new<I: IntoIterator<Item = u16>>(values: I) -> Self {
        Self {
            values: values.into_iter().collect(),
            next: 0
        }
    }

    /// How many values have been handed out so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl RandomSource for ScriptedRolls {
    fn roll_between(&mut self, low: u16, high: u16) -> u16 {
        if self.values.is_empty() {
            return low;
        }

        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value.clamp(low, high)
    }
}
