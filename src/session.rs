//! Caller-side state kept between rolls: recent history, the last expression,
//! a roll counter and a list of favorite expressions.
//!
//! The engine itself is stateless; a [`Session`] is what an application holds on to.

use crate::Error;
use crate::engine::Engine;
use crate::parser::{HistoryEntry, RollOutcome};
use crate::random::RandomSource;


/// Called with the number of rolls made when the history is cleared automatically.
pub type ClearCallback = Box<dyn FnMut(u64) + Send>;


/// Result of [`Session::roll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRoll {
    /// The evaluated expression.
    pub outcome: RollOutcome,
    /// `true` when the history was reset right before this roll.
    pub history_cleared: bool,
}


/// History, last expression, roll counter and favorites kept between rolls.
///
/// The state only changes when a roll succeeds.
pub struct Session {
    history: Vec<HistoryEntry>,
    history_limit: usize,
    last_expression: Option<String>,
    roll_counter: u64,
    clear_after: Option<u64>,
    on_clear: Option<ClearCallback>,
    favorites: Vec<String>,
}

impl Session {
    /// Entries kept in the history unless configured otherwise.
    pub const DEFAULT_HISTORY_LIMIT: usize = 20;
    /// Rolls after which the history is cleared unless configured otherwise.
    pub const DEFAULT_CLEAR_AFTER: u64 = 1000;

    /// Creates an empty session. `clear_after` of `None` never clears the history.
    pub fn new(history_limit: usize, clear_after: Option<u64>) -> Self {
        Self {
            history: Vec::new(),
            history_limit,
            last_expression: None,
            roll_counter: 0,
            clear_after,
            on_clear: None,
            favorites: Vec::new(),
        }
    }

    /// Registers a callback run each time the roll counter reaches its threshold.
    pub fn on_clear<F: FnMut(u64) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_clear = Some(Box::new(callback));
        self
    }

    /// Starts with the given favorites, deduplicated and sorted.
    /// Blank entries are skipped.
    pub fn with_favorites<I: IntoIterator<Item = String>>(mut self, favorites: I) -> Self {
        for favorite in favorites {
            let favorite = favorite.trim();
            if favorite.is_empty() {
                continue;
            }

            self.insert_favorite(favorite);
        }
        self
    }

    /// Evaluates `expression` and records it.
    ///
    /// Once `clear_after` rolls have been made, the history, the last expression
    /// and the counter are reset before the roll. Nothing is recorded when the
    /// expression fails.
    ///
    /// # Errors
    /// Any error of [`Engine::evaluate`].
    ///
    /// # Examples
    /// ```
    /// use dice_roller::{Engine, ScriptedRolls, Session};
    ///
    /// let mut session = Session::default();
    /// let mut rng = ScriptedRolls::new([4]);
    ///
    /// session.roll("1d6 + 2", &Engine::default(), &mut rng).unwrap();
    /// assert!(session.roll("(1d6", &Engine::default(), &mut rng).is_err());
    ///
    /// assert_eq!(session.history().len(), 1);
    /// assert_eq!(session.history()[0].total, 6);
    /// assert_eq!(session.last_expression(), Some("1d6 + 2"));
    /// ```
    pub fn roll<R: RandomSource + ?Sized>(
        &mut self,
        expression: &str,
        engine: &Engine,
        rng: &mut R
    ) -> Result<SessionRoll, Error> {
        let expr = engine.parse(expression)?;

        let history_cleared = self.clear_if_due();
        let outcome = expr.evaluate(rng);
        self.record(&outcome);

        Ok(SessionRoll { outcome, history_cleared })
    }

    /// Rolls the last successfully evaluated expression again.
    ///
    /// # Errors
    /// - [`Error::Empty`] if nothing has been rolled yet (or since the last clear).
    /// - Any error of [`Session::roll`].
    pub fn reroll_last<R: RandomSource + ?Sized>(&mut self, engine: &Engine, rng: &mut R) -> Result<SessionRoll, Error> {
        let expression = self.last_expression.clone().ok_or(Error::Empty)?;
        self.roll(&expression, engine, rng)
    }

    /// Empties the history and forgets the last expression.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.last_expression = None;
    }

    /// Past rolls, newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The last expression rolled successfully.
    pub fn last_expression(&self) -> Option<&str> {
        self.last_expression.as_deref()
    }

    /// Rolls made since the session started or was last cleared automatically.
    pub fn roll_counter(&self) -> u64 {
        self.roll_counter
    }

    /// Adds `expression` to the favorites.
    /// Returns `false` when it was already there.
    ///
    /// # Errors
    /// [`Error::Empty`] if the expression is blank.
    pub fn add_favorite(&mut self, expression: &str) -> Result<bool, Error> {
        let expression = expression.trim();

        if expression.is_empty() {
            return Err(Error::Empty);
        }

        Ok(self.insert_favorite(expression))
    }

    /// Removes `expression` from the favorites. Returns `false` when it was not there.
    pub fn remove_favorite(&mut self, expression: &str) -> bool {
        let expression = expression.trim();
        let before = self.favorites.len();
        self.favorites.retain(|fav| fav != expression);
        self.favorites.len() != before
    }

    /// Favorite expressions, sorted.
    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Inserts a trimmed, non-blank expression in sorted position.
    fn insert_favorite(&mut self, expression: &str) -> bool {
        match self.favorites.binary_search_by(|fav| fav.as_str().cmp(expression)) {
            Ok(_) => false,
            Err(index) => {
                self.favorites.insert(index, expression.to_string());
                true
            }
        }
    }

    fn clear_if_due(&mut self) -> bool {
        let Some(threshold) = self.clear_after else {
            return false;
        };

        if self.roll_counter < threshold {
            return false;
        }

        tracing::info!(rolls = self.roll_counter, "clearing roll history");
        if let Some(callback) = self.on_clear.as_mut() {
            callback(self.roll_counter);
        }

        self.roll_counter = 0;
        self.clear_history();
        true
    }

    fn record(&mut self, outcome: &RollOutcome) {
        self.roll_counter += 1;
        self.last_expression = Some(outcome.expression.clone());

        let repeated = self.history.first()
            .is_some_and(|entry| entry.expression == outcome.expression);

        if !repeated {
            self.history.insert(0, outcome.history_entry());
            self.history.truncate(self.history_limit);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HISTORY_LIMIT, Some(Self::DEFAULT_CLEAR_AFTER))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("history", &self.history)
            .field("history_limit", &self.history_limit)
            .field("last_expression", &self.last_expression)
            .field("roll_counter", &self.roll_counter)
            .field("clear_after", &self.clear_after)
            .field("favorites", &self.favorites)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};
    use super::*;
    use crate::random::ScriptedRolls;


    fn roll(session: &mut Session, expression: &str) -> Result<SessionRoll, Error> {
        session.roll(expression, &Engine::default(), &mut ScriptedRolls::new([3]))
    }

    #[test]
    fn test_history_newest_first() {
        let mut session = Session::default();
        roll(&mut session, "1").unwrap();
        roll(&mut session, "2").unwrap();

        let expressions: Vec<&str> = session.history().iter().map(|e| e.expression.as_str()).collect();
        assert_eq!(expressions, vec!["2", "1"]);
    }

    #[test]
    fn test_history_skips_repeat_of_newest() {
        let mut session = Session::default();
        roll(&mut session, "1d6").unwrap();
        roll(&mut session, "1d6").unwrap();
        roll(&mut session, "2").unwrap();
        roll(&mut session, "1d6").unwrap();

        assert_eq!(session.history().len(), 3);
        assert_eq!(session.roll_counter(), 4);
    }

    #[test]
    fn test_history_limit() {
        let mut session = Session::new(3, None);
        for n in 1..=5 {
            roll(&mut session, &n.to_string()).unwrap();
        }

        let totals: Vec<i64> = session.history().iter().map(|e| e.total).collect();
        assert_eq!(totals, vec![5, 4, 3]);
    }

    #[test]
    fn test_failure_leaves_state_alone() {
        let mut session = Session::default();
        roll(&mut session, "4").unwrap();

        assert_eq!(roll(&mut session, "").unwrap_err(), Error::Empty);
        assert!(matches!(roll(&mut session, "(1d4"), Err(Error::Malformed(_))));
        assert!(matches!(roll(&mut session, "0d4"), Err(Error::OutOfRange(_))));

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.last_expression(), Some("4"));
        assert_eq!(session.roll_counter(), 1);
    }

    #[test]
    fn test_auto_clear() {
        let cleared = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&cleared);
        let mut session = Session::new(20, Some(3))
            .on_clear(move |rolls| seen.lock().unwrap().push(rolls));

        for n in 1..=3 {
            assert!(!roll(&mut session, &n.to_string()).unwrap().history_cleared);
        }

        let fourth = roll(&mut session, "9").unwrap();
        assert!(fourth.history_cleared);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.roll_counter(), 1);
        assert_eq!(*cleared.lock().unwrap(), vec![3]);
    }

    #[test]
    fn test_auto_clear_disabled() {
        let mut session = Session::new(5, None);
        for _ in 0..50 {
            assert!(!roll(&mut session, "1").unwrap().history_cleared);
        }
        assert_eq!(session.roll_counter(), 50);
    }

    #[test]
    fn test_reroll_last() {
        let mut session = Session::default();
        let engine = Engine::default();

        assert_eq!(session.reroll_last(&engine, &mut ScriptedRolls::new([1])).unwrap_err(), Error::Empty);

        session.roll("2d6", &engine, &mut ScriptedRolls::new([1, 2])).unwrap();
        let again = session.reroll_last(&engine, &mut ScriptedRolls::new([6, 6])).unwrap();

        assert_eq!(again.outcome.total, 12);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].total, 3);
    }

    #[test]
    fn test_clear_history() {
        let mut session = Session::default();
        roll(&mut session, "1d6").unwrap();
        session.clear_history();

        assert!(session.history().is_empty());
        assert_eq!(session.last_expression(), None);
    }

    #[test]
    fn test_favorites() {
        let mut session = Session::default()
            .with_favorites(["3d6", "(4d6, drop lowest 1)", "  ", "3d6", ""].map(String::from));

        assert_eq!(session.favorites(), ["(4d6, drop lowest 1)", "3d6"]);
        assert_eq!(session.add_favorite("  1d20 "), Ok(true));
        assert_eq!(session.add_favorite("1d20"), Ok(false));
        assert_eq!(session.add_favorite("   "), Err(Error::Empty));
        assert_eq!(session.favorites(), ["(4d6, drop lowest 1)", "1d20", "3d6"]);

        assert!(session.remove_favorite("3d6"));
        assert!(!session.remove_favorite("3d6"));
        assert_eq!(session.favorites().len(), 2);
    }
}
