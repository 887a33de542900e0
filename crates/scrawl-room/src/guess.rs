//! Guess matching and scoring.

/// Points the drawer earns for each player who guesses their word.
pub const DRAWER_BONUS: u32 = 25;

/// Points for a guess at the very start of the turn.
pub const MAX_GUESS_POINTS: u32 = 500;

/// Points for a guess on the final tick.
pub const MIN_GUESS_POINTS: u32 = 50;

/// Canonical form used to compare guesses and words.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// What a submitted guess turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess names the word.
    Correct,
    /// Anything else; relayed to the room as chat (trimmed).
    Chat(String),
}

/// Compares a raw guess against the secret word.
pub fn evaluate(text: &str, word: &str) -> GuessOutcome {
    if normalize(text) == normalize(word) {
        GuessOutcome::Correct
    } else {
        GuessOutcome::Chat(text.trim().to_string())
    }
}

/// Score for a correct guess `elapsed` seconds into a `turn`-second window.
///
/// Linear from [`MAX_GUESS_POINTS`] at `elapsed = 0` down to
/// [`MIN_GUESS_POINTS`] at `elapsed >= turn`, in integer arithmetic so
/// equal inputs always score equally.
pub fn guess_points(elapsed: u32, turn: u32) -> u32 {
    if turn == 0 {
        return MIN_GUESS_POINTS;
    }
    let left = u64::from(turn.saturating_sub(elapsed));
    let span = u64::from(MAX_GUESS_POINTS - MIN_GUESS_POINTS);
    MIN_GUESS_POINTS + (span * left / u64::from(turn)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  ApPle \n"), "apple");
    }

    #[test]
    fn test_evaluate_is_case_and_whitespace_insensitive() {
        assert_eq!(evaluate(" APPLE ", "apple"), GuessOutcome::Correct);
        assert_eq!(evaluate("apple", "APPLE"), GuessOutcome::Correct);
    }

    #[test]
    fn test_evaluate_miss_returns_trimmed_chat() {
        assert_eq!(
            evaluate("  is it a pear?  ", "apple"),
            GuessOutcome::Chat("is it a pear?".into())
        );
    }

    #[test]
    fn test_guess_points_bounds() {
        assert_eq!(guess_points(0, 60), 500);
        assert_eq!(guess_points(60, 60), 50);
        assert_eq!(guess_points(90, 60), 50);
        assert_eq!(guess_points(30, 60), 275);
    }

    #[test]
    fn test_guess_points_never_increases_with_time() {
        for turn in [10, 30, 60, 300] {
            let mut prev = u32::MAX;
            for elapsed in 0..=turn {
                let p = guess_points(elapsed, turn);
                assert!(p <= prev, "turn={turn} elapsed={elapsed}");
                assert!(p >= MIN_GUESS_POINTS);
                prev = p;
            }
        }
    }

    #[test]
    fn test_guess_points_zero_turn_does_not_divide_by_zero() {
        assert_eq!(guess_points(0, 0), MIN_GUESS_POINTS);
    }
}
