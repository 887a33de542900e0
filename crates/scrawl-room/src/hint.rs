//! Progressive word hints.
//!
//! Letters are shown as `_` and every other character (spaces, hyphens) as
//! itself. Over the drawing window every second letter is uncovered in
//! order, never more than half of them, and the last one well before the
//! window closes:
//!
//! ```text
//! "APPLE", 60 s turn, n = 5 letters, n/2 = 2 reveals
//!
//!   0 s  _____
//!  20 s  _P___      elapsed * 3 >= 1 * 60
//!  40 s  _P_L_      elapsed * 3 >= 2 * 60
//! ```

/// Number of letters in `word`.
pub fn letter_count(word: &str) -> usize {
    word.chars().filter(|c| c.is_alphabetic()).count()
}

/// Most letters that will ever be revealed for `word`.
pub fn max_reveals(word: &str) -> usize {
    letter_count(word) / 2
}

/// How many letters should be uncovered `elapsed` seconds into a
/// `turn`-second drawing window.
///
/// The `k`-th reveal happens once `elapsed * (max + 1) >= k * turn`, so the
/// final one lands at `max / (max + 1)` of the window.
pub fn reveals_due(word: &str, elapsed: u32, turn: u32) -> usize {
    let max = max_reveals(word);
    if max == 0 || turn == 0 {
        return 0;
    }
    let progress = u64::from(elapsed) * (max as u64 + 1);
    let due = progress / u64::from(turn);
    (due as usize).min(max)
}

/// Renders `word` with its first `revealed` odd-positioned letters shown.
pub fn mask(word: &str, revealed: usize) -> String {
    let mut letter_index = 0usize;
    word.chars()
        .map(|c| {
            if !c.is_alphabetic() {
                return c;
            }
            let i = letter_index;
            letter_index += 1;
            if i % 2 == 1 && i / 2 < revealed {
                c
            } else {
                '_'
            }
        })
        .collect()
}
