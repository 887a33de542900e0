//! Word bank and candidate selection.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

const DEFAULT_WORDS: &[&str] = &[
    "apple", "banana", "bicycle", "bridge", "butterfly", "cactus", "camera", "candle",
    "castle", "cat", "chair", "cloud", "compass", "cookie", "crown", "diamond", "dinosaur",
    "dolphin", "dragon", "drum", "elephant", "envelope", "feather", "fire truck", "fish",
    "flower", "football", "fork", "frog", "ghost", "giraffe", "glasses", "guitar", "hammer",
    "helicopter", "hot dog", "house", "ice cream", "igloo", "island", "jellyfish", "kangaroo",
    "key", "kite", "ladder", "lamp", "leaf", "lemon", "lighthouse", "lion", "lizard",
    "mermaid", "moon", "mountain", "mushroom", "octopus", "owl", "paintbrush", "panda",
    "parachute", "penguin", "piano", "pineapple", "pirate", "pizza", "planet", "popcorn",
    "pumpkin", "rainbow", "robot", "rocket", "sailboat", "sandwich", "scissors", "shark",
    "snail", "snowman", "spider", "star", "strawberry", "submarine", "sun", "sunflower",
    "sword", "telescope", "tent", "tiger", "toothbrush", "tornado", "tractor", "train",
    "tree", "trumpet", "turtle", "umbrella", "unicorn", "volcano", "waterfall", "whale",
    "windmill", "wizard", "zebra",
];

/// The built-in word list.
pub fn default_bank() -> Vec<String> {
    DEFAULT_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Draws up to `count` distinct candidates from `bank`, skipping words in
/// `used`.
///
/// When fewer than `count` unused words remain, `used` is cleared and the
/// whole bank is available again.
pub fn pick_candidates<R: Rng + ?Sized>(
    rng: &mut R,
    bank: &[String],
    used: &mut HashSet<String>,
    count: usize,
) -> Vec<String> {
    let mut fresh: Vec<&String> = bank.iter().filter(|w| !used.contains(*w)).collect();
    if fresh.len() < count {
        tracing::debug!(bank = bank.len(), "word bank exhausted, recycling");
        used.clear();
        fresh = bank.iter().collect();
    }
    fresh
        .choose_multiple(rng, count)
        .map(|w| (*w).clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bank(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_default_bank_has_no_duplicates() {
        let words = default_bank();
        let unique: HashSet<_> = words.iter().collect();
        assert_eq!(unique.len(), words.len());
        assert!(words.len() >= 100);
    }

    #[test]
    fn test_candidates_are_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut used = HashSet::new();
        let picks = pick_candidates(&mut rng, &default_bank(), &mut used, 3);
        assert_eq!(picks.len(), 3);
        let unique: HashSet<_> = picks.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_candidates_skip_used_words() {
        let mut rng = StdRng::seed_from_u64(1);
        let words = bank(&["a", "b", "c", "d", "e"]);
        let mut used: HashSet<String> = ["a", "b"].iter().map(|w| w.to_string()).collect();
        for _ in 0..20 {
            let picks = pick_candidates(&mut rng, &words, &mut used, 3);
            assert!(!picks.contains(&"a".to_string()));
            assert!(!picks.contains(&"b".to_string()));
        }
    }

    #[test]
    fn test_exhausted_bank_recycles() {
        let mut rng = StdRng::seed_from_u64(3);
        let words = bank(&["a", "b", "c"]);
        let mut used: HashSet<String> = ["a", "b"].iter().map(|w| w.to_string()).collect();
        let picks = pick_candidates(&mut rng, &words, &mut used, 3);
        assert_eq!(picks.len(), 3);
        assert!(used.is_empty());
    }

    #[test]
    fn test_small_bank_returns_what_it_has() {
        let mut rng = StdRng::seed_from_u64(3);
        let words = bank(&["only"]);
        let picks = pick_candidates(&mut rng, &words, &mut HashSet::new(), 3);
        assert_eq!(picks, vec!["only".to_string()]);
    }
}
