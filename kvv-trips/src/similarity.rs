//! Approximate string similarity for picking among suggestions.
//!
//! The score is not a normalised edit distance. It is kept bit-compatible
//! with the scoring existing integrations rely on: long runs are penalised
//! by the length of the first string, so beyond a handful of characters
//! almost every pair clamps to zero and ties are broken by order.

/// Similarity of two strings as an integer in `0..=100`.
///
/// Both strings are lower-cased and trimmed. The longest common run is
/// searched by brute force over every pair of start offsets; with `max` its
/// length and `p1`/`p2` its offsets, the raw score is
/// `max * 200 / (len1 + len2 - max + (p2 - p1)) - max * len1`, clamped.
/// Inputs of at most one character score 0.
///
/// # Examples
///
/// ```
/// use kvv_trips::similarity::similarity;
///
/// assert_eq!(similarity("ab", "AB"), 100);
/// assert_eq!(similarity("a", "b"), 0);
/// assert!(similarity("Karlsruhe Hauptbahnhof", "Karlsruhe Hauptbahnhof") <= 100);
/// ```
pub fn similarity(first: &str, second: &str) -> u8 {
    let first: Vec<char> = first.to_lowercase().trim().chars().collect();
    let second: Vec<char> = second.to_lowercase().trim().chars().collect();

    let len1 = first.len();
    let len2 = second.len();
    if len1 <= 1 || len2 <= 1 {
        return 0;
    }

    let (max, position1, position2) = longest_run(&first, &second);

    let (max, len1, len2) = (max as i64, len1 as i64, len2 as i64);
    let (position1, position2) = (position1 as i64, position2 as i64);

    // Never zero: with max > 0 it is at least len1 - position1 >= max.
    let denominator = len1 + len2 - max + (position2 - position1);
    let score = max * 200 / denominator - max * len1;

    score.clamp(0, 100) as u8
}

/// Longest common run of characters, as (length, offset in first, offset in
/// second). The earliest pair of offsets wins ties.
fn longest_run(first: &[char], second: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);

    for p in 0..first.len() {
        for q in 0..second.len() {
            let run = first[p..]
                .iter()
                .zip(&second[q..])
                .take_while(|(a, b)| a == b)
                .count();

            if run > best.0 {
                best = (run, p, q);
            }
        }
    }

    best
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The score always lies in 0..=100
        #[test]
        fn score_in_range(a in ".{0,30}", b in ".{0,30}") {
            prop_assert!(similarity(&a, &b) <= 100);
        }

        /// Case never changes the score
        #[test]
        fn case_insensitive(a in "[a-zA-Z ]{0,12}", b in "[a-zA-Z ]{0,12}") {
            prop_assert_eq!(similarity(&a, &b), similarity(&a.to_uppercase(), &b.to_uppercase()));
        }
    }
}
