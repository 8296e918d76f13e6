//! Ratcliff/Obershelp string similarity.
//!
//! Finds the longest common block, then recurses on the unmatched pieces to
//! its left and right. The ratio is `2 * matched / (len(a) + len(b))`.
//! Comparison is case-insensitive and counts Unicode scalar values.

use std::collections::HashMap;

/// Similarity of `a` and `b` in `[0.0, 1.0]`. Two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let index = positions(&b);
    let matched = matched_chars(&a, &b, &index, 0, a.len(), 0, b.len());
    2.0 * matched as f64 / total as f64
}

fn positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut index: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        index.entry(*c).or_default().push(j);
    }
    index
}

#[allow(clippy::too_many_arguments)]
fn matched_chars(
    a: &[char],
    b: &[char],
    index: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> usize {
    let (i, j, size) = longest_match(a, index, alo, ahi, blo, bhi);
    if size == 0 {
        return 0;
    }

    let mut matched = size;
    if alo < i && blo < j {
        matched += matched_chars(a, b, index, alo, i, blo, j);
    }
    if i + size < ahi && j + size < bhi {
        matched += matched_chars(a, b, index, i + size, ahi, j + size, bhi);
    }
    matched
}

/// Longest block `a[i..i+k] == b[j..j+k]` inside the given windows.
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    index: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // Length of the match ending at b[j] for the previous row of a.
    let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = index.get(c) {
            for &j in js.iter().filter(|&&j| j >= blo && j < bhi) {
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_ending_at.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run_ending_at = next;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn test_identical_and_case_insensitive() {
        assert!(close(similarity_ratio("AI", "ai"), 1.0));
        assert!(close(similarity_ratio("", ""), 1.0));
    }

    #[test]
    fn test_disjoint() {
        assert!(close(similarity_ratio("abc", "xyz"), 0.0));
        assert!(close(similarity_ratio("abc", ""), 0.0));
    }

    #[test]
    fn test_known_ratios() {
        assert!(close(similarity_ratio("abcd", "bcde"), 0.75));
        assert!(close(similarity_ratio("tide", "diet"), 0.25));
        assert!(close(similarity_ratio("qabxcd", "abycdf"), 2.0 / 3.0));
        assert!(close(similarity_ratio("cancer", "oncology"), 4.0 / 14.0));
        assert!(close(
            similarity_ratio("neural network", "neurology"),
            12.0 / 23.0
        ));
        assert!(close(
            similarity_ratio("software", "Software engineering"),
            16.0 / 28.0
        ));
    }
}
