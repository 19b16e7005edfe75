//! Approximate word matching.
//!
//! A `Similarity` scores a (query, token) pair in [0, 1]; `CloseMatcher`
//! keeps tokens scoring at least the cutoff and returns the best few.

use pdfkb_core::error::{PdfKbError, Result};

/// Similarity strategy over two lower-cased strings.
pub trait Similarity: Send + Sync {
    fn name(&self) -> &str;

    /// Score in [0, 1]; 1 means identical.
    fn score(&self, query: &str, candidate: &str) -> f64;
}

/// 1 - levenshtein / max(len).
pub struct NormalizedLevenshtein;

impl Similarity for NormalizedLevenshtein {
    fn name(&self) -> &str {
        "levenshtein"
    }

    fn score(&self, query: &str, candidate: &str) -> f64 {
        strsim::normalized_levenshtein(query, candidate)
    }
}

/// Bigram overlap (Sørensen–Dice coefficient).
pub struct SorensenDice;

impl Similarity for SorensenDice {
    fn name(&self) -> &str {
        "sorensen_dice"
    }

    fn score(&self, query: &str, candidate: &str) -> f64 {
        strsim::sorensen_dice(query, candidate)
    }
}

/// Gestalt pattern matching: 2 * matched chars / total chars, where matched
/// chars come from recursively taking the longest common block.
pub struct RatcliffObershelp;

impl Similarity for RatcliffObershelp {
    fn name(&self) -> &str {
        "ratcliff_obershelp"
    }

    fn score(&self, query: &str, candidate: &str) -> f64 {
        let a: Vec<char> = candidate.chars().collect();
        let b: Vec<char> = query.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * matching_chars(&a, &b) as f64 / total as f64
    }
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, k) = longest_block(a, b);
    if k == 0 {
        return 0;
    }
    k + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + k..], &b[j + k..])
}

/// (start in a, start in b, length) of the longest common block.
/// Ties go to the block ending first in `a`, then in `b`.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for i in 0..a.len() {
        let mut cur = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                let k = prev[j] + 1;
                cur[j + 1] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        prev = cur;
    }
    best
}

/// Resolve a strategy by its config name.
pub fn similarity_from_name(name: &str) -> Result<Box<dyn Similarity>> {
    match name.trim().to_lowercase().as_str() {
        "levenshtein" | "normalized_levenshtein" => Ok(Box::new(NormalizedLevenshtein)),
        "sorensen_dice" | "dice" => Ok(Box::new(SorensenDice)),
        "ratcliff_obershelp" | "difflib" => Ok(Box::new(RatcliffObershelp)),
        other => Err(PdfKbError::Config(format!("Unknown similarity strategy: {other}"))),
    }
}

pub struct CloseMatcher {
    strategy: Box<dyn Similarity>,
    cutoff: f64,
    limit: usize,
}

impl CloseMatcher {
    pub fn new(strategy: Box<dyn Similarity>, cutoff: f64, limit: usize) -> Self {
        Self {
            strategy,
            cutoff,
            limit,
        }
    }

    /// Up to `limit` tokens with score >= cutoff, best first. Repeated
    /// tokens are kept. Equal scores order by token, descending.
    pub fn close_matches<'a, I>(&self, query: &str, tokens: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str)> = tokens
            .into_iter()
            .filter_map(|t| {
                let score = self.strategy.score(query, t);
                (score >= self.cutoff).then_some((score, t))
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(a.1)));
        scored
            .into_iter()
            .take(self.limit)
            .map(|(_, t)| t.to_string())
            .collect()
    }
}

impl Default for CloseMatcher {
    fn default() -> Self {
        Self::new(Box::new(NormalizedLevenshtein), 0.6, 3)
    }
}
