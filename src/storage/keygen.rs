use crate::core::{DbError, Result};
use rand::Rng;
use std::ops::RangeInclusive;

pub const DEFAULT_ALPHABET: &str =
    "QWERTYUIOPASDFGHJKLZXCVBNMqwertyuiopasdfghjklzxcvbnm1234567890!@#$%^&";
pub const DEFAULT_SEPARATOR: &str = "///";
pub const DEFAULT_MAX_ATTEMPTS: usize = 32;

/// Random document identity generator.
///
/// An identity is three segments of random alphabet characters, each with a
/// random length drawn from its range, joined by the separator.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    alphabet: Vec<char>,
    segments: [RangeInclusive<usize>; 3],
    separator: String,
    max_attempts: usize,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            segments: [10..=20, 20..=40, 30..=60],
            separator: DEFAULT_SEPARATOR.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the string placed between segments
    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Set segment length ranges. A reversed range such as `5..=2` is read
    /// as `2..=5`.
    pub fn segments(mut self, segments: [RangeInclusive<usize>; 3]) -> Self {
        self.segments = segments.map(|range| {
            let (start, end) = range.into_inner();
            start.min(end)..=start.max(end)
        });
        self
    }

    /// Set how many candidates `generate_unique` tries before giving up
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut parts = Vec::with_capacity(self.segments.len());
        for range in &self.segments {
            let len = rng.gen_range(range.clone());
            let mut part = String::with_capacity(len);
            for _ in 0..len {
                part.push(self.alphabet[rng.gen_range(0..self.alphabet.len())]);
            }
            parts.push(part);
        }
        parts.join(&self.separator)
    }

    /// Generate candidates until `taken` rejects one.
    pub fn generate_unique(&self, taken: impl Fn(&str) -> bool) -> Result<String> {
        for _ in 0..self.max_attempts {
            let candidate = self.generate();
            if !taken(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!(candidate = %candidate, "generated id already taken, retrying");
        }
        Err(DbError::KeyGenerationExhausted(self.max_attempts))
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_generated_shape() {
        let generator = KeyGenerator::new();
        for _ in 0..50 {
            let key = generator.generate();
            let parts: Vec<&str> = key.split(DEFAULT_SEPARATOR).collect();
            assert_eq!(parts.len(), 3);
            assert!((10..=20).contains(&parts[0].len()));
            assert!((20..=40).contains(&parts[1].len()));
            assert!((30..=60).contains(&parts[2].len()));
            assert!(parts.iter().all(|p| p.chars().all(|c| DEFAULT_ALPHABET.contains(c))));
        }
    }

    #[test]
    fn test_custom_separator() {
        let generator = KeyGenerator::new().separator("-").segments([2..=2, 3..=3, 4..=4]);
        let key = generator.generate();
        // the default alphabet has no '-'
        assert_eq!(key.len(), 2 + 1 + 3 + 1 + 4);
        assert_eq!(key.matches('-').count(), 2);
    }

    #[test]
    fn test_reversed_segment_range_is_normalized() {
        let generator = KeyGenerator::new().separator("-").segments([5..=2, 1..=1, 0..=0]);
        for _ in 0..50 {
            let key = generator.generate();
            let parts: Vec<&str> = key.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert!((2..=5).contains(&parts[0].len()));
            assert_eq!(parts[1].len(), 1);
            assert!(parts[2].is_empty());
        }
    }

    #[test]
    fn test_unique_retries_until_free() {
        let generator = KeyGenerator::new();
        let calls = Cell::new(0);
        let key = generator
            .generate_unique(|_| {
                calls.set(calls.get() + 1);
                calls.get() < 3
            })
            .unwrap();
        assert_eq!(calls.get(), 3);
        assert!(!key.is_empty());
    }

    #[test]
    fn test_unique_gives_up() {
        let generator = KeyGenerator::new().max_attempts(4);
        match generator.generate_unique(|_| true) {
            Err(DbError::KeyGenerationExhausted(n)) => assert_eq!(n, 4),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
