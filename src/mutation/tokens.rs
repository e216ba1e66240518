//! Token Pool
//!
//! The raw material defects are made of: single letters, single digits,
//! the structural characters of the genome format, and optionally the
//! genome's own vocabulary as whole keywords. Keywords come padded with
//! spaces so a lucky insert lands as a word, not a splice.

use rand::Rng;

use crate::genome::KNOWN_KEYS;

/// Characters that shape genome lines rather than fill them.
const STRUCTURAL: [char; 4] = ['\n', ':', '=', '%'];

/// Uniformly sampled set of candidate mutation tokens.
pub struct TokenPool {
    tokens: Vec<String>,
}

impl TokenPool {
    /// Build the standard pool. With `use_keywords`, whole genome keys
    /// join the single-character tokens.
    pub fn standard(use_keywords: bool) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        for c in ('a'..='z').chain('A'..='Z').chain('0'..='9') {
            tokens.push(c.to_string());
        }
        for c in STRUCTURAL {
            tokens.push(c.to_string());
        }
        if use_keywords {
            for key in KNOWN_KEYS {
                tokens.push(format!(" {key} "));
            }
        }
        TokenPool { tokens }
    }

    /// Draw one token uniformly.
    pub fn pick(&self, rng: &mut impl Rng) -> &str {
        &self.tokens[rng.gen_range(0..self.tokens.len())]
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pool_without_keywords_is_single_characters() {
        let pool = TokenPool::standard(false);
        // 26 + 26 + 10 letters and digits, 4 structural.
        assert_eq!(pool.len(), 66);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            assert_eq!(pool.pick(&mut rng).chars().count(), 1);
        }
    }

    #[test]
    fn test_pool_with_keywords_adds_padded_keys() {
        let pool = TokenPool::standard(true);
        assert_eq!(pool.len(), 66 + KNOWN_KEYS.len());
        assert!(pool.tokens.contains(&" max_age ".to_string()));
        assert!(pool.tokens.contains(&" reproduction_chance ".to_string()));
    }

    #[test]
    fn test_percent_appears_exactly_once() {
        let pool = TokenPool::standard(false);
        let percents = pool.tokens.iter().filter(|t| t.as_str() == "%").count();
        assert_eq!(percents, 1);
    }
}
