//! Genome
//!
//! The heritable payload of a creature: a line-oriented text of
//! `key = value` knobs that govern its lifecycle. The raw text is what
//! gets copied with a defect at reproduction time, so the parser has to
//! shrug off the debris mutation leaves behind: blank lines, `%`
//! commentary, unknown keys, and lines that are not key-value at all
//! are silently ignored. A known key with a value that no longer parses
//! is fatal; that mutant is not viable.

use crate::error::GenomeError;
use crate::mutation::MutationWeights;

/// Every key the host understands. Also the reserved-word vocabulary for
/// the mutation token pool.
pub const KNOWN_KEYS: [&str; 13] = [
    "max_age",
    "max_energy",
    "min_energy",
    "hunger_threshold",
    "start_reproducing",
    "stop_reproducing",
    "retirement_age",
    "reproduction_chance",
    "weight_prepend",
    "weight_overwrite",
    "weight_insert",
    "weight_delete",
    "weight_append",
];

/// Parsed heritable parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Genome {
    /// Ticks until death by old age.
    pub max_age: u32,
    /// Energy at birth.
    pub max_energy: i64,
    /// At or below this, death by hunger.
    pub min_energy: i64,
    /// Below this, the creature eats instead of working.
    pub hunger_threshold: i64,
    /// First tick of the reproductive window (inclusive).
    pub start_reproducing: u32,
    /// Last tick of the reproductive window (inclusive).
    pub stop_reproducing: u32,
    /// Farming stops at this age.
    pub retirement_age: u32,
    /// Per-tick probability of a reproduction attempt inside the window.
    pub reproduction_chance: f64,
    /// Relative likelihood of each copy defect.
    pub weights: MutationWeights,
}

impl Default for Genome {
    fn default() -> Self {
        Genome {
            max_age: 100,
            max_energy: 40,
            min_energy: 0,
            hunger_threshold: 5,
            start_reproducing: 18,
            stop_reproducing: 45,
            retirement_age: 65,
            reproduction_chance: 0.5,
            weights: MutationWeights::default(),
        }
    }
}

impl Genome {
    /// Parse genome text, starting from the defaults and overriding
    /// whatever the text names.
    pub fn parse(text: &str) -> Result<Genome, GenomeError> {
        let mut genome = Genome::default();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                // Not a key-value line; mutation debris.
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            let number = index + 1;

            match key {
                "max_age" => genome.max_age = parse_value(number, key, value)?,
                "max_energy" => genome.max_energy = parse_value(number, key, value)?,
                "min_energy" => genome.min_energy = parse_value(number, key, value)?,
                "hunger_threshold" => genome.hunger_threshold = parse_value(number, key, value)?,
                "start_reproducing" => genome.start_reproducing = parse_value(number, key, value)?,
                "stop_reproducing" => genome.stop_reproducing = parse_value(number, key, value)?,
                "retirement_age" => genome.retirement_age = parse_value(number, key, value)?,
                "reproduction_chance" => {
                    genome.reproduction_chance = parse_value(number, key, value)?
                }
                "weight_prepend" => genome.weights.prepend = parse_value(number, key, value)?,
                "weight_overwrite" => genome.weights.overwrite = parse_value(number, key, value)?,
                "weight_insert" => genome.weights.insert = parse_value(number, key, value)?,
                "weight_delete" => genome.weights.delete = parse_value(number, key, value)?,
                "weight_append" => genome.weights.append = parse_value(number, key, value)?,
                _ => {}
            }
        }

        // The chance divides the reproduction pre-payment and feeds a
        // Bernoulli draw; outside (0, 1] both break down.
        if !(genome.reproduction_chance > 0.0 && genome.reproduction_chance <= 1.0) {
            return Err(GenomeError::OutOfRange {
                key: "reproduction_chance".to_string(),
                value: genome.reproduction_chance.to_string(),
            });
        }

        Ok(genome)
    }
}

fn parse_value<T: std::str::FromStr>(
    line: usize,
    key: &str,
    value: &str,
) -> Result<T, GenomeError> {
    value.parse().map_err(|_| GenomeError::BadValue {
        line,
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_defaults() {
        let genome = Genome::parse("").unwrap();
        assert_eq!(genome, Genome::default());
    }

    #[test]
    fn test_parse_overrides_named_keys() {
        let genome = Genome::parse("max_age = 7\nreproduction_chance = 0.25\n").unwrap();
        assert_eq!(genome.max_age, 7);
        assert_eq!(genome.reproduction_chance, 0.25);
        assert_eq!(genome.max_energy, 40);
    }

    #[test]
    fn test_commentary_blanks_and_debris_are_ignored() {
        let text = "% a genome\n\nxqj3\nmax_age\nmax_agge = 9\nmax_age = 50\n";
        let genome = Genome::parse(text).unwrap();
        assert_eq!(genome.max_age, 50);
    }

    #[test]
    fn test_commented_out_key_is_ignored() {
        let genome = Genome::parse("% max_age = 1\n").unwrap();
        assert_eq!(genome.max_age, 100);
    }

    #[test]
    fn test_bad_value_on_known_key_is_fatal() {
        let err = Genome::parse("max_age = fifty\n").unwrap_err();
        match err {
            GenomeError::BadValue { line, key, .. } => {
                assert_eq!(line, 1);
                assert_eq!(key, "max_age");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_every_known_key_is_actually_known() {
        for key in KNOWN_KEYS {
            let text = format!("{key} = not-a-number\n");
            assert!(
                Genome::parse(&text).is_err(),
                "`{key}` should be parsed, not ignored"
            );
        }
    }

    #[test]
    fn test_zero_reproduction_chance_is_out_of_range() {
        let err = Genome::parse("reproduction_chance = 0\n").unwrap_err();
        assert!(matches!(err, GenomeError::OutOfRange { .. }));
    }

    #[test]
    fn test_chance_above_one_is_out_of_range() {
        assert!(Genome::parse("reproduction_chance = 1.5\n").is_err());
    }

    #[test]
    fn test_duplicate_key_last_one_wins() {
        let genome = Genome::parse("max_age = 10\nmax_age = 20\n").unwrap();
        assert_eq!(genome.max_age, 20);
    }

    #[test]
    fn test_spacing_around_equals_is_flexible() {
        let genome = Genome::parse("max_age=3\n  max_energy   =   12\n").unwrap();
        assert_eq!(genome.max_age, 3);
        assert_eq!(genome.max_energy, 12);
    }
}
