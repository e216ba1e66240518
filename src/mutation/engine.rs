//! Mutation Engine
//!
//! Weighted random choice and the single-defect copy. Every copy a
//! creature makes of its genome passes through `flawed_copy` exactly
//! once: one defect, one token, no compounding.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::MutationError;

use super::tokens::TokenPool;

/// The five ways a copy can go wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Defect {
    Prepend,
    Overwrite,
    Insert,
    Delete,
    Append,
}

/// Relative likelihood of each defect kind. Weights are relative, not
/// percentages; zero disables a kind entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationWeights {
    pub prepend: u32,
    pub overwrite: u32,
    pub insert: u32,
    pub delete: u32,
    pub append: u32,
}

impl Default for MutationWeights {
    fn default() -> Self {
        MutationWeights {
            prepend: 25,
            overwrite: 25,
            insert: 25,
            delete: 25,
            append: 25,
        }
    }
}

impl MutationWeights {
    /// The weight table in the fixed defect order.
    pub fn choices(&self) -> [(Defect, u32); 5] {
        [
            (Defect::Prepend, self.prepend),
            (Defect::Overwrite, self.overwrite),
            (Defect::Insert, self.insert),
            (Defect::Delete, self.delete),
            (Defect::Append, self.append),
        ]
    }
}

/// Pick one item with probability proportional to its weight.
///
/// Zero-weight items are never picked. Fails with `InvalidWeights` when
/// the table is empty or its weights sum to zero.
pub fn weighted_choice<T: Copy>(
    choices: &[(T, u32)],
    rng: &mut impl Rng,
) -> Result<T, MutationError> {
    let distribution = WeightedIndex::new(choices.iter().map(|(_, weight)| *weight))
        .map_err(|_| MutationError::InvalidWeights)?;
    Ok(choices[distribution.sample(rng)].0)
}

/// Apply one `defect` to `source`, using `token` as the new material.
///
/// Prepend and append work on any source. The indexed edits (overwrite,
/// insert, delete) aim at a uniformly random character and so need a
/// non-empty source; handing them an empty one is a caller bug, reported
/// as `EmptySource` rather than masked.
pub fn apply_defect(
    source: &str,
    defect: Defect,
    token: &str,
    rng: &mut impl Rng,
) -> Result<String, MutationError> {
    match defect {
        Defect::Prepend => Ok(format!("{token}{source}")),
        Defect::Append => Ok(format!("{source}{token}")),
        Defect::Overwrite | Defect::Insert | Defect::Delete => {
            let chars: Vec<char> = source.chars().collect();
            if chars.is_empty() {
                return Err(MutationError::EmptySource);
            }
            let at = rng.gen_range(0..chars.len());

            let mut copy = String::with_capacity(source.len() + token.len());
            copy.extend(&chars[..at]);
            match defect {
                Defect::Overwrite => {
                    copy.push_str(token);
                    copy.extend(&chars[at + 1..]);
                }
                Defect::Insert => {
                    copy.push_str(token);
                    copy.extend(&chars[at..]);
                }
                Defect::Delete => {
                    copy.extend(&chars[at + 1..]);
                }
                _ => unreachable!(),
            }
            Ok(copy)
        }
    }
}

/// Copy `source` with exactly one weighted random defect.
///
/// An empty source cannot be indexed into, so the copy of nothing is the
/// token itself, whatever defect was drawn.
pub fn flawed_copy(
    source: &str,
    weights: &MutationWeights,
    pool: &TokenPool,
    rng: &mut impl Rng,
) -> Result<String, MutationError> {
    let defect = weighted_choice(&weights.choices(), rng)?;
    let token = pool.pick(rng);
    if source.is_empty() {
        return Ok(token.to_string());
    }
    apply_defect(source, defect, token, rng)
}
