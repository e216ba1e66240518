//! Genesis
//!
//! The founding genome for first-generation creatures launched without
//! an inherited artifact. The rendered text is exactly what the parser
//! reads back, commentary included; commentary is heritable material
//! like everything else in the file.

use crate::genome::Genome;

/// Render the default genome text.
pub fn starter_genome() -> String {
    let genome = Genome::default();
    format!(
        "% germline genome\n\
         % one knob per line; lines starting with % are commentary\n\
         max_age = {}\n\
         max_energy = {}\n\
         min_energy = {}\n\
         hunger_threshold = {}\n\
         start_reproducing = {}\n\
         stop_reproducing = {}\n\
         retirement_age = {}\n\
         reproduction_chance = {}\n\
         weight_prepend = {}\n\
         weight_overwrite = {}\n\
         weight_insert = {}\n\
         weight_delete = {}\n\
         weight_append = {}\n",
        genome.max_age,
        genome.max_energy,
        genome.min_energy,
        genome.hunger_threshold,
        genome.start_reproducing,
        genome.stop_reproducing,
        genome.retirement_age,
        genome.reproduction_chance,
        genome.weights.prepend,
        genome.weights.overwrite,
        genome.weights.insert,
        genome.weights.delete,
        genome.weights.append,
    )
}
