//! Creature
//!
//! The lifecycle state machine. A creature ages one tick at a time:
//! it burns energy, dies of old age or hunger, eats when it must, and
//! otherwise either tries for offspring or farms the pool. All habitat
//! access goes through the arbiter and spawner seams, so the machine
//! itself stays deterministic given a seed.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::LifecycleError;
use crate::genome::Genome;
use crate::replication::Lineage;
use crate::telemetry::{EventSink, LifeEvent};
use crate::types::{
    CreatureState, DeathReason, EatOutcome, FarmOutcome, ResourceArbiter, Spawner,
};

use super::cancel::CancelToken;

/// Everything a creature is born knowing.
pub struct CreatureOptions {
    pub lineage: Lineage,
    pub max_depth: u32,
    pub genome: Genome,
    /// The inherited genome artifact, if the creature hatched from one.
    pub genome_path: Option<PathBuf>,
    pub seed: f64,
    pub tick_delay: Duration,
}

pub struct Creature {
    lineage: Lineage,
    genome: Genome,
    genome_path: Option<PathBuf>,
    age: u32,
    energy: i64,
    state: CreatureState,
    offspring: u32,
    tick_delay: Duration,
    rng: StdRng,
    pool: Box<dyn ResourceArbiter>,
    spawner: Box<dyn Spawner>,
    sink: EventSink,
}

impl Creature {
    /// Construct a creature. The generation depth cap is enforced here,
    /// before anything touches the habitat; a too-deep lineage fails
    /// with zero side effects.
    pub fn new(
        options: CreatureOptions,
        pool: Box<dyn ResourceArbiter>,
        spawner: Box<dyn Spawner>,
        sink: EventSink,
    ) -> Result<Self, LifecycleError> {
        let generation = options.lineage.generation();
        if generation > options.max_depth {
            return Err(LifecycleError::GenerationTooDeep {
                identity: options.lineage.to_string(),
                generation,
                max: options.max_depth,
            });
        }

        let creature = Creature {
            age: 0,
            energy: options.genome.max_energy,
            state: CreatureState::Alive,
            offspring: 0,
            rng: StdRng::seed_from_u64(options.seed.to_bits()),
            lineage: options.lineage,
            genome_path: options.genome_path,
            tick_delay: options.tick_delay,
            genome: options.genome,
            pool,
            spawner,
            sink,
        };
        creature.sink.emit(&LifeEvent::Born {
            id: creature.lineage.to_string(),
            generation,
        });
        info!(id = %creature.lineage, generation, "born");
        Ok(creature)
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn energy(&self) -> i64 {
        self.energy
    }

    pub fn state(&self) -> CreatureState {
        self.state
    }

    pub fn offspring(&self) -> u32 {
        self.offspring
    }

    pub fn is_alive(&self) -> bool {
        self.state == CreatureState::Alive
    }

    pub fn is_hungry(&self) -> bool {
        self.energy < self.genome.hunger_threshold
    }

    fn can_reproduce(&self) -> bool {
        self.age >= self.genome.start_reproducing
            && self.age <= self.genome.stop_reproducing
            && !self.is_hungry()
    }

    fn can_farm(&self) -> bool {
        self.age < self.genome.retirement_age && !self.is_hungry()
    }

    /// One step of life, in fixed order: age and burn, check death (old
    /// age before hunger), eat if hungry, then either try for offspring
    /// or work the pool. Reproduction and farming are mutually exclusive
    /// within a tick.
    pub fn tick(&mut self) {
        self.age += 1;
        self.energy -= 1;
        self.sink.emit(&LifeEvent::Tick {
            age: self.age,
            energy: self.energy,
        });

        if self.age >= self.genome.max_age {
            self.die(DeathReason::OldAge);
            return;
        }
        if self.energy <= self.genome.min_energy {
            self.die(DeathReason::Hunger);
            return;
        }

        if self.is_hungry() {
            // A successful meal tops energy back up to the threshold,
            // which un-hungers the creature for the rest of this tick.
            self.eat();
        }

        if self.can_reproduce() {
            if self.rng.gen_bool(self.genome.reproduction_chance) {
                self.reproduce();
            }
        } else if self.can_farm() {
            let crop = (self.energy - self.genome.hunger_threshold + 2) as u64;
            self.farm(crop);
        }
    }

    /// Top up to the hunger threshold, all or nothing. Failure leaves
    /// the creature hungry but otherwise unharmed.
    fn eat(&mut self) {
        let requested = (self.genome.hunger_threshold - self.energy) as u64;
        match self.pool.eat(requested) {
            Ok(outcome) => {
                if outcome == EatOutcome::Consumed {
                    self.energy += requested as i64;
                }
                self.sink.emit(&LifeEvent::Ate { requested, outcome });
                debug!(requested, outcome = outcome.as_str(), "ate");
            }
            Err(err) => warn!(error = %err, "eat failed, going without"),
        }
    }

    fn farm(&mut self, amount: u64) {
        match self.pool.farm(amount) {
            Ok(outcome) => {
                self.sink.emit(&LifeEvent::Farmed { amount, outcome });
                debug!(amount, outcome = outcome.as_str(), "farmed");
            }
            Err(err) => warn!(error = %err, "farm failed, crop lost"),
        }
    }

    /// Attempt one offspring. The attempt is paid for up front with a
    /// forced farm of `ceil(1 / reproduction_chance)` units, so a
    /// population cannot reproduce faster than it replenishes the pool.
    /// If the pre-payment cannot be deposited in time, the attempt
    /// lapses for this tick. Spawn failures are absorbed here; the
    /// parent's lifecycle continues regardless.
    fn reproduce(&mut self) {
        if !self.spawner.enabled() {
            return;
        }

        let upkeep = (1.0 / self.genome.reproduction_chance).ceil() as u64;
        match self.pool.farm(upkeep) {
            Ok(outcome) => {
                self.sink.emit(&LifeEvent::Farmed {
                    amount: upkeep,
                    outcome,
                });
                if outcome == FarmOutcome::TimedOut {
                    debug!("pool busy, skipping reproduction this tick");
                    return;
                }
            }
            Err(err) => {
                warn!(error = %err, "upkeep farm failed, skipping reproduction");
                return;
            }
        }

        let child = self.lineage.child(self.offspring);
        match self.spawner.spawn(&child, &mut self.rng) {
            Ok(record) => {
                self.offspring += 1;
                self.sink.emit(&LifeEvent::Spawned {
                    child: child.to_string(),
                    artifact: record.artifact,
                });
            }
            Err(err) => warn!(child = %child, error = %err, "spawn failed"),
        }
    }

    /// Terminal transition. Emits the death event and, when the creature
    /// hatched from a genome artifact, renames the artifact to carry the
    /// death reason. Rename failure is ignored; the grave marker is a
    /// courtesy, not a contract.
    fn die(&mut self, reason: DeathReason) {
        self.state = CreatureState::Dead(reason);
        self.sink.emit(&LifeEvent::Died {
            reason,
            age: self.age,
            energy: self.energy,
        });
        info!(reason = %reason, age = self.age, energy = self.energy, "died");

        if let Some(path) = &self.genome_path {
            if let Some(name) = path.file_name() {
                let marked = path.with_file_name(format!("{}.{}", name.to_string_lossy(), reason));
                if let Err(err) = fs::rename(path, &marked) {
                    debug!(path = %path.display(), error = %err, "could not mark artifact");
                }
            }
        }
    }

    /// Live for `ticks` ticks, or a full natural lifespan when zero
    /// (`live(0)` runs `max_age` ticks; long-standing behavior, kept).
    /// Cancellation is honored between ticks only; a cancelled creature
    /// stops mid-life and stays alive.
    pub async fn live(&mut self, ticks: u32, cancel: &CancelToken) {
        let goal = if ticks == 0 { self.genome.max_age } else { ticks };
        for _ in 0..goal {
            if cancel.is_cancelled() {
                self.sink.emit(&LifeEvent::Halted { age: self.age });
                info!(age = self.age, "halted");
                return;
            }
            self.tick();
            if !self.is_alive() {
                return;
            }
            if self.tick_delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.tick_delay).await;
            }
        }
    }
}
