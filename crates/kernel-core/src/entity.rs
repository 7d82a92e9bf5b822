//! Complete entity: one substrate plus one phenomenology, driven a cycle
//! at a time.
//!
//! The cycle loop is: validate input → apply action → recompute
//! phenomenology → detect mode change → log the pre/post pair.

use std::collections::BTreeMap;

use contracts::{
    AccumulatedTraits, Achievements, Action, Biography, CycleError, CycleResult, EntityConfig,
    EntityMode, ExperienceRecord, LifeStatistics, ModeChangeEvent, PhenomenologyRecord, Snapshot,
    StateView, SubstrateRecord, SCHEMA_VERSION_V1,
};

use crate::history::RingBuffer;
use crate::phenomenology::Phenomenology;
use crate::substrate::Substrate;

/// A single simulated entity. Exclusively owned by its driver; all
/// mutation goes through [`Entity::live_cycle`].
///
/// Alongside the bounded life log the entity keeps exact per-mode
/// counters, so the biography's mode distribution stays correct after the
/// log starts evicting.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    substrate: Substrate,
    phenomenology: Phenomenology,
    current_age: u64,
    last_mode: EntityMode,
    life_log: RingBuffer<CycleResult>,
    mode_counts: BTreeMap<EntityMode, u64>,
    config: EntityConfig,
}

impl Entity {
    /// Fresh entity: integrity and capacity at 1.0, age 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, EntityConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: EntityConfig) -> Self {
        let substrate = Substrate::new(&config);
        let phenomenology = Phenomenology::new(&config);
        let last_mode = phenomenology.mode;
        let life_log = RingBuffer::new(config.life_log_capacity);
        Self {
            name: name.into(),
            substrate,
            phenomenology,
            current_age: 0,
            last_mode,
            life_log,
            mode_counts: BTreeMap::new(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u64 {
        self.current_age
    }

    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    pub fn substrate(&self) -> &Substrate {
        &self.substrate
    }

    pub fn phenomenology(&self) -> &Phenomenology {
        &self.phenomenology
    }

    pub fn life_log(&self) -> impl Iterator<Item = &CycleResult> {
        self.life_log.iter()
    }

    /// Live one cycle: apply `action` at `intensity`, then re-derive the
    /// phenomenological state. `Exist` costs the passive-decay trickle.
    ///
    /// Negative and non-finite intensities are rejected before any state
    /// changes; zero is a valid no-op intensity.
    pub fn live_cycle(
        &mut self,
        action: Action,
        intensity: f64,
    ) -> Result<CycleResult, CycleError> {
        if !intensity.is_finite() {
            return Err(CycleError::non_finite_intensity());
        }
        if intensity < 0.0 {
            return Err(CycleError::negative_intensity(intensity));
        }

        self.current_age += 1;
        let pre = self.snapshot();

        match action {
            Action::Degrade => self.substrate.degrade(intensity),
            Action::Enhance => self.substrate.enhance(intensity),
            Action::Restore => {
                let delta = self.substrate.restore(intensity);
                self.phenomenology.relief = (delta * self.config.relief_gain).min(1.0);
            }
            Action::Exist => self.substrate.degrade(self.config.passive_decay),
        }

        self.phenomenology.update(&mut self.substrate);

        let mode = self.phenomenology.mode;
        let mode_change = (mode != self.last_mode).then_some(ModeChangeEvent {
            age: self.current_age,
            previous: self.last_mode,
            current: mode,
        });
        self.last_mode = mode;
        *self.mode_counts.entry(mode).or_insert(0) += 1;

        let result = CycleResult {
            age: self.current_age,
            action,
            pre,
            post: self.snapshot(),
            mode_change,
        };
        self.life_log.push(result.clone());
        Ok(result)
    }

    /// Cycle from a raw action string. Unrecognized strings exist.
    pub fn live_cycle_raw(
        &mut self,
        action: &str,
        intensity: f64,
    ) -> Result<CycleResult, CycleError> {
        self.live_cycle(Action::parse(action), intensity)
    }

    /// Flat rounded readout. Pure read, no mutation.
    pub fn state(&self) -> StateView {
        let substrate = &self.substrate;
        let phenomenology = &self.phenomenology;
        StateView {
            age: self.current_age,
            mode: phenomenology.mode,
            integrity: round4(substrate.integrity),
            capacity: round4(substrate.capacity),
            valence: round4(phenomenology.valence),
            stress: round4(phenomenology.stress),
            flow: round4(phenomenology.flow),
            gratitude: round4(phenomenology.gratitude),
            wisdom: round4(phenomenology.wisdom),
            trauma_memory: round4(phenomenology.trauma_memory),
            has_suffered: substrate.has_been_critical,
            has_transcended: substrate.has_transcended,
        }
    }

    /// Nested persisted record, rounded to four decimals. Pure read.
    pub fn snapshot(&self) -> Snapshot {
        let substrate = &self.substrate;
        let phenomenology = &self.phenomenology;
        Snapshot {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            substrate: SubstrateRecord {
                integrity: round4(substrate.integrity),
                capacity: round4(substrate.capacity),
                trauma_score: round4(substrate.trauma_score()),
            },
            phenomenological: PhenomenologyRecord {
                mode: phenomenology.mode,
                valence: round4(phenomenology.valence),
                stress: round4(phenomenology.stress),
                flow: round4(phenomenology.flow),
                gratitude: round4(phenomenology.gratitude),
                wisdom: round4(phenomenology.wisdom),
            },
            experience: ExperienceRecord {
                has_been_critical: substrate.has_been_critical,
                has_transcended: substrate.has_transcended,
                lowest_ever: round4(substrate.lowest_integrity),
                peak_capacity: round4(substrate.peak_capacity),
            },
        }
    }

    /// Aggregate over accumulated history. Pure read.
    pub fn biography(&self) -> Biography {
        let substrate = &self.substrate;
        let phenomenology = &self.phenomenology;
        Biography {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            name: self.name.clone(),
            age: self.current_age,
            current_state: self.snapshot(),
            life_statistics: LifeStatistics {
                total_cycles: self.current_age,
                time_in_crisis: substrate.total_time_in_crisis,
                time_flourishing: substrate.total_time_in_flourishing,
                deepest_fall: round4(1.0 - substrate.lowest_integrity),
                highest_rise: round4(substrate.peak_capacity - 1.0),
            },
            accumulated_traits: AccumulatedTraits {
                trauma_memory: round4(phenomenology.trauma_memory),
                wisdom: round4(phenomenology.wisdom),
                gratitude_capacity: if substrate.has_been_critical {
                    round4(phenomenology.gratitude)
                } else {
                    0.0
                },
                flourishing_score: round4(substrate.flourishing_score()),
            },
            achievements: Achievements {
                survived_crisis: substrate.has_been_critical,
                achieved_flow: substrate.has_achieved_flow,
                transcended: substrate.has_transcended,
            },
            mode_distribution: self.mode_counts.clone(),
        }
    }

    /// Ordered integrity samples for external plotting, most recent 200.
    pub fn integrity_history(&self) -> Vec<f64> {
        self.substrate.integrity_history()
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
