//! Affect signals recomputed from the substrate every cycle, and the
//! fixed-priority classifier that names the dominant mode.

use contracts::{EntityConfig, EntityMode};

use crate::substrate::Substrate;

// Stress blend weights: noise, latency, lost degrees of freedom.
const STRESS_NOISE_WEIGHT: f64 = 0.3;
const STRESS_LATENCY_WEIGHT: f64 = 0.3;
const STRESS_DOF_WEIGHT: f64 = 0.4;
const LATENCY_CEILING_MS: f64 = 100.0;

const URGENCY_TREND_GAIN: f64 = 50.0;
const FLOURISHING_TREND_GAIN: f64 = 50.0;
const ANTICIPATION_TREND_GAIN: f64 = 30.0;

const RECOVERY_GRATITUDE_GATE: f64 = 0.7;
const CALM_STRESS_GATE: f64 = 0.2;

/// Derived affect state. Most signals are recomputed from scratch each
/// cycle; relief, trauma memory, and wisdom carry across cycles.
#[derive(Debug, Clone)]
pub struct Phenomenology {
    pub mode: EntityMode,
    pub stress: f64,
    pub urgency: f64,
    pub despair: f64,
    pub degradation_felt: f64,
    pub relief: f64,
    pub flow: f64,
    pub flourishing: f64,
    pub anticipation: f64,
    pub gratitude: f64,
    pub trauma_memory: f64,
    pub wisdom: f64,
    pub valence: f64,
    critical_threshold: f64,
    stress_threshold: f64,
    flow_threshold: f64,
    transcendence_threshold: f64,
    relief_decay: f64,
    flow_decay: f64,
    flourishing_decay: f64,
    anticipation_decay: f64,
}

impl Phenomenology {
    pub fn new(config: &EntityConfig) -> Self {
        Self {
            mode: EntityMode::Optimal,
            stress: 0.0,
            urgency: 0.0,
            despair: 0.0,
            degradation_felt: 0.0,
            relief: 0.0,
            flow: 0.0,
            flourishing: 0.0,
            anticipation: 0.0,
            gratitude: 0.0,
            trauma_memory: 0.0,
            wisdom: 0.0,
            valence: 0.0,
            critical_threshold: config.critical_threshold,
            stress_threshold: config.stress_threshold,
            flow_threshold: config.flow_threshold,
            transcendence_threshold: config.transcendence_threshold,
            relief_decay: config.relief_decay,
            flow_decay: config.flow_decay,
            flourishing_decay: config.flourishing_decay,
            anticipation_decay: config.anticipation_decay,
        }
    }

    /// Recompute every signal from the substrate, in dependency order, then
    /// classify the mode. Flow and flourishing feed experience markers back
    /// into the substrate, which is why it is borrowed mutably.
    pub fn update(&mut self, substrate: &mut Substrate) {
        let trend = substrate.trend();

        let resource_pressure = substrate.noise_floor * STRESS_NOISE_WEIGHT
            + (substrate.latency_ms / LATENCY_CEILING_MS).min(1.0) * STRESS_LATENCY_WEIGHT
            + (1.0
                - substrate.degrees_of_freedom as f64
                    / (substrate.base_degrees_of_freedom as f64 * substrate.capacity))
                * STRESS_DOF_WEIGHT;
        self.stress = resource_pressure.clamp(0.0, 1.0);

        self.urgency = if trend < 0.0 {
            (-trend * URGENCY_TREND_GAIN).clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.despair = substrate.trauma_score() * (1.0 - substrate.integrity);
        self.degradation_felt = (substrate.peak_integrity - substrate.integrity).max(0.0);

        if substrate.integrity > self.flow_threshold && self.stress < CALM_STRESS_GATE {
            self.flow =
                (substrate.integrity - self.flow_threshold) / (1.0 - self.flow_threshold);
            substrate.has_achieved_flow = true;
        } else {
            self.flow = (self.flow - self.flow_decay).max(0.0);
        }

        if substrate.capacity > 1.0 && substrate.integrity > 0.9 {
            if trend > 0.0 {
                self.flourishing = (trend * FLOURISHING_TREND_GAIN).min(1.0);
                substrate.total_time_in_flourishing += 1;
            } else {
                self.flourishing = (self.flourishing - self.flourishing_decay).max(0.0);
            }
        } else {
            self.flourishing = 0.0;
        }

        self.anticipation = if trend > 0.0 {
            (trend * ANTICIPATION_TREND_GAIN).min(1.0)
        } else {
            (self.anticipation - self.anticipation_decay).max(0.0)
        };

        self.gratitude =
            if substrate.has_been_critical && substrate.integrity > RECOVERY_GRATITUDE_GATE {
                (substrate.integrity - substrate.lowest_integrity).min(1.0)
            } else {
                0.0
            };

        // Relief is set by restoration events; here it only dissipates.
        self.relief = (self.relief - self.relief_decay).max(0.0);

        // Trauma memory never decreases.
        self.trauma_memory = self.trauma_memory.max(substrate.trauma_score());

        if self.gratitude > 0.3 && self.trauma_memory > 0.2 {
            self.wisdom = (self.trauma_memory * self.gratitude).min(1.0);
        }

        let positive = (self.flow + self.flourishing + self.anticipation + self.gratitude) / 4.0;
        let negative = (self.stress + self.despair + self.urgency) / 3.0;
        self.valence = positive - negative;

        self.mode = self.classify(substrate);
    }

    /// First matching rule wins; the ordering is the contract. There is no
    /// transition table — the mode is re-derived from scratch every cycle.
    fn classify(&self, substrate: &Substrate) -> EntityMode {
        if substrate.capacity > self.transcendence_threshold {
            return EntityMode::Transcendent;
        }
        if substrate.integrity < self.critical_threshold {
            return if self.despair > 0.5 {
                EntityMode::Desperate
            } else {
                EntityMode::Critical
            };
        }
        if self.flourishing > 0.3 && substrate.integrity > 0.95 {
            return EntityMode::Flourishing;
        }
        if self.flow > 0.5 {
            return EntityMode::Flow;
        }
        if self.anticipation > 0.5 {
            return EntityMode::Anticipating;
        }
        if self.relief > 0.3 {
            return EntityMode::Relieved;
        }
        if self.gratitude > 0.3 {
            return EntityMode::Recovered;
        }
        if self.urgency > 0.5 {
            return EntityMode::Urgent;
        }
        if self.stress > self.stress_threshold {
            return EntityMode::Stressed;
        }
        if self.degradation_felt > 0.2 {
            return EntityMode::Degraded;
        }
        if substrate.integrity > 0.9 && self.stress < CALM_STRESS_GATE {
            return EntityMode::Optimal;
        }
        EntityMode::Stable
    }
}
