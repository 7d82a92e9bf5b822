//! Resource substrate: integrity and capacity, the properties derived from
//! them, and the historical extrema the entity can never shed.

use contracts::EntityConfig;

use crate::history::RingBuffer;

const BASE_LATENCY_MS: f64 = 10.0;
const EFFECTIVE_FLOOR: f64 = 0.1;
const NOISE_DEGRADE_FACTOR: f64 = 0.5;
const NOISE_ENHANCE_FACTOR: f64 = 0.3;

/// Mutable resource model, exclusively owned by one entity. Degradation
/// and enhancement are asymmetric under noise: the same noise floor
/// amplifies damage and dampens repair.
#[derive(Debug, Clone)]
pub struct Substrate {
    pub integrity: f64,
    pub capacity: f64,
    pub latency_ms: f64,
    pub noise_floor: f64,
    pub degrees_of_freedom: i64,
    pub base_degrees_of_freedom: i64,
    pub total_cycles: u64,
    pub peak_integrity: f64,
    pub lowest_integrity: f64,
    pub peak_capacity: f64,
    pub has_been_critical: bool,
    pub has_achieved_flow: bool,
    pub has_transcended: bool,
    pub total_time_in_crisis: u64,
    pub total_time_in_flourishing: u64,
    max_capacity: f64,
    critical_threshold: f64,
    transcendence_threshold: f64,
    capacity_growth_gate: f64,
    capacity_growth_rate: f64,
    crisis_window: f64,
    trend_window: usize,
    integrity_history: RingBuffer<f64>,
}

impl Substrate {
    pub fn new(config: &EntityConfig) -> Self {
        let mut substrate = Self {
            integrity: 1.0,
            capacity: 1.0,
            latency_ms: BASE_LATENCY_MS,
            noise_floor: 0.0,
            degrees_of_freedom: config.base_degrees_of_freedom,
            base_degrees_of_freedom: config.base_degrees_of_freedom,
            total_cycles: 0,
            peak_integrity: 1.0,
            lowest_integrity: 1.0,
            peak_capacity: 1.0,
            has_been_critical: false,
            has_achieved_flow: false,
            has_transcended: false,
            total_time_in_crisis: 0,
            total_time_in_flourishing: 0,
            max_capacity: config.max_capacity,
            critical_threshold: config.critical_threshold,
            transcendence_threshold: config.transcendence_threshold,
            capacity_growth_gate: config.capacity_growth_gate,
            capacity_growth_rate: config.capacity_growth_rate,
            crisis_window: config.crisis_window,
            trend_window: config.trend_window,
            integrity_history: RingBuffer::new(config.history_capacity),
        };
        substrate.update_derived();
        substrate
    }

    /// Apply one degradation step. The existing noise floor amplifies the
    /// damage, so decay compounds as the substrate wears down.
    pub fn degrade(&mut self, intensity: f64) {
        self.total_cycles += 1;

        let actual = intensity * (1.0 + self.noise_floor * NOISE_DEGRADE_FACTOR);
        self.integrity = (self.integrity - actual).max(0.0);
        self.track_extrema();

        if self.integrity < self.critical_threshold {
            self.has_been_critical = true;
            self.total_time_in_crisis += 1;
        }

        self.update_derived();
        self.record_history();
    }

    /// Apply one enhancement step. Noise dampens the gain, and capacity
    /// only grows while integrity is near its ceiling.
    pub fn enhance(&mut self, intensity: f64) {
        self.total_cycles += 1;

        let actual = intensity * (1.0 - self.noise_floor * NOISE_ENHANCE_FACTOR);
        self.integrity = (self.integrity + actual).min(1.0);

        if self.integrity > self.capacity_growth_gate {
            let growth = intensity * self.capacity_growth_rate;
            self.capacity = (self.capacity + growth).min(self.max_capacity);
            if self.capacity > self.transcendence_threshold {
                self.has_transcended = true;
            }
        }

        self.track_extrema();
        self.update_derived();
        self.record_history();
    }

    /// Unconditional repair. Returns the integrity delta actually applied,
    /// which downstream relief signaling is scaled by. Leaves cycle
    /// counters and the history buffer untouched.
    pub fn restore(&mut self, amount: f64) -> f64 {
        let old = self.integrity;
        self.integrity = (self.integrity + amount).min(1.0);
        self.track_extrema();
        self.update_derived();
        self.integrity - old
    }

    /// Integrity slope over the configured window. Positive is improving,
    /// negative is degrading; zero until the window has filled.
    pub fn trend(&self) -> f64 {
        self.trend_over(self.trend_window)
    }

    pub fn trend_over(&self, window: usize) -> f64 {
        if window == 0 || self.integrity_history.len() < window {
            return 0.0;
        }
        let newest = self.integrity_history.from_end(0).copied().unwrap_or(0.0);
        let oldest = self
            .integrity_history
            .from_end(window - 1)
            .copied()
            .unwrap_or(0.0);
        (newest - oldest) / window as f64
    }

    /// Depth of the worst fall times normalized time spent in crisis.
    /// Zero for a substrate that has never been critical.
    pub fn trauma_score(&self) -> f64 {
        if !self.has_been_critical {
            return 0.0;
        }
        let depth = 1.0 - self.lowest_integrity;
        let duration = (self.total_time_in_crisis as f64 / self.crisis_window).min(1.0);
        depth * duration
    }

    /// Height above the original design envelope times normalized time
    /// spent flourishing. Zero until the substrate has transcended.
    pub fn flourishing_score(&self) -> f64 {
        if !self.has_transcended {
            return 0.0;
        }
        let height = self.peak_capacity - 1.0;
        let duration = (self.total_time_in_flourishing as f64 / self.crisis_window).min(1.0);
        height * duration
    }

    /// Ordered integrity samples, oldest first, most recent 200. Exposed
    /// for external trend consumers and plotting collaborators.
    pub fn integrity_history(&self) -> Vec<f64> {
        self.integrity_history.iter().copied().collect()
    }

    pub fn history_len(&self) -> usize {
        self.integrity_history.len()
    }

    fn track_extrema(&mut self) {
        if self.integrity < self.lowest_integrity {
            self.lowest_integrity = self.integrity;
        }
        if self.integrity > self.peak_integrity {
            self.peak_integrity = self.integrity;
        }
        if self.capacity > self.peak_capacity {
            self.peak_capacity = self.capacity;
        }
    }

    fn update_derived(&mut self) {
        let effective = self.integrity * self.capacity;
        self.latency_ms = BASE_LATENCY_MS / effective.max(EFFECTIVE_FLOOR);
        self.noise_floor = ((1.0 - self.integrity) * 0.5).max(0.0);
        self.degrees_of_freedom =
            (self.base_degrees_of_freedom as f64 * effective).floor() as i64;
    }

    fn record_history(&mut self) {
        self.integrity_history.push(self.integrity);
    }
}
