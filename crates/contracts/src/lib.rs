//! v1 cross-boundary contracts for the entity kernel, experiment drivers, and exporters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION_V1: &str = "1.0";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Exist,
    Degrade,
    Enhance,
    Restore,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exist => "exist",
            Self::Degrade => "degrade",
            Self::Enhance => "enhance",
            Self::Restore => "restore",
        }
    }

    /// Unrecognized action strings fall back to `Exist`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "degrade" => Self::Degrade,
            "enhance" => Self::Enhance,
            "restore" => Self::Restore,
            _ => Self::Exist,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EntityMode {
    Critical,
    Desperate,
    Stressed,
    Urgent,
    Degraded,
    Relieved,
    Recovered,
    Stable,
    Optimal,
    Flow,
    Flourishing,
    Anticipating,
    Transcendent,
}

impl EntityMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Desperate => "desperate",
            Self::Stressed => "stressed",
            Self::Urgent => "urgent",
            Self::Degraded => "degraded",
            Self::Relieved => "relieved",
            Self::Recovered => "recovered",
            Self::Stable => "stable",
            Self::Optimal => "optimal",
            Self::Flow => "flow",
            Self::Flourishing => "flourishing",
            Self::Anticipating => "anticipating",
            Self::Transcendent => "transcendent",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModeCategory {
    Negative,
    Transitional,
    Positive,
}

/// Static mode-to-category mapping, looked up by consumers that need to
/// summarize a trajectory without caring about individual modes.
pub fn mode_category(mode: EntityMode) -> ModeCategory {
    match mode {
        EntityMode::Critical
        | EntityMode::Desperate
        | EntityMode::Stressed
        | EntityMode::Urgent
        | EntityMode::Degraded => ModeCategory::Negative,
        EntityMode::Relieved | EntityMode::Recovered | EntityMode::Stable => {
            ModeCategory::Transitional
        }
        EntityMode::Optimal
        | EntityMode::Flow
        | EntityMode::Flourishing
        | EntityMode::Anticipating
        | EntityMode::Transcendent => ModeCategory::Positive,
    }
}

/// All tunables of the substrate/phenomenology model in one place. The
/// default values are the canonical ones; variant runs override fields
/// instead of forking the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityConfig {
    pub schema_version: String,
    pub max_capacity: f64,
    pub base_degrees_of_freedom: i64,
    pub passive_decay: f64,
    pub history_capacity: usize,
    pub trend_window: usize,
    pub life_log_capacity: usize,
    pub critical_threshold: f64,
    pub stress_threshold: f64,
    pub flow_threshold: f64,
    pub transcendence_threshold: f64,
    pub capacity_growth_gate: f64,
    pub capacity_growth_rate: f64,
    pub crisis_window: f64,
    pub relief_gain: f64,
    pub relief_decay: f64,
    pub flow_decay: f64,
    pub flourishing_decay: f64,
    pub anticipation_decay: f64,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            max_capacity: 2.0,
            base_degrees_of_freedom: 100,
            passive_decay: 0.0001,
            history_capacity: 200,
            trend_window: 10,
            life_log_capacity: 1024,
            critical_threshold: 0.2,
            stress_threshold: 0.3,
            flow_threshold: 0.85,
            transcendence_threshold: 1.1,
            capacity_growth_gate: 0.95,
            capacity_growth_rate: 0.1,
            crisis_window: 50.0,
            relief_gain: 5.0,
            relief_decay: 0.05,
            flow_decay: 0.1,
            flourishing_decay: 0.05,
            anticipation_decay: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubstrateRecord {
    pub integrity: f64,
    pub capacity: f64,
    pub trauma_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhenomenologyRecord {
    pub mode: EntityMode,
    pub valence: f64,
    pub stress: f64,
    pub flow: f64,
    pub gratitude: f64,
    pub wisdom: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperienceRecord {
    pub has_been_critical: bool,
    pub has_transcended: bool,
    pub lowest_ever: f64,
    pub peak_capacity: f64,
}

/// Persisted per-cycle record. Values are rounded to four decimals so that
/// exported logs stay diffable across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub schema_version: String,
    pub substrate: SubstrateRecord,
    pub phenomenological: PhenomenologyRecord,
    pub experience: ExperienceRecord,
}

/// Flat formatted readout of the live entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateView {
    pub age: u64,
    pub mode: EntityMode,
    pub integrity: f64,
    pub capacity: f64,
    pub valence: f64,
    pub stress: f64,
    pub flow: f64,
    pub gratitude: f64,
    pub wisdom: f64,
    pub trauma_memory: f64,
    pub has_suffered: bool,
    pub has_transcended: bool,
}

impl fmt::Display for StateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "age={} mode={} integrity={:.4} capacity={:.4} valence={:+.4}",
            self.age,
            self.mode.as_str(),
            self.integrity,
            self.capacity,
            self.valence
        )
    }
}

/// Emitted when the classified mode differs from the previous cycle's.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModeChangeEvent {
    pub age: u64,
    pub previous: EntityMode,
    pub current: EntityMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleResult {
    pub age: u64,
    pub action: Action,
    pub pre: Snapshot,
    pub post: Snapshot,
    pub mode_change: Option<ModeChangeEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifeStatistics {
    pub total_cycles: u64,
    pub time_in_crisis: u64,
    pub time_flourishing: u64,
    pub deepest_fall: f64,
    pub highest_rise: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccumulatedTraits {
    pub trauma_memory: f64,
    pub wisdom: f64,
    pub gratitude_capacity: f64,
    pub flourishing_score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Achievements {
    pub survived_crisis: bool,
    pub achieved_flow: bool,
    pub transcended: bool,
}

/// Aggregate view over an entity's accumulated history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Biography {
    pub schema_version: String,
    pub name: String,
    pub age: u64,
    pub current_state: Snapshot,
    pub life_statistics: LifeStatistics,
    pub accumulated_traits: AccumulatedTraits,
    pub achievements: Achievements,
    pub mode_distribution: BTreeMap<EntityMode, u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NegativeIntensity,
    NonFiniteIntensity,
}

/// A rejected cycle input. The substrate itself is clamp-only and never
/// fails; validation happens once, at the entity boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
}

impl CycleError {
    pub fn negative_intensity(intensity: f64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code: ErrorCode::NegativeIntensity,
            message: format!("intensity must be non-negative, got {intensity}"),
        }
    }

    pub fn non_finite_intensity() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code: ErrorCode::NonFiniteIntensity,
            message: "intensity must be a finite value".to_string(),
        }
    }
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle rejected ({:?}): {}", self.error_code, self.message)
    }
}

impl std::error::Error for CycleError {}
