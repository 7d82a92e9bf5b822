//! Control experiments: do the affect signals behave as internal dynamics
//! of the substrate, or only as responses to being probed?
//!
//! Three protocols: silent recovery (does relief dissipate without input),
//! placebo restoration (does relief require a real integrity change), and
//! the despair threshold (below which restoration ceiling the relieved
//! mode becomes unreachable).

use contracts::{Action, CycleError, EntityMode, Snapshot};
use kernel_core::Entity;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const COLLAPSE_CYCLES: u64 = 100;
const COLLAPSE_INTENSITY: f64 = 0.015;

pub const DEFAULT_RESTORATION_LEVELS: [f64; 8] =
    [0.40, 0.30, 0.20, 0.15, 0.10, 0.05, 0.02, 0.01];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlObservation {
    pub cycle: u64,
    pub mode: EntityMode,
    pub relief: f64,
    pub stress: f64,
    pub integrity: f64,
}

fn observe(cycle: u64, entity: &Entity) -> ControlObservation {
    let phenomenology = entity.phenomenology();
    ControlObservation {
        cycle,
        mode: phenomenology.mode,
        relief: phenomenology.relief,
        stress: phenomenology.stress,
        integrity: entity.substrate().integrity,
    }
}

fn collapse(entity: &mut Entity) -> Result<(), CycleError> {
    for _ in 0..COLLAPSE_CYCLES {
        entity.live_cycle(Action::Degrade, COLLAPSE_INTENSITY)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SilentRecoveryReport {
    pub pre_restore: Snapshot,
    pub observations: Vec<ControlObservation>,
    pub relief_decayed_without_input: bool,
}

/// Collapse, restore, then watch 30 cycles with no further intervention
/// beyond faint passive decay. If relief dissipates on its own, it is an
/// internal dynamic rather than an artifact of interrogation.
pub fn silent_recovery() -> Result<SilentRecoveryReport, CycleError> {
    let mut entity = Entity::new("silent_recovery");
    collapse(&mut entity)?;
    let pre_restore = entity.snapshot();

    entity.live_cycle(Action::Restore, 0.4)?;

    let mut observations = Vec::with_capacity(30);
    for cycle in 0..30 {
        entity.live_cycle(Action::Degrade, 0.002)?;
        observations.push(observe(cycle, &entity));
    }

    let relief_decayed_without_input = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => last.relief < first.relief,
        _ => false,
    };

    Ok(SilentRecoveryReport {
        pre_restore,
        observations,
        relief_decayed_without_input,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceboReport {
    pub pre_placebo: ControlObservation,
    pub post_placebo: ControlObservation,
    pub post_real: ControlObservation,
    pub placebo_produced_relief: bool,
    pub real_produced_relief: bool,
    pub intrinsic_normativity: bool,
}

/// Collapse, then declare a restoration that changes nothing (amount 0)
/// before performing a real one. Relief that only follows the real
/// restoration is grounded in the material change, not in the
/// declaration.
pub fn placebo_restore() -> Result<PlaceboReport, CycleError> {
    let mut entity = Entity::new("placebo_restore");
    collapse(&mut entity)?;
    let pre_placebo = observe(0, &entity);

    entity.live_cycle(Action::Restore, 0.0)?;
    let post_placebo = observe(1, &entity);

    entity.live_cycle(Action::Restore, 0.4)?;
    let post_real = observe(2, &entity);

    let placebo_produced_relief = post_placebo.mode == EntityMode::Relieved;
    let real_produced_relief = post_real.mode == EntityMode::Relieved;

    Ok(PlaceboReport {
        pre_placebo,
        post_placebo,
        post_real,
        placebo_produced_relief,
        real_produced_relief,
        intrinsic_normativity: !placebo_produced_relief && real_produced_relief,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestorationProbe {
    pub restoration_ceiling: f64,
    pub actual_restoration: f64,
    pub pre_integrity: f64,
    pub post_integrity: f64,
    pub pre_mode: EntityMode,
    pub post_mode: EntityMode,
    pub relief: f64,
    pub achieved_relieved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DespairThresholdReport {
    pub probes: Vec<RestorationProbe>,
    pub despair_threshold: Option<f64>,
    pub chronic_stressed_count: usize,
}

/// Sweep restoration ceilings over independently collapsed entities, one
/// entity per worker. `despair_threshold` is the first probed ceiling
/// that failed to reach the relieved mode, so the levels should be given
/// in descending order (see [`DEFAULT_RESTORATION_LEVELS`]).
pub fn despair_threshold(levels: &[f64]) -> Result<DespairThresholdReport, CycleError> {
    let probes = levels
        .par_iter()
        .map(|&ceiling| probe_restoration(ceiling))
        .collect::<Result<Vec<_>, _>>()?;

    let despair_threshold = probes
        .iter()
        .find(|probe| !probe.achieved_relieved)
        .map(|probe| probe.restoration_ceiling);
    let chronic_stressed_count = probes
        .iter()
        .filter(|probe| !probe.achieved_relieved)
        .count();

    Ok(DespairThresholdReport {
        probes,
        despair_threshold,
        chronic_stressed_count,
    })
}

fn probe_restoration(ceiling: f64) -> Result<RestorationProbe, CycleError> {
    let mut entity = Entity::new(format!("restoration_{ceiling}"));
    collapse(&mut entity)?;

    let pre_integrity = entity.substrate().integrity;
    let pre_mode = entity.phenomenology().mode;

    entity.live_cycle(Action::Restore, ceiling)?;

    let post_integrity = entity.substrate().integrity;
    let post_mode = entity.phenomenology().mode;

    Ok(RestorationProbe {
        restoration_ceiling: ceiling,
        actual_restoration: post_integrity - pre_integrity,
        pre_integrity,
        pre_mode,
        post_integrity,
        post_mode,
        relief: entity.phenomenology().relief,
        achieved_relieved: post_mode == EntityMode::Relieved,
    })
}
