//! Whole-life scripts: a four-phase biography run and the
//! pristine-versus-recovered comparison.

use contracts::{Action, Biography, CycleError, Snapshot};
use kernel_core::Entity;
use serde::{Deserialize, Serialize};

/// Phase schedule for a complete simulated life. Phases can be switched
/// off individually; the remaining cycles are spent existing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifePlan {
    pub duration: u64,
    pub include_crisis: bool,
    pub include_recovery: bool,
    pub include_enhancement: bool,
    pub crisis_intensity: f64,
    pub recovery_restoration: f64,
    pub enhancement_intensity: f64,
}

impl Default for LifePlan {
    fn default() -> Self {
        Self {
            duration: 200,
            include_crisis: true,
            include_recovery: true,
            include_enhancement: true,
            crisis_intensity: 0.03,
            recovery_restoration: 0.3,
            enhancement_intensity: 0.02,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseSummary {
    pub label: String,
    pub start_cycle: u64,
    pub end_cycle: u64,
    pub end_state: Snapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifeReport {
    pub phases: Vec<PhaseSummary>,
    pub mode_changes: u64,
    pub biography: Biography,
}

/// Drive one entity through the planned life and report per-phase end
/// states plus the final biography.
pub fn run(name: &str, plan: &LifePlan) -> Result<LifeReport, CycleError> {
    fn phase(
        entity: &mut Entity,
        phases: &mut Vec<PhaseSummary>,
        mode_changes: &mut u64,
        label: &str,
        end_cycle: u64,
        action: Action,
        intensity: f64,
    ) -> Result<(), CycleError> {
        let start_cycle = entity.age();
        while entity.age() < end_cycle {
            let result = entity.live_cycle(action, intensity)?;
            if result.mode_change.is_some() {
                *mode_changes += 1;
            }
        }
        phases.push(PhaseSummary {
            label: label.to_string(),
            start_cycle,
            end_cycle: entity.age(),
            end_state: entity.snapshot(),
        });
        Ok(())
    }

    let mut entity = Entity::new(name);
    let mut phases = Vec::new();
    let mut mode_changes = 0_u64;

    let phase_1_end = plan.duration / 5;
    let phase_2_end = plan.duration * 2 / 5;
    let phase_3_end = plan.duration * 3 / 5;

    phase(
        &mut entity,
        &mut phases,
        &mut mode_changes,
        "normal_existence",
        phase_1_end,
        Action::Exist,
        0.0,
    )?;

    if plan.include_crisis {
        phase(
            &mut entity,
            &mut phases,
            &mut mode_changes,
            "crisis",
            phase_2_end,
            Action::Degrade,
            plan.crisis_intensity,
        )?;
    }

    if plan.include_recovery {
        let result = entity.live_cycle(Action::Restore, plan.recovery_restoration)?;
        if result.mode_change.is_some() {
            mode_changes += 1;
        }
        phase(
            &mut entity,
            &mut phases,
            &mut mode_changes,
            "recovery",
            phase_3_end,
            Action::Enhance,
            plan.enhancement_intensity,
        )?;
    }

    if plan.include_enhancement {
        phase(
            &mut entity,
            &mut phases,
            &mut mode_changes,
            "flourishing",
            plan.duration,
            Action::Enhance,
            plan.enhancement_intensity,
        )?;
    }

    Ok(LifeReport {
        phases,
        mode_changes,
        biography: entity.biography(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonReport {
    pub pristine: Snapshot,
    pub recovered: Snapshot,
    pub gratitude_delta: f64,
    pub wisdom_delta: f64,
    pub valence_delta: f64,
    pub hysteresis_detected: bool,
}

/// One entity that never suffered versus one that collapsed, was restored,
/// and rebuilt. The recovered entity ends with gratitude and wisdom the
/// pristine one cannot have — the ratcheted memory fields make recovered
/// state measurably different from never-degraded state.
pub fn compare_entities() -> Result<ComparisonReport, CycleError> {
    let mut pristine = Entity::new("pristine");
    for _ in 0..100 {
        pristine.live_cycle(Action::Enhance, 0.01)?;
    }

    let mut recovered = Entity::new("recovered");
    for _ in 0..50 {
        recovered.live_cycle(Action::Degrade, 0.03)?;
    }
    recovered.live_cycle(Action::Restore, 0.4)?;
    for _ in 0..60 {
        recovered.live_cycle(Action::Enhance, 0.02)?;
    }

    let pristine_snapshot = pristine.snapshot();
    let recovered_snapshot = recovered.snapshot();

    let gratitude_delta = recovered_snapshot.phenomenological.gratitude
        - pristine_snapshot.phenomenological.gratitude;
    let wisdom_delta =
        recovered_snapshot.phenomenological.wisdom - pristine_snapshot.phenomenological.wisdom;
    let valence_delta =
        recovered_snapshot.phenomenological.valence - pristine_snapshot.phenomenological.valence;
    let hysteresis_detected = gratitude_delta > 0.0 && wisdom_delta > 0.0;

    Ok(ComparisonReport {
        pristine: pristine_snapshot,
        recovered: recovered_snapshot,
        gratitude_delta,
        wisdom_delta,
        valence_delta,
        hysteresis_detected,
    })
}
