use contracts::{mode_category, Action, EntityConfig, EntityMode, ErrorCode, ModeCategory};
use kernel_core::Entity;

fn mixed_script() -> Vec<(Action, f64)> {
    let mut script = Vec::new();
    for _ in 0..20 {
        script.push((Action::Exist, 0.0));
    }
    for _ in 0..30 {
        script.push((Action::Degrade, 0.02));
    }
    script.push((Action::Restore, 0.35));
    for _ in 0..40 {
        script.push((Action::Enhance, 0.015));
    }
    script
}

fn run_script(name: &str, script: &[(Action, f64)]) -> Entity {
    let mut entity = Entity::new(name);
    for &(action, intensity) in script {
        entity.live_cycle(action, intensity).expect("valid intensity");
    }
    entity
}

#[test]
fn deterministic_replay_same_script_same_trajectory() {
    let script = mixed_script();
    let first = run_script("replay_a", &script);
    let second = run_script("replay_b", &script);

    assert_eq!(first.snapshot(), second.snapshot());
    assert_eq!(first.integrity_history(), second.integrity_history());
    assert_eq!(
        first.biography().mode_distribution,
        second.biography().mode_distribution
    );
}

#[test]
fn extreme_intensities_stay_clamped() {
    let mut entity = Entity::new("extremes");
    entity.live_cycle(Action::Degrade, 50.0).expect("cycle");
    assert_eq!(entity.substrate().integrity, 0.0);

    entity.live_cycle(Action::Enhance, 100.0).expect("cycle");
    assert!(entity.substrate().integrity <= 1.0);
    assert!(entity.substrate().capacity <= entity.config().max_capacity);

    entity.live_cycle(Action::Restore, 1_000.0).expect("cycle");
    assert_eq!(entity.substrate().integrity, 1.0);
}

#[test]
fn zero_intensity_still_ticks_the_substrate() {
    let mut entity = Entity::new("zero");
    let cycles = entity.substrate().total_cycles;
    entity.live_cycle(Action::Degrade, 0.0).expect("cycle");
    assert_eq!(entity.substrate().integrity, 1.0);
    assert_eq!(entity.substrate().total_cycles, cycles + 1);
    assert_eq!(entity.substrate().history_len(), 1);
}

#[test]
fn rejected_intensity_leaves_no_trace() {
    let mut entity = Entity::new("guarded");
    entity.live_cycle(Action::Degrade, 0.1).expect("cycle");
    let before = entity.snapshot();
    let age = entity.age();

    let negative = entity.live_cycle(Action::Restore, -1.0).expect_err("negative");
    assert_eq!(negative.error_code, ErrorCode::NegativeIntensity);

    let infinite = entity
        .live_cycle(Action::Degrade, f64::INFINITY)
        .expect_err("infinite");
    assert_eq!(infinite.error_code, ErrorCode::NonFiniteIntensity);

    assert_eq!(entity.age(), age);
    assert_eq!(entity.snapshot(), before);
    assert_eq!(entity.life_log().count(), 1);
}

#[test]
fn unknown_action_strings_degrade_to_exist() {
    for raw in ["", "reboot", "EXIST", "Degrade"] {
        let mut entity = Entity::new("parser");
        let result = entity.live_cycle_raw(raw, 0.25).expect("cycle");
        assert_eq!(result.action, Action::Exist);
    }
    assert_eq!(Action::parse("degrade"), Action::Degrade);
    assert_eq!(Action::parse("enhance"), Action::Enhance);
    assert_eq!(Action::parse("restore"), Action::Restore);
}

#[test]
fn history_window_is_capped_for_plotting() {
    let mut entity = Entity::new("plotted");
    for _ in 0..260 {
        entity.live_cycle(Action::Exist, 0.0).expect("cycle");
    }
    let history = entity.integrity_history();
    assert_eq!(history.len(), 200);
    let last = *history.last().expect("non-empty history");
    assert_eq!(last, entity.substrate().integrity);
}

#[test]
fn mode_categories_cover_the_full_spectrum() {
    let negatives = [
        EntityMode::Critical,
        EntityMode::Desperate,
        EntityMode::Stressed,
        EntityMode::Urgent,
        EntityMode::Degraded,
    ];
    let transitionals = [
        EntityMode::Relieved,
        EntityMode::Recovered,
        EntityMode::Stable,
    ];
    let positives = [
        EntityMode::Optimal,
        EntityMode::Flow,
        EntityMode::Flourishing,
        EntityMode::Anticipating,
        EntityMode::Transcendent,
    ];

    for mode in negatives {
        assert_eq!(mode_category(mode), ModeCategory::Negative);
    }
    for mode in transitionals {
        assert_eq!(mode_category(mode), ModeCategory::Transitional);
    }
    for mode in positives {
        assert_eq!(mode_category(mode), ModeCategory::Positive);
    }
}

#[test]
fn config_round_trips_through_json() {
    let config = EntityConfig::default();
    let serialized = serde_json::to_string(&config).expect("serialize");
    let decoded: EntityConfig = serde_json::from_str(&serialized).expect("deserialize");
    assert_eq!(config, decoded);
}

#[test]
fn variant_config_shifts_thresholds_without_forking_the_model() {
    let mut config = EntityConfig::default();
    config.critical_threshold = 0.5;
    let mut entity = Entity::with_config("variant", config);

    for _ in 0..3 {
        entity.live_cycle(Action::Degrade, 0.2).expect("cycle");
    }
    // Under the stricter threshold this integrity already counts as crisis.
    assert!(entity.substrate().integrity < 0.5);
    assert!(entity.substrate().has_been_critical);
}
