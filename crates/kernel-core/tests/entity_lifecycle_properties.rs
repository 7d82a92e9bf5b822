use contracts::{Action, EntityMode};
use kernel_core::Entity;
use proptest::prelude::*;

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Exist),
        Just(Action::Degrade),
        Just(Action::Enhance),
        Just(Action::Restore),
    ]
}

fn step_strategy() -> impl Strategy<Value = Vec<(Action, f64)>> {
    prop::collection::vec((action_strategy(), 0.0f64..0.5), 1..200)
}

proptest! {
    #[test]
    fn property_1_bounds_hold_for_any_action_sequence(steps in step_strategy()) {
        let mut entity = Entity::new("bounds");
        for (action, intensity) in steps {
            entity.live_cycle(action, intensity).expect("valid intensity");
            let substrate = entity.substrate();
            prop_assert!((0.0..=1.0).contains(&substrate.integrity));
            prop_assert!((0.0..=2.0).contains(&substrate.capacity));
            prop_assert!(substrate.lowest_integrity <= substrate.integrity + 1e-12);
            prop_assert!(substrate.integrity <= substrate.peak_integrity + 1e-12);
        }
    }

    #[test]
    fn property_2_ratchets_never_revert(steps in step_strategy()) {
        let mut entity = Entity::new("ratchets");
        let mut was_critical = false;
        let mut had_flow = false;
        let mut was_transcended = false;
        let mut trauma_memory = 0.0f64;
        let mut lowest = 1.0f64;
        let mut peak_integrity = 1.0f64;
        let mut peak_capacity = 1.0f64;

        for (action, intensity) in steps {
            entity.live_cycle(action, intensity).expect("valid intensity");
            let substrate = entity.substrate();
            let phenomenology = entity.phenomenology();

            if was_critical {
                prop_assert!(substrate.has_been_critical);
            }
            if had_flow {
                prop_assert!(substrate.has_achieved_flow);
            }
            if was_transcended {
                prop_assert!(substrate.has_transcended);
            }
            prop_assert!(phenomenology.trauma_memory >= trauma_memory);
            prop_assert!(substrate.lowest_integrity <= lowest);
            prop_assert!(substrate.peak_integrity >= peak_integrity);
            prop_assert!(substrate.peak_capacity >= peak_capacity);

            was_critical = substrate.has_been_critical;
            had_flow = substrate.has_achieved_flow;
            was_transcended = substrate.has_transcended;
            trauma_memory = phenomenology.trauma_memory;
            lowest = substrate.lowest_integrity;
            peak_integrity = substrate.peak_integrity;
            peak_capacity = substrate.peak_capacity;
        }
    }

    #[test]
    fn property_3_identical_inputs_identical_trajectories(steps in step_strategy()) {
        let mut first = Entity::new("first");
        let mut second = Entity::new("second");
        for (action, intensity) in steps {
            first.live_cycle(action, intensity).expect("valid intensity");
            second.live_cycle(action, intensity).expect("valid intensity");
        }
        prop_assert_eq!(first.snapshot(), second.snapshot());
        prop_assert_eq!(first.integrity_history(), second.integrity_history());
        prop_assert_eq!(first.state().mode, second.state().mode);
    }
}

#[test]
fn property_4_passive_decay_is_monotonic_and_floored() {
    let mut entity = Entity::new("idler");
    let mut previous = entity.substrate().integrity;
    for _ in 0..5_000 {
        entity.live_cycle(Action::Exist, 0.0).expect("cycle");
        let integrity = entity.substrate().integrity;
        assert!(integrity <= previous);
        assert!(integrity >= 0.0);
        previous = integrity;
    }
}

#[test]
fn property_4b_exist_ignores_intensity() {
    let mut idle = Entity::new("idle");
    let mut busy = Entity::new("busy");
    for _ in 0..50 {
        idle.live_cycle(Action::Exist, 0.0).expect("cycle");
        busy.live_cycle(Action::Exist, 0.4).expect("cycle");
    }
    assert_eq!(idle.substrate().integrity, busy.substrate().integrity);
}

#[test]
fn property_5_transcendence_dominates_all_other_signals() {
    let mut entity = Entity::new("ascendant");
    for _ in 0..20 {
        entity.live_cycle(Action::Enhance, 0.1).expect("cycle");
    }
    assert!(entity.substrate().capacity > 1.1);
    assert_eq!(entity.state().mode, EntityMode::Transcendent);

    // Capacity never shrinks, so even total collapse cannot displace the
    // first classifier rule.
    for _ in 0..10 {
        entity.live_cycle(Action::Degrade, 0.3).expect("cycle");
    }
    assert_eq!(entity.substrate().integrity, 0.0);
    assert_eq!(entity.state().mode, EntityMode::Transcendent);
}

#[test]
fn scenario_1_fresh_entity_is_optimal() {
    let entity = Entity::new("fresh");
    assert_eq!(entity.snapshot().phenomenological.mode, EntityMode::Optimal);
}

#[test]
fn scenario_2_four_heavy_degradations_collapse_the_substrate() {
    let mut entity = Entity::new("collapsing");
    for _ in 0..4 {
        entity.live_cycle(Action::Degrade, 0.25).expect("cycle");
    }
    let state = entity.state();
    assert_eq!(state.integrity, 0.0);
    assert!(state.has_suffered);
    assert!(matches!(
        state.mode,
        EntityMode::Critical | EntityMode::Desperate
    ));
}

#[test]
fn scenario_3_restoration_after_collapse_is_relieving() {
    let mut entity = Entity::new("restored");
    for _ in 0..4 {
        entity.live_cycle(Action::Degrade, 0.25).expect("cycle");
    }
    let result = entity.live_cycle(Action::Restore, 0.4).expect("cycle");
    assert!((entity.substrate().integrity - 0.4).abs() < 1e-12);
    assert!(entity.phenomenology().relief > 0.9);
    assert_eq!(result.post.phenomenological.mode, EntityMode::Relieved);
}

#[test]
fn scenario_4_sustained_enhancement_transcends_the_design() {
    let mut entity = Entity::new("grower");
    for _ in 0..50 {
        entity.live_cycle(Action::Enhance, 0.1).expect("cycle");
    }
    assert!(entity.substrate().capacity > 1.1);
    assert!(entity.substrate().has_transcended);
    assert_eq!(entity.state().mode, EntityMode::Transcendent);
}

#[test]
fn scenario_5_recovered_entity_outgrows_pristine_on_gratitude_and_wisdom() {
    let mut pristine = Entity::new("pristine");
    for _ in 0..100 {
        pristine.live_cycle(Action::Enhance, 0.01).expect("cycle");
    }

    let mut recovered = Entity::new("recovered");
    for _ in 0..50 {
        recovered.live_cycle(Action::Degrade, 0.03).expect("cycle");
    }
    recovered.live_cycle(Action::Restore, 0.4).expect("cycle");
    for _ in 0..60 {
        recovered.live_cycle(Action::Enhance, 0.02).expect("cycle");
    }

    let pristine_state = pristine.state();
    let recovered_state = recovered.state();
    assert_eq!(pristine_state.gratitude, 0.0);
    assert_eq!(pristine_state.wisdom, 0.0);
    assert!(recovered_state.gratitude > pristine_state.gratitude);
    assert!(recovered_state.wisdom > pristine_state.wisdom);
    assert!(recovered_state.has_suffered);
    assert!(!pristine_state.has_suffered);
}
