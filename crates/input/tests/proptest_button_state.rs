//! Property tests for controller registry state
//!
//! Button, axis and visibility updates must behave the same regardless of
//! the order and repetition of device reports.

use proptest::prelude::*;
use vrshell_input::{
    effective_visibility, Button, ControllerContainer, ControllerDelegate, CONTROLLER_MAX_AXES,
    CONTROLLER_MAX_BUTTON_COUNT,
};
use vrshell_scene::Scene;

fn registry(count: usize) -> (Scene, ControllerContainer) {
    let mut scene = Scene::new();
    let mut container = ControllerContainer::new(&mut scene, None);
    for index in 0..count {
        container.create_controller(&mut scene, index, Some(0), "");
    }
    (scene, container)
}

proptest! {
    /// Property: Repeating a button report changes nothing
    #[test]
    fn button_state_is_idempotent(
        bits in any::<u8>(),
        immersive_index in 0..CONTROLLER_MAX_BUTTON_COUNT,
        pressed in any::<bool>(),
        touched in any::<bool>(),
        trigger in prop::option::of(-1.0f32..1.0),
    ) {
        let button = Button::from_bits_truncate(u32::from(bits));
        let (_scene, mut container) = registry(1);

        container.set_button_state(0, button, Some(immersive_index), pressed, touched, trigger);
        let once = container.controller(0).unwrap().clone();
        container.set_button_state(0, button, Some(immersive_index), pressed, touched, trigger);
        let twice = container.controller(0).unwrap();

        prop_assert_eq!(once.button_state, twice.button_state);
        prop_assert_eq!(once.immersive_pressed_state, twice.immersive_pressed_state);
        prop_assert_eq!(once.immersive_touched_state, twice.immersive_touched_state);
        prop_assert_eq!(once.immersive_trigger_values, twice.immersive_trigger_values);
    }

    /// Property: Releasing clears exactly the released bits
    #[test]
    fn release_clears_exact_bits(
        held in any::<u8>(),
        released in any::<u8>(),
        immersive_index in 0..CONTROLLER_MAX_BUTTON_COUNT,
    ) {
        let held = Button::from_bits_truncate(u32::from(held));
        let released = Button::from_bits_truncate(u32::from(released));
        let (_scene, mut container) = registry(1);

        container.set_button_state(0, held, None, true, false, None);
        container.set_button_state(0, Button::TRIGGER, Some(immersive_index), true, true, None);
        container.set_button_state(0, released, None, false, false, None);

        let controller = container.controller(0).unwrap();
        let expected = (held | Button::TRIGGER).difference(released);
        prop_assert_eq!(controller.button_state, expected);
        prop_assert_eq!(controller.immersive_pressed_state, 1u64 << immersive_index);
    }

    /// Property: Axis reports keep exactly the reported prefix
    #[test]
    fn axes_keep_reported_count(
        values in prop::collection::vec(-1.0f32..1.0, 0..=CONTROLLER_MAX_AXES),
    ) {
        let (_scene, mut container) = registry(1);
        container.set_axes(0, &values);
        let controller = container.controller(0).unwrap();
        prop_assert_eq!(controller.num_axes, values.len());
        prop_assert_eq!(controller.axes(), values.as_slice());
    }

    /// Property: Drawn controllers are exactly those passing the visibility rule
    #[test]
    fn drawn_matches_effective_visibility(
        flags in prop::collection::vec((any::<bool>(), any::<bool>()), 1..5),
        global in any::<bool>(),
    ) {
        let (mut scene, mut container) = registry(flags.len());
        container.set_all_visible(&mut scene, global);
        for (index, (enabled, visible)) in flags.iter().copied().enumerate() {
            container.set_enabled(&mut scene, index, enabled);
            container.set_visible(&mut scene, index, visible);
        }
        container.set_all_visible(&mut scene, true);
        container.set_all_visible(&mut scene, global);

        for (index, controller) in container.controllers().iter().enumerate() {
            let transform = controller.nodes().unwrap().transform;
            let drawn = scene.is_enabled(container.root(), transform);
            let (enabled, visible) = flags[index];
            prop_assert_eq!(drawn, effective_visibility(global, enabled, visible));
        }
    }

    /// Property: Destroying keeps the slot count
    #[test]
    fn destroy_keeps_count(count in 1usize..6, victim in 0usize..6) {
        let (mut scene, mut container) = registry(count);
        container.destroy_controller(&mut scene, victim);
        prop_assert_eq!(container.controller_count(), count);
        if victim < count {
            prop_assert!(!container.controller(victim).unwrap().is_configured());
        }
    }
}
