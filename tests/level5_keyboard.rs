//! Level 5: Keyboard Tests
//!
//! Tests duplicate and delete on the current selection, cascade removal of
//! cables, and custom key bindings.

mod common;

use common::harness::CircuitHarness;
use logic_canvas::{DeviceKind, EditorSettings};
use slint::Model;

// ============================================================================
// Duplicate
// ============================================================================

#[test]
fn test_duplicate_adds_offset_copies() {
    let harness = CircuitHarness::new();
    let a = harness.place(DeviceKind::And, (100.0, 200.0));
    let b = harness.place(DeviceKind::Xor, (300.0, 200.0));

    harness.left_drag((90.0, 190.0), (350.0, 280.0));
    assert_eq!(harness.selected_device_count(), 2);

    assert!(harness.press_duplicate());

    assert_eq!(harness.device_count(), 4);
    let copies: Vec<_> = harness.with_editor(|e| e.circuit().devices()[2..].to_vec());
    assert_eq!(copies[0].kind(), DeviceKind::And);
    assert_eq!(copies[0].position(), (120.0, 220.0));
    assert_eq!(copies[1].kind(), DeviceKind::Xor);
    assert_eq!(copies[1].position(), (320.0, 220.0));

    // Originals untouched
    assert_eq!(harness.position(a), (100.0, 200.0));
    assert_eq!(harness.position(b), (300.0, 200.0));
}

#[test]
fn test_duplicate_moves_selection_to_copies() {
    let harness = CircuitHarness::new();
    let a = harness.place(DeviceKind::Nand, (100.0, 200.0));

    harness.left_drag((90.0, 190.0), (150.0, 280.0));
    harness.press_duplicate();

    let copy = harness.with_editor(|e| e.circuit().devices()[1].id());
    assert!(harness.is_selected(copy));
    assert!(!harness.is_selected(a));
    assert_eq!(harness.selected_device_count(), 1);
}

#[test]
fn test_repeated_duplicate_cascades_offsets() {
    let harness = CircuitHarness::new();
    harness.place(DeviceKind::Not, (100.0, 200.0));

    harness.left_drag((90.0, 190.0), (150.0, 280.0));
    harness.press_duplicate();
    harness.press_duplicate();

    assert_eq!(harness.device_count(), 3);
    let last = harness.with_editor(|e| e.circuit().devices()[2].position());
    assert_eq!(last, (140.0, 240.0));
    assert_eq!(harness.selected_device_count(), 1);
}

#[test]
fn test_duplicate_copies_values_not_cables() {
    let harness = CircuitHarness::new();
    let switch = harness.place(DeviceKind::Switch, (100.0, 100.0));
    let light = harness.place(DeviceKind::Light, (300.0, 300.0));
    harness.wire(switch, light, 0);
    harness.toggle_switch(switch);
    harness.frame();
    assert_eq!(harness.asset(light), "LIGHT_ON");

    // Band around both devices, which also catches the cable
    harness.left_drag((90.0, 90.0), (350.0, 380.0));
    assert_eq!(harness.selected_device_count(), 2);
    assert_eq!(harness.selected_cable_count(), 1);

    harness.press_duplicate();

    assert_eq!(harness.device_count(), 4);
    assert_eq!(harness.cable_count(), 1);
    assert_eq!(harness.selected_cable_count(), 0);

    let copies = harness.with_editor(|e| e.circuit().devices()[2..].to_vec());
    assert_eq!(copies[0].output_value(), Some(true));
    assert_eq!(copies[1].display_state().asset_name(), "LIGHT_ON");
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_removes_exactly_the_selection() {
    let harness = CircuitHarness::new();
    let a = harness.place(DeviceKind::And, (100.0, 200.0));
    let b = harness.place(DeviceKind::Or, (200.0, 200.0));
    let c = harness.place(DeviceKind::Not, (500.0, 200.0));

    harness.left_drag((90.0, 190.0), (260.0, 280.0));
    assert!(harness.press_delete());

    assert_eq!(harness.device_count(), 1);
    let remaining = harness.with_editor(|e| e.circuit().devices()[0].id());
    assert_eq!(remaining, c);
    assert!(harness.with_editor(|e| e.circuit().device(a).is_none()));
    assert!(harness.with_editor(|e| e.circuit().device(b).is_none()));
    assert_eq!(harness.selected_device_count(), 0);
}

#[test]
fn test_delete_cascades_to_attached_cables() {
    let harness = CircuitHarness::new();
    let switch = harness.place(DeviceKind::Switch, (100.0, 100.0));
    let light = harness.place(DeviceKind::Light, (100.0, 300.0));
    harness.wire(switch, light, 0);
    harness.toggle_switch(switch);
    harness.frame();
    assert_eq!(harness.asset(light), "LIGHT_ON");

    // Clips the switch's right edge but none of the cable endpoints
    harness.left_drag((150.0, 150.0), (135.0, 160.0));
    assert!(harness.is_selected(switch));
    assert_eq!(harness.selected_cable_count(), 0);

    harness.press_delete();
    harness.frame();

    assert_eq!(harness.device_count(), 1);
    assert_eq!(harness.cable_count(), 0);
    assert_eq!(harness.cables.row_count(), 0);
    // Undriven input drops back to low
    assert_eq!(harness.asset(light), "LIGHT_OFF");
}

#[test]
fn test_delete_selected_cable_only() {
    let harness = CircuitHarness::new();
    let switch = harness.place(DeviceKind::Switch, (100.0, 100.0));
    let light = harness.place(DeviceKind::Light, (100.0, 300.0));
    harness.wire(switch, light, 0);
    harness.toggle_switch(switch);
    harness.frame();

    harness.click(124.0, 250.0);
    assert_eq!(harness.selected_cable_count(), 1);

    assert!(harness.press_delete());
    harness.frame();

    assert_eq!(harness.cable_count(), 0);
    assert_eq!(harness.device_count(), 2);
    assert_eq!(harness.output(switch), Some(true));
    assert_eq!(harness.asset(light), "LIGHT_OFF");
}

// ============================================================================
// Key routing
// ============================================================================

#[test]
fn test_keys_ignored_without_selection() {
    let harness = CircuitHarness::new();
    harness.spawn(DeviceKind::And);

    assert!(!harness.press_duplicate());
    assert!(!harness.press_delete());
    assert_eq!(harness.device_count(), 1);
}

#[test]
fn test_keys_ignored_in_cable_mode() {
    let harness = CircuitHarness::new();
    let gate = harness.place(DeviceKind::And, (200.0, 200.0));
    harness.left_drag((190.0, 190.0), (250.0, 280.0));
    assert!(harness.is_selected(gate));

    harness.toggle_cable_mode();
    assert!(!harness.press_duplicate());
    assert!(!harness.press_delete());

    assert_eq!(harness.device_count(), 1);
    assert!(harness.is_selected(gate));

    // Keys act again once the mode is off
    harness.toggle_cable_mode();
    assert!(harness.press_duplicate());
    assert_eq!(harness.device_count(), 2);
}

#[test]
fn test_delete_mid_gesture_keeps_cable_source() {
    let harness = CircuitHarness::new();
    let switch = harness.place(DeviceKind::Switch, (100.0, 100.0));
    harness.left_drag((90.0, 90.0), (150.0, 180.0));
    assert!(harness.is_selected(switch));
    harness.toggle_cable_mode();

    harness.press(121.0, 100.0, slint::platform::PointerEventButton::Left);
    assert!(!harness.press_delete());

    assert_eq!(harness.device_count(), 1);
    assert!(harness.with_editor(|e| e.provisional_cable().is_some()));
}

#[test]
fn test_unknown_key_is_ignored() {
    let harness = CircuitHarness::new();
    let gate = harness.place(DeviceKind::And, (100.0, 200.0));
    harness.left_drag((90.0, 190.0), (150.0, 280.0));

    assert!(!harness.key("q"));
    assert!(!harness.key("D"));

    assert_eq!(harness.device_count(), 1);
    assert!(harness.is_selected(gate));
}

#[test]
fn test_custom_key_bindings() {
    let settings = EditorSettings {
        duplicate_key: "c".into(),
        delete_key: "x".into(),
        ..Default::default()
    };
    let harness = CircuitHarness::with_settings(settings);
    harness.place(DeviceKind::Or, (100.0, 200.0));
    harness.left_drag((90.0, 190.0), (150.0, 280.0));

    assert!(!harness.press_duplicate());
    assert!(harness.key("c"));
    assert_eq!(harness.device_count(), 2);

    assert!(!harness.press_delete());
    assert!(harness.key("x"));
    assert_eq!(harness.device_count(), 1);
}
