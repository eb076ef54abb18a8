//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use logic_canvas::DeviceKind;

/// Install a test logger once per process. Run with `RUST_LOG=debug` to see
/// the editor's action log.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Center of the default toolbar button for `kind`
pub fn button_center(kind: DeviceKind) -> (f32, f32) {
    let index = DeviceKind::ALL
        .iter()
        .position(|&k| k == kind)
        .expect("every kind has a button");
    let x = if index < 6 {
        10.0 + 90.0 * index as f32
    } else {
        600.0 + 90.0 * (index - 6) as f32
    };
    (x + 40.0, 30.0)
}

/// Center of the cable-mode toggle button
pub const CABLE_BUTTON: (f32, f32) = (1140.0, 30.0);
