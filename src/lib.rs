//! # Logic Canvas
//!
//! The editing core of a digital-logic circuit sandbox: place gates, switches,
//! lights, LEDs and a binary counter on a canvas, wire them with cables and
//! watch signals propagate.
//!
//! The crate is display independent. A front-end (typically a Slint window)
//! forwards pointer and key events to an [`EditorController`] and renders
//! the device and cable views it gets back.
//!
//! ## Features
//!
//! - **Closed device model** - every [`DeviceKind`] has a fixed slot layout
//!   stored in fixed-size arrays, so slot counts cannot go wrong at runtime
//! - **One hop per tick** - [`Circuit::tick`] copies cable values first and
//!   recomputes devices second, so signals advance one device per frame
//! - **Validated wiring** - cables pass through a [`CableValidator`] before
//!   they are committed; compose rules with [`CompositeValidator`]
//! - **Direct manipulation** - drag, pan, rubber-band selection, duplicate,
//!   delete and a snapping cable tool
//!
//! ## Rust Helpers
//!
//! - [`distance`] / [`segment_distance`] - point and point-to-segment distance
//! - [`find_nearest_slot`] - snap search with a deterministic tie-break
//! - [`find_cable_at`] / [`find_device_at`] - hit-testing
//! - [`SelectionManager`] / [`SelectionBox`] - selection state
//! - [`EditorHandle`] - callback factories and auto-synced Slint models
//!
//! ## Quick Start
//!
//! ```ignore
//! use logic_canvas::{DeviceKind, EditorController};
//!
//! let mut editor = EditorController::new();
//! let switch = editor.spawn_device(DeviceKind::Switch);
//! editor.circuit_mut().device_mut(switch).map(|d| d.toggle_switch());
//! editor.run_frame([]);
//! ```

pub mod path;
pub mod device;
pub mod cable;
pub mod state;
pub mod graph;
pub mod selection;
pub mod settings;
pub mod palette;
pub mod controller;
pub mod handle;

// Re-export traits and functions
pub use hit_test::{
    cables_in_selection_box, devices_in_selection_box, find_cable_at, find_device_at,
    find_nearest_slot, CableGeometry, DeviceGeometry, SlotGeometry,
};
pub use path::{distance, generate_cable_path, segment_distance};
pub use device::{Device, DeviceId, DeviceKind, DisplayState, LedColor, Slot, UnknownDeviceKind};
pub use cable::{cable_color, Cable, CableId, InputBinding, OutputBinding, ProvisionalCable};
pub use state::{Circuit, InputSlotPosition, OutputSlotPosition, SlotMarker};
pub use selection::{SelectionBox, SelectionManager};
pub use graph::{
    GraphLogic,
    // Cable validation framework
    CableValidator, BasicCableValidator, NoDuplicatesValidator, SingleDriverValidator,
    CompositeValidator, ValidationResult, ValidationError, validate_cable,
};
pub use settings::EditorSettings;
pub use palette::{Palette, PaletteAction, PaletteButton, ToolButton, CABLE_TOGGLE};
pub use controller::{DragState, EditorController, InputEvent};
pub use handle::{CableView, DeviceView, EditorHandle, SlotView};
