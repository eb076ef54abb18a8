//! Cables: directed wires from one device's output slot to an input slot of
//! another (or the same) device.
//!
//! A [`Cable`] is always fully bound; the type has no way to represent a
//! missing endpoint. While the user is still drawing, the wire is a
//! [`ProvisionalCable`] whose bindings are optional. Only
//! [`ProvisionalCable::into_cable`] turns one into the other, and it refuses
//! unless both sides are bound.

use crate::device::DeviceId;
use crate::hit_test::CableGeometry;
use crate::path::generate_cable_path;
use slint::Color;
use std::fmt;

/// Unique identifier of a cable within a circuit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CableId(pub i32);

impl fmt::Display for CableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cable#{}", self.0)
    }
}

/// Reference to a device's (single) output slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputBinding {
    pub device: DeviceId,
}

/// Reference to one input slot of a device
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputBinding {
    pub device: DeviceId,
    pub index: usize,
}

/// Render colour of a wire. Selection wins over signal state.
pub fn cable_color(active: bool, selected: bool) -> Color {
    if selected {
        Color::from_rgb_u8(160, 0, 200)
    } else if active {
        Color::from_rgb_u8(102, 255, 102)
    } else {
        Color::from_rgb_u8(64, 64, 64)
    }
}

/// A persisted, fully bound cable
#[derive(Clone, Debug, PartialEq)]
pub struct Cable {
    id: CableId,
    output: OutputBinding,
    input: InputBinding,
    start: (f32, f32),
    end: (f32, f32),
    active: bool,
}

impl Cable {
    pub fn new(
        id: CableId,
        output: OutputBinding,
        input: InputBinding,
        start: (f32, f32),
        end: (f32, f32),
    ) -> Self {
        Self { id, output, input, start, end, active: false }
    }

    pub fn id(&self) -> CableId {
        self.id
    }

    pub fn output(&self) -> OutputBinding {
        self.output
    }

    pub fn input(&self) -> InputBinding {
        self.input
    }

    pub fn start(&self) -> (f32, f32) {
        self.start
    }

    pub fn end(&self) -> (f32, f32) {
        self.end
    }

    /// Signal value seen on the bound output during the last tick
    pub fn active(&self) -> bool {
        self.active
    }

    /// Whether either end is bound to `device`
    pub fn touches(&self, device: DeviceId) -> bool {
        self.output.device == device || self.input.device == device
    }

    pub fn path_commands(&self) -> String {
        generate_cable_path(self.start, self.end)
    }

    pub(crate) fn set_endpoints(&mut self, start: Option<(f32, f32)>, end: Option<(f32, f32)>) {
        if let Some(start) = start {
            self.start = start;
        }
        if let Some(end) = end {
            self.end = end;
        }
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl CableGeometry for &Cable {
    type Id = CableId;

    fn id(&self) -> CableId {
        self.id
    }

    fn start(&self) -> (f32, f32) {
        self.start
    }

    fn end(&self) -> (f32, f32) {
        self.end
    }
}

/// A cable still being drawn by the user
#[derive(Clone, Debug, PartialEq)]
pub struct ProvisionalCable {
    output: Option<OutputBinding>,
    input: Option<InputBinding>,
    start: (f32, f32),
    end: (f32, f32),
}

impl ProvisionalCable {
    /// Start a cable at `start`, optionally snapped to an output slot.
    /// The free end begins at `pointer`.
    pub fn new(start: (f32, f32), pointer: (f32, f32), output: Option<OutputBinding>) -> Self {
        Self { output, input: None, start, end: pointer }
    }

    pub fn output(&self) -> Option<OutputBinding> {
        self.output
    }

    pub fn input(&self) -> Option<InputBinding> {
        self.input
    }

    pub fn start(&self) -> (f32, f32) {
        self.start
    }

    pub fn end(&self) -> (f32, f32) {
        self.end
    }

    /// Move the free end to follow the pointer
    pub fn follow(&mut self, pointer: (f32, f32)) {
        self.end = pointer;
    }

    /// Snap the free end onto an input slot at `position`
    pub fn bind_input(&mut self, input: InputBinding, position: (f32, f32)) {
        self.input = Some(input);
        self.end = position;
    }

    pub fn is_fully_bound(&self) -> bool {
        self.output.is_some() && self.input.is_some()
    }

    /// Promote to a persisted cable. Returns `None` unless both ends are bound.
    pub fn into_cable(self, id: CableId) -> Option<Cable> {
        match (self.output, self.input) {
            (Some(output), Some(input)) => Some(Cable::new(id, output, input, self.start, self.end)),
            _ => None,
        }
    }

    pub fn path_commands(&self) -> String {
        generate_cable_path(self.start, self.end)
    }
}
