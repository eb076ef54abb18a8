//! Circuit devices: gates, switches, indicators, the binary counter and the
//! passive box.
//!
//! A [`Device`] is a bounding box plus a [`DeviceLogic`] variant. Every variant
//! owns fixed-size slot arrays, so slot counts per kind are enforced by the
//! type rather than checked at runtime. Slot offsets are fixed at
//! construction and match the connector positions of the device artwork.

use crate::hit_test::DeviceGeometry;
use crate::path::offset_point;
use slint::Color;
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a device within a circuit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub i32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// The kinds of device that can be placed on the canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Light,
    Led,
    Switch,
    Counter,
    GenericBox,
}

impl DeviceKind {
    /// Every kind, in toolbar order
    pub const ALL: [DeviceKind; 11] = [
        DeviceKind::And,
        DeviceKind::Or,
        DeviceKind::Not,
        DeviceKind::Nand,
        DeviceKind::Nor,
        DeviceKind::Xor,
        DeviceKind::Light,
        DeviceKind::Led,
        DeviceKind::Switch,
        DeviceKind::Counter,
        DeviceKind::GenericBox,
    ];

    /// Textual identifier used by palette buttons
    pub fn identifier(self) -> &'static str {
        match self {
            DeviceKind::And => "AND",
            DeviceKind::Or => "OR",
            DeviceKind::Not => "NOT",
            DeviceKind::Nand => "NAND",
            DeviceKind::Nor => "NOR",
            DeviceKind::Xor => "XOR",
            DeviceKind::Light => "LIGHT",
            DeviceKind::Led => "LED",
            DeviceKind::Switch => "SWITCH",
            DeviceKind::Counter => "COUNTER",
            DeviceKind::GenericBox => "BOX",
        }
    }

    /// Rendered size (width, height) of a freshly spawned device
    pub fn size(self) -> (f32, f32) {
        match self {
            DeviceKind::Led => (46.0, 64.0),
            DeviceKind::Counter => (98.0, 96.0),
            DeviceKind::GenericBox => (50.0, 50.0),
            _ => (42.0, 70.0),
        }
    }

    fn gate_op(self) -> Option<GateOp> {
        match self {
            DeviceKind::And => Some(GateOp::And),
            DeviceKind::Or => Some(GateOp::Or),
            DeviceKind::Nand => Some(GateOp::Nand),
            DeviceKind::Nor => Some(GateOp::Nor),
            DeviceKind::Xor => Some(GateOp::Xor),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Error returned when a palette identifier names no known device kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDeviceKind(pub String);

impl fmt::Display for UnknownDeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown device kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownDeviceKind {}

impl FromStr for DeviceKind {
    type Err = UnknownDeviceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GENERIC_BOX" => Ok(DeviceKind::GenericBox),
            _ => DeviceKind::ALL
                .into_iter()
                .find(|kind| kind.identifier() == s)
                .ok_or_else(|| UnknownDeviceKind(s.to_string())),
        }
    }
}

/// A connection point on a device: a fixed offset from the device's
/// top-left corner plus the boolean signal currently on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    offset: (f32, f32),
    value: bool,
}

impl Slot {
    const fn at(dx: f32, dy: f32) -> Self {
        Self { offset: (dx, dy), value: false }
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: bool) {
        self.value = value;
    }
}

const GATE_INPUTS: [Slot; 2] = [Slot::at(10.0, 70.0), Slot::at(34.0, 70.0)];
const SINGLE_INPUT: [Slot; 1] = [Slot::at(21.0, 70.0)];
const TOP_OUTPUT: Slot = Slot::at(21.0, 0.0);
// yellow, blue, red
const LED_INPUTS: [Slot; 3] = [Slot::at(7.0, 64.0), Slot::at(23.0, 64.0), Slot::at(40.0, 64.0)];
// weights 1, 2, 4, 8, 16
const COUNTER_INPUTS: [Slot; 5] = [
    Slot::at(14.0, 96.0),
    Slot::at(32.0, 96.0),
    Slot::at(50.0, 96.0),
    Slot::at(68.0, 96.0),
    Slot::at(86.0, 96.0),
];

/// Boolean operator of a two-input gate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOp {
    And,
    Or,
    Nand,
    Nor,
    Xor,
}

impl GateOp {
    pub fn evaluate(self, inputs: &[Slot]) -> bool {
        let mut values = inputs.iter().map(Slot::value);
        match self {
            GateOp::And => values.all(|v| v),
            GateOp::Or => values.any(|v| v),
            GateOp::Nand => !values.all(|v| v),
            GateOp::Nor => !values.any(|v| v),
            GateOp::Xor => values.filter(|&v| v).count() % 2 == 1,
        }
    }
}

/// Colour shown by an LED for a combination of its three inputs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedColor {
    White,
    Green,
    Purple,
    Orange,
    Red,
    Blue,
    Yellow,
    Black,
}

impl LedColor {
    /// Priority cascade over the (yellow, blue, red) inputs
    pub fn from_inputs(yellow: bool, blue: bool, red: bool) -> Self {
        match (yellow, blue, red) {
            (true, true, true) => LedColor::White,
            (true, true, false) => LedColor::Green,
            (false, true, true) => LedColor::Purple,
            (true, false, true) => LedColor::Orange,
            (false, false, true) => LedColor::Red,
            (false, true, false) => LedColor::Blue,
            (true, false, false) => LedColor::Yellow,
            (false, false, false) => LedColor::Black,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LedColor::White => "WHITE",
            LedColor::Green => "GREEN",
            LedColor::Purple => "PURPLE",
            LedColor::Orange => "ORANGE",
            LedColor::Red => "RED",
            LedColor::Blue => "BLUE",
            LedColor::Yellow => "YELLOW",
            LedColor::Black => "BLACK",
        }
    }

    /// Colour for renderers that tint instead of swapping artwork
    pub fn color(self) -> Color {
        match self {
            LedColor::White => Color::from_rgb_u8(255, 255, 255),
            LedColor::Green => Color::from_rgb_u8(0, 200, 0),
            LedColor::Purple => Color::from_rgb_u8(160, 0, 200),
            LedColor::Orange => Color::from_rgb_u8(255, 140, 0),
            LedColor::Red => Color::from_rgb_u8(230, 0, 0),
            LedColor::Blue => Color::from_rgb_u8(0, 90, 255),
            LedColor::Yellow => Color::from_rgb_u8(255, 220, 0),
            LedColor::Black => Color::from_rgb_u8(0, 0, 0),
        }
    }
}

/// Per-kind slot layout and derived state
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceLogic {
    Gate { op: GateOp, inputs: [Slot; 2], output: Slot },
    Not { input: [Slot; 1], output: Slot },
    Light { input: [Slot; 1], lit: bool },
    Led { inputs: [Slot; 3], color: LedColor },
    Switch { output: Slot },
    Counter { inputs: [Slot; 5], value: u8 },
    GenericBox,
}

impl DeviceLogic {
    fn for_kind(kind: DeviceKind) -> Self {
        if let Some(op) = kind.gate_op() {
            return DeviceLogic::Gate { op, inputs: GATE_INPUTS, output: TOP_OUTPUT };
        }
        match kind {
            DeviceKind::Not => DeviceLogic::Not { input: SINGLE_INPUT, output: TOP_OUTPUT },
            DeviceKind::Light => DeviceLogic::Light { input: SINGLE_INPUT, lit: false },
            DeviceKind::Led => DeviceLogic::Led { inputs: LED_INPUTS, color: LedColor::Black },
            DeviceKind::Switch => DeviceLogic::Switch { output: TOP_OUTPUT },
            DeviceKind::Counter => DeviceLogic::Counter { inputs: COUNTER_INPUTS, value: 0 },
            _ => DeviceLogic::GenericBox,
        }
    }
}

/// What the renderer should show for a device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayState {
    /// Artwork never changes (gates, the generic box)
    Static(DeviceKind),
    Light(bool),
    Led(LedColor),
    Switch(bool),
    Counter(u8),
}

impl DisplayState {
    /// Artwork key handed to the asset loader
    pub fn asset_name(&self) -> String {
        match self {
            DisplayState::Static(DeviceKind::GenericBox) => "DefaultBOX".into(),
            DisplayState::Static(kind) => {
                let id = kind.identifier();
                // AND -> AndGate
                format!("{}{}Gate", &id[..1], id[1..].to_lowercase())
            }
            DisplayState::Light(true) => "LIGHT_ON".into(),
            DisplayState::Light(false) => "LIGHT_OFF".into(),
            DisplayState::Led(color) => format!("LED_{}", color.name()),
            DisplayState::Switch(true) => "SWITCH_ON".into(),
            DisplayState::Switch(false) => "SWITCH_OFF".into(),
            DisplayState::Counter(n) => format!("Counter/{}", n),
        }
    }
}

/// A device placed on the canvas
#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    id: DeviceId,
    pub x: f32,
    pub y: f32,
    width: f32,
    height: f32,
    logic: DeviceLogic,
    /// Set while this device is the target of a single-device drag
    pub dragging: bool,
}

impl Device {
    /// Build a device of `kind` with its fixed slot layout at `position`
    pub fn new(id: DeviceId, kind: DeviceKind, position: (f32, f32)) -> Self {
        let (width, height) = kind.size();
        Self {
            id,
            x: position.0,
            y: position.1,
            width,
            height,
            logic: DeviceLogic::for_kind(kind),
            dragging: false,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn kind(&self) -> DeviceKind {
        match &self.logic {
            DeviceLogic::Gate { op, .. } => match op {
                GateOp::And => DeviceKind::And,
                GateOp::Or => DeviceKind::Or,
                GateOp::Nand => DeviceKind::Nand,
                GateOp::Nor => DeviceKind::Nor,
                GateOp::Xor => DeviceKind::Xor,
            },
            DeviceLogic::Not { .. } => DeviceKind::Not,
            DeviceLogic::Light { .. } => DeviceKind::Light,
            DeviceLogic::Led { .. } => DeviceKind::Led,
            DeviceLogic::Switch { .. } => DeviceKind::Switch,
            DeviceLogic::Counter { .. } => DeviceKind::Counter,
            DeviceLogic::GenericBox => DeviceKind::GenericBox,
        }
    }

    pub fn logic(&self) -> &DeviceLogic {
        &self.logic
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn inputs(&self) -> &[Slot] {
        match &self.logic {
            DeviceLogic::Gate { inputs, .. } => &inputs[..],
            DeviceLogic::Not { input, .. } | DeviceLogic::Light { input, .. } => &input[..],
            DeviceLogic::Led { inputs, .. } => &inputs[..],
            DeviceLogic::Counter { inputs, .. } => &inputs[..],
            DeviceLogic::Switch { .. } | DeviceLogic::GenericBox => &[],
        }
    }

    fn inputs_mut(&mut self) -> &mut [Slot] {
        match &mut self.logic {
            DeviceLogic::Gate { inputs, .. } => &mut inputs[..],
            DeviceLogic::Not { input, .. } | DeviceLogic::Light { input, .. } => &mut input[..],
            DeviceLogic::Led { inputs, .. } => &mut inputs[..],
            DeviceLogic::Counter { inputs, .. } => &mut inputs[..],
            DeviceLogic::Switch { .. } | DeviceLogic::GenericBox => &mut [],
        }
    }

    pub fn output(&self) -> Option<&Slot> {
        match &self.logic {
            DeviceLogic::Gate { output, .. }
            | DeviceLogic::Not { output, .. }
            | DeviceLogic::Switch { output } => Some(output),
            _ => None,
        }
    }

    pub fn output_value(&self) -> Option<bool> {
        self.output().map(Slot::value)
    }

    /// Absolute position of the output slot, if the device has one
    pub fn output_position(&self) -> Option<(f32, f32)> {
        self.output().map(|slot| self.absolute(slot))
    }

    /// Absolute position of input slot `index`
    pub fn input_position(&self, index: usize) -> Option<(f32, f32)> {
        self.inputs().get(index).map(|slot| self.absolute(slot))
    }

    fn absolute(&self, slot: &Slot) -> (f32, f32) {
        (self.x + slot.offset.0, self.y + slot.offset.1)
    }

    /// Write a signal into input slot `index`. Returns false if there is no
    /// such slot.
    pub(crate) fn set_input(&mut self, index: usize, value: bool) -> bool {
        match self.inputs_mut().get_mut(index) {
            Some(slot) => {
                slot.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Flip a switch's output. Returns false (and does nothing) for any
    /// other kind.
    pub fn toggle_switch(&mut self) -> bool {
        match &mut self.logic {
            DeviceLogic::Switch { output } => {
                output.value = !output.value;
                true
            }
            _ => false,
        }
    }

    /// Recompute outputs and display state from the current input values
    pub fn update_state(&mut self) {
        match &mut self.logic {
            DeviceLogic::Gate { op, inputs, output } => {
                output.value = op.evaluate(&inputs[..]);
            }
            DeviceLogic::Not { input, output } => {
                output.value = !input[0].value;
            }
            DeviceLogic::Light { input, lit } => {
                *lit = input[0].value;
            }
            DeviceLogic::Led { inputs, color } => {
                *color = LedColor::from_inputs(inputs[0].value, inputs[1].value, inputs[2].value);
            }
            DeviceLogic::Counter { inputs, value } => {
                *value = inputs
                    .iter()
                    .enumerate()
                    .filter(|(_, slot)| slot.value)
                    .map(|(i, _)| 1u8 << i)
                    .sum();
            }
            // Driven only by the user
            DeviceLogic::Switch { .. } => {}
            DeviceLogic::GenericBox => {}
        }
    }

    pub fn display_state(&self) -> DisplayState {
        match &self.logic {
            DeviceLogic::Light { lit, .. } => DisplayState::Light(*lit),
            DeviceLogic::Led { color, .. } => DisplayState::Led(*color),
            DeviceLogic::Switch { output } => DisplayState::Switch(output.value),
            DeviceLogic::Counter { value, .. } => DisplayState::Counter(*value),
            DeviceLogic::Gate { .. } | DeviceLogic::Not { .. } | DeviceLogic::GenericBox => {
                DisplayState::Static(self.kind())
            }
        }
    }

    /// Copy of this device (geometry, slot values and derived state) under a
    /// new id, moved by `offset`
    pub fn duplicate(&self, id: DeviceId, offset: (f32, f32)) -> Device {
        let (x, y) = offset_point(self.position(), offset);
        Device {
            id,
            x,
            y,
            width: self.width,
            height: self.height,
            logic: self.logic.clone(),
            dragging: false,
        }
    }
}

impl DeviceGeometry for &Device {
    type Id = DeviceId;

    fn id(&self) -> DeviceId {
        self.id
    }

    fn rect(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.width, self.height)
    }
}
