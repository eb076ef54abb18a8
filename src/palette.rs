//! The toolbar: buttons that spawn devices or toggle cable-creation mode.
//!
//! The editor only needs two things from a button: whether a press landed
//! on it and the identifier it carries. Rendering is left to the UI.

use crate::device::{DeviceKind, UnknownDeviceKind};
use crate::hit_test::rect_contains;
use slint::SharedString;
use std::str::FromStr;

/// Identifier carried by the cable-mode toggle
pub const CABLE_TOGGLE: &str = "CABLE";

/// A clickable toolbar entry
pub trait PaletteButton {
    fn identifier(&self) -> &str;
    fn hit(&self, x: f32, y: f32) -> bool;
}

/// Rectangular button at a fixed position
#[derive(Clone, Debug, PartialEq)]
pub struct ToolButton {
    identifier: SharedString,
    rect: (f32, f32, f32, f32),
}

impl ToolButton {
    pub fn new(identifier: impl Into<SharedString>, rect: (f32, f32, f32, f32)) -> Self {
        Self { identifier: identifier.into(), rect }
    }

    pub fn rect(&self) -> (f32, f32, f32, f32) {
        self.rect
    }
}

impl PaletteButton for ToolButton {
    fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    fn hit(&self, x: f32, y: f32) -> bool {
        rect_contains(self.rect, x, y)
    }
}

/// What pressing a button asks the editor to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteAction {
    Spawn(DeviceKind),
    ToggleCableMode,
}

impl FromStr for PaletteAction {
    type Err = UnknownDeviceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == CABLE_TOGGLE {
            Ok(PaletteAction::ToggleCableMode)
        } else {
            s.parse().map(PaletteAction::Spawn)
        }
    }
}

/// Ordered collection of toolbar buttons
#[derive(Default)]
pub struct Palette {
    buttons: Vec<Box<dyn PaletteButton>>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard toolbar along the top edge of the canvas
    ///
    /// Gates sit at x = 10..460, indicators and the box at x = 600..960, the
    /// cable toggle at x = 1100. Every button is 80x40 at y = 10.
    pub fn default_toolbar() -> Self {
        let button = |identifier: &str, x: f32| ToolButton::new(identifier, (x, 10.0, 80.0, 40.0));

        let gates = ["AND", "OR", "NOT", "NAND", "NOR", "XOR"];
        let others = ["LIGHT", "LED", "SWITCH", "COUNTER", "BOX"];

        let mut palette = Self::new();
        for (i, id) in gates.into_iter().enumerate() {
            palette = palette.add(button(id, 10.0 + 90.0 * i as f32));
        }
        for (i, id) in others.into_iter().enumerate() {
            palette = palette.add(button(id, 600.0 + 90.0 * i as f32));
        }
        palette.add(button(CABLE_TOGGLE, 1100.0))
    }

    /// Append a button. Earlier buttons win overlapping hits.
    pub fn add<B: PaletteButton + 'static>(mut self, button: B) -> Self {
        self.buttons.push(Box::new(button));
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &(dyn PaletteButton + 'static)> + '_ {
        self.buttons.iter().map(|b| b.as_ref())
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// First button under the point
    pub fn button_at(&self, x: f32, y: f32) -> Option<&(dyn PaletteButton + 'static)> {
        self.buttons().find(|b| b.hit(x, y))
    }
}
