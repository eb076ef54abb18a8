//! The interaction controller: turns pointer and key events into edits of the
//! circuit.
//!
//! [`EditorController`] owns the [`Circuit`] together with every piece of
//! gesture state (drag in progress, rubber band, provisional cable, cable
//! mode, selections). It has no window dependency; a front-end feeds it
//! [`InputEvent`]s and calls [`EditorController::run_frame`] once per frame.
//!
//! # Event routing
//!
//! Outside cable mode a press is offered to these handlers in order, and the
//! first one that accepts it consumes it:
//!
//! 1. toolbar buttons (left press only)
//! 2. existing cables (left press adds the cable to the selection)
//! 3. drags: middle press pans everything, left press on a selected device
//!    drags the selection, left press on any other device drags it alone
//! 4. left press on empty canvas starts a rubber band
//!
//! A right press toggles every switch under the pointer regardless. Key
//! presses act on the selection, and only outside cable mode.
//!
//! In cable mode the toolbar still answers, but every other left press
//! starts a provisional cable from the nearest output slot.
//!
//! # Example
//!
//! ```ignore
//! use logic_canvas::{EditorController, InputEvent};
//! use slint::platform::PointerEventButton;
//!
//! let mut editor = EditorController::new();
//! editor.run_frame([
//!     InputEvent::PointerPressed { position: (20.0, 20.0), button: PointerEventButton::Left },
//!     InputEvent::PointerReleased { position: (20.0, 20.0), button: PointerEventButton::Left },
//! ]);
//! assert_eq!(editor.circuit().devices().len(), 1); // AND spawned from the toolbar
//! ```

use crate::cable::{CableId, ProvisionalCable};
use crate::device::{DeviceId, DeviceKind};
use crate::graph::{CableValidator, CompositeValidator, ValidationError};
use crate::palette::{Palette, PaletteAction};
use crate::selection::{SelectionBox, SelectionManager};
use crate::settings::EditorSettings;
use crate::state::Circuit;
use log::{debug, trace, warn};
use slint::platform::PointerEventButton;
use slint::SharedString;

/// Input vocabulary of the editor, in logical canvas coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerPressed { position: (f32, f32), button: PointerEventButton },
    PointerMoved { position: (f32, f32) },
    PointerReleased { position: (f32, f32), button: PointerEventButton },
    /// Text of the pressed key, as Slint reports it
    KeyPressed { text: SharedString },
}

/// Drag gesture in progress. `last` is the pointer position of the previous
/// event, so each motion applies only its own delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Panning { last: (f32, f32) },
    Selection { last: (f32, f32) },
    Single { device: DeviceId, last: (f32, f32) },
}

/// Owns the circuit and all editing state
pub struct EditorController {
    circuit: Circuit,
    palette: Palette,
    settings: EditorSettings,
    validator: Box<dyn CableValidator>,
    device_selection: SelectionManager<DeviceId>,
    cable_selection: SelectionManager<CableId>,
    cable_mode: bool,
    drag: DragState,
    selection_box: Option<SelectionBox>,
    provisional: Option<ProvisionalCable>,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorController {
    /// Editor with the default toolbar and settings
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            circuit: Circuit::new(),
            palette: Palette::default_toolbar(),
            validator: Box::new(CompositeValidator::standard(settings.allow_fan_in)),
            settings,
            device_selection: SelectionManager::new(),
            cable_selection: SelectionManager::new(),
            cable_mode: false,
            drag: DragState::Idle,
            selection_box: None,
            provisional: None,
        }
    }

    // === Configuration ===

    /// Replace the toolbar
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Replace the rule set applied when a cable is committed
    pub fn set_validator<V: CableValidator + 'static>(&mut self, validator: V) {
        self.validator = Box::new(validator);
    }

    /// Set the snap radius for cable ends (default: 50.0)
    pub fn set_snap_radius(&mut self, radius: f32) {
        self.settings.snap_radius = radius;
    }

    /// Set how close a press must be to hit a cable (default: 5.0)
    pub fn set_cable_hit_distance(&mut self, distance: f32) {
        self.settings.cable_hit_distance = distance;
    }

    /// Allow or forbid several cables on one input. Resets the validator to
    /// the standard rule set.
    pub fn set_allow_fan_in(&mut self, allow: bool) {
        self.settings.allow_fan_in = allow;
        self.validator = Box::new(CompositeValidator::standard(allow));
    }

    // === Accessors ===

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn cable_mode(&self) -> bool {
        self.cable_mode
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Device currently dragged on its own, if any
    pub fn dragged_device(&self) -> Option<DeviceId> {
        match self.drag {
            DragState::Single { device, .. } => Some(device),
            _ => None,
        }
    }

    pub fn selection_box(&self) -> Option<&SelectionBox> {
        self.selection_box.as_ref()
    }

    pub fn provisional_cable(&self) -> Option<&ProvisionalCable> {
        self.provisional.as_ref()
    }

    pub fn selected_devices(&self) -> &SelectionManager<DeviceId> {
        &self.device_selection
    }

    pub fn selected_cables(&self) -> &SelectionManager<CableId> {
        &self.cable_selection
    }

    pub fn is_device_selected(&self, id: DeviceId) -> bool {
        self.device_selection.contains(id)
    }

    pub fn is_cable_selected(&self, id: CableId) -> bool {
        self.cable_selection.contains(id)
    }

    pub fn has_selection(&self) -> bool {
        !self.device_selection.is_empty() || !self.cable_selection.is_empty()
    }

    // === Direct actions ===

    /// Place a device of `kind` at the spawn point
    pub fn spawn_device(&mut self, kind: DeviceKind) -> DeviceId {
        self.circuit.spawn_device(kind, self.settings.spawn_point)
    }

    /// Flip cable-creation mode. Entering the mode abandons any drag or
    /// rubber band; leaving it drops any provisional cable.
    pub fn toggle_cable_mode(&mut self) {
        self.set_cable_mode(!self.cable_mode);
    }

    pub fn set_cable_mode(&mut self, enabled: bool) {
        if self.cable_mode == enabled {
            return;
        }
        self.cable_mode = enabled;
        if enabled {
            self.cancel_gestures();
        } else if self.provisional.take().is_some() {
            debug!("provisional cable dropped on leaving cable mode");
        }
        debug!("cable mode {}", if enabled { "on" } else { "off" });
    }

    /// Clone every selected device; the copies become the selection
    pub fn duplicate_selection(&mut self) -> Vec<DeviceId> {
        let originals = self.device_selection.to_set();
        let copies = self
            .circuit
            .duplicate_devices(&originals, self.settings.duplicate_offset);
        self.device_selection.replace_selection(copies.iter().copied());
        self.cable_selection.clear();
        copies
    }

    /// Remove every selected device (with its cables) and every selected cable
    pub fn delete_selection(&mut self) {
        let devices = self.device_selection.to_set();
        let cables = self.cable_selection.to_set();

        let removed_cables = self.circuit.remove_cables(&cables);
        let cascaded = self.circuit.remove_devices(&devices);
        debug!(
            "deleted {} device(s), {} selected cable(s), {} attached cable(s)",
            devices.len(),
            removed_cables,
            cascaded.len()
        );

        if let Some(device) = self.dragged_device() {
            if devices.contains(&device) {
                self.drag = DragState::Idle;
            }
        }
        self.device_selection.clear();
        self.cable_selection.clear();
    }

    /// Abandon any drag or rubber band in progress
    fn cancel_gestures(&mut self) {
        if let Some(device) = self.dragged_device() {
            if let Some(d) = self.circuit.device_mut(device) {
                d.dragging = false;
            }
        }
        let had_band = self.selection_box.take().is_some();
        if had_band || self.drag != DragState::Idle {
            trace!("gesture cancelled on entering cable mode");
        }
        self.drag = DragState::Idle;
    }

    // === Frame loop ===

    /// Feed one frame's worth of events, then advance the circuit one tick
    pub fn run_frame<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        for event in events {
            self.handle_event(event);
        }
        self.circuit.tick();
    }

    /// Route a single event. Returns whether any handler used it.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerPressed { position, button } => self.pointer_pressed(position, button),
            InputEvent::PointerMoved { position } => self.pointer_moved(position),
            InputEvent::PointerReleased { position, button } => {
                self.pointer_released(position, button)
            }
            InputEvent::KeyPressed { text } => self.key_pressed(&text),
        }
    }

    fn pointer_pressed(&mut self, position: (f32, f32), button: PointerEventButton) -> bool {
        let (x, y) = position;

        if button == PointerEventButton::Left && self.press_palette(x, y) {
            return true;
        }

        if self.cable_mode {
            return button == PointerEventButton::Left && self.start_cable(position);
        }

        let mut consumed = false;
        if button == PointerEventButton::Right {
            consumed = !self.circuit.toggle_switches_at(x, y).is_empty();
        }

        if button == PointerEventButton::Left {
            if let Some(cable) = self.circuit.find_cable_at(x, y, self.settings.cable_hit_distance) {
                trace!("press at {:?} hit {}", position, cable);
                self.cable_selection.add(cable);
                return true;
            }
        }

        match button {
            PointerEventButton::Middle => {
                trace!("press at {:?} starts pan", position);
                self.drag = DragState::Panning { last: position };
                true
            }
            PointerEventButton::Left => {
                let hits = self.circuit.devices_at(x, y);
                if hits.iter().any(|&id| self.device_selection.contains(id)) {
                    trace!("press at {:?} drags the selection", position);
                    self.drag = DragState::Selection { last: position };
                } else if let Some(&device) = hits.last() {
                    trace!("press at {:?} drags {}", position, device);
                    if let Some(d) = self.circuit.device_mut(device) {
                        d.dragging = true;
                    }
                    self.drag = DragState::Single { device, last: position };
                } else {
                    trace!("press at {:?} starts rubber band", position);
                    self.selection_box = Some(SelectionBox::new(position));
                }
                true
            }
            _ => consumed,
        }
    }

    fn press_palette(&mut self, x: f32, y: f32) -> bool {
        let identifier = match self.palette.button_at(x, y) {
            Some(button) => button.identifier().to_string(),
            None => return false,
        };

        match identifier.parse::<PaletteAction>() {
            Ok(PaletteAction::Spawn(kind)) => {
                self.spawn_device(kind);
            }
            Ok(PaletteAction::ToggleCableMode) => self.toggle_cable_mode(),
            Err(err) => warn!("toolbar button ignored: {}", err),
        }
        true
    }

    fn start_cable(&mut self, position: (f32, f32)) -> bool {
        let (x, y) = position;
        let provisional = match self.circuit.find_nearest_output(x, y, self.settings.snap_radius) {
            Some(slot) => {
                trace!("cable starts on output of {}", slot.binding.device);
                ProvisionalCable::new((slot.x, slot.y), position, Some(slot.binding))
            }
            None => {
                trace!("cable starts unbound at {:?}", position);
                ProvisionalCable::new(position, position, None)
            }
        };
        self.provisional = Some(provisional);
        true
    }

    fn pointer_moved(&mut self, position: (f32, f32)) -> bool {
        if let Some(provisional) = self.provisional.as_mut() {
            provisional.follow(position);
            return true;
        }

        if let Some(selection_box) = self.selection_box.as_mut() {
            selection_box.update(position);
            return true;
        }

        match self.drag {
            DragState::Idle => false,
            DragState::Panning { last } => {
                self.circuit.pan_all(position.0 - last.0, position.1 - last.1);
                self.drag = DragState::Panning { last: position };
                true
            }
            DragState::Selection { last } => {
                let ids = self.device_selection.to_set();
                self.circuit
                    .translate_devices(&ids, position.0 - last.0, position.1 - last.1);
                self.drag = DragState::Selection { last: position };
                true
            }
            DragState::Single { device, last } => {
                if let Some(d) = self.circuit.device_mut(device) {
                    d.translate(position.0 - last.0, position.1 - last.1);
                }
                self.drag = DragState::Single { device, last: position };
                true
            }
        }
    }

    fn pointer_released(&mut self, position: (f32, f32), button: PointerEventButton) -> bool {
        if self.provisional.is_some() {
            if button != PointerEventButton::Left {
                return false;
            }
            self.finish_cable(position);
            return true;
        }

        let mut consumed = false;

        if button == PointerEventButton::Left {
            if let Some(selection_box) = self.selection_box.take() {
                self.finish_rubber_band(selection_box, position);
                consumed = true;
            }
        }

        match self.drag {
            DragState::Idle => {}
            DragState::Panning { .. } => {
                if button == PointerEventButton::Middle {
                    self.drag = DragState::Idle;
                    consumed = true;
                }
            }
            DragState::Selection { .. } => {
                self.drag = DragState::Idle;
                consumed = true;
            }
            DragState::Single { device, .. } => {
                if let Some(d) = self.circuit.device_mut(device) {
                    d.dragging = false;
                }
                self.drag = DragState::Idle;
                consumed = true;
            }
        }

        consumed
    }

    /// Exclusive rubber-band selection on release
    fn finish_rubber_band(&mut self, mut selection_box: SelectionBox, position: (f32, f32)) {
        selection_box.update(position);
        let rect = selection_box.rect();

        let devices = self.circuit.devices_in_box(rect);
        let cables = self.circuit.cables_in_box(rect);
        debug!(
            "rubber band {:?} selected {} device(s), {} cable(s)",
            rect,
            devices.len(),
            cables.len()
        );
        self.device_selection.replace_selection(devices);
        self.cable_selection.replace_selection(cables);
    }

    fn finish_cable(&mut self, position: (f32, f32)) {
        let Some(mut provisional) = self.provisional.take() else {
            return;
        };
        provisional.follow(position);

        let (x, y) = position;
        if let Some(slot) = self.circuit.find_nearest_input(x, y, self.settings.snap_radius) {
            provisional.bind_input(slot.binding, (slot.x, slot.y));
        }

        match self.circuit.commit_cable(provisional, self.validator.as_ref()) {
            Ok(id) => trace!("cable gesture produced {}", id),
            Err(ValidationError::Unbound) => debug!("cable discarded: not bound at both ends"),
            Err(err) => debug!("cable discarded: {}", err),
        }
    }

    fn key_pressed(&mut self, text: &str) -> bool {
        if self.cable_mode || !self.has_selection() {
            return false;
        }

        if text == self.settings.duplicate_key.as_str() {
            self.duplicate_selection();
            true
        } else if text == self.settings.delete_key.as_str() {
            self.delete_selection();
            true
        } else {
            false
        }
    }
}
