//! Test harness driving an editor the way a window would.
//!
//! Every interaction goes through the same callback factories a Slint window
//! wires up, and `frame()` runs the per-frame callback, so the bound models
//! hold exactly what a renderer would draw.

#![allow(dead_code)]

use super::{button_center, init_logging, CABLE_BUTTON};
use logic_canvas::{
    CableId, CableView, Device, DeviceId, DeviceKind, DeviceView, EditorController,
    EditorHandle, EditorSettings,
};
use slint::platform::{Key, PointerEventButton};
use slint::{Model, SharedString, VecModel};
use std::rc::Rc;

pub struct CircuitHarness {
    pub handle: EditorHandle,
    pub devices: Rc<VecModel<DeviceView>>,
    pub cables: Rc<VecModel<CableView>>,
}

impl CircuitHarness {
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        init_logging();
        let handle = EditorHandle::with_controller(EditorController::with_settings(settings));

        let devices = Rc::new(VecModel::<DeviceView>::default());
        handle.bind_device_model(devices.clone(), |view| view.clone());

        let cables = Rc::new(VecModel::<CableView>::default());
        handle.bind_cable_model(cables.clone(), |view| view.clone());

        Self { handle, devices, cables }
    }

    // === Pointer input ===

    pub fn press(&self, x: f32, y: f32, button: PointerEventButton) {
        (self.handle.pointer_pressed_callback())(x, y, button);
    }

    pub fn move_to(&self, x: f32, y: f32) {
        (self.handle.pointer_moved_callback())(x, y);
    }

    pub fn release(&self, x: f32, y: f32, button: PointerEventButton) {
        (self.handle.pointer_released_callback())(x, y, button);
    }

    pub fn click(&self, x: f32, y: f32) {
        self.press(x, y, PointerEventButton::Left);
        self.release(x, y, PointerEventButton::Left);
    }

    pub fn right_click(&self, x: f32, y: f32) {
        self.press(x, y, PointerEventButton::Right);
        self.release(x, y, PointerEventButton::Right);
    }

    /// Press, move in one step, release
    pub fn drag(&self, from: (f32, f32), to: (f32, f32), button: PointerEventButton) {
        self.press(from.0, from.1, button);
        self.move_to(to.0, to.1);
        self.release(to.0, to.1, button);
    }

    pub fn left_drag(&self, from: (f32, f32), to: (f32, f32)) {
        self.drag(from, to, PointerEventButton::Left);
    }

    // === Keyboard ===

    pub fn key(&self, text: impl Into<SharedString>) -> bool {
        (self.handle.key_pressed_callback())(text.into())
    }

    pub fn press_duplicate(&self) -> bool {
        self.key("d")
    }

    pub fn press_delete(&self) -> bool {
        self.key(Key::Backspace)
    }

    // === Toolbar ===

    /// Spawn a device by clicking its toolbar button
    pub fn spawn(&self, kind: DeviceKind) -> DeviceId {
        let (x, y) = button_center(kind);
        self.click(x, y);
        self.with_editor(|e| e.circuit().devices().last().map(Device::id))
            .expect("toolbar click spawns a device")
    }

    /// Spawn a device and drag it from the spawn point to `position`
    pub fn place(&self, kind: DeviceKind, position: (f32, f32)) -> DeviceId {
        let id = self.spawn(kind);
        let (sx, sy) = self.with_editor(|e| e.settings().spawn_point);
        // Grab 5px inside the top-left corner
        self.left_drag((sx + 5.0, sy + 5.0), (position.0 + 5.0, position.1 + 5.0));
        id
    }

    pub fn toggle_cable_mode(&self) {
        self.click(CABLE_BUTTON.0, CABLE_BUTTON.1);
    }

    /// Draw a cable in cable mode, entering and leaving the mode around it
    pub fn draw_cable(&self, from: (f32, f32), to: (f32, f32)) {
        let was_on = self.cable_mode();
        if !was_on {
            self.toggle_cable_mode();
        }
        self.left_drag(from, to);
        if !was_on {
            self.toggle_cable_mode();
        }
    }

    /// Wire the output of `source` to input `index` of `target` by gesture
    pub fn wire(&self, source: DeviceId, target: DeviceId, index: usize) {
        let from = self.output_position(source);
        let to = self.input_position(target, index);
        self.draw_cable(from, to);
    }

    // === Frames ===

    pub fn frame(&self) {
        (self.handle.frame_callback())();
    }

    pub fn frames(&self, n: usize) {
        for _ in 0..n {
            self.frame();
        }
    }

    // === State access ===

    pub fn with_editor<R>(&self, f: impl FnOnce(&EditorController) -> R) -> R {
        let controller = self.handle.controller();
        let editor = controller.borrow();
        f(&editor)
    }

    pub fn with_editor_mut<R>(&self, f: impl FnOnce(&mut EditorController) -> R) -> R {
        let controller = self.handle.controller();
        let mut editor = controller.borrow_mut();
        f(&mut editor)
    }

    pub fn device(&self, id: DeviceId) -> Device {
        self.with_editor(|e| e.circuit().device(id).cloned())
            .unwrap_or_else(|| panic!("{} should exist", id))
    }

    pub fn position(&self, id: DeviceId) -> (f32, f32) {
        self.device(id).position()
    }

    pub fn output_position(&self, id: DeviceId) -> (f32, f32) {
        self.device(id).output_position().expect("device has an output")
    }

    pub fn input_position(&self, id: DeviceId, index: usize) -> (f32, f32) {
        self.device(id).input_position(index).expect("input index in range")
    }

    pub fn device_count(&self) -> usize {
        self.with_editor(|e| e.circuit().devices().len())
    }

    pub fn cable_count(&self) -> usize {
        self.with_editor(|e| e.circuit().cables().len())
    }

    pub fn cable_ids(&self) -> Vec<CableId> {
        self.with_editor(|e| e.circuit().cables().iter().map(|c| c.id()).collect())
    }

    pub fn cable_mode(&self) -> bool {
        self.with_editor(|e| e.cable_mode())
    }

    pub fn is_selected(&self, id: DeviceId) -> bool {
        self.with_editor(|e| e.is_device_selected(id))
    }

    pub fn is_cable_selected(&self, id: CableId) -> bool {
        self.with_editor(|e| e.is_cable_selected(id))
    }

    pub fn selected_device_count(&self) -> usize {
        self.with_editor(|e| e.selected_devices().len())
    }

    pub fn selected_cable_count(&self) -> usize {
        self.with_editor(|e| e.selected_cables().len())
    }

    /// Flip a switch by right-clicking inside it
    pub fn toggle_switch(&self, id: DeviceId) {
        let (x, y) = self.position(id);
        self.right_click(x + 5.0, y + 5.0);
    }

    pub fn output(&self, id: DeviceId) -> Option<bool> {
        self.device(id).output_value()
    }

    pub fn asset(&self, id: DeviceId) -> String {
        self.device(id).display_state().asset_name()
    }

    /// Rendered row for a device, as last synced
    pub fn device_row(&self, id: DeviceId) -> Option<DeviceView> {
        self.devices.iter().find(|row| row.id == id.0)
    }

    /// Rendered row for a cable, as last synced
    pub fn cable_row(&self, id: CableId) -> Option<CableView> {
        self.cables.iter().find(|row| row.id == id.0)
    }
}
