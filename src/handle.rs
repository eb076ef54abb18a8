//! Shared handle for wiring an [`EditorController`] into Slint callbacks.
//!
//! Slint callbacks are `'static` closures, so the controller lives behind
//! `Rc<RefCell<_>>` and each factory method hands out a closure holding a
//! clone of that reference.
//!
//! # Example
//!
//! ```ignore
//! use logic_canvas::EditorHandle;
//! use slint::{ModelRc, VecModel};
//! use std::rc::Rc;
//!
//! slint::include_modules!();
//!
//! let window = MainWindow::new().unwrap();
//! let editor = EditorHandle::new();
//!
//! window.on_pointer_pressed(editor.pointer_pressed_callback());
//! window.on_pointer_moved(editor.pointer_moved_callback());
//! window.on_pointer_released(editor.pointer_released_callback());
//! window.on_key_pressed(editor.key_pressed_callback());
//!
//! // Bind once - every frame syncs the models automatically
//! let devices = Rc::new(VecModel::<DeviceItem>::default());
//! editor.bind_device_model(devices.clone(), |view| DeviceItem {
//!     x: view.x,
//!     y: view.y,
//!     asset: view.asset.clone(),
//!     selected: view.selected,
//! });
//! window.set_devices(ModelRc::from(devices));
//!
//! let timer = slint::Timer::default();
//! timer.start(slint::TimerMode::Repeated, std::time::Duration::from_millis(16), editor.frame_callback());
//! window.run().unwrap();
//! ```

use crate::cable::cable_color;
use crate::controller::{EditorController, InputEvent};
use slint::platform::PointerEventButton;
use slint::{Color, Model, SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;

/// Render data for one device
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceView {
    pub id: i32,
    pub kind: SharedString,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Artwork key, see [`crate::device::DisplayState::asset_name`]
    pub asset: SharedString,
    pub selected: bool,
    pub dragging: bool,
}

/// Render data for one cable
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CableView {
    /// 0 for the cable still being drawn
    pub id: i32,
    pub path_commands: SharedString,
    pub color: Color,
    pub selected: bool,
    pub provisional: bool,
}

/// Render data for a slot marker, shown in cable mode
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlotView {
    pub x: f32,
    pub y: f32,
    pub is_output: bool,
    pub value: bool,
}

/// Devices in drawing order
pub fn device_views(editor: &EditorController) -> Vec<DeviceView> {
    editor
        .circuit()
        .devices()
        .iter()
        .map(|device| {
            let (x, y) = device.position();
            let (width, height) = device.size();
            DeviceView {
                id: device.id().0,
                kind: device.kind().identifier().into(),
                x,
                y,
                width,
                height,
                asset: device.display_state().asset_name().into(),
                selected: editor.is_device_selected(device.id()),
                dragging: device.dragging,
            }
        })
        .collect()
}

/// Persisted cables, followed by the provisional one while it exists
pub fn cable_views(editor: &EditorController) -> Vec<CableView> {
    let mut views: Vec<CableView> = editor
        .circuit()
        .cables()
        .iter()
        .map(|cable| {
            let selected = editor.is_cable_selected(cable.id());
            CableView {
                id: cable.id().0,
                path_commands: cable.path_commands().into(),
                color: cable_color(cable.active(), selected),
                selected,
                provisional: false,
            }
        })
        .collect();

    if let Some(provisional) = editor.provisional_cable() {
        views.push(CableView {
            id: 0,
            path_commands: provisional.path_commands().into(),
            color: cable_color(false, false),
            selected: false,
            provisional: true,
        });
    }
    views
}

/// Slot markers, only while cable mode is on
pub fn slot_views(editor: &EditorController) -> Vec<SlotView> {
    if !editor.cable_mode() {
        return Vec::new();
    }
    editor
        .circuit()
        .slot_markers()
        .into_iter()
        .map(|m| SlotView { x: m.x, y: m.y, is_output: m.is_output, value: m.value })
        .collect()
}

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer<T> {
    fn sync(&self, rows: &[T]);
}

struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<T, P, F> ModelSyncer<T> for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&T) -> P,
{
    fn sync(&self, rows: &[T]) {
        // Update existing rows or add new ones
        for (i, row) in rows.iter().enumerate() {
            let item = (self.constructor)(row);
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > rows.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

type Syncer<T> = Rc<RefCell<Option<Box<dyn ModelSyncer<T>>>>>;

/// Cloneable handle sharing one [`EditorController`] between callbacks
#[derive(Clone)]
pub struct EditorHandle {
    controller: Rc<RefCell<EditorController>>,
    devices: Syncer<DeviceView>,
    cables: Syncer<CableView>,
    slots: Syncer<SlotView>,
}

impl Default for EditorHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHandle {
    pub fn new() -> Self {
        Self::with_controller(EditorController::new())
    }

    pub fn with_controller(controller: EditorController) -> Self {
        Self {
            controller: Rc::new(RefCell::new(controller)),
            devices: Rc::new(RefCell::new(None)),
            cables: Rc::new(RefCell::new(None)),
            slots: Rc::new(RefCell::new(None)),
        }
    }

    /// Get a clone of the shared controller reference.
    pub fn controller(&self) -> Rc<RefCell<EditorController>> {
        self.controller.clone()
    }

    // === Model binding ===

    /// Bind a Slint model that receives one row per device after every frame
    pub fn bind_device_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&DeviceView) -> P + 'static,
    {
        *self.devices.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Bind a Slint model that receives one row per cable after every frame
    pub fn bind_cable_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&CableView) -> P + 'static,
    {
        *self.cables.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Bind a Slint model that receives slot markers (empty outside cable mode)
    pub fn bind_slot_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&SlotView) -> P + 'static,
    {
        *self.slots.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Push the current state into every bound model
    pub fn sync_models(&self) {
        let editor = self.controller.borrow();
        if let Some(syncer) = self.devices.borrow().as_ref() {
            syncer.sync(&device_views(&editor));
        }
        if let Some(syncer) = self.cables.borrow().as_ref() {
            syncer.sync(&cable_views(&editor));
        }
        if let Some(syncer) = self.slots.borrow().as_ref() {
            syncer.sync(&slot_views(&editor));
        }
    }

    // === Direct handlers ===

    pub fn handle_event(&self, event: InputEvent) -> bool {
        self.controller.borrow_mut().handle_event(event)
    }

    /// Advance the circuit one tick and sync the bound models
    pub fn frame(&self) {
        self.controller.borrow_mut().circuit_mut().tick();
        self.sync_models();
    }

    // === Callback factories ===

    /// Returns a callback for `pointer-pressed(x, y, button)`.
    pub fn pointer_pressed_callback(&self) -> impl Fn(f32, f32, PointerEventButton) + Clone {
        let handle = self.clone();
        move |x, y, button| {
            handle.handle_event(InputEvent::PointerPressed { position: (x, y), button });
        }
    }

    /// Returns a callback for `pointer-moved(x, y)`.
    pub fn pointer_moved_callback(&self) -> impl Fn(f32, f32) + Clone {
        let handle = self.clone();
        move |x, y| {
            handle.handle_event(InputEvent::PointerMoved { position: (x, y) });
        }
    }

    /// Returns a callback for `pointer-released(x, y, button)`.
    pub fn pointer_released_callback(&self) -> impl Fn(f32, f32, PointerEventButton) + Clone {
        let handle = self.clone();
        move |x, y, button| {
            handle.handle_event(InputEvent::PointerReleased { position: (x, y), button });
        }
    }

    /// Returns a callback for `key-pressed(text) -> bool`.
    ///
    /// The result tells Slint whether the key was used.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString) -> bool + Clone {
        let handle = self.clone();
        move |text| handle.handle_event(InputEvent::KeyPressed { text })
    }

    /// Returns a per-frame callback, suitable for a repeated `slint::Timer`.
    pub fn frame_callback(&self) -> impl Fn() + Clone {
        let handle = self.clone();
        move || handle.frame()
    }
}
