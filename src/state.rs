use std::collections::HashSet;

use log::{debug, warn};

use crate::cable::{Cable, CableId, InputBinding, OutputBinding, ProvisionalCable};
use crate::device::{Device, DeviceId, DeviceKind};
use crate::graph::{validate_cable, CableValidator, GraphLogic, ValidationError};
use crate::hit_test::{
    cables_in_selection_box, devices_at, devices_in_selection_box, find_cable_at,
    find_device_at, find_nearest_slot, SlotGeometry,
};

/// Absolute position of a device's output slot, used as a snap candidate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutputSlotPosition {
    pub binding: OutputBinding,
    pub x: f32,
    pub y: f32,
}

impl SlotGeometry for OutputSlotPosition {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Absolute position of one input slot, used as a snap candidate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSlotPosition {
    pub binding: InputBinding,
    pub x: f32,
    pub y: f32,
}

impl SlotGeometry for InputSlotPosition {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// A slot marker for renderers that highlight connection points while a
/// cable is being drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotMarker {
    pub device: DeviceId,
    pub x: f32,
    pub y: f32,
    pub is_output: bool,
    pub value: bool,
}

/// The circuit: every placed device and every persisted cable
///
/// Collection order matters. Devices later in the list are drawn on top and
/// win hit-tests; cables are evaluated in list order each tick, and snap
/// searches scan devices in list order.
pub struct Circuit {
    devices: Vec<Device>,
    cables: Vec<Cable>,
    next_device_id: i32,
    next_cable_id: i32,
}

impl Default for Circuit {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            cables: Vec::new(),
            next_device_id: 1,
            next_cable_id: 1,
        }
    }
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub(crate) fn devices_mut(&mut self) -> &mut [Device] {
        &mut self.devices
    }

    pub fn cables(&self) -> &[Cable] {
        &self.cables
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id() == id)
    }

    pub fn device_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.id() == id)
    }

    pub fn cable(&self, id: CableId) -> Option<&Cable> {
        self.cables.iter().find(|c| c.id() == id)
    }

    fn allocate_device_id(&mut self) -> DeviceId {
        let id = DeviceId(self.next_device_id);
        self.next_device_id += 1;
        id
    }

    fn allocate_cable_id(&mut self) -> CableId {
        let id = CableId(self.next_cable_id);
        self.next_cable_id += 1;
        id
    }

    // ------------------------------------------------------------------
    // Devices
    // ------------------------------------------------------------------

    /// Place a new device of `kind` with its top-left corner at `position`
    pub fn spawn_device(&mut self, kind: DeviceKind, position: (f32, f32)) -> DeviceId {
        let id = self.allocate_device_id();
        self.devices.push(Device::new(id, kind, position));
        debug!("spawned {} as {} at {:?}", kind, id, position);
        id
    }

    /// Clone each listed device by value, moved by `offset`
    ///
    /// Copies are appended in the order the originals appear in the circuit,
    /// so they stack above everything already placed. Cables are not copied.
    pub fn duplicate_devices(&mut self, ids: &HashSet<DeviceId>, offset: (f32, f32)) -> Vec<DeviceId> {
        let originals: Vec<Device> = self
            .devices
            .iter()
            .filter(|d| ids.contains(&d.id()))
            .cloned()
            .collect();

        let mut created = Vec::with_capacity(originals.len());
        for original in &originals {
            let id = self.allocate_device_id();
            self.devices.push(original.duplicate(id, offset));
            created.push(id);
        }

        debug!("duplicated {} device(s) as {:?}", created.len(), created);
        created
    }

    /// Remove the listed devices together with every cable bound to them
    ///
    /// Returns the ids of the cables removed by the cascade.
    pub fn remove_devices(&mut self, ids: &HashSet<DeviceId>) -> Vec<CableId> {
        let before = self.devices.len();
        self.devices.retain(|d| !ids.contains(&d.id()));
        let removed = before - self.devices.len();

        let dangling: HashSet<CableId> = ids
            .iter()
            .flat_map(|&id| GraphLogic::find_cables_connected_to_device(id, &self.cables))
            .collect();
        let mut cascaded: Vec<CableId> = dangling.iter().copied().collect();
        cascaded.sort();
        self.remove_cables(&dangling);

        debug!("removed {} device(s), cascaded {} cable(s)", removed, cascaded.len());
        cascaded
    }

    /// Move the listed devices by a delta
    pub fn translate_devices(&mut self, ids: &HashSet<DeviceId>, dx: f32, dy: f32) {
        GraphLogic::commit_drag(&mut self.devices, |id| ids.contains(&id), dx, dy);
    }

    /// Move every device by a delta (canvas pan)
    pub fn pan_all(&mut self, dx: f32, dy: f32) {
        GraphLogic::commit_drag(&mut self.devices, |_| true, dx, dy);
    }

    /// Toggle every switch whose bounding box contains the point
    pub fn toggle_switches_at(&mut self, x: f32, y: f32) -> Vec<DeviceId> {
        let hits = devices_at(x, y, self.devices.iter());
        let mut toggled = Vec::new();
        for device in self.devices.iter_mut().filter(|d| hits.contains(&d.id())) {
            if device.toggle_switch() {
                toggled.push(device.id());
            }
        }
        if !toggled.is_empty() {
            debug!("toggled switch(es) {:?}", toggled);
        }
        toggled
    }

    // ------------------------------------------------------------------
    // Cables
    // ------------------------------------------------------------------

    /// Commit a provisional cable into the circuit
    ///
    /// Fails with [`ValidationError::Unbound`] unless both ends are bound,
    /// or with whatever the validator rejects. Nothing is modified on error.
    pub fn commit_cable<V>(
        &mut self,
        provisional: ProvisionalCable,
        validator: &V,
    ) -> Result<CableId, ValidationError>
    where
        V: CableValidator + ?Sized,
    {
        let (output, input) = match (provisional.output(), provisional.input()) {
            (Some(output), Some(input)) => (output, input),
            _ => return Err(ValidationError::Unbound),
        };

        validate_cable(output, input, self, validator).into_result()?;

        let id = self.allocate_cable_id();
        let cable = provisional.into_cable(id).ok_or(ValidationError::Unbound)?;
        self.cables.push(cable);
        debug!("committed {} from {} to {} input {}", id, output.device, input.device, input.index);
        Ok(id)
    }

    /// Connect two slots directly, snapping the cable ends onto them
    pub fn connect<V>(
        &mut self,
        output: OutputBinding,
        input: InputBinding,
        validator: &V,
    ) -> Result<CableId, ValidationError>
    where
        V: CableValidator + ?Sized,
    {
        let start = self
            .device(output.device)
            .ok_or(ValidationError::DeviceNotFound(output.device))?
            .output_position()
            .ok_or(ValidationError::NoOutputSlot(output.device))?;
        let end = self
            .device(input.device)
            .ok_or(ValidationError::DeviceNotFound(input.device))?
            .input_position(input.index)
            .ok_or(ValidationError::NoInputSlot { device: input.device, index: input.index })?;

        let mut provisional = ProvisionalCable::new(start, end, Some(output));
        provisional.bind_input(input, end);
        self.commit_cable(provisional, validator)
    }

    /// Remove the listed cables
    ///
    /// An input slot left without any driver is reset to low.
    pub fn remove_cables(&mut self, ids: &HashSet<CableId>) -> usize {
        let released: Vec<InputBinding> = self
            .cables
            .iter()
            .filter(|c| ids.contains(&c.id()))
            .map(Cable::input)
            .collect();

        self.cables.retain(|c| !ids.contains(&c.id()));

        for input in &released {
            if GraphLogic::input_driver(*input, &self.cables).is_some() {
                continue;
            }
            if let Some(device) = self.device_mut(input.device) {
                device.set_input(input.index, false);
            }
        }

        released.len()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Output slots of every device, in device order
    pub fn output_slots(&self) -> impl Iterator<Item = OutputSlotPosition> + '_ {
        self.devices.iter().filter_map(|device| {
            let (x, y) = device.output_position()?;
            Some(OutputSlotPosition {
                binding: OutputBinding { device: device.id() },
                x,
                y,
            })
        })
    }

    /// Input slots of every device, in device order then slot index order
    pub fn input_slots(&self) -> impl Iterator<Item = InputSlotPosition> + '_ {
        self.devices.iter().flat_map(|device| {
            (0..device.inputs().len()).filter_map(move |index| {
                let (x, y) = device.input_position(index)?;
                Some(InputSlotPosition {
                    binding: InputBinding { device: device.id(), index },
                    x,
                    y,
                })
            })
        })
    }

    /// Every slot on the canvas with its current value
    pub fn slot_markers(&self) -> Vec<SlotMarker> {
        let mut markers = Vec::new();
        for device in &self.devices {
            for (index, slot) in device.inputs().iter().enumerate() {
                if let Some((x, y)) = device.input_position(index) {
                    markers.push(SlotMarker {
                        device: device.id(),
                        x,
                        y,
                        is_output: false,
                        value: slot.value(),
                    });
                }
            }
            if let (Some((x, y)), Some(value)) = (device.output_position(), device.output_value()) {
                markers.push(SlotMarker { device: device.id(), x, y, is_output: true, value });
            }
        }
        markers
    }

    pub fn find_nearest_output(&self, x: f32, y: f32, snap_radius: f32) -> Option<OutputSlotPosition> {
        find_nearest_slot(x, y, self.output_slots(), snap_radius)
    }

    pub fn find_nearest_input(&self, x: f32, y: f32, snap_radius: f32) -> Option<InputSlotPosition> {
        find_nearest_slot(x, y, self.input_slots(), snap_radius)
    }

    pub fn find_cable_at(&self, x: f32, y: f32, hit_distance: f32) -> Option<CableId> {
        find_cable_at(x, y, self.cables.iter(), hit_distance)
    }

    /// Topmost device under the point
    pub fn device_at(&self, x: f32, y: f32) -> Option<DeviceId> {
        find_device_at(x, y, self.devices.iter())
    }

    pub fn devices_at(&self, x: f32, y: f32) -> Vec<DeviceId> {
        devices_at(x, y, self.devices.iter())
    }

    pub fn devices_in_box(&self, rect: (f32, f32, f32, f32)) -> Vec<DeviceId> {
        let (x, y, w, h) = rect;
        devices_in_selection_box(x, y, w, h, self.devices.iter())
    }

    pub fn cables_in_box(&self, rect: (f32, f32, f32, f32)) -> Vec<CableId> {
        let (x, y, w, h) = rect;
        cables_in_selection_box(x, y, w, h, self.cables.iter())
    }

    // ------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------

    /// Re-attach every cable to its slots and copy the driving output value
    /// into the bound input
    pub fn refresh_cables(&mut self) {
        for cable in self.cables.iter_mut() {
            let output = cable.output();
            let input = cable.input();

            let source = self.devices.iter().find(|d| d.id() == output.device);
            let start = source.and_then(Device::output_position);
            let value = source.and_then(Device::output_value);
            let end = self
                .devices
                .iter()
                .find(|d| d.id() == input.device)
                .and_then(|d| d.input_position(input.index));

            cable.set_endpoints(start, end);

            match value {
                Some(value) => {
                    cable.set_active(value);
                    if let Some(target) = self.devices.iter_mut().find(|d| d.id() == input.device) {
                        target.set_input(input.index, value);
                    }
                }
                None => warn!("{} is bound to missing output of {}", cable.id(), output.device),
            }
        }
    }

    /// Recompute every device from its current input values
    pub fn update_devices(&mut self) {
        for device in &mut self.devices {
            device.update_state();
        }
    }

    /// Advance the circuit by one frame
    ///
    /// Cables copy first, devices compute second, so a value crosses exactly
    /// one device per tick.
    pub fn tick(&mut self) {
        self.refresh_cables();
        self.update_devices();
    }
}
