use slint::platform::Key;
use slint::SharedString;

/// Tunable constants of the editor
///
/// Distances are in logical pixels. Key bindings compare against the text
/// Slint reports for a key press.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// How far a cable end may be from a slot and still snap onto it
    pub snap_radius: f32,
    /// How close a press must be to a cable to hit it
    pub cable_hit_distance: f32,
    /// Top-left corner of newly spawned devices
    pub spawn_point: (f32, f32),
    /// Displacement of duplicates relative to their originals
    pub duplicate_offset: (f32, f32),
    pub duplicate_key: SharedString,
    pub delete_key: SharedString,
    /// Let several cables drive one input slot (last one wins each tick)
    pub allow_fan_in: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            snap_radius: 50.0,
            cable_hit_distance: 5.0,
            spawn_point: (10.0, 60.0),
            duplicate_offset: (20.0, 20.0),
            duplicate_key: SharedString::from("d"),
            delete_key: Key::Backspace.into(),
            allow_fan_in: false,
        }
    }
}
