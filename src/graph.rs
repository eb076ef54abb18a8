use crate::cable::{Cable, CableId, InputBinding, OutputBinding};
use crate::device::{Device, DeviceId};
use crate::state::Circuit;
use std::fmt;

/// Helper functions for graph operations
pub struct GraphLogic;

impl GraphLogic {
    /// Find all cables bound to a specific device on either end
    ///
    /// # Arguments
    /// * `device` - The device being deleted/queried
    /// * `cables` - The cable collection, in evaluation order
    pub fn find_cables_connected_to_device(device: DeviceId, cables: &[Cable]) -> Vec<CableId> {
        cables
            .iter()
            .filter(|cable| cable.touches(device))
            .map(Cable::id)
            .collect()
    }

    /// Check if a cable between the same output and input slot already exists
    pub fn duplicate_cable_exists(
        output: OutputBinding,
        input: InputBinding,
        cables: &[Cable],
    ) -> bool {
        cables
            .iter()
            .any(|cable| cable.output() == output && cable.input() == input)
    }

    /// Find the cable currently driving an input slot
    ///
    /// When several cables target the same slot, the last one in evaluation
    /// order is the one whose value the slot ends up holding each tick.
    pub fn input_driver(input: InputBinding, cables: &[Cable]) -> Option<CableId> {
        cables
            .iter()
            .rev()
            .find(|cable| cable.input() == input)
            .map(Cable::id)
    }

    /// Apply a drag translation to every device accepted by `filter`
    pub fn commit_drag<F>(devices: &mut [Device], filter: F, delta_x: f32, delta_y: f32)
    where
        F: Fn(DeviceId) -> bool,
    {
        for device in devices.iter_mut().filter(|d| filter(d.id())) {
            device.translate(delta_x, delta_y);
        }
    }
}

// ============================================================================
// Cable Validation Framework
// ============================================================================

/// Result of cable validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Cable may be committed
    Valid,
    /// Cable is rejected with a reason
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Check if the result is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(err) => Err(err),
        }
    }
}

/// Reasons why a cable was not committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provisional cable lacks an output or an input binding
    Unbound,
    /// Device does not exist in the circuit
    DeviceNotFound(DeviceId),
    /// Device has no output slot to drive a cable
    NoOutputSlot(DeviceId),
    /// Device has no input slot with this index
    NoInputSlot { device: DeviceId, index: usize },
    /// A cable between these slots already exists
    DuplicateCable,
    /// Another cable already drives this input slot
    InputAlreadyDriven { device: DeviceId, index: usize },
    /// Rejection reported by a caller-supplied validator
    Custom(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound => write!(f, "Cable must connect an output to an input"),
            Self::DeviceNotFound(id) => write!(f, "Device {} not found", id.0),
            Self::NoOutputSlot(id) => write!(f, "Device {} has no output", id.0),
            Self::NoInputSlot { device, index } => {
                write!(f, "Device {} has no input {}", device.0, index)
            }
            Self::DuplicateCable => write!(f, "Cable already exists"),
            Self::InputAlreadyDriven { device, index } => {
                write!(f, "Input {} of device {} is already connected", index, device.0)
            }
            Self::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trait for rules deciding whether a cable may join the circuit.
///
/// Use with `validate_cable()` or compose with `CompositeValidator`.
///
/// # Example
///
/// ```ignore
/// struct NoSelfLoops;
///
/// impl CableValidator for NoSelfLoops {
///     fn validate(&self, output: OutputBinding, input: InputBinding, _: &Circuit) -> ValidationResult {
///         if output.device == input.device {
///             ValidationResult::Invalid(ValidationError::Custom("feedback onto itself".into()))
///         } else {
///             ValidationResult::Valid
///         }
///     }
/// }
/// ```
pub trait CableValidator {
    fn validate(
        &self,
        output: OutputBinding,
        input: InputBinding,
        circuit: &Circuit,
    ) -> ValidationResult;
}

/// Default validator: both endpoints name real slots
///
/// 1. Both devices must exist
/// 2. The output device must have an output slot
/// 3. The input device must have an input slot at that index
///
/// Feedback (including a device wired to itself) is allowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicCableValidator;

impl CableValidator for BasicCableValidator {
    fn validate(
        &self,
        output: OutputBinding,
        input: InputBinding,
        circuit: &Circuit,
    ) -> ValidationResult {
        let source = match circuit.device(output.device) {
            Some(d) => d,
            None => return ValidationResult::Invalid(ValidationError::DeviceNotFound(output.device)),
        };
        let target = match circuit.device(input.device) {
            Some(d) => d,
            None => return ValidationResult::Invalid(ValidationError::DeviceNotFound(input.device)),
        };

        if source.output().is_none() {
            return ValidationResult::Invalid(ValidationError::NoOutputSlot(output.device));
        }

        if input.index >= target.inputs().len() {
            return ValidationResult::Invalid(ValidationError::NoInputSlot {
                device: input.device,
                index: input.index,
            });
        }

        ValidationResult::Valid
    }
}

/// Validator that prevents duplicate cables between the same two slots
#[derive(Clone, Debug, Default)]
pub struct NoDuplicatesValidator;

impl CableValidator for NoDuplicatesValidator {
    fn validate(
        &self,
        output: OutputBinding,
        input: InputBinding,
        circuit: &Circuit,
    ) -> ValidationResult {
        if GraphLogic::duplicate_cable_exists(output, input, circuit.cables()) {
            ValidationResult::Invalid(ValidationError::DuplicateCable)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validator that keeps every input slot driven by at most one cable
#[derive(Clone, Debug, Default)]
pub struct SingleDriverValidator;

impl CableValidator for SingleDriverValidator {
    fn validate(
        &self,
        _output: OutputBinding,
        input: InputBinding,
        circuit: &Circuit,
    ) -> ValidationResult {
        match GraphLogic::input_driver(input, circuit.cables()) {
            Some(_) => ValidationResult::Invalid(ValidationError::InputAlreadyDriven {
                device: input.device,
                index: input.index,
            }),
            None => ValidationResult::Valid,
        }
    }
}

/// Composite validator that combines multiple validators
///
/// All validators must return Valid for the cable to be valid (AND logic).
/// Returns the first error encountered (short-circuits on failure).
///
/// # Example
///
/// ```ignore
/// let validator = CompositeValidator::new()
///     .add(BasicCableValidator)
///     .add(SingleDriverValidator);
/// ```
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn CableValidator>>,
}

impl CompositeValidator {
    /// Create a new empty composite validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to the composite
    ///
    /// Validators are checked in the order they were added.
    pub fn add<V: CableValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Validator used by the editor: real slots, no duplicate cables and,
    /// unless `allow_fan_in`, one driver per input
    pub fn standard(allow_fan_in: bool) -> Self {
        let validator = Self::new().add(BasicCableValidator).add(NoDuplicatesValidator);
        if allow_fan_in {
            validator
        } else {
            validator.add(SingleDriverValidator)
        }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl CableValidator for CompositeValidator {
    fn validate(
        &self,
        output: OutputBinding,
        input: InputBinding,
        circuit: &Circuit,
    ) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(output, input, circuit);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

/// Convenience function to validate a cable with any validator
pub fn validate_cable<V>(
    output: OutputBinding,
    input: InputBinding,
    circuit: &Circuit,
    validator: &V,
) -> ValidationResult
where
    V: CableValidator + ?Sized,
{
    validator.validate(output, input, circuit)
}

// ============================================================================
// Tests
// ============================================================================
