//! Category-conditional field requirements for devices.

use crate::domain::{DeviceCategory, DomainError, DomainResult};

/// Check that the measurement field required by `category` is present.
///
/// SENSOR devices need `units`, ACTUATOR devices need `power_consumption`.
/// A blank units string counts as absent. Nothing is defaulted here.
pub fn validate_device_category(
    category: DeviceCategory,
    units: Option<&str>,
    power_consumption: Option<f64>,
) -> DomainResult<()> {
    match category {
        DeviceCategory::Sensor => match units {
            Some(u) if !u.trim().is_empty() => Ok(()),
            _ => Err(DomainError::ValidationError(
                "units required for SENSOR".to_string(),
            )),
        },
        DeviceCategory::Actuator => match power_consumption {
            Some(_) => Ok(()),
            None => Err(DomainError::ValidationError(
                "powerConsumption required for ACTUATOR".to_string(),
            )),
        },
    }
}
