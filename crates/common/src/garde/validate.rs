use crate::domain::DomainError;
use garde::{Report, Validate};

/// Run garde validation on a request and convert failures to `ValidationError`
pub fn validate_struct<T>(value: &T) -> Result<(), DomainError>
where
    T: Validate,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| DomainError::ValidationError(format_validation_errors(&report)))
}

/// Render every failing path as `path: message`, comma separated
fn format_validation_errors(report: &Report) -> String {
    report
        .iter()
        .map(|(path, error)| {
            let path = path.to_string();
            if path.is_empty() {
                error.message().to_string()
            } else {
                format!("{}: {}", path, error.message())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use garde::Validate;

    #[derive(Validate)]
    struct RoomForm {
        #[garde(length(min = 1))]
        name: String,
        #[garde(range(min = -90.0, max = 90.0))]
        lat: f64,
    }

    #[test]
    fn test_validate_success() {
        let form = RoomForm {
            name: "Lab".to_string(),
            lat: 10.0,
        };
        assert!(validate_struct(&form).is_ok());
    }

    #[test]
    fn test_validate_failure_names_every_field() {
        let form = RoomForm {
            name: "".to_string(),
            lat: 120.0,
        };
        match validate_struct(&form) {
            Err(DomainError::ValidationError(msg)) => {
                assert!(msg.contains("name"));
                assert!(msg.contains("lat"));
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }
}
