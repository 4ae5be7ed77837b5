use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Organization not found: {0}")]
    OrganizationNotFound(String),

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Persistence error: {0}")]
    PersistenceError(#[from] anyhow::Error),
}

impl DomainError {
    /// True for any of the per-hop not-found variants
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::OrganizationNotFound(_)
                | DomainError::RoomNotFound(_)
                | DomainError::DeviceNotFound(_)
        )
    }
}
