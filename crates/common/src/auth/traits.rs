use crate::domain::{DomainResult, UserId};

/// Trait for authentication token operations (JWT access tokens)
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AuthTokenProvider: Send + Sync {
    /// Issue an access token for a user
    fn generate_token(&self, user_id: &UserId) -> DomainResult<String>;

    /// Validate an access token and extract the user it was issued to
    fn validate_token(&self, token: &str) -> DomainResult<UserId>;
}
