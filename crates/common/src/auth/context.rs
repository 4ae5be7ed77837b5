use super::traits::AuthTokenProvider;
use crate::domain::{DomainError, DomainResult, UserId};

/// Principal extracted from an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: UserId,
}

/// Resolve the principal from the value of an `Authorization` header.
///
/// Expects `Bearer <token>` and validates the token with the given provider.
/// Transport layers call this and map the error to their own status codes.
pub fn extract_user_context(
    authorization: Option<&str>,
    auth_token_provider: &dyn AuthTokenProvider,
) -> DomainResult<UserContext> {
    let auth_header = authorization
        .ok_or_else(|| DomainError::InvalidToken("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or_else(|| {
            DomainError::InvalidToken(
                "Invalid authorization format, expected 'Bearer <token>'".to_string(),
            )
        })?;

    let user_id = auth_token_provider.validate_token(token.trim())?;

    Ok(UserContext { user_id })
}
