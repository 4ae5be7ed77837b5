use crate::domain::DomainError;

// PostgreSQL SQLSTATE codes
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

/// Map a failed write onto the domain error space.
///
/// `missing_parent` builds the error for a dangling foreign key and receives
/// the name of the violated constraint.
pub(crate) fn map_write_error<F>(e: tokio_postgres::Error, missing_parent: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    if let Some(db_err) = e.as_db_error() {
        match db_err.code().code() {
            FOREIGN_KEY_VIOLATION => return missing_parent(db_err.constraint()),
            CHECK_VIOLATION => {
                return DomainError::ValidationError(format!(
                    "constraint {} violated",
                    db_err.constraint().unwrap_or("unknown")
                ))
            }
            UNIQUE_VIOLATION => {
                return DomainError::PersistenceError(anyhow::anyhow!(
                    "duplicate key: {}",
                    db_err.message()
                ))
            }
            _ => {}
        }
    }
    DomainError::PersistenceError(e.into())
}

pub(crate) fn map_read_error(e: tokio_postgres::Error) -> DomainError {
    DomainError::PersistenceError(e.into())
}
