//! Database error types
//!
//! Everything the persistence layer can fail with funnels into
//! [`DatabaseError`]. Repositories do not interpret failures beyond this
//! classification; the gateway flattens them further into its single opaque
//! error at the application boundary.

use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Unique, foreign key or check constraint violation
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// No available connections in the pool
    #[error("connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    pub fn connection_failed(message: impl Into<String>) -> Self {
        DatabaseError::ConnectionFailed(message.into())
    }

    /// Whether this error points at connectivity rather than the query
    /// itself; the supervisor retries only these at startup.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Classifies SQLx errors by PostgreSQL error class.
///
/// Class 23 (integrity constraint violation) is split out so callers that do
/// care can tell it apart; everything else about the failure stays opaque.
/// <https://www.postgresql.org/docs/current/errcodes-appendix.html>
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::Tls(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::PoolClosed => {
                DatabaseError::ConnectionFailed("connection pool closed".to_string())
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(code) if code.starts_with("23") => {
                    DatabaseError::ConstraintViolation(db_err.message().to_string())
                }
                _ => DatabaseError::QueryFailed(db_err.message().to_string()),
            },
            other => DatabaseError::QueryFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_classified() {
        assert!(DatabaseError::connection_failed("refused").is_connection_error());
        assert!(DatabaseError::PoolExhausted.is_connection_error());
        assert!(!DatabaseError::QueryFailed("syntax".into()).is_connection_error());
    }

    #[test]
    fn test_pool_timeout_maps_to_exhausted() {
        let err = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DatabaseError::PoolExhausted));
    }
}
