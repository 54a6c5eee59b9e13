//! The gateway's single error

use guild_db::DatabaseError;
use thiserror::Error;

/// The one failure callers of the gateway can see.
///
/// Constraint violations, I/O errors and timeouts all collapse into this:
/// callers react the same way regardless (tell the user the persistence
/// layer is unavailable, try again later), so the distinction would only
/// leak plumbing. The original cause rides along as `source()` for logs and
/// debugging, and is logged exactly once where the gateway catches it —
/// callers must not log it again.
#[derive(Debug, Error)]
#[error("persistence layer unavailable")]
pub struct GatewayError {
    #[source]
    cause: DatabaseError,
}

impl GatewayError {
    pub(crate) fn new(cause: DatabaseError) -> Self {
        Self { cause }
    }

    /// The underlying database failure.
    pub fn cause(&self) -> &DatabaseError {
        &self.cause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_source_carries_the_cause() {
        let err = GatewayError::new(DatabaseError::connection_failed("refused"));
        assert_eq!(err.to_string(), "persistence layer unavailable");
        let source = err.source().expect("cause attached");
        assert!(source.to_string().contains("refused"));
    }
}
