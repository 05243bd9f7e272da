//! Shared Diesel error mapping for the repositories.
//!
//! Database messages are logged at debug level and replaced with short
//! fixed strings so SQL fragments never reach API responses.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through a repository's connection constructor.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Unique constraint that rejected a write, if that is what `error` is.
pub(crate) fn unique_violation(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}

/// Whether `error` is a foreign key violation.
pub(crate) fn is_foreign_key_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

/// Map the remaining Diesel failures into query or connection errors.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(String),
        Connection(String),
    }

    #[rstest]
    #[case(DieselError::NotFound, Mapped::Query("record not found".into()))]
    #[case(DieselError::RollbackTransaction, Mapped::Query("database error".into()))]
    #[case(
        DieselError::BrokenTransactionManager,
        Mapped::Connection("database connection error".into())
    )]
    fn diesel_errors_map_to_fixed_messages(#[case] error: DieselError, #[case] expected: Mapped) {
        let mapped = map_diesel_error(
            error,
            |message| Mapped::Query(message.into()),
            |message| Mapped::Connection(message.into()),
        );
        assert_eq!(mapped, expected);
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".into()));
    }

    #[rstest]
    fn non_database_errors_are_not_unique_violations() {
        assert_eq!(unique_violation(&DieselError::NotFound), None);
        assert!(!is_foreign_key_violation(&DieselError::NotFound));
    }
}
