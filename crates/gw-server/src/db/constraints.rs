//! Constraint violation checks for sqlx errors

use sqlx::Error as SqlxError;

use super::DbError;

pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Unique violations become `DbError::Duplicate` for `resource_type`
/// identified by `identifier`; every other error passes through.
pub fn map_unique_violation(error: SqlxError, resource_type: &str, identifier: &str) -> DbError {
    if is_unique_violation(&error) {
        DbError::duplicate(resource_type, identifier)
    } else {
        DbError::Sqlx(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        let err = SqlxError::RowNotFound;
        assert!(!is_unique_violation(&err));
        assert!(matches!(
            map_unique_violation(SqlxError::RowNotFound, "Term", "GO:1"),
            DbError::Sqlx(_)
        ));
    }
}
