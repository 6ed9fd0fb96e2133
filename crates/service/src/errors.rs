use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Prefix infrastructure failures with the operation that hit them.
    /// Domain errors pass through untouched so callers can still match on them.
    pub fn context(self, operation: &str) -> Self {
        match self {
            Self::Db(msg) => Self::Db(format!("{operation}: {msg}")),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Db(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_only_db_errors() {
        let e = ServiceError::Db("connection reset".into()).context("create subscription");
        assert_eq!(e.to_string(), "database error: create subscription: connection reset");

        let e = ServiceError::not_found("subscription").context("update subscription");
        assert!(e.is_not_found());
        assert_eq!(e.to_string(), "not found: subscription not found");
    }
}
