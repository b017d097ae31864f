use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found")]
    NotFound,
}

impl DbError {
    /// Returns true when SQLite rejected the statement on a foreign key check.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            DbError::Database(sqlx::Error::Database(e)) => e.is_foreign_key_violation(),
            _ => false,
        }
    }
}
