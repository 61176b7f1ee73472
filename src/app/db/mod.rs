pub mod memberships;
pub mod organizations;
pub mod projects;
pub mod users;

/// Outcome of an optimistic single-row update. `Stale` means the row's
/// version marker changed since it was read; the caller maps it to Conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    Stale,
}

/// True when the error is a unique or primary key violation. Lets callers
/// turn a duplicate insert into a 4xx instead of a 500.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
