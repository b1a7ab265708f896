const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique,
    ForeignKey,
}

pub fn constraint_violation(e: &sqlx::Error) -> Option<ConstraintViolation> {
    let sqlx::Error::Database(db_error) = e else {
        return None;
    };
    match db_error.code().as_deref() {
        Some(PG_UNIQUE_VIOLATION) => Some(ConstraintViolation::Unique),
        Some(PG_FOREIGN_KEY_VIOLATION) => Some(ConstraintViolation::ForeignKey),
        _ => None,
    }
}
