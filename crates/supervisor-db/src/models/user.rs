//! User database model

use sqlx::FromRow;

/// Database model for the users table
///
/// Only the columns the supervisor core reads; the host platform owns the
/// rest of the table.
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    /// Staff/admin flag as exposed by the host platform
    pub privileged: bool,
}
