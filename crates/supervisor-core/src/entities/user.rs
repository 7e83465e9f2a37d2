//! User identity - a resolved participant

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A stable user identity as resolved by the participant directory.
///
/// Immutable once resolved for an operation; the privilege flag reflects
/// the host platform's staff/admin roles at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Snowflake,
    pub username: String,
    pub privileged: bool,
}

impl UserIdentity {
    /// Create a new identity
    pub fn new(id: Snowflake, username: impl Into<String>, privileged: bool) -> Self {
        Self {
            id,
            username: username.into(),
            privileged,
        }
    }

    /// Check whether this user holds a privileged (staff) role
    #[inline]
    pub fn is_privileged(&self) -> bool {
        self.privileged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_flag() {
        let staff = UserIdentity::new(Snowflake::new(1), "ops", true);
        let member = UserIdentity::new(Snowflake::new(2), "alice", false);
        assert!(staff.is_privileged());
        assert!(!member.is_privileged());
    }
}
