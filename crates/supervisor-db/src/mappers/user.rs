//! User entity <-> model mapper

use supervisor_core::entities::UserIdentity;
use supervisor_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for UserIdentity {
    fn from(model: UserModel) -> Self {
        UserIdentity {
            id: Snowflake::new(model.id),
            username: model.username,
            privileged: model.privileged,
        }
    }
}
