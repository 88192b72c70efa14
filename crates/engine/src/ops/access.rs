use sea_orm::{ConnectionTrait, prelude::*};

use crate::{EngineError, ResultEngine, cities, events, users};

use super::Engine;

/// Generates a `require_*` lookup for an entity with an integer key.
macro_rules! impl_require_by_id {
    ($fn_name:ident, $entity:path, $model:ty, $err_msg:literal) => {
        pub(super) async fn $fn_name<C: ConnectionTrait>(
            &self,
            db: &C,
            id: i32,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_by_id!(require_event, events::Entity, events::Model, "event not exists");

    impl_require_by_id!(require_user, users::Entity, users::Model, "user not exists");

    impl_require_by_id!(require_city, cities::Entity, cities::Model, "city not exists");
}
