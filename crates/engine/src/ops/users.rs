use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{ResultEngine, Role, UpdateProfileCmd, User, users};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Returns the user for a verified Telegram identity, provisioning a
    /// Member row on first contact.
    ///
    /// Safe against concurrent first contacts: a lost insert race is
    /// resolved by re-reading the row the winner created.
    pub async fn get_or_create_user(
        &self,
        telegram_id: &str,
        username: Option<&str>,
    ) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::TelegramId.eq(telegram_id))
                .one(&db_tx)
                .await?;

            match existing {
                Some(model) => User::try_from(model),
                None => {
                    let active = users::ActiveModel {
                        telegram_id: ActiveValue::Set(telegram_id.to_string()),
                        username: ActiveValue::Set(normalize_optional_text(username)),
                        role: ActiveValue::Set(Role::Member.as_str().to_string()),
                        ..Default::default()
                    };

                    match active.insert(&db_tx).await {
                        Ok(model) => User::try_from(model),
                        Err(err) => {
                            // A concurrent first contact may have won the insert.
                            let winner = users::Entity::find()
                                .filter(users::Column::TelegramId.eq(telegram_id))
                                .one(&db_tx)
                                .await?;
                            match winner {
                                Some(model) => User::try_from(model),
                                None => Err(err.into()),
                            }
                        }
                    }
                }
            }
        })
    }

    /// Return a user by id.
    pub async fn user(&self, user_id: i32) -> ResultEngine<User> {
        let model = self.require_user(&self.database, user_id).await?;
        User::try_from(model)
    }

    /// Return a user by verified Telegram id, if one exists.
    pub async fn user_by_telegram(&self, telegram_id: &str) -> ResultEngine<Option<User>> {
        let model = users::Entity::find()
            .filter(users::Column::TelegramId.eq(telegram_id))
            .one(&self.database)
            .await?;
        model.map(User::try_from).transpose()
    }

    /// Self-service profile update (username, phone, city, skill level).
    ///
    /// Unset fields are left unchanged; the role is not touchable here.
    pub async fn update_profile(&self, cmd: UpdateProfileCmd) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, cmd.user_id).await?;

            if let Some(city_id) = cmd.city_id {
                self.require_city(&db_tx, city_id).await?;
            }

            let mut active: users::ActiveModel = model.into();
            if let Some(username) = normalize_optional_text(cmd.username.as_deref()) {
                active.username = ActiveValue::Set(Some(username));
            }
            if let Some(phone) = normalize_optional_text(cmd.phone.as_deref()) {
                active.phone = ActiveValue::Set(Some(phone));
            }
            if let Some(city_id) = cmd.city_id {
                active.city_id = ActiveValue::Set(Some(city_id));
            }
            if let Some(skill_level) = normalize_optional_text(cmd.skill_level.as_deref()) {
                active.skill_level = ActiveValue::Set(Some(skill_level));
            }

            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }
}
