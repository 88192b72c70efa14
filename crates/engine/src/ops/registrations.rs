use chrono::Utc;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    Action, EngineError, Event, Principal, Registration, ResultEngine, Role, User, events, policy,
    registrations, users,
};

use super::{Engine, with_tx};

/// Page size for participant and my-registration listings when the
/// caller does not ask for one.
const DEFAULT_PAGE_LIMIT: u64 = 100;

impl Engine {
    /// Registers the caller for an event.
    ///
    /// The whole check-and-insert runs in one database transaction: the
    /// capacity count is taken right before the insert, the per-event
    /// sequence counter is bumped in place, and a unique-index violation
    /// raised by a concurrent caller for the same (user, event) pair is
    /// reported as `AlreadyRegistered` rather than a storage error.
    pub async fn register(
        &self,
        principal: &Principal,
        event_id: i32,
    ) -> ResultEngine<Registration> {
        if !policy::evaluate(Some(principal), Action::Register) {
            return Err(EngineError::Forbidden(
                "authentication required".to_string(),
            ));
        }
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            let model = self.require_event(&db_tx, event_id).await?;
            let event = Event::try_from(model)?;

            if event.organizer_id == principal.user_id {
                return Err(EngineError::EventNotOpen(
                    "organizer does not register for their own event".to_string(),
                ));
            }
            let state = event.state_at(now);
            if !state.accepts_registrations() {
                return Err(EngineError::EventNotOpen(format!(
                    "event is {}",
                    state.as_str()
                )));
            }
            self.require_user(&db_tx, principal.user_id).await?;

            let existing = registrations::Entity::find()
                .filter(registrations::Column::UserId.eq(principal.user_id))
                .filter(registrations::Column::EventId.eq(event_id))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::AlreadyRegistered(format!(
                    "user {} on event {}",
                    principal.user_id, event_id
                )));
            }

            if let Some(limit) = event.limit_participants {
                let count = registrations::Entity::find()
                    .filter(registrations::Column::EventId.eq(event_id))
                    .count(&db_tx)
                    .await?;
                if count >= limit as u64 {
                    return Err(EngineError::EventFull(format!(
                        "event {event_id} is limited to {limit} participants"
                    )));
                }
            }

            // Bump the per-event counter in place. Numbers only grow, so
            // a withdrawal never frees one up for reuse.
            events::Entity::update_many()
                .col_expr(
                    events::Column::RegistrationSeq,
                    Expr::col(events::Column::RegistrationSeq).add(1),
                )
                .filter(events::Column::Id.eq(event_id))
                .exec(&db_tx)
                .await?;
            let seq = self.require_event(&db_tx, event_id).await?.registration_seq;

            let active = registrations::ActiveModel {
                user_id: ActiveValue::Set(principal.user_id),
                event_id: ActiveValue::Set(event_id),
                registration_number: ActiveValue::Set(seq),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            };

            match active.insert(&db_tx).await {
                Ok(model) => Ok(Registration::from(model)),
                Err(err) => {
                    // A concurrent call may have won the unique index on
                    // (user_id, event_id).
                    let winner = registrations::Entity::find()
                        .filter(registrations::Column::UserId.eq(principal.user_id))
                        .filter(registrations::Column::EventId.eq(event_id))
                        .one(&db_tx)
                        .await?;
                    match winner {
                        Some(_) => Err(EngineError::AlreadyRegistered(format!(
                            "user {} on event {}",
                            principal.user_id, event_id
                        ))),
                        None => Err(err.into()),
                    }
                }
            }
        })
    }

    /// Removes a registration.
    ///
    /// Only the registration's owner or an admin may do so; owners are
    /// bound by the lifecycle window (no withdrawal once the event has
    /// ended), admins are not. A second call for the same id reports
    /// `KeyNotFound`, never a silent success.
    pub async fn unregister(
        &self,
        registration_id: i32,
        principal: &Principal,
    ) -> ResultEngine<()> {
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            let registration = registrations::Entity::find_by_id(registration_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("registration not exists".to_string()))?;

            let allowed = policy::evaluate(
                Some(principal),
                Action::Unregister {
                    owner_id: registration.user_id,
                },
            );
            if !allowed {
                return Err(EngineError::Forbidden(
                    "not allowed to remove this registration".to_string(),
                ));
            }

            if principal.role != Role::Admin {
                let event = self.require_event(&db_tx, registration.event_id).await?;
                let state = Event::try_from(event)?.state_at(now);
                if !state.allows_unregistration() {
                    return Err(EngineError::EventNotOpen(format!(
                        "event is {}",
                        state.as_str()
                    )));
                }
            }

            registrations::Entity::delete_by_id(registration_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Whether a live registration exists for the pair.
    pub async fn is_registered(&self, user_id: i32, event_id: i32) -> ResultEngine<bool> {
        let existing = registrations::Entity::find()
            .filter(registrations::Column::UserId.eq(user_id))
            .filter(registrations::Column::EventId.eq(event_id))
            .one(&self.database)
            .await?;
        Ok(existing.is_some())
    }

    /// Lists an event's participants in registration order.
    pub async fn list_participants(
        &self,
        event_id: i32,
        skip: Option<u64>,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<(Registration, User)>> {
        self.require_event(&self.database, event_id).await?;

        let rows = registrations::Entity::find()
            .filter(registrations::Column::EventId.eq(event_id))
            .find_also_related(users::Entity)
            .order_by_asc(registrations::Column::RegistrationNumber)
            .offset(skip.unwrap_or(0))
            .limit(limit.unwrap_or(DEFAULT_PAGE_LIMIT))
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (registration_model, user_model) in rows {
            let Some(user_model) = user_model else {
                tracing::warn!(
                    "registration {} has no backing user row, skipping",
                    registration_model.id
                );
                continue;
            };
            out.push((
                Registration::from(registration_model),
                User::try_from(user_model)?,
            ));
        }
        Ok(out)
    }

    /// Lists a user's registrations with the events they belong to.
    pub async fn list_user_registrations(
        &self,
        user_id: i32,
        skip: Option<u64>,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<(Registration, Event)>> {
        self.require_user(&self.database, user_id).await?;

        let rows = registrations::Entity::find()
            .filter(registrations::Column::UserId.eq(user_id))
            .find_also_related(events::Entity)
            .order_by_asc(registrations::Column::CreatedAt)
            .order_by_asc(registrations::Column::Id)
            .offset(skip.unwrap_or(0))
            .limit(limit.unwrap_or(DEFAULT_PAGE_LIMIT))
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (registration_model, event_model) in rows {
            let Some(event_model) = event_model else {
                tracing::warn!(
                    "registration {} has no backing event row, skipping",
                    registration_model.id
                );
                continue;
            };
            out.push((
                Registration::from(registration_model),
                Event::try_from(event_model)?,
            ));
        }
        Ok(out)
    }
}
