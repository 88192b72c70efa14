use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    Action, CreateEventCmd, EngineError, Event, EventStatus, Principal, ResultEngine,
    UpdateEventCmd, events, policy,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

fn validate_schedule(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> ResultEngine<()> {
    if let Some(end) = end {
        if end <= start {
            return Err(EngineError::Validation(
                "datetime_end must be after datetime_start".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_limit(limit: Option<i32>) -> ResultEngine<()> {
    if let Some(limit) = limit {
        if limit <= 0 {
            return Err(EngineError::Validation(
                "limit_participants must be > 0".to_string(),
            ));
        }
    }
    Ok(())
}

impl Engine {
    /// Creates an event. Partners and admins only; the caller becomes
    /// the organizer.
    pub async fn create_event(&self, cmd: CreateEventCmd) -> ResultEngine<Event> {
        if !policy::evaluate(Some(&cmd.principal), Action::CreateEvent) {
            return Err(EngineError::Forbidden(
                "not allowed to create events".to_string(),
            ));
        }
        let title = normalize_required_text(&cmd.title, "title")?;
        let address = normalize_required_text(&cmd.address, "address")?;
        validate_schedule(cmd.datetime_start, cmd.datetime_end)?;
        validate_limit(cmd.limit_participants)?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.principal.user_id).await?;
            self.require_city(&db_tx, cmd.city_id).await?;

            let active = events::ActiveModel {
                title: ActiveValue::Set(title),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
                event_type: ActiveValue::Set(cmd.event_type.map(|t| t.as_str().to_string())),
                datetime_start: ActiveValue::Set(cmd.datetime_start),
                datetime_end: ActiveValue::Set(cmd.datetime_end),
                address: ActiveValue::Set(address),
                city_id: ActiveValue::Set(cmd.city_id),
                organizer_id: ActiveValue::Set(cmd.principal.user_id),
                limit_participants: ActiveValue::Set(cmd.limit_participants),
                status: ActiveValue::Set(EventStatus::Active.as_str().to_string()),
                registration_seq: ActiveValue::Set(0),
                created_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };

            let model = active.insert(&db_tx).await?;
            Event::try_from(model)
        })
    }

    /// Updates an event. Only its organizer or an admin may do so, at
    /// any point of the event lifecycle. A cancelled event can still be
    /// edited but never brought back to active.
    pub async fn update_event(&self, cmd: UpdateEventCmd) -> ResultEngine<Event> {
        let title = cmd
            .title
            .as_deref()
            .map(|t| normalize_required_text(t, "title"))
            .transpose()?;
        let address = cmd
            .address
            .as_deref()
            .map(|a| normalize_required_text(a, "address"))
            .transpose()?;
        validate_limit(cmd.limit_participants)?;

        with_tx!(self, |db_tx| {
            let model = self.require_event(&db_tx, cmd.event_id).await?;
            let event = Event::try_from(model.clone())?;

            let allowed = policy::evaluate(
                Some(&cmd.principal),
                Action::EditEvent {
                    organizer_id: event.organizer_id,
                },
            );
            if !allowed {
                return Err(EngineError::Forbidden(
                    "not allowed to edit this event".to_string(),
                ));
            }

            if event.status == EventStatus::Cancelled && cmd.status == Some(EventStatus::Active) {
                return Err(EngineError::Validation(
                    "cancelled event cannot be reactivated".to_string(),
                ));
            }

            let new_start = cmd.datetime_start.unwrap_or(event.datetime_start);
            let new_end = cmd.datetime_end.or(event.datetime_end);
            validate_schedule(new_start, new_end)?;

            if let Some(city_id) = cmd.city_id {
                self.require_city(&db_tx, city_id).await?;
            }

            let mut active: events::ActiveModel = model.into();
            if let Some(title) = title {
                active.title = ActiveValue::Set(title);
            }
            if let Some(description) = normalize_optional_text(cmd.description.as_deref()) {
                active.description = ActiveValue::Set(Some(description));
            }
            if let Some(event_type) = cmd.event_type {
                active.event_type = ActiveValue::Set(Some(event_type.as_str().to_string()));
            }
            if let Some(start) = cmd.datetime_start {
                active.datetime_start = ActiveValue::Set(start);
            }
            if let Some(end) = cmd.datetime_end {
                active.datetime_end = ActiveValue::Set(Some(end));
            }
            if let Some(address) = address {
                active.address = ActiveValue::Set(address);
            }
            if let Some(city_id) = cmd.city_id {
                active.city_id = ActiveValue::Set(city_id);
            }
            if let Some(limit) = cmd.limit_participants {
                active.limit_participants = ActiveValue::Set(Some(limit));
            }
            if let Some(status) = cmd.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }

            let model = active.update(&db_tx).await?;
            Event::try_from(model)
        })
    }

    /// Cancels an event (organizer or admin). Idempotent: cancelling an
    /// already-cancelled event is a no-op success. The transition is
    /// monotonic; there is no way back to active.
    pub async fn cancel_event(&self, event_id: i32, principal: &Principal) -> ResultEngine<Event> {
        with_tx!(self, |db_tx| {
            let model = self.require_event(&db_tx, event_id).await?;
            let event = Event::try_from(model.clone())?;

            let allowed = policy::evaluate(
                Some(principal),
                Action::EditEvent {
                    organizer_id: event.organizer_id,
                },
            );
            if !allowed {
                return Err(EngineError::Forbidden(
                    "not allowed to cancel this event".to_string(),
                ));
            }

            if event.status == EventStatus::Cancelled {
                Ok(event)
            } else {
                let mut active: events::ActiveModel = model.into();
                active.status = ActiveValue::Set(EventStatus::Cancelled.as_str().to_string());
                let model = active.update(&db_tx).await?;
                Event::try_from(model)
            }
        })
    }

    /// Hard-deletes an event (admin only). Registrations go with it via
    /// the cascade on the registrations table.
    pub async fn delete_event(&self, event_id: i32, principal: &Principal) -> ResultEngine<()> {
        if !policy::evaluate(Some(principal), Action::DeleteEvent) {
            return Err(EngineError::Forbidden(
                "only admins can delete events".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_event(&db_tx, event_id).await?;
            events::Entity::delete_by_id(event_id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
