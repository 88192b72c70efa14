use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    Condition, JoinType, QueryFilter, QueryOrder, QuerySelect, prelude::*, sea_query::Expr,
};

use crate::{
    City, EngineError, Event, EventDetail, EventQuery, ResultEngine, User, cities, events,
    registrations, users,
};

use super::{Engine, normalize_optional_text};

/// Page size when the caller does not ask for one.
const DEFAULT_CATALOG_LIMIT: u64 = 100;

impl Engine {
    /// Catalog query: filter, search, paginate.
    ///
    /// Results are ordered by start time ascending (ties broken by id)
    /// so that skip/limit paging is deterministic. When no lower time
    /// bound is given, events older than one day are left out.
    pub async fn find_events(&self, query: EventQuery) -> ResultEngine<Vec<EventDetail>> {
        let now = Utc::now();
        let date_from = query.date_from.unwrap_or(now - Duration::days(1));

        let mut select =
            events::Entity::find().filter(events::Column::DatetimeStart.gte(date_from));

        if let Some(event_type) = query.event_type {
            select = select.filter(events::Column::EventType.eq(event_type.as_str()));
        }
        if let Some(city_id) = query.city_id {
            select = select.filter(events::Column::CityId.eq(city_id));
        }
        if let Some(text) = normalize_optional_text(query.query.as_deref()) {
            let needle = format!("%{}%", text.to_lowercase());
            select = select
                .join(JoinType::InnerJoin, events::Relation::Cities.def())
                .join(JoinType::InnerJoin, events::Relation::Users.def())
                .filter(
                    Condition::any()
                        .add(Expr::cust_with_values(
                            "LOWER(events.title) LIKE ?",
                            [needle.clone()],
                        ))
                        .add(Expr::cust_with_values(
                            "LOWER(COALESCE(events.description, '')) LIKE ?",
                            [needle.clone()],
                        ))
                        .add(Expr::cust_with_values(
                            "LOWER(events.address) LIKE ?",
                            [needle.clone()],
                        ))
                        .add(Expr::cust_with_values(
                            "LOWER(cities.name) LIKE ?",
                            [needle.clone()],
                        ))
                        .add(Expr::cust_with_values(
                            "LOWER(COALESCE(users.username, '')) LIKE ?",
                            [needle],
                        )),
                );
        }

        let models = select
            .order_by_asc(events::Column::DatetimeStart)
            .order_by_asc(events::Column::Id)
            .offset(query.skip.unwrap_or(0))
            .limit(query.limit.unwrap_or(DEFAULT_CATALOG_LIMIT))
            .all(&self.database)
            .await?;

        self.event_details_for(models, now).await
    }

    /// A single event resolved with organizer, city, participant count
    /// and lifecycle state.
    pub async fn event_detail(&self, event_id: i32) -> ResultEngine<EventDetail> {
        let now = Utc::now();
        let model = self.require_event(&self.database, event_id).await?;
        let mut details = self.event_details_for(vec![model], now).await?;
        details
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound("event not exists".to_string()))
    }

    async fn event_details_for(
        &self,
        models: Vec<events::Model>,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<EventDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let event_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let city_ids: Vec<i32> = models.iter().map(|m| m.city_id).collect();
        let organizer_ids: Vec<i32> = models.iter().map(|m| m.organizer_id).collect();

        let cities: HashMap<i32, City> = cities::Entity::find()
            .filter(cities::Column::Id.is_in(city_ids))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|m| (m.id, City::from(m)))
            .collect();

        let mut organizers: HashMap<i32, User> = HashMap::new();
        let organizer_models = users::Entity::find()
            .filter(users::Column::Id.is_in(organizer_ids))
            .all(&self.database)
            .await?;
        for model in organizer_models {
            organizers.insert(model.id, User::try_from(model)?);
        }

        let counts: HashMap<i32, i64> = registrations::Entity::find()
            .select_only()
            .column(registrations::Column::EventId)
            .column_as(registrations::Column::Id.count(), "participants")
            .filter(registrations::Column::EventId.is_in(event_ids))
            .group_by(registrations::Column::EventId)
            .into_tuple::<(i32, i64)>()
            .all(&self.database)
            .await?
            .into_iter()
            .collect();

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let event = Event::try_from(model)?;
            let organizer = organizers
                .get(&event.organizer_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            let city = cities
                .get(&event.city_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("city not exists".to_string()))?;
            out.push(EventDetail {
                state: event.state_at(now),
                participants: counts.get(&event.id).copied().unwrap_or(0),
                event,
                organizer,
                city,
            });
        }
        Ok(out)
    }
}
