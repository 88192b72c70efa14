use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    CreateEventCmd, Engine, EngineError, EventQuery, EventState, EventStatus, EventType,
    Principal, Role, UpdateEventCmd, UpdateProfileCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn seed_city(db: &DatabaseConnection, name: &str) -> i32 {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO cities (name) VALUES (?)",
        vec![name.into()],
    ))
    .await
    .unwrap();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT id FROM cities WHERE name = ?",
            vec![name.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i32>("", "id").unwrap()
}

async fn seed_user(
    db: &DatabaseConnection,
    telegram_id: &str,
    username: &str,
    role: Role,
) -> Principal {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (telegram_id, username, role) VALUES (?, ?, ?)",
        vec![telegram_id.into(), username.into(), role.as_str().into()],
    ))
    .await
    .unwrap();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT id FROM users WHERE telegram_id = ?",
            vec![telegram_id.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    Principal {
        user_id: row.try_get::<i32>("", "id").unwrap(),
        role,
        city_id: None,
    }
}

#[tokio::test]
async fn only_partners_and_admins_create_events() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let member = seed_user(&db, "1", "pawn", Role::Member).await;
    let partner = seed_user(&db, "2", "knight", Role::Partner).await;

    let err = engine
        .create_event(CreateEventCmd::new(
            member,
            "Open tournament",
            "Arbat 12",
            city,
            Utc::now() + Duration::days(3),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)), "{err:?}");

    let event = engine
        .create_event(CreateEventCmd::new(
            partner,
            "Open tournament",
            "Arbat 12",
            city,
            Utc::now() + Duration::days(3),
        ))
        .await
        .unwrap();
    assert_eq!(event.organizer_id, partner.user_id);
    assert_eq!(event.status, EventStatus::Active);
}

#[tokio::test]
async fn event_input_is_validated_before_persistence() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let partner = seed_user(&db, "2", "knight", Role::Partner).await;
    let start = Utc::now() + Duration::days(3);

    let err = engine
        .create_event(CreateEventCmd::new(partner, "  ", "Arbat 12", city, start))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "{err:?}");

    let err = engine
        .create_event(
            CreateEventCmd::new(partner, "Tournament", "Arbat 12", city, start)
                .datetime_end(start - Duration::hours(1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "{err:?}");

    let err = engine
        .create_event(
            CreateEventCmd::new(partner, "Tournament", "Arbat 12", city, start)
                .limit_participants(0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "{err:?}");

    let err = engine
        .create_event(CreateEventCmd::new(partner, "Tournament", "Arbat 12", 999, start))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)), "{err:?}");
}

#[tokio::test]
async fn catalog_date_from_is_inclusive() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let partner = seed_user(&db, "2", "knight", Role::Partner).await;

    let cutoff = Utc::now() + Duration::days(5);
    let before = engine
        .create_event(CreateEventCmd::new(
            partner,
            "Before cutoff",
            "Arbat 12",
            city,
            cutoff - Duration::seconds(1),
        ))
        .await
        .unwrap();
    let exactly = engine
        .create_event(CreateEventCmd::new(
            partner,
            "At cutoff",
            "Arbat 12",
            city,
            cutoff,
        ))
        .await
        .unwrap();

    let found = engine
        .find_events(EventQuery::new().date_from(cutoff))
        .await
        .unwrap();
    let ids: Vec<i32> = found.iter().map(|d| d.event.id).collect();
    assert!(ids.contains(&exactly.id));
    assert!(!ids.contains(&before.id));
}

#[tokio::test]
async fn catalog_hides_old_events_by_default() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let partner = seed_user(&db, "2", "knight", Role::Partner).await;

    let old = engine
        .create_event(CreateEventCmd::new(
            partner,
            "Long gone",
            "Arbat 12",
            city,
            Utc::now() - Duration::days(3),
        ))
        .await
        .unwrap();
    let upcoming = engine
        .create_event(CreateEventCmd::new(
            partner,
            "Upcoming",
            "Arbat 12",
            city,
            Utc::now() + Duration::days(1),
        ))
        .await
        .unwrap();

    let found = engine.find_events(EventQuery::new()).await.unwrap();
    let ids: Vec<i32> = found.iter().map(|d| d.event.id).collect();
    assert!(ids.contains(&upcoming.id));
    assert!(!ids.contains(&old.id));
}

#[tokio::test]
async fn catalog_text_search_spans_joined_fields() {
    let (engine, db) = engine_with_db().await;
    let moscow = seed_city(&db, "Moscow").await;
    let kazan = seed_city(&db, "Kazan").await;
    let garry = seed_user(&db, "2", "garry", Role::Partner).await;
    let judit = seed_user(&db, "3", "judit", Role::Partner).await;

    let start = Utc::now() + Duration::days(2);
    let in_moscow = engine
        .create_event(
            CreateEventCmd::new(garry, "Evening blitz", "Arbat 12", moscow, start)
                .event_type(EventType::Tournament),
        )
        .await
        .unwrap();
    let in_kazan = engine
        .create_event(
            CreateEventCmd::new(judit, "Endgame lecture", "Kremlin street 1", kazan, start)
                .description("Rook endings for club players"),
        )
        .await
        .unwrap();

    // City name, case-insensitive.
    let found = engine
        .find_events(EventQuery::new().query("MOSCOW"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].event.id, in_moscow.id);

    // Organizer username.
    let found = engine
        .find_events(EventQuery::new().query("judit"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].event.id, in_kazan.id);

    // Description substring.
    let found = engine
        .find_events(EventQuery::new().query("rook endings"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].event.id, in_kazan.id);

    // Type filter composes with search.
    let found = engine
        .find_events(EventQuery::new().event_type(EventType::Tournament))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].event.id, in_moscow.id);
}

#[tokio::test]
async fn catalog_orders_by_start_and_paginates() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let partner = seed_user(&db, "2", "knight", Role::Partner).await;

    let base = Utc::now() + Duration::days(1);
    let mut expected = Vec::new();
    for i in [2i64, 0, 1] {
        let event = engine
            .create_event(CreateEventCmd::new(
                partner,
                format!("Round {i}"),
                "Arbat 12",
                city,
                base + Duration::hours(i),
            ))
            .await
            .unwrap();
        expected.push((base + Duration::hours(i), event.id));
    }
    expected.sort();

    let found = engine.find_events(EventQuery::new()).await.unwrap();
    let ids: Vec<i32> = found.iter().map(|d| d.event.id).collect();
    assert_eq!(ids, expected.iter().map(|(_, id)| *id).collect::<Vec<_>>());

    let page = engine
        .find_events(EventQuery::new().skip(1).limit(1))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].event.id, expected[1].1);
}

#[tokio::test]
async fn event_detail_resolves_summaries_and_count() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let partner = seed_user(&db, "2", "knight", Role::Partner).await;
    let a = seed_user(&db, "4", "pawn_a", Role::Member).await;
    let b = seed_user(&db, "5", "pawn_b", Role::Member).await;

    let event = engine
        .create_event(CreateEventCmd::new(
            partner,
            "Open tournament",
            "Arbat 12",
            city,
            Utc::now() + Duration::days(3),
        ))
        .await
        .unwrap();

    engine.register(&a, event.id).await.unwrap();
    engine.register(&b, event.id).await.unwrap();

    let detail = engine.event_detail(event.id).await.unwrap();
    assert_eq!(detail.participants, 2);
    assert_eq!(detail.city.name, "Moscow");
    assert_eq!(detail.organizer.id, partner.user_id);
    assert_eq!(detail.state, EventState::Scheduled);

    let participants = engine.list_participants(event.id, None, None).await.unwrap();
    let numbers: Vec<i32> = participants
        .iter()
        .map(|(registration, _)| registration.registration_number)
        .collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn cancelled_events_stay_cancelled() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let partner = seed_user(&db, "2", "knight", Role::Partner).await;

    let event = engine
        .create_event(CreateEventCmd::new(
            partner,
            "Open tournament",
            "Arbat 12",
            city,
            Utc::now() + Duration::days(3),
        ))
        .await
        .unwrap();

    let cancelled = engine.cancel_event(event.id, &partner).await.unwrap();
    assert_eq!(cancelled.status, EventStatus::Cancelled);

    // Idempotent.
    let again = engine.cancel_event(event.id, &partner).await.unwrap();
    assert_eq!(again.status, EventStatus::Cancelled);

    // Still readable.
    let detail = engine.event_detail(event.id).await.unwrap();
    assert_eq!(detail.state, EventState::Cancelled);

    // But never active again.
    let err = engine
        .update_event(UpdateEventCmd::new(partner, event.id).status(EventStatus::Active))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "{err:?}");
}

#[tokio::test]
async fn editing_is_limited_to_organizer_and_admin() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let organizer = seed_user(&db, "2", "knight", Role::Partner).await;
    let other_partner = seed_user(&db, "3", "bishop", Role::Partner).await;
    let admin = seed_user(&db, "4", "queen", Role::Admin).await;

    let event = engine
        .create_event(CreateEventCmd::new(
            organizer,
            "Open tournament",
            "Arbat 12",
            city,
            Utc::now() + Duration::days(3),
        ))
        .await
        .unwrap();

    let err = engine
        .update_event(UpdateEventCmd::new(other_partner, event.id).title("Hijacked"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)), "{err:?}");

    let updated = engine
        .update_event(UpdateEventCmd::new(organizer, event.id).title("Renamed"))
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");

    let updated = engine
        .update_event(UpdateEventCmd::new(admin, event.id).limit_participants(32))
        .await
        .unwrap();
    assert_eq!(updated.limit_participants, Some(32));
}

#[tokio::test]
async fn only_admin_deletes_and_registrations_go_with_the_event() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let organizer = seed_user(&db, "2", "knight", Role::Partner).await;
    let admin = seed_user(&db, "3", "queen", Role::Admin).await;
    let a = seed_user(&db, "4", "pawn_a", Role::Member).await;

    let event = engine
        .create_event(CreateEventCmd::new(
            organizer,
            "Open tournament",
            "Arbat 12",
            city,
            Utc::now() + Duration::days(3),
        ))
        .await
        .unwrap();
    engine.register(&a, event.id).await.unwrap();

    let err = engine.delete_event(event.id, &organizer).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)), "{err:?}");

    engine.delete_event(event.id, &admin).await.unwrap();

    let err = engine.event_detail(event.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)), "{err:?}");
    assert!(!engine.is_registered(a.user_id, event.id).await.unwrap());
    assert!(
        engine
            .list_user_registrations(a.user_id, None, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn first_contact_provisioning_is_idempotent() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .get_or_create_user("424242", Some("magnus"))
        .await
        .unwrap();
    assert_eq!(first.role, Role::Member);

    let second = engine
        .get_or_create_user("424242", Some("magnus"))
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn profile_updates_apply_and_validate_city() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;

    let user = engine.get_or_create_user("424242", None).await.unwrap();
    assert_eq!(user.display_name(), "User 424242");

    let updated = engine
        .update_profile(
            UpdateProfileCmd::new(user.id)
                .username("magnus")
                .phone("+7 900 000 00 00")
                .city_id(city)
                .skill_level("candidate master"),
        )
        .await
        .unwrap();
    assert_eq!(updated.username.as_deref(), Some("magnus"));
    assert_eq!(updated.city_id, Some(city));

    let err = engine
        .update_profile(UpdateProfileCmd::new(user.id).city_id(999))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)), "{err:?}");

    let err = engine
        .update_profile(UpdateProfileCmd::new(9999).username("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)), "{err:?}");

    let cities = engine.list_cities().await.unwrap();
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].name, "Moscow");
    assert_eq!(engine.city(city).await.unwrap().name, "Moscow");
}

#[tokio::test]
async fn my_registrations_include_event_summaries() {
    let (engine, db) = engine_with_db().await;
    let city = seed_city(&db, "Moscow").await;
    let partner = seed_user(&db, "2", "knight", Role::Partner).await;
    let a = seed_user(&db, "4", "pawn_a", Role::Member).await;

    let first = engine
        .create_event(CreateEventCmd::new(
            partner,
            "Morning rapid",
            "Arbat 12",
            city,
            Utc::now() + Duration::days(1),
        ))
        .await
        .unwrap();
    let second = engine
        .create_event(CreateEventCmd::new(
            partner,
            "Evening blitz",
            "Arbat 12",
            city,
            Utc::now() + Duration::days(2),
        ))
        .await
        .unwrap();

    engine.register(&a, first.id).await.unwrap();
    engine.register(&a, second.id).await.unwrap();

    let mine = engine
        .list_user_registrations(a.user_id, None, None)
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);
    let titles: Vec<&str> = mine.iter().map(|(_, event)| event.title.as_str()).collect();
    assert!(titles.contains(&"Morning rapid"));
    assert!(titles.contains(&"Evening blitz"));
}
