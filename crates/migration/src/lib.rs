pub use sea_orm_migration::prelude::*;

mod m20260715_090000_cities;
mod m20260715_091000_users;
mod m20260716_090000_events;
mod m20260716_091000_registrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260715_090000_cities::Migration),
            Box::new(m20260715_091000_users::Migration),
            Box::new(m20260716_090000_events::Migration),
            Box::new(m20260716_091000_registrations::Migration),
        ]
    }
}
