use sea_orm::{QueryOrder, prelude::*};

use crate::{City, ResultEngine, cities};

use super::Engine;

impl Engine {
    /// Lists all cities, alphabetically.
    pub async fn list_cities(&self) -> ResultEngine<Vec<City>> {
        let models = cities::Entity::find()
            .order_by_asc(cities::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(City::from).collect())
    }

    /// Return a city by id.
    pub async fn city(&self, city_id: i32) -> ResultEngine<City> {
        let model = self.require_city(&self.database, city_id).await?;
        Ok(City::from(model))
    }
}
