//! `SqliteDatabase` is a concrete implementation of a drinks catalog backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the traits defined in the [`crate::traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{drinks, new_pool};
use crate::{
    db_types::{Drink, DrinkUpdate, NewDrink},
    traits::{DrinkApiError, DrinkManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl DrinkManagement for SqliteDatabase {
    async fn fetch_all_drinks(&self) -> Result<Vec<Drink>, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        let drinks = drinks::fetch_all_drinks(&mut conn).await?;
        trace!("🗃️ Fetched {} drinks", drinks.len());
        Ok(drinks)
    }

    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        let drink = drinks::fetch_drink_by_id(id, &mut conn).await?;
        Ok(drink)
    }

    async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        let drink = drinks::insert_drink(drink, &mut conn).await?;
        Ok(drink)
    }

    async fn update_drink(&self, id: i64, update: DrinkUpdate) -> Result<Option<Drink>, DrinkApiError> {
        let mut tx = self.pool.begin().await?;
        let drink = drinks::update_drink(id, update, &mut tx).await?;
        tx.commit().await?;
        Ok(drink)
    }

    async fn delete_drink(&self, id: i64) -> Result<Option<i64>, DrinkApiError> {
        let mut tx = self.pool.begin().await?;
        let deleted = drinks::delete_drink(id, &mut tx).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date using the migrations embedded in this crate.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete");
        Ok(())
    }
}
