use log::*;
use serde_json::Value;

use crate::{
    db_types::{Drink, NewDrink, Recipe},
    traits::DrinkManagement,
    SqliteDatabase,
};

/// Creates a fresh, migrated in-memory database. Every call returns an independent database.
pub async fn prepare_test_db() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    // A single connection keeps the in-memory database alive for the lifetime of the pool
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Error creating in-memory database");
    db.run_migrations().await.expect("Error running DB migrations");
    db
}

pub async fn seed_drink(db: &SqliteDatabase, title: &str, recipe: Value) -> Drink {
    let recipe = Recipe::try_from(recipe).expect("Invalid seed recipe");
    db.insert_drink(NewDrink { title: title.into(), recipe }).await.expect("Error seeding drink")
}
