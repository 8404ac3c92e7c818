use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::db_types::{Drink, DrinkUpdate, NewDrink};

pub async fn fetch_all_drinks(conn: &mut SqliteConnection) -> Result<Vec<Drink>, sqlx::Error> {
    let drinks = sqlx::query_as("SELECT id, title, recipe FROM drinks ORDER BY id").fetch_all(conn).await?;
    Ok(drinks)
}

pub async fn fetch_drink_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Drink>, sqlx::Error> {
    let drink =
        sqlx::query_as("SELECT id, title, recipe FROM drinks WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(drink)
}

/// Inserts a new drink. The recipe is written in its canonical serialized form.
/// Titles are unique, so inserting a duplicate title fails with a constraint violation.
pub async fn insert_drink(drink: NewDrink, conn: &mut SqliteConnection) -> Result<Drink, sqlx::Error> {
    let drink: Drink = sqlx::query_as(
        r#"
            INSERT INTO drinks (title, recipe) VALUES ($1, $2)
            RETURNING id, title, recipe;
        "#,
    )
    .bind(drink.title)
    .bind(drink.recipe.to_stored())
    .fetch_one(conn)
    .await?;
    debug!("🗃️ {drink} inserted");
    Ok(drink)
}

/// Updates the title and/or recipe of a drink. Fields that are `None` keep their current value.
pub async fn update_drink(
    id: i64,
    update: DrinkUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Drink>, sqlx::Error> {
    let DrinkUpdate { title, recipe } = update;
    let recipe = recipe.map(|r| r.to_stored());
    trace!("🗃️ Updating drink #{id}. New title: {title:?}. New recipe: {recipe:?}");
    let drink = sqlx::query_as(
        r#"
            UPDATE drinks SET
                title = COALESCE($1, title),
                recipe = COALESCE($2, recipe)
            WHERE id = $3
            RETURNING id, title, recipe;
        "#,
    )
    .bind(title)
    .bind(recipe)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(drink)
}

pub async fn delete_drink(id: i64, conn: &mut SqliteConnection) -> Result<Option<i64>, sqlx::Error> {
    let deleted: Option<i64> = sqlx::query_scalar("DELETE FROM drinks WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    if deleted.is_some() {
        debug!("🗃️ Drink #{id} deleted");
    }
    Ok(deleted)
}
