use thiserror::Error;

use crate::db_types::{Drink, DrinkUpdate, NewDrink, RecipeError};

#[derive(Debug, Clone, Error)]
pub enum DrinkApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Drink #{0} does not exist")]
    DrinkNotFound(i64),
    #[error("Invalid drink title. {0}")]
    InvalidTitle(String),
    #[error("Invalid recipe. {0}")]
    InvalidRecipe(#[from] RecipeError),
    #[error("The stored recipe for drink #{id} is corrupt. {reason}")]
    CorruptRecipe { id: i64, reason: String },
}

impl From<sqlx::Error> for DrinkApiError {
    fn from(e: sqlx::Error) -> Self {
        DrinkApiError::DatabaseError(e.to_string())
    }
}

/// The `DrinkManagement` trait defines the persistence behaviour the drinks catalog needs from a backend.
///
/// Record identity is owned by the backend: ids are assigned on insert and never reused by the API layer.
/// Each method is a single, self-contained write or read. Implementations are free to wrap them in a transaction.
#[allow(async_fn_in_trait)]
pub trait DrinkManagement {
    /// Fetches every drink in the catalog, in id order.
    async fn fetch_all_drinks(&self) -> Result<Vec<Drink>, DrinkApiError>;

    /// Fetches the drink with the given id. If no such drink exists, `None` is returned.
    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, DrinkApiError>;

    /// Saves a new drink and returns the stored record, including its newly assigned id.
    async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, DrinkApiError>;

    /// Applies the non-empty fields of `update` to the drink with the given id.
    /// Returns the updated record, or `None` if the drink does not exist.
    async fn update_drink(&self, id: i64, update: DrinkUpdate) -> Result<Option<Drink>, DrinkApiError>;

    /// Removes the drink with the given id. Returns the id that was deleted, or `None` if the drink does not exist.
    async fn delete_drink(&self, id: i64) -> Result<Option<i64>, DrinkApiError>;
}
