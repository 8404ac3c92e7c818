//! Unifies API for managing the drinks catalog.

use std::fmt::Debug;

use log::*;

use crate::{
    api::drink_objects::{ModifyDrinkRequest, NewDrinkRequest},
    db_types::{Drink, DrinkLong, DrinkShort, DrinkUpdate, NewDrink, RecipeError},
    traits::{DrinkApiError, DrinkManagement},
};

/// The `DrinkApi` provides the catalog operations on top of a storage backend.
///
/// No records are cached between calls; every operation goes to the backend.
pub struct DrinkApi<B> {
    db: B,
}

impl<B: Debug> Debug for DrinkApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DrinkApi ({:?})", self.db)
    }
}

impl<B> DrinkApi<B>
where B: DrinkManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches every drink in the catalog, rendered in the short (public) view.
    pub async fn short_list(&self) -> Result<Vec<DrinkShort>, DrinkApiError> {
        let drinks = self.db.fetch_all_drinks().await?;
        drinks.iter().map(|d| d.short().map_err(|e| corrupt(d, e))).collect()
    }

    /// Fetches every drink in the catalog, rendered in the long (detailed) view.
    pub async fn long_list(&self) -> Result<Vec<DrinkLong>, DrinkApiError> {
        let drinks = self.db.fetch_all_drinks().await?;
        drinks.iter().map(long_view).collect()
    }

    /// Validates and saves a new drink. The recipe is normalized to its canonical serialized form before it is stored.
    pub async fn create_drink(&self, request: NewDrinkRequest) -> Result<DrinkLong, DrinkApiError> {
        let drink = NewDrink::try_from(request)?;
        debug!("🍹️ Creating new drink '{}' with {} ingredients", drink.title, drink.recipe.ingredients().len());
        let drink = self.db.insert_drink(drink).await?;
        info!("🍹️ {drink} created");
        long_view(&drink)
    }

    /// Modifies an existing drink.
    ///
    /// A non-blank title replaces the current title, and a recipe (in any accepted form) replaces the current recipe.
    /// Each field is applied independently. If the request changes nothing, the drink is returned as is and no write
    /// is made.
    pub async fn update_drink(&self, id: i64, request: ModifyDrinkRequest) -> Result<DrinkLong, DrinkApiError> {
        let existing = self.db.fetch_drink(id).await?.ok_or(DrinkApiError::DrinkNotFound(id))?;
        let update = DrinkUpdate::try_from(request)?;
        if update.is_empty() {
            debug!("🍹️ Update request for {existing} contains no changes");
            return long_view(&existing);
        }
        let drink = self.db.update_drink(id, update).await?.ok_or(DrinkApiError::DrinkNotFound(id))?;
        info!("🍹️ {drink} updated");
        long_view(&drink)
    }

    /// Permanently removes a drink from the catalog and returns its id.
    pub async fn delete_drink(&self, id: i64) -> Result<i64, DrinkApiError> {
        let existing = self.db.fetch_drink(id).await?.ok_or(DrinkApiError::DrinkNotFound(id))?;
        let deleted = self.db.delete_drink(id).await?.ok_or(DrinkApiError::DrinkNotFound(id))?;
        info!("🍹️ {existing} deleted");
        Ok(deleted)
    }
}

fn long_view(drink: &Drink) -> Result<DrinkLong, DrinkApiError> {
    drink.long().map_err(|e| corrupt(drink, e))
}

fn corrupt(drink: &Drink, e: RecipeError) -> DrinkApiError {
    warn!("🍹️ {drink} has a recipe that cannot be read back. {e}");
    DrinkApiError::CorruptRecipe { id: drink.id, reason: e.to_string() }
}
