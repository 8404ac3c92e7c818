use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    db_types::{DrinkUpdate, NewDrink, Recipe},
    traits::DrinkApiError,
};

/// Request body for creating a drink. `recipe` may be any of the forms accepted by [`Recipe::try_from`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Value>,
}

impl TryFrom<NewDrinkRequest> for NewDrink {
    type Error = DrinkApiError;

    fn try_from(request: NewDrinkRequest) -> Result<Self, Self::Error> {
        let title = non_blank(request.title)
            .ok_or_else(|| DrinkApiError::InvalidTitle("A drink must have a title.".into()))?;
        let recipe = Recipe::try_from(request.recipe.unwrap_or(Value::Null))?;
        Ok(NewDrink { title, recipe })
    }
}

/// Request body for modifying a drink. Blank or missing fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifyDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Value>,
}

impl TryFrom<ModifyDrinkRequest> for DrinkUpdate {
    type Error = DrinkApiError;

    fn try_from(request: ModifyDrinkRequest) -> Result<Self, Self::Error> {
        let title = non_blank(request.title);
        let recipe = request.recipe.map(Recipe::try_from).transpose()?;
        Ok(DrinkUpdate { title, recipe })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}
