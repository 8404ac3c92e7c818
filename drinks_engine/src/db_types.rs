use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;

//--------------------------------------     Ingredient       ---------------------------------------------------------
/// A single line of a recipe. `parts` is the relative quantity of this ingredient in the drink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: u32,
}

/// The public projection of an [`Ingredient`]. The ingredient name is withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientShort {
    pub color: String,
    pub parts: u32,
}

impl From<&Ingredient> for IngredientShort {
    fn from(value: &Ingredient) -> Self {
        Self { color: value.color.clone(), parts: value.parts }
    }
}

//--------------------------------------     Recipe       -------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("A recipe is required.")]
    Missing,
    #[error("The recipe could not be parsed. {0}")]
    Malformed(String),
    #[error("A recipe must contain at least one ingredient.")]
    Empty,
    #[error("Ingredient '{0}' must have at least one part.")]
    ZeroParts(String),
}

/// An ordered, validated list of ingredients.
///
/// A `Recipe` can only be built through [`Recipe::new`], [`Recipe::from_stored`] or [`Recipe::try_from`] a JSON
/// value, all of which enforce that the recipe is non-empty and that every ingredient has at least one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Recipe(Vec<Ingredient>);

impl Recipe {
    pub fn new(ingredients: Vec<Ingredient>) -> Result<Self, RecipeError> {
        if ingredients.is_empty() {
            return Err(RecipeError::Empty);
        }
        if let Some(i) = ingredients.iter().find(|i| i.parts == 0) {
            return Err(RecipeError::ZeroParts(i.name.clone()));
        }
        Ok(Self(ingredients))
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }

    pub fn short(&self) -> Vec<IngredientShort> {
        self.0.iter().map(IngredientShort::from).collect()
    }

    /// The canonical serialized form that is written to the database.
    pub fn to_stored(&self) -> String {
        // A Vec of plain structs with string and integer fields always serializes
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".into())
    }

    /// Parses a recipe from its stored (serialized) form.
    pub fn from_stored(stored: &str) -> Result<Self, RecipeError> {
        let ingredients = serde_json::from_str::<Vec<Ingredient>>(stored)
            .map_err(|e| RecipeError::Malformed(e.to_string()))?;
        Self::new(ingredients)
    }
}

/// Clients may submit a recipe as
/// * a string holding a serialized recipe,
/// * an array of ingredients, or
/// * a single ingredient object, which becomes a one-item recipe.
impl TryFrom<Value> for Recipe {
    type Error = RecipeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let value = match value {
            Value::String(s) => serde_json::from_str(&s).map_err(|e| RecipeError::Malformed(e.to_string()))?,
            v => v,
        };
        let ingredients = match value {
            Value::Array(_) => {
                serde_json::from_value::<Vec<Ingredient>>(value).map_err(|e| RecipeError::Malformed(e.to_string()))?
            },
            Value::Object(_) => {
                let ingredient =
                    serde_json::from_value::<Ingredient>(value).map_err(|e| RecipeError::Malformed(e.to_string()))?;
                vec![ingredient]
            },
            Value::Null => return Err(RecipeError::Missing),
            other => return Err(RecipeError::Malformed(format!("expected a list of ingredients, got {other}"))),
        };
        Self::new(ingredients)
    }
}

//--------------------------------------     Drink       --------------------------------------------------------------
/// A drink record, exactly as it is stored. The recipe is kept in its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

impl Display for Drink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Drink #{} ({})", self.id, self.title)
    }
}

impl Drink {
    pub fn recipe(&self) -> Result<Recipe, RecipeError> {
        Recipe::from_stored(&self.recipe)
    }

    pub fn short(&self) -> Result<DrinkShort, RecipeError> {
        let recipe = self.recipe()?.short();
        Ok(DrinkShort { id: self.id, title: self.title.clone(), recipe })
    }

    pub fn long(&self) -> Result<DrinkLong, RecipeError> {
        let recipe = self.recipe()?;
        Ok(DrinkLong { id: self.id, title: self.title.clone(), recipe })
    }
}

/// Public representation of a drink. Ingredient names are hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

/// Full representation of a drink, including ingredient names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Recipe,
}

/// A validated drink that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

/// A validated set of changes to an existing drink. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkUpdate {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

impl DrinkUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}
