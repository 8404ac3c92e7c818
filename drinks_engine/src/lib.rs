//! Drinks Engine
//!
//! The drinks engine holds the data model and business logic for a catalog of drink recipes. It has no knowledge of
//! HTTP or authorization; those concerns belong to the server crate.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`traits`] and [`sqlite`]). A backend stores drink records and assigns their ids. SQLite is the
//!    supported backend. The data types used by the backends are defined in [`db_types`] and are public.
//! 2. The public API ([`DrinkApi`]). This validates incoming drinks, normalizes recipes to their stored form and
//!    renders stored records into the short (public) or long (detailed) view.
pub mod db_types;
mod api;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(all(feature = "sqlite", any(feature = "test_utils", test)))]
pub mod test_utils;

pub use api::{
    drink_objects::{self, ModifyDrinkRequest, NewDrinkRequest},
    drinks_api::DrinkApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{DrinkApiError, DrinkManagement};
