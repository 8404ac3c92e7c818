//! # Drinks catalog public API
//!
//! The `api` module exposes the programmatic API for the drinks catalog.
//!
//! * [`drinks_api`] provides the list, create, update and delete operations, and renders records into their short
//!   (public) or long (detailed) views.
//! * [`drink_objects`] holds the request objects accepted by the API.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements [`crate::traits::DrinkManagement`].
//!
//! ```rust,ignore
//! use drinks_engine::{DrinkApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://drinks.db", 5).await?;
//! let api = DrinkApi::new(db);
//! let menu = api.short_list().await?;
//! ```
pub mod drink_objects;
pub mod drinks_api;
