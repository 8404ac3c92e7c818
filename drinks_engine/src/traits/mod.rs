//! # Storage backend contracts
//!
//! The traits in this module define what a storage backend must provide so that the [`crate::DrinkApi`] can run on
//! top of it. Backends are expected to do plain persistence; validation and view shaping live in the API layer.
//!
//! * [`DrinkManagement`] defines the CRUD operations on drink records.
mod drink_management;

pub use drink_management::{DrinkApiError, DrinkManagement};
