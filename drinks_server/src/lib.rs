//! # Drinks server
//! This crate hosts the HTTP server for the drinks catalog. It is responsible for:
//! * Verifying bearer tokens issued by the identity provider, and enforcing the permission each route requires.
//! * Routing requests to the [`drinks_engine::DrinkApi`].
//! * Rendering results and errors as JSON.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /drinks`: The public menu. Drinks in the short view.
//! * `GET /drinks-detail`: Drinks in the long view. Requires `get:drinks-detail`.
//! * `POST /drinks`: Adds a drink. Requires `post:drinks`.
//! * `PATCH /drinks/{id}`: Modifies a drink. Requires `patch:drinks`.
//! * `DELETE /drinks/{id}`: Removes a drink. Requires `delete:drinks`.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
