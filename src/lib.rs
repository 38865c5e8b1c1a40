//! Personal movie/TV recommendation tracker served as HTML.
//!
//! Records live in one JSON document that is reloaded on every request and
//! rewritten wholesale on every change.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
