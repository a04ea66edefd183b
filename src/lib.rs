#![doc = "The `tickbox` library crate."]
#![doc = ""]
#![doc = "This crate contains the business logic, domain models, authentication"]
#![doc = "mechanisms, routing configuration, and error handling for the tickbox"]
#![doc = "to-do list service. It is used by the main binary (`main.rs`) to construct"]
#![doc = "and run the application."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
