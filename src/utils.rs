pub mod config;
pub mod errors;
pub mod fruit_store;
pub mod fruit_types;
pub mod fruit_utils;
pub mod middleware;
pub mod views;
