pub mod api;
pub mod config;
pub mod loader;
pub mod models;
pub mod providers;
pub mod services;
