pub mod client;
pub mod stations;
pub mod trips;

pub use client::{DataClient, LoadError};
