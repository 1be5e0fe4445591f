// src/lib.rs
// DOCUMENTATION: Crate root
// PURPOSE: Proximity rewards engine with bounded-concurrency tracking

pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

pub use errors::{Result, TourGuideError};
