// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod dispatcher;
pub mod distance;
pub mod internal_users;
pub mod rewards_service;
pub mod tour_guide_service;
pub mod tracker;
pub mod user_directory;

pub use dispatcher::*;
pub use distance::*;
pub use internal_users::*;
pub use rewards_service::*;
pub use tour_guide_service::*;
pub use tracker::*;
pub use user_directory::*;
