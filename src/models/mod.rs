// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod location;
pub mod reward;
pub mod trip;
pub mod user;

pub use location::*;
pub use reward::*;
pub use trip::*;
pub use user::*;
