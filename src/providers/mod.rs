// src/providers/mod.rs
// DOCUMENTATION: External collaborators consumed by the reward engine
// PURPOSE: Trait seams plus simulated implementations used by the binary

pub mod gps;
pub mod reward_central;
#[cfg(test)]
pub mod testing;
pub mod traits;
pub mod trip_pricer;

pub use gps::*;
pub use reward_central::*;
pub use traits::*;
pub use trip_pricer::*;
