// src/errors.rs
// DOCUMENTATION: Custom error types for the reward engine
// PURPOSE: Centralized error handling for entire crate

use thiserror::Error;
use uuid::Uuid;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Transient variants come from external collaborators and are recovered
/// per unit of work; the rest are reported to the caller as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TourGuideError {
    #[error("Invalid threshold: {0} (must be a finite, non-negative distance in miles)")]
    InvalidThreshold(f64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Location unavailable for user {0}")]
    LocationUnavailable(Uuid),

    #[error("Reward points unavailable for attraction {attraction_id} and user {user_id}")]
    RewardPointsUnavailable { attraction_id: Uuid, user_id: Uuid },

    #[error("Trip pricing unavailable: {0}")]
    PricingUnavailable(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl TourGuideError {
    /// Whether the failure came from a slow or flaky collaborator.
    /// DOCUMENTATION: Transient errors are skipped per item, never fatal to a batch
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TourGuideError::LocationUnavailable(_)
                | TourGuideError::RewardPointsUnavailable { .. }
                | TourGuideError::PricingUnavailable(_)
                | TourGuideError::TaskFailed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TourGuideError>;
