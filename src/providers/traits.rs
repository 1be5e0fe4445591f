// src/providers/traits.rs
// DOCUMENTATION: Collaborator contracts
// PURPOSE: Object-safe traits so services hold providers as Arc<dyn ...>

use crate::errors::Result;
use crate::models::{Attraction, TripDeal, VisitedLocation};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

/// Boxed future returned by async collaborator calls
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Source of a user's current position
/// DOCUMENTATION: May be slow; retries are not the caller's concern
pub trait LocationProvider: Send + Sync {
    fn current_location(&self, user_id: Uuid) -> ProviderFuture<'_, VisitedLocation>;
}

/// Snapshot-style attraction catalog
pub trait AttractionCatalog: Send + Sync {
    fn attractions(&self) -> Vec<Attraction>;
}

/// Reward point lookup for an (attraction, user) pair
/// DOCUMENTATION: Treated as idempotent and side-effect free; may have
/// network-like latency
pub trait RewardPointSource: Send + Sync {
    fn reward_points(&self, attraction_id: Uuid, user_id: Uuid) -> ProviderFuture<'_, i32>;
}

/// Inputs for a trip price request
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuote {
    pub api_key: String,
    pub user_id: Uuid,
    pub adults: u32,
    pub children: u32,
    pub nights: u32,
    pub reward_points: i64,
}

/// Converts a point total plus preferences into priced offers
pub trait TripPricer: Send + Sync {
    fn price(&self, quote: &TripQuote) -> Result<Vec<TripDeal>>;
}
