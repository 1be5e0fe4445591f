// src/config/proximity.rs
// DOCUMENTATION: Runtime-adjustable distance thresholds
// PURPOSE: Share proximity settings across workers without a lock on the hot path

use crate::config::env::is_valid_threshold;
use crate::errors::{Result, TourGuideError};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default reward eligibility radius in statute miles
pub const DEFAULT_PROXIMITY_BUFFER_MILES: f64 = 10.0;

/// Default recommendation radius in statute miles
pub const DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES: f64 = 200.0;

/// A float stored as its bit pattern so reads are never torn.
#[derive(Debug)]
struct AtomicMiles(AtomicU64);

impl AtomicMiles {
    fn new(miles: f64) -> Self {
        Self(AtomicU64::new(miles.to_bits()))
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    fn store(&self, miles: f64) {
        self.0.store(miles.to_bits(), Ordering::Release);
    }
}

/// Proximity thresholds used by the reward engine
/// DOCUMENTATION: Both thresholds are independently configurable at runtime.
/// Setters validate first; an invalid value leaves the previous one in effect.
/// Calculations started after a setter returns observe the new value.
#[derive(Debug)]
pub struct ProximitySettings {
    default_buffer: f64,
    default_range: f64,
    proximity_buffer: AtomicMiles,
    attraction_range: AtomicMiles,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            default_buffer: DEFAULT_PROXIMITY_BUFFER_MILES,
            default_range: DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES,
            proximity_buffer: AtomicMiles::new(DEFAULT_PROXIMITY_BUFFER_MILES),
            attraction_range: AtomicMiles::new(DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES),
        }
    }
}

impl ProximitySettings {
    /// Create settings with custom defaults
    /// DOCUMENTATION: The given values become what the reset methods restore
    pub fn new(proximity_buffer: f64, attraction_range: f64) -> Result<Self> {
        for miles in [proximity_buffer, attraction_range] {
            if !is_valid_threshold(miles) {
                return Err(TourGuideError::InvalidThreshold(miles));
            }
        }

        Ok(Self {
            default_buffer: proximity_buffer,
            default_range: attraction_range,
            proximity_buffer: AtomicMiles::new(proximity_buffer),
            attraction_range: AtomicMiles::new(attraction_range),
        })
    }

    pub fn proximity_buffer(&self) -> f64 {
        self.proximity_buffer.load()
    }

    pub fn default_proximity_buffer(&self) -> f64 {
        self.default_buffer
    }

    /// Override the reward eligibility radius
    pub fn set_proximity_buffer(&self, miles: f64) -> Result<()> {
        if !is_valid_threshold(miles) {
            log::warn!(
                "Rejected proximity buffer {} (keeping {})",
                miles,
                self.proximity_buffer()
            );
            return Err(TourGuideError::InvalidThreshold(miles));
        }
        self.proximity_buffer.store(miles);
        log::debug!("Proximity buffer set to {} mi", miles);
        Ok(())
    }

    pub fn reset_proximity_buffer(&self) {
        self.proximity_buffer.store(self.default_buffer);
        log::debug!("Proximity buffer reset to {} mi", self.default_buffer);
    }

    pub fn attraction_proximity_range(&self) -> f64 {
        self.attraction_range.load()
    }

    /// Override the recommendation radius
    pub fn set_attraction_proximity_range(&self, miles: f64) -> Result<()> {
        if !is_valid_threshold(miles) {
            return Err(TourGuideError::InvalidThreshold(miles));
        }
        self.attraction_range.store(miles);
        Ok(())
    }

    pub fn reset_attraction_proximity_range(&self) {
        self.attraction_range.store(self.default_range);
    }
}
