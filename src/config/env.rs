// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use crate::errors::{Result, TourGuideError};
use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Default reward eligibility radius in statute miles (default 10)
    pub proximity_buffer_miles: f64,

    /// Recommendation radius in statute miles (default 200)
    pub attraction_proximity_range_miles: f64,

    /// How many attractions the nearby listing returns (default 5)
    pub nearby_attraction_count: usize,

    /// Dispatcher slots for population-scale operations (default 1000)
    pub max_in_flight: usize,

    /// Number of simulated users created at startup (default 100)
    pub internal_user_count: usize,

    /// Background tracker period in seconds (default 300)
    pub tracking_interval_secs: u64,

    /// Seed for simulated data; random when unset
    pub rng_seed: Option<u64>,

    /// Key passed through to the trip pricer
    pub trip_pricer_api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            proximity_buffer_miles: 10.0,
            attraction_proximity_range_miles: 200.0,
            nearby_attraction_count: 5,
            max_in_flight: 1000,
            internal_user_count: 100,
            tracking_interval_secs: 300,
            rng_seed: None,
            trip_pricer_api_key: "test-server-api-key".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Unparseable values fall back to the defaults
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Config::default();

        Config {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            proximity_buffer_miles: parse_var("PROXIMITY_BUFFER_MILES")
                .unwrap_or(defaults.proximity_buffer_miles),

            attraction_proximity_range_miles: parse_var("ATTRACTION_PROXIMITY_RANGE_MILES")
                .unwrap_or(defaults.attraction_proximity_range_miles),

            nearby_attraction_count: parse_var("NEARBY_ATTRACTION_COUNT")
                .unwrap_or(defaults.nearby_attraction_count),

            max_in_flight: parse_var("MAX_IN_FLIGHT").unwrap_or(defaults.max_in_flight),

            internal_user_count: parse_var("INTERNAL_USER_COUNT")
                .unwrap_or(defaults.internal_user_count),

            tracking_interval_secs: parse_var("TRACKING_INTERVAL_SECS")
                .unwrap_or(defaults.tracking_interval_secs),

            rng_seed: parse_var("RNG_SEED"),

            trip_pricer_api_key: env::var("TRIP_PRICER_API_KEY")
                .unwrap_or(defaults.trip_pricer_api_key),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures the engine can start with sane thresholds
    pub fn validate(&self) -> Result<()> {
        if !is_valid_threshold(self.proximity_buffer_miles) {
            return Err(TourGuideError::InvalidThreshold(self.proximity_buffer_miles));
        }

        if !is_valid_threshold(self.attraction_proximity_range_miles) {
            return Err(TourGuideError::InvalidThreshold(
                self.attraction_proximity_range_miles,
            ));
        }

        if self.max_in_flight == 0 {
            return Err(TourGuideError::InvalidInput(
                "MAX_IN_FLIGHT must be at least 1".to_string(),
            ));
        }

        if self.proximity_buffer_miles > self.attraction_proximity_range_miles {
            log::warn!(
                "Proximity buffer ({} mi) is larger than the nearby radius ({} mi)",
                self.proximity_buffer_miles,
                self.attraction_proximity_range_miles
            );
        }

        Ok(())
    }
}

/// A distance threshold must be a finite, non-negative number of miles.
pub fn is_valid_threshold(miles: f64) -> bool {
    miles.is_finite() && miles >= 0.0
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.proximity_buffer_miles, 10.0);
        assert_eq!(config.attraction_proximity_range_miles, 200.0);
        assert_eq!(config.max_in_flight, 1000);
    }

    #[test]
    fn test_negative_buffer_rejected() {
        let config = Config {
            proximity_buffer_miles: -1.0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(TourGuideError::InvalidThreshold(-1.0))
        );
    }

    #[test]
    fn test_zero_in_flight_rejected() {
        let config = Config {
            max_in_flight: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TourGuideError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_threshold_validity() {
        assert!(is_valid_threshold(0.0));
        assert!(is_valid_threshold(10.0));
        assert!(!is_valid_threshold(-0.5));
        assert!(!is_valid_threshold(f64::NAN));
        assert!(!is_valid_threshold(f64::INFINITY));
    }
}
