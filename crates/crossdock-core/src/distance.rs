//! Distance measurement collaborator contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One measured directed leg between two coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLeg {
    /// Driving distance in kilometers.
    pub distance_km: f64,
    /// Estimated driving time in minutes.
    pub duration_minutes: i32,
}

/// Measures directed travel legs between coordinates.
///
/// Legs are directed: `route(a, b)` and `route(b, a)` are separate
/// measurements and may differ.
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    /// Measures the leg from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RouteComputation` when the leg cannot be
    /// measured.
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteLeg, DomainError>;
}
