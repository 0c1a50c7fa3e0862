//! The `HubRoute` entity — one directed leg of the route graph.

use chrono::{DateTime, Utc};
use crossdock_core::clock::Clock;
use crossdock_core::distance::RouteLeg;
use uuid::Uuid;

use super::hub::Deletion;

/// A directed route between two hubs.
///
/// Routes are written in measured pairs (A→B and B→A are separate rows
/// with independently measured legs), but each row stands alone: identity
/// is the generated `id`.
#[derive(Debug, Clone)]
pub struct HubRoute {
    /// Route identifier, generated when the leg is measured.
    pub id: Uuid,
    /// Hub the leg starts at.
    pub source_hub_id: Uuid,
    /// Hub the leg ends at.
    pub target_hub_id: Uuid,
    /// Measured driving distance in kilometers.
    pub distance_km: f64,
    /// Measured driving time in minutes.
    pub duration_minutes: i32,
    /// When the leg was measured and written.
    pub created_at: DateTime<Utc>,
    /// When the row was last mutated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; `None` while the route is active.
    pub deleted: Option<Deletion>,
}

impl HubRoute {
    /// Creates the directed route for one measured leg.
    #[must_use]
    pub fn connect(
        source_hub_id: Uuid,
        target_hub_id: Uuid,
        leg: RouteLeg,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id: Uuid::new_v4(),
            source_hub_id,
            target_hub_id,
            distance_km: leg.distance_km,
            duration_minutes: leg.duration_minutes,
            created_at: now,
            updated_at: now,
            deleted: None,
        }
    }

    /// Soft-deletes the route, recording the actor and the instant
    /// together. Returns `false` without mutating anything when the route
    /// is already deleted.
    pub fn mark_deleted(&mut self, by: &str, clock: &dyn Clock) -> bool {
        if self.deleted.is_some() {
            return false;
        }
        let now = clock.now();
        self.deleted = Some(Deletion {
            at: now,
            by: by.to_owned(),
        });
        self.updated_at = now;
        true
    }

    /// Whether the route participates in the active graph.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted.is_none()
    }

    /// Whether the route starts or ends at `hub_id`.
    #[must_use]
    pub fn touches(&self, hub_id: Uuid) -> bool {
        self.source_hub_id == hub_id || self.target_hub_id == hub_id
    }
}
