//! The Hub aggregate and its value objects.

use chrono::{DateTime, Utc};
use crossdock_core::clock::Clock;
use crossdock_core::distance::Coordinate;
use uuid::Uuid;

/// Two-part street address of a hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Street line.
    pub street: String,
    /// Optional detail line (building, gate, suite).
    pub detail: Option<String>,
}

impl Address {
    /// Creates an address.
    #[must_use]
    pub fn new(street: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            street: street.into(),
            detail,
        }
    }
}

/// Soft-delete marker: who retired the row, and when.
///
/// Held as a single optional field on aggregates and entities so the
/// timestamp and the actor can only ever be set together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    /// When the row was retired.
    pub at: DateTime<Utc>,
    /// Username that retired it.
    pub by: String,
}

/// A registered logistics hub.
///
/// Identity is the generated `id`; keyed collections key on it and no
/// value equality is derived for the aggregate itself.
#[derive(Debug, Clone)]
pub struct Hub {
    /// Hub identifier, generated at registration and immutable.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: Address,
    /// Geographic position used for route measurement.
    pub coordinate: Coordinate,
    /// Member id of the responsible manager.
    pub manager_id: Uuid,
    /// When the hub was registered.
    pub created_at: DateTime<Utc>,
    /// When the hub was last mutated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; `None` while the hub is active.
    pub deleted: Option<Deletion>,
}

impl Hub {
    /// Registers a new hub with a generated id.
    #[must_use]
    pub fn register(
        name: String,
        address: Address,
        coordinate: Coordinate,
        manager_id: Uuid,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id: Uuid::new_v4(),
            name,
            address,
            coordinate,
            manager_id,
            created_at: now,
            updated_at: now,
            deleted: None,
        }
    }

    /// Replaces the descriptive fields; the manager is untouched.
    pub fn update_info(
        &mut self,
        name: String,
        address: Address,
        coordinate: Coordinate,
        clock: &dyn Clock,
    ) {
        self.name = name;
        self.address = address;
        self.coordinate = coordinate;
        self.updated_at = clock.now();
    }

    /// Hands the hub to a new manager, returning the previous manager id.
    pub fn change_manager(&mut self, new_manager_id: Uuid, clock: &dyn Clock) -> Uuid {
        let previous = self.manager_id;
        self.manager_id = new_manager_id;
        self.updated_at = clock.now();
        previous
    }

    /// Soft-deletes the hub, recording the actor and the instant together.
    ///
    /// Returns `false` without mutating anything when the hub is already
    /// deleted, so the first deletion's actor and timestamp survive
    /// repeated calls.
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

    /// Whether the hub participates in the active set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted.is_none()
    }
}
