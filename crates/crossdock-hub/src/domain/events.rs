//! Domain events for the hub bounded context.
//!
//! Event values are snapshots of post-mutation aggregate state. They leave
//! the process under a fixed routing key with a camelCase JSON payload;
//! consumers bind on the key, so neither side may change.

use crossdock_core::event::DomainEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hub::Hub;

/// Routing key for [`HubRegistered`].
pub const HUB_REGISTERED_KEY: &str = "registered";
/// Routing key for [`HubUpdated`].
pub const HUB_UPDATED_KEY: &str = "updated";
/// Routing key for [`HubDeleted`].
pub const HUB_DELETED_KEY: &str = "deleted";
/// Routing key for [`HubManagerChanged`].
pub const HUB_MANAGER_CHANGED_KEY: &str = "managerChanged";
/// Routing key for [`RouteUpdated`].
pub const ROUTE_UPDATED_KEY: &str = "routeUpdated";

/// Raised when a hub is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubRegistered {
    /// The new hub's identifier.
    pub hub_id: Uuid,
    /// The new hub's display name.
    pub hub_name: String,
    /// The designated manager.
    pub manager_id: Uuid,
    /// Username of the requester that registered the hub.
    pub actor: String,
}

impl HubRegistered {
    /// Snapshot of a freshly registered hub.
    #[must_use]
    pub fn from_hub(hub: &Hub, actor: &str) -> Self {
        Self {
            hub_id: hub.id,
            hub_name: hub.name.clone(),
            manager_id: hub.manager_id,
            actor: actor.to_owned(),
        }
    }
}

/// Raised when a hub's descriptive fields are replaced.
///
/// Carries no hub id; the consumer contract keys on name and manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubUpdated {
    /// The hub's (possibly new) display name.
    pub hub_name: String,
    /// The unchanged manager.
    pub manager_id: Uuid,
    /// Username of the requester that updated the hub.
    pub actor: String,
}

impl HubUpdated {
    /// Snapshot of an updated hub.
    #[must_use]
    pub fn from_hub(hub: &Hub, actor: &str) -> Self {
        Self {
            hub_name: hub.name.clone(),
            manager_id: hub.manager_id,
            actor: actor.to_owned(),
        }
    }
}

/// Raised when a hub is soft-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubDeleted {
    /// The retired hub's identifier.
    pub hub_id: Uuid,
    /// The manager at deletion time.
    pub manager_id: Uuid,
    /// Username of the requester that deleted the hub.
    pub actor: String,
}

impl HubDeleted {
    /// Snapshot of a just-deleted hub.
    #[must_use]
    pub fn from_hub(hub: &Hub, actor: &str) -> Self {
        Self {
            hub_id: hub.id,
            manager_id: hub.manager_id,
            actor: actor.to_owned(),
        }
    }
}

/// Raised when a hub is handed to a new manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubManagerChanged {
    /// The hub's identifier.
    pub hub_id: Uuid,
    /// The hub's display name.
    pub hub_name: String,
    /// The manager before the change.
    pub old_manager_id: Uuid,
    /// The manager after the change.
    pub new_manager_id: Uuid,
    /// Username of the requester that changed the manager.
    pub actor: String,
}

impl HubManagerChanged {
    /// Snapshot of a hub after a manager change; `old_manager_id` must be
    /// captured before the mutation.
    #[must_use]
    pub fn from_hub(hub: &Hub, old_manager_id: Uuid, actor: &str) -> Self {
        Self {
            hub_id: hub.id,
            hub_name: hub.name.clone(),
            old_manager_id,
            new_manager_id: hub.manager_id,
            actor: actor.to_owned(),
        }
    }
}

/// The domain events raised by hub lifecycle mutations.
#[derive(Debug, Clone)]
pub enum HubEvent {
    /// A hub was registered.
    Registered(HubRegistered),
    /// A hub's descriptive fields were replaced.
    Updated(HubUpdated),
    /// A hub was soft-deleted.
    Deleted(HubDeleted),
    /// A hub was handed to a new manager.
    ManagerChanged(HubManagerChanged),
}

impl DomainEvent for HubEvent {
    fn routing_key(&self) -> &'static str {
        match self {
            Self::Registered(_) => HUB_REGISTERED_KEY,
            Self::Updated(_) => HUB_UPDATED_KEY,
            Self::Deleted(_) => HUB_DELETED_KEY,
            Self::ManagerChanged(_) => HUB_MANAGER_CHANGED_KEY,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        match self {
            Self::Registered(payload) => serde_json::to_value(payload),
            Self::Updated(payload) => serde_json::to_value(payload),
            Self::Deleted(payload) => serde_json::to_value(payload),
            Self::ManagerChanged(payload) => serde_json::to_value(payload),
        }
        .expect("HubEvent serialization is infallible")
    }
}

/// Signal that the route graph around a hub was rewritten.
///
/// Sent by the route graph engine straight to the outbound publisher once
/// its own unit of work commits; it never travels through the
/// commit-scoped channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteUpdated {
    /// The hub whose surrounding routes changed.
    pub hub_id: Uuid,
}

impl DomainEvent for RouteUpdated {
    fn routing_key(&self) -> &'static str {
        ROUTE_UPDATED_KEY
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("RouteUpdated serialization is infallible")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use crossdock_core::distance::Coordinate;
    use crossdock_test_support::FixedClock;

    use super::*;
    use crate::domain::hub::Address;

    fn sample_hub() -> Hub {
        Hub::register(
            "Gateway North".to_owned(),
            Address::new("1 Dock Road", None),
            Coordinate::new(51.92, 4.47),
            Uuid::new_v4(),
            &FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()),
        )
    }

    #[test]
    fn test_routing_keys_match_the_consumer_contract() {
        // Arrange
        let hub = sample_hub();

        // Act & Assert
        let registered = HubEvent::Registered(HubRegistered::from_hub(&hub, "ops.lee"));
        assert_eq!(registered.routing_key(), "registered");
        let updated = HubEvent::Updated(HubUpdated::from_hub(&hub, "ops.lee"));
        assert_eq!(updated.routing_key(), "updated");
        let deleted = HubEvent::Deleted(HubDeleted::from_hub(&hub, "ops.lee"));
        assert_eq!(deleted.routing_key(), "deleted");
        let changed = HubEvent::ManagerChanged(HubManagerChanged::from_hub(
            &hub,
            Uuid::new_v4(),
            "ops.lee",
        ));
        assert_eq!(changed.routing_key(), "managerChanged");
        assert_eq!(RouteUpdated { hub_id: hub.id }.routing_key(), "routeUpdated");
    }

    #[test]
    fn test_registered_payload_uses_wire_field_names() {
        // Arrange
        let hub = sample_hub();
        let event = HubEvent::Registered(HubRegistered::from_hub(&hub, "ops.lee"));

        // Act
        let payload = event.to_payload();

        // Assert
        assert_eq!(payload["hubId"], serde_json::json!(hub.id));
        assert_eq!(payload["hubName"], "Gateway North");
        assert_eq!(payload["managerId"], serde_json::json!(hub.manager_id));
        assert_eq!(payload["actor"], "ops.lee");
    }

    #[test]
    fn test_updated_payload_carries_no_hub_id() {
        // Arrange
        let hub = sample_hub();

        // Act
        let payload = HubEvent::Updated(HubUpdated::from_hub(&hub, "ops.lee")).to_payload();

        // Assert
        assert!(payload.get("hubId").is_none());
        assert_eq!(payload["hubName"], "Gateway North");
    }

    #[test]
    fn test_manager_change_payload_carries_both_manager_ids() {
        // Arrange
        let mut hub = sample_hub();
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
        let new_manager = Uuid::new_v4();

        // Act
        let old_manager = hub.change_manager(new_manager, &clock);
        let payload = HubEvent::ManagerChanged(HubManagerChanged::from_hub(
            &hub,
            old_manager,
            "ops.lee",
        ))
        .to_payload();

        // Assert
        assert_eq!(payload["oldManagerId"], serde_json::json!(old_manager));
        assert_eq!(payload["newManagerId"], serde_json::json!(new_manager));
        assert_eq!(payload["hubId"], serde_json::json!(hub.id));
    }

    #[test]
    fn test_route_updated_payload_names_the_hub() {
        // Arrange
        let hub_id = Uuid::new_v4();

        // Act
        let payload = RouteUpdated { hub_id }.to_payload();

        // Assert
        assert_eq!(payload["hubId"], serde_json::json!(hub_id));
    }
}
