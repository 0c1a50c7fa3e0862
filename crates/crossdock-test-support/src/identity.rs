//! Identity doubles — scripted permission and membership collaborators.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use crossdock_core::error::DomainError;
use crossdock_core::identity::{
    ManagerInfoFinder, ManagerProfile, MemberExistenceChecker, PermissionChecker,
};
use uuid::Uuid;

/// A permission checker scripted with the set of members it grants
/// hub-manage rights to. `None` grants everyone.
#[derive(Debug)]
pub struct StaticPermissionChecker {
    granted: Option<HashSet<Uuid>>,
}

impl StaticPermissionChecker {
    /// Grants hub-manage rights to every member.
    #[must_use]
    pub fn allow_all() -> Self {
        Self { granted: None }
    }

    /// Denies hub-manage rights to every member.
    #[must_use]
    pub fn deny_all() -> Self {
        Self {
            granted: Some(HashSet::new()),
        }
    }

    /// Grants hub-manage rights to exactly the given members.
    #[must_use]
    pub fn allowing(members: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            granted: Some(members.into_iter().collect()),
        }
    }
}

#[async_trait]
impl PermissionChecker for StaticPermissionChecker {
    async fn has_manage_permission(&self, member_id: Uuid) -> Result<bool, DomainError> {
        Ok(self
            .granted
            .as_ref()
            .is_none_or(|granted| granted.contains(&member_id)))
    }
}

/// A membership directory scripted with the set of activated members.
#[derive(Debug)]
pub struct StaticMemberDirectory {
    activated: HashSet<Uuid>,
}

impl StaticMemberDirectory {
    /// A directory containing exactly the given activated members.
    #[must_use]
    pub fn with_members(members: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            activated: members.into_iter().collect(),
        }
    }

    /// A directory with no activated members.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            activated: HashSet::new(),
        }
    }
}

#[async_trait]
impl MemberExistenceChecker for StaticMemberDirectory {
    async fn has_member(&self, member_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.activated.contains(&member_id))
    }
}

/// A manager directory scripted with known profiles.
#[derive(Debug, Default)]
pub struct StaticManagerDirectory {
    profiles: HashMap<Uuid, ManagerProfile>,
}

impl StaticManagerDirectory {
    /// A directory containing exactly the given profiles.
    #[must_use]
    pub fn with_profiles(profiles: impl IntoIterator<Item = ManagerProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.id, profile))
                .collect(),
        }
    }
}

#[async_trait]
impl ManagerInfoFinder for StaticManagerDirectory {
    async fn find(&self, manager_id: Uuid) -> Result<ManagerProfile, DomainError> {
        self.profiles
            .get(&manager_id)
            .cloned()
            .ok_or(DomainError::MemberNotFound(manager_id))
    }
}
