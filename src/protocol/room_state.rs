use std::collections::HashSet;

use super::types::{RoomId, Theme, UserId};

/// A room's in-memory state.
///
/// Invariants (enforced by [`crate::registry::RoomRegistry`], not by this
/// struct in isolation): `host_id` is always present in `members`; `members`
/// never contains duplicates.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub host_id: UserId,
    /// Insertion-ordered membership; the host is always first.
    pub members: Vec<UserId>,
    pub theme: Theme,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Room {
    pub fn new(id: RoomId, host_id: UserId) -> Self {
        Self {
            members: vec![host_id.clone()],
            id,
            host_id,
            theme: Theme::default(),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn contains_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    /// Adds `user_id` if not already present. Returns `true` if it was added.
    pub fn add_member(&mut self, user_id: UserId) -> bool {
        if self.contains_member(&user_id) {
            return false;
        }
        self.members.push(user_id);
        true
    }

    /// Removes `user_id`. Returns `true` if it was present.
    pub fn remove_member(&mut self, user_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != user_id);
        self.members.len() != before
    }

    pub fn is_host(&self, user_id: &str) -> bool {
        self.host_id == user_id
    }

    /// Whether another member already uses `name`, case-sensitively, under a
    /// different identity than `excluding`.
    pub fn name_taken_by_other(
        &self,
        name: &str,
        excluding: &str,
        names: &std::collections::HashMap<UserId, String>,
    ) -> bool {
        self.members
            .iter()
            .any(|member| member != excluding && names.get(member).is_some_and(|n| n == name))
    }

    pub fn member_set(&self) -> HashSet<&UserId> {
        self.members.iter().collect()
    }

    pub fn viewers(&self) -> impl Iterator<Item = &UserId> {
        self.members.iter().filter(move |m| *m != &self.host_id)
    }

    pub fn has_only_host(&self) -> bool {
        self.members.len() == 1 && self.members[0] == self.host_id
    }
}
