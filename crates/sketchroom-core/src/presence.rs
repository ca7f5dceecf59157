//! Member list aggregation from the presence/awareness channel.

use crate::sync::AwarenessState;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A connected participant. `session_id` is the identity key; nicknames are
/// not unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub nickname: String,
    pub color: String,
    pub session_id: Uuid,
    /// Last published cursor position in canvas coordinates.
    pub cursor: Option<Point>,
    /// Whether the member's media peer is ready for screen-share calls.
    pub peer_ready: Option<bool>,
}

/// Aggregates remote awareness updates into a member list, deduplicated by
/// session id. Partial updates merge into what the session already
/// published.
#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    members: HashMap<Uuid, Member>,
}

impl PresenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an awareness update for a session. Absent fields keep their
    /// previous values.
    pub fn apply(&mut self, session_id: Uuid, state: &AwarenessState) {
        let member = self.members.entry(session_id).or_insert_with(|| Member {
            nickname: String::new(),
            color: String::new(),
            session_id,
            cursor: None,
            peer_ready: None,
        });

        if let Some(nickname) = &state.nickname {
            member.nickname = nickname.clone();
        }
        if let Some(color) = &state.color {
            member.color = color.clone();
        }
        if let Some(cursor) = state.cursor {
            member.cursor = Some(cursor);
        }
        if let Some(ready) = state.peer_ready {
            member.peer_ready = Some(ready);
        }
    }

    /// Drop a departed session.
    pub fn remove(&mut self, session_id: Uuid) {
        self.members.remove(&session_id);
    }

    /// Drop all sessions (connection teardown).
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Number of known sessions.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no sessions are known.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up one member by session.
    pub fn get(&self, session_id: Uuid) -> Option<&Member> {
        self.members.get(&session_id)
    }

    /// The current member list, ordered by session id for stable rendering.
    pub fn members(&self) -> Vec<Member> {
        let mut members: Vec<Member> = self.members.values().cloned().collect();
        members.sort_by_key(|m| m.session_id);
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(nickname: Option<&str>, color: Option<&str>) -> AwarenessState {
        AwarenessState {
            nickname: nickname.map(str::to_string),
            color: color.map(str::to_string),
            cursor: None,
            peer_ready: None,
        }
    }

    #[test]
    fn test_dedup_by_session_id() {
        let mut registry = PresenceRegistry::new();
        let session = Uuid::new_v4();

        registry.apply(session, &state(Some("ada"), Some("#FFB6C1")));
        registry.apply(session, &state(Some("ada"), Some("#FFB6C1")));

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_nickname_distinct_sessions() {
        let mut registry = PresenceRegistry::new();
        registry.apply(Uuid::new_v4(), &state(Some("ada"), None));
        registry.apply(Uuid::new_v4(), &state(Some("ada"), None));

        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_partial_update_merges() {
        let mut registry = PresenceRegistry::new();
        let session = Uuid::new_v4();

        registry.apply(session, &state(Some("ada"), Some("#FFB6C1")));
        // A cursor-only update must not erase identity fields.
        registry.apply(
            session,
            &AwarenessState {
                cursor: Some(Point::new(10.0, 20.0)),
                ..AwarenessState::default()
            },
        );

        let member = registry.get(session).unwrap();
        assert_eq!(member.nickname, "ada");
        assert_eq!(member.color, "#FFB6C1");
        assert_eq!(member.cursor, Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_remove_session() {
        let mut registry = PresenceRegistry::new();
        let session = Uuid::new_v4();
        registry.apply(session, &state(Some("ada"), None));

        registry.remove(session);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_members_sorted_by_session() {
        let mut registry = PresenceRegistry::new();
        for _ in 0..5 {
            registry.apply(Uuid::new_v4(), &state(Some("x"), None));
        }

        let members = registry.members();
        assert_eq!(members.len(), 5);

        let ids: Vec<Uuid> = members.iter().map(|m| m.session_id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
