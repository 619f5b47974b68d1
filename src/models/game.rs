//! Match records, sides, and match participants.

use crate::models::team::{RosterPlayer, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match record.
pub type MatchId = Uuid;

/// Which side of a fixture a team or participant is on.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Join state of a match participant.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinState {
    Invited,
    #[default]
    Confirmed,
}

/// Identity used to avoid adding the same person to a match twice.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum DedupKey {
    /// Linked platform account.
    Identified(UserId),
    /// No account; the display name, trimmed and lowercased.
    Named(String),
}

impl DedupKey {
    pub fn new(user_id: Option<UserId>, display_name: &str) -> Self {
        match user_id {
            Some(id) => DedupKey::Identified(id),
            None => DedupKey::Named(display_name.trim().to_lowercase()),
        }
    }

    pub fn for_player(player: &RosterPlayer) -> Self {
        Self::new(player.user_id, &player.display_name)
    }
}

/// A participant entry on a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: Option<UserId>,
    pub display_name: String,
    pub side: Side,
    pub join_state: JoinState,
}

impl Participant {
    /// Confirmed participant for a roster player on the given side.
    pub fn confirmed(player: &RosterPlayer, side: Side) -> Self {
        Self {
            user_id: player.user_id,
            display_name: player.display_name.clone(),
            side,
            join_state: JoinState::Confirmed,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(self.user_id, &self.display_name)
    }
}

/// Fields for creating a match record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub title: String,
    /// Placeholder until the organizer picks a date.
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Partial update of a match record. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchUpdate {
    pub title: Option<String>,
    pub winner: Option<Side>,
}

/// A match record in the surrounding match-hosting store.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    /// Display name, e.g. "Lions vs Team D - Semi-final".
    pub title: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// None if not yet played.
    pub winner: Option<Side>,
    pub participants: Vec<Participant>,
}

impl MatchRecord {
    pub fn new(fields: NewMatch) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            scheduled_at: fields.scheduled_at,
            created_at: Utc::now(),
            winner: None,
            participants: Vec::new(),
        }
    }
}
