//! Team and RosterPlayer data structures.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a registered team.
pub type TeamId = Uuid;

/// Unique identifier for a roster entry.
pub type PlayerId = Uuid;

/// Platform account identity a roster entry may be linked to.
pub type UserId = Uuid;

/// Registration lifecycle of a team.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    #[default]
    Registered,
    PaymentPending,
    Verified,
    /// Only approved teams are drawn onto the bracket.
    Approved,
    Rejected,
}

/// A player on a team's roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: PlayerId,
    pub display_name: String,
    /// Linked platform account, if the player has one.
    pub user_id: Option<UserId>,
}

impl RosterPlayer {
    /// Create a roster entry. Leading and trailing whitespace is trimmed from the name.
    pub fn new(display_name: impl Into<String>, user_id: Option<UserId>) -> Self {
        let display_name: String = display_name.into();
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.trim().to_string(),
            user_id,
        }
    }
}

/// A registered competitor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub tournament_id: TournamentId,
    pub name: String,
    pub status: TeamStatus,
    pub roster: Vec<RosterPlayer>,
}

impl Team {
    pub fn new(tournament_id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
            status: TeamStatus::Registered,
            roster: Vec::new(),
        }
    }

    /// Builder-style roster for tests and seeding.
    pub fn with_roster(mut self, roster: Vec<RosterPlayer>) -> Self {
        self.roster = roster;
        self
    }

    pub fn is_approved(&self) -> bool {
        self.status == TeamStatus::Approved
    }
}
