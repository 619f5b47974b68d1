//! Abstract schedule slots, persisted schedule links, and round labels.

use crate::models::game::{MatchId, Side};
use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a schedule link.
pub type LinkId = Uuid;

/// Slot label used for knockout fixtures whose teams come from earlier results.
pub const PLACEHOLDER_SLOT: &str = "TBD";

/// Stage of the tournament a fixture belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum RoundLabel {
    #[serde(rename = "group")]
    Group,
    #[serde(rename = "round-of-64")]
    RoundOf64,
    #[serde(rename = "round-of-32")]
    RoundOf32,
    #[serde(rename = "round-of-16")]
    RoundOf16,
    #[serde(rename = "quarter-final")]
    QuarterFinal,
    #[serde(rename = "semi-final")]
    SemiFinal,
    #[serde(rename = "third-place")]
    ThirdPlace,
    #[serde(rename = "final")]
    Final,
}

/// Knockout rounds indexed by distance from the final (0 = final).
const KNOCKOUT_ROUNDS: [RoundLabel; 6] = [
    RoundLabel::Final,
    RoundLabel::SemiFinal,
    RoundLabel::QuarterFinal,
    RoundLabel::RoundOf16,
    RoundLabel::RoundOf32,
    RoundLabel::RoundOf64,
];

impl RoundLabel {
    /// Label for a knockout round `distance` rounds before the final.
    pub fn from_distance(distance: usize) -> Option<Self> {
        KNOCKOUT_ROUNDS.get(distance).copied()
    }

    /// Rounds remaining until the final; None for group and third-place fixtures.
    pub fn distance_from_final(self) -> Option<usize> {
        KNOCKOUT_ROUNDS.iter().position(|r| *r == self)
    }

    /// The knockout round winners of this round advance to.
    pub fn next(self) -> Option<Self> {
        match self.distance_from_final()? {
            0 => None,
            d => Self::from_distance(d - 1),
        }
    }

    /// Number of knockout rounds a table entry supports.
    pub const fn max_knockout_rounds() -> usize {
        KNOCKOUT_ROUNDS.len()
    }

    /// Stable wire name, e.g. "round-of-16".
    pub fn as_str(self) -> &'static str {
        match self {
            RoundLabel::Group => "group",
            RoundLabel::RoundOf64 => "round-of-64",
            RoundLabel::RoundOf32 => "round-of-32",
            RoundLabel::RoundOf16 => "round-of-16",
            RoundLabel::QuarterFinal => "quarter-final",
            RoundLabel::SemiFinal => "semi-final",
            RoundLabel::ThirdPlace => "third-place",
            RoundLabel::Final => "final",
        }
    }
}

impl std::fmt::Display for RoundLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RoundLabel::Group => "Group Stage",
            RoundLabel::RoundOf64 => "Round of 64",
            RoundLabel::RoundOf32 => "Round of 32",
            RoundLabel::RoundOf16 => "Round of 16",
            RoundLabel::QuarterFinal => "Quarter-final",
            RoundLabel::SemiFinal => "Semi-final",
            RoundLabel::ThirdPlace => "Third Place",
            RoundLabel::Final => "Final",
        };
        f.write_str(name)
    }
}

/// One generated fixture before any team is known.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub round: RoundLabel,
    /// 1-based, contiguous across the whole schedule.
    pub match_order: u32,
    pub slot_a: String,
    pub slot_b: String,
    pub group_name: Option<String>,
}

impl ScheduleSlot {
    /// Display name with no teams bound.
    pub fn display_name(&self) -> String {
        fixture_title(&self.slot_a, &self.slot_b, self.round)
    }
}

/// Team bindings written onto a link by the draw or by progression.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LinkTeams {
    pub team_a_id: Option<TeamId>,
    pub team_b_id: Option<TeamId>,
}

/// Persisted binding of a slot to a match record and, once drawn, to teams.
/// Slot fields never change after creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleLink {
    pub id: LinkId,
    pub tournament_id: TournamentId,
    pub match_id: MatchId,
    pub round: RoundLabel,
    pub match_order: u32,
    pub slot_a: String,
    pub slot_b: String,
    pub group_name: Option<String>,
    pub team_a_id: Option<TeamId>,
    pub team_b_id: Option<TeamId>,
}

impl ScheduleLink {
    pub fn new(tournament_id: TournamentId, slot: &ScheduleSlot, match_id: MatchId) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            match_id,
            round: slot.round,
            match_order: slot.match_order,
            slot_a: slot.slot_a.clone(),
            slot_b: slot.slot_b.clone(),
            group_name: slot.group_name.clone(),
            team_a_id: None,
            team_b_id: None,
        }
    }

    /// True while no team is bound to either side.
    pub fn is_placeholder(&self) -> bool {
        self.team_a_id.is_none() && self.team_b_id.is_none()
    }

    pub fn teams(&self) -> LinkTeams {
        LinkTeams {
            team_a_id: self.team_a_id,
            team_b_id: self.team_b_id,
        }
    }

    pub fn team(&self, side: Side) -> Option<TeamId> {
        match side {
            Side::A => self.team_a_id,
            Side::B => self.team_b_id,
        }
    }

    pub fn slot(&self, side: Side) -> &str {
        match side {
            Side::A => &self.slot_a,
            Side::B => &self.slot_b,
        }
    }

    /// Match display name, falling back to slot labels for unbound sides.
    pub fn display_name(&self, team_a: Option<&str>, team_b: Option<&str>) -> String {
        fixture_title(
            team_a.unwrap_or(&self.slot_a),
            team_b.unwrap_or(&self.slot_b),
            self.round,
        )
    }
}

fn fixture_title(a: &str, b: &str, round: RoundLabel) -> String {
    format!("{a} vs {b} - {round}")
}
