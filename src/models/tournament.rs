//! Tournament configuration and the scheduling error taxonomy.

use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Teams per group when the organizer does not configure one.
pub const DEFAULT_GROUP_SIZE: usize = 4;

/// Teams advancing from each group to the knockout stage by default.
pub const DEFAULT_ADVANCING_PER_GROUP: usize = 2;

/// Errors raised by schedule generation, the draw, and match overrides.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ScheduleError {
    /// The tournament format has no bracket generator (league).
    #[error("schedule generation is not supported for the {0} format")]
    InvalidFormat(TournamentFormat),
    /// Links already exist, no approved teams, no links to randomize, etc.
    #[error("{0}")]
    PreconditionFailed(String),
    /// A store write failed part way through a multi-record operation.
    #[error("{operation} failed after {completed} write(s) (rolled back: {rolled_back}): {source}")]
    PartialWriteFailure {
        operation: &'static str,
        completed: usize,
        rolled_back: bool,
        #[source]
        source: StoreError,
    },
    /// Zero or one team cannot form a bracket.
    #[error("need at least 2 teams to build a bracket (got {team_count})")]
    DegenerateInput { team_count: usize },
    #[error("{team_count} teams exceeds the largest supported bracket of {max}")]
    BracketTooLarge { team_count: usize, max: usize },
    #[error("invalid group stage: {0}")]
    InvalidGroupStage(String),
    /// A read against the store failed before anything was written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How the tournament is played out.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Single elimination.
    #[default]
    Knockout,
    /// Round-robin groups feeding a single-elimination stage.
    GroupKnockout,
    /// Season-style league; no bracket is generated.
    League,
}

impl std::fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentFormat::Knockout => write!(f, "knockout"),
            TournamentFormat::GroupKnockout => write!(f, "group_knockout"),
            TournamentFormat::League => write!(f, "league"),
        }
    }
}

/// Group stage shape for group+knockout tournaments.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupStage {
    pub group_size: usize,
    pub advancing_per_group: usize,
}

impl Default for GroupStage {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
            advancing_per_group: DEFAULT_ADVANCING_PER_GROUP,
        }
    }
}

/// Editable configuration. Applied through `update_settings`, which refuses
/// changes once a schedule exists. Missing fields take their defaults when deserialized.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentSettings {
    pub format: TournamentFormat,
    pub team_count: usize,
    pub min_roster: usize,
    pub max_roster: usize,
    pub group_stage: GroupStage,
    pub third_place_match: bool,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            format: TournamentFormat::Knockout,
            team_count: 8,
            min_roster: 1,
            max_roster: 15,
            group_stage: GroupStage::default(),
            third_place_match: false,
        }
    }
}

/// A tournament as configured by its organizer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    /// Target number of teams; the generators round it up to a supported size.
    pub team_count: usize,
    pub min_roster: usize,
    pub max_roster: usize,
    pub group_stage: GroupStage,
    /// Append a third-place fixture to the knockout stage.
    pub third_place_match: bool,
}

impl Tournament {
    /// Create a tournament with the given name and settings.
    pub fn new(name: impl Into<String>, settings: TournamentSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format: settings.format,
            team_count: settings.team_count,
            min_roster: settings.min_roster,
            max_roster: settings.max_roster,
            group_stage: settings.group_stage,
            third_place_match: settings.third_place_match,
        }
    }

    /// Current configuration as a settings value.
    pub fn settings(&self) -> TournamentSettings {
        TournamentSettings {
            format: self.format,
            team_count: self.team_count,
            min_roster: self.min_roster,
            max_roster: self.max_roster,
            group_stage: self.group_stage,
            third_place_match: self.third_place_match,
        }
    }

    pub(crate) fn apply_settings(&mut self, settings: TournamentSettings) {
        self.format = settings.format;
        self.team_count = settings.team_count;
        self.min_roster = settings.min_roster;
        self.max_roster = settings.max_roster;
        self.group_stage = settings.group_stage;
        self.third_place_match = settings.third_place_match;
    }
}
