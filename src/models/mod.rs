//! Data structures for tournament scheduling: tournaments, teams, slots, links, matches.

mod game;
mod schedule;
mod team;
mod tournament;

pub use game::{DedupKey, JoinState, MatchId, MatchRecord, MatchUpdate, NewMatch, Participant, Side};
pub use schedule::{LinkId, LinkTeams, RoundLabel, ScheduleLink, ScheduleSlot, PLACEHOLDER_SLOT};
pub use team::{PlayerId, RosterPlayer, Team, TeamId, TeamStatus, UserId};
pub use tournament::{
    GroupStage, ScheduleError, Tournament, TournamentFormat, TournamentId, TournamentSettings,
    DEFAULT_ADVANCING_PER_GROUP, DEFAULT_GROUP_SIZE,
};
