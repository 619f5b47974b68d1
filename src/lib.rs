//! Tournament scheduler: bracket generation, team draw, and match bookkeeping.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    add_match, add_roster_player, advance_group, bracket_size, clear_schedule, delete_match,
    generate_group_knockout_schedule, generate_group_knockout_schedule_with,
    generate_knockout_schedule, generate_knockout_schedule_with, generate_schedule, generate_slots,
    group_layout, group_name, group_seed_label, knockout_match_count, randomize_teams,
    randomize_teams_with, record_winner, regenerate_schedule, register_team, schedule_rows,
    set_team_status, shuffle, shuffle_with, slot_index, slot_label, sync_roster, update_settings,
    validate_settings, write_schedule_csv, Advancement, DrawOutcome, FixtureRow, GroupLayout,
    KnockoutOptions, ManualFixture, RegistrationError, SeedAssignment, BYE_SLOT, MAX_BRACKET_SIZE,
    MAX_GROUP_SIZE, MAX_TEAM_COUNT,
};
pub use models::{
    DedupKey, GroupStage, JoinState, LinkId, LinkTeams, MatchId, MatchRecord, MatchUpdate,
    NewMatch, Participant, PlayerId, RosterPlayer, RoundLabel, ScheduleError, ScheduleLink,
    ScheduleSlot, Side, Team, TeamId, TeamStatus, Tournament, TournamentFormat, TournamentId,
    TournamentSettings, UserId, DEFAULT_ADVANCING_PER_GROUP, DEFAULT_GROUP_SIZE, PLACEHOLDER_SLOT,
};
pub use store::{InMemoryStore, ScheduleStore, StoreError};
