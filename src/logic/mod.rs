//! Scheduling logic: bracket generators, the team draw, roster sync, progression, registration.

mod export;
mod group_knockout;
mod journal;
mod knockout;
mod labels;
mod materializer;
mod progression;
mod registration;
mod roster;
mod shuffle;

pub use export::{schedule_rows, write_schedule_csv, FixtureRow};
pub use group_knockout::{
    generate_group_knockout_schedule, generate_group_knockout_schedule_with, group_layout,
    GroupLayout, BYE_SLOT, MAX_GROUP_SIZE, MAX_TEAM_COUNT,
};
pub use knockout::{
    bracket_size, generate_knockout_schedule, generate_knockout_schedule_with,
    knockout_match_count, KnockoutOptions, MAX_BRACKET_SIZE,
};
pub use labels::{group_name, group_seed_label, slot_index, slot_label};
pub use materializer::{
    add_match, clear_schedule, delete_match, generate_schedule, generate_slots, randomize_teams,
    randomize_teams_with, regenerate_schedule, DrawOutcome, ManualFixture, SeedAssignment,
};
pub use progression::{advance_group, record_winner, Advancement};
pub use registration::{
    add_roster_player, register_team, set_team_status, update_settings, validate_settings,
    RegistrationError,
};
pub use roster::sync_roster;
pub use shuffle::{shuffle, shuffle_with};
