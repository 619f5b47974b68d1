//! Turning generated slots into stored matches, drawing teams onto them, and manual overrides.
//!
//! Multi-record writes go through a [`Journal`]: if a store call fails part way, the writes
//! already applied are undone before the error is returned.

use crate::logic::group_knockout::generate_group_knockout_schedule_with;
use crate::logic::journal::Journal;
use crate::logic::knockout::{generate_knockout_schedule_with, KnockoutOptions};
use crate::logic::labels::slot_index;
use crate::logic::roster::sync_roster_journaled;
use crate::logic::shuffle::shuffle_with;
use crate::models::{
    LinkId, LinkTeams, MatchUpdate, NewMatch, RoundLabel, ScheduleError, ScheduleLink, ScheduleSlot,
    Side, Team, TeamId, Tournament, TournamentFormat, TournamentId,
};
use crate::store::{ScheduleStore, StoreError};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A fixture added by hand, outside the generators.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ManualFixture {
    pub round: RoundLabel,
    pub slot_a: String,
    pub slot_b: String,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// One seed label and the team drawn onto it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeedAssignment {
    pub slot: String,
    pub team_id: TeamId,
    pub team_name: String,
}

/// Result of a draw.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DrawOutcome {
    /// In seed order.
    pub assignments: Vec<SeedAssignment>,
    /// Links that ended up with at least one team bound.
    pub bound_links: usize,
    /// Approved teams left over because the bracket has fewer seeds.
    pub unassigned_teams: Vec<TeamId>,
}

/// Generated slots for the tournament's format. Nothing is written.
pub fn generate_slots(tournament: &Tournament) -> Result<Vec<ScheduleSlot>, ScheduleError> {
    let options = KnockoutOptions {
        third_place: tournament.third_place_match,
    };
    match tournament.format {
        TournamentFormat::Knockout => generate_knockout_schedule_with(tournament.team_count, options),
        TournamentFormat::GroupKnockout => {
            generate_group_knockout_schedule_with(tournament.team_count, tournament.group_stage, options)
        }
        TournamentFormat::League => Err(ScheduleError::InvalidFormat(tournament.format)),
    }
}

/// Generate the schedule and store one match plus one link per slot.
///
/// Fails with `PreconditionFailed` if the tournament already has a schedule; use
/// [`regenerate_schedule`] to replace one.
pub fn generate_schedule<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament: &Tournament,
) -> Result<Vec<ScheduleLink>, ScheduleError> {
    let slots = generate_slots(tournament)?;
    if !store.list_schedule_links(tournament.id)?.is_empty() {
        return Err(ScheduleError::PreconditionFailed(
            "A schedule already exists; delete it before generating a new one".to_string(),
        ));
    }

    let mut journal = Journal::new();
    for slot in &slots {
        if let Err(source) = write_slot(store, tournament.id, slot, &mut journal) {
            return Err(abort("generate schedule", journal, store, source));
        }
    }
    log::info!(
        "Generated {} fixture(s) for tournament {} ({})",
        slots.len(),
        tournament.id,
        tournament.format
    );
    Ok(store.list_schedule_links(tournament.id)?)
}

/// Delete the existing schedule (links and their matches), then generate a new one.
pub fn regenerate_schedule<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament: &Tournament,
) -> Result<Vec<ScheduleLink>, ScheduleError> {
    // Validate before deleting anything.
    generate_slots(tournament)?;
    clear_schedule(store, tournament.id)?;
    generate_schedule(store, tournament)
}

/// Delete every link of the tournament together with its match. Returns the number removed.
pub fn clear_schedule<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<usize, ScheduleError> {
    let links = store.list_schedule_links(tournament_id)?;
    let mut completed = 0;
    for link in &links {
        let result = store
            .delete_match(link.match_id)
            .and_then(|()| store.delete_schedule_link(link.id));
        if let Err(source) = result {
            return Err(ScheduleError::PartialWriteFailure {
                operation: "clear schedule",
                completed,
                rolled_back: false,
                source,
            });
        }
        completed += 1;
    }
    log::info!("Cleared {} fixture(s) for tournament {}", completed, tournament_id);
    Ok(completed)
}

/// Draw approved teams onto the schedule's seed labels using the thread RNG.
pub fn randomize_teams<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament: &Tournament,
) -> Result<DrawOutcome, ScheduleError> {
    randomize_teams_with(store, tournament, &mut rand::thread_rng())
}

/// Draw approved teams onto the schedule's seed labels.
///
/// Seed labels found on the links are ordered by seed index; shuffled teams fill them in
/// that order and surplus teams stay unassigned. Every link carrying a seed label has its
/// seed sides rewritten, so a repeated draw leaves no stale bindings. Links without seed
/// labels (later knockout rounds) are not touched.
pub fn randomize_teams_with<S, R>(
    store: &mut S,
    tournament: &Tournament,
    rng: &mut R,
) -> Result<DrawOutcome, ScheduleError>
where
    S: ScheduleStore + ?Sized,
    R: Rng + ?Sized,
{
    let teams = store.list_approved_teams(tournament.id)?;
    if teams.is_empty() {
        return Err(ScheduleError::PreconditionFailed(
            "No approved teams to draw".to_string(),
        ));
    }
    let links = store.list_schedule_links(tournament.id)?;
    if links.is_empty() {
        return Err(ScheduleError::PreconditionFailed(
            "Generate a schedule before drawing teams".to_string(),
        ));
    }

    let labels = seed_labels(&links);
    let drawn = shuffle_with(&teams, rng);
    let assigned: HashMap<&str, &Team> = labels.iter().map(String::as_str).zip(drawn.iter()).collect();

    let mut journal = Journal::new();
    let mut bound_links = 0;
    for link in links.iter().filter(|l| has_seed_label(l)) {
        let result = side_team(store, link, Side::A, &assigned).and_then(|team_a| {
            let team_b = side_team(store, link, Side::B, &assigned)?;
            bind_link(store, link, team_a.as_ref(), team_b.as_ref(), &mut journal)?;
            Ok(team_a.is_some() || team_b.is_some())
        });
        match result {
            Ok(true) => bound_links += 1,
            Ok(false) => {}
            Err(source) => return Err(abort("randomize teams", journal, store, source)),
        }
    }

    let assignments: Vec<SeedAssignment> = labels
        .iter()
        .zip(drawn.iter())
        .map(|(slot, team)| SeedAssignment {
            slot: slot.clone(),
            team_id: team.id,
            team_name: team.name.clone(),
        })
        .collect();
    let unassigned_teams: Vec<TeamId> = drawn.iter().skip(labels.len()).map(|t| t.id).collect();
    log::info!(
        "Drew {} team(s) onto {} link(s) for tournament {} ({} left unassigned)",
        assignments.len(),
        bound_links,
        tournament.id,
        unassigned_teams.len()
    );
    Ok(DrawOutcome {
        assignments,
        bound_links,
        unassigned_teams,
    })
}

/// Add one fixture by hand. Its `match_order` follows the highest existing one.
pub fn add_match<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    fixture: ManualFixture,
) -> Result<ScheduleLink, ScheduleError> {
    let slot_a = fixture.slot_a.trim();
    let slot_b = fixture.slot_b.trim();
    if slot_a.is_empty() || slot_b.is_empty() {
        return Err(ScheduleError::PreconditionFailed(
            "Both slot labels are required".to_string(),
        ));
    }
    let links = store.list_schedule_links(tournament_id)?;
    let match_order = links.iter().map(|l| l.match_order).max().unwrap_or(0) + 1;
    let slot = ScheduleSlot {
        round: fixture.round,
        match_order,
        slot_a: slot_a.to_string(),
        slot_b: slot_b.to_string(),
        group_name: fixture.group_name,
    };

    let mut journal = Journal::new();
    let written = store
        .create_match(NewMatch {
            title: slot.display_name(),
            scheduled_at: fixture.scheduled_at,
        })
        .and_then(|match_id| {
            journal.created_match(match_id);
            let link_id = store.create_schedule_link(tournament_id, &slot, match_id)?;
            journal.created_link(link_id);
            Ok(link_id)
        });
    match written {
        Ok(link_id) => Ok(store.get_schedule_link(link_id)?),
        Err(source) => Err(abort("add match", journal, store, source)),
    }
}

/// Delete one fixture: its match record and its link.
pub fn delete_match<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    link_id: LinkId,
) -> Result<ScheduleLink, ScheduleError> {
    let link = find_link(store, tournament_id, link_id)?;
    store.delete_match(link.match_id)?;
    store
        .delete_schedule_link(link.id)
        .map_err(|source| ScheduleError::PartialWriteFailure {
            operation: "delete match",
            completed: 1,
            rolled_back: false,
            source,
        })?;
    log::info!("Deleted fixture #{} ({}) from tournament {}", link.match_order, link.id, tournament_id);
    Ok(link)
}

/// Link of `tournament_id`; links of other tournaments are reported as missing.
pub(crate) fn find_link<S: ScheduleStore + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
    link_id: LinkId,
) -> Result<ScheduleLink, StoreError> {
    let link = store.get_schedule_link(link_id)?;
    if link.tournament_id != tournament_id {
        return Err(StoreError::NotFound {
            kind: "schedule link",
            id: link_id,
        });
    }
    Ok(link)
}

/// Rewrite a link's teams, retitle its match, and sync the bound rosters.
pub(crate) fn bind_link<S: ScheduleStore + ?Sized>(
    store: &mut S,
    link: &ScheduleLink,
    team_a: Option<&Team>,
    team_b: Option<&Team>,
    journal: &mut Journal,
) -> Result<(), StoreError> {
    let previous_title = store.get_match(link.match_id)?.title;
    let teams = LinkTeams {
        team_a_id: team_a.map(|t| t.id),
        team_b_id: team_b.map(|t| t.id),
    };
    store.update_schedule_link(link.id, teams)?;
    journal.rebound(link.id, link.teams(), link.match_id, previous_title);

    let title = link.display_name(team_a.map(|t| t.name.as_str()), team_b.map(|t| t.name.as_str()));
    store.update_match(
        link.match_id,
        MatchUpdate {
            title: Some(title),
            winner: None,
        },
    )?;
    for (team, side) in [(team_a, Side::A), (team_b, Side::B)] {
        if let Some(team) = team {
            sync_roster_journaled(store, link.match_id, team, side, journal)?;
        }
    }
    Ok(())
}

/// Undo what the journal recorded and build the error for the caller.
pub(crate) fn abort<S: ScheduleStore + ?Sized>(
    operation: &'static str,
    journal: Journal,
    store: &mut S,
    source: StoreError,
) -> ScheduleError {
    let completed = journal.len();
    log::warn!("{} failed after {} write(s): {}; rolling back", operation, completed, source);
    let rolled_back = journal.roll_back(store);
    if !rolled_back {
        log::error!("{}: rollback incomplete, schedule needs manual cleanup", operation);
    }
    ScheduleError::PartialWriteFailure {
        operation,
        completed,
        rolled_back,
        source,
    }
}

fn write_slot<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    slot: &ScheduleSlot,
    journal: &mut Journal,
) -> Result<(), StoreError> {
    let match_id = store.create_match(NewMatch {
        title: slot.display_name(),
        scheduled_at: None,
    })?;
    journal.created_match(match_id);
    let link_id = store.create_schedule_link(tournament_id, slot, match_id)?;
    journal.created_link(link_id);
    Ok(())
}

/// Distinct seed labels on the links, in seed order.
fn seed_labels(links: &[ScheduleLink]) -> Vec<String> {
    let mut labels = BTreeMap::new();
    for link in links {
        for slot in [&link.slot_a, &link.slot_b] {
            if let Some(index) = slot_index(slot) {
                labels.entry(index).or_insert_with(|| slot.clone());
            }
        }
    }
    labels.into_values().collect()
}

fn has_seed_label(link: &ScheduleLink) -> bool {
    slot_index(&link.slot_a).is_some() || slot_index(&link.slot_b).is_some()
}

/// Team for one side after the draw: the drawn team for a seed label, otherwise whatever
/// is already bound there.
fn side_team<S: ScheduleStore + ?Sized>(
    store: &S,
    link: &ScheduleLink,
    side: Side,
    assigned: &HashMap<&str, &Team>,
) -> Result<Option<Team>, StoreError> {
    let slot = link.slot(side);
    if slot_index(slot).is_some() {
        return Ok(assigned.get(slot).map(|t| (*t).clone()));
    }
    link.team(side).map(|id| store.get_team(id)).transpose()
}
