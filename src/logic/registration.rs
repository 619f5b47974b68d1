//! Team registration, approval, and tournament settings changes.

use crate::logic::group_knockout::{group_layout, MAX_TEAM_COUNT};
use crate::logic::knockout::bracket_size;
use crate::models::{
    DedupKey, RosterPlayer, Team, TeamId, TeamStatus, Tournament, TournamentFormat,
    TournamentSettings,
};
use crate::store::{ScheduleStore, StoreError};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RegistrationError {
    #[error("Team name must not be empty")]
    EmptyName,
    /// Team names are unique per tournament (case-insensitive).
    #[error("A team with this name already exists")]
    DuplicateTeamName,
    #[error("{0} is already on this roster")]
    DuplicatePlayer(String),
    #[error("Roster has {size} player(s); it must have between {min} and {max}")]
    RosterSize { size: usize, min: usize, max: usize },
    #[error("Tournament already has {approved} approved team(s) of {team_count}")]
    TournamentFull { approved: usize, team_count: usize },
    #[error("Team does not belong to this tournament")]
    WrongTournament,
    #[error("Settings cannot change once a schedule exists; delete the schedule first")]
    ScheduleExists,
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sanity checks for tournament settings. Bracketed formats must describe a schedule the
/// generators can build.
pub fn validate_settings(settings: &TournamentSettings) -> Result<(), RegistrationError> {
    if settings.team_count < 2 || settings.team_count > MAX_TEAM_COUNT {
        return Err(RegistrationError::InvalidSettings(format!(
            "team count must be between 2 and {} (got {})",
            MAX_TEAM_COUNT, settings.team_count
        )));
    }
    let layout = match settings.format {
        TournamentFormat::Knockout => bracket_size(settings.team_count).map(|_| ()),
        TournamentFormat::GroupKnockout => {
            group_layout(settings.team_count, settings.group_stage).map(|_| ())
        }
        TournamentFormat::League => Ok(()),
    };
    layout.map_err(|e| RegistrationError::InvalidSettings(e.to_string()))?;
    if settings.max_roster == 0 || settings.min_roster > settings.max_roster {
        return Err(RegistrationError::InvalidSettings(format!(
            "roster limits {}..={} are not valid",
            settings.min_roster, settings.max_roster
        )));
    }
    Ok(())
}

/// Replace the tournament's settings. Refused once any schedule link exists.
pub fn update_settings<S: ScheduleStore + ?Sized>(
    store: &S,
    tournament: &mut Tournament,
    settings: TournamentSettings,
) -> Result<(), RegistrationError> {
    if !store.list_schedule_links(tournament.id)?.is_empty() {
        return Err(RegistrationError::ScheduleExists);
    }
    validate_settings(&settings)?;
    tournament.apply_settings(settings);
    Ok(())
}

/// Register a team with an optional initial roster.
pub fn register_team<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament: &Tournament,
    name: &str,
    roster: Vec<RosterPlayer>,
) -> Result<Team, RegistrationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RegistrationError::EmptyName);
    }
    let is_duplicate = store
        .list_teams(tournament.id)?
        .iter()
        .any(|t| t.name.eq_ignore_ascii_case(name));
    if is_duplicate {
        return Err(RegistrationError::DuplicateTeamName);
    }
    if roster.len() > tournament.max_roster {
        return Err(RegistrationError::RosterSize {
            size: roster.len(),
            min: tournament.min_roster,
            max: tournament.max_roster,
        });
    }
    let mut seen = HashSet::new();
    for player in &roster {
        if !seen.insert(DedupKey::for_player(player)) {
            return Err(RegistrationError::DuplicatePlayer(player.display_name.clone()));
        }
    }

    let team = Team::new(tournament.id, name).with_roster(roster);
    store.insert_team(team.clone())?;
    log::info!("Registered team {} ({}) for tournament {}", team.name, team.id, tournament.id);
    Ok(team)
}

/// Add one player to a team's roster.
pub fn add_roster_player<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament: &Tournament,
    team_id: TeamId,
    player: RosterPlayer,
) -> Result<Team, RegistrationError> {
    let mut team = tournament_team(store, tournament, team_id)?;
    let key = DedupKey::for_player(&player);
    if team.roster.iter().any(|p| DedupKey::for_player(p) == key) {
        return Err(RegistrationError::DuplicatePlayer(player.display_name));
    }
    if team.roster.len() >= tournament.max_roster {
        return Err(RegistrationError::RosterSize {
            size: team.roster.len() + 1,
            min: tournament.min_roster,
            max: tournament.max_roster,
        });
    }
    team.roster.push(player);
    store.update_team(&team)?;
    Ok(team)
}

/// Move a team to `status`. Approval needs a roster within limits and a free place.
pub fn set_team_status<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament: &Tournament,
    team_id: TeamId,
    status: TeamStatus,
) -> Result<Team, RegistrationError> {
    let mut team = tournament_team(store, tournament, team_id)?;
    if status == TeamStatus::Approved && !team.is_approved() {
        let size = team.roster.len();
        if size < tournament.min_roster || size > tournament.max_roster {
            return Err(RegistrationError::RosterSize {
                size,
                min: tournament.min_roster,
                max: tournament.max_roster,
            });
        }
        let approved = store.list_approved_teams(tournament.id)?.len();
        if approved >= tournament.team_count {
            return Err(RegistrationError::TournamentFull {
                approved,
                team_count: tournament.team_count,
            });
        }
    }
    team.status = status;
    store.update_team(&team)?;
    log::info!("Team {} is now {:?}", team.name, status);
    Ok(team)
}

fn tournament_team<S: ScheduleStore + ?Sized>(
    store: &S,
    tournament: &Tournament,
    team_id: TeamId,
) -> Result<Team, RegistrationError> {
    let team = store.get_team(team_id)?;
    if team.tournament_id != tournament.id {
        return Err(RegistrationError::WrongTournament);
    }
    Ok(team)
}
