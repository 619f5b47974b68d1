//! Recording results and moving knockout winners forward.
//!
//! Progression is an organizer action: nothing advances until a winner is recorded. The
//! `p`-th fixture of a knockout round feeds side A (even `p`) or side B (odd `p`) of
//! fixture `p / 2` in the next round. Semi-final losers feed the third-place fixture.
//! Group standings are entered with [`advance_group`], which fills the knockout links
//! labelled "Group A #1", "Group A #2", ...

use crate::logic::journal::Journal;
use crate::logic::labels::group_seed_label;
use crate::logic::materializer::{abort, bind_link, find_link};
use crate::models::{
    LinkId, MatchUpdate, RoundLabel, ScheduleError, ScheduleLink, Side, Team, TeamId,
    TournamentId,
};
use crate::store::{ScheduleStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Where a recorded result sent the teams.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Advancement {
    pub winner: Option<TeamId>,
    /// Next-round link the winner was bound to.
    pub advanced_to: Option<LinkId>,
    /// Third-place link the loser was bound to.
    pub loser_to: Option<LinkId>,
}

/// Record `side` as the winner of a fixture and bind the winner onto the next round.
pub fn record_winner<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    link_id: LinkId,
    side: Side,
) -> Result<Advancement, ScheduleError> {
    let link = find_link(store, tournament_id, link_id)?;
    let winner = link.team(side);
    let result = MatchUpdate {
        title: None,
        winner: Some(side),
    };

    let Some(next_round) = link.round.next() else {
        store.update_match(link.match_id, result)?;
        log::info!("Recorded {:?} as winner of fixture #{}", side, link.match_order);
        return Ok(Advancement {
            winner,
            ..Advancement::default()
        });
    };
    let Some(winner_id) = winner else {
        return Err(ScheduleError::PreconditionFailed(
            "No team is bound to the winning side".to_string(),
        ));
    };

    let links = store.list_schedule_links(tournament_id)?;
    let position = round_fixtures(&links, link.round)
        .position(|l| l.id == link.id)
        .unwrap_or_default();
    let next = round_fixtures(&links, next_round)
        .nth(position / 2)
        .cloned()
        .ok_or_else(|| {
            ScheduleError::PreconditionFailed(format!("No {} fixture to advance the winner into", next_round))
        })?;
    let target_side = if position % 2 == 0 { Side::A } else { Side::B };
    let third_place = match (link.round, link.team(side.opposite())) {
        (RoundLabel::SemiFinal, Some(loser)) => round_fixtures(&links, RoundLabel::ThirdPlace)
            .next()
            .cloned()
            .map(|l| (l, loser)),
        _ => None,
    };

    let mut journal = Journal::new();
    let written = bind_side(store, &next, target_side, winner_id, &mut journal)
        .and_then(|()| match &third_place {
            Some((third, loser)) => bind_side(store, third, target_side, *loser, &mut journal),
            None => Ok(()),
        })
        .and_then(|()| store.update_match(link.match_id, result));
    if let Err(source) = written {
        return Err(abort("record winner", journal, store, source));
    }

    log::info!(
        "Fixture #{} won by {}; advanced to fixture #{}",
        link.match_order,
        winner_id,
        next.match_order
    );
    Ok(Advancement {
        winner,
        advanced_to: Some(next.id),
        loser_to: third_place.map(|(l, _)| l.id),
    })
}

/// Bind a group's finishers onto the knockout links that name them.
///
/// `ranked` lists team ids best first; the team at index `k` fills every side labelled
/// `"{group} #{k + 1}"`. Each team must have played a fixture of that group. Returns the
/// number of links rewritten.
pub fn advance_group<S: ScheduleStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    group: &str,
    ranked: &[TeamId],
) -> Result<usize, ScheduleError> {
    let links = store.list_schedule_links(tournament_id)?;
    let group_links: Vec<&ScheduleLink> = links
        .iter()
        .filter(|l| l.round == RoundLabel::Group && l.group_name.as_deref() == Some(group))
        .collect();
    if group_links.is_empty() {
        return Err(ScheduleError::PreconditionFailed(format!("No fixtures for {group}")));
    }
    let played: HashSet<TeamId> = group_links
        .iter()
        .flat_map(|l| [l.team_a_id, l.team_b_id])
        .flatten()
        .collect();
    let mut finishers: HashMap<String, Team> = HashMap::new();
    for (index, team_id) in ranked.iter().enumerate() {
        if !played.contains(team_id) {
            return Err(ScheduleError::PreconditionFailed(format!(
                "Team {team_id} has no fixture in {group}"
            )));
        }
        if ranked[..index].contains(team_id) {
            return Err(ScheduleError::PreconditionFailed(format!(
                "Team {team_id} is ranked more than once"
            )));
        }
        finishers.insert(group_seed_label(group, index + 1), store.get_team(*team_id)?);
    }

    let targets: Vec<&ScheduleLink> = links
        .iter()
        .filter(|l| l.round != RoundLabel::Group)
        .filter(|l| finishers.contains_key(&l.slot_a) || finishers.contains_key(&l.slot_b))
        .collect();
    if targets.is_empty() {
        return Err(ScheduleError::PreconditionFailed(format!(
            "No knockout fixture takes finishers of {group}"
        )));
    }

    let mut journal = Journal::new();
    for link in &targets {
        let result = finisher_or_bound(store, link, Side::A, &finishers).and_then(|team_a| {
            let team_b = finisher_or_bound(store, link, Side::B, &finishers)?;
            bind_link(store, link, team_a.as_ref(), team_b.as_ref(), &mut journal)
        });
        if let Err(source) = result {
            return Err(abort("advance group", journal, store, source));
        }
    }
    log::info!(
        "Advanced {} finisher(s) of {} onto {} knockout fixture(s)",
        ranked.len(),
        group,
        targets.len()
    );
    Ok(targets.len())
}

/// The finisher named by a side's label, otherwise whatever is already bound there.
fn finisher_or_bound<S: ScheduleStore + ?Sized>(
    store: &S,
    link: &ScheduleLink,
    side: Side,
    finishers: &HashMap<String, Team>,
) -> Result<Option<Team>, StoreError> {
    if let Some(team) = finishers.get(link.slot(side)) {
        return Ok(Some(team.clone()));
    }
    link.team(side).map(|id| store.get_team(id)).transpose()
}

fn round_fixtures(links: &[ScheduleLink], round: RoundLabel) -> impl Iterator<Item = &ScheduleLink> {
    links.iter().filter(move |l| l.round == round)
}

/// Bind `team_id` to one side of `link`, keeping whatever is bound to the other side.
fn bind_side<S: ScheduleStore + ?Sized>(
    store: &mut S,
    link: &ScheduleLink,
    side: Side,
    team_id: TeamId,
    journal: &mut Journal,
) -> Result<(), StoreError> {
    let team = store.get_team(team_id)?;
    let other = link.team(side.opposite()).map(|id| store.get_team(id)).transpose()?;
    let (team_a, team_b) = match side {
        Side::A => (Some(&team), other.as_ref()),
        Side::B => (other.as_ref(), Some(&team)),
    };
    bind_link(store, link, team_a, team_b, journal)
}
