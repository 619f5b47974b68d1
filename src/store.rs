//! Persistence seam for schedules: match records, schedule links, teams, and participants.
//!
//! The scheduling logic only talks to [`ScheduleStore`]. [`InMemoryStore`] backs the web
//! binary and the tests; a database-backed store implements the same trait.

use crate::models::{
    DedupKey, LinkId, LinkTeams, MatchId, MatchRecord, MatchUpdate, NewMatch, Participant,
    ScheduleLink, ScheduleSlot, Team, TeamId, TournamentId,
};
use std::collections::HashMap;
use thiserror::Error;

/// Errors reported by a store backend.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: uuid::Uuid },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Record operations the scheduler needs from its backend.
pub trait ScheduleStore {
    fn create_match(&mut self, fields: NewMatch) -> Result<MatchId, StoreError>;
    fn update_match(&mut self, id: MatchId, update: MatchUpdate) -> Result<(), StoreError>;
    fn delete_match(&mut self, id: MatchId) -> Result<(), StoreError>;
    fn get_match(&self, id: MatchId) -> Result<MatchRecord, StoreError>;

    fn create_schedule_link(
        &mut self,
        tournament_id: TournamentId,
        slot: &ScheduleSlot,
        match_id: MatchId,
    ) -> Result<LinkId, StoreError>;
    fn update_schedule_link(&mut self, id: LinkId, teams: LinkTeams) -> Result<(), StoreError>;
    fn delete_schedule_link(&mut self, id: LinkId) -> Result<(), StoreError>;
    fn get_schedule_link(&self, id: LinkId) -> Result<ScheduleLink, StoreError>;
    /// Links of a tournament ordered by `match_order`.
    fn list_schedule_links(&self, tournament_id: TournamentId) -> Result<Vec<ScheduleLink>, StoreError>;

    fn insert_team(&mut self, team: Team) -> Result<TeamId, StoreError>;
    fn update_team(&mut self, team: &Team) -> Result<(), StoreError>;
    fn get_team(&self, id: TeamId) -> Result<Team, StoreError>;
    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError>;

    fn list_approved_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError> {
        Ok(self
            .list_teams(tournament_id)?
            .into_iter()
            .filter(Team::is_approved)
            .collect())
    }

    fn list_match_participants(&self, match_id: MatchId) -> Result<Vec<Participant>, StoreError>;
    /// Insert a participant, or replace the one with the same dedup key.
    fn upsert_match_participant(&mut self, match_id: MatchId, participant: Participant) -> Result<(), StoreError>;
    /// Remove the participant with this dedup key. Removing an absent participant is not an error.
    fn remove_match_participant(&mut self, match_id: MatchId, key: &DedupKey) -> Result<(), StoreError>;
}

/// Store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    matches: HashMap<MatchId, MatchRecord>,
    links: HashMap<LinkId, ScheduleLink>,
    /// Teams in registration order.
    teams: Vec<Team>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Drop every team, link, and match belonging to a tournament.
    pub fn purge_tournament(&mut self, tournament_id: TournamentId) {
        let match_ids: Vec<MatchId> = self
            .links
            .values()
            .filter(|l| l.tournament_id == tournament_id)
            .map(|l| l.match_id)
            .collect();
        for id in match_ids {
            self.matches.remove(&id);
        }
        self.links.retain(|_, l| l.tournament_id != tournament_id);
        self.teams.retain(|t| t.tournament_id != tournament_id);
    }

    fn match_mut(&mut self, id: MatchId) -> Result<&mut MatchRecord, StoreError> {
        self.matches
            .get_mut(&id)
            .ok_or(StoreError::NotFound { kind: "match", id })
    }
}

impl ScheduleStore for InMemoryStore {
    fn create_match(&mut self, fields: NewMatch) -> Result<MatchId, StoreError> {
        let record = MatchRecord::new(fields);
        let id = record.id;
        self.matches.insert(id, record);
        Ok(id)
    }

    fn update_match(&mut self, id: MatchId, update: MatchUpdate) -> Result<(), StoreError> {
        let record = self.match_mut(id)?;
        if let Some(title) = update.title {
            record.title = title;
        }
        if let Some(winner) = update.winner {
            record.winner = Some(winner);
        }
        Ok(())
    }

    fn delete_match(&mut self, id: MatchId) -> Result<(), StoreError> {
        self.matches
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { kind: "match", id })
    }

    fn get_match(&self, id: MatchId) -> Result<MatchRecord, StoreError> {
        self.matches
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: "match", id })
    }

    fn create_schedule_link(
        &mut self,
        tournament_id: TournamentId,
        slot: &ScheduleSlot,
        match_id: MatchId,
    ) -> Result<LinkId, StoreError> {
        if !self.matches.contains_key(&match_id) {
            return Err(StoreError::NotFound { kind: "match", id: match_id });
        }
        let link = ScheduleLink::new(tournament_id, slot, match_id);
        let id = link.id;
        self.links.insert(id, link);
        Ok(id)
    }

    fn update_schedule_link(&mut self, id: LinkId, teams: LinkTeams) -> Result<(), StoreError> {
        let link = self
            .links
            .get_mut(&id)
            .ok_or(StoreError::NotFound { kind: "schedule link", id })?;
        link.team_a_id = teams.team_a_id;
        link.team_b_id = teams.team_b_id;
        Ok(())
    }

    fn delete_schedule_link(&mut self, id: LinkId) -> Result<(), StoreError> {
        self.links
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { kind: "schedule link", id })
    }

    fn get_schedule_link(&self, id: LinkId) -> Result<ScheduleLink, StoreError> {
        self.links
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: "schedule link", id })
    }

    fn list_schedule_links(&self, tournament_id: TournamentId) -> Result<Vec<ScheduleLink>, StoreError> {
        let mut links: Vec<ScheduleLink> = self
            .links
            .values()
            .filter(|l| l.tournament_id == tournament_id)
            .cloned()
            .collect();
        links.sort_by_key(|l| l.match_order);
        Ok(links)
    }

    fn insert_team(&mut self, team: Team) -> Result<TeamId, StoreError> {
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    fn update_team(&mut self, team: &Team) -> Result<(), StoreError> {
        let existing = self
            .teams
            .iter_mut()
            .find(|t| t.id == team.id)
            .ok_or(StoreError::NotFound { kind: "team", id: team.id })?;
        *existing = team.clone();
        Ok(())
    }

    fn get_team(&self, id: TeamId) -> Result<Team, StoreError> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: "team", id })
    }

    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError> {
        Ok(self
            .teams
            .iter()
            .filter(|t| t.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    fn list_match_participants(&self, match_id: MatchId) -> Result<Vec<Participant>, StoreError> {
        self.matches
            .get(&match_id)
            .map(|m| m.participants.clone())
            .ok_or(StoreError::NotFound { kind: "match", id: match_id })
    }

    fn upsert_match_participant(&mut self, match_id: MatchId, participant: Participant) -> Result<(), StoreError> {
        let record = self.match_mut(match_id)?;
        let key: DedupKey = participant.dedup_key();
        match record.participants.iter_mut().find(|p| p.dedup_key() == key) {
            Some(existing) => *existing = participant,
            None => record.participants.push(participant),
        }
        Ok(())
    }

    fn remove_match_participant(&mut self, match_id: MatchId, key: &DedupKey) -> Result<(), StoreError> {
        let record = self.match_mut(match_id)?;
        record.participants.retain(|p| p.dedup_key() != *key);
        Ok(())
    }
}
