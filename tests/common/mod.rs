//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use turf_scheduler::{
    DedupKey, InMemoryStore, LinkId, LinkTeams, MatchId, MatchRecord, MatchUpdate, NewMatch, Participant,
    RosterPlayer, ScheduleLink, ScheduleSlot, ScheduleStore, StoreError, Team, TeamId, TeamStatus,
    Tournament, TournamentFormat, TournamentId, TournamentSettings,
};

pub fn tournament(format: TournamentFormat, team_count: usize) -> Tournament {
    Tournament::new(
        "Sunday Cup",
        TournamentSettings {
            format,
            team_count,
            ..TournamentSettings::default()
        },
    )
}

/// Insert an approved team with `players` unlinked roster entries.
pub fn approved_team<S: ScheduleStore>(store: &mut S, tournament: &Tournament, name: &str, players: usize) -> Team {
    let roster = (0..players)
        .map(|i| RosterPlayer::new(format!("{name} P{i}"), None))
        .collect();
    let mut team = Team::new(tournament.id, name).with_roster(roster);
    team.status = TeamStatus::Approved;
    store.insert_team(team.clone()).unwrap();
    team
}

/// In-memory store that fails one chosen write call.
#[derive(Default)]
pub struct FailingStore {
    pub inner: InMemoryStore,
    writes: usize,
    fail_at: Option<usize>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th write from now fail (1 = the next write). Later writes succeed.
    pub fn fail_nth_write(&mut self, n: usize) {
        self.fail_at = Some(self.writes + n);
    }

    fn write(&mut self) -> Result<(), StoreError> {
        self.writes += 1;
        if self.fail_at == Some(self.writes) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

impl ScheduleStore for FailingStore {
    fn create_match(&mut self, fields: NewMatch) -> Result<MatchId, StoreError> {
        self.write()?;
        self.inner.create_match(fields)
    }

    fn update_match(&mut self, id: MatchId, update: MatchUpdate) -> Result<(), StoreError> {
        self.write()?;
        self.inner.update_match(id, update)
    }

    fn delete_match(&mut self, id: MatchId) -> Result<(), StoreError> {
        self.write()?;
        self.inner.delete_match(id)
    }

    fn get_match(&self, id: MatchId) -> Result<MatchRecord, StoreError> {
        self.inner.get_match(id)
    }

    fn create_schedule_link(
        &mut self,
        tournament_id: TournamentId,
        slot: &ScheduleSlot,
        match_id: MatchId,
    ) -> Result<LinkId, StoreError> {
        self.write()?;
        self.inner.create_schedule_link(tournament_id, slot, match_id)
    }

    fn update_schedule_link(&mut self, id: LinkId, teams: LinkTeams) -> Result<(), StoreError> {
        self.write()?;
        self.inner.update_schedule_link(id, teams)
    }

    fn delete_schedule_link(&mut self, id: LinkId) -> Result<(), StoreError> {
        self.write()?;
        self.inner.delete_schedule_link(id)
    }

    fn get_schedule_link(&self, id: LinkId) -> Result<ScheduleLink, StoreError> {
        self.inner.get_schedule_link(id)
    }

    fn list_schedule_links(&self, tournament_id: TournamentId) -> Result<Vec<ScheduleLink>, StoreError> {
        self.inner.list_schedule_links(tournament_id)
    }

    fn insert_team(&mut self, team: Team) -> Result<TeamId, StoreError> {
        self.write()?;
        self.inner.insert_team(team)
    }

    fn update_team(&mut self, team: &Team) -> Result<(), StoreError> {
        self.write()?;
        self.inner.update_team(team)
    }

    fn get_team(&self, id: TeamId) -> Result<Team, StoreError> {
        self.inner.get_team(id)
    }

    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError> {
        self.inner.list_teams(tournament_id)
    }

    fn list_match_participants(&self, match_id: MatchId) -> Result<Vec<Participant>, StoreError> {
        self.inner.list_match_participants(match_id)
    }

    fn upsert_match_participant(&mut self, match_id: MatchId, participant: Participant) -> Result<(), StoreError> {
        self.write()?;
        self.inner.upsert_match_participant(match_id, participant)
    }

    fn remove_match_participant(&mut self, match_id: MatchId, key: &DedupKey) -> Result<(), StoreError> {
        self.write()?;
        self.inner.remove_match_participant(match_id, key)
    }
}
