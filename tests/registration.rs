//! Integration tests for team registration, approval, and settings changes.

mod common;

use common::tournament;
use turf_scheduler::{
    add_roster_player, generate_schedule, register_team, set_team_status, update_settings,
    validate_settings, GroupStage, InMemoryStore, RegistrationError, RosterPlayer, ScheduleStore,
    TeamStatus, TournamentFormat, TournamentSettings, MAX_BRACKET_SIZE, MAX_TEAM_COUNT,
};

fn players(names: &[&str]) -> Vec<RosterPlayer> {
    names.iter().map(|n| RosterPlayer::new(*n, None)).collect()
}

#[test]
fn register_trims_name_and_rejects_duplicates() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 4);
    let team = register_team(&mut store, &t, "  Lions ", players(&["Ann"])).unwrap();
    assert_eq!(team.name, "Lions");
    assert_eq!(team.status, TeamStatus::Registered);
    assert_eq!(store.list_teams(t.id).unwrap().len(), 1);

    assert_eq!(
        register_team(&mut store, &t, "LIONS", Vec::new()),
        Err(RegistrationError::DuplicateTeamName)
    );
    assert_eq!(
        register_team(&mut store, &t, "   ", Vec::new()),
        Err(RegistrationError::EmptyName)
    );

    // The same name is free in another tournament.
    let other = tournament(TournamentFormat::Knockout, 4);
    assert!(register_team(&mut store, &other, "Lions", Vec::new()).is_ok());
}

#[test]
fn roster_rejects_the_same_player_twice() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 4);
    assert_eq!(
        register_team(&mut store, &t, "Lions", players(&["Ann", "ann "])),
        Err(RegistrationError::DuplicatePlayer("ann".to_string()))
    );

    let team = register_team(&mut store, &t, "Lions", players(&["Ann"])).unwrap();
    let team = add_roster_player(&mut store, &t, team.id, RosterPlayer::new("Ben", None)).unwrap();
    assert_eq!(team.roster.len(), 2);
    assert!(matches!(
        add_roster_player(&mut store, &t, team.id, RosterPlayer::new("BEN", None)),
        Err(RegistrationError::DuplicatePlayer(_))
    ));
    assert_eq!(store.get_team(team.id).unwrap().roster.len(), 2);
}

#[test]
fn roster_cannot_grow_past_the_maximum() {
    let mut store = InMemoryStore::new();
    let t = turf_scheduler::Tournament::new(
        "Small sides",
        TournamentSettings {
            max_roster: 2,
            ..TournamentSettings::default()
        },
    );
    assert!(matches!(
        register_team(&mut store, &t, "Lions", players(&["A", "B", "C"])),
        Err(RegistrationError::RosterSize { size: 3, max: 2, .. })
    ));
    let team = register_team(&mut store, &t, "Lions", players(&["A", "B"])).unwrap();
    assert!(matches!(
        add_roster_player(&mut store, &t, team.id, RosterPlayer::new("C", None)),
        Err(RegistrationError::RosterSize { size: 3, .. })
    ));
}

#[test]
fn approval_checks_roster_size_and_free_places() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 2);
    let empty = register_team(&mut store, &t, "Empty", Vec::new()).unwrap();
    assert!(matches!(
        set_team_status(&mut store, &t, empty.id, TeamStatus::Approved),
        Err(RegistrationError::RosterSize { size: 0, min: 1, .. })
    ));
    // Other statuses are not gated.
    let pending = set_team_status(&mut store, &t, empty.id, TeamStatus::PaymentPending).unwrap();
    assert_eq!(pending.status, TeamStatus::PaymentPending);

    for name in ["Lions", "Tigers"] {
        let team = register_team(&mut store, &t, name, players(&["Captain"])).unwrap();
        let team = set_team_status(&mut store, &t, team.id, TeamStatus::Approved).unwrap();
        assert!(team.is_approved());
    }
    let late = register_team(&mut store, &t, "Bears", players(&["Captain"])).unwrap();
    assert_eq!(
        set_team_status(&mut store, &t, late.id, TeamStatus::Approved),
        Err(RegistrationError::TournamentFull {
            approved: 2,
            team_count: 2
        })
    );
    assert_eq!(store.list_approved_teams(t.id).unwrap().len(), 2);
}

#[test]
fn teams_of_other_tournaments_are_refused() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 4);
    let other = tournament(TournamentFormat::Knockout, 4);
    let team = register_team(&mut store, &other, "Lions", players(&["Ann"])).unwrap();
    assert_eq!(
        set_team_status(&mut store, &t, team.id, TeamStatus::Approved),
        Err(RegistrationError::WrongTournament)
    );
    assert_eq!(
        add_roster_player(&mut store, &t, team.id, RosterPlayer::new("Ben", None)),
        Err(RegistrationError::WrongTournament)
    );
}

#[test]
fn settings_are_validated() {
    assert!(validate_settings(&TournamentSettings::default()).is_ok());
    let too_few = TournamentSettings {
        team_count: 1,
        ..TournamentSettings::default()
    };
    assert!(matches!(
        validate_settings(&too_few),
        Err(RegistrationError::InvalidSettings(_))
    ));
    let inverted = TournamentSettings {
        min_roster: 5,
        max_roster: 3,
        ..TournamentSettings::default()
    };
    assert!(matches!(
        validate_settings(&inverted),
        Err(RegistrationError::InvalidSettings(_))
    ));
}

#[test]
fn settings_beyond_what_can_be_scheduled_are_refused() {
    let knockout = TournamentSettings {
        team_count: MAX_BRACKET_SIZE + 1,
        ..TournamentSettings::default()
    };
    assert!(matches!(
        validate_settings(&knockout),
        Err(RegistrationError::InvalidSettings(_))
    ));

    // The same count fits a group stage.
    let grouped = TournamentSettings {
        format: TournamentFormat::GroupKnockout,
        ..knockout.clone()
    };
    assert!(validate_settings(&grouped).is_ok());

    for team_count in [MAX_TEAM_COUNT + 1, usize::MAX] {
        let settings = TournamentSettings {
            format: TournamentFormat::League,
            team_count,
            ..TournamentSettings::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(RegistrationError::InvalidSettings(_))
        ));
    }

    let giant_groups = TournamentSettings {
        format: TournamentFormat::GroupKnockout,
        group_stage: GroupStage {
            group_size: 1 << 40,
            advancing_per_group: 2,
        },
        ..TournamentSettings::default()
    };
    assert!(matches!(
        validate_settings(&giant_groups),
        Err(RegistrationError::InvalidSettings(_))
    ));

    let store = InMemoryStore::new();
    let mut t = tournament(TournamentFormat::Knockout, 4);
    assert!(update_settings(&store, &mut t, giant_groups).is_err());
    assert!(update_settings(&store, &mut t, knockout).is_err());
    assert_eq!(t.team_count, 4);
}

#[test]
fn settings_are_frozen_once_a_schedule_exists() {
    let mut store = InMemoryStore::new();
    let mut t = tournament(TournamentFormat::Knockout, 4);
    let wider = TournamentSettings {
        team_count: 8,
        ..t.settings()
    };
    update_settings(&store, &mut t, wider.clone()).unwrap();
    assert_eq!(t.team_count, 8);

    generate_schedule(&mut store, &t).unwrap();
    let narrower = TournamentSettings {
        team_count: 4,
        ..t.settings()
    };
    assert_eq!(
        update_settings(&store, &mut t, narrower),
        Err(RegistrationError::ScheduleExists)
    );
    assert_eq!(t.settings(), wider);
}
