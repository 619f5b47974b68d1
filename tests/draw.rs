//! Integration tests for the shuffle, the team draw, and roster synchronization.

mod common;

use common::{approved_team, tournament};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use turf_scheduler::{
    generate_schedule, randomize_teams_with, shuffle, shuffle_with, sync_roster, DedupKey,
    InMemoryStore, JoinState, Participant, RosterPlayer, RoundLabel, ScheduleError, ScheduleStore,
    Side, Team, TeamId, TeamStatus, TournamentFormat, BYE_SLOT,
};

#[test]
fn shuffle_is_a_permutation_and_leaves_input_alone() {
    let items: Vec<u32> = (0..20).collect();
    let shuffled = shuffle(&items);
    assert_eq!(items, (0..20).collect::<Vec<u32>>());
    let mut sorted = shuffled.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, items);
}

#[test]
fn shuffle_puts_each_item_first_about_equally_often() {
    let items = ["a", "b", "c", "d"];
    let mut rng = StdRng::seed_from_u64(7);
    let mut first: HashMap<&str, usize> = HashMap::new();
    let trials = 8000;
    for _ in 0..trials {
        *first.entry(shuffle_with(&items, &mut rng)[0]).or_default() += 1;
    }
    for item in items {
        let count = first.get(item).copied().unwrap_or_default();
        assert!((1750..=2250).contains(&count), "{item} first {count} times");
    }
}

#[test]
fn three_teams_on_a_four_seed_bracket_leave_one_slot_open() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 3);
    generate_schedule(&mut store, &t).unwrap();
    let teams: Vec<Team> = ["Lions", "Tigers", "Bears"]
        .iter()
        .map(|name| approved_team(&mut store, &t, name, 2))
        .collect();

    let outcome = randomize_teams_with(&mut store, &t, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(outcome.assignments.len(), 3);
    let labels: Vec<&str> = outcome.assignments.iter().map(|a| a.slot.as_str()).collect();
    assert_eq!(labels, vec!["Team A", "Team B", "Team C"]);
    assert!(outcome.unassigned_teams.is_empty());
    assert_eq!(outcome.bound_links, 2);

    let links = store.list_schedule_links(t.id).unwrap();
    assert_eq!(links.len(), 3);
    let bound_sides = links[..2]
        .iter()
        .flat_map(|l| [l.team_a_id, l.team_b_id])
        .filter(Option::is_some)
        .count();
    assert_eq!(bound_sides, 3);

    let second = &links[1];
    assert_eq!(second.slot_b, "Team D");
    assert_eq!(second.team_b_id, None);
    let team_c = teams
        .iter()
        .find(|t| Some(t.id) == second.team_a_id)
        .unwrap();
    assert_eq!(
        store.get_match(second.match_id).unwrap().title,
        format!("{} vs Team D - Semi-final", team_c.name)
    );

    let last = &links[2];
    assert!(last.is_placeholder());
    assert_eq!(store.get_match(last.match_id).unwrap().title, "TBD vs TBD - Final");
}

#[test]
fn redraw_overwrites_every_previous_binding() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 4);
    generate_schedule(&mut store, &t).unwrap();
    for name in ["Lions", "Tigers", "Bears", "Wolves"] {
        approved_team(&mut store, &t, name, 1);
    }
    let first = randomize_teams_with(&mut store, &t, &mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(first.assignments.len(), 4);

    // Drop the team drawn onto Team D, then draw again with a different generator.
    let mut dropped = store.get_team(first.assignments[3].team_id).unwrap();
    dropped.status = TeamStatus::Rejected;
    store.update_team(&dropped).unwrap();
    let second = randomize_teams_with(&mut store, &t, &mut StdRng::seed_from_u64(12)).unwrap();
    assert_eq!(second.assignments.len(), 3);

    let by_label: HashMap<&str, TeamId> = second
        .assignments
        .iter()
        .map(|a| (a.slot.as_str(), a.team_id))
        .collect();
    for link in store.list_schedule_links(t.id).unwrap() {
        if link.slot_a == "TBD" {
            assert!(link.is_placeholder());
            continue;
        }
        assert_eq!(link.team_a_id, by_label.get(link.slot_a.as_str()).copied());
        assert_eq!(link.team_b_id, by_label.get(link.slot_b.as_str()).copied());
    }
}

#[test]
fn surplus_teams_stay_unassigned() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 4);
    generate_schedule(&mut store, &t).unwrap();
    for name in ["A1", "A2", "A3", "A4", "A5"] {
        approved_team(&mut store, &t, name, 1);
    }
    let outcome = randomize_teams_with(&mut store, &t, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(outcome.assignments.len(), 4);
    assert_eq!(outcome.unassigned_teams.len(), 1);
}

#[test]
fn draw_adds_rosters_to_matches() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 2);
    generate_schedule(&mut store, &t).unwrap();
    approved_team(&mut store, &t, "Lions", 3);
    approved_team(&mut store, &t, "Tigers", 2);

    let outcome = randomize_teams_with(&mut store, &t, &mut StdRng::seed_from_u64(5)).unwrap();
    let link = &store.list_schedule_links(t.id).unwrap()[0];
    let participants = store.list_match_participants(link.match_id).unwrap();
    assert_eq!(participants.len(), 5);
    assert!(participants.iter().all(|p| p.join_state == JoinState::Confirmed));

    let team_a = store.get_team(outcome.assignments[0].team_id).unwrap();
    let on_a = participants.iter().filter(|p| p.side == Side::A).count();
    assert_eq!(on_a, team_a.roster.len());

    // Drawing again does not duplicate anyone already on the match.
    randomize_teams_with(&mut store, &t, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(store.list_match_participants(link.match_id).unwrap().len(), 5);
}

#[test]
fn draw_needs_approved_teams_and_a_schedule() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 4);
    generate_schedule(&mut store, &t).unwrap();
    assert!(matches!(
        randomize_teams_with(&mut store, &t, &mut StdRng::seed_from_u64(0)),
        Err(ScheduleError::PreconditionFailed(_))
    ));

    let other = tournament(TournamentFormat::Knockout, 4);
    approved_team(&mut store, &other, "Lions", 1);
    assert!(matches!(
        randomize_teams_with(&mut store, &other, &mut StdRng::seed_from_u64(0)),
        Err(ScheduleError::PreconditionFailed(_))
    ));
}

#[test]
fn roster_sync_is_idempotent() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 2);
    let link = generate_schedule(&mut store, &t).unwrap().remove(0);
    let team = approved_team(&mut store, &t, "Lions", 4);

    assert_eq!(sync_roster(&mut store, link.match_id, &team, Side::A).unwrap(), 4);
    assert_eq!(sync_roster(&mut store, link.match_id, &team, Side::A).unwrap(), 0);
    assert_eq!(store.list_match_participants(link.match_id).unwrap().len(), 4);
}

#[test]
fn roster_sync_matches_by_account_then_by_name() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::Knockout, 2);
    let link = generate_schedule(&mut store, &t).unwrap().remove(0);
    let account = uuid::Uuid::new_v4();

    let existing = [
        RosterPlayer::new("Sam (old nickname)", Some(account)),
        RosterPlayer::new("alice", None),
    ];
    for player in &existing {
        store
            .upsert_match_participant(link.match_id, Participant::confirmed(player, Side::B))
            .unwrap();
    }

    let team = Team::new(t.id, "Lions").with_roster(vec![
        RosterPlayer::new("Sam", Some(account)),
        RosterPlayer::new("Alice ", None),
        RosterPlayer::new("Bob", None),
    ]);
    assert_eq!(sync_roster(&mut store, link.match_id, &team, Side::A).unwrap(), 1);

    let participants = store.list_match_participants(link.match_id).unwrap();
    assert_eq!(participants.len(), 3);
    let keys: Vec<DedupKey> = participants.iter().map(Participant::dedup_key).collect();
    assert!(keys.contains(&DedupKey::Identified(account)));
    assert!(keys.contains(&DedupKey::Named("bob".to_string())));
}

#[test]
fn group_draw_binds_only_group_seeds() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::GroupKnockout, 8);
    generate_schedule(&mut store, &t).unwrap();
    for i in 0..8 {
        approved_team(&mut store, &t, &format!("Club {i}"), 1);
    }

    let outcome = randomize_teams_with(&mut store, &t, &mut StdRng::seed_from_u64(13)).unwrap();
    assert_eq!(outcome.assignments.len(), 8);
    assert_eq!(outcome.bound_links, 12);

    let links = store.list_schedule_links(t.id).unwrap();
    for link in &links[..12] {
        assert!(link.team_a_id.is_some() && link.team_b_id.is_some());
    }
    assert_eq!(links[12].slot_a, "Group A #1");
    assert_eq!(links[12].slot_b, "Group B #2");
    for link in &links[12..] {
        assert!(link.is_placeholder());
        assert_eq!(
            store.get_match(link.match_id).unwrap().title,
            format!("{} vs {} - {}", link.slot_a, link.slot_b, link.round)
        );
        assert!(store.list_match_participants(link.match_id).unwrap().is_empty());
    }
}

#[test]
fn group_draw_leaves_bye_fixtures_label_only() {
    let mut store = InMemoryStore::new();
    let t = tournament(TournamentFormat::GroupKnockout, 10);
    generate_schedule(&mut store, &t).unwrap();
    for i in 0..10 {
        approved_team(&mut store, &t, &format!("Club {i}"), 1);
    }
    let outcome = randomize_teams_with(&mut store, &t, &mut StdRng::seed_from_u64(14)).unwrap();
    // Three groups of four seeds; Team K and Team L stay open.
    assert_eq!(outcome.assignments.len(), 10);

    let links = store.list_schedule_links(t.id).unwrap();
    let byes: Vec<_> = links.iter().filter(|l| l.slot_b == BYE_SLOT).collect();
    assert_eq!(byes.len(), 2);
    assert!(byes.iter().all(|l| l.is_placeholder()));
    assert!(links
        .iter()
        .filter(|l| l.round != RoundLabel::Group)
        .all(|l| l.is_placeholder()));
}
