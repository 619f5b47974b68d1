//! Copy a team's roster onto a match's participant list.

use crate::logic::journal::Journal;
use crate::models::{DedupKey, MatchId, Participant, Side, Team};
use crate::store::{ScheduleStore, StoreError};
use std::collections::HashSet;

/// Add every roster player of `team` to the match on `side`, skipping anyone already
/// present (same linked account, or same name when unlinked). Safe to repeat.
///
/// Returns the number of participants inserted.
pub fn sync_roster<S: ScheduleStore + ?Sized>(
    store: &mut S,
    match_id: MatchId,
    team: &Team,
    side: Side,
) -> Result<usize, StoreError> {
    sync_roster_journaled(store, match_id, team, side, &mut Journal::new())
}

/// [`sync_roster`] recording each insert so a failed operation can remove it again.
pub(crate) fn sync_roster_journaled<S: ScheduleStore + ?Sized>(
    store: &mut S,
    match_id: MatchId,
    team: &Team,
    side: Side,
    journal: &mut Journal,
) -> Result<usize, StoreError> {
    let mut present: HashSet<DedupKey> = store
        .list_match_participants(match_id)?
        .iter()
        .map(Participant::dedup_key)
        .collect();

    let mut inserted = 0;
    for player in &team.roster {
        let key = DedupKey::for_player(player);
        if present.contains(&key) {
            continue;
        }
        store.upsert_match_participant(match_id, Participant::confirmed(player, side))?;
        journal.added_participant(match_id, key.clone());
        present.insert(key);
        inserted += 1;
    }
    if inserted > 0 {
        log::debug!("Added {} player(s) of {} to match {}", inserted, team.name, match_id);
    }
    Ok(inserted)
}
