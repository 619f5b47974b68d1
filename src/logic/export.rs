//! Flat view of a schedule for display and CSV export.

use crate::models::{LinkId, MatchId, RoundLabel, TeamId, TournamentId};
use crate::store::{ScheduleStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;

/// CSV header, in `FixtureRow` field order.
const CSV_COLUMNS: [&str; 10] = [
    "match_order",
    "round",
    "group",
    "slot_a",
    "slot_b",
    "team_a",
    "team_b",
    "title",
    "match_id",
    "link_id",
];

/// One fixture with team names resolved.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FixtureRow {
    pub match_order: u32,
    pub round: RoundLabel,
    pub group: Option<String>,
    pub slot_a: String,
    pub slot_b: String,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub title: String,
    pub match_id: MatchId,
    pub link_id: LinkId,
}

/// Fixtures of a tournament in `match_order`. A link whose match record is gone is listed
/// with a title built from its slots.
pub fn schedule_rows<S: ScheduleStore + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<Vec<FixtureRow>, StoreError> {
    let names: HashMap<TeamId, String> = store
        .list_teams(tournament_id)?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();
    let name_of = |id: Option<TeamId>| id.and_then(|id| names.get(&id).cloned());

    store
        .list_schedule_links(tournament_id)?
        .into_iter()
        .map(|link| {
            let team_a = name_of(link.team_a_id);
            let team_b = name_of(link.team_b_id);
            let title = match store.get_match(link.match_id) {
                Ok(record) => record.title,
                Err(StoreError::NotFound { .. }) => {
                    log::warn!("Fixture #{} has no match record {}", link.match_order, link.match_id);
                    link.display_name(team_a.as_deref(), team_b.as_deref())
                }
                Err(e) => return Err(e),
            };
            Ok(FixtureRow {
                match_order: link.match_order,
                round: link.round,
                team_a,
                team_b,
                group: link.group_name,
                slot_a: link.slot_a,
                slot_b: link.slot_b,
                title,
                match_id: link.match_id,
                link_id: link.id,
            })
        })
        .collect()
}

/// Write fixtures as CSV with a header row.
pub fn write_schedule_csv<W: Write>(rows: &[FixtureRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    // Serialized rows bring their own header.
    if rows.is_empty() {
        wtr.write_record(CSV_COLUMNS)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
