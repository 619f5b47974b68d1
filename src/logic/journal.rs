//! Write journal used to compensate a multi-record operation that fails part way.

use crate::models::{DedupKey, LinkId, LinkTeams, MatchId, MatchUpdate};
use crate::store::{ScheduleStore, StoreError};

/// A store write that has already been applied.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Applied {
    CreatedMatch(MatchId),
    CreatedLink(LinkId),
    /// Link bindings and match title before a rewrite.
    Rebound {
        link_id: LinkId,
        previous: LinkTeams,
        match_id: MatchId,
        previous_title: String,
    },
    AddedParticipant {
        match_id: MatchId,
        key: DedupKey,
    },
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    applied: Vec<Applied>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn created_match(&mut self, id: MatchId) {
        self.applied.push(Applied::CreatedMatch(id));
    }

    pub fn created_link(&mut self, id: LinkId) {
        self.applied.push(Applied::CreatedLink(id));
    }

    pub fn rebound(&mut self, link_id: LinkId, previous: LinkTeams, match_id: MatchId, previous_title: String) {
        self.applied.push(Applied::Rebound {
            link_id,
            previous,
            match_id,
            previous_title,
        });
    }

    pub fn added_participant(&mut self, match_id: MatchId, key: DedupKey) {
        self.applied.push(Applied::AddedParticipant { match_id, key });
    }

    /// Undo every recorded write, newest first. Returns false if any undo step failed;
    /// the remaining steps are still attempted.
    pub fn roll_back<S: ScheduleStore + ?Sized>(self, store: &mut S) -> bool {
        let mut clean = true;
        for applied in self.applied.into_iter().rev() {
            let result: Result<(), StoreError> = match &applied {
                Applied::CreatedMatch(id) => store.delete_match(*id),
                Applied::CreatedLink(id) => store.delete_schedule_link(*id),
                Applied::Rebound {
                    link_id,
                    previous,
                    match_id,
                    previous_title,
                } => store.update_schedule_link(*link_id, *previous).and_then(|()| {
                    store.update_match(
                        *match_id,
                        MatchUpdate {
                            title: Some(previous_title.clone()),
                            winner: None,
                        },
                    )
                }),
                Applied::AddedParticipant { match_id, key } => {
                    store.remove_match_participant(*match_id, key)
                }
            };
            if let Err(e) = result {
                log::warn!("Rollback step {:?} failed: {}", applied, e);
                clean = false;
            }
        }
        clean
    }
}
