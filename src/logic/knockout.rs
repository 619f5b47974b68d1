//! Single-elimination schedule generation.
//!
//! The first round pairs seed labels; every later round is placeholder-only (`TBD` vs `TBD`).
//! Which earlier fixtures feed a later one follows from round and position: the `p`-th
//! fixture of a round is fed by fixtures `2p` and `2p + 1` of the round before it.

use crate::logic::labels::slot_label;
use crate::models::{RoundLabel, ScheduleError, ScheduleSlot, PLACEHOLDER_SLOT};

/// Largest bracket the round table can label (round of 64).
pub const MAX_BRACKET_SIZE: usize = 1 << RoundLabel::max_knockout_rounds();

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KnockoutOptions {
    /// Add a third-place fixture between the semi-finals and the final.
    pub third_place: bool,
}

/// Smallest supported bracket holding `team_count` teams. Unused seeds are byes.
pub fn bracket_size(team_count: usize) -> Result<usize, ScheduleError> {
    if team_count < 2 {
        return Err(ScheduleError::DegenerateInput { team_count });
    }
    if team_count > MAX_BRACKET_SIZE {
        return Err(ScheduleError::BracketTooLarge {
            team_count,
            max: MAX_BRACKET_SIZE,
        });
    }
    Ok(team_count.next_power_of_two())
}

/// Number of fixtures a knockout stage for `team_count` teams produces.
pub fn knockout_match_count(team_count: usize, options: KnockoutOptions) -> Result<usize, ScheduleError> {
    let size = bracket_size(team_count)?;
    let third_place = usize::from(options.third_place && size >= 4);
    Ok(size - 1 + third_place)
}

/// Knockout schedule for `team_count` teams without a third-place fixture.
pub fn generate_knockout_schedule(team_count: usize) -> Result<Vec<ScheduleSlot>, ScheduleError> {
    generate_knockout_schedule_with(team_count, KnockoutOptions::default())
}

/// Knockout schedule for `team_count` teams. Round one pairs (A, B), (C, D), …
pub fn generate_knockout_schedule_with(
    team_count: usize,
    options: KnockoutOptions,
) -> Result<Vec<ScheduleSlot>, ScheduleError> {
    let size = bracket_size(team_count)?;
    let first_round = (0..size)
        .step_by(2)
        .map(|i| (slot_label(i), slot_label(i + 1)))
        .collect();
    let mut slots = Vec::with_capacity(size);
    append_knockout_stage(&mut slots, first_round, options)?;
    Ok(slots)
}

/// Append a knockout stage to `slots`, continuing its `match_order` sequence.
/// `first_round` must hold a power-of-two number of pairings.
pub(crate) fn append_knockout_stage(
    slots: &mut Vec<ScheduleSlot>,
    first_round: Vec<(String, String)>,
    options: KnockoutOptions,
) -> Result<(), ScheduleError> {
    let seeds = first_round.len() * 2;
    if !seeds.is_power_of_two() || seeds > MAX_BRACKET_SIZE {
        return Err(ScheduleError::BracketTooLarge {
            team_count: seeds,
            max: MAX_BRACKET_SIZE,
        });
    }
    let rounds = seeds.trailing_zeros() as usize;
    let mut next_order = next_match_order(slots);
    let mut first_round = first_round.into_iter();

    for distance in (0..rounds).rev() {
        let round = RoundLabel::from_distance(distance).ok_or(ScheduleError::BracketTooLarge {
            team_count: seeds,
            max: MAX_BRACKET_SIZE,
        })?;
        let opening = distance == rounds - 1;
        for _ in 0..(1usize << distance) {
            let (slot_a, slot_b) = match first_round.next() {
                Some(pair) if opening => pair,
                _ => placeholder_pair(),
            };
            slots.push(ScheduleSlot {
                round,
                match_order: next_order,
                slot_a,
                slot_b,
                group_name: None,
            });
            next_order += 1;
        }
        if round == RoundLabel::SemiFinal && options.third_place {
            let (slot_a, slot_b) = placeholder_pair();
            slots.push(ScheduleSlot {
                round: RoundLabel::ThirdPlace,
                match_order: next_order,
                slot_a,
                slot_b,
                group_name: None,
            });
            next_order += 1;
        }
    }
    Ok(())
}

pub(crate) fn next_match_order(slots: &[ScheduleSlot]) -> u32 {
    slots.last().map_or(1, |s| s.match_order + 1)
}

fn placeholder_pair() -> (String, String) {
    (PLACEHOLDER_SLOT.to_string(), PLACEHOLDER_SLOT.to_string())
}
