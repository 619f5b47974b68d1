//! Group stage plus knockout schedule generation.
//!
//! Rounding rule: the team count is padded up to the next multiple of the group size, so
//! `groups = ceil(team_count / group_size)` and every group has exactly `group_size` seeds.
//! Padded seeds are byes and stay label-only after the draw.

use crate::logic::knockout::{
    append_knockout_stage, bracket_size, next_match_order, KnockoutOptions, MAX_BRACKET_SIZE,
};
use crate::logic::labels::{group_name, group_seed_label, slot_label};
use crate::models::{GroupStage, RoundLabel, ScheduleError, ScheduleSlot};

/// Label for a knockout seed that is not filled by any group finisher.
pub const BYE_SLOT: &str = "Bye";

/// Largest group a group stage may use.
pub const MAX_GROUP_SIZE: usize = MAX_BRACKET_SIZE;

/// Largest team count any format accepts: a full bracket of group winners from full groups.
pub const MAX_TEAM_COUNT: usize = MAX_BRACKET_SIZE * MAX_GROUP_SIZE;

/// Shape of a group+knockout schedule, before slots are generated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GroupLayout {
    pub groups: usize,
    pub group_size: usize,
    pub advancing: usize,
    /// Seeds in the knockout bracket (advancing teams rounded up to a power of two).
    pub knockout_seeds: usize,
}

impl GroupLayout {
    /// Round-robin fixtures in one group.
    pub fn matches_per_group(&self) -> usize {
        self.group_size * (self.group_size - 1) / 2
    }

    /// Fixtures across the whole schedule.
    pub fn total_matches(&self, options: KnockoutOptions) -> usize {
        let third_place = usize::from(options.third_place && self.knockout_seeds >= 4);
        self.groups * self.matches_per_group() + self.knockout_seeds - 1 + third_place
    }
}

/// Validate the stage configuration and work out group and bracket sizes.
pub fn group_layout(team_count: usize, stage: GroupStage) -> Result<GroupLayout, ScheduleError> {
    if team_count < 2 {
        return Err(ScheduleError::DegenerateInput { team_count });
    }
    if stage.group_size < 2 || stage.group_size > MAX_GROUP_SIZE {
        return Err(ScheduleError::InvalidGroupStage(format!(
            "group size must be between 2 and {} (got {})",
            MAX_GROUP_SIZE, stage.group_size
        )));
    }
    if stage.advancing_per_group == 0 || stage.advancing_per_group > stage.group_size {
        return Err(ScheduleError::InvalidGroupStage(format!(
            "advancing per group must be between 1 and {} (got {})",
            stage.group_size, stage.advancing_per_group
        )));
    }
    let groups = team_count.div_ceil(stage.group_size);
    let advancing = groups
        .checked_mul(stage.advancing_per_group)
        .ok_or(ScheduleError::BracketTooLarge {
            team_count,
            max: MAX_BRACKET_SIZE,
        })?;
    if advancing < 2 {
        return Err(ScheduleError::InvalidGroupStage(
            "at least two teams must advance to the knockout stage".to_string(),
        ));
    }
    let knockout_seeds = bracket_size(advancing)?;
    Ok(GroupLayout {
        groups,
        group_size: stage.group_size,
        advancing,
        knockout_seeds,
    })
}

/// Group fixtures for every group, followed by the knockout stage.
pub fn generate_group_knockout_schedule(
    team_count: usize,
    stage: GroupStage,
) -> Result<Vec<ScheduleSlot>, ScheduleError> {
    generate_group_knockout_schedule_with(team_count, stage, KnockoutOptions::default())
}

pub fn generate_group_knockout_schedule_with(
    team_count: usize,
    stage: GroupStage,
    options: KnockoutOptions,
) -> Result<Vec<ScheduleSlot>, ScheduleError> {
    let layout = group_layout(team_count, stage)?;
    let mut slots = Vec::with_capacity(layout.total_matches(options));

    for g in 0..layout.groups {
        let name = group_name(g);
        let first_seed = g * layout.group_size;
        for i in 0..layout.group_size {
            for j in (i + 1)..layout.group_size {
                let match_order = next_match_order(&slots);
                slots.push(ScheduleSlot {
                    round: RoundLabel::Group,
                    match_order,
                    slot_a: slot_label(first_seed + i),
                    slot_b: slot_label(first_seed + j),
                    group_name: Some(name.clone()),
                });
            }
        }
    }

    append_knockout_stage(&mut slots, cross_seeded_pairs(&layout, stage), options)?;
    Ok(slots)
}

/// Knockout seeds ranked group winners first ("Group A #1", "Group B #1", …, "Group A #2", …),
/// padded with byes, with seed `i` meeting seed `n - 1 - i`.
fn cross_seeded_pairs(layout: &GroupLayout, stage: GroupStage) -> Vec<(String, String)> {
    let mut seeds: Vec<String> = (1..=stage.advancing_per_group)
        .flat_map(|rank| (0..layout.groups).map(move |g| group_seed_label(&group_name(g), rank)))
        .collect();
    seeds.resize(layout.knockout_seeds, BYE_SLOT.to_string());

    let n = seeds.len();
    (0..n / 2)
        .map(|i| (seeds[i].clone(), seeds[n - 1 - i].clone()))
        .collect()
}
