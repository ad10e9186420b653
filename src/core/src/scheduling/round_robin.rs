use crate::error::ScheduleError;
use crate::league::{FixtureStage, Gameweek, Participant, PlannedFixture, UserId};
use log::debug;
use std::collections::HashSet;

pub const MIN_PARTICIPANTS: usize = 2;

/// Generates a single round-robin schedule with the circle method:
/// every participant meets every other participant exactly once, one
/// gameweek per round, starting at `starting_gameweek`.
///
/// The caller obtains `starting_gameweek` from the store so repeated
/// generation appends new rounds instead of renumbering old ones.
pub fn generate_round_robin(
    participants: &[Participant],
    starting_gameweek: Gameweek,
) -> Result<Vec<PlannedFixture>, ScheduleError> {
    if participants.len() < MIN_PARTICIPANTS {
        return Err(ScheduleError::InsufficientParticipants {
            required: MIN_PARTICIPANTS,
            actual: participants.len(),
        });
    }

    ensure_unique(participants)?;

    let fixtures = schedule_rounds(participants, starting_gameweek, None);

    debug!(
        "round-robin: {} participants, {} fixtures from gameweek {}",
        participants.len(),
        fixtures.len(),
        starting_gameweek
    );

    Ok(fixtures)
}

/// Number of rounds the circle method produces: `n - 1` for an even
/// participant count, `n` when a bye slot has to be inserted.
pub(crate) fn round_count(participants: usize) -> Gameweek {
    if participants % 2 == 0 {
        participants as Gameweek - 1
    } else {
        participants as Gameweek
    }
}

pub(crate) fn ensure_unique(participants: &[Participant]) -> Result<(), ScheduleError> {
    let mut seen: HashSet<UserId> = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.user_id) {
            return Err(ScheduleError::DuplicateParticipant(participant.user_id));
        }
    }

    Ok(())
}

/// Circle method core. Position 0 stays fixed while every other
/// position rotates one slot per round; `None` is the bye slot for odd
/// participant counts and its pairings are discarded.
pub(crate) fn schedule_rounds(
    participants: &[Participant],
    starting_gameweek: Gameweek,
    stage: Option<FixtureStage>,
) -> Vec<PlannedFixture> {
    let mut slots: Vec<Option<&Participant>> = participants.iter().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }

    let slot_count = slots.len();
    let mut fixtures = Vec::with_capacity(participants.len() * (participants.len() - 1) / 2);

    for round in 0..slot_count - 1 {
        let gameweek = starting_gameweek + round as Gameweek;

        for position in 0..slot_count / 2 {
            if let (Some(home), Some(away)) = (slots[position], slots[slot_count - 1 - position]) {
                fixtures.push(PlannedFixture {
                    home: home.clone(),
                    away: away.clone(),
                    gameweek,
                    stage,
                });
            }
        }

        let last = slots.pop();
        if let Some(last) = last {
            slots.insert(1, last);
        }
    }

    fixtures
}
