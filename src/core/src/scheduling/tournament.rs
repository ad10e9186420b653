use crate::error::ScheduleError;
use crate::league::{
    Fixture, FixtureStage, Gameweek, MatchScore, Participant, PlannedFixture, UserId,
};
use crate::scheduling::round_robin::{ensure_unique, round_count, schedule_rounds};
use itertools::Itertools;
use log::debug;
use serde::Serialize;

/// The knockout skeleton strictly requires a full round of 16.
pub const KNOCKOUT_QUALIFIERS: usize = 16;

/// Generates the UEFA hybrid format: a single round-robin table phase
/// across all participants, followed by the knockout skeleton
/// (round of 16 through final).
///
/// Participants are expected pre-ordered by table-phase rank, best
/// first. The round of 16 pairs rank 1 v 16, 2 v 15, … 8 v 9. Later
/// stages are placeholders: each carries the higher seed of its two
/// feeding fixtures until [`advance_winner`] re-seeds it with the real
/// winner. Every stage occupies the gameweek after the previous one.
pub fn generate_uefa_tournament(
    participants: &[Participant],
    starting_gameweek: Gameweek,
) -> Result<Vec<PlannedFixture>, ScheduleError> {
    if participants.len() < KNOCKOUT_QUALIFIERS {
        return Err(ScheduleError::InsufficientParticipants {
            required: KNOCKOUT_QUALIFIERS,
            actual: participants.len(),
        });
    }

    ensure_unique(participants)?;

    let mut fixtures = schedule_rounds(
        participants,
        starting_gameweek,
        Some(FixtureStage::TablePhase),
    );

    let seeds = &participants[..KNOCKOUT_QUALIFIERS];
    let mut gameweek = starting_gameweek + round_count(participants.len());

    for position in 0..KNOCKOUT_QUALIFIERS / 2 {
        fixtures.push(PlannedFixture {
            home: seeds[position].clone(),
            away: seeds[KNOCKOUT_QUALIFIERS - 1 - position].clone(),
            gameweek,
            stage: Some(FixtureStage::RoundOf16),
        });
    }

    // Placeholder stages. Striding over the top eight seeds pairs each
    // slot with the provisional winner (the higher seed) of the two
    // fixtures that feed it.
    for (stage, stride) in [
        (FixtureStage::QuarterFinal, 1),
        (FixtureStage::SemiFinal, 2),
        (FixtureStage::Final, 4),
    ] {
        gameweek += 1;

        for (home, away) in seeds.iter().take(8).step_by(stride).tuples() {
            fixtures.push(PlannedFixture {
                home: home.clone(),
                away: away.clone(),
                gameweek,
                stage: Some(stage),
            });
        }
    }

    debug!(
        "uefa hybrid: {} participants, {} fixtures, knockout from gameweek {}",
        participants.len(),
        fixtures.len(),
        starting_gameweek + round_count(participants.len())
    );

    Ok(fixtures)
}

/// The slot a knockout winner moves into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketAdvance {
    /// Stage the winner is carried into.
    pub stage: FixtureStage,
    /// Zero-based fixture index within that stage.
    pub slot: usize,
    /// Whether the winner takes the home side of the target fixture.
    pub home_side: bool,
    pub winner: UserId,
    pub winner_team: String,
}

/// Carries the winner of a completed knockout fixture into the
/// placeholder slot of the following stage. `slot` is the fixture's
/// zero-based index within its own stage. Returns `None` for the
/// final: its winner is the champion and has nowhere to advance.
pub fn advance_winner(
    fixture: &Fixture,
    slot: usize,
    score: MatchScore,
) -> Result<Option<BracketAdvance>, ScheduleError> {
    let stage = match fixture.stage {
        Some(stage) if stage.is_knockout() => stage,
        _ => return Err(ScheduleError::NotAKnockoutFixture(fixture.id)),
    };

    if score.is_draw() {
        return Err(ScheduleError::DrawnKnockoutFixture(fixture.id));
    }

    let (winner, winner_team) = if score.home_won() {
        (fixture.home_user_id, fixture.home_team.clone())
    } else {
        (fixture.away_user_id, fixture.away_team.clone())
    };

    Ok(stage.next().map(|next| BracketAdvance {
        stage: next,
        slot: slot / 2,
        home_side: slot % 2 == 0,
        winner,
        winner_team,
    }))
}
