use league_core::error::ScheduleError;
use league_core::league::{FixtureId, LeagueId, UserId};
use database::StoreError;
use thiserror::Error;

/// Flat error taxonomy of the administrative surface. Every variant is
/// non-retryable as-is: the caller has to correct its input (or, for
/// batch submission, retry only the failed subset). Nothing here ever
/// escalates to a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("at least {required} participants are required, got {actual}")]
    InsufficientParticipants { required: usize, actual: usize },

    #[error("participant {0} appears more than once in the entry list")]
    DuplicateParticipant(UserId),

    #[error("league {0} does not exist")]
    LeagueNotFound(LeagueId),

    #[error("league {0} is full")]
    LeagueFull(LeagueId),

    #[error("user {user_id} is already a member of league {league_id}")]
    DuplicateMember { league_id: LeagueId, user_id: UserId },

    #[error("fixture {0} does not exist")]
    FixtureNotFound(FixtureId),

    #[error("fixture {0} already has a result")]
    ResultAlreadyExists(FixtureId),

    #[error("scores must not be negative, got {0}")]
    InvalidScore(i64),

    #[error("fixture {0} has no completed result yet")]
    FixtureNotCompleted(FixtureId),

    #[error("fixture {0} does not belong to a knockout stage")]
    NotAKnockoutFixture(FixtureId),

    #[error("knockout fixture {0} cannot end in a draw")]
    DrawnKnockoutFixture(FixtureId),
}

impl From<ScheduleError> for ServiceError {
    fn from(error: ScheduleError) -> Self {
        match error {
            ScheduleError::InsufficientParticipants { required, actual } => {
                ServiceError::InsufficientParticipants { required, actual }
            }
            ScheduleError::DuplicateParticipant(user_id) => {
                ServiceError::DuplicateParticipant(user_id)
            }
            ScheduleError::NotAKnockoutFixture(fixture_id) => {
                ServiceError::NotAKnockoutFixture(fixture_id)
            }
            ScheduleError::DrawnKnockoutFixture(fixture_id) => {
                ServiceError::DrawnKnockoutFixture(fixture_id)
            }
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::LeagueNotFound(league_id) => ServiceError::LeagueNotFound(league_id),
            StoreError::LeagueFull(league_id) => ServiceError::LeagueFull(league_id),
            StoreError::DuplicateMember { league_id, user_id } => {
                ServiceError::DuplicateMember { league_id, user_id }
            }
            StoreError::FixtureNotFound(fixture_id) => ServiceError::FixtureNotFound(fixture_id),
            StoreError::ResultAlreadyExists(fixture_id) => {
                ServiceError::ResultAlreadyExists(fixture_id)
            }
            StoreError::Schedule(error) => error.into(),
        }
    }
}
