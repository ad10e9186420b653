use crate::league::{FixtureId, UserId};
use thiserror::Error;

/// Scheduling and bracket failures. All non-retryable: the caller has
/// to fix its input before calling again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("at least {required} participants are required, got {actual}")]
    InsufficientParticipants { required: usize, actual: usize },

    #[error("participant {0} appears more than once in the entry list")]
    DuplicateParticipant(UserId),

    #[error("fixture {0} does not belong to a knockout stage")]
    NotAKnockoutFixture(FixtureId),

    #[error("knockout fixture {0} cannot end in a draw")]
    DrawnKnockoutFixture(FixtureId),
}
