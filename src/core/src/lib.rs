pub mod error;
pub mod leaderboard;
pub mod league;
pub mod scheduling;
pub mod standings;

pub use error::ScheduleError;
pub use league::{
    Fixture, FixtureId, FixtureResult, FixtureStage, FixtureStatus, Gameweek, LeagueId,
    LeagueMode, LeagueTier, MatchScore, Participant, PlannedFixture, UserId,
};
pub use leaderboard::{
    BestLeague, LeaderboardEntry, LeagueStanding, PlayerGlobalScore, compute_fallback_score,
    compute_global_leaderboard, compute_global_score,
};
pub use scheduling::{
    BracketAdvance, advance_winner, generate_round_robin, generate_uefa_tournament,
};
pub use standings::{StandingsRow, compute_standings};
