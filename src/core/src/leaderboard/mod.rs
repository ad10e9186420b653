pub mod aggregator;

pub use aggregator::{
    BestLeague, LeaderboardEntry, LeagueStanding, PlayerGlobalScore, compute_fallback_score,
    compute_global_leaderboard, compute_global_score,
};
