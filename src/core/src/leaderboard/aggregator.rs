use crate::league::{LeagueId, LeagueTier, UserId};
use itertools::Itertools;
use serde::Serialize;

const SIZE_BONUS_SCALE: f64 = 20.0;
const CONSISTENCY_BONUS: f64 = 10.0;
const FALLBACK_WIN_RATE_WEIGHT: f64 = 0.7;
const FALLBACK_VOLUME_SCALE: f64 = 30.0;

/// One user's position in one league, as a snapshot explicitly passed
/// in by the caller. The aggregator never reaches into shared state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueStanding {
    pub league_id: LeagueId,
    pub league_name: String,
    pub tier: LeagueTier,
    /// Participant count of the league.
    pub size: usize,
    /// 1-based table position, 1 = best.
    pub position: usize,
    pub wins: u32,
    pub played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestLeague {
    pub league_id: LeagueId,
    pub league_name: String,
    pub tier: LeagueTier,
    pub position: usize,
    pub size: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerGlobalScore {
    pub user_id: UserId,
    pub global_score: f64,
    pub best_league: Option<BestLeague>,
    pub total_wins: u32,
    pub total_matches: u32,
    pub win_rate: f64,
}

/// Everything the global leaderboard needs for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub standings: Vec<LeagueStanding>,
}

fn league_score(standing: &LeagueStanding, league_count: usize) -> f64 {
    let size = standing.size as f64;
    let position_score = (size - standing.position as f64 + 1.0) / size * 100.0;
    let size_bonus = (size + 1.0).ln() / 100f64.ln() * SIZE_BONUS_SCALE;
    let consistency_bonus = if league_count > 1 {
        CONSISTENCY_BONUS
    } else {
        0.0
    };

    position_score * standing.tier.weight() + size_bonus + consistency_bonus
}

fn win_rate(total_wins: u32, total_matches: u32) -> f64 {
    if total_matches == 0 {
        0.0
    } else {
        total_wins as f64 / total_matches as f64 * 100.0
    }
}

/// Aggregates one user's per-league standings into a global score:
/// the mean of the tier-weighted league scores. A user present in no
/// leagues gets an explicit zero score with no best league.
pub fn compute_global_score(user_id: UserId, standings: &[LeagueStanding]) -> PlayerGlobalScore {
    let total_wins: u32 = standings.iter().map(|s| s.wins).sum();
    let total_matches: u32 = standings.iter().map(|s| s.played).sum();

    if standings.is_empty() {
        return PlayerGlobalScore {
            user_id,
            global_score: 0.0,
            best_league: None,
            total_wins,
            total_matches,
            win_rate: 0.0,
        };
    }

    let scores: Vec<f64> = standings
        .iter()
        .map(|s| league_score(s, standings.len()))
        .collect();

    let global_score = scores.iter().sum::<f64>() / scores.len() as f64;

    // best league by weighted score, not by raw position
    let best_league = standings
        .iter()
        .zip(&scores)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(standing, &score)| BestLeague {
            league_id: standing.league_id,
            league_name: standing.league_name.clone(),
            tier: standing.tier,
            position: standing.position,
            size: standing.size,
            score,
        });

    PlayerGlobalScore {
        user_id,
        global_score,
        best_league,
        total_wins,
        total_matches,
        win_rate: win_rate(total_wins, total_matches),
    }
}

/// Simplified score for when per-league position data is unavailable.
/// Produces the same output shape as [`compute_global_score`] so
/// callers never branch on which formula was used.
pub fn compute_fallback_score(
    user_id: UserId,
    total_wins: u32,
    total_matches: u32,
) -> PlayerGlobalScore {
    let rate = win_rate(total_wins, total_matches);
    let volume = (total_matches as f64 / 100.0).min(1.0);

    PlayerGlobalScore {
        user_id,
        global_score: rate * FALLBACK_WIN_RATE_WEIGHT + volume * FALLBACK_VOLUME_SCALE,
        best_league: None,
        total_wins,
        total_matches,
        win_rate: rate,
    }
}

/// Ranks every user by global score, then applies the tier filter and
/// pagination. Filtering happens after sorting: restricting the input
/// first would recompute ranks against a narrowed field and corrupt
/// the cross-league semantics.
pub fn compute_global_leaderboard(
    entries: &[LeaderboardEntry],
    tier: Option<LeagueTier>,
    limit: usize,
    offset: usize,
) -> Vec<PlayerGlobalScore> {
    entries
        .iter()
        .map(|entry| {
            (
                compute_global_score(entry.user_id, &entry.standings),
                entry,
            )
        })
        .sorted_by(|a, b| b.0.global_score.total_cmp(&a.0.global_score))
        .filter(|(_, entry)| match tier {
            Some(tier) => entry.standings.iter().any(|s| s.tier == tier),
            None => true,
        })
        .skip(offset)
        .take(limit)
        .map(|(score, _)| score)
        .collect()
}
