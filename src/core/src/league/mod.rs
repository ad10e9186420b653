use serde::{Deserialize, Serialize};

pub type UserId = u32;
pub type LeagueId = u32;
pub type FixtureId = u32;
pub type Gameweek = u32;

/// One entrant of a league: the owning user plus the team label they
/// registered under. Immutable once scheduling has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub team_name: String,
}

impl Participant {
    pub fn new(user_id: UserId, team_name: &str) -> Self {
        Participant {
            user_id,
            team_name: String::from(team_name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeagueMode {
    RoundRobin,
    UefaHybrid,
}

/// Ordinal competitiveness classification. Only the leaderboard
/// aggregation reads it; fixtures and standings ignore it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeagueTier {
    Amateur,
    Competitive,
    Elite,
    Champions,
}

impl LeagueTier {
    /// Fixed weighting table for cross-league score aggregation.
    /// Not user-configurable.
    pub fn weight(&self) -> f64 {
        match self {
            LeagueTier::Amateur => 1.0,
            LeagueTier::Competitive => 1.3,
            LeagueTier::Elite => 1.6,
            LeagueTier::Champions => 2.0,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1 => Some(LeagueTier::Amateur),
            2 => Some(LeagueTier::Competitive),
            3 => Some(LeagueTier::Elite),
            4 => Some(LeagueTier::Champions),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            LeagueTier::Amateur => 1,
            LeagueTier::Competitive => 2,
            LeagueTier::Elite => 3,
            LeagueTier::Champions => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStage {
    TablePhase,
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl FixtureStage {
    /// The stage a knockout winner moves into. `None` for the final
    /// (the winner is the champion) and for the table phase, which
    /// feeds the bracket via seeding rather than per-fixture advance.
    pub fn next(&self) -> Option<FixtureStage> {
        match self {
            FixtureStage::TablePhase => None,
            FixtureStage::RoundOf16 => Some(FixtureStage::QuarterFinal),
            FixtureStage::QuarterFinal => Some(FixtureStage::SemiFinal),
            FixtureStage::SemiFinal => Some(FixtureStage::Final),
            FixtureStage::Final => None,
        }
    }

    /// Number of fixtures a knockout stage holds, `None` for the table phase.
    pub fn knockout_slots(&self) -> Option<usize> {
        match self {
            FixtureStage::TablePhase => None,
            FixtureStage::RoundOf16 => Some(8),
            FixtureStage::QuarterFinal => Some(4),
            FixtureStage::SemiFinal => Some(2),
            FixtureStage::Final => Some(1),
        }
    }

    pub fn is_knockout(&self) -> bool {
        *self != FixtureStage::TablePhase
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    Scheduled,
    Completed,
}

/// Scheduler output before persistence. The store assigns fixture ids
/// on insert; the scheduler itself stays id-free and pure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFixture {
    pub home: Participant,
    pub away: Participant,
    pub gameweek: Gameweek,
    pub stage: Option<FixtureStage>,
}

/// Persisted fixture row. Created by the scheduler, mutated only by
/// result submission (status) and knockout re-seeding (provisional
/// participants), deleted only by league cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub league_id: LeagueId,
    pub home_user_id: UserId,
    pub away_user_id: UserId,
    pub home_team: String,
    pub away_team: String,
    pub gameweek: Gameweek,
    pub stage: Option<FixtureStage>,
    pub status: FixtureStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub home: u32,
    pub away: u32,
}

impl MatchScore {
    pub fn new(home: u32, away: u32) -> Self {
        MatchScore { home, away }
    }

    pub fn is_draw(&self) -> bool {
        self.home == self.away
    }

    pub fn home_won(&self) -> bool {
        self.home > self.away
    }
}

/// Persisted result row, one-to-one with its fixture. Immutable after
/// creation: there is no amendment path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureResult {
    pub id: u32,
    pub fixture_id: FixtureId,
    pub league_id: LeagueId,
    pub home_user_id: UserId,
    pub away_user_id: UserId,
    pub score: MatchScore,
    pub verified: bool,
}
