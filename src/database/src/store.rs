use chrono::{NaiveDateTime, Utc};
use league_core::error::ScheduleError;
use league_core::league::{
    Fixture, FixtureId, FixtureResult, FixtureStage, FixtureStatus, Gameweek, LeagueId,
    LeagueMode, LeagueTier, MatchScore, Participant, PlannedFixture, UserId,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
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

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRow {
    pub id: LeagueId,
    pub name: String,
    pub tier: LeagueTier,
    pub mode: LeagueMode,
    pub max_participants: usize,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueMemberRow {
    pub league_id: LeagueId,
    pub user_id: UserId,
    pub team_name: String,
    pub joined_at: NaiveDateTime,
}

#[derive(Debug, Default)]
struct StoreInner {
    leagues: BTreeMap<LeagueId, LeagueRow>,
    members: Vec<LeagueMemberRow>,
    fixtures: BTreeMap<FixtureId, Fixture>,
    results: HashMap<FixtureId, FixtureResult>,
    next_league_id: LeagueId,
    next_fixture_id: FixtureId,
    next_result_id: u32,
}

/// In-memory persistence collaborator holding the four tables the
/// competition core reads and writes. A single `RwLock` keeps every
/// read-compute-insert sequence single-writer, which is what makes
/// fixture generation and result submission safe under concurrent
/// administrators.
#[derive(Debug, Default)]
pub struct Store {
    inner: RwLock<StoreInner>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().expect("store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().expect("store lock poisoned")
    }

    // ========== LEAGUES ==========

    pub fn create_league(
        &self,
        name: &str,
        tier: LeagueTier,
        mode: LeagueMode,
        max_participants: usize,
    ) -> LeagueRow {
        let mut inner = self.write();

        inner.next_league_id += 1;
        let row = LeagueRow {
            id: inner.next_league_id,
            name: String::from(name),
            tier,
            mode,
            max_participants,
            created_at: Utc::now().naive_utc(),
        };

        inner.leagues.insert(row.id, row.clone());
        row
    }

    pub fn league(&self, league_id: LeagueId) -> Option<LeagueRow> {
        self.read().leagues.get(&league_id).cloned()
    }

    pub fn leagues(&self) -> Vec<LeagueRow> {
        self.read().leagues.values().cloned().collect()
    }

    /// Removes a league and cascades to its members, fixtures and
    /// results. The only path that ever deletes fixtures.
    pub fn delete_league(&self, league_id: LeagueId) -> Result<(), StoreError> {
        let mut inner = self.write();

        if inner.leagues.remove(&league_id).is_none() {
            return Err(StoreError::LeagueNotFound(league_id));
        }

        inner.members.retain(|m| m.league_id != league_id);

        let fixture_ids: Vec<FixtureId> = inner
            .fixtures
            .values()
            .filter(|f| f.league_id == league_id)
            .map(|f| f.id)
            .collect();

        for fixture_id in fixture_ids {
            inner.fixtures.remove(&fixture_id);
            inner.results.remove(&fixture_id);
        }

        debug!("league {} deleted with cascade", league_id);
        Ok(())
    }

    // ========== MEMBERS ==========

    pub fn add_member(
        &self,
        league_id: LeagueId,
        user_id: UserId,
        team_name: &str,
    ) -> Result<LeagueMemberRow, StoreError> {
        let mut inner = self.write();

        let max_participants = inner
            .leagues
            .get(&league_id)
            .ok_or(StoreError::LeagueNotFound(league_id))?
            .max_participants;

        let current: Vec<&LeagueMemberRow> = inner
            .members
            .iter()
            .filter(|m| m.league_id == league_id)
            .collect();

        if current.iter().any(|m| m.user_id == user_id) {
            return Err(StoreError::DuplicateMember { league_id, user_id });
        }
        if current.len() >= max_participants {
            return Err(StoreError::LeagueFull(league_id));
        }

        let row = LeagueMemberRow {
            league_id,
            user_id,
            team_name: String::from(team_name),
            joined_at: Utc::now().naive_utc(),
        };

        inner.members.push(row.clone());
        Ok(row)
    }

    /// Members as scheduler participants, in join order.
    pub fn members(&self, league_id: LeagueId) -> Vec<Participant> {
        self.read()
            .members
            .iter()
            .filter(|m| m.league_id == league_id)
            .map(|m| Participant::new(m.user_id, &m.team_name))
            .collect()
    }

    pub fn leagues_of(&self, user_id: UserId) -> Vec<LeagueId> {
        self.read()
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.league_id)
            .collect()
    }

    // ========== FIXTURES ==========

    /// Runs `schedule` with the league's members and the next free
    /// gameweek, then persists the planned fixtures, all under one
    /// write lock. Keeping "read max gameweek, then insert" inside a
    /// single writer is what makes repeated or concurrent generation
    /// append rounds instead of colliding with existing numbering.
    pub fn generate_fixtures(
        &self,
        league_id: LeagueId,
        schedule: impl FnOnce(&[Participant], Gameweek) -> Result<Vec<PlannedFixture>, ScheduleError>,
    ) -> Result<Vec<Fixture>, StoreError> {
        let mut inner = self.write();

        if !inner.leagues.contains_key(&league_id) {
            return Err(StoreError::LeagueNotFound(league_id));
        }

        let participants: Vec<Participant> = inner
            .members
            .iter()
            .filter(|m| m.league_id == league_id)
            .map(|m| Participant::new(m.user_id, &m.team_name))
            .collect();

        let next_gameweek = inner
            .fixtures
            .values()
            .filter(|f| f.league_id == league_id && f.status != FixtureStatus::Completed)
            .map(|f| f.gameweek)
            .max()
            .map_or(1, |max| max + 1);

        let planned = schedule(&participants, next_gameweek)?;

        let mut inserted = Vec::with_capacity(planned.len());
        for plan in planned {
            inner.next_fixture_id += 1;
            let fixture = Fixture {
                id: inner.next_fixture_id,
                league_id,
                home_user_id: plan.home.user_id,
                away_user_id: plan.away.user_id,
                home_team: plan.home.team_name,
                away_team: plan.away.team_name,
                gameweek: plan.gameweek,
                stage: plan.stage,
                status: FixtureStatus::Scheduled,
            };
            inner.fixtures.insert(fixture.id, fixture.clone());
            inserted.push(fixture);
        }

        debug!(
            "league {}: inserted {} fixtures from gameweek {}",
            league_id,
            inserted.len(),
            next_gameweek
        );

        Ok(inserted)
    }

    pub fn fixture(&self, fixture_id: FixtureId) -> Option<Fixture> {
        self.read().fixtures.get(&fixture_id).cloned()
    }

    /// All fixtures of a league, ordered by id (insertion order).
    pub fn fixtures(&self, league_id: LeagueId) -> Vec<Fixture> {
        self.read()
            .fixtures
            .values()
            .filter(|f| f.league_id == league_id)
            .cloned()
            .collect()
    }

    /// Fixtures of one stage, ordered by id. The position of a fixture
    /// in this list is its bracket slot.
    pub fn stage_fixtures(&self, league_id: LeagueId, stage: FixtureStage) -> Vec<Fixture> {
        self.read()
            .fixtures
            .values()
            .filter(|f| f.league_id == league_id && f.stage == Some(stage))
            .cloned()
            .collect()
    }

    /// Rewrites one provisional side of a scheduled knockout fixture
    /// when a winner advances from the previous stage.
    pub fn assign_participant(
        &self,
        fixture_id: FixtureId,
        home_side: bool,
        participant: &Participant,
    ) -> Result<Fixture, StoreError> {
        let mut inner = self.write();

        let fixture = inner
            .fixtures
            .get_mut(&fixture_id)
            .ok_or(StoreError::FixtureNotFound(fixture_id))?;

        if home_side {
            fixture.home_user_id = participant.user_id;
            fixture.home_team = participant.team_name.clone();
        } else {
            fixture.away_user_id = participant.user_id;
            fixture.away_team = participant.team_name.clone();
        }

        Ok(fixture.clone())
    }

    // ========== RESULTS ==========

    /// Inserts the result row and flips the fixture to completed as
    /// one atomic step: no observer can see a result without its
    /// status transition or the other way around.
    pub fn submit_result(
        &self,
        fixture_id: FixtureId,
        score: MatchScore,
    ) -> Result<FixtureResult, StoreError> {
        let mut inner = self.write();

        if inner.results.contains_key(&fixture_id) {
            return Err(StoreError::ResultAlreadyExists(fixture_id));
        }

        let fixture = inner
            .fixtures
            .get(&fixture_id)
            .ok_or(StoreError::FixtureNotFound(fixture_id))?;
        if fixture.status == FixtureStatus::Completed {
            return Err(StoreError::ResultAlreadyExists(fixture_id));
        }

        let (league_id, home_user_id, away_user_id) =
            (fixture.league_id, fixture.home_user_id, fixture.away_user_id);

        inner.next_result_id += 1;
        let result = FixtureResult {
            id: inner.next_result_id,
            fixture_id,
            league_id,
            home_user_id,
            away_user_id,
            score,
            verified: false,
        };

        inner.results.insert(fixture_id, result.clone());
        if let Some(fixture) = inner.fixtures.get_mut(&fixture_id) {
            fixture.status = FixtureStatus::Completed;
        }

        Ok(result)
    }

    pub fn result_for(&self, fixture_id: FixtureId) -> Option<FixtureResult> {
        self.read().results.get(&fixture_id).cloned()
    }

    pub fn results(&self, league_id: LeagueId) -> Vec<FixtureResult> {
        let mut results: Vec<FixtureResult> = self
            .read()
            .results
            .values()
            .filter(|r| r.league_id == league_id)
            .cloned()
            .collect();

        results.sort_by_key(|r| r.id);
        results
    }
}
