use crate::error::ServiceError;
use league_core::leaderboard::{LeaderboardEntry, LeagueStanding, PlayerGlobalScore};
use league_core::league::{
    Fixture, FixtureId, FixtureResult, FixtureStage, LeagueTier, MatchScore, Participant, UserId,
};
use league_core::scheduling;
use league_core::standings::{StandingsRow, compute_standings};
use database::Store;
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One item of a bulk result submission. Scores arrive as signed
/// integers from the outside world and are validated here.
#[derive(Debug, Clone, Copy)]
pub struct ResultInput {
    pub fixture_id: FixtureId,
    pub home_score: i32,
    pub away_score: i32,
}

#[derive(Debug)]
pub struct BatchItemError {
    pub index: usize,
    pub fixture_id: FixtureId,
    pub error: ServiceError,
}

/// Outcome of a bulk submission. Items are applied independently:
/// a failing item never aborts the valid ones, and the caller retries
/// only the failed subset.
#[derive(Debug)]
pub struct BatchOutcome {
    pub submitted: usize,
    pub errors: Vec<BatchItemError>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Administrative surface over the store and the competition core.
/// Every operation is synchronous; all serialization of concurrent
/// writers lives in the store itself.
pub struct LeagueService {
    store: Arc<Store>,
}

impl LeagueService {
    pub fn new(store: Arc<Store>) -> Self {
        LeagueService { store }
    }

    // ========== FIXTURE GENERATION ==========

    pub fn generate_round_robin_fixtures(
        &self,
        league_id: u32,
    ) -> Result<Vec<Fixture>, ServiceError> {
        let fixtures = self
            .store
            .generate_fixtures(league_id, scheduling::generate_round_robin)?;

        info!(
            "league {}: scheduled {} round-robin fixtures",
            league_id,
            fixtures.len()
        );

        Ok(fixtures)
    }

    pub fn generate_uefa_tournament(&self, league_id: u32) -> Result<Vec<Fixture>, ServiceError> {
        let fixtures = self
            .store
            .generate_fixtures(league_id, scheduling::generate_uefa_tournament)?;

        info!(
            "league {}: scheduled {} tournament fixtures (table phase + knockout skeleton)",
            league_id,
            fixtures.len()
        );

        Ok(fixtures)
    }

    // ========== RESULT SUBMISSION ==========

    pub fn submit_result(
        &self,
        fixture_id: FixtureId,
        home_score: i32,
        away_score: i32,
    ) -> Result<FixtureResult, ServiceError> {
        if home_score < 0 {
            return Err(ServiceError::InvalidScore(home_score as i64));
        }
        if away_score < 0 {
            return Err(ServiceError::InvalidScore(away_score as i64));
        }

        let score = MatchScore::new(home_score as u32, away_score as u32);
        let result = self.store.submit_result(fixture_id, score)?;

        Ok(result)
    }

    pub fn submit_results_batch(&self, inputs: &[ResultInput]) -> BatchOutcome {
        let mut submitted = 0;
        let mut errors = Vec::new();

        for (index, input) in inputs.iter().enumerate() {
            match self.submit_result(input.fixture_id, input.home_score, input.away_score) {
                Ok(_) => submitted += 1,
                Err(error) => {
                    warn!(
                        "batch item {} (fixture {}) rejected: {}",
                        index, input.fixture_id, error
                    );
                    errors.push(BatchItemError {
                        index,
                        fixture_id: input.fixture_id,
                        error,
                    });
                }
            }
        }

        info!(
            "batch submission: {}/{} results accepted",
            submitted,
            inputs.len()
        );

        BatchOutcome { submitted, errors }
    }

    // ========== STANDINGS ==========

    pub fn compute_standings(&self, league_id: u32) -> Result<Vec<StandingsRow>, ServiceError> {
        if self.store.league(league_id).is_none() {
            return Err(ServiceError::LeagueNotFound(league_id));
        }

        let members = self.store.members(league_id);
        let fixtures = Self::table_fixtures(&self.store, league_id);
        let results = self.store.results(league_id);

        Ok(compute_standings(&members, &fixtures, &results))
    }

    /// Fixtures that count towards the table: plain round-robin ones
    /// and the table phase of a tournament. Knockout results never
    /// feed the standings.
    fn table_fixtures(store: &Store, league_id: u32) -> Vec<Fixture> {
        store
            .fixtures(league_id)
            .into_iter()
            .filter(|f| f.stage.is_none_or(|s| s == FixtureStage::TablePhase))
            .collect()
    }

    /// Carries the winner of a completed knockout fixture into the
    /// placeholder slot of the next stage, replacing the provisional
    /// participant. Returns the re-seeded fixture, or `None` when the
    /// completed fixture was the final.
    pub fn advance_winner(&self, fixture_id: FixtureId) -> Result<Option<Fixture>, ServiceError> {
        let fixture = self
            .store
            .fixture(fixture_id)
            .ok_or(ServiceError::FixtureNotFound(fixture_id))?;

        let stage = match fixture.stage {
            Some(stage) if stage.is_knockout() => stage,
            _ => return Err(ServiceError::NotAKnockoutFixture(fixture_id)),
        };

        let result = self
            .store
            .result_for(fixture_id)
            .ok_or(ServiceError::FixtureNotCompleted(fixture_id))?;

        let slot = self
            .store
            .stage_fixtures(fixture.league_id, stage)
            .iter()
            .position(|f| f.id == fixture_id)
            .ok_or(ServiceError::FixtureNotFound(fixture_id))?;

        let Some(advance) = scheduling::advance_winner(&fixture, slot, result.score)? else {
            info!(
                "league {}: {} wins the final",
                fixture.league_id,
                if result.score.home_won() {
                    &fixture.home_team
                } else {
                    &fixture.away_team
                }
            );
            return Ok(None);
        };

        let target = self
            .store
            .stage_fixtures(fixture.league_id, advance.stage)
            .into_iter()
            .nth(advance.slot)
            .ok_or(ServiceError::FixtureNotFound(fixture_id))?;

        let winner = Participant::new(advance.winner, &advance.winner_team);
        let reseeded = self
            .store
            .assign_participant(target.id, advance.home_side, &winner)?;

        info!(
            "league {}: {} advances into {:?} slot {}",
            fixture.league_id, winner.team_name, advance.stage, advance.slot
        );

        Ok(Some(reseeded))
    }

    // ========== GLOBAL LEADERBOARD ==========

    /// Builds the per-user standings snapshot across every league and
    /// delegates ranking to the core aggregator. Tier filtering and
    /// pagination happen after sorting, inside the aggregator.
    pub fn compute_global_leaderboard(
        &self,
        tier: Option<LeagueTier>,
        limit: usize,
        offset: usize,
    ) -> Vec<PlayerGlobalScore> {
        let mut per_user: BTreeMap<UserId, Vec<LeagueStanding>> = BTreeMap::new();

        for league in self.store.leagues() {
            let members = self.store.members(league.id);
            if members.is_empty() {
                continue;
            }

            let fixtures = Self::table_fixtures(&self.store, league.id);
            let results = self.store.results(league.id);
            let rows = compute_standings(&members, &fixtures, &results);

            for (index, row) in rows.iter().enumerate() {
                per_user.entry(row.user_id).or_default().push(LeagueStanding {
                    league_id: league.id,
                    league_name: league.name.clone(),
                    tier: league.tier,
                    size: members.len(),
                    position: index + 1,
                    wins: row.won,
                    played: row.played,
                });
            }
        }

        let entries: Vec<LeaderboardEntry> = per_user
            .into_iter()
            .map(|(user_id, standings)| LeaderboardEntry { user_id, standings })
            .collect();

        league_core::leaderboard::compute_global_leaderboard(&entries, tier, limit, offset)
    }

    /// Simplified score from raw results only, for callers without
    /// standings data. Same output shape as the full aggregation.
    pub fn fallback_score(&self, user_id: UserId) -> PlayerGlobalScore {
        let mut total_wins = 0;
        let mut total_matches = 0;

        for league_id in self.store.leagues_of(user_id) {
            for result in self.store.results(league_id) {
                let (played, won) = if result.home_user_id == user_id {
                    (true, result.score.home_won())
                } else if result.away_user_id == user_id {
                    (true, !result.score.home_won() && !result.score.is_draw())
                } else {
                    (false, false)
                };

                if played {
                    total_matches += 1;
                    if won {
                        total_wins += 1;
                    }
                }
            }
        }

        league_core::leaderboard::compute_fallback_score(user_id, total_wins, total_matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::league::{FixtureStage, FixtureStatus, LeagueMode};
    use database::StoreSeeder;

    fn service_with_league(member_count: u32, mode: LeagueMode) -> (LeagueService, u32) {
        let store = Arc::new(Store::new());
        let league = store.create_league("Test League", LeagueTier::Amateur, mode, 32);

        for user_id in 1..=member_count {
            store
                .add_member(league.id, user_id, &format!("Team {}", user_id))
                .unwrap();
        }

        (LeagueService::new(store), league.id)
    }

    #[test]
    fn test_generate_requires_known_league() {
        let service = LeagueService::new(Arc::new(Store::new()));

        assert_eq!(
            service.generate_round_robin_fixtures(42).unwrap_err(),
            ServiceError::LeagueNotFound(42)
        );
    }

    #[test]
    fn test_generation_errors_are_typed() {
        let (service, league_id) = service_with_league(1, LeagueMode::RoundRobin);

        assert_eq!(
            service.generate_round_robin_fixtures(league_id).unwrap_err(),
            ServiceError::InsufficientParticipants {
                required: 2,
                actual: 1
            }
        );
        assert_eq!(
            service.generate_uefa_tournament(league_id).unwrap_err(),
            ServiceError::InsufficientParticipants {
                required: 16,
                actual: 1
            }
        );
    }

    #[test]
    fn test_negative_scores_are_rejected() {
        let (service, league_id) = service_with_league(2, LeagueMode::RoundRobin);
        let fixtures = service.generate_round_robin_fixtures(league_id).unwrap();

        assert_eq!(
            service.submit_result(fixtures[0].id, -1, 0).unwrap_err(),
            ServiceError::InvalidScore(-1)
        );
        assert_eq!(
            service.submit_result(fixtures[0].id, 0, -3).unwrap_err(),
            ServiceError::InvalidScore(-3)
        );

        // the rejected submissions left no state behind
        let standings = service.compute_standings(league_id).unwrap();
        assert!(standings.iter().all(|row| row.played == 0));
    }

    #[test]
    fn test_batch_tolerates_partial_failure() {
        let (service, league_id) = service_with_league(4, LeagueMode::RoundRobin);
        let fixtures = service.generate_round_robin_fixtures(league_id).unwrap();

        let mut inputs: Vec<ResultInput> = fixtures
            .iter()
            .take(5)
            .map(|f| ResultInput {
                fixture_id: f.id,
                home_score: 1,
                away_score: 0,
            })
            .collect();
        inputs[2].fixture_id = 9999;

        let outcome = service.submit_results_batch(&inputs);

        assert_eq!(outcome.submitted, 4);
        assert_eq!(outcome.errors.len(), 1);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.errors[0].index, 2);
        assert_eq!(outcome.errors[0].fixture_id, 9999);
        assert_eq!(outcome.errors[0].error, ServiceError::FixtureNotFound(9999));

        // the four valid fixtures are completed despite the bad item
        for input in inputs.iter().filter(|i| i.fixture_id != 9999) {
            let fixture = service.store.fixture(input.fixture_id).unwrap();
            assert_eq!(fixture.status, FixtureStatus::Completed);
        }
    }

    #[test]
    fn test_standings_reflect_submitted_results() {
        let (service, league_id) = service_with_league(2, LeagueMode::RoundRobin);
        let fixtures = service.generate_round_robin_fixtures(league_id).unwrap();

        service.submit_result(fixtures[0].id, 3, 1).unwrap();

        let standings = service.compute_standings(league_id).unwrap();
        assert_eq!(standings[0].user_id, fixtures[0].home_user_id);
        assert_eq!(standings[0].points, 3);
        assert_eq!(standings[1].points, 0);
    }

    #[test]
    fn test_advance_winner_reseeds_next_stage() {
        let (service, league_id) = service_with_league(16, LeagueMode::UefaHybrid);
        service.generate_uefa_tournament(league_id).unwrap();

        let round_of_16 = service
            .store
            .stage_fixtures(league_id, FixtureStage::RoundOf16);

        // upset in the second round-of-16 fixture: seed 15 knocks out seed 2
        let upset = &round_of_16[1];
        assert_eq!((upset.home_user_id, upset.away_user_id), (2, 15));
        service.submit_result(upset.id, 0, 1).unwrap();

        let reseeded = service.advance_winner(upset.id).unwrap().unwrap();
        assert_eq!(reseeded.stage, Some(FixtureStage::QuarterFinal));
        assert_eq!(reseeded.away_user_id, 15);

        let quarter_finals = service
            .store
            .stage_fixtures(league_id, FixtureStage::QuarterFinal);
        assert_eq!(quarter_finals[0].home_user_id, 1);
        assert_eq!(quarter_finals[0].away_user_id, 15);
    }

    #[test]
    fn test_advance_winner_guards() {
        let (service, league_id) = service_with_league(16, LeagueMode::UefaHybrid);
        let fixtures = service.generate_uefa_tournament(league_id).unwrap();

        let table_fixture = fixtures
            .iter()
            .find(|f| f.stage == Some(FixtureStage::TablePhase))
            .unwrap();
        assert_eq!(
            service.advance_winner(table_fixture.id).unwrap_err(),
            ServiceError::NotAKnockoutFixture(table_fixture.id)
        );

        let knockout = fixtures
            .iter()
            .find(|f| f.stage == Some(FixtureStage::RoundOf16))
            .unwrap();
        assert_eq!(
            service.advance_winner(knockout.id).unwrap_err(),
            ServiceError::FixtureNotCompleted(knockout.id)
        );

        service.submit_result(knockout.id, 2, 2).unwrap();
        assert_eq!(
            service.advance_winner(knockout.id).unwrap_err(),
            ServiceError::DrawnKnockoutFixture(knockout.id)
        );
    }

    #[test]
    fn test_final_advance_reports_champion() {
        let (service, league_id) = service_with_league(16, LeagueMode::UefaHybrid);
        service.generate_uefa_tournament(league_id).unwrap();

        let the_final = service.store.stage_fixtures(league_id, FixtureStage::Final);
        service.submit_result(the_final[0].id, 2, 0).unwrap();

        assert_eq!(service.advance_winner(the_final[0].id).unwrap(), None);
    }

    #[test]
    fn test_leaderboard_over_seeded_store() {
        let store = Arc::new(Store::new());
        StoreSeeder::seed(&store);
        let service = LeagueService::new(Arc::clone(&store));

        for league in store.leagues() {
            let fixtures = match league.mode {
                LeagueMode::RoundRobin => {
                    service.generate_round_robin_fixtures(league.id).unwrap()
                }
                LeagueMode::UefaHybrid => service.generate_uefa_tournament(league.id).unwrap(),
            };

            // home side always wins 2-1: deterministic, draw-free
            let inputs: Vec<ResultInput> = fixtures
                .iter()
                .filter(|f| f.stage.is_none_or(|s| s == FixtureStage::TablePhase))
                .map(|f| ResultInput {
                    fixture_id: f.id,
                    home_score: 2,
                    away_score: 1,
                })
                .collect();

            let outcome = service.submit_results_batch(&inputs);
            assert!(outcome.is_complete());
        }

        let board = service.compute_global_leaderboard(None, 100, 0);
        assert!(!board.is_empty());

        // descending order, no pagination applied
        for pair in board.windows(2) {
            assert!(pair[0].global_score >= pair[1].global_score);
        }

        // every scored user has a best league to point at
        assert!(board.iter().all(|s| s.best_league.is_some()));

        let filtered =
            service.compute_global_leaderboard(Some(LeagueTier::Competitive), 100, 0);
        assert!(!filtered.is_empty());
        assert!(filtered.len() < board.len());

        let page = service.compute_global_leaderboard(None, 3, 2);
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].user_id, board[2].user_id);
    }

    #[test]
    fn test_fallback_score_counts_raw_results() {
        let (service, league_id) = service_with_league(3, LeagueMode::RoundRobin);
        let fixtures = service.generate_round_robin_fixtures(league_id).unwrap();

        for fixture in &fixtures {
            let (home_score, away_score) = if fixture.home_user_id == 1 {
                (1, 0)
            } else {
                (0, 1)
            };
            service
                .submit_result(fixture.id, home_score, away_score)
                .unwrap();
        }

        // user 1 won both of their matches; one result did not involve them
        let score = service.fallback_score(1);
        assert_eq!(score.total_matches, 2);
        assert_eq!(score.total_wins, 2);
        assert!((score.win_rate - 100.0).abs() < 1e-9);
        assert!(
            (score.global_score - (100.0 * 0.7 + (2.0 / 100.0) * 30.0)).abs() < 1e-9
        );
        assert_eq!(score.best_league, None);
    }
}
