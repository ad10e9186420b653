use league_core::league::{FixtureStage, LeagueMode};
use database::{Store, StoreSeeder};
use env_logger::Env;
use log::info;
use rand::{Rng, RngExt};
use service::{LeagueService, ResultInput};
use std::sync::Arc;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let store = Arc::new(Store::new());
    StoreSeeder::seed(&store);

    let service = LeagueService::new(Arc::clone(&store));
    let mut rng = rand::rng();

    for league in store.leagues() {
        info!("=== {} ({:?}, {:?}) ===", league.name, league.tier, league.mode);

        let fixtures = match league.mode {
            LeagueMode::RoundRobin => service.generate_round_robin_fixtures(league.id)?,
            LeagueMode::UefaHybrid => service.generate_uefa_tournament(league.id)?,
        };

        // play everything that is not part of the knockout bracket
        let inputs: Vec<ResultInput> = fixtures
            .iter()
            .filter(|f| f.stage.is_none_or(|s| s == FixtureStage::TablePhase))
            .map(|f| ResultInput {
                fixture_id: f.id,
                home_score: rng.random_range(0..5),
                away_score: rng.random_range(0..5),
            })
            .collect();

        let outcome = service.submit_results_batch(&inputs);
        info!(
            "{}: {} results in, {} rejected",
            league.name,
            outcome.submitted,
            outcome.errors.len()
        );

        for (position, row) in service.compute_standings(league.id)?.iter().enumerate() {
            info!(
                "{:>2}. {:<24} {:>2} {:>2} {:>2} {:>2} {:>3}:{:<3} {:>3}",
                position + 1,
                row.team_name,
                row.played,
                row.won,
                row.drawn,
                row.lost,
                row.goals_for,
                row.goals_against,
                row.points
            );
        }

        if league.mode == LeagueMode::UefaHybrid {
            play_knockout(&service, &store, league.id, &mut rng)?;
        }
    }

    info!("=== Global leaderboard ===");
    for (rank, entry) in service
        .compute_global_leaderboard(None, 10, 0)
        .iter()
        .enumerate()
    {
        let best = entry
            .best_league
            .as_ref()
            .map_or(String::from("-"), |b| format!("{} (#{})", b.league_name, b.position));
        info!(
            "{:>2}. user {:<3} score {:>7.2} win rate {:>5.1}% best: {}",
            rank + 1,
            entry.user_id,
            entry.global_score,
            entry.win_rate,
            best
        );
    }

    Ok(())
}

/// Plays every knockout stage in order with random draw-free scores,
/// advancing each winner into the next round's placeholder slot.
fn play_knockout(
    service: &LeagueService,
    store: &Store,
    league_id: u32,
    rng: &mut impl Rng,
) -> color_eyre::Result<()> {
    for stage in [
        FixtureStage::RoundOf16,
        FixtureStage::QuarterFinal,
        FixtureStage::SemiFinal,
        FixtureStage::Final,
    ] {
        for fixture in store.stage_fixtures(league_id, stage) {
            let winner_goals = rng.random_range(1..5);
            let loser_goals = rng.random_range(0..winner_goals);
            let (home_score, away_score) = if rng.random_bool(0.5) {
                (winner_goals, loser_goals)
            } else {
                (loser_goals, winner_goals)
            };

            service.submit_result(fixture.id, home_score, away_score)?;
            service.advance_winner(fixture.id)?;
        }
    }

    Ok(())
}
