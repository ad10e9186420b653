use crate::store::{LeagueRow, Store};
use league_core::league::{LeagueMode, LeagueTier, UserId};
use log::info;
use rand::{Rng, RngExt};

const TEAM_PREFIXES: &[&str] = &[
    "FC", "Real", "Atletico", "Sporting", "Dynamo", "United", "Inter", "Racing",
];

const TEAM_NAMES: &[&str] = &[
    "Thunder", "Vortex", "Falcons", "Titans", "Rovers", "Wanderers", "Corsairs", "Comets",
    "Pioneers", "Mariners", "Rangers", "Spartans", "Nomads", "Vikings", "Phoenix", "Wolves",
    "Harriers", "Jaguars", "Sentinels", "Drifters",
];

/// Builds a small demo dataset: three overlapping leagues so the
/// global leaderboard has multi-league members to aggregate.
pub struct StoreSeeder;

impl StoreSeeder {
    pub fn seed(store: &Store) -> Vec<LeagueRow> {
        let mut rng = rand::rng();

        let weekend = store.create_league(
            "Weekend League",
            LeagueTier::Amateur,
            LeagueMode::RoundRobin,
            16,
        );
        Self::enroll(store, weekend.id, 1..=6, &mut rng);

        let midweek = store.create_league(
            "Midweek Cup Qualifiers",
            LeagueTier::Competitive,
            LeagueMode::RoundRobin,
            8,
        );
        Self::enroll(store, midweek.id, 10..=14, &mut rng);

        let champions = store.create_league(
            "Champions Circuit",
            LeagueTier::Champions,
            LeagueMode::UefaHybrid,
            32,
        );
        Self::enroll(store, champions.id, 1..=16, &mut rng);

        let leagues = store.leagues();
        info!("seeded {} demo leagues", leagues.len());
        leagues
    }

    fn enroll(
        store: &Store,
        league_id: u32,
        users: std::ops::RangeInclusive<UserId>,
        rng: &mut impl Rng,
    ) {
        for user_id in users {
            let team_name = Self::team_name(rng);
            store
                .add_member(league_id, user_id, &team_name)
                .expect("seeded member rejected");
        }
    }

    fn team_name(rng: &mut impl Rng) -> String {
        let prefix = TEAM_PREFIXES[rng.random_range(0..TEAM_PREFIXES.len())];
        let name = TEAM_NAMES[rng.random_range(0..TEAM_NAMES.len())];
        format!("{} {}", prefix, name)
    }
}
