pub mod seed;
pub mod store;

pub use seed::StoreSeeder;
pub use store::{LeagueMemberRow, LeagueRow, Store, StoreError};
