pub mod error;
pub mod league_service;

pub use error::ServiceError;
pub use league_service::{BatchItemError, BatchOutcome, LeagueService, ResultInput};
