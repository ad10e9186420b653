pub mod round_robin;
pub mod tournament;

pub use round_robin::generate_round_robin;
pub use tournament::{BracketAdvance, advance_winner, generate_uefa_tournament};
