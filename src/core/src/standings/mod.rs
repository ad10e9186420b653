pub mod table;

pub use table::{StandingsRow, compute_standings};
