//! PGN ingestion

mod pgn;

pub use pgn::{parse_pgn_file, parse_pgn_str, PgnGame};
