//! Error types for chess-coach-core

use thiserror::Error;

use crate::rules::RulesError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(&'static str),

    #[error("PGN parsing error: {0}")]
    Pgn(String),

    #[error("Rules error: {0}")]
    Rules(#[from] RulesError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
