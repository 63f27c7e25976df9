//! PGN file parsing functionality

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use shakmaty::Color;
use std::fs;
use std::io::Cursor;
use std::ops::ControlFlow;
use std::path::Path;

use crate::error::{Error, Result};

/// A game as written in the PGN: tags plus main-line SAN tokens.
/// Moves are not validated here; the analyzer replays them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PgnGame {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub white_elo: Option<u16>,
    pub black_elo: Option<u16>,
    pub moves: Vec<String>,
}

impl PgnGame {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn summary(&self) -> String {
        let white = self.white.as_deref().unwrap_or("Unknown");
        let black = self.black.as_deref().unwrap_or("Unknown");
        let result = self.result.as_deref().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }

    /// Resolves `"white"`, `"black"` or a player name to a side.
    /// Case-insensitive.
    pub fn color_of(&self, player: &str) -> Option<Color> {
        let player = player.trim();
        if player.eq_ignore_ascii_case("white") {
            return Some(Color::White);
        }
        if player.eq_ignore_ascii_case("black") {
            return Some(Color::Black);
        }

        let plays = |name: &Option<String>| {
            name.as_deref()
                .is_some_and(|n| n.trim().to_lowercase() == player.to_lowercase())
        };
        if plays(&self.white) {
            Some(Color::White)
        } else if plays(&self.black) {
            Some(Color::Black)
        } else {
            None
        }
    }
}

struct GameParser;

impl Visitor for GameParser {
    type Tags = PgnGame;
    type Movetext = PgnGame;
    type Output = PgnGame;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(PgnGame::default())
    }

    fn tag(
        &mut self,
        game: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let value = value.decode_utf8_lossy().to_string();

        match name {
            b"Event" => game.event = Some(value),
            b"Site" => game.site = Some(value),
            b"Date" => game.date = Some(value),
            b"White" => game.white = Some(value),
            b"Black" => game.black = Some(value),
            b"Result" => game.result = Some(value),
            b"WhiteElo" => game.white_elo = value.parse().ok(),
            b"BlackElo" => game.black_elo = value.parse().ok(),
            _ => {}
        }

        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, game: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(game)
    }

    fn san(&mut self, game: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        game.moves.push(san.to_string());
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _game: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, game: Self::Movetext) -> Self::Output {
        game
    }
}

pub fn parse_pgn_file<P: AsRef<Path>>(path: P) -> Result<Vec<PgnGame>> {
    let contents = fs::read_to_string(path)?;
    parse_pgn_str(&contents)
}

/// Parses every game in `pgn`. Games without moves are dropped.
pub fn parse_pgn_str(pgn: &str) -> Result<Vec<PgnGame>> {
    let mut parser = GameParser;
    let mut reader = pgn_reader::Reader::new(Cursor::new(pgn.as_bytes()));
    let mut games = Vec::new();

    while let Some(game) = reader
        .read_game(&mut parser)
        .map_err(|e| Error::Pgn(e.to_string()))?
    {
        if !game.moves.is_empty() {
            games.push(game);
        }
    }

    if games.is_empty() {
        return Err(Error::Pgn("no games found".to_string()));
    }
    Ok(games)
}
