//! Analyze every game in a PGN file for one side and print the results as JSON

use chess_coach_core::{
    parse_pgn_file, AnalysisConfig, GameAnalyzer, MaterialEvaluator, ShakmatyRules,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> chess_coach_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(player)) = (args.next(), args.next()) else {
        eprintln!("Usage: analyze-pgn <file.pgn> <white|black|player-name>");
        std::process::exit(1);
    };

    let config = AnalysisConfig::from_env();
    info!(?config, path = %path, "Loading games");

    let analyzer = GameAnalyzer::builder()
        .rules(ShakmatyRules)
        .evaluator(MaterialEvaluator::new())
        .config(config)
        .build()?;

    let games = parse_pgn_file(&path)?;
    let mut results = Vec::with_capacity(games.len());

    for game in &games {
        let Some(reviewed) = game.color_of(&player) else {
            warn!(game = %game.summary(), player = %player, "Player not in game, skipping");
            continue;
        };
        info!(game = %game.summary(), moves = game.move_count(), "Analyzing");
        results.push(analyzer.analyze_game(game.moves.as_slice(), reviewed).await);
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
