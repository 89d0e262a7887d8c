use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use evolving_chess::engines::engine_minimax::MinimaxEngine;
use evolving_chess::engines::engine_random::RandomEngine;
use evolving_chess::engines::engine_trait::{Engine, GoParams};
use evolving_chess::game_state::chess_rules::RulesConfig;
use evolving_chess::game_state::game_session::GameSession;
use evolving_chess::game_state::game_state::GameState;
use evolving_chess::utils::fen_parser::parse_fen_with_rules;
use evolving_chess::utils::render_game_state::render_game_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    Minimax,
    Random,
}

#[derive(Parser, Debug)]
#[command(name = "evolving_chess")]
#[command(about = "Self-play driver for the evolving-pieces chess engine", long_about = None)]
struct Args {
    /// Starting position in FEN; defaults to the standard setup
    #[arg(short, long)]
    fen: Option<String>,

    /// Search depth for minimax players
    #[arg(short, long, default_value = "3")]
    depth: u8,

    /// Per-move time budget in milliseconds (0 = unlimited)
    #[arg(short, long, default_value = "2000")]
    time_ms: u64,

    /// Seed for the session and engine random generators
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Stop after this many moves even if the game is undecided
    #[arg(long, default_value = "200")]
    max_moves: u32,

    #[arg(long, value_enum, default_value = "minimax")]
    light: EngineKind,

    #[arg(long, value_enum, default_value = "random")]
    dark: EngineKind,

    /// Allow promotion to Hero and Commander
    #[arg(long)]
    variant_promotions: bool,

    /// Print the board after every move
    #[arg(long)]
    show_board: bool,
}

fn build_engine(kind: EngineKind, args: &Args, seed: u64) -> Result<Box<dyn Engine>, Box<dyn std::error::Error>> {
    let mut engine: Box<dyn Engine> = match kind {
        EngineKind::Minimax => Box::new(MinimaxEngine::new(args.depth)),
        EngineKind::Random => Box::new(RandomEngine::default()),
    };
    engine.set_option("Seed", &seed.to_string())?;
    if kind == EngineKind::Minimax {
        engine.set_option("MoveTimeMs", &args.time_ms.to_string())?;
    }
    Ok(engine)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let rules = RulesConfig {
        variant_promotions: args.variant_promotions,
        ..RulesConfig::default()
    };
    let start = match &args.fen {
        Some(fen) => parse_fen_with_rules(fen, rules)?,
        None => GameState::new_game_with_rules(rules),
    };

    let mut session = GameSession::from_state(start, args.seed);
    let mut engines = [
        build_engine(args.light, &args, args.seed)?,
        build_engine(args.dark, &args, args.seed.wrapping_add(1))?,
    ];
    for engine in &mut engines {
        engine.new_game();
    }

    println!("{}\n", render_game_state(session.state()));

    let params = GoParams::default();
    for _ in 0..args.max_moves {
        if session.result().is_some() {
            break;
        }
        let side = session.state().side_to_move;
        let engine = &mut engines[side.index()];
        let output = engine.choose_move(session.state(), &params)?;
        for line in &output.info_lines {
            info!(engine = engine.name(), "{line}");
        }

        let Some(mv) = output.best_move else {
            warn!(%side, "engine found no move");
            break;
        };
        let outcome = match session.play(mv) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%side, %mv, %err, "engine move rejected, falling back to first legal move");
                let Some(fallback) = session.legal_moves().first().copied() else {
                    break;
                };
                session.play(fallback)?
            }
        };

        let extra = if outcome.effects.extra_turn { " (extra turn)" } else { "" };
        println!("{:>4}. {side:<5} {}{extra}", session.state().move_counter, outcome.mv);
        if args.show_board {
            println!("{}\n", render_game_state(session.state()));
        }
    }

    println!("\n{}", render_game_state(session.state()));
    match session.result() {
        Some(result) => match result.winner {
            Some(winner) => println!("{winner} wins by {:?}", result.reason),
            None => println!("draw by {:?}", result.reason),
        },
        None => println!("no result after {} moves", args.max_moves),
    }
    Ok(())
}
