mod config;
mod render;
mod view;

use anyhow::{bail, Context};
use chess_core::Color;
use chess_engine::{init_attack_tables, perft, perft_divide, Board};
use chess_pgn::{PgnGame, Replay};
use clap::{Parser, Subcommand};
use config::ViewerConfig;
use render::render_board;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use view::Stepper;

#[derive(Parser)]
#[command(name = "pgn-viewer")]
#[command(about = "Terminal PGN viewer and move generator test tool")]
struct Cli {
    /// Configuration file (defaults to pgn-viewer.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Draw pieces with Unicode chess symbols
    #[arg(long, global = true)]
    unicode: bool,
    /// Draw the board from Black's side
    #[arg(long, global = true)]
    flip: bool,
    /// Hide rank and file labels
    #[arg(long, global = true)]
    no_coordinates: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes of the move generator
    Perft {
        /// Search depth (defaults to perft_depth from the config)
        depth: Option<u32>,
        /// Start from this FEN instead of the initial position
        #[arg(long)]
        fen: Option<String>,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Print the tag pairs and result of a game
    Tags {
        file: PathBuf,
        /// Game number within the file, starting at 1
        #[arg(short, long, default_value = "1")]
        game: usize,
    },
    /// List every move with its resolved coordinates
    Moves {
        file: PathBuf,
        #[arg(short, long, default_value = "1")]
        game: usize,
    },
    /// Print the board after a number of plies
    Show {
        file: PathBuf,
        #[arg(short, long, default_value = "1")]
        game: usize,
        /// Plies to play (defaults to the whole game)
        #[arg(long)]
        ply: Option<usize>,
    },
    /// Step through a game interactively
    View {
        file: PathBuf,
        #[arg(short, long, default_value = "1")]
        game: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config =
        ViewerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if cli.unicode {
        config.unicode = true;
    }
    if cli.flip {
        config.flip = true;
    }
    if cli.no_coordinates {
        config.coordinates = false;
    }

    match cli.command {
        Commands::Perft { depth, fen, divide } => {
            run_perft(depth.unwrap_or(config.perft_depth), fen.as_deref(), divide)
        }
        Commands::Tags { file, game } => {
            let game = load_game(&file, game)?;
            for (name, value) in &game.tags {
                println!("{}: {}", name, value);
            }
            println!("Result: {}", game.result);
            Ok(())
        }
        Commands::Moves { file, game } => {
            let game = load_game(&file, game)?;
            let replay = Replay::new(&game, init_attack_tables())?;
            for step in replay {
                let step = step.with_context(|| format!("replaying {}", file.display()))?;
                println!(
                    "{} {} -> {}",
                    move_number(&step.board),
                    step.san,
                    step.mv
                );
            }
            println!("{}", game.result);
            Ok(())
        }
        Commands::Show { file, game, ply } => {
            let game = load_game(&file, game)?;
            let plies = ply.unwrap_or(game.moves.len());
            if plies > game.moves.len() {
                bail!("game has only {} plies", game.moves.len());
            }
            let mut replay = Replay::new(&game, init_attack_tables())?;
            for step in replay.by_ref().take(plies) {
                step.with_context(|| format!("replaying {}", file.display()))?;
            }
            let board = replay.board();
            print!("{}", render_board(board, &config));
            println!("{}", board.to_fen());
            Ok(())
        }
        Commands::View { file, game } => {
            let game = load_game(&file, game)?;
            let mut stepper = Stepper::from_game(&game, init_attack_tables())
                .with_context(|| format!("replaying {}", file.display()))?;
            let stdin = std::io::stdin();
            view::run(&mut stepper, &config, stdin.lock(), std::io::stdout())?;
            Ok(())
        }
    }
}

fn run_perft(depth: u32, fen: Option<&str>, divide: bool) -> anyhow::Result<()> {
    let mut board = match fen {
        Some(fen) => Board::from_fen(fen).context("parsing --fen")?,
        None => Board::startpos(),
    };
    let tables = init_attack_tables();

    let start = Instant::now();
    let nodes = if divide {
        let counts = perft_divide(&mut board, tables, depth);
        for (mv, count) in &counts {
            println!("{}: {}", mv, count);
        }
        println!();
        counts.iter().map(|(_, count)| count).sum()
    } else {
        perft(&mut board, tables, depth)
    };
    let elapsed = start.elapsed();

    println!("Depth: {}", depth);
    println!("Nodes: {}", nodes);
    println!("Time: {:.3}s", elapsed.as_secs_f64());
    if elapsed.as_secs_f64() > 0.0 {
        println!("NPS: {:.0}", nodes as f64 / elapsed.as_secs_f64());
    }
    Ok(())
}

/// Loads game number `index` (1-based) from a PGN file.
fn load_game(path: &Path, index: usize) -> anyhow::Result<PgnGame> {
    let mut games =
        chess_pgn::read_file(path).with_context(|| format!("reading {}", path.display()))?;
    if index == 0 || index > games.len() {
        bail!(
            "{} contains {} game(s); no game {}",
            path.display(),
            games.len(),
            index
        );
    }
    Ok(games.swap_remove(index - 1))
}

/// Move number label for the move that produced `after`: `12.` or `12...`.
fn move_number(after: &Board) -> String {
    match after.side_to_move() {
        Color::Black => format!("{}.", after.fullmove_number()),
        Color::White => format!("{}...", after.fullmove_number().saturating_sub(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Move, Square};
    use std::io::Write;

    #[test]
    fn move_number_labels() {
        let mut board = Board::startpos();
        board.apply(Move::quiet(Square::E2, Square::E4));
        assert_eq!(move_number(&board), "1.");
        board.apply(Move::quiet(Square::E7, Square::E5));
        assert_eq!(move_number(&board), "1...");
        board.apply(Move::quiet(Square::G1, Square::F3));
        assert_eq!(move_number(&board), "2.");
    }

    #[test]
    fn load_game_selects_by_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[Event \"a\"]\n1. e4 *\n\n[Event \"b\"]\n1. d4 *\n").unwrap();

        let game = load_game(file.path(), 2).unwrap();
        assert_eq!(game.tag("Event"), Some("b"));
        assert!(load_game(file.path(), 0).is_err());
        assert!(load_game(file.path(), 3).is_err());
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pgn-viewer", "show", "game.pgn", "--ply", "3", "--flip"])
            .unwrap();
        assert!(cli.flip);
        match cli.command {
            Commands::Show { ply, game, .. } => {
                assert_eq!(ply, Some(3));
                assert_eq!(game, 1);
            }
            _ => panic!("expected show"),
        }
    }
}
