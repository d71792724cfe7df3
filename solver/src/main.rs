//! `solve`: runs A* on a sliding-tile board and prints the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;
use puzzle_core::{Board, ExpansionStrategy, Outcome, PatternDatabase, PuzzleError, Search};

/// Solves an N-puzzle board with A* and an optional pattern database.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Board dimension.
    n: usize,

    /// Tiles in row-major order, `0` for the blank.
    tiles: Vec<u16>,

    /// Pattern database file built by `build_db`.
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Expand successors with one thread per direction instead of serially.
    #[arg(long)]
    threaded: bool,
}

fn run(args: Args) -> Result<Outcome, PuzzleError> {
    let start = Board::new(args.n, args.tiles)?;

    let pattern_db = args
        .database
        .as_deref()
        .map(|path| PatternDatabase::load(path, args.n))
        .transpose()?;

    let strategy = if args.threaded {
        ExpansionStrategy::Threaded
    } else {
        ExpansionStrategy::Serial
    };

    println!("Initial state:\n{start}");
    println!("Goal state:\n{}", Board::goal(args.n));

    let mut search = Search::new(start, pattern_db, strategy);
    Ok(search.run())
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Solved { path, stats } => {
            println!("Solution found!");
            println!("Path length: {} moves", stats.path_length.saturating_sub(1));
            for (step, board) in path.iter().enumerate() {
                println!("Move {step}:\n{board}");
            }
            print_stats(&stats);
        }
        Outcome::NoSolution { stats } => {
            println!("No solution.");
            print_stats(&stats);
        }
    }
}

fn print_stats(stats: &puzzle_core::SolveStats) {
    println!("Unique configurations: {}", stats.unique_states);
    println!("Estimated memory: {} bytes", stats.memory_estimate_bytes);
    println!("CPU time: {:.3}s", stats.cpu_time.as_secs_f64());
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(outcome) => {
            info!("search complete");
            report(outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
