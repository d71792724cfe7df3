//! `build_db`: precomputes a disjoint pattern database by random reverse
//! walks from the goal board, one worker pool per pattern subset.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use log::info;
use puzzle_core::board::Direction;
use puzzle_core::pattern_db::{board_to_patterns, PatternDatabase, PatternEntry, PatternType};
use puzzle_core::{Board, PuzzleError};

/// Builds a `<N>.patterndb` pattern database.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Board dimension. Must be at least 4.
    n: usize,

    /// Output file; defaults to `<N>.patterndb` in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Concurrent workers per subset.
    #[arg(long, default_value_t = 8)]
    workers: usize,

    /// Total random walks per subset, spread evenly across workers.
    #[arg(long, default_value_t = 10_000)]
    walks: usize,

    /// Upper bound on steps per walk.
    #[arg(long, default_value_t = 100)]
    max_moves: usize,
}

/// One random reverse walk from the goal, scored for `pattern_type`.
///
/// Each step picks a uniformly random direction; a step that is illegal or
/// the exact inverse of the previous step is skipped rather than retried, so
/// `max_moves` bounds attempts, not necessarily moves actually taken.
fn random_walk(n: usize, pattern_type: PatternType, max_moves: usize, rng: &mut fastrand::Rng) -> PatternEntry {
    let half = (n * n / 2) as u16;
    let mut board = Board::goal(n);
    let mut cost = 0u32;
    let mut last_direction: Option<Direction> = None;

    for _ in 0..max_moves {
        let direction = Direction::ALL[rng.usize(0..Direction::ALL.len())];
        if last_direction == Some(direction.inverse()) {
            continue;
        }
        let Some(after) = board.apply(direction) else {
            continue;
        };
        let moved_value = after.tile(board.zero_row(), board.zero_column());
        board = after;
        last_direction = Some(direction);

        let belongs = match pattern_type {
            PatternType::FirstHalf => moved_value <= half,
            PatternType::LastHalf => moved_value > half,
        };
        if belongs {
            cost += 1;
        }
    }

    let (first, last) = board_to_patterns(&board);
    let positions = match pattern_type {
        PatternType::FirstHalf => first,
        PatternType::LastHalf => last,
    };
    PatternEntry {
        pattern_type,
        cost,
        positions,
    }
}

/// Keeps the minimum cost per distinct `positions` array, matching the
/// solver side's merge policy.
fn merge_entry(list: &mut Vec<PatternEntry>, entry: PatternEntry) {
    if let Some(existing) = list.iter_mut().find(|e| e.positions == entry.positions) {
        if entry.cost < existing.cost {
            existing.cost = entry.cost;
        }
    } else {
        list.push(entry);
    }
}

/// Runs `workers` threads performing `walks` total random walks for one
/// subset, each worker buffering locally before flushing under the subset
/// lock.
fn build_subset(
    n: usize,
    pattern_type: PatternType,
    workers: usize,
    walks: usize,
    max_moves: usize,
) -> Vec<PatternEntry> {
    let list: Mutex<Vec<PatternEntry>> = Mutex::new(Vec::new());
    let walks_per_worker = walks.div_ceil(workers.max(1));

    std::thread::scope(|scope| {
        for worker in 0..workers {
            let list = &list;
            scope.spawn(move || {
                let mut rng = fastrand::Rng::new();
                let mut buffer = Vec::with_capacity(walks_per_worker);
                for _ in 0..walks_per_worker {
                    buffer.push(random_walk(n, pattern_type, max_moves, &mut rng));
                }
                let mut guard = list.lock().expect("subset mutex poisoned");
                for entry in buffer {
                    merge_entry(&mut guard, entry);
                }
                info!(
                    "{pattern_type} worker {worker} flushed {walks_per_worker} walks"
                );
            });
        }
    });

    list.into_inner().expect("subset mutex poisoned")
}

fn run(args: Args) -> Result<PathBuf, PuzzleError> {
    if args.n < 4 {
        return Err(PuzzleError::ArgumentError("N must be at least 4".into()));
    }

    let first = build_subset(
        args.n,
        PatternType::FirstHalf,
        args.workers,
        args.walks,
        args.max_moves,
    );
    let last = build_subset(
        args.n,
        PatternType::LastHalf,
        args.workers,
        args.walks,
        args.max_moves,
    );

    let mut db = PatternDatabase::new();
    for entry in first.into_iter().chain(last) {
        db.insert(entry);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.patterndb", args.n)));
    db.save(&output)
        .map_err(|e| PuzzleError::DatabaseMalformed(format!("failed to write {output:?}: {e}")))?;
    Ok(output)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(path) => {
            println!("wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
