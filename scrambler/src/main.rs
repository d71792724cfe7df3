//! `scramble`: prints a board reached by `k` random moves from the goal, in
//! both matrix and one-line form, ready to paste into `solve`.

use clap::Parser;
use puzzle_core::board::Direction;
use puzzle_core::Board;

/// Generates a scrambled N-puzzle start board.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Board dimension.
    n: usize,
    /// Number of random moves applied to the goal board.
    k: usize,
}

/// Walks `k` random legal moves from the goal, skipping illegal picks rather
/// than retrying them, same as the reference start-config generator.
fn scramble(n: usize, k: usize, rng: &mut fastrand::Rng) -> Board {
    let mut board = Board::goal(n);
    for _ in 0..k {
        let direction = Direction::ALL[rng.usize(0..Direction::ALL.len())];
        if let Some(next) = board.apply(direction) {
            board = next;
        }
    }
    board
}

fn one_line(board: &Board) -> String {
    board
        .tiles()
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    let args = Args::parse();
    let mut rng = fastrand::Rng::new();
    let board = scramble(args.n, args.k, &mut rng);

    println!("Initial state in puzzle format:");
    print!("{board}");
    println!("Initial state in one line, for use in solve:");
    println!("{}", one_line(&board));
}
