//! End-to-end 8-puzzle scenarios exercising trivial, one-move, short,
//! moderate, linear-conflict-sensitive, and unsolvable inputs.

use puzzle_core::heuristic::heuristic;
use puzzle_core::{Board, ExpansionStrategy, Outcome, Search};

fn solve(tiles: Vec<u16>) -> Outcome {
    let board = Board::new(3, tiles).expect("valid 3x3 board");
    Search::new(board, None, ExpansionStrategy::Serial).run()
}

fn assert_path_length(outcome: Outcome, expected: usize) -> Vec<Board> {
    match outcome {
        Outcome::Solved { path, stats } => {
            assert_eq!(path.len(), expected);
            assert_eq!(stats.path_length, expected);
            path
        }
        Outcome::NoSolution { .. } => panic!("expected a solution of length {expected}"),
    }
}

#[test]
fn trivial_goal_board_has_path_length_one() {
    let outcome = solve(vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);
    assert_path_length(outcome, 1);
}

#[test]
fn one_move_from_goal_has_path_length_two() {
    let outcome = solve(vec![1, 2, 3, 4, 5, 6, 7, 0, 8]);
    assert_path_length(outcome, 2);
}

#[test]
fn short_case_has_path_length_three() {
    let outcome = solve(vec![1, 2, 3, 4, 5, 6, 0, 7, 8]);
    assert_path_length(outcome, 3);
}

#[test]
fn moderate_case_has_path_length_three() {
    let outcome = solve(vec![1, 2, 3, 4, 0, 6, 7, 5, 8]);
    assert_path_length(outcome, 3);
}

#[test]
fn linear_conflict_sensitive_case_exceeds_manhattan_distance() {
    let board = Board::new(3, vec![3, 2, 1, 4, 5, 6, 7, 8, 0]).unwrap();
    let manhattan_only = puzzle_core::heuristic::manhattan(&board);

    let outcome = solve(vec![3, 2, 1, 4, 5, 6, 7, 8, 0]);
    let path = match outcome {
        Outcome::Solved { path, .. } => path,
        Outcome::NoSolution { .. } => panic!("this board is solvable"),
    };
    let moves = path.len() as u32 - 1;
    assert!(
        moves > manhattan_only,
        "expected linear conflicts to push the optimal path past Manhattan distance alone"
    );
}

#[test]
fn unsolvable_parity_reports_no_solution() {
    let outcome = solve(vec![1, 2, 3, 4, 5, 6, 8, 7, 0]);
    match outcome {
        Outcome::NoSolution { .. } => {}
        Outcome::Solved { .. } => panic!("odd permutation parity must not solve"),
    }
}

#[test]
fn f_values_are_nondecreasing_along_the_path() {
    let outcome = solve(vec![1, 2, 3, 4, 0, 6, 7, 5, 8]);
    let path = assert_path_length(outcome, 3);

    let mut previous_f = 0u32;
    for (g, board) in path.iter().enumerate() {
        let f = g as u32 + heuristic(board, None);
        assert!(f >= previous_f, "f must be nondecreasing along an optimal path");
        previous_f = f;
    }
}
