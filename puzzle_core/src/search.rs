//! The A* main loop: pop the lowest-`f` fringe node, goal-test it, expand it,
//! and suppress any successor already seen on either the fringe or closed set.

use std::time::Instant;

use crate::arena::{Arena, NodeId, StateNode};
use crate::board::{Board, Direction};
use crate::closed::Closed;
use crate::fringe::Fringe;
use crate::heuristic::heuristic;
use crate::pattern_db::PatternDatabase;
use crate::stats::SolveStats;

/// How successors of the popped node are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionStrategy {
    /// Generate the four candidate moves on the calling thread.
    Serial,
    /// Spawn one scoped thread per direction. Each thread only ever writes
    /// its own slot, so no `Arc`/`Mutex` is needed to share the result.
    Threaded,
}

/// Outcome of a completed search.
#[derive(Debug)]
pub enum Outcome {
    Solved { path: Vec<Board>, stats: SolveStats },
    NoSolution { stats: SolveStats },
}

/// Generates the (up to four) boards reachable from `board` in canonical
/// direction order, one slot per direction, `None` where the move is illegal.
fn expand_serial(board: &Board) -> [Option<Board>; 4] {
    let mut successors = [None, None, None, None];
    for (slot, direction) in successors.iter_mut().zip(Direction::ALL) {
        *slot = board.apply(direction);
    }
    successors
}

/// Same result as [`expand_serial`], computed with one scoped thread per
/// direction. Each thread writes only its own element of `successors`, so the
/// four borrows never alias.
fn expand_threaded(board: &Board) -> [Option<Board>; 4] {
    let mut successors = [None, None, None, None];
    std::thread::scope(|scope| {
        let mut slots: Vec<&mut Option<Board>> = successors.iter_mut().collect();
        for direction in Direction::ALL {
            let slot = slots.remove(0);
            scope.spawn(move || {
                *slot = board.apply(direction);
            });
        }
    });
    successors
}

/// Owns every piece of A* bookkeeping for one solve attempt: the arena of
/// visited states, the fringe, the closed set, and the optional pattern
/// database used to strengthen the heuristic.
pub struct Search {
    arena: Arena,
    fringe: Fringe,
    closed: Closed,
    pattern_db: Option<PatternDatabase>,
    goal: Board,
    strategy: ExpansionStrategy,
}

impl Search {
    pub fn new(
        start: Board,
        pattern_db: Option<PatternDatabase>,
        strategy: ExpansionStrategy,
    ) -> Search {
        let goal = Board::goal(start.n());
        let mut arena = Arena::new();
        let mut fringe = Fringe::new();

        let h = heuristic(&start, pattern_db.as_ref());
        let root = arena.push(StateNode {
            board: start.clone(),
            g: 0,
            h,
            f: h,
            parent: None,
        });
        fringe.insert(root, h, start);

        Search {
            arena,
            fringe,
            closed: Closed::new(),
            pattern_db,
            goal,
            strategy,
        }
    }

    /// Runs A* to completion: either a goal is popped off the fringe, or the
    /// fringe empties with no goal found.
    pub fn run(&mut self) -> Outcome {
        let start_time = Instant::now();
        let mut iterations: u64 = 0;

        loop {
            let Some(current_id) = self.fringe.pop_min() else {
                log::info!(
                    "fringe exhausted after {iterations} iterations, {} states expanded",
                    self.closed.len()
                );
                return Outcome::NoSolution {
                    stats: self.stats(start_time.elapsed(), 0),
                };
            };

            let current_board = self.arena.get(current_id).board.clone();
            if current_board == self.goal {
                let path = self.arena.reconstruct_path(current_id);
                log::info!(
                    "solution found: {} moves, {} states expanded",
                    path.len().saturating_sub(1),
                    self.closed.len()
                );
                let stats = self.stats(start_time.elapsed(), path.len());
                return Outcome::Solved { path, stats };
            }

            self.expand_and_merge(current_id, &current_board);
            self.closed.push(current_id, current_board);

            iterations += 1;
            if iterations % 1000 == 0 {
                log::debug!(
                    "iteration {iterations}: {} unique states, fringe size {}",
                    self.arena.len(),
                    self.fringe.len()
                );
            }
        }
    }

    fn expand_and_merge(&mut self, current_id: NodeId, current_board: &Board) {
        let current_g = self.arena.get(current_id).g;
        let successors = match self.strategy {
            ExpansionStrategy::Serial => expand_serial(current_board),
            ExpansionStrategy::Threaded => expand_threaded(current_board),
        };

        for successor in successors.into_iter().flatten() {
            // Duplicate suppression: a successor already on the closed set or
            // the fringe is discarded rather than re-opened or decrease-keyed.
            if self.closed.contains(&successor) || self.fringe.contains(&successor) {
                continue;
            }
            let h = heuristic(&successor, self.pattern_db.as_ref());
            let g = current_g + 1;
            let f = g + h;
            let id = self.arena.push(StateNode {
                board: successor.clone(),
                g,
                h,
                f,
                parent: Some(current_id),
            });
            self.fringe.insert(id, f, successor);
        }
    }

    fn stats(&self, elapsed: std::time::Duration, path_length: usize) -> SolveStats {
        let per_state = std::mem::size_of::<StateNode>() + self.goal.n() * self.goal.n() * 2;
        SolveStats {
            path_length,
            unique_states: self.arena.len(),
            cpu_time: elapsed,
            memory_estimate_bytes: self.arena.len() * per_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_goal_board_in_zero_moves() {
        let goal = Board::goal(3);
        let mut search = Search::new(goal.clone(), None, ExpansionStrategy::Serial);
        match search.run() {
            Outcome::Solved { path, .. } => {
                assert_eq!(path.len(), 1);
                assert_eq!(path[0], goal);
            }
            Outcome::NoSolution { .. } => panic!("goal board must solve trivially"),
        }
    }

    #[test]
    fn solves_one_move_away() {
        let goal = Board::goal(3);
        let start = goal.apply(Direction::Up).unwrap();
        let mut search = Search::new(start, None, ExpansionStrategy::Serial);
        match search.run() {
            Outcome::Solved { path, .. } => assert_eq!(path.len(), 2),
            Outcome::NoSolution { .. } => panic!("one move from goal must solve"),
        }
    }

    #[test]
    fn serial_and_threaded_expansion_agree() {
        let board = Board::new(3, vec![1, 2, 3, 4, 0, 5, 6, 7, 8]).unwrap();
        assert_eq!(expand_serial(&board), expand_threaded(&board));
    }

    #[test]
    fn unsolvable_parity_reports_no_solution() {
        // Swapping two adjacent non-blank tiles of the goal flips parity.
        let unsolvable = Board::new(3, vec![2, 1, 3, 4, 5, 6, 7, 8, 0]).unwrap();
        let mut search = Search::new(unsolvable, None, ExpansionStrategy::Serial);
        match search.run() {
            Outcome::NoSolution { .. } => {}
            Outcome::Solved { .. } => panic!("parity-odd board must not solve"),
        }
    }
}
