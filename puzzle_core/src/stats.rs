use std::time::Duration;

/// Statistics reported alongside a solve attempt, successful or not.
#[derive(Debug, Clone, Copy)]
pub struct SolveStats {
    /// Number of boards on the reconstructed path, including both endpoints.
    /// Zero when no solution was found.
    pub path_length: usize,
    /// Total distinct states admitted to the arena this run.
    pub unique_states: usize,
    /// Wall-clock time spent searching, used as a CPU-time approximation for
    /// the single-threaded search (the threaded variant still reports
    /// wall-clock, since per-thread CPU time isn't tracked separately).
    pub cpu_time: Duration,
    /// Rough memory footprint: arena entries times the size of a state plus
    /// its tile storage.
    pub memory_estimate_bytes: usize,
}
