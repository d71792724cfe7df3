//! Error kinds shared by the solver, builder, and scrambler binaries.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("{0}")]
    ArgumentError(String),

    #[error("pattern database file not found: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pattern database malformed: {0}")]
    DatabaseMalformed(String),
}
