use thiserror::Error;

use crate::graph::GraphError;

/// Errors raised while reading AGP text. Line numbers are 1-based.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("line {line}: malformed AGP record: {message}")]
    Malformed { line: usize, message: String },

    #[error("line {line}: cannot deal with any entry type other than W, U, N: {found}")]
    UnsupportedType { line: usize, found: String },

    #[error("line {line}: {source}")]
    Graph {
        line: usize,
        source: GraphError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
