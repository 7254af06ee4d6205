use thiserror::Error;

use crate::graph::GraphError;

fn hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(key) => format!(" (did you mean '{key}'?)"),
        None => String::new(),
    }
}

/// Script-syntax and reference errors raised while running an edit script,
/// plus structural errors propagated from the graph operations.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("unexpected end to script")]
    UnexpectedEnd,

    #[error("unknown directive: {name}")]
    UnknownDirective { name: String },

    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("cannot find {key} in AGP file{}", hint(.suggestion))]
    UnknownComponent {
        key: String,
        suggestion: Option<String>,
    },

    #[error("MOVE target {key} lies inside the segment being moved")]
    TargetInsideSegment { key: String },

    #[error("position must be a positive integer: {token}")]
    InvalidPosition { token: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}
