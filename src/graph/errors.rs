use thiserror::Error;

/// Structural and reference errors raised by the graph store and the
/// segment operations. All of these abort the run when they reach the
/// binary; the core itself never terminates the process.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("sequence component placed more than once: {key}")]
    DuplicateKey { key: String },

    #[error("cannot create object: {object} already exists")]
    ObjectExists { object: String },

    #[error(
        "AGP objects must alternate sequence and gap: \
         the range at {key} is not flanked by gaps"
    )]
    NotFlankedByGap { key: String },

    #[error("segment ends are not connected: {left} - {right}")]
    SegmentNotConnected { left: String, right: String },

    #[error("SPLIT target must be a sequence component, not a gap")]
    SplitNonSequence,

    #[error("split position {position} is not inside {key}")]
    SplitOutOfRange { key: String, position: u64 },

    #[error("target {key} is not attached to any object")]
    DetachedTarget { key: String },
}
