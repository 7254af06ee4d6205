//! AGP Curator: batch editing of genome-assembly layout (AGP) files.
//!
//! An AGP file describes how sequence pieces and gaps compose into larger
//! assembled objects. This crate parses such a layout into an in-memory
//! assembly graph, applies a script of structural edits, and re-emits the
//! layout with coordinates and part numbers recomputed.
//!
//! # Architecture
//!
//! The core is [`graph::AgpGraph`]: a slab arena of records forming one
//! doubly-linked list per object, indexed by object name and by each
//! placement's composite `"name:start-end"` key. Five segment operations
//! (`isolate`, `insert`, `reverse`, `create`, `split`) mutate it while
//! enforcing the Sequence-Gap-Sequence structure, and a coalescing pass
//! (`simplify`) merges base-pair-adjacent placements.
//!
//! Around the core sit [`agp`] (parser and serializer) and [`script`]
//! (tokenizer and directive driver for the edit-script grammar:
//! `MOVE`, `REV`, `REVCOMP`, `CREATE`, `SPLIT`).
//!
//! # Example
//!
//! ```
//! use agp_curator::{parse_agp, run_script, write_agp_string};
//!
//! let layout = "\
//! chr1\t1\t100\t1\tW\tseq1\t1\t100\t+
//! chr1\t101\t200\t2\tN\t100\tscaffold\tyes\tna
//! chr1\t201\t250\t3\tW\tseq2\t1\t50\t-
//! ";
//!
//! let mut graph = parse_agp(layout.as_bytes()).unwrap();
//! run_script(&mut graph, "REVCOMP seq2:1-50").unwrap();
//! let out = write_agp_string(&mut graph);
//! assert!(out.contains("seq2\t1\t50\t+"));
//! ```

pub mod agp;
pub mod graph;
pub mod script;

// Re-exports
pub use agp::{parse_agp, write_agp, write_agp_string, FormatError};
pub use graph::{
    AgpGraph, Direction, GapKind, GraphError, Orientation, Payload, Record, RecordId, Segment,
};
pub use script::{run_script, ScriptError};
