use std::fmt;

/// Handle to a record slot in the graph arena.
///
/// Handles stay valid until the record is destroyed by a segment operation;
/// indexing the graph with a freed handle panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub(crate) usize);

/// Orientation of a placed sequence within its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::Reverse => '-',
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Whether a gap line was declared with a known size (`N`) or an
/// unknown one (`U`). Preserved so output reproduces the input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKind {
    Sized,
    Unknown,
}

impl GapKind {
    pub fn as_char(self) -> char {
        match self {
            GapKind::Sized => 'N',
            GapKind::Unknown => 'U',
        }
    }
}

/// Type-specific half of an AGP record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A `W` line: a range of a source sequence placed into the object.
    Placement {
        name: String,
        /// 1-based inclusive range in source-sequence coordinates.
        start: u64,
        end: u64,
        orientation: Orientation,
    },
    /// An `N`/`U` line: an unsequenced span between placements.
    Gap {
        kind: GapKind,
        length: u64,
        gap_type: String,
        linkage: String,
        evidence: String,
    },
}

impl Payload {
    /// Composite lookup key for a placement, `"name:start-end"`.
    /// Gaps are not addressable and have no key.
    pub fn key(&self) -> Option<String> {
        match self {
            Payload::Placement { name, start, end, .. } => {
                Some(format!("{name}:{start}-{end}"))
            }
            Payload::Gap { .. } => None,
        }
    }

    /// Number of object bases this record occupies. Placement ranges are
    /// inclusive and ordered (the parser rejects `start > end`); a span of
    /// the full `u64` domain saturates rather than wrapping.
    pub fn width(&self) -> u64 {
        match self {
            Payload::Placement { start, end, .. } => {
                (end - start).saturating_add(1)
            }
            Payload::Gap { length, .. } => *length,
        }
    }

    /// A fresh bridging gap, as fabricated by the segment operations.
    pub fn bridge_gap() -> Self {
        Payload::Gap {
            kind: GapKind::Unknown,
            length: 100,
            gap_type: "scaffold".to_string(),
            linkage: "yes".to_string(),
            evidence: "na".to_string(),
        }
    }
}

/// One line of an AGP layout: a placement or gap positioned within an
/// object's ordered record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Name of the owning object (scaffold/chromosome).
    pub object: String,
    /// 1-based inclusive span within the object. Recomputed by
    /// [`renumber`](crate::graph::AgpGraph::renumber); not load-bearing
    /// for graph structure.
    pub object_start: u64,
    pub object_end: u64,
    /// 1-based ordinal within the object; also recomputed at output time.
    pub part_number: u32,
    pub payload: Payload,

    pub(crate) prev: Option<RecordId>,
    pub(crate) next: Option<RecordId>,
}

impl Record {
    pub fn new(object: impl Into<String>, payload: Payload) -> Self {
        Self {
            object: object.into(),
            object_start: 0,
            object_end: 0,
            part_number: 0,
            payload,
            prev: None,
            next: None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self.payload, Payload::Gap { .. })
    }

    pub fn is_placement(&self) -> bool {
        matches!(self.payload, Payload::Placement { .. })
    }

    pub fn key(&self) -> Option<String> {
        self.payload.key()
    }

    /// Key if this is a placement, otherwise the object name. Used when an
    /// error message needs to identify a record of either kind.
    pub fn display_key(&self) -> String {
        self.key().unwrap_or_else(|| self.object.clone())
    }

    pub fn prev(&self) -> Option<RecordId> {
        self.prev
    }

    pub fn next(&self) -> Option<RecordId> {
        self.next
    }
}
