//! Coalescing pass: merge base-pair-adjacent placements of the same
//! source sequence that sit either side of a single gap.

use crate::graph::errors::GraphError;
use crate::graph::record::{Orientation, Payload, RecordId};
use crate::graph::store::AgpGraph;

impl AgpGraph {
    /// Merge every pair of placements `(a, b)` where `b` is the next
    /// placement after `a` in the same object and the two are contiguous:
    /// same source sequence, same orientation, and base-pair-adjacent
    /// (for `+`, `b` starts one past `a`'s end; mirrored for `-`). On a
    /// merge, `a`'s range widens to cover `b`, and `b` plus the gap
    /// between them are removed and destroyed.
    ///
    /// Objects are processed in lexicographic name order and each merge
    /// retries the widened record against its new neighbor, so chains of
    /// contiguous placements collapse in one call. Returns the number of
    /// merges performed; a second call on the same graph returns zero.
    pub fn simplify(&mut self) -> Result<usize, GraphError> {
        let mut merges = 0;

        for name in self.object_names_sorted() {
            let Some(head) = self.head(&name) else { continue };

            let mut cur = if self[head].is_placement() {
                Some(head)
            } else {
                self.next_placement(head)
            };

            while let Some(a) = cur {
                let Some(b) = self.next_placement(a) else { break };

                if self.contiguous(a, b) {
                    merges += 1;
                    self.absorb_range(a, b)?;

                    // Remove b and the gap between them; the isolate
                    // consumes both flanking gaps and re-bridges, leaving
                    // the widened record adjacent to b's old neighbor.
                    let fragment = self.isolate(b, b)?;
                    self.destroy_chain(fragment.left);
                    // Retry the widened record against its new neighbor.
                } else {
                    cur = Some(b);
                }
            }
        }

        Ok(merges)
    }

    /// Next placement after `id` in list order, skipping gaps.
    fn next_placement(&self, id: RecordId) -> Option<RecordId> {
        let mut cur = self[id].next;
        while let Some(c) = cur {
            if self[c].is_placement() {
                return Some(c);
            }
            cur = self[c].next;
        }
        None
    }

    fn contiguous(&self, a: RecordId, b: RecordId) -> bool {
        match (&self[a].payload, &self[b].payload) {
            (
                Payload::Placement {
                    name: a_name,
                    start: a_start,
                    end: a_end,
                    orientation: a_ori,
                },
                Payload::Placement {
                    name: b_name,
                    start: b_start,
                    end: b_end,
                    orientation: b_ori,
                },
            ) => {
                a_name == b_name
                    && a_ori == b_ori
                    && match a_ori {
                        Orientation::Forward => a_end.checked_add(1) == Some(*b_start),
                        Orientation::Reverse => b_end.checked_add(1) == Some(*a_start),
                    }
            }
            _ => false,
        }
    }

    /// Widen `a`'s source range to cover `b`, re-keying `a` in the
    /// component index.
    fn absorb_range(&mut self, a: RecordId, b: RecordId) -> Result<(), GraphError> {
        let (b_start, b_end) = match &self[b].payload {
            Payload::Placement { start, end, .. } => (*start, *end),
            Payload::Gap { .. } => unreachable!("contiguous() only matches placements"),
        };

        self.unregister_component(a);
        if let Payload::Placement {
            start,
            end,
            orientation,
            ..
        } = &mut self[a].payload
        {
            match orientation {
                Orientation::Forward => *end = b_end,
                Orientation::Reverse => *start = b_start,
            }
        }
        self.register_component(a)
    }
}
