//! Structural mutators over the assembly graph.
//!
//! Every operation here re-links `prev`/`next` handles, regenerates or
//! destroys flanking gap records, and keeps both lookup indices in step.
//! The shared precondition is the Sequence-Gap-Sequence rule: a selected
//! range's external neighbors, where present, must be gap records, so a
//! cut never lands mid-sequence.
//!
//! [`isolate`](AgpGraph::isolate) unregisters the segment's placements
//! from the component index; its consumers ([`insert`](AgpGraph::insert)
//! and [`create`](AgpGraph::create)) register them again under their new
//! owner. That way the index never holds an entry for a record that is
//! not reachable from some object head.

use crate::graph::errors::GraphError;
use crate::graph::record::{Orientation, Payload, Record, RecordId};
use crate::graph::store::AgpGraph;

/// Which side of the target a segment is spliced onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

/// A contiguous inclusive run of records within one object's list,
/// or a detached run produced by [`AgpGraph::isolate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub left: RecordId,
    pub right: RecordId,
}

impl AgpGraph {
    /// Handles from `left` through `right` following `next` links, or an
    /// error if `right` is not reachable (ends in different objects, or
    /// given in the wrong order).
    fn connected_span(
        &self,
        left: RecordId,
        right: RecordId,
    ) -> Result<Vec<RecordId>, GraphError> {
        let mut span = Vec::new();
        let mut cur = Some(left);
        while let Some(id) = cur {
            span.push(id);
            if id == right {
                return Ok(span);
            }
            cur = self[id].next;
        }
        Err(GraphError::SegmentNotConnected {
            left: self[left].display_key(),
            right: self[right].display_key(),
        })
    }

    fn ensure_gap_flank(
        &self,
        flank: Option<RecordId>,
        endpoint: RecordId,
    ) -> Result<(), GraphError> {
        match flank {
            Some(f) if !self[f].is_gap() => Err(GraphError::NotFlankedByGap {
                key: self[endpoint].display_key(),
            }),
            _ => Ok(()),
        }
    }

    /// A target is only usable while it is still reachable from the object
    /// index; a record inside a just-isolated segment is not.
    fn ensure_attached(&self, target: RecordId) -> Result<(), GraphError> {
        let mut head = target;
        while let Some(p) = self[head].prev {
            head = p;
        }
        if self.objects.get(&self[target].object) == Some(&head) {
            Ok(())
        } else {
            Err(GraphError::DetachedTarget {
                key: self[target].display_key(),
            })
        }
    }

    fn fresh_gap(&mut self, object: &str) -> RecordId {
        self.alloc(Record::new(object, Payload::bridge_gap()))
    }

    fn link(&mut self, a: RecordId, b: RecordId) {
        self[a].next = Some(b);
        self[b].prev = Some(a);
    }

    /// Consume a flanking gap: break its links, destroy it, and return the
    /// surviving neighbor on its far side (the placement that used to sit
    /// beyond the gap), if any.
    fn consume_flank(
        &mut self,
        flank: Option<RecordId>,
        endpoint: RecordId,
        leftward: bool,
    ) -> Option<RecordId> {
        let f = flank?;
        let far = if leftward { self[f].prev } else { self[f].next };
        if let Some(n) = far {
            if leftward {
                self[n].next = None;
            } else {
                self[n].prev = None;
            }
        }
        if leftward {
            self[endpoint].prev = None;
        } else {
            self[endpoint].next = None;
        }
        self.destroy(f);
        far
    }

    /// Remove the inclusive range `[left, right]` from its object and
    /// return it as a detached segment.
    ///
    /// Both external neighbors, where present, must be gaps; they are
    /// consumed. If the segment was the whole object the object entry is
    /// dropped; if it was a prefix the entry is repointed at the survivor;
    /// if the cut was interior, a fresh gap bridges the two surviving
    /// halves so the object stays one connected list.
    pub fn isolate(
        &mut self,
        left: RecordId,
        right: RecordId,
    ) -> Result<Segment, GraphError> {
        let span = self.connected_span(left, right)?;
        let left_flank = self[left].prev;
        let right_flank = self[right].next;
        self.ensure_gap_flank(left_flank, left)?;
        self.ensure_gap_flank(right_flank, right)?;

        for &id in &span {
            self.unregister_component(id);
        }

        let object = self[left].object.clone();
        let before = self.consume_flank(left_flank, left, true);
        let after = self.consume_flank(right_flank, right, false);

        match (before, after) {
            // Whole object selected.
            (None, None) => {
                self.objects.remove(&object);
            }
            // Prefix selected: the remainder becomes the new head.
            (None, Some(a)) => {
                self.objects.insert(object, a);
            }
            // Suffix selected: the prefix keeps the head, nothing to do.
            (Some(_), None) => {}
            // Interior cut: rejoin the surviving halves across a fresh gap.
            (Some(b), Some(a)) => {
                let gap = self.fresh_gap(&object);
                self.link(b, gap);
                self.link(gap, a);
            }
        }

        Ok(Segment { left, right })
    }

    /// Splice a detached segment next to `target`, on the side given by
    /// `direction`. The segment's records transfer ownership to `target`'s
    /// object and re-enter the component index.
    ///
    /// A gap already sitting on the insertion side is consumed, and its
    /// displaced neighbor is reconnected across a fresh gap on the far
    /// side of the segment; the junction with `target` always gets a fresh
    /// gap of its own.
    pub fn insert(
        &mut self,
        segment: Segment,
        target: RecordId,
        direction: Direction,
    ) -> Result<(), GraphError> {
        self.ensure_attached(target)?;

        let flank = match direction {
            Direction::After => self[target].next,
            Direction::Before => self[target].prev,
        };
        self.ensure_gap_flank(flank, target)?;

        let span = self.connected_span(segment.left, segment.right)?;
        let object = self[target].object.clone();
        for &id in &span {
            self[id].object = object.clone();
        }

        let displaced = self.consume_flank(flank, target, direction == Direction::Before);

        let junction = self.fresh_gap(&object);
        match direction {
            Direction::After => {
                self.link(target, junction);
                self.link(junction, segment.left);
                if let Some(n) = displaced {
                    let outer = self.fresh_gap(&object);
                    self.link(segment.right, outer);
                    self.link(outer, n);
                }
            }
            Direction::Before => {
                if let Some(n) = displaced {
                    let outer = self.fresh_gap(&object);
                    self.link(n, outer);
                    self.link(outer, segment.left);
                }
                self.link(segment.right, junction);
                self.link(junction, target);
            }
        }

        // Inserting at the very front makes the segment the new head.
        if self[segment.left].prev.is_none() {
            self.objects.insert(object, segment.left);
        }

        for &id in &span {
            self.register_component(id)?;
        }
        Ok(())
    }

    /// Reverse the inclusive range `[left, right]` in place, flipping each
    /// placement's orientation when `complement` is set. Source coordinate
    /// values are untouched; only record order and the orientation flag
    /// change. Flanking gaps are consumed and recreated on the sides that
    /// had them, and `right` becomes the object head if the segment was at
    /// the front.
    pub fn reverse(
        &mut self,
        left: RecordId,
        right: RecordId,
        complement: bool,
    ) -> Result<(), GraphError> {
        let span = self.connected_span(left, right)?;
        let left_flank = self[left].prev;
        let right_flank = self[right].next;
        self.ensure_gap_flank(left_flank, left)?;
        self.ensure_gap_flank(right_flank, right)?;

        let object = self[left].object.clone();
        let before = self.consume_flank(left_flank, left, true);
        let after = self.consume_flank(right_flank, right, false);

        // Swap every link in the span; `right` is now the entry point on
        // the object's original left side, `left` on its right.
        for &id in &span {
            let record = &mut self[id];
            std::mem::swap(&mut record.prev, &mut record.next);
            if complement {
                if let Payload::Placement { orientation, .. } = &mut record.payload {
                    *orientation = orientation.flipped();
                }
            }
        }

        match before {
            None => {
                self.objects.insert(object.clone(), right);
            }
            Some(b) => {
                let gap = self.fresh_gap(&object);
                self.link(b, gap);
                self.link(gap, right);
            }
        }
        if let Some(a) = after {
            let gap = self.fresh_gap(&object);
            self.link(left, gap);
            self.link(gap, a);
        }

        Ok(())
    }

    /// Register a detached segment as a brand-new object named `object`.
    pub fn create(&mut self, object: &str, segment: Segment) -> Result<(), GraphError> {
        if self.objects.contains_key(object) {
            return Err(GraphError::ObjectExists {
                object: object.to_string(),
            });
        }

        let span = self.connected_span(segment.left, segment.right)?;
        for &id in &span {
            self[id].object = object.to_string();
        }
        self.objects.insert(object.to_string(), segment.left);
        for &id in &span {
            self.register_component(id)?;
        }
        Ok(())
    }

    /// Divide a placement into two at source coordinate `position`,
    /// bridged by a fresh gap, both halves staying in place within the
    /// object. `position` becomes the last base of the lower half, so it
    /// must satisfy `start <= position < end` (either resulting half must
    /// be non-empty).
    ///
    /// For a reversed placement the half carrying the higher source
    /// coordinates stays first in object order, preserving the object's
    /// base order.
    pub fn split(&mut self, target: RecordId, position: u64) -> Result<(), GraphError> {
        let (name, start, end, orientation) = match &self[target].payload {
            Payload::Placement {
                name,
                start,
                end,
                orientation,
            } => (name.clone(), *start, *end, *orientation),
            Payload::Gap { .. } => return Err(GraphError::SplitNonSequence),
        };

        if position < start || position >= end {
            return Err(GraphError::SplitOutOfRange {
                key: format!("{name}:{start}-{end}"),
                position,
            });
        }

        let low = (start, position);
        let high = (position + 1, end);
        for (s, e) in [low, high] {
            let key = format!("{name}:{s}-{e}");
            if self.lookup(&key).is_some() {
                return Err(GraphError::DuplicateKey { key });
            }
        }

        let (first, second) = match orientation {
            Orientation::Forward => (low, high),
            Orientation::Reverse => (high, low),
        };

        self.unregister_component(target);

        let object = self[target].object.clone();
        let tail = self[target].next;

        if let Payload::Placement { start, end, .. } = &mut self[target].payload {
            *start = first.0;
            *end = first.1;
        }

        let half = self.alloc(Record::new(
            object.clone(),
            Payload::Placement {
                name,
                start: second.0,
                end: second.1,
                orientation,
            },
        ));
        let gap = self.fresh_gap(&object);
        self.link(target, gap);
        self.link(gap, half);
        if let Some(t) = tail {
            self.link(half, t);
        }

        self.register_component(target)?;
        self.register_component(half)?;
        Ok(())
    }
}
