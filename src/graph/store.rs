use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use crate::graph::errors::GraphError;
use crate::graph::record::{Record, RecordId};

/// In-memory AGP assembly graph.
///
/// Records live in a slab arena and form one doubly-linked list per object,
/// threaded through [`Record::prev`]/[`Record::next`] handles. Two indices
/// sit on top: the *object index* maps each object name to the head of its
/// list, and the *component index* maps a placement's composite key
/// (`"name:start-end"`) to its record.
///
/// The segment operations in [`crate::graph::ops`] keep both indices in
/// step with the links; [`check_invariants`](Self::check_invariants)
/// verifies that agreement and is exercised heavily by the test suite.
#[derive(Debug, Default)]
pub struct AgpGraph {
    arena: Vec<Option<Record>>,
    free: Vec<usize>,
    pub(crate) objects: HashMap<String, RecordId>,
    pub(crate) components: HashMap<String, RecordId>,
}

impl AgpGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records in the arena.
    pub fn record_count(&self) -> usize {
        self.arena.len() - self.free.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Allocate an arena slot for a detached record.
    pub(crate) fn alloc(&mut self, record: Record) -> RecordId {
        match self.free.pop() {
            Some(slot) => {
                self.arena[slot] = Some(record);
                RecordId(slot)
            }
            None => {
                self.arena.push(Some(record));
                RecordId(self.arena.len() - 1)
            }
        }
    }

    /// Destroy a record, returning its slot to the free list. The caller is
    /// responsible for having already unlinked it and cleared any index
    /// entries pointing at it.
    pub(crate) fn destroy(&mut self, id: RecordId) -> Record {
        let record = self.arena[id.0].take().expect("destroy of freed record");
        self.free.push(id.0);
        record
    }

    /// Destroy a detached chain starting at `head`, following `next` links.
    pub(crate) fn destroy_chain(&mut self, head: RecordId) {
        let mut cur = Some(head);
        while let Some(id) = cur {
            cur = self[id].next;
            self.destroy(id);
        }
    }

    /// Head record of the named object's list.
    pub fn head(&self, object: &str) -> Option<RecordId> {
        self.objects.get(object).copied()
    }

    /// O(1) component lookup by composite key.
    pub fn lookup(&self, key: &str) -> Option<RecordId> {
        self.components.get(key).copied()
    }

    /// All component keys currently registered, in arbitrary order.
    pub fn component_keys(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Object names in lexicographic order, the order every whole-graph
    /// walk (serialization, simplify) uses for determinism.
    pub fn object_names_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.keys().cloned().collect();
        names.sort();
        names
    }

    /// Tail of the list containing `id`, following `next` links.
    pub fn tail_from(&self, id: RecordId) -> RecordId {
        let mut cur = id;
        while let Some(next) = self[cur].next {
            cur = next;
        }
        cur
    }

    /// Record handles of an object's list in order, starting at `head`.
    pub fn walk(&self, head: RecordId) -> Vec<RecordId> {
        let mut ids = Vec::new();
        let mut cur = Some(head);
        while let Some(id) = cur {
            ids.push(id);
            cur = self[id].next;
        }
        ids
    }

    /// Append a parsed record to the tail of its named object's list,
    /// creating the object on first sight. Placements are also registered
    /// in the component index; a key collision is an error because a source
    /// range may be placed at most once across the whole graph.
    pub fn append(&mut self, record: Record) -> Result<RecordId, GraphError> {
        let key = record.key();
        let object = record.object.clone();
        let id = self.alloc(record);

        if let Some(key) = key {
            if self.components.contains_key(&key) {
                self.destroy(id);
                return Err(GraphError::DuplicateKey { key });
            }
            self.components.insert(key, id);
        }

        match self.objects.get(&object) {
            None => {
                self.objects.insert(object, id);
            }
            Some(&head) => {
                let tail = self.tail_from(head);
                self[tail].next = Some(id);
                self[id].prev = Some(tail);
            }
        }

        Ok(id)
    }

    pub(crate) fn register_component(
        &mut self,
        id: RecordId,
    ) -> Result<(), GraphError> {
        if let Some(key) = self[id].key() {
            if let Some(&existing) = self.components.get(&key) {
                if existing != id {
                    return Err(GraphError::DuplicateKey { key });
                }
            }
            self.components.insert(key, id);
        }
        Ok(())
    }

    pub(crate) fn unregister_component(&mut self, id: RecordId) {
        if let Some(key) = self[id].key() {
            self.components.remove(&key);
        }
    }

    /// Recompute `part_number` and the object-local coordinates of every
    /// record: parts count from 1 and spans accumulate from offset 1, gaps
    /// advancing by their length and placements by the width of their
    /// source range. This is the explicit canonicalization step the writer
    /// runs before emitting; edits leave these fields stale on purpose.
    pub fn renumber(&mut self) {
        for name in self.object_names_sorted() {
            let Some(head) = self.head(&name) else { continue };
            let mut part = 1u32;
            let mut pos = 1u64;
            for id in self.walk(head) {
                let width = self[id].payload.width();
                let record = &mut self[id];
                record.part_number = part;
                record.object_start = pos;
                record.object_end = pos.saturating_add(width.saturating_sub(1));
                part += 1;
                pos = pos.saturating_add(width);
            }
        }
    }

    /// Verify that the links and both indices agree:
    /// every head is reachable only as a head, every record reachable from
    /// an object head carries that object's name, every reachable placement
    /// is indexed under its exact key, and the component index holds
    /// nothing else. Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen_placements = 0usize;

        for (name, &head) in &self.objects {
            if self[head].prev.is_some() {
                return Err(format!("head of {name} has a prev link"));
            }
            let mut prev = None;
            for id in self.walk(head) {
                let record = &self[id];
                if record.object != *name {
                    return Err(format!(
                        "record {} reachable from {name} is owned by {}",
                        record.display_key(),
                        record.object
                    ));
                }
                if record.prev != prev {
                    return Err(format!(
                        "broken back-link at {} in {name}",
                        record.display_key()
                    ));
                }
                if let Some(p) = prev {
                    if self[p].is_gap() && record.is_gap() {
                        return Err(format!("adjacent gaps in {name}"));
                    }
                }
                if let Some(key) = record.key() {
                    seen_placements += 1;
                    if self.components.get(&key) != Some(&id) {
                        return Err(format!("placement {key} missing from component index"));
                    }
                }
                prev = Some(id);
            }
        }

        if self.components.len() != seen_placements {
            return Err(format!(
                "component index holds {} entries but {} placements are reachable",
                self.components.len(),
                seen_placements
            ));
        }

        Ok(())
    }
}

impl Index<RecordId> for AgpGraph {
    type Output = Record;

    fn index(&self, id: RecordId) -> &Record {
        self.arena[id.0].as_ref().expect("stale record handle")
    }
}

impl IndexMut<RecordId> for AgpGraph {
    fn index_mut(&mut self, id: RecordId) -> &mut Record {
        self.arena[id.0].as_mut().expect("stale record handle")
    }
}
