//! Node arena and indexable binary min-heap backing the simplifier.
//!
//! A generic priority queue only offers pop-min; the reduction loop also
//! needs O(log n) re-keying of arbitrary members as neighbor areas change.
//! So every node carries its current heap slot, and every sift swap keeps
//! both swapped slots in sync. Nodes live in a single arena and link to each
//! other by index, which also serves as the virtual doubly linked list of
//! surviving points.

pub(crate) type NodeId = usize;

#[derive(Debug)]
pub(crate) struct Node {
    /// Current significance score: twice the triangle area formed with the
    /// node's surviving neighbors. Endpoints hold +inf and never come up
    /// for removal.
    pub area: f64,
    /// Left surviving neighbor in the virtual list, None for the head.
    pub prev: Option<NodeId>,
    /// Right surviving neighbor, None for the tail.
    pub next: Option<NodeId>,
    /// Position in the heap's backing array. Stale once the node is popped.
    slot: usize,
}

/// Min-heap over an arena of [`Node`]s, keyed by `area`.
///
/// Ids are handed out densely in insertion order, so when nodes are inserted
/// in input order the id doubles as the original point index.
pub(crate) struct AreaHeap {
    nodes: Vec<Node>,
    heap: Vec<NodeId>,
}

impl AreaHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        AreaHeap {
            nodes: Vec::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Append a new unlinked node to the arena and push it onto the heap.
    pub fn insert(&mut self, area: f64) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            area,
            prev: None,
            next: None,
            slot: self.heap.len(),
        });
        self.heap.push(id);
        self.sift_up(self.nodes[id].slot);
        id
    }

    /// Chain two nodes together in the virtual list.
    pub fn link(&mut self, prev: NodeId, next: NodeId) {
        self.nodes[prev].next = Some(next);
        self.nodes[next].prev = Some(prev);
    }

    /// Splice a node out of the virtual list, making its neighbors adjacent.
    pub fn unlink(&mut self, id: NodeId) {
        let (prev, next) = (self.nodes[id].prev, self.nodes[id].next);
        if let Some(prev) = prev {
            self.nodes[prev].next = next;
        }
        if let Some(next) = next {
            self.nodes[next].prev = prev;
        }
    }

    /// Remove and return the minimum-area member, or None if the heap is
    /// empty. The returned node's arena record (links included) stays intact.
    pub fn pop_min(&mut self) -> Option<NodeId> {
        let last = self.heap.pop()?;
        if self.heap.is_empty() {
            return Some(last);
        }
        let root = std::mem::replace(&mut self.heap[0], last);
        self.nodes[last].slot = 0;
        self.sift_down(0);
        Some(root)
    }

    /// Re-key a current member. Sifts up on decrease, down on increase.
    pub fn update(&mut self, id: NodeId, area: f64) {
        let slot = self.nodes[id].slot;
        debug_assert_eq!(self.heap.get(slot).copied(), Some(id));

        let grew = area >= self.nodes[id].area;
        self.nodes[id].area = area;
        if grew {
            self.sift_down(slot);
        } else {
            self.sift_up(slot);
        }
    }

    /// Remove an arbitrary member, replacing it with the last heap entry and
    /// re-sifting in whichever direction restores order. The reduction loop
    /// itself only needs update/pop; this completes the container contract.
    pub fn remove(&mut self, id: NodeId) {
        let slot = self.nodes[id].slot;
        debug_assert_eq!(self.heap.get(slot).copied(), Some(id));

        if let Some(last) = self.heap.pop() {
            if last == id {
                return;
            }
            self.heap[slot] = last;
            self.nodes[last].slot = slot;
            if self.nodes[last].area < self.nodes[id].area {
                self.sift_up(slot);
            } else {
                self.sift_down(slot);
            }
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.nodes[self.heap[parent]].area <= self.nodes[self.heap[slot]].area {
                break;
            }
            self.swap_slots(parent, slot);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;

            let mut smallest = slot;
            if left < self.heap.len()
                && self.nodes[self.heap[left]].area < self.nodes[self.heap[smallest]].area
            {
                smallest = left;
            }
            if right < self.heap.len()
                && self.nodes[self.heap[right]].area < self.nodes[self.heap[smallest]].area
            {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap_slots(slot, smallest);
            slot = smallest;
        }
    }

    // Both slot fields must track the exchange or update/remove silently
    // operate on the wrong entries.
    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.nodes[self.heap[a]].slot = a;
        self.nodes[self.heap[b]].slot = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_heap_invariants(heap: &AreaHeap) {
        for (slot, &id) in heap.heap.iter().enumerate() {
            assert_eq!(heap.nodes[id].slot, slot, "slot out of sync for node {id}");
            if slot > 0 {
                let parent = heap.heap[(slot - 1) / 2];
                assert!(
                    heap.nodes[parent].area <= heap.nodes[id].area,
                    "heap order violated at slot {slot}"
                );
            }
        }
    }

    fn drain_areas(heap: &mut AreaHeap) -> Vec<f64> {
        let mut areas = Vec::new();
        while let Some(id) = heap.pop_min() {
            assert_heap_invariants(heap);
            areas.push(heap.node(id).area);
        }
        areas
    }

    #[test]
    fn pop_empty_is_none() {
        let mut heap = AreaHeap::with_capacity(0);
        assert!(heap.pop_min().is_none());
    }

    #[test]
    fn drains_in_ascending_order() {
        let mut heap = AreaHeap::with_capacity(8);
        for area in [5.0, 1.0, 4.0, 8.0, 2.0, 7.0, 3.0, 6.0] {
            heap.insert(area);
            assert_heap_invariants(&heap);
        }
        assert_eq!(
            drain_areas(&mut heap),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]
        );
    }

    #[test]
    fn update_resifts_both_directions() {
        let mut heap = AreaHeap::with_capacity(4);
        let a = heap.insert(1.0);
        let b = heap.insert(2.0);
        let c = heap.insert(3.0);
        let d = heap.insert(4.0);

        heap.update(a, 10.0); // grew, sifts toward the leaves
        heap.update(d, 0.5); // shrank, sifts toward the root
        assert_heap_invariants(&heap);

        assert_eq!(heap.pop_min(), Some(d));
        assert_eq!(heap.pop_min(), Some(b));
        assert_eq!(heap.pop_min(), Some(c));
        assert_eq!(heap.pop_min(), Some(a));
    }

    #[test]
    fn remove_arbitrary_member() {
        let mut heap = AreaHeap::with_capacity(8);
        let ids: Vec<NodeId> = [5.0, 1.0, 4.0, 8.0, 2.0, 7.0]
            .into_iter()
            .map(|area| heap.insert(area))
            .collect();

        heap.remove(ids[3]); // 8.0, a leaf
        assert_heap_invariants(&heap);
        heap.remove(ids[1]); // 1.0, the root
        assert_heap_invariants(&heap);

        assert_eq!(drain_areas(&mut heap), vec![2.0, 4.0, 5.0, 7.0]);
    }

    #[test]
    fn remove_last_member() {
        let mut heap = AreaHeap::with_capacity(1);
        let id = heap.insert(1.0);
        heap.remove(id);
        assert_eq!(heap.len(), 0);
        assert!(heap.pop_min().is_none());
    }

    #[test]
    fn link_unlink_splices_neighbors() {
        let mut heap = AreaHeap::with_capacity(3);
        let a = heap.insert(f64::INFINITY);
        let b = heap.insert(1.0);
        let c = heap.insert(f64::INFINITY);
        heap.link(a, b);
        heap.link(b, c);

        heap.unlink(b);
        assert_eq!(heap.node(a).next, Some(c));
        assert_eq!(heap.node(c).prev, Some(a));
        // The unlinked node keeps its own links for later traversal.
        assert_eq!(heap.node(b).prev, Some(a));
        assert_eq!(heap.node(b).next, Some(c));
    }

    #[test]
    fn randomized_drain_matches_sort() {
        // Deterministic pseudo-random areas, no rng dependency needed.
        let mut seed = 0x2545f4914f6cdd1du64;
        let mut areas = Vec::with_capacity(256);
        let mut heap = AreaHeap::with_capacity(256);
        for _ in 0..256 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let area = (seed % 10_000) as f64 / 10.0;
            areas.push(area);
            heap.insert(area);
        }
        assert_heap_invariants(&heap);

        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(drain_areas(&mut heap), areas);
    }
}
