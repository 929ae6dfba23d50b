//! Visvalingam-Whyatt point elimination.
//!
//! Iteratively removes the point whose triangle with its two current
//! neighbors has the smallest area, i.e. the visually least significant
//! surviving point. Neighbor areas are re-scored after every removal, with
//! the popped area folded in as a floor so the sequence of removed areas
//! never decreases (the "effective area" variant of the algorithm).

use crate::heap::{AreaHeap, NodeId};
use crate::point::Point;

/// Reduce `points` to `min_keep` points, keeping the most significant ones.
///
/// Returns the input unchanged when it already fits the target. `min_keep`
/// values below 2 are treated as 2: the two endpoints are mandatory
/// survivors and the smallest meaningful output. The result is always a
/// subsequence of the input in original order, with both endpoints present.
/// O(n log n) time, O(n) space.
pub fn simplify<P: Point + Clone>(points: &[P], min_keep: usize) -> Vec<P> {
    if points.len() <= min_keep {
        return points.to_vec();
    }
    let min_keep = min_keep.max(2);
    if points.len() <= min_keep {
        return points.to_vec();
    }

    let mut heap = build_list(points);
    eliminate(&mut heap, points, min_keep, |_, _| {});

    // Unlinking never reorders survivors, so walking the list from the head
    // yields the kept points in original order.
    let mut kept = Vec::with_capacity(min_keep);
    let mut cursor = Some(0);
    while let Some(id) = cursor {
        kept.push(points[id].clone());
        cursor = heap.node(id).next;
    }
    kept
}

/// Score every point with the area at which the elimination would remove it.
///
/// Endpoints report `f64::INFINITY`. Larger means more significant; the
/// scores are the max-merged removal areas, so thresholding on them yields
/// the same survivor sets the full run would produce.
pub fn effective_areas<P: Point>(points: &[P]) -> Vec<f64> {
    let mut areas = vec![f64::INFINITY; points.len()];
    if points.len() > 2 {
        let mut heap = build_list(points);
        eliminate(&mut heap, points, 2, |index, area| areas[index] = area);
    }
    areas
}

/// Twice the area of the triangle abc. The absolute value makes the score
/// independent of winding.
fn double_triangle_area<P: Point>(a: &P, b: &P, c: &P) -> f64 {
    ((b.y() - a.y()) * (c.x() - a.x()) - (b.x() - a.x()) * (c.y() - a.y())).abs()
}

/// Build the node arena in input order (so node id == point index), linked
/// into the initial virtual list. Endpoints get infinite area; interior
/// point i is scored against its original neighbors i-1 and i+1.
fn build_list<P: Point>(points: &[P]) -> AreaHeap {
    let n = points.len();
    let mut heap = AreaHeap::with_capacity(n);

    let mut prev = heap.insert(f64::INFINITY);
    for i in 1..n - 1 {
        let area = double_triangle_area(&points[i - 1], &points[i], &points[i + 1]);
        let id = heap.insert(area);
        heap.link(prev, id);
        prev = id;
    }
    let tail = heap.insert(f64::INFINITY);
    heap.link(prev, tail);

    heap
}

/// Core reduction loop: pop the least significant survivor, splice it out of
/// the list, and re-score its neighbors. `on_remove` observes each removal
/// as `(point index, removal area)`, in removal order.
fn eliminate<P: Point>(
    heap: &mut AreaHeap,
    points: &[P],
    min_keep: usize,
    mut on_remove: impl FnMut(NodeId, f64),
) {
    let mut surviving = points.len();

    while surviving > min_keep {
        let Some(current) = heap.pop_min() else {
            break;
        };

        let node = heap.node(current);
        let removed_area = node.area;
        let (Some(prev), Some(next)) = (node.prev, node.next) else {
            // An endpoint surfaced: only unremovable points remain.
            break;
        };

        heap.unlink(current);
        surviving -= 1;
        on_remove(current, removed_area);

        // Re-score both neighbors against their new adjacency. Taking the
        // max with the just-removed area keeps removal areas non-decreasing
        // over the run; a bare recomputation could rank a point below one
        // that was already removed.
        if let Some(left) = heap.node(prev).prev {
            let area = double_triangle_area(&points[left], &points[prev], &points[next]);
            heap.update(prev, area.max(removed_area));
        }
        if let Some(right) = heap.node(next).next {
            let area = double_triangle_area(&points[prev], &points[next], &points[right]);
            heap.update(next, area.max(removed_area));
        }
    }
}
