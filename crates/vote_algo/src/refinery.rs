//! Exact per-tree input-space partitioner (§4.3).
//!
//! Descends a single tree, narrowing the current mapping's input box at
//! every split until a leaf is reached, then hands the (now exact) mapping
//! off to `sink`. Chooses the narrower child first at each split so that
//! the emitted boxes tend to be small early, which matters for callers that
//! stop at the first conclusive outcome.
//!
//! Grounded line-by-line on `vote_refinary.c`.

use vote_core::{Mapping, Outcome, Tree};

/// Descend into a leaf-free or leaf node, invoking `sink` once per leaf
/// reached. Returns `false` as soon as `sink` returns anything other than
/// [`Outcome::Pass`], short-circuiting the remaining descent.
///
/// Recursion depth is bounded by the tree's depth, not by node count; this
/// mirrors the original's plain recursion.
pub fn decend<F>(tree: &Tree, node: usize, m: &mut Mapping, sink: &mut F) -> bool
where
    F: FnMut(&mut Mapping) -> Outcome,
{
    if tree.is_leaf(node) {
        let value = tree.leaf_value(node);
        for (out, v) in m.outputs.iter_mut().zip(&value) {
            out.lo += v;
            out.hi += v;
        }
        return sink(m) == Outcome::Pass;
    }

    let threshold = tree.threshold(node);
    let dim = tree.feature(node);
    let right_width = m.inputs[dim].hi - threshold;
    let left_width = threshold - m.inputs[dim].lo;

    if left_width < right_width {
        decend_left(tree, node, m, sink)
    } else {
        decend_right(tree, node, m, sink)
    }
}

/// Descend left split first: `[lower, threshold]`, then right:
/// `(threshold, upper]`.
fn decend_left<F>(tree: &Tree, node: usize, m: &mut Mapping, sink: &mut F) -> bool
where
    F: FnMut(&mut Mapping) -> Outcome,
{
    let threshold = tree.threshold(node);
    let dim = tree.feature(node);
    let left_id = tree.left(node);
    let right_id = tree.right(node);

    if m.inputs[dim].lo <= threshold {
        let mut split = m.clone();
        if split.inputs[dim].hi > threshold {
            split.inputs[dim].hi = threshold;
        }
        if !decend(tree, left_id, &mut split, sink) {
            return false;
        }
    }

    if m.inputs[dim].hi > threshold {
        if m.inputs[dim].lo < threshold {
            m.inputs[dim].lo = vote_core::real::next_after_pos(threshold);
        }
        return decend(tree, right_id, m, sink);
    }
    true
}

/// Descend right split first: `(threshold, upper]`, then left:
/// `[lower, threshold]`.
fn decend_right<F>(tree: &Tree, node: usize, m: &mut Mapping, sink: &mut F) -> bool
where
    F: FnMut(&mut Mapping) -> Outcome,
{
    let threshold = tree.threshold(node);
    let dim = tree.feature(node);
    let left_id = tree.left(node);
    let right_id = tree.right(node);

    if m.inputs[dim].hi > threshold {
        let mut split = m.clone();
        if split.inputs[dim].lo < threshold {
            split.inputs[dim].lo = vote_core::real::next_after_pos(threshold);
        }
        if !decend(tree, right_id, &mut split, sink) {
            return false;
        }
    }

    if m.inputs[dim].lo <= threshold {
        if m.inputs[dim].hi > threshold {
            m.inputs[dim].hi = threshold;
        }
        return decend(tree, left_id, m, sink);
    }
    true
}

/// Exhaustively partition `tree`'s input space within `m`'s current input
/// box, passing each exact leaf mapping to `sink`. Returns
/// [`Outcome::Pass`] iff `sink` returned `Pass` for every sub-box, else
/// [`Outcome::Fail`] (the refinery itself never reports `Unsure`: every
/// leaf it reaches is an exact point in output space).
pub fn refine<F>(tree: &Tree, m: &mut Mapping, sink: &mut F) -> Outcome
where
    F: FnMut(&mut Mapping) -> Outcome,
{
    if decend(tree, Tree::ROOT, m, sink) {
        Outcome::Pass
    } else {
        Outcome::Fail
    }
}
