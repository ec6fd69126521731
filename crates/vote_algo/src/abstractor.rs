//! Sound over-approximator (§4.4): joins a tree (or a run of trees) into a
//! single output envelope without partitioning the input space.
//!
//! Grounded line-by-line on `vote_abstract.c`.

use vote_core::{Bound, Mapping, Outcome, Tree};

/// The envelope of every leaf value reachable from `inputs`, for one tree.
///
/// `outputs` is overwritten, not accumulated into: callers summing across
/// trees add this tree's envelope onto their running total themselves (see
/// [`join_trees`]).
pub fn join_tree(tree: &Tree, inputs: &[Bound], outputs: &mut [Bound]) {
    for o in outputs.iter_mut() {
        o.lo = vote_core::real::INFINITY;
        o.hi = vote_core::real::NEG_INFINITY;
    }
    join_decend(tree, Tree::ROOT, inputs, outputs);
}

fn join_decend(tree: &Tree, node: usize, inputs: &[Bound], outputs: &mut [Bound]) {
    if tree.is_leaf(node) {
        let value = tree.leaf_value(node);
        for (o, v) in outputs.iter_mut().zip(&value) {
            o.lo = o.lo.min(*v);
            o.hi = o.hi.max(*v);
        }
        return;
    }

    let threshold = tree.threshold(node);
    let dim = tree.feature(node);

    if inputs[dim].lo <= threshold {
        join_decend(tree, tree.left(node), inputs, outputs);
    }
    if inputs[dim].hi > threshold {
        join_decend(tree, tree.right(node), inputs, outputs);
    }
}

/// The sum, across `trees`, of each tree's envelope for `inputs`. This is a
/// sound over-approximation of the ensemble's raw (pre-post-process) output
/// for every concrete point inside `inputs`.
pub fn join_trees(trees: &[Tree], inputs: &[Bound], outputs: &mut [Bound]) {
    let n_out = outputs.len();
    let mut tree_outputs = vec![Bound::ZERO; n_out];

    for tree in trees {
        join_tree(tree, inputs, &mut tree_outputs);
        for (o, t) in outputs.iter_mut().zip(&tree_outputs) {
            o.lo += t.lo;
            o.hi += t.hi;
        }
    }
}

/// Probe `trees` abstractly from the mapping's current (possibly already
/// partially-refined) output accumulator, running the result through
/// `postproc`. Returns [`Outcome::Unsure`] when the envelope is too loose
/// to decide; the caller is then expected to fall back to exact refinement
/// of the first of `trees` (§4.4's probe-then-refine hand-off).
pub fn probe<G>(trees: &[Tree], m: &Mapping, postproc: &mut G) -> Outcome
where
    G: FnMut(&mut Mapping) -> Outcome,
{
    let mut join = Mapping {
        inputs: m.inputs.clone(),
        outputs: m.outputs.clone(),
    };

    join_trees(trees, &m.inputs, &mut join.outputs);
    postproc(&mut join)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vote_core::Tree;

    fn stump() -> Tree {
        Tree::from_parts(
            1,
            1,
            vec![1, -1, -1],
            vec![2, -1, -1],
            vec![0, -1, -1],
            vec![0.5, 0.0, 0.0],
            vec![vec![0.0], vec![0.0], vec![1.0]],
            false,
        )
        .unwrap()
    }

    #[test]
    fn join_tree_envelopes_both_leaves_for_a_straddling_box() {
        let t = stump();
        let mut out = vec![Bound::ZERO];
        join_tree(&t, &[Bound::new(0.0, 1.0)], &mut out);
        assert_eq!(out[0], Bound::new(0.0, 1.0));
    }

    #[test]
    fn join_tree_is_exact_on_a_single_sided_box() {
        let t = stump();
        let mut out = vec![Bound::ZERO];
        join_tree(&t, &[Bound::new(0.0, 0.4)], &mut out);
        assert_eq!(out[0], Bound::new(0.0, 0.0));
    }

    #[test]
    fn join_trees_sums_independent_envelopes() {
        let t = stump();
        let trees = vec![t.clone(), t];
        let mut out = vec![Bound::ZERO];
        join_trees(&trees, &[Bound::new(0.0, 1.0)], &mut out);
        assert_eq!(out[0], Bound::new(0.0, 2.0));
    }

    #[test]
    fn probe_defers_to_postproc_and_can_report_unsure() {
        let t = stump();
        let m = Mapping::new(1, 1);
        let mut m = m;
        m.inputs[0] = Bound::new(0.0, 1.0);

        let outcome = probe(std::slice::from_ref(&t), &m, &mut |j: &mut Mapping| {
            if j.outputs[0].is_precise() {
                Outcome::Pass
            } else {
                Outcome::Unsure
            }
        });
        assert_eq!(outcome, Outcome::Unsure);
    }
}
