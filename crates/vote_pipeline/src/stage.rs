//! The staged pipeline abstraction (§3 "Pipeline stage", §9 design notes).
//!
//! `Stage` is the Rust translation of the original's linked
//! `vote_pipeline_t` chain: a tagged-variant stage with a virtual
//! `on_input` method becomes a trait object. Stages are built bottom-up
//! once per verification call and dropped when the call returns — Rust
//! ownership (`Box<dyn Stage>`) replaces the manual `vote_pipeline_del`
//! chain walk.

use std::cell::RefCell;

use vote_algo::{abstractor, refinery};
use vote_core::ensemble::PostProcess;
use vote_core::{Mapping, Outcome, Tree};

/// One link in a verification pipeline: given a mapping, produce an
/// outcome, possibly after forwarding to (and combining with) a sink.
pub trait Stage {
    fn on_input(&self, m: &mut Mapping) -> Outcome;
}

/// Applies the ensemble's output transform, then hands the mapping to the
/// user-supplied predicate. The last stage of every chain.
pub struct PostProcessStage<'a> {
    tag: PostProcess,
    nb_trees: usize,
    predicate: RefCell<Box<dyn FnMut(&mut Mapping) -> Outcome + 'a>>,
}

impl<'a> PostProcessStage<'a> {
    pub fn new(
        tag: PostProcess,
        nb_trees: usize,
        predicate: Box<dyn FnMut(&mut Mapping) -> Outcome + 'a>,
    ) -> Self {
        PostProcessStage {
            tag,
            nb_trees,
            predicate: RefCell::new(predicate),
        }
    }
}

impl<'a> Stage for PostProcessStage<'a> {
    fn on_input(&self, m: &mut Mapping) -> Outcome {
        vote_algo::postproc::apply(self.tag, m, self.nb_trees);
        (self.predicate.borrow_mut())(m)
    }
}

/// Exact partitioner for a single tree (§4.3), forwarding each leaf mapping
/// to `sink`.
pub struct RefineryStage<'a> {
    tree: &'a Tree,
    sink: Box<dyn Stage + 'a>,
}

impl<'a> RefineryStage<'a> {
    pub fn new(tree: &'a Tree, sink: Box<dyn Stage + 'a>) -> Self {
        RefineryStage { tree, sink }
    }
}

impl<'a> Stage for RefineryStage<'a> {
    fn on_input(&self, m: &mut Mapping) -> Outcome {
        refinery::refine(self.tree, m, &mut |leaf| self.sink.on_input(leaf))
    }
}

/// Sound joiner over a run of trees (§4.4), probing `postproc` first and
/// only falling back to `sink` (exact refinement) on `Unsure`.
pub struct AbstractorStage<'a> {
    trees: &'a [Tree],
    sink: Box<dyn Stage + 'a>,
    postproc: &'a dyn Stage,
}

impl<'a> AbstractorStage<'a> {
    pub fn new(trees: &'a [Tree], sink: Box<dyn Stage + 'a>, postproc: &'a dyn Stage) -> Self {
        AbstractorStage {
            trees,
            sink,
            postproc,
        }
    }
}

impl<'a> Stage for AbstractorStage<'a> {
    fn on_input(&self, m: &mut Mapping) -> Outcome {
        let outcome = abstractor::probe(self.trees, m, &mut |join| self.postproc.on_input(join));

        if outcome == Outcome::Unsure {
            self.sink.on_input(m)
        } else {
            outcome
        }
    }
}

/// Forwards to a borrowed stage. Used to thread a single shared
/// post-processing stage into multiple owning positions in a chain (the
/// abstractor's `postproc` argument, and the final refinery's `sink` in an
/// `absref` chain, both point at the same underlying [`PostProcessStage`]).
pub struct RefStage<'a>(pub &'a dyn Stage);

impl<'a> Stage for RefStage<'a> {
    fn on_input(&self, m: &mut Mapping) -> Outcome {
        self.0.on_input(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vote_core::Bound;

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
    fn refinery_stage_visits_every_exact_leaf() {
        let t = stump();
        let pp = PostProcessStage::new(
            PostProcess::None,
            1,
            Box::new(|_m: &mut Mapping| Outcome::Pass),
        );
        let refinery = RefineryStage::new(&t, Box::new(pp));

        let mut m = Mapping::new(1, 1);
        m.inputs[0] = Bound::new(0.0, 1.0);
        assert_eq!(refinery.on_input(&mut m), Outcome::Pass);
    }

    #[test]
    fn abstractor_stage_defers_to_refinery_on_unsure() {
        let t = stump();
        let trees = std::slice::from_ref(&t);

        let calls = RefCell::new(0usize);
        let pp = PostProcessStage::new(
            PostProcess::None,
            1,
            Box::new(|m: &mut Mapping| {
                if m.outputs[0].is_precise() {
                    Outcome::Pass
                } else {
                    Outcome::Unsure
                }
            }),
        );
        let refinery = RefineryStage::new(&t, Box::new(pp));
        let counting_pp = CountingStage {
            calls: &calls,
            inner: PostProcessStage::new(
                PostProcess::None,
                1,
                Box::new(|m: &mut Mapping| {
                    if m.outputs[0].is_precise() {
                        Outcome::Pass
                    } else {
                        Outcome::Unsure
                    }
                }),
            ),
        };
        let abs = AbstractorStage::new(trees, Box::new(refinery), &counting_pp);

        let mut m = Mapping::new(1, 1);
        m.inputs[0] = Bound::new(0.0, 1.0);
        assert_eq!(abs.on_input(&mut m), Outcome::Pass);
        assert_eq!(*calls.borrow(), 1);
    }

    struct CountingStage<'a> {
        calls: &'a RefCell<usize>,
        inner: PostProcessStage<'a>,
    }

    impl<'a> Stage for CountingStage<'a> {
        fn on_input(&self, m: &mut Mapping) -> Outcome {
            *self.calls.borrow_mut() += 1;
            self.inner.on_input(m)
        }
    }
}
