//! The ensemble driver (§4.6): `forall`, `absref`, `eval`, `approximate`.
//!
//! Grounded on `vote_ensemble.c`'s `vote_ensemble_forall`/`_absref`/`_eval`/
//! `_approximate`. Wires the `Stage` chains from [`crate::stage`] once per
//! call and logs counters at `info!`/`debug!` level; the core algorithms
//! themselves never log (§7's "the core never logs" constraint lives here,
//! at the driver boundary, not in `vote_algo`).

use std::cell::RefCell;
use std::time::Instant;

use log::{debug, info, warn};

use vote_core::{Bound, Ensemble, Mapping, Outcome, Real};

use crate::error::PipelineError;
use crate::stage::{AbstractorStage, PostProcessStage, RefStage, RefineryStage, Stage};

/// Driver operations over an [`Ensemble`]. An extension trait rather than
/// inherent methods, since `Ensemble` is defined in `vote_core` and Rust's
/// orphan rules forbid adding inherent methods to a foreign type.
pub trait EnsembleVerify {
    /// `true` iff `predicate` returns PASS for every exact leaf combination
    /// reachable from `inputs` (§4.3/§4.6): builds a chain of one refinery
    /// per tree, terminated by the post-processing stage.
    fn forall<F>(&self, inputs: &[Bound], predicate: F) -> Result<bool, PipelineError>
    where
        F: FnMut(&mut Mapping) -> Outcome;

    /// Abstraction-refinement (§4.4/§4.6): probe with the sound join first,
    /// only falling back to exact refinement of the least-joined tree when
    /// the probe is UNSURE.
    fn absref<F>(&self, inputs: &[Bound], predicate: F) -> Result<bool, PipelineError>
    where
        F: FnMut(&mut Mapping) -> Outcome;

    /// Exact evaluation of the ensemble at a single concrete point (§4.6):
    /// `forall` over a degenerate (point) input box, with a predicate that
    /// copies the (necessarily precise) output bounds into `outputs`.
    fn eval(&self, inputs: &[Real], outputs: &mut [Real]) -> Result<(), PipelineError>;

    /// A single sound over-approximation of the ensemble's output over
    /// `inputs`, without any refinement (§4.6).
    fn approximate(&self, inputs: &[Bound]) -> Result<Mapping, PipelineError>;
}

fn check_input_len(ensemble: &Ensemble, got: usize) -> Result<(), PipelineError> {
    if got != ensemble.n_in() {
        return Err(PipelineError::InputDimensionMismatch {
            got,
            expected: ensemble.n_in(),
        });
    }
    Ok(())
}

impl EnsembleVerify for Ensemble {
    fn forall<F>(&self, inputs: &[Bound], mut predicate: F) -> Result<bool, PipelineError>
    where
        F: FnMut(&mut Mapping) -> Outcome,
    {
        check_input_len(self, inputs.len())?;
        let start = Instant::now();

        let pp = PostProcessStage::new(
            self.post_process(),
            self.tree_count(),
            Box::new(|m: &mut Mapping| predicate(m)),
        );

        let mut head: Box<dyn Stage> = Box::new(RefStage(&pp));
        for tree in self.trees().iter().rev() {
            head = Box::new(RefineryStage::new(tree, head));
        }

        let mut m = Mapping::new(self.n_in(), self.n_out());
        m.inputs.clone_from_slice(inputs);

        let outcome = head.on_input(&mut m);
        info!(
            "forall: {} trees, elapsed={:?}, outcome={:?}",
            self.tree_count(),
            start.elapsed(),
            outcome
        );

        Ok(outcome == Outcome::Pass)
    }

    fn absref<F>(&self, inputs: &[Bound], mut predicate: F) -> Result<bool, PipelineError>
    where
        F: FnMut(&mut Mapping) -> Outcome,
    {
        check_input_len(self, inputs.len())?;
        let start = Instant::now();

        let pp = PostProcessStage::new(
            self.post_process(),
            self.tree_count(),
            Box::new(|m: &mut Mapping| predicate(m)),
        );

        let trees = self.trees();
        let n = trees.len();

        let mut next: Box<dyn Stage> = Box::new(RefStage(&pp));
        for i in (0..n).rev() {
            debug!("absref: wiring stage for tree {i}");
            let refinery = RefineryStage::new(&trees[i], next);
            next = Box::new(AbstractorStage::new(&trees[i..], Box::new(refinery), &pp));
        }

        let mut m = Mapping::new(self.n_in(), self.n_out());
        m.inputs.clone_from_slice(inputs);

        let outcome = next.on_input(&mut m);
        if outcome == Outcome::Unsure {
            warn!("absref: verdict remained UNSURE after full refinement");
        }
        info!(
            "absref: {} trees, elapsed={:?}, outcome={:?}",
            self.tree_count(),
            start.elapsed(),
            outcome
        );

        Ok(outcome == Outcome::Pass)
    }

    fn eval(&self, inputs: &[Real], outputs: &mut [Real]) -> Result<(), PipelineError> {
        if inputs.len() != self.n_in() {
            return Err(PipelineError::ConcreteInputMismatch {
                got: inputs.len(),
                expected: self.n_in(),
            });
        }
        if outputs.len() != self.n_out() {
            return Err(PipelineError::ConcreteInputMismatch {
                got: outputs.len(),
                expected: self.n_out(),
            });
        }

        let region: Vec<Bound> = inputs.iter().map(|&x| Bound::point(x)).collect();
        outputs.fill(Real::NAN);

        let collected = RefCell::new(Vec::new());
        self.forall(&region, |m: &mut Mapping| {
            debug_assert!(m.precise(), "eval: forall reached a non-precise mapping");
            *collected.borrow_mut() = m.outputs.iter().map(|b| b.lo).collect();
            Outcome::Pass
        })?;

        for (o, v) in outputs.iter_mut().zip(collected.borrow().iter()) {
            *o = *v;
        }
        Ok(())
    }

    fn approximate(&self, inputs: &[Bound]) -> Result<Mapping, PipelineError> {
        check_input_len(self, inputs.len())?;

        let result = RefCell::new(Mapping::new(self.n_in(), self.n_out()));
        let pp = PostProcessStage::new(
            self.post_process(),
            self.tree_count(),
            Box::new(|m: &mut Mapping| {
                result.borrow_mut().outputs.clone_from(&m.outputs);
                Outcome::Pass
            }),
        );

        let trees = self.trees();
        let abs = AbstractorStage::new(trees, Box::new(RefStage(&pp)), &pp);

        let mut m = Mapping::new(self.n_in(), self.n_out());
        m.inputs.clone_from_slice(inputs);
        abs.on_input(&mut m);

        let mut out = result.into_inner();
        out.inputs.clone_from_slice(inputs);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vote_core::ensemble::PostProcess;
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

    fn ensemble_of(trees: Vec<Tree>) -> Ensemble {
        Ensemble::new(trees, PostProcess::None).unwrap()
    }

    #[test]
    fn forall_passes_when_predicate_always_passes() {
        let e = ensemble_of(vec![stump()]);
        let ok = e
            .forall(&[Bound::new(0.0, 1.0)], |_m| Outcome::Pass)
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn forall_fails_when_any_leaf_disagrees() {
        let e = ensemble_of(vec![stump()]);
        let ok = e
            .forall(&[Bound::new(0.0, 1.0)], |m| {
                if m.outputs[0].lo == 1.0 {
                    Outcome::Fail
                } else {
                    Outcome::Pass
                }
            })
            .unwrap();
        assert!(!ok);
    }

    #[test]
    fn absref_agrees_with_forall_on_a_single_tree() {
        let e = ensemble_of(vec![stump()]);
        let inputs = [Bound::new(0.0, 1.0)];

        let forall_ok = e
            .forall(&inputs, |m| {
                if m.outputs[0].lo >= 0.5 {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                }
            })
            .unwrap();

        let absref_ok = e
            .absref(&inputs, |m| {
                if m.outputs[0].lo >= 0.5 {
                    Outcome::Pass
                } else if m.outputs[0].hi < 0.5 {
                    Outcome::Fail
                } else {
                    Outcome::Unsure
                }
            })
            .unwrap();

        assert_eq!(forall_ok, false);
        assert_eq!(absref_ok, false);
    }

    #[test]
    fn eval_at_a_concrete_point_is_precise() {
        let e = ensemble_of(vec![stump()]);
        let mut out = [Real::NAN];
        e.eval(&[0.8], &mut out).unwrap();
        assert_eq!(out[0], 1.0);
    }

    #[test]
    fn approximate_envelopes_a_straddling_box() {
        let e = ensemble_of(vec![stump()]);
        let m = e.approximate(&[Bound::new(0.0, 1.0)]).unwrap();
        assert_eq!(m.outputs[0], Bound::new(0.0, 1.0));
    }

    #[test]
    fn rejects_mismatched_input_dimension() {
        let e = ensemble_of(vec![stump()]);
        let err = e.forall(&[], |_m| Outcome::Pass).unwrap_err();
        assert!(matches!(err, PipelineError::InputDimensionMismatch { .. }));
    }
}
