//! Ensemble-level output transforms (§4.5): NONE, DIVISOR, SOFTMAX, SIGMOID.
//!
//! Grounded on `vote_postproc.c`. The softmax implementation uses the
//! stabilized offset-negate-and-swap form from the original (see the
//! Open Questions resolution in SPEC_FULL.md).

use vote_core::ensemble::PostProcess;
use vote_core::{Bound, Mapping};

/// Post-processing used by random forests: divide every output bound by
/// the number of trees.
pub fn divisor(m: &mut Mapping, nb_trees: usize) {
    let d = nb_trees as vote_core::Real;
    for o in m.outputs.iter_mut() {
        o.lo /= d;
        o.hi /= d;
    }
}

/// Sigmoid, `sigma(x) = exp(x) / (1 + exp(x))`, applied monotonically to
/// each bound.
pub fn sigmoid(m: &mut Mapping) {
    for o in m.outputs.iter_mut() {
        o.lo = sigmoid_scalar(o.lo);
        o.hi = sigmoid_scalar(o.hi);
    }
}

fn sigmoid_scalar(x: vote_core::Real) -> vote_core::Real {
    1.0 / (1.0 + (-x).exp())
}

/// Numerically-stabilized softmax (used by some gradient boosting
/// machines). Computes the envelope of `softmax(outputs)` rather than
/// applying softmax to each bound independently, via the
/// offset-negate-and-swap form from
/// <http://www.deeplearningbook.org/contents/numerical.html>.
pub fn softmax(m: &mut Mapping) {
    let mut max = vote_core::real::NEG_INFINITY;
    for o in &m.outputs {
        max = max.max(o.hi);
    }

    let mut sum = Bound::ZERO;
    for o in &m.outputs {
        sum.lo += (o.lo - max).exp();
        sum.hi += (o.hi - max).exp();
    }

    debug_assert!(sum.lo != 0.0, "softmax: sum.lo is zero, log undefined");
    debug_assert!(sum.hi != 0.0, "softmax: sum.hi is zero, log undefined");

    let off_lo = sum.lo.ln() + max;
    let off_hi = sum.hi.ln() + max;

    // Negate and swap bounds in the box that captures the offset.
    let off = Bound::new(-off_hi, -off_lo);

    for o in m.outputs.iter_mut() {
        let lo = (off.lo + o.lo).exp();
        let hi = (off.hi + o.hi).exp();
        o.lo = lo;
        o.hi = hi;
    }
}

/// Dispatch on the ensemble's tag and apply the corresponding transform.
pub fn apply(tag: PostProcess, m: &mut Mapping, nb_trees: usize) {
    match tag {
        PostProcess::None => {}
        PostProcess::Divisor => divisor(m, nb_trees),
        PostProcess::Softmax => softmax(m),
        PostProcess::Sigmoid => sigmoid(m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping_with(bounds: &[(f32, f32)]) -> Mapping {
        let mut m = Mapping::new(1, bounds.len());
        for (i, &(lo, hi)) in bounds.iter().enumerate() {
            m.outputs[i] = Bound::new(lo as _, hi as _);
        }
        m
    }

    #[test]
    fn divisor_scales_every_bound() {
        let mut m = mapping_with(&[(2.0, 4.0)]);
        divisor(&mut m, 2);
        assert_eq!(m.outputs[0], Bound::new(1.0, 2.0));
    }

    #[test]
    fn softmax_of_a_precise_point_is_precise() {
        let mut m = mapping_with(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        softmax(&mut m);
        for o in &m.outputs {
            assert!(o.is_precise(), "got {:?}", o);
        }
        let sum: f32 = m.outputs.iter().map(|o| o.lo).sum();
        assert!((sum - 1.0).abs() < 1e-5, "sum={sum}");
    }

    #[test]
    fn softmax_widens_for_an_imprecise_input() {
        let mut m = mapping_with(&[(0.0, 1.0), (0.0, 1.0)]);
        softmax(&mut m);
        assert!(m.outputs[0].lo <= m.outputs[0].hi);
        assert!(m.outputs[0].lo > 0.0 && m.outputs[0].hi < 1.0);
    }

    #[test]
    fn sigmoid_is_monotonic_and_bounded() {
        let mut m = mapping_with(&[(-1.0, 1.0)]);
        sigmoid(&mut m);
        assert!(m.outputs[0].lo > 0.0 && m.outputs[0].lo < 0.5);
        assert!(m.outputs[0].hi > 0.5 && m.outputs[0].hi < 1.0);
    }
}
