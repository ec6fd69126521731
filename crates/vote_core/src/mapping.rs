//! §4.1: `Mapping` — a pair (input box, output box), and the only way user
//! predicates inspect outputs.

use crate::bound::Bound;
use crate::outcome::Outcome;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fixed-dimension pair of bound vectors: a closed axis-aligned input
/// box, and a sound output enclosure.
///
/// Mappings are cheap, value-like, and owned independently once split: a
/// stage that needs to descend into sub-regions clones the mapping first,
/// per spec.md §3's ownership note.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mapping {
    pub inputs: Vec<Bound>,
    pub outputs: Vec<Bound>,
}

impl Mapping {
    /// Allocate a mapping with inputs `[-inf, +inf]` per dimension and
    /// outputs `[0, 0]` per dimension.
    pub fn new(n_in: usize, n_out: usize) -> Self {
        Mapping {
            inputs: vec![Bound::UNBOUNDED; n_in],
            outputs: vec![Bound::ZERO; n_out],
        }
    }

    #[inline]
    pub fn n_in(&self) -> usize {
        self.inputs.len()
    }

    #[inline]
    pub fn n_out(&self) -> usize {
        self.outputs.len()
    }

    /// Componentwise join of `src` into `self`, on both input and output
    /// vectors.
    pub fn join(&mut self, src: &Mapping) {
        debug_assert_eq!(self.inputs.len(), src.inputs.len());
        debug_assert_eq!(self.outputs.len(), src.outputs.len());
        for (d, s) in self.inputs.iter_mut().zip(&src.inputs) {
            d.join(s);
        }
        for (d, s) in self.outputs.iter_mut().zip(&src.outputs) {
            d.join(s);
        }
    }

    /// `true` iff every output dimension is a single point.
    pub fn precise(&self) -> bool {
        self.outputs.iter().all(Bound::is_precise)
    }

    /// PASS iff class `k` dominates every other class; FAIL iff some class
    /// strictly beats `k`; UNSURE otherwise.
    pub fn argmax_check(&self, k: usize) -> Outcome {
        assert!(
            k < self.outputs.len(),
            "argmax_check: class {k} out of range for {} outputs",
            self.outputs.len()
        );
        let target = self.outputs[k];

        for (j, out) in self.outputs.iter().enumerate() {
            if j == k {
                continue;
            }
            if target.hi < out.lo {
                return Outcome::Fail;
            }
        }

        let dominates_all = self
            .outputs
            .iter()
            .enumerate()
            .all(|(j, out)| j == k || target.lo >= out.hi);

        if dominates_all {
            Outcome::Pass
        } else {
            Outcome::Unsure
        }
    }

    /// Dual of [`Mapping::argmax_check`]: swap `lo`/`hi`, reverse the
    /// inequalities.
    pub fn argmin_check(&self, k: usize) -> Outcome {
        assert!(
            k < self.outputs.len(),
            "argmin_check: class {k} out of range for {} outputs",
            self.outputs.len()
        );
        let target = self.outputs[k];

        for (j, out) in self.outputs.iter().enumerate() {
            if j == k {
                continue;
            }
            if target.lo > out.hi {
                return Outcome::Fail;
            }
        }

        let dominates_all = self
            .outputs
            .iter()
            .enumerate()
            .all(|(j, out)| j == k || target.hi <= out.lo);

        if dominates_all {
            Outcome::Pass
        } else {
            Outcome::Unsure
        }
    }

    /// The unique dimension whose `hi` strictly exceeds every other's `lo`,
    /// or `None` if no such dimension exists (the "inconclusive" sentinel).
    pub fn argmax(&self) -> Option<usize> {
        if self.outputs.is_empty() {
            return None;
        }
        let mut k = 0usize;
        for (i, out) in self.outputs.iter().enumerate() {
            if out.hi > self.outputs[k].hi {
                k = i;
            }
        }
        for (i, out) in self.outputs.iter().enumerate() {
            if i != k && out.hi >= self.outputs[k].lo {
                return None;
            }
        }
        Some(k)
    }

    /// Dual of [`Mapping::argmax`].
    pub fn argmin(&self) -> Option<usize> {
        if self.outputs.is_empty() {
            return None;
        }
        let mut k = 0usize;
        for (i, out) in self.outputs.iter().enumerate() {
            if out.lo < self.outputs[k].lo {
                k = i;
            }
        }
        for (i, out) in self.outputs.iter().enumerate() {
            if i != k && out.lo <= self.outputs[k].hi {
                return None;
            }
        }
        Some(k)
    }
}

impl std::fmt::Display for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "inputs=[")?;
        for (i, b) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}, {}]", b.lo, b.hi)?;
        }
        write!(f, "] outputs=[")?;
        for (i, b) in self.outputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}, {}]", b.lo, b.hi)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping_with_outputs(bounds: &[(f32, f32)]) -> Mapping {
        let mut m = Mapping::new(1, bounds.len());
        for (i, &(lo, hi)) in bounds.iter().enumerate() {
            m.outputs[i] = Bound::new(lo as _, hi as _);
        }
        m
    }

    #[test]
    fn new_mapping_has_unbounded_inputs_and_zero_outputs() {
        let m = Mapping::new(2, 3);
        assert_eq!(m.inputs.len(), 2);
        assert_eq!(m.outputs.len(), 3);
        assert!(m.inputs.iter().all(|b| *b == Bound::UNBOUNDED));
        assert!(m.outputs.iter().all(|b| *b == Bound::ZERO));
    }

    #[test]
    fn s5_argmax_boundary_unsure_then_pass() {
        // S5: mapping {[0,1],[0,1]} -> UNSURE; tightened to {[0.6,1],[0,0.5]} -> PASS.
        let m = mapping_with_outputs(&[(0.0, 1.0), (0.0, 1.0)]);
        assert_eq!(m.argmax_check(0), Outcome::Unsure);

        let m2 = mapping_with_outputs(&[(0.6, 1.0), (0.0, 0.5)]);
        assert_eq!(m2.argmax_check(0), Outcome::Pass);
    }

    #[test]
    fn argmax_check_fail_when_dominated() {
        let m = mapping_with_outputs(&[(0.0, 0.3), (0.5, 1.0)]);
        assert_eq!(m.argmax_check(0), Outcome::Fail);
    }

    #[test]
    fn argmax_inconclusive_on_overlap() {
        let m = mapping_with_outputs(&[(0.0, 1.0), (0.0, 1.0)]);
        assert_eq!(m.argmax(), None);
    }

    #[test]
    fn argmax_picks_dominant_dimension() {
        let m = mapping_with_outputs(&[(0.6, 1.0), (0.0, 0.5)]);
        assert_eq!(m.argmax(), Some(0));
    }

    #[test]
    fn precise_requires_every_dimension_pointlike() {
        let mut m = mapping_with_outputs(&[(1.0, 1.0), (2.0, 2.0)]);
        assert!(m.precise());
        m.outputs[1].hi = 3.0;
        assert!(!m.precise());
    }

    #[test]
    fn join_is_sound_envelope() {
        let mut a = mapping_with_outputs(&[(0.0, 1.0)]);
        let b = mapping_with_outputs(&[(-1.0, 0.5)]);
        a.join(&b);
        assert_eq!(a.outputs[0], Bound::new(-1.0, 1.0));
    }
}
