//! §3: `Outcome` — the three-valued verdict of a predicate or stage.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The outcome of a property checker. PASS means the predicate is proved
/// for every concrete point in the current input box; FAIL means some
/// concrete point violates it; UNSURE means bounds are too loose to
/// decide.
///
/// §9 notes that outcomes form the lattice `FAIL < UNSURE < PASS` for the
/// absref probe semantics (§4.4 step 3 must distinguish UNSURE from the two
/// conclusive outcomes), but are *not* totally ordered for the `forall`
/// driver, which only cares whether the result is `PASS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outcome {
    Fail,
    Unsure,
    Pass,
}

impl Outcome {
    /// `true` for `Pass` only. Used by the `forall` driver (§4.6), which
    /// treats anything other than PASS as "continue or fail".
    #[inline]
    pub fn is_pass(self) -> bool {
        matches!(self, Outcome::Pass)
    }

    /// `true` for `Pass` or `Fail`; `false` for `Unsure`. Used by the
    /// absref probe (§4.4 step 3) to decide whether refinement is needed.
    #[inline]
    pub fn is_conclusive(self) -> bool {
        !matches!(self, Outcome::Unsure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pass_is_pass() {
        assert!(Outcome::Pass.is_pass());
        assert!(!Outcome::Fail.is_pass());
        assert!(!Outcome::Unsure.is_pass());
    }

    #[test]
    fn unsure_is_the_only_inconclusive_outcome() {
        assert!(Outcome::Pass.is_conclusive());
        assert!(Outcome::Fail.is_conclusive());
        assert!(!Outcome::Unsure.is_conclusive());
    }
}
