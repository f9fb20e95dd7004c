//! Self-checks of the bookkeeping containers.
//!
//! The dense containers keep counters next to the bits and slots they count.
//! [`DebugInvariants::validate_invariants`] recomputes them from scratch.
//!
//! - `check-invariants`: every mutation of a dense container is followed by a
//!   full validation, and a violation panics.
//! - `strict-invariants`: additionally, every link written to a path store
//!   must point to an already recorded predecessor.
//!
//! Validation is linear in the container size, so it stays opt-in even in
//! debug builds; explicit calls to `debug_assert_invariants` always check in
//! debug builds.

use crate::traversal_error::TraversalError;

pub trait DebugInvariants {
    /// First violated invariant, if any.
    fn validate_invariants(&self) -> Result<(), TraversalError>;

    /// Panics on a violation in debug builds or with `check-invariants`.
    #[inline]
    fn debug_assert_invariants(&self) {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = self.validate_invariants() {
            panic!("[invariants] {e}");
        }
    }
}

/// Runs `debug_assert_invariants` on a container after a mutation; compiled
/// out unless `check-invariants` is enabled.
#[macro_export]
macro_rules! check_after_mutation {
    ($container:expr) => {
        #[cfg(feature = "check-invariants")]
        $crate::debug_invariants::DebugInvariants::debug_assert_invariants($container);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counted {
        items: Vec<u8>,
        len: usize,
    }

    impl DebugInvariants for Counted {
        fn validate_invariants(&self) -> Result<(), TraversalError> {
            if self.items.len() == self.len {
                Ok(())
            } else {
                Err(TraversalError::InvariantViolation(format!(
                    "len {} but {} items",
                    self.len,
                    self.items.len()
                )))
            }
        }
    }

    #[test]
    fn consistent_container_passes() {
        let c = Counted {
            items: vec![1, 2],
            len: 2,
        };
        c.debug_assert_invariants();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "[invariants]")]
    fn stale_counter_panics() {
        let c = Counted {
            items: vec![1, 2],
            len: 3,
        };
        c.debug_assert_invariants();
    }
}
