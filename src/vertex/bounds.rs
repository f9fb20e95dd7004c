//! Common bound aliases used across the strategies.
//!
//! These traits have blanket impls, so any type satisfying the underlying
//! bounds will automatically implement them. They are zero-cost and only
//! reduce duplication in `where` clauses.

/// Minimal bound for vertex values handed to and returned by a strategy.
///
/// Rationale:
/// - `Clone` because a reported vertex is also kept for later expansion
/// - `Debug` for diagnostics, error payloads and `state_to_string`
pub trait VertexLike: Clone + std::fmt::Debug {}
impl<T> VertexLike for T where T: Clone + std::fmt::Debug {}

/// Canonical bound set for vertex identifiers (keys).
///
/// Rationale:
/// - `Eq + Hash` for hash-indexed bookkeeping
/// - `Clone` since a key is stored in several containers at once
/// - `Debug` for diagnostics and invariant checks
pub trait KeyLike: Clone + Eq + std::hash::Hash + std::fmt::Debug {}
impl<T> KeyLike for T where T: Clone + Eq + std::hash::Hash + std::fmt::Debug {}

/// Keys that are small non-negative integers and can index a vector directly.
///
/// Used by the dense gears. Keys far beyond the expected range make the dense
/// containers grow accordingly, so only use them when keys are compact.
pub trait DenseKey: KeyLike {
    fn index(&self) -> usize;
}

macro_rules! dense_key {
    ($($t:ty),*) => {
        $(
            impl DenseKey for $t {
                #[inline]
                fn index(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

dense_key!(u8, u16, u32, u64, usize);
