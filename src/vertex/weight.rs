//! Edge weights and distance arithmetic.

use num_traits::{Bounded, CheckedAdd, Zero};

use crate::traversal_error::TraversalError;

/// Numeric type usable as edge weight and distance.
///
/// Weights are only partially ordered (floats), so strategies never rely on a
/// total order. `NaN` is treated as an overflow.
pub trait Weight: Copy + PartialOrd + std::fmt::Debug + Zero {
    /// The default "unreachable" sentinel: largest value or `+inf`.
    fn infinity() -> Self;

    /// `self + rhs`, or `None` if the sum cannot be represented.
    fn checked_sum(self, rhs: Self) -> Option<Self>;
}

macro_rules! integer_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[inline]
                fn infinity() -> Self {
                    <$t as Bounded>::max_value()
                }

                #[inline]
                fn checked_sum(self, rhs: Self) -> Option<Self> {
                    CheckedAdd::checked_add(&self, &rhs)
                }
            }
        )*
    };
}

macro_rules! float_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[inline]
                fn infinity() -> Self {
                    <$t>::INFINITY
                }

                #[inline]
                fn checked_sum(self, rhs: Self) -> Option<Self> {
                    let sum = self + rhs;
                    if sum.is_nan() { None } else { Some(sum) }
                }
            }
        )*
    };
}

integer_weight!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
float_weight!(f32, f64);

/// Extends a distance by an edge weight. Sums that overflow or reach
/// `infinity` are errors, since they would be indistinguishable from
/// "unreachable".
pub(crate) fn extend_distance<W: Weight>(
    distance: W,
    weight: W,
    infinity: W,
) -> Result<W, TraversalError> {
    match distance.checked_sum(weight) {
        Some(sum) if sum < infinity => Ok(sum),
        Some(sum) => Err(TraversalError::DistanceOverflow(format!(
            "{distance:?} + {weight:?} = {sum:?} is not below infinity {infinity:?}"
        ))),
        None => Err(TraversalError::DistanceOverflow(format!(
            "{distance:?} + {weight:?} cannot be represented"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_sums_stop_below_infinity() {
        assert_eq!(extend_distance(3u8, 4, u8::infinity()), Ok(7));
        assert!(matches!(
            extend_distance(250u8, 5, u8::infinity()),
            Err(TraversalError::DistanceOverflow(_))
        ));
        assert!(matches!(
            extend_distance(250u8, 10, u8::infinity()),
            Err(TraversalError::DistanceOverflow(_))
        ));
        // custom sentinel
        assert!(extend_distance(90u32, 10, 100).is_err());
        assert_eq!(extend_distance(89u32, 10, 100), Ok(99));
    }

    #[test]
    fn float_sums() {
        assert_eq!(extend_distance(0.5f64, 0.25, f64::infinity()), Ok(0.75));
        assert!(extend_distance(f64::MAX, f64::MAX, f64::infinity()).is_err());
        assert!(extend_distance(f64::INFINITY, f64::NEG_INFINITY, f64::infinity()).is_err());
    }
}
