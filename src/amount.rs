use core::fmt::{Debug, Display};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use num_traits::{Bounded, CheckedAdd, CheckedSub, One, Zero};

/// A trait representing an amount type which is typically an integer.
///
/// `Bounded::max_value` doubles as the "unbounded" capacity of routing edges,
/// so it must order correctly against every real capacity. Flow accumulation
/// goes through the checked operations and fails loudly instead of wrapping.
pub trait Amount:
    Copy
    + Sum<Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Ord
    + AddAssign
    + SubAssign
    + Zero
    + One
    + Bounded
    + CheckedAdd
    + CheckedSub
    + Debug
    + Display
    + Default
{
}

impl Amount for i64 {}

impl Amount for u64 {}

impl Amount for u128 {}
