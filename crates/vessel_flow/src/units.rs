//! # Units
//!
//! The numeric unit types a resource model can count in.
//!
//! Every arithmetic operation here is *clamped*: nothing on the exchange
//! path can overflow, underflow or go negative. `bool` is supported as a
//! 0/1 quantity (an on/off state such as "stealth active").
//!
//! Only the types listed below implement [`Units`]. Defining a resource
//! model over anything else (a `String`, a struct) fails the build.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A numeric amount type usable in a resource model.
pub trait Units:
    Copy + PartialEq + PartialOrd + Debug + Default + Serialize + DeserializeOwned + 'static
{
    /// The zero amount.
    const ZERO: Self;

    /// Amounts at or below this value are numeric noise.
    ///
    /// Machine epsilon for floats, zero for integers, `false` for `bool`.
    const EPSILON: Self;

    /// The largest representable amount.
    const MAX: Self;

    /// Adds `rhs` and clamps the result to `cap`.
    #[must_use]
    fn add_capped(self, rhs: Self, cap: Self) -> Self;

    /// Subtracts `rhs` and clamps the result at zero.
    #[must_use]
    fn sub_floored(self, rhs: Self) -> Self;

    /// Scales by a fraction (bandwidth × limit), truncating toward zero.
    #[must_use]
    fn scale(self, fraction: f32) -> Self;

    /// Returns the smaller of two amounts.
    #[inline]
    #[must_use]
    fn min_of(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// Clamps into `[ZERO, hi]`. A negative or zero `hi` yields zero.
    #[inline]
    #[must_use]
    fn clamp_to(self, hi: Self) -> Self {
        if self < Self::ZERO {
            Self::ZERO
        } else if self > hi {
            hi.max_zero()
        } else {
            self
        }
    }

    /// Replaces a negative amount with zero.
    #[inline]
    #[must_use]
    fn max_zero(self) -> Self {
        if self < Self::ZERO {
            Self::ZERO
        } else {
            self
        }
    }

    /// Returns true if the amount is at or below epsilon.
    #[inline]
    fn is_negligible(self) -> bool {
        self <= Self::EPSILON
    }
}

/// Splits a fraction in `(0, 1)` into `mantissa / 2^shift` exactly.
fn fraction_parts(fraction: f32) -> (u32, u32) {
    let bits = fraction.to_bits();
    let exponent = (bits >> 23) & 0xff;
    let mantissa = bits & 0x007f_ffff;
    if exponent == 0 {
        (mantissa, 149)
    } else {
        (mantissa | 0x0080_0000, 150 - exponent)
    }
}

macro_rules! impl_integer_units {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Units for $ty {
                const ZERO: Self = 0;
                const EPSILON: Self = 0;
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn add_capped(self, rhs: Self, cap: Self) -> Self {
                    self.saturating_add(rhs).min(cap)
                }

                #[inline]
                fn sub_floored(self, rhs: Self) -> Self {
                    self.saturating_sub(rhs).max(0)
                }

                #[inline]
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_precision_loss,
                    clippy::cast_sign_loss,
                    clippy::cast_lossless,
                    clippy::float_cmp
                )]
                fn scale(self, fraction: f32) -> Self {
                    if fraction > 0.0 && fraction < 1.0 {
                        let (mantissa, shift) = fraction_parts(fraction);
                        if shift >= 96 {
                            return 0;
                        }
                        // |self × mantissa| < 2^88, the quotient never exceeds |self|
                        let product = i128::from(self) * i128::from(mantissa);
                        return (product / (1i128 << shift)) as Self;
                    }
                    if fraction == 1.0 {
                        return self;
                    }
                    // `as` saturates on overflow and maps NaN to zero
                    (self as f64 * f64::from(fraction)) as Self
                }
            }
        )*
    };
}

macro_rules! impl_float_units {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Units for $ty {
                const ZERO: Self = 0.0;
                const EPSILON: Self = $ty::EPSILON;
                const MAX: Self = $ty::MAX;

                #[inline]
                fn add_capped(self, rhs: Self, cap: Self) -> Self {
                    (self + rhs).min(cap)
                }

                #[inline]
                fn sub_floored(self, rhs: Self) -> Self {
                    (self - rhs).max(0.0)
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
                fn scale(self, fraction: f32) -> Self {
                    (f64::from(self) * f64::from(fraction)) as Self
                }
            }
        )*
    };
}

impl_integer_units!(u8, u16, u32, u64, i8, i16, i32, i64);
impl_float_units!(f32, f64);

impl Units for bool {
    const ZERO: Self = false;
    const EPSILON: Self = false;
    const MAX: Self = true;

    #[inline]
    fn add_capped(self, rhs: Self, cap: Self) -> Self {
        (self || rhs) && cap
    }

    #[inline]
    fn sub_floored(self, rhs: Self) -> Self {
        self && !rhs
    }

    #[inline]
    fn scale(self, fraction: f32) -> Self {
        self && fraction != 0.0
    }
}
