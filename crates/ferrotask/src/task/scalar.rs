use core::fmt;

/// A floating-point type a [`TaskServer`] can compute with.
///
/// The server is generic over exactly one `Scalar` for its whole lifetime, so
/// every task it accepts and every result it hands back share this type.
/// Implemented for `f32` and `f64`.
///
/// [`TaskServer`]: crate::TaskServer
pub trait Scalar:
    Copy + Clone + Default + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Additive identity.
    const ZERO: Self;

    /// Sine of `self` (radians).
    fn sin(self) -> Self;

    /// Square root of `self`. NaN for negative inputs.
    fn sqrt(self) -> Self;

    /// `self` raised to a floating-point power.
    fn powf(self, exponent: Self) -> Self;

    /// Returns `true` if this value is NaN.
    fn is_nan(self) -> bool;

    /// Returns `true` if this value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Widens to `f64`.
    fn to_f64(self) -> f64;

    /// Converts from `f64`, rounding to the nearest representable value.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const ZERO: Self = 0.0;

                #[inline]
                fn sin(self) -> Self {
                    <$ty>::sin(self)
                }

                #[inline]
                fn sqrt(self) -> Self {
                    <$ty>::sqrt(self)
                }

                #[inline]
                fn powf(self, exponent: Self) -> Self {
                    <$ty>::powf(self, exponent)
                }

                #[inline]
                fn is_nan(self) -> bool {
                    <$ty>::is_nan(self)
                }

                #[inline]
                fn is_finite(self) -> bool {
                    <$ty>::is_finite(self)
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    f64::from(self)
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation)]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }
            }
        )+
    };
}

impl_scalar!(f32, f64);
