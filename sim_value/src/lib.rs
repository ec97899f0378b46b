pub mod dual;

use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

pub use dual::Dual;

/// The numeric capability every kinematic computation is generic over.
///
/// Anything that can add, multiply, take a sine and be built from an `f64`
/// literal can flow through the link evaluator. `f64` is the common case,
/// `f32` and [`Dual`] are the other instantiations shipped here.
pub trait SimValue:
    Abs
    + Add<Output = Self>
    + AddAssign
    + Copy
    + Debug
    + FromF64
    + Mul<Output = Self>
    + MulAssign
    + Neg<Output = Self>
    + One
    + PartialOrd
    + Sub<Output = Self>
    + SubAssign
    + Trig
    + Zero
    + 'static
{
}

impl<T> SimValue for T where
    T: Abs
        + Add<Output = Self>
        + AddAssign
        + Copy
        + Debug
        + FromF64
        + Mul<Output = Self>
        + MulAssign
        + Neg<Output = Self>
        + One
        + PartialOrd
        + Sub<Output = Self>
        + SubAssign
        + Trig
        + Zero
        + 'static
{
}

pub trait Abs {
    fn abs(self) -> Self;
}

impl Abs for f64 {
    fn abs(self) -> Self {
        f64::abs(self)
    }
}

impl Abs for f32 {
    fn abs(self) -> Self {
        f32::abs(self)
    }
}

/// Trait defining the trigonometric pair needed to build a link transform.
pub trait Trig: Sized {
    fn sin(self) -> Self;
    fn cos(self) -> Self;

    /// Returns `(sin, cos)` of the value.
    fn sin_cos(self) -> (Self, Self)
    where
        Self: Copy,
    {
        (self.sin(), self.cos())
    }
}

impl Trig for f64 {
    fn sin(self) -> Self {
        f64::sin(self)
    }
    fn cos(self) -> Self {
        f64::cos(self)
    }
    fn sin_cos(self) -> (Self, Self) {
        f64::sin_cos(self)
    }
}

impl Trig for f32 {
    fn sin(self) -> Self {
        f32::sin(self)
    }
    fn cos(self) -> Self {
        f32::cos(self)
    }
    fn sin_cos(self) -> (Self, Self) {
        f32::sin_cos(self)
    }
}

/// Lifts a constant `f64` parameter into the value type.
pub trait FromF64 {
    fn from_f64(value: f64) -> Self;
}

impl FromF64 for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }
}

impl FromF64 for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn dot<T: SimValue>(x: &[T], y: &[T]) -> T {
        let mut sum = T::zero();
        for (a, b) in x.iter().zip(y) {
            sum += *a * *b;
        }
        sum
    }

    #[test]
    fn test_generic_over_floats() {
        assert_abs_diff_eq!(dot(&[1.0_f64, 2.0], &[3.0, -4.0]), -5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dot(&[1.0_f32, 2.0], &[3.0, -4.0]), -5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sin_cos_matches_std() {
        let (s, c) = Trig::sin_cos(PI / 3.0);
        assert_abs_diff_eq!(s, (PI / 3.0).sin(), epsilon = 1e-15);
        assert_abs_diff_eq!(c, 0.5, epsilon = 1e-15);

        let (s, c) = Trig::sin_cos(PI as f32 / 2.0);
        assert_abs_diff_eq!(s, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(<f64 as FromF64>::from_f64(1.25), 1.25);
        assert_eq!(<f32 as FromF64>::from_f64(1.25), 1.25_f32);
    }
}
