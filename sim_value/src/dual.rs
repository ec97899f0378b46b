use crate::{Abs, FromF64, Trig};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A forward-mode dual number `re + eps * ε` with `ε² = 0`.
///
/// Evaluating any `SimValue` computation with `Dual::variable(x)` carries the
/// derivative with respect to `x` in the `eps` part of the result.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Dual {
    pub re: f64,
    pub eps: f64,
}

impl Dual {
    pub fn new(re: f64, eps: f64) -> Self {
        Self { re, eps }
    }

    /// A constant, with zero derivative.
    pub fn constant(re: f64) -> Self {
        Self { re, eps: 0.0 }
    }

    /// The independent variable, seeded with unit derivative.
    pub fn variable(re: f64) -> Self {
        Self { re, eps: 1.0 }
    }
}

impl Add<Dual> for Dual {
    type Output = Dual;
    #[inline]
    fn add(self, rhs: Dual) -> Dual {
        Dual::new(self.re + rhs.re, self.eps + rhs.eps)
    }
}

impl Sub<Dual> for Dual {
    type Output = Dual;
    #[inline]
    fn sub(self, rhs: Dual) -> Dual {
        Dual::new(self.re - rhs.re, self.eps - rhs.eps)
    }
}

impl Mul<Dual> for Dual {
    type Output = Dual;
    #[inline]
    fn mul(self, rhs: Dual) -> Dual {
        Dual::new(self.re * rhs.re, self.re * rhs.eps + self.eps * rhs.re)
    }
}

impl AddAssign<Dual> for Dual {
    #[inline]
    fn add_assign(&mut self, rhs: Dual) {
        *self = *self + rhs;
    }
}

impl SubAssign<Dual> for Dual {
    #[inline]
    fn sub_assign(&mut self, rhs: Dual) {
        *self = *self - rhs;
    }
}

impl MulAssign<Dual> for Dual {
    #[inline]
    fn mul_assign(&mut self, rhs: Dual) {
        *self = *self * rhs;
    }
}

impl Neg for Dual {
    type Output = Dual;
    #[inline]
    fn neg(self) -> Dual {
        Dual::new(-self.re, -self.eps)
    }
}

impl Zero for Dual {
    fn zero() -> Self {
        Dual::constant(0.0)
    }
    fn is_zero(&self) -> bool {
        self.re == 0.0 && self.eps == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Dual::constant(1.0)
    }
}

impl Abs for Dual {
    fn abs(self) -> Self {
        if self.re < 0.0 {
            -self
        } else {
            self
        }
    }
}

impl Trig for Dual {
    fn sin(self) -> Self {
        Dual::new(self.re.sin(), self.eps * self.re.cos())
    }

    fn cos(self) -> Self {
        Dual::new(self.re.cos(), -self.eps * self.re.sin())
    }
}

impl FromF64 for Dual {
    fn from_f64(value: f64) -> Self {
        Dual::constant(value)
    }
}
