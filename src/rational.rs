//! Exact rational constants
//!
//! The simplifier's only numeric domain. A [`Rational`] is always reduced
//! and keeps its denominator positive; constructing one with a zero
//! denominator is the divide-by-zero signal. Addition, subtraction and
//! multiplication of reduced rationals cannot produce a zero denominator,
//! so only division is fallible.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_integer::Integer;
use num_traits::{One, Zero};

use crate::arena::Arena;
use crate::ast::NodeId;
use crate::error::DivideByZero;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    /// Build a reduced rational, failing on a zero denominator.
    pub fn new(num: i64, den: i64) -> Result<Self, DivideByZero> {
        if den == 0 {
            return Err(DivideByZero);
        }
        Ok(Self::reduced(num, den))
    }

    /// A whole number.
    pub fn int(v: i64) -> Self {
        Rational { num: v, den: 1 }
    }

    fn reduced(num: i64, den: i64) -> Self {
        debug_assert!(den != 0);
        if num == 0 {
            return Rational { num: 0, den: 1 };
        }
        let g = num.gcd(&den);
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = -num;
            den = -den;
        }
        Rational { num, den }
    }

    pub fn numer(self) -> i64 {
        self.num
    }

    pub fn denom(self) -> i64 {
        self.den
    }

    pub fn is_integer(self) -> bool {
        self.den == 1
    }

    /// Division; the only fallible operation.
    pub fn checked_div(self, rhs: Self) -> Result<Self, DivideByZero> {
        if rhs.num == 0 {
            return Err(DivideByZero);
        }
        Ok(Self::reduced(self.num * rhs.den, self.den * rhs.num))
    }

    /// Rational gcd: gcd of numerators over lcm of denominators, zero if
    /// either side is zero.
    pub fn gcd(self, rhs: Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Rational::int(0);
        }
        Self::reduced(self.num.gcd(&rhs.num).abs(), self.den.lcm(&rhs.den).abs())
    }

    /// Materialize as a tree node: an `Int` leaf, or `num/den` when the
    /// denominator is not 1.
    pub fn to_node(self, arena: &mut Arena) -> NodeId {
        if self.den == 1 {
            arena.int(self.num)
        } else {
            let n = arena.int(self.num);
            let d = arena.int(self.den);
            arena.div(n, d)
        }
    }
}

impl Add for Rational {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::reduced(
            self.num * rhs.den + rhs.num * self.den,
            self.den * rhs.den,
        )
    }
}

impl Sub for Rational {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::reduced(
            self.num * rhs.den - rhs.num * self.den,
            self.den * rhs.den,
        )
    }
}

impl Mul for Rational {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::reduced(self.num * rhs.num, self.den * rhs.den)
    }
}

impl Neg for Rational {
    type Output = Self;
    fn neg(self) -> Self {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

impl AddAssign for Rational {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Rational {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Rational {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Rational::int(0)
    }

    fn is_zero(&self) -> bool {
        self.num == 0
    }
}

impl One for Rational {
    fn one() -> Self {
        Rational::int(1)
    }

    fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
