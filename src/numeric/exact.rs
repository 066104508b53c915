// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

use num_traits::{One, Zero};
use rug::Rational;

/// Arbitrary-precision rational scalar backed by GMP.
///
/// Every operation is exact. Values are always kept in lowest terms by `rug`,
/// so two equal numbers compare and hash identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Exact(pub Rational);

impl Exact {
    /// Exact conversion of a finite double. Returns `None` for NaN or infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        Rational::from_f64(value).map(Exact)
    }

    pub fn from_num_den(num: i32, den: i32) -> Self {
        Exact(Rational::from((num, den)))
    }

    /// Nearest double, following `rug`'s rounding rule.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64()
    }

    /// Returns -1, 0, or +1.
    #[inline(always)]
    pub fn sign(&self) -> i8 {
        match self.0.cmp0() {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    #[inline(always)]
    pub fn is_positive(&self) -> bool {
        self.sign() > 0
    }

    #[inline(always)]
    pub fn is_negative(&self) -> bool {
        self.sign() < 0
    }

    pub fn abs(&self) -> Self {
        Exact(self.0.clone().abs())
    }

    /// Largest significant bit count of the numerator and the denominator.
    pub fn significant_bits(&self) -> u32 {
        self.0
            .numer()
            .significant_bits()
            .max(self.0.denom().significant_bits())
    }

    /// Tightest pair of doubles `(lo, hi)` with `lo <= self <= hi`.
    pub fn to_f64_bounds(&self) -> (f64, f64) {
        let nearest = self.to_f64();
        match Rational::from_f64(nearest) {
            Some(r) => match r.cmp(&self.0) {
                Ordering::Equal => (nearest, nearest),
                Ordering::Greater => (next_down(nearest), nearest),
                Ordering::Less => (nearest, next_up(nearest)),
            },
            // Overflowed to an infinity; the infinity itself is a valid bound.
            None if self.is_negative() => (f64::NEG_INFINITY, -f64::MAX),
            None => (f64::MAX, f64::INFINITY),
        }
    }
}

fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

impl fmt::Display for Exact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a, 'b> Add<&'b Exact> for &'a Exact {
    type Output = Exact;

    fn add(self, rhs: &'b Exact) -> Exact {
        let mut result = self.0.clone();
        result += &rhs.0;
        Exact(result)
    }
}

impl<'a, 'b> Sub<&'b Exact> for &'a Exact {
    type Output = Exact;

    fn sub(self, rhs: &'b Exact) -> Exact {
        let mut result = self.0.clone();
        result -= &rhs.0;
        Exact(result)
    }
}

impl<'a, 'b> Mul<&'b Exact> for &'a Exact {
    type Output = Exact;

    fn mul(self, rhs: &'b Exact) -> Exact {
        let mut result = self.0.clone();
        result *= &rhs.0;
        Exact(result)
    }
}

impl<'a, 'b> Div<&'b Exact> for &'a Exact {
    type Output = Exact;

    fn div(self, rhs: &'b Exact) -> Exact {
        let mut result = self.0.clone();
        result /= &rhs.0;
        Exact(result)
    }
}

macro_rules! forward_owned_binop {
    ($($trait:ident :: $method:ident),*) => {
        $(
            impl $trait for Exact {
                type Output = Exact;
                fn $method(self, rhs: Exact) -> Exact {
                    (&self).$method(&rhs)
                }
            }

            impl<'b> $trait<&'b Exact> for Exact {
                type Output = Exact;
                fn $method(self, rhs: &'b Exact) -> Exact {
                    (&self).$method(rhs)
                }
            }
        )*
    };
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

impl<'c> AddAssign<&'c Exact> for Exact {
    fn add_assign(&mut self, rhs: &'c Exact) {
        self.0 += &rhs.0;
    }
}

impl<'d> SubAssign<&'d Exact> for Exact {
    fn sub_assign(&mut self, rhs: &'d Exact) {
        self.0 -= &rhs.0;
    }
}

impl Neg for Exact {
    type Output = Exact;

    fn neg(self) -> Exact {
        Exact(-self.0)
    }
}

impl Neg for &Exact {
    type Output = Exact;

    fn neg(self) -> Exact {
        Exact(-self.0.clone())
    }
}

impl Zero for Exact {
    fn zero() -> Self {
        Exact(Rational::new())
    }

    fn is_zero(&self) -> bool {
        self.sign() == 0
    }
}

impl One for Exact {
    fn one() -> Self {
        Exact(Rational::from(1))
    }
}

impl From<i32> for Exact {
    fn from(value: i32) -> Self {
        Exact(Rational::from(value))
    }
}

impl From<Rational> for Exact {
    fn from(value: Rational) -> Self {
        Exact(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenth_is_not_exactly_representable() {
        let tenth = Exact::from_num_den(1, 10);
        let (lo, hi) = tenth.to_f64_bounds();
        assert!(lo < hi);
        assert!(Exact::from_f64(lo).unwrap() < tenth);
        assert!(Exact::from_f64(hi).unwrap() > tenth);
    }

    #[test]
    fn dyadic_bounds_are_tight() {
        let half = Exact::from_num_den(1, 2);
        assert_eq!(half.to_f64_bounds(), (0.5, 0.5));
    }

    #[test]
    fn arithmetic_is_exact() {
        let a = Exact::from_f64(0.1).unwrap();
        let b = Exact::from_f64(0.2).unwrap();
        let c = &a + &b;
        assert_ne!(c, Exact::from_f64(0.3).unwrap());
        assert_eq!(&c - &b, a);
        assert!(Exact::from_f64(f64::NAN).is_none());
    }
}
