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

use std::cmp::Ordering;

use num_traits::{One, Zero};

use crate::numeric::exact::Exact;

/// Affine exact 3D coordinates.
pub type Vec3 = [Exact; 3];

/// Affine exact 2D coordinates.
pub type Point2 = [Exact; 2];

/// Homogeneous exact 3D point `(x/w, y/w, z/w)`.
///
/// `w` is never zero. Constructions produce points with an arbitrary `w`;
/// [`ExactPoint::compress`] brings them back to the canonical `w == 1` form so
/// that equal points are also bit-identical.
#[derive(Clone, Debug)]
pub struct ExactPoint {
    pub x: Exact,
    pub y: Exact,
    pub z: Exact,
    pub w: Exact,
}

impl ExactPoint {
    pub fn new(x: Exact, y: Exact, z: Exact, w: Exact) -> Self {
        assert!(!w.is_zero(), "homogeneous weight must be non-zero");
        ExactPoint { x, y, z, w }
    }

    pub fn from_affine([x, y, z]: Vec3) -> Self {
        ExactPoint {
            x,
            y,
            z,
            w: Exact::one(),
        }
    }

    /// Exact lift of a double point. `None` if any coordinate is not finite.
    pub fn from_f64(p: [f64; 3]) -> Option<Self> {
        Some(Self::from_affine([
            Exact::from_f64(p[0])?,
            Exact::from_f64(p[1])?,
            Exact::from_f64(p[2])?,
        ]))
    }

    pub fn is_compressed(&self) -> bool {
        self.w == Exact::one()
    }

    /// Divide through by `w`, leaving every component in lowest terms.
    pub fn compress(&mut self) {
        if self.is_compressed() {
            return;
        }
        let w = std::mem::replace(&mut self.w, Exact::one());
        self.x = &self.x / &w;
        self.y = &self.y / &w;
        self.z = &self.z / &w;
    }

    pub fn compressed(mut self) -> Self {
        self.compress();
        self
    }

    pub fn affine(&self) -> Vec3 {
        if self.is_compressed() {
            [self.x.clone(), self.y.clone(), self.z.clone()]
        } else {
            [&self.x / &self.w, &self.y / &self.w, &self.z / &self.w]
        }
    }

    /// Drop `axis` and keep the two following coordinates in cyclic order.
    pub fn project(&self, axis: usize) -> Point2 {
        let a = self.affine();
        let [u, v] = projection_axes(axis);
        [a[u].clone(), a[v].clone()]
    }

    /// Nearest double coordinates.
    pub fn to_f64(&self) -> [f64; 3] {
        let a = self.affine();
        [a[0].to_f64(), a[1].to_f64(), a[2].to_f64()]
    }

    /// Snap to the nearest double lattice point.
    pub fn rounded(&self) -> Self {
        let [x, y, z] = self.to_f64();
        ExactPoint::from_f64([x, y, z]).unwrap_or_else(|| self.clone())
    }

    /// Largest significant bit count over every numerator and denominator.
    pub fn significant_bits(&self) -> u32 {
        [&self.x, &self.y, &self.z, &self.w]
            .into_iter()
            .map(Exact::significant_bits)
            .max()
            .unwrap_or(0)
    }

    /// Smallest double box containing the point.
    pub fn f64_bounds(&self) -> ([f64; 3], [f64; 3]) {
        let a = self.affine();
        let mut lo = [0.0; 3];
        let mut hi = [0.0; 3];
        for i in 0..3 {
            (lo[i], hi[i]) = a[i].to_f64_bounds();
        }
        (lo, hi)
    }

    fn weighted_cmp(a: &Exact, aw: &Exact, b: &Exact, bw: &Exact) -> Ordering {
        let lhs = a * bw;
        let rhs = b * aw;
        if aw.sign() * bw.sign() < 0 {
            rhs.cmp(&lhs)
        } else {
            lhs.cmp(&rhs)
        }
    }
}

/// The two kept coordinates when dropping `axis`.
#[inline(always)]
pub fn projection_axes(axis: usize) -> [usize; 2] {
    [(axis + 1) % 3, (axis + 2) % 3]
}

impl Ord for ExactPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_compressed() && other.is_compressed() {
            return self
                .x
                .cmp(&other.x)
                .then_with(|| self.y.cmp(&other.y))
                .then_with(|| self.z.cmp(&other.z));
        }
        Self::weighted_cmp(&self.x, &self.w, &other.x, &other.w)
            .then_with(|| Self::weighted_cmp(&self.y, &self.w, &other.y, &other.w))
            .then_with(|| Self::weighted_cmp(&self.z, &self.w, &other.z, &other.w))
    }
}

impl PartialOrd for ExactPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ExactPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ExactPoint {}

impl From<[f64; 3]> for ExactPoint {
    /// Panics on non-finite input; use [`ExactPoint::from_f64`] to check.
    fn from(p: [f64; 3]) -> Self {
        ExactPoint::from_f64(p).expect("coordinates must be finite")
    }
}
