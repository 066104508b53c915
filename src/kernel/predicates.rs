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

//! Exact geometric predicates. Every result is a sign computed without
//! round-off, so it is reliable for any input configuration.

use crate::{
    geometry::exact_point::{Point2, Vec3},
    numeric::exact::Exact,
};

#[inline(always)]
pub fn sub3(a: &Vec3, b: &Vec3) -> Vec3 {
    [&a[0] - &b[0], &a[1] - &b[1], &a[2] - &b[2]]
}

#[inline(always)]
pub fn cross(u: &Vec3, v: &Vec3) -> Vec3 {
    [
        &(&u[1] * &v[2]) - &(&u[2] * &v[1]),
        &(&u[2] * &v[0]) - &(&u[0] * &v[2]),
        &(&u[0] * &v[1]) - &(&u[1] * &v[0]),
    ]
}

#[inline(always)]
pub fn dot(u: &Vec3, v: &Vec3) -> Exact {
    &(&(&u[0] * &v[0]) + &(&u[1] * &v[1])) + &(&u[2] * &v[2])
}

/// Normal `(b - a) x (c - a)` of triangle `abc`, not normalized.
pub fn triangle_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    cross(&sub3(b, a), &sub3(c, a))
}

/// Sign of the 2D cross product `(b - a) x (c - a)`.
///
/// Returns:
/// - >0 if counter-clockwise
/// - <0 if clockwise
/// - =0 if collinear
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> i8 {
    let bx = &b[0] - &a[0];
    let by = &b[1] - &a[1];
    let cx = &c[0] - &a[0];
    let cy = &c[1] - &a[1];
    (&(&bx * &cy) - &(&by * &cx)).sign()
}

/// Sign of the signed volume `((b - a) x (c - a)) . (d - a)`.
///
/// Positive when `d` lies on the side of plane `abc` that the right-handed
/// normal of `abc` points to, zero when the four points are coplanar.
pub fn orient3d(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3) -> i8 {
    dot(&triangle_normal(a, b, c), &sub3(d, a)).sign()
}

/// Positive if `d` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `abc`, zero if the four points are co-circular.
pub fn incircle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> i8 {
    let adx = &a[0] - &d[0];
    let ady = &a[1] - &d[1];
    let bdx = &b[0] - &d[0];
    let bdy = &b[1] - &d[1];
    let cdx = &c[0] - &d[0];
    let cdy = &c[1] - &d[1];

    let abdet = &(&adx * &bdy) - &(&bdx * &ady);
    let bcdet = &(&bdx * &cdy) - &(&cdx * &bdy);
    let cadet = &(&cdx * &ady) - &(&adx * &cdy);
    let alift = &(&adx * &adx) + &(&ady * &ady);
    let blift = &(&bdx * &bdx) + &(&bdy * &bdy);
    let clift = &(&cdx * &cdx) + &(&cdy * &cdy);

    (&(&(&alift * &bcdet) + &(&blift * &cadet)) + &(&clift * &abdet)).sign()
}

/// True when `a`, `b` and `c` lie on one line (coincident points included).
pub fn are_collinear(a: &Vec3, b: &Vec3, c: &Vec3) -> bool {
    triangle_normal(a, b, c).iter().all(|n| n.sign() == 0)
}

/// Sign of `(j - i) . (k - i)`. Negative means `i` lies strictly between `j`
/// and `k` when the three points are collinear.
pub fn dot_sign(i: &Vec3, j: &Vec3, k: &Vec3) -> i8 {
    dot(&sub3(j, i), &sub3(k, i)).sign()
}

/// 2D counterpart of [`dot_sign`].
pub fn dot_sign2(i: &Point2, j: &Point2, k: &Point2) -> i8 {
    let ux = &j[0] - &i[0];
    let uy = &j[1] - &i[1];
    let vx = &k[0] - &i[0];
    let vy = &k[1] - &i[1];
    (&(&ux * &vx) + &(&uy * &vy)).sign()
}

/// Index of the coordinate axis most aligned with the normal of `abc`.
/// Ties resolve to the lower axis.
pub fn maximal_normal_axis(a: &Vec3, b: &Vec3, c: &Vec3) -> usize {
    let n = triangle_normal(a, b, c).map(|v| v.abs());
    let mut best = 0;
    for axis in 1..3 {
        if n[axis] > n[best] {
            best = axis;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32, z: i32) -> Vec3 {
        [Exact::from(x), Exact::from(y), Exact::from(z)]
    }

    fn p(x: i32, y: i32) -> Point2 {
        [Exact::from(x), Exact::from(y)]
    }

    #[test]
    fn ccw_test() {
        assert_eq!(orient2d(&p(0, 0), &p(1, 0), &p(0, 1)), 1);
        assert_eq!(orient2d(&p(0, 0), &p(0, 1), &p(1, 0)), -1);
        assert_eq!(orient2d(&p(0, 0), &p(1, 1), &p(2, 2)), 0);
    }

    #[test]
    fn orientation_3d_signs() {
        let (a, b, c) = (v(0, 0, 0), v(1, 0, 0), v(0, 1, 0));
        assert_eq!(orient3d(&a, &b, &c, &v(0, 0, 1)), 1);
        assert_eq!(orient3d(&a, &b, &c, &v(0, 0, -1)), -1);
        assert_eq!(orient3d(&a, &b, &c, &v(1, 1, 0)), 0);
    }

    #[test]
    fn incircle_signs() {
        let (a, b, c) = (p(0, 0), p(2, 0), p(0, 2));
        assert_eq!(incircle(&a, &b, &c, &p(1, 1)), 1);
        assert_eq!(incircle(&a, &b, &c, &p(2, 2)), 0);
        assert_eq!(incircle(&a, &b, &c, &p(3, 3)), -1);
    }

    #[test]
    fn near_collinear_is_not_collinear() {
        let a = [Exact::from(0), Exact::from(0), Exact::from(0)];
        let b = [Exact::from(1), Exact::from(1), Exact::from(1)];
        let c = [
            Exact::from(2),
            Exact::from(2),
            Exact::from_f64(2.0 + f64::EPSILON * 2.0).unwrap(),
        ];
        assert!(!are_collinear(&a, &b, &c));
        assert!(are_collinear(&a, &b, &v(3, 3, 3)));
    }

    #[test]
    fn dominant_axis() {
        assert_eq!(maximal_normal_axis(&v(0, 0, 0), &v(1, 0, 0), &v(0, 1, 0)), 2);
        assert_eq!(maximal_normal_axis(&v(0, 0, 0), &v(0, 1, 0), &v(0, 0, 1)), 0);
        assert_eq!(maximal_normal_axis(&v(0, 0, 0), &v(1, 0, 1), &v(0, 1, 0)), 0);
    }
}
