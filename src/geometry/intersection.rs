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

//! Exact intersection constructions.
//!
//! Results are built in homogeneous form and compressed, so the same
//! geometric point always comes out with the same representation.

use num_traits::Zero;

use crate::{
    geometry::exact_point::{ExactPoint, Point2, Vec3, projection_axes},
    kernel::predicates::{cross, dot, maximal_normal_axis, orient2d, sub3},
    numeric::exact::Exact,
};

/// Intersection of the coplanar lines `ab` and `cd`.
///
/// The lines are solved in the plane obtained by dropping `axis`; when
/// `axis` is `None` the dominant normal axis of `a`, `b`, `c` is used. The
/// projected lines must not be parallel.
pub fn intersect_lines_3d(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3, axis: Option<usize>) -> ExactPoint {
    let axis = axis.unwrap_or_else(|| maximal_normal_axis(a, b, c));
    let [u, v] = projection_axes(axis);

    // a + (b - a) * t with t = det1 / det by Cramer's rule
    let ab = sub3(b, a);
    let dc = sub3(c, d);
    let ac = sub3(c, a);
    let det = &(&ab[u] * &dc[v]) - &(&dc[u] * &ab[v]);
    let det1 = &(&ac[u] * &dc[v]) - &(&dc[u] * &ac[v]);
    if det.is_zero() {
        unreachable!("projected lines are parallel");
    }

    let [x, y, z] = std::array::from_fn(|i| &(&a[i] * &det) + &(&ab[i] * &det1));
    ExactPoint::new(x, y, z, det).compressed()
}

/// Intersection of line `pq` with the plane of triangle `abc`.
///
/// `pq` must not be parallel to that plane.
pub fn intersect_line_triangle_3d(p: &Vec3, q: &Vec3, a: &Vec3, b: &Vec3, c: &Vec3) -> ExactPoint {
    // (p - a + (q - p) * t) . n = 0
    let n = cross(&sub3(c, a), &sub3(b, a));
    let pa = sub3(p, a);
    let pq = sub3(q, p);
    let tu = -dot(&pa, &n);
    let td = dot(&pq, &n);
    if td.is_zero() {
        unreachable!("line is parallel to the triangle plane");
    }

    let [x, y, z] = std::array::from_fn(|i| &(&p[i] * &td) + &(&pq[i] * &tu));
    ExactPoint::new(x, y, z, td).compressed()
}

/// Crossing point of segments `ab` and `cd` when they cross at a single
/// point interior to both. Touching or overlapping segments yield `None`.
pub fn intersect_segments_2d(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> Option<Point2> {
    let o1 = orient2d(a, b, c);
    let o2 = orient2d(a, b, d);
    let o3 = orient2d(c, d, a);
    let o4 = orient2d(c, d, b);
    if o1 * o2 >= 0 || o3 * o4 >= 0 {
        return None;
    }

    let abx = &b[0] - &a[0];
    let aby = &b[1] - &a[1];
    let dcx = &c[0] - &d[0];
    let dcy = &c[1] - &d[1];
    let acx = &c[0] - &a[0];
    let acy = &c[1] - &a[1];
    let det = &(&abx * &dcy) - &(&dcx * &aby);
    let t: Exact = &(&(&acx * &dcy) - &(&dcx * &acy)) / &det;
    Some([&a[0] + &(&abx * &t), &a[1] + &(&aby * &t)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32, z: i32) -> Vec3 {
        [Exact::from(x), Exact::from(y), Exact::from(z)]
    }

    fn p2(x: i32, y: i32) -> Point2 {
        [Exact::from(x), Exact::from(y)]
    }

    #[test]
    fn line_line_in_tilted_plane() {
        // Both lines lie in x + y + z = 3 and meet at (3/2, 3/2, 0).
        let a = v(3, 0, 0);
        let b = v(0, 3, 0);
        let c = v(0, 0, 3);
        let mid = [Exact::from_num_den(3, 2), Exact::from_num_den(3, 2), Exact::from(0)];
        let hit = intersect_lines_3d(&c, &mid, &a, &b, None);
        assert!(hit.is_compressed());
        assert_eq!(hit.affine(), mid);
        assert_eq!(hit, intersect_lines_3d(&a, &b, &c, &mid, Some(2)));
    }

    #[test]
    fn line_triangle_hits_plane() {
        let hit = intersect_line_triangle_3d(&v(1, 1, -1), &v(1, 1, 3), &v(0, 0, 0), &v(4, 0, 0), &v(0, 4, 0));
        assert_eq!(hit.affine(), v(1, 1, 0));
        let reversed = intersect_line_triangle_3d(&v(1, 1, 3), &v(1, 1, -1), &v(0, 4, 0), &v(4, 0, 0), &v(0, 0, 0));
        assert_eq!(hit, reversed);
    }

    #[test]
    fn segments_cross_or_not() {
        let hit = intersect_segments_2d(&p2(0, 0), &p2(2, 2), &p2(0, 2), &p2(2, 0));
        assert_eq!(hit, Some(p2(1, 1)));
        assert_eq!(intersect_segments_2d(&p2(0, 0), &p2(2, 0), &p2(2, 0), &p2(3, 1)), None);
        assert_eq!(intersect_segments_2d(&p2(0, 0), &p2(2, 0), &p2(0, 1), &p2(2, 1)), None);
    }
}
