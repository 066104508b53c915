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

use corefine::ExactPoint;
use corefine::kernel::{are_collinear, orient2d, orient3d};
use corefine::numeric::Exact;

fn e(x: f64) -> Exact {
    Exact::from_f64(x).unwrap()
}

#[test]
fn test_orient2d_near_degenerate_grid() {
    // Every p lies within a few ulps of the line y = x through q and r.
    let ulp = f64::EPSILON / 2.0;
    let q = [e(12.0), e(12.0)];
    let r = [e(24.0), e(24.0)];
    for i in 0..16 {
        for j in 0..16 {
            let px = 0.5 + i as f64 * ulp;
            let py = 0.5 + j as f64 * ulp;
            let expected = (j as i32 - i as i32).signum() as i8;
            assert_eq!(orient2d(&[e(px), e(py)], &q, &r), expected, "i = {i}, j = {j}");
        }
    }
}

#[test]
fn test_orient3d_on_tilted_plane() {
    // 0.1 is not dyadic, so the lifted points are only nearly on x + y + z = 0.3.
    let a = ExactPoint::from([0.1, 0.1, 0.1]).affine();
    let b = ExactPoint::from([0.3, 0.0, 0.0]).affine();
    let c = ExactPoint::from([0.0, 0.3, 0.0]).affine();
    let d = ExactPoint::from([0.0, 0.0, 0.3]).affine();
    let sign = orient3d(&a, &b, &c, &d);
    assert_eq!(sign, -orient3d(&a, &c, &b, &d));
    assert_eq!(orient3d(&a, &b, &c, &a), 0);
}

#[test]
fn test_collinear_with_repeated_vertex() {
    let a = ExactPoint::from([1.5, -2.0, 7.25]).affine();
    let b = ExactPoint::from([3.0, 1.0, 0.0]).affine();
    assert!(are_collinear(&a, &a, &b));
    assert!(are_collinear(&a, &b, &b));
}
