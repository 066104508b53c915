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

//! Exact coordinates for symbolic intersection points.

use crate::{
    corefinement::classify::{PreparedMesh, TrianglePairIntersection},
    geometry::{
        exact_point::{ExactPoint, Vec3},
        intersection::{intersect_line_triangle_3d, intersect_lines_3d},
        tri_tri_intersect::{Element, SymbolicPoint},
    },
    parallel::for_each_indexed,
};

/// Exact location of `point`, which lies on feature `elem_a` of triangle
/// `a` and feature `elem_b` of triangle `b`.
///
/// The operands are put in canonical feature order first, so the result
/// does not depend on which triangle is called `a`.
pub(crate) fn resolve_point(a: &[Vec3; 3], b: &[Vec3; 3], point: SymbolicPoint) -> ExactPoint {
    let (mut elem_a, mut elem_b, mut a, mut b) = (point.elem_a, point.elem_b, a, b);
    if elem_a > elem_b {
        std::mem::swap(&mut elem_a, &mut elem_b);
        std::mem::swap(&mut a, &mut b);
    }

    if let Some(i) = elem_a.vertex_index() {
        return ExactPoint::from_affine(a[i].clone());
    }
    let Some((i, j)) = elem_a.edge_endpoints() else {
        unreachable!("face-face intersection point");
    };
    if elem_b == Element::F {
        return intersect_line_triangle_3d(&a[i], &a[j], &b[0], &b[1], &b[2]);
    }
    let Some((k, l)) = elem_b.edge_endpoints() else {
        unreachable!("edge ordered after {elem_b:?}");
    };
    intersect_lines_3d(&a[i], &a[j], &b[k], &b[l], None)
}

/// Fill in `points` of every recorded pair.
pub(crate) fn resolve_pairs(
    pairs: &mut [Vec<TrianglePairIntersection>],
    a: &PreparedMesh,
    b: &PreparedMesh,
    parallel: bool,
) {
    for_each_indexed(pairs, parallel, |triangle_a, list| {
        for pair in list.iter_mut() {
            debug_assert_eq!(pair.triangle_a as usize, triangle_a);
            let corners_a = &a.corners[pair.triangle_a as usize];
            let corners_b = &b.corners[pair.triangle_b as usize];
            pair.points = pair
                .intersection
                .points()
                .iter()
                .map(|&p| resolve_point(corners_a, corners_b, p))
                .collect();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{corefinement::classify::collect_pairs, error::MeshLabel, mesh::IndexedMesh};

    #[test]
    fn pairs_are_listed_under_their_own_triangle() {
        let a = IndexedMesh::new(
            vec![
                [0.0, 0.0, 100.0],
                [1.0, 0.0, 100.0],
                [0.0, 1.0, 100.0],
                [0.0, 0.0, 0.0],
                [4.0, 0.0, 0.0],
                [0.0, 4.0, 0.0],
            ],
            vec![0, 1, 2, 3, 4, 5],
        );
        let b = IndexedMesh::new(vec![[1.0, -1.0, -1.0], [1.0, 10.0, -1.0], [1.0, -1.0, 10.0]], vec![0, 1, 2]);
        let a = PreparedMesh::new(&a, MeshLabel::A, false).unwrap();
        let b = PreparedMesh::new(&b, MeshLabel::B, false).unwrap();

        let mut pairs = collect_pairs(&a, &b, 4, false);
        assert!(pairs[0].is_empty());
        assert_eq!(pairs[1].len(), 1);
        assert_eq!(pairs[1][0].triangle_a, 1);
        assert_eq!(pairs[1][0].triangle_b, 0);

        resolve_pairs(&mut pairs, &a, &b, false);
        let resolved: Vec<[f64; 3]> = pairs[1][0].points.iter().map(ExactPoint::to_f64).collect();
        assert_eq!(resolved.len(), 2);
        assert!(resolved.contains(&[1.0, 0.0, 0.0]));
        assert!(resolved.contains(&[1.0, 3.0, 0.0]));
    }
}
