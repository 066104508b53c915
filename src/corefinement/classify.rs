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

//! Degeneracy filter and broad/narrow phase pairing of triangles.

use crate::{
    error::{CorefineError, MeshLabel},
    geometry::{
        aabb::Aabb,
        bvh::Bvh,
        exact_point::{ExactPoint, Vec3},
        tri_tri_intersect::{IntersectionType, SymbolicIntersection},
    },
    kernel::predicates::are_collinear,
    mesh::{IndexedMesh, MeshPoint},
    parallel::map_indices,
};

/// One operand, lifted to exact coordinates.
pub(crate) struct PreparedMesh {
    pub corners: Vec<[Vec3; 3]>,
    pub boxes: Vec<Aabb>,
    pub degenerate: Vec<bool>,
}

impl PreparedMesh {
    pub fn new<P: MeshPoint>(mesh: &IndexedMesh<P>, label: MeshLabel, parallel: bool) -> Result<Self, CorefineError> {
        let points = mesh.exact_positions(label)?;
        let bounds: Vec<([f64; 3], [f64; 3])> = points.iter().map(ExactPoint::f64_bounds).collect();

        let triangle_count = mesh.triangle_count();
        let corners: Vec<[Vec3; 3]> = map_indices(triangle_count, parallel, |t| {
            mesh.triangle(t).map(|i| points[i as usize].affine())
        });
        let boxes = (0..triangle_count)
            .map(|t| {
                let mut aabb = Aabb::empty();
                for i in mesh.triangle(t) {
                    let (lo, hi) = &bounds[i as usize];
                    aabb.expand_point(lo);
                    aabb.expand_point(hi);
                }
                aabb
            })
            .collect();
        let degenerate = flag_degenerate(&corners, parallel);

        Ok(PreparedMesh {
            corners,
            boxes,
            degenerate,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.corners.len()
    }

    pub fn degenerate_count(&self) -> usize {
        self.degenerate.iter().filter(|&&d| d).count()
    }
}

/// Collinear (including repeated-vertex) triangles.
pub(crate) fn flag_degenerate(corners: &[[Vec3; 3]], parallel: bool) -> Vec<bool> {
    map_indices(corners.len(), parallel, |t| {
        let [p0, p1, p2] = &corners[t];
        are_collinear(p0, p1, p2)
    })
}

/// A pair of triangles, one from each mesh, that meet.
#[derive(Clone, Debug)]
pub(crate) struct TrianglePairIntersection {
    pub triangle_a: u32,
    pub triangle_b: u32,
    pub intersection: SymbolicIntersection,
    /// One resolved point per symbolic point, in the same order.
    pub points: Vec<ExactPoint>,
}

/// For every triangle of `a`, the triangles of `b` it intersects.
///
/// Candidates come from a BVH over `b`; each is confirmed by the exact
/// symbolic classifier. Degenerate triangles of either mesh never pair.
pub(crate) fn collect_pairs(
    a: &PreparedMesh,
    b: &PreparedMesh,
    leaf_size: usize,
    parallel: bool,
) -> Vec<Vec<TrianglePairIntersection>> {
    let centers: Vec<[f64; 3]> = b
        .boxes
        .iter()
        .map(|aabb| [aabb.center(0), aabb.center(1), aabb.center(2)])
        .collect();
    let bvh = Bvh::build(&b.boxes, &centers, leaf_size);

    map_indices(a.triangle_count(), parallel, |triangle_a| {
        if a.degenerate[triangle_a] {
            return Vec::new();
        }
        let query = &a.boxes[triangle_a];
        let mut candidates = Vec::new();
        bvh.collect_candidates(
            |aabb| aabb.intersects(query),
            |triangle_b| {
                if !b.degenerate[triangle_b as usize] && b.boxes[triangle_b as usize].intersects(query) {
                    candidates.push(triangle_b);
                }
            },
        );
        candidates.sort_unstable();

        candidates
            .into_iter()
            .filter_map(|triangle_b| {
                let intersection =
                    SymbolicIntersection::intersect(&a.corners[triangle_a], &b.corners[triangle_b as usize]);
                (intersection.kind() != IntersectionType::None).then(|| TrianglePairIntersection {
                    triangle_a: triangle_a as u32,
                    triangle_b,
                    intersection,
                    points: Vec::new(),
                })
            })
            .collect()
    })
}
