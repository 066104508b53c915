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

//! Per-triangle retriangulation along the intersection curve.

use std::collections::BTreeMap;

use crate::{
    corefinement::classify::TrianglePairIntersection,
    geometry::{
        exact_point::{ExactPoint, Vec3},
        intersection::intersect_lines_3d,
        tri_tri_intersect::IntersectionType,
    },
    kernel::predicates::{maximal_normal_axis, orient2d},
    operations::triangulation::{
        BOUNDARY_MASK, ConstrainedTriangulation, Constraint, INTERSECTION_MASK,
    },
};

/// Local refinement of one input triangle. The first three points are the
/// triangle's corners.
#[derive(Clone, Debug)]
pub(crate) struct PerTriangleOutput {
    pub points: Vec<ExactPoint>,
    pub triangles: Vec<[u32; 3]>,
    /// Local edges on the intersection curve, `v0 < v1`, sorted.
    pub cut_edges: Vec<[u32; 2]>,
    /// The input triangle was copied without retriangulation.
    pub passthrough: bool,
    pub steiner_count: usize,
}

impl PerTriangleOutput {
    fn passthrough(corners: &[Vec3; 3]) -> Self {
        PerTriangleOutput {
            points: corners.iter().cloned().map(ExactPoint::from_affine).collect(),
            triangles: vec![[0, 1, 2]],
            cut_edges: Vec::new(),
            passthrough: true,
            steiner_count: 0,
        }
    }
}

#[derive(Default)]
struct PointSet {
    points: Vec<ExactPoint>,
    index: BTreeMap<ExactPoint, usize>,
}

impl PointSet {
    fn add(&mut self, p: &ExactPoint) -> usize {
        if let Some(&i) = self.index.get(p) {
            return i;
        }
        let i = self.points.len();
        self.points.push(p.clone());
        self.index.insert(p.clone(), i);
        i
    }
}

/// Refine the triangle with `corners` so that every intersection in
/// `pairs` becomes a union of its edges.
pub(crate) fn retriangulate(
    corners: &[Vec3; 3],
    degenerate: bool,
    pairs: &[&TrianglePairIntersection],
    delaunay: bool,
) -> PerTriangleOutput {
    if degenerate || pairs.is_empty() {
        return PerTriangleOutput::passthrough(corners);
    }

    let mut set = PointSet::default();
    let mut constraints = Vec::new();
    for corner in corners {
        set.add(&ExactPoint::from_affine(corner.clone()));
    }
    for (i, j) in [(0, 1), (1, 2), (2, 0)] {
        constraints.push(Constraint::new(i, j, BOUNDARY_MASK));
    }

    for pair in pairs {
        let ids: Vec<usize> = pair.points.iter().map(|p| set.add(p)).collect();
        match pair.intersection.kind() {
            IntersectionType::None => unreachable!("empty intersections are never recorded"),
            IntersectionType::Point => {}
            IntersectionType::Edge => {
                constraints.push(Constraint::new(ids[0], ids[1], INTERSECTION_MASK));
            }
            IntersectionType::Polygon => {
                for k in 0..ids.len() {
                    constraints.push(Constraint::new(ids[k], ids[(k + 1) % ids.len()], INTERSECTION_MASK));
                }
            }
        }
    }

    let axis = maximal_normal_axis(&corners[0], &corners[1], &corners[2]);
    let projected: Vec<_> = set.points.iter().map(|p| p.project(axis)).collect();
    let input_orientation = orient2d(&projected[0], &projected[1], &projected[2]);

    let cdt = ConstrainedTriangulation::triangulate(projected, &constraints, delaunay);

    let mut points = set.points;
    let affine: Vec<Vec3> = points.iter().map(ExactPoint::affine).collect();
    for steiner in &cdt.new_intersections {
        let c0 = &constraints[steiner.constraint0];
        let c1 = &constraints[steiner.constraint1];
        points.push(intersect_lines_3d(
            &affine[c0.a],
            &affine[c0.b],
            &affine[c1.a],
            &affine[c1.b],
            Some(axis),
        ));
    }

    // Triangulation output is counter-clockwise in the projection plane.
    let flip = input_orientation < 0;
    let triangles = cdt
        .triangles
        .iter()
        .map(|t| {
            let [a, b, c] = t.map(|i| i as u32);
            if flip { [a, c, b] } else { [a, b, c] }
        })
        .collect();

    let mut cut_edges: Vec<[u32; 2]> = cdt
        .edge_masks
        .iter()
        .filter(|&(_, &mask)| mask & INTERSECTION_MASK != 0)
        .map(|(e, _)| [e.0 as u32, e.1 as u32])
        .collect();
    cut_edges.sort_unstable();

    PerTriangleOutput {
        points,
        triangles,
        cut_edges,
        passthrough: false,
        steiner_count: cdt.new_intersections.len(),
    }
}
