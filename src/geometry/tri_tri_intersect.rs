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

//! Symbolic triangle-triangle intersection.
//!
//! Classifies *how* two triangles meet, as pairs of topological features
//! (vertex, edge or face of each triangle), using only exact orientation
//! predicates. No intersection coordinate is ever constructed here; see
//! `geometry::intersection` for that.

use smallvec::SmallVec;

use crate::{
    geometry::exact_point::Vec3,
    kernel::predicates::{dot_sign, maximal_normal_axis, orient3d},
    numeric::exact::Exact,
};

/// A topological feature of a triangle `(v0, v1, v2)`.
///
/// The declaration order is the canonical total order used to normalize
/// operand order when resolving intersections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    V0,
    V1,
    V2,
    E01,
    E12,
    E20,
    F,
}

const EDGE_01: u8 = 0b001;
const EDGE_12: u8 = 0b010;
const EDGE_20: u8 = 0b100;

impl Element {
    #[inline(always)]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn is_vertex(self) -> bool {
        matches!(self, Element::V0 | Element::V1 | Element::V2)
    }

    pub fn is_edge(self) -> bool {
        matches!(self, Element::E01 | Element::E12 | Element::E20)
    }

    pub fn vertex_index(self) -> Option<usize> {
        match self {
            Element::V0 => Some(0),
            Element::V1 => Some(1),
            Element::V2 => Some(2),
            _ => None,
        }
    }

    pub fn edge_endpoints(self) -> Option<(usize, usize)> {
        match self {
            Element::E01 => Some((0, 1)),
            Element::E12 => Some((1, 2)),
            Element::E20 => Some((2, 0)),
            _ => None,
        }
    }

    /// Triangle edges containing this feature.
    fn edge_mask(self) -> u8 {
        match self {
            Element::V0 => EDGE_01 | EDGE_20,
            Element::V1 => EDGE_01 | EDGE_12,
            Element::V2 => EDGE_12 | EDGE_20,
            Element::E01 => EDGE_01,
            Element::E12 => EDGE_12,
            Element::E20 => EDGE_20,
            Element::F => 0,
        }
    }

    /// Whether two distinct points on these features lie on one input edge.
    fn shares_edge_with(self, other: Element) -> bool {
        if self == other && self.is_vertex() {
            return false;
        }
        self.edge_mask() & other.edge_mask() != 0
    }
}

/// One intersection point: the feature of triangle A and the feature of
/// triangle B it lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolicPoint {
    pub elem_a: Element,
    pub elem_b: Element,
}

impl SymbolicPoint {
    pub fn new(elem_a: Element, elem_b: Element) -> Self {
        SymbolicPoint { elem_a, elem_b }
    }

    pub fn swapped(self) -> Self {
        SymbolicPoint::new(self.elem_b, self.elem_a)
    }

    fn is_on_input_edge_with(&self, other: &SymbolicPoint) -> bool {
        self.elem_a.shares_edge_with(other.elem_a) || self.elem_b.shares_edge_with(other.elem_b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntersectionType {
    None,
    Point,
    Edge,
    Polygon,
}

/// Topological classification of the intersection of two triangles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolicIntersection {
    points: SmallVec<[SymbolicPoint; 6]>,
}

type PointBuffer = SmallVec<[SymbolicPoint; 12]>;

impl SymbolicIntersection {
    /// Classify the intersection of triangles `a` and `b`.
    ///
    /// Both triangles must be non-degenerate. For `Polygon` results the
    /// points are ordered along the boundary of the intersection polygon.
    pub fn intersect(a: &[Vec3; 3], b: &[Vec3; 3]) -> Self {
        let mut points = PointBuffer::new();
        Self::intersect_triangle_edges(a, b, &mut points);

        let mid = points.len();
        Self::intersect_triangle_edges(b, a, &mut points);
        for p in &mut points[mid..] {
            *p = p.swapped();
        }

        points.sort_unstable();
        points.dedup();
        debug_assert!(points.len() <= 6, "too many intersection points: {points:?}");

        let mut result = SymbolicIntersection {
            points: points.into_iter().collect(),
        };
        result.sort_points_for_polygon();
        result
    }

    pub fn from_points(points: impl IntoIterator<Item = SymbolicPoint>) -> Self {
        SymbolicIntersection {
            points: points.into_iter().collect(),
        }
    }

    pub fn points(&self) -> &[SymbolicPoint] {
        &self.points
    }

    pub fn kind(&self) -> IntersectionType {
        match self.points.len() {
            0 => IntersectionType::None,
            1 => IntersectionType::Point,
            2 => IntersectionType::Edge,
            _ => IntersectionType::Polygon,
        }
    }

    /// The same intersection seen from the other triangle.
    pub fn swapped(&self) -> Self {
        SymbolicIntersection {
            points: self.points.iter().map(|p| p.swapped()).collect(),
        }
    }

    fn intersect_triangle_edges(t: &[Vec3; 3], other: &[Vec3; 3], out: &mut PointBuffer) {
        use Element::*;
        let [a, b, c] = other;
        Self::intersect_edge_triangle(E01, V0, V1, &t[0], &t[1], a, b, c, out);
        Self::intersect_edge_triangle(E12, V1, V2, &t[1], &t[2], a, b, c, out);
        Self::intersect_edge_triangle(E20, V2, V0, &t[2], &t[0], a, b, c, out);
    }

    /// Order polygon points so that consecutive points share an input edge.
    fn sort_points_for_polygon(&mut self) {
        if self.kind() != IntersectionType::Polygon {
            return;
        }

        let points = &self.points;
        let find_neighbor = |p: usize, ignore: Option<usize>| -> usize {
            (0..points.len())
                .find(|&i| {
                    i != p && Some(i) != ignore && points[p].is_on_input_edge_with(&points[i])
                })
                .unwrap_or_else(|| unreachable!("polygon point {p} has no neighbor"))
        };

        let mut ordered: SmallVec<[SymbolicPoint; 6]> = SmallVec::new();
        let mut ignore = 0;
        let mut last = find_neighbor(0, None);
        ordered.push(points[0]);
        ordered.push(points[last]);
        while ordered.len() < points.len() {
            let neighbor = find_neighbor(last, Some(ignore));
            ordered.push(points[neighbor]);
            ignore = last;
            last = neighbor;
        }
        self.points = ordered;
    }

    #[allow(clippy::too_many_arguments)]
    fn intersect_edge_triangle(
        edge_pq: Element,
        vertex_p: Element,
        vertex_q: Element,
        p: &Vec3,
        q: &Vec3,
        a: &Vec3,
        b: &Vec3,
        c: &Vec3,
        out: &mut PointBuffer,
    ) {
        let s0 = orient3d(a, b, c, p);
        let s1 = orient3d(a, b, c, q);
        if s0 * s1 > 0 {
            // p and q strictly on the same side of abc
            return;
        }
        if s0 == 0 && s1 == 0 {
            return Self::intersect_coplanar_edge_triangle(
                edge_pq, vertex_p, vertex_q, p, q, a, b, c, out,
            );
        }

        let o0 = orient3d(p, q, a, b);
        let o1 = orient3d(p, q, b, c);
        let o2 = orient3d(p, q, c, a);
        if o0 * o1 < 0 || o1 * o2 < 0 || o2 * o0 < 0 {
            // pq meets the plane of abc outside the triangle
            return;
        }

        let first = if s0 == 0 {
            vertex_p
        } else if s1 == 0 {
            vertex_q
        } else {
            edge_pq
        };

        // Bit i set when pq is coplanar with edge i of abc.
        const SECOND: [Element; 8] = [
            Element::F,
            Element::E01,
            Element::E12,
            Element::V1,
            Element::E20,
            Element::V0,
            Element::V2,
            Element::F,
        ];
        let index = ((o2 == 0) as usize) << 2 | ((o1 == 0) as usize) << 1 | (o0 == 0) as usize;
        debug_assert!(index != 7, "pq is coplanar with every edge of abc");
        out.push(SymbolicPoint::new(first, SECOND[index]));
    }

    #[allow(clippy::too_many_arguments)]
    fn intersect_coplanar_edge_triangle(
        edge_pq: Element,
        vertex_p: Element,
        vertex_q: Element,
        p: &Vec3,
        q: &Vec3,
        a: &Vec3,
        b: &Vec3,
        c: &Vec3,
        out: &mut PointBuffer,
    ) {
        // Any point off the common plane turns orient3d into a consistent 2D
        // orientation test on that plane.
        let offset_axis = maximal_normal_axis(a, b, c);
        let mut observer = p.clone();
        observer[offset_axis] = &observer[offset_axis] + &Exact::from(1);
        let orient = |i: &Vec3, j: &Vec3, k: &Vec3| orient3d(i, j, k, &observer);

        let mut fall_within = 0;
        for (pt, vertex) in [(p, vertex_p), (q, vertex_q)] {
            let s0 = orient(a, b, pt);
            let s1 = orient(b, c, pt);
            let s2 = orient(c, a, pt);
            if s0 * s1 > 0 && s1 * s2 > 0 {
                out.push(SymbolicPoint::new(vertex, Element::F));
                fall_within += 1;
            }
        }
        if fall_within == 2 {
            return;
        }

        use Element::*;
        for (edge_ab, vertex_a, vertex_b, ea, eb) in [(E01, V0, V1, a, b), (E12, V1, V2, b, c), (E20, V2, V0, c, a)]
        {
            let sp = orient(ea, eb, p);
            let sq = orient(ea, eb, q);
            if sp * sq > 0 {
                continue;
            }
            if sp == 0 && sq == 0 {
                Self::intersect_collinear_edge_edge(
                    [edge_pq, vertex_p, vertex_q],
                    [edge_ab, vertex_a, vertex_b],
                    p,
                    q,
                    ea,
                    eb,
                    out,
                );
                continue;
            }

            let sa = orient(p, q, ea);
            let sb = orient(p, q, eb);
            debug_assert!(sa != 0 || sb != 0);
            if sa * sb > 0 {
                continue;
            }

            let first = if sp == 0 {
                vertex_p
            } else if sq == 0 {
                vertex_q
            } else {
                edge_pq
            };
            let second = if sa == 0 {
                vertex_a
            } else if sb == 0 {
                vertex_b
            } else {
                edge_ab
            };
            out.push(SymbolicPoint::new(first, second));
        }
    }

    /// `pq` and `ab` lie on one line. Features are `[edge, start, end]`.
    fn intersect_collinear_edge_edge(
        [edge_pq, vertex_p, vertex_q]: [Element; 3],
        [edge_ab, vertex_a, vertex_b]: [Element; 3],
        p: &Vec3,
        q: &Vec3,
        a: &Vec3,
        b: &Vec3,
        out: &mut PointBuffer,
    ) {
        if p == a {
            out.push(SymbolicPoint::new(vertex_p, vertex_a));
        } else if p == b {
            out.push(SymbolicPoint::new(vertex_p, vertex_b));
        }
        if q == a {
            out.push(SymbolicPoint::new(vertex_q, vertex_a));
        } else if q == b {
            out.push(SymbolicPoint::new(vertex_q, vertex_b));
        }

        if dot_sign(p, a, b) < 0 {
            out.push(SymbolicPoint::new(vertex_p, edge_ab));
        }
        if dot_sign(q, a, b) < 0 {
            out.push(SymbolicPoint::new(vertex_q, edge_ab));
        }
        if dot_sign(a, p, q) < 0 {
            out.push(SymbolicPoint::new(edge_pq, vertex_a));
        }
        if dot_sign(b, p, q) < 0 {
            out.push(SymbolicPoint::new(edge_pq, vertex_b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_edge_lookup() {
        use Element::*;
        assert!(V0.shares_edge_with(V1));
        assert!(V0.shares_edge_with(E20));
        assert!(!V0.shares_edge_with(V0));
        assert!(!V0.shares_edge_with(E12));
        assert!(E01.shares_edge_with(E01));
        assert!(!E01.shares_edge_with(E12));
        assert!(!F.shares_edge_with(F));
    }

    #[test]
    fn canonical_order_puts_vertices_first() {
        assert!(Element::V2.ordinal() < Element::E01.ordinal());
        assert!(Element::E20.ordinal() < Element::F.ordinal());
    }
}
