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

//! Constrained (optionally Delaunay) triangulation of a point set lying in
//! a domain triangle, with exact arithmetic.
//!
//! Points are located by walking from the previously located triangle and
//! inserted incrementally into the domain triangle. Every constraint segment
//! is then traced from its first endpoint and recovered by edge flips. A constraint crossing an
//! already committed constraint splits both at a new Steiner point, which
//! is reported in [`ConstrainedTriangulation::new_intersections`].

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use smallvec::SmallVec;

use crate::{
    geometry::{exact_point::Point2, intersection::intersect_segments_2d},
    kernel::predicates::{dot_sign2, incircle, orient2d},
};

/// Constraint mask bit for the edges of the domain triangle.
pub const BOUNDARY_MASK: u32 = 1;
/// Constraint mask bit for intersection curve edges.
pub const INTERSECTION_MASK: u32 = 2;

/// Undirected edge, stored with `0 < 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a < b { Edge(a, b) } else { Edge(b, a) }
    }
}

/// Segment between two input points that must appear as a union of edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub a: usize,
    pub b: usize,
    pub mask: u32,
}

impl Constraint {
    pub fn new(a: usize, b: usize, mask: u32) -> Self {
        Constraint { a, b, mask }
    }
}

/// A Steiner point created where two constraints cross. The `k`-th record
/// describes point `input_len + k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstraintIntersection {
    pub constraint0: usize,
    pub constraint1: usize,
}

#[derive(Clone, Debug)]
pub struct ConstrainedTriangulation {
    /// Input points followed by Steiner points.
    pub points: Vec<Point2>,
    /// Counter-clockwise triangles covering the domain triangle.
    pub triangles: Vec<[usize; 3]>,
    /// Union of the masks of every constraint running along each edge.
    pub edge_masks: AHashMap<Edge, u32>,
    pub new_intersections: Vec<ConstraintIntersection>,
}

#[derive(Default)]
struct Adj {
    // undirected edge -> up to 2 triangle indices
    edge2tris: AHashMap<Edge, SmallVec<[usize; 2]>>,
    // vertex -> incident triangle indices, unordered
    vert2tris: Vec<SmallVec<[usize; 8]>>,
}

impl Adj {
    #[inline]
    fn add_tri(&mut self, ti: usize, t: [usize; 3]) {
        for (u, v) in tri_edges(t) {
            self.edge2tris.entry(Edge::new(u, v)).or_default().push(ti);
        }
        for v in t {
            if v >= self.vert2tris.len() {
                self.vert2tris.resize_with(v + 1, SmallVec::new);
            }
            self.vert2tris[v].push(ti);
        }
    }

    #[inline]
    fn remove_tri(&mut self, ti: usize, t: [usize; 3]) {
        for (u, v) in tri_edges(t) {
            let e = Edge::new(u, v);
            if let Some(list) = self.edge2tris.get_mut(&e) {
                if let Some(pos) = list.iter().position(|&x| x == ti) {
                    list.swap_remove(pos);
                }
                if list.is_empty() {
                    self.edge2tris.remove(&e);
                }
            }
        }
        for v in t {
            if let Some(list) = self.vert2tris.get_mut(v) {
                if let Some(pos) = list.iter().position(|&x| x == ti) {
                    list.swap_remove(pos);
                }
            }
        }
    }

    fn tris(&self, e: Edge) -> &[usize] {
        self.edge2tris.get(&e).map_or(&[], |list| list.as_slice())
    }

    fn around(&self, v: usize) -> &[usize] {
        self.vert2tris.get(v).map_or(&[], |list| list.as_slice())
    }

    /// The triangle across `e` from `ti`.
    fn neighbor(&self, e: Edge, ti: usize) -> Option<usize> {
        self.tris(e).iter().copied().find(|&other| other != ti)
    }
}

#[inline]
fn tri_edges(t: [usize; 3]) -> [(usize, usize); 3] {
    [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])]
}

/// Rotate `t` so that `u` and `v` come first, in the triangle's own order.
fn rotate_to_edge(t: [usize; 3], u: usize, v: usize) -> [usize; 3] {
    for r in 0..3 {
        let rt = [t[r], t[(r + 1) % 3], t[(r + 2) % 3]];
        if (rt[0] == u && rt[1] == v) || (rt[0] == v && rt[1] == u) {
            return rt;
        }
    }
    unreachable!("edge ({u}, {v}) is not in triangle {t:?}");
}

/// Rotate `t` so that `v` comes first.
fn rotate_to_vertex(t: [usize; 3], v: usize) -> [usize; 3] {
    match t.iter().position(|&x| x == v) {
        Some(r) => [t[r], t[(r + 1) % 3], t[(r + 2) % 3]],
        None => unreachable!("vertex {v} is not in triangle {t:?}"),
    }
}

/// What a constraint segment runs into, walking from its first endpoint.
enum Trace {
    /// A vertex on the open segment.
    Vertex(usize),
    /// Edges properly crossed by the segment, in walk order.
    Crossings(Vec<Edge>),
}

struct Builder {
    points: Vec<Point2>,
    triangles: Vec<[usize; 3]>,
    adj: Adj,
    masks: AHashMap<Edge, u32>,
    // committed edge -> index of the constraint that produced it
    owners: AHashMap<Edge, usize>,
    new_intersections: Vec<ConstraintIntersection>,
    // where the next point location starts
    last: usize,
    walk_seed: usize,
}

impl ConstrainedTriangulation {
    /// Triangulate `points` honoring `constraints`.
    ///
    /// The first three points span the domain triangle; every other point
    /// must lie inside it or on its boundary, and no two points coincide.
    /// With `delaunay`, unconstrained edges are flipped until every one of
    /// them is locally Delaunay.
    pub fn triangulate(points: Vec<Point2>, constraints: &[Constraint], delaunay: bool) -> Self {
        assert!(points.len() >= 3, "a domain triangle is required");
        let orientation = orient2d(&points[0], &points[1], &points[2]);
        assert!(orientation != 0, "domain triangle is degenerate");

        let root = if orientation > 0 { [0, 1, 2] } else { [0, 2, 1] };
        let mut builder = Builder {
            points,
            triangles: vec![root],
            adj: Adj::default(),
            masks: AHashMap::default(),
            owners: AHashMap::default(),
            new_intersections: Vec::new(),
            last: 0,
            walk_seed: 0,
        };
        builder.adj.add_tri(0, root);

        for p in 3..builder.points.len() {
            builder.insert_point(p, delaunay);
        }
        for (ci, c) in constraints.iter().enumerate() {
            builder.insert_constraint(ci, constraints, c.a, c.b);
        }
        if delaunay {
            builder.restore_delaunay();
        }

        ConstrainedTriangulation {
            points: builder.points,
            triangles: builder.triangles,
            edge_masks: builder.masks,
            new_intersections: builder.new_intersections,
        }
    }

    pub fn edge_mask(&self, a: usize, b: usize) -> u32 {
        self.edge_masks.get(&Edge::new(a, b)).copied().unwrap_or(0)
    }
}

impl Builder {
    fn set_tri(&mut self, ti: usize, t: [usize; 3]) {
        let old = self.triangles[ti];
        self.adj.remove_tri(ti, old);
        self.triangles[ti] = t;
        self.adj.add_tri(ti, t);
    }

    fn push_tri(&mut self, t: [usize; 3]) {
        let ti = self.triangles.len();
        self.triangles.push(t);
        self.adj.add_tri(ti, t);
    }

    fn point_signs(&self, t: [usize; 3], p: usize) -> [i8; 3] {
        let pts = &self.points;
        [
            orient2d(&pts[t[0]], &pts[t[1]], &pts[p]),
            orient2d(&pts[t[1]], &pts[t[2]], &pts[p]),
            orient2d(&pts[t[2]], &pts[t[0]], &pts[p]),
        ]
    }

    /// Triangle containing `p`, with the side of `p` against each of its
    /// edges. Walks from the last located triangle through edges `p` lies
    /// beyond, trying them from a rotating start. `None` if `p` is outside
    /// the domain.
    fn locate(&mut self, p: usize) -> Option<(usize, [i8; 3])> {
        let mut ti = self.last.min(self.triangles.len() - 1);
        for _ in 0..=self.triangles.len() {
            let t = self.triangles[ti];
            let signs = self.point_signs(t, p);
            self.walk_seed = self.walk_seed.wrapping_add(1);
            let start = self.walk_seed % 3;
            let Some(k) = (0..3).map(|k| (start + k) % 3).find(|&k| signs[k] < 0) else {
                self.last = ti;
                return Some((ti, signs));
            };
            ti = self.adj.neighbor(Edge::new(t[k], t[(k + 1) % 3]), ti)?;
        }

        self.triangles.iter().enumerate().find_map(|(ti, &t)| {
            let signs = self.point_signs(t, p);
            signs.iter().all(|&s| s >= 0).then_some((ti, signs))
        })
    }

    fn insert_point(&mut self, p: usize, delaunay: bool) {
        let Some((ti, signs)) = self.locate(p) else {
            panic!("point {p} lies outside the domain triangle");
        };

        let t = self.triangles[ti];
        match signs.iter().filter(|&&s| s == 0).count() {
            0 => {
                self.set_tri(ti, [t[0], t[1], p]);
                self.push_tri([t[1], t[2], p]);
                self.push_tri([t[2], t[0], p]);
            }
            1 => {
                let k = signs.iter().position(|&s| s == 0).unwrap_or(0);
                self.split_edge(t[k], t[(k + 1) % 3], p);
            }
            _ => panic!("point {p} coincides with an existing vertex"),
        }

        if delaunay {
            let opposite = self
                .adj
                .around(p)
                .iter()
                .map(|&ti| {
                    let [_, u, v] = rotate_to_vertex(self.triangles[ti], p);
                    Edge::new(u, v)
                })
                .collect();
            self.legalize(opposite);
        }
    }

    /// Split edge `uv` at `p`, which lies strictly inside it. The halves
    /// inherit the edge's mask and owner.
    fn split_edge(&mut self, u: usize, v: usize, p: usize) {
        let e = Edge::new(u, v);
        let incident: SmallVec<[usize; 2]> = self.adj.tris(e).iter().copied().collect();
        for ti in incident {
            let [x, y, c] = rotate_to_edge(self.triangles[ti], u, v);
            self.set_tri(ti, [x, p, c]);
            self.push_tri([p, y, c]);
        }

        if let Some(mask) = self.masks.remove(&e) {
            self.masks.insert(Edge::new(u, p), mask);
            self.masks.insert(Edge::new(p, v), mask);
        }
        if let Some(owner) = self.owners.remove(&e) {
            self.owners.insert(Edge::new(u, p), owner);
            self.owners.insert(Edge::new(p, v), owner);
        }
    }

    fn commit(&mut self, e: Edge, ci: usize, mask: u32) {
        *self.masks.entry(e).or_insert(0) |= mask;
        self.owners.insert(e, ci);
    }

    /// Unique edges in triangle order.
    fn edges(&self) -> Vec<Edge> {
        let mut seen = AHashSet::with_capacity(self.triangles.len() * 3);
        let mut out = Vec::with_capacity(self.triangles.len() * 3 / 2 + 3);
        for &t in &self.triangles {
            for (u, v) in tri_edges(t) {
                let e = Edge::new(u, v);
                if seen.insert(e) {
                    out.push(e);
                }
            }
        }
        out
    }

    fn crosses(&self, a: usize, b: usize, e: Edge) -> bool {
        let pts = &self.points;
        orient2d(&pts[a], &pts[b], &pts[e.0]) * orient2d(&pts[a], &pts[b], &pts[e.1]) < 0
            && orient2d(&pts[e.0], &pts[e.1], &pts[a]) * orient2d(&pts[e.0], &pts[e.1], &pts[b]) < 0
    }

    /// Walk the triangles along segment `ab`, which is not an edge, from
    /// the fan around `a` until `b` or a vertex on the segment is reached.
    fn trace(&self, a: usize, b: usize) -> Trace {
        let pts = &self.points;
        let (pa, pb) = (&pts[a], &pts[b]);

        let mut start = None;
        for &ti in self.adj.around(a) {
            let [_, u, v] = rotate_to_vertex(self.triangles[ti], a);
            let (ou, ov) = (orient2d(pa, &pts[u], pb), orient2d(pa, &pts[v], pb));
            if ou == 0 && dot_sign2(&pts[u], pa, pb) < 0 {
                return Trace::Vertex(u);
            }
            if ov == 0 && dot_sign2(&pts[v], pa, pb) < 0 {
                return Trace::Vertex(v);
            }
            if ou > 0 && ov < 0 {
                start = Some((ti, u, v));
                break;
            }
        }
        let Some((mut ti, mut right, mut left)) = start else {
            unreachable!("segment ({a}, {b}) enters no triangle around {a}");
        };

        let mut crossing = Vec::new();
        loop {
            let e = Edge::new(right, left);
            crossing.push(e);
            let Some(next) = self.adj.neighbor(e, ti) else {
                unreachable!("segment ({a}, {b}) leaves the domain");
            };
            let w = rotate_to_edge(self.triangles[next], right, left)[2];
            if w == b {
                return Trace::Crossings(crossing);
            }
            match orient2d(pa, pb, &pts[w]) {
                0 => return Trace::Vertex(w),
                s if s > 0 => left = w,
                _ => right = w,
            }
            ti = next;
        }
    }

    fn insert_constraint(&mut self, ci: usize, constraints: &[Constraint], a: usize, b: usize) {
        let mask = constraints[ci].mask;
        let mut pending = VecDeque::from([(a, b)]);

        while let Some((a, b)) = pending.pop_front() {
            if a == b {
                continue;
            }
            let ab = Edge::new(a, b);
            if self.adj.edge2tris.contains_key(&ab) {
                self.commit(ab, ci, mask);
                continue;
            }

            let crossing = match self.trace(a, b) {
                // A vertex on the open segment splits the constraint.
                Trace::Vertex(v) => {
                    pending.push_front((v, b));
                    pending.push_front((a, v));
                    continue;
                }
                Trace::Crossings(crossing) => crossing,
            };

            // Crossing a committed constraint creates a Steiner point on both.
            let committed = crossing
                .iter()
                .find_map(|&e| self.owners.get(&e).map(|&cj| (e, cj)));
            if let Some((e, cj)) = committed {
                let (c0, c1) = (&constraints[ci], &constraints[cj]);
                let Some(point) = intersect_segments_2d(
                    &self.points[c0.a],
                    &self.points[c0.b],
                    &self.points[c1.a],
                    &self.points[c1.b],
                ) else {
                    unreachable!("constraints {ci} and {cj} cross without an intersection");
                };
                let s = self.points.len();
                self.points.push(point);
                self.new_intersections.push(ConstraintIntersection {
                    constraint0: ci,
                    constraint1: cj,
                });
                self.split_edge(e.0, e.1, s);
                pending.push_front((s, b));
                pending.push_front((a, s));
                continue;
            }

            self.recover_edge(a, b, crossing);
            if !self.adj.edge2tris.contains_key(&ab) {
                unreachable!("constraint edge ({a}, {b}) was not recovered");
            }
            self.commit(ab, ci, mask);
        }
    }

    /// Flip the unconstrained edges crossing `ab` until `ab` is an edge.
    fn recover_edge(&mut self, a: usize, b: usize, crossing: Vec<Edge>) {
        let mut queue: VecDeque<Edge> = crossing.into();
        let mut stalled = 0;
        while let Some(e) = queue.pop_front() {
            match self.flip(e, true) {
                Some(flipped) => {
                    stalled = 0;
                    if self.crosses(a, b, flipped) {
                        queue.push_back(flipped);
                    }
                }
                None => {
                    stalled += 1;
                    assert!(stalled <= queue.len() + 1, "edge recovery made no progress");
                    queue.push_back(e);
                }
            }
        }
    }

    /// Replace the diagonal `e` of its quadrilateral with the other one.
    /// With `require_convex`, a non-convex quadrilateral is left untouched.
    fn flip(&mut self, e: Edge, require_convex: bool) -> Option<Edge> {
        let &[t1, t2] = self.adj.tris(e) else {
            return None;
        };
        let [x, y, c] = rotate_to_edge(self.triangles[t1], e.0, e.1);
        let [_, _, d] = rotate_to_edge(self.triangles[t2], e.0, e.1);

        if require_convex {
            let pts = &self.points;
            if orient2d(&pts[c], &pts[d], &pts[x]) * orient2d(&pts[c], &pts[d], &pts[y]) >= 0 {
                return None;
            }
        }

        self.set_tri(t1, [x, d, c]);
        self.set_tri(t2, [d, y, c]);
        Some(Edge::new(c, d))
    }

    /// Lawson flips on every unconstrained interior edge. Co-circular
    /// configurations are left as they are.
    fn restore_delaunay(&mut self) {
        let mut stack = self.edges();
        stack.reverse();
        self.legalize(stack);
    }

    fn legalize(&mut self, mut stack: Vec<Edge>) {
        while let Some(e) = stack.pop() {
            if self.owners.contains_key(&e) {
                continue;
            }
            let &[t1, t2] = self.adj.tris(e) else {
                continue;
            };
            let [x, y, c] = rotate_to_edge(self.triangles[t1], e.0, e.1);
            let [_, _, d] = rotate_to_edge(self.triangles[t2], e.0, e.1);
            let pts = &self.points;
            if incircle(&pts[x], &pts[y], &pts[c], &pts[d]) <= 0 {
                continue;
            }
            if self.flip(e, false).is_some() {
                stack.extend([
                    Edge::new(x, c),
                    Edge::new(c, y),
                    Edge::new(y, d),
                    Edge::new(d, x),
                ]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::exact::Exact;

    fn p(x: i32, y: i32) -> Point2 {
        [Exact::from(x), Exact::from(y)]
    }

    fn area2(cdt: &ConstrainedTriangulation) -> Exact {
        cdt.triangles.iter().fold(Exact::from(0), |acc, t| {
            let [a, b, c] = t.map(|i| &cdt.points[i]);
            let cross = &(&(&b[0] - &a[0]) * &(&c[1] - &a[1])) - &(&(&b[1] - &a[1]) * &(&c[0] - &a[0]));
            &acc + &cross
        })
    }

    #[test]
    fn interior_point_splits_in_three() {
        let cdt = ConstrainedTriangulation::triangulate(vec![p(0, 0), p(4, 0), p(0, 4), p(1, 1)], &[], true);
        assert_eq!(cdt.triangles.len(), 3);
        assert_eq!(area2(&cdt), Exact::from(16));
    }

    #[test]
    fn clockwise_domain_is_reoriented() {
        let cdt = ConstrainedTriangulation::triangulate(vec![p(0, 0), p(0, 4), p(4, 0), p(2, 0)], &[], false);
        assert_eq!(cdt.triangles.len(), 2);
        for t in &cdt.triangles {
            assert!(orient2d(&cdt.points[t[0]], &cdt.points[t[1]], &cdt.points[t[2]]) > 0);
        }
    }

    #[test]
    fn split_boundary_edge_keeps_mask() {
        let constraints = [Constraint::new(0, 1, BOUNDARY_MASK)];
        let cdt = ConstrainedTriangulation::triangulate(vec![p(0, 0), p(4, 0), p(0, 4), p(2, 0)], &constraints, true);
        assert_eq!(cdt.edge_mask(0, 3), BOUNDARY_MASK);
        assert_eq!(cdt.edge_mask(3, 1), BOUNDARY_MASK);
        assert_eq!(cdt.edge_mask(0, 1), 0);
    }
}
