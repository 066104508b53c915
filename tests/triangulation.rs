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

use corefine::geometry::Point2;
use corefine::kernel::{incircle, orient2d};
use corefine::numeric::Exact;
use corefine::operations::triangulation::{
    BOUNDARY_MASK, ConstrainedTriangulation, Constraint, ConstraintIntersection, INTERSECTION_MASK,
};

fn p(x: i32, y: i32) -> Point2 {
    [Exact::from(x), Exact::from(y)]
}

fn boundary() -> Vec<Constraint> {
    vec![
        Constraint::new(0, 1, BOUNDARY_MASK),
        Constraint::new(1, 2, BOUNDARY_MASK),
        Constraint::new(2, 0, BOUNDARY_MASK),
    ]
}

fn doubled_area(points: &[Point2], t: &[usize; 3]) -> Exact {
    let [a, b, c] = t.map(|i| &points[i]);
    &(&(&b[0] - &a[0]) * &(&c[1] - &a[1])) - &(&(&b[1] - &a[1]) * &(&c[0] - &a[0]))
}

fn assert_covers_domain(cdt: &ConstrainedTriangulation) {
    let mut total = Exact::from(0);
    for t in &cdt.triangles {
        assert!(orient2d(&cdt.points[t[0]], &cdt.points[t[1]], &cdt.points[t[2]]) > 0);
        total += &doubled_area(&cdt.points, t);
    }
    assert_eq!(total, doubled_area(&cdt.points, &[0, 1, 2]).abs());
}

fn has_edge(cdt: &ConstrainedTriangulation, a: usize, b: usize) -> bool {
    cdt.triangles.iter().any(|t| {
        (0..3).any(|k| {
            let (u, v) = (t[k], t[(k + 1) % 3]);
            (u, v) == (a, b) || (u, v) == (b, a)
        })
    })
}

#[test]
fn test_constraint_is_recovered() {
    let points = vec![p(0, 0), p(8, 0), p(0, 8), p(1, 1), p(5, 1), p(1, 5), p(3, 2), p(2, 3)];
    let mut constraints = boundary();
    constraints.push(Constraint::new(4, 5, INTERSECTION_MASK));
    let cdt = ConstrainedTriangulation::triangulate(points, &constraints, true);

    assert_covers_domain(&cdt);
    assert!(has_edge(&cdt, 4, 5));
    assert_eq!(cdt.edge_mask(4, 5), INTERSECTION_MASK);
    assert_eq!(cdt.edge_mask(0, 1), BOUNDARY_MASK);
    assert!(cdt.new_intersections.is_empty());
}

#[test]
fn test_crossing_constraints_create_steiner_point() {
    let points = vec![p(0, 0), p(8, 0), p(0, 8), p(1, 2), p(5, 2), p(2, 1), p(2, 5)];
    let mut constraints = boundary();
    constraints.push(Constraint::new(3, 4, INTERSECTION_MASK));
    constraints.push(Constraint::new(5, 6, INTERSECTION_MASK));
    let cdt = ConstrainedTriangulation::triangulate(points, &constraints, true);

    assert_eq!(
        cdt.new_intersections,
        vec![ConstraintIntersection {
            constraint0: 4,
            constraint1: 3
        }]
    );
    assert_eq!(cdt.points.len(), 8);
    assert_eq!(cdt.points[7], p(2, 2));
    for (a, b) in [(3, 7), (7, 4), (5, 7), (7, 6)] {
        assert!(has_edge(&cdt, a, b));
        assert_eq!(cdt.edge_mask(a, b), INTERSECTION_MASK);
    }
    assert_covers_domain(&cdt);
}

#[test]
fn test_constraint_through_vertex_is_split() {
    let points = vec![p(0, 0), p(8, 0), p(0, 8), p(1, 1), p(5, 1), p(3, 1)];
    let mut constraints = boundary();
    constraints.push(Constraint::new(3, 4, INTERSECTION_MASK));
    let cdt = ConstrainedTriangulation::triangulate(points, &constraints, false);

    assert!(has_edge(&cdt, 3, 5));
    assert!(has_edge(&cdt, 5, 4));
    assert_eq!(cdt.edge_mask(3, 4), 0);
    assert_eq!(cdt.edge_mask(3, 5), INTERSECTION_MASK);
    assert_covers_domain(&cdt);
}

#[test]
fn test_overlapping_constraints_merge_masks() {
    let points = vec![p(0, 0), p(8, 0), p(0, 8), p(2, 0), p(6, 0)];
    let mut constraints = boundary();
    constraints.push(Constraint::new(3, 4, INTERSECTION_MASK));
    let cdt = ConstrainedTriangulation::triangulate(points, &constraints, true);

    assert_eq!(cdt.edge_mask(0, 3), BOUNDARY_MASK);
    assert_eq!(cdt.edge_mask(3, 4), BOUNDARY_MASK | INTERSECTION_MASK);
    assert_eq!(cdt.edge_mask(4, 1), BOUNDARY_MASK);
}

#[test]
fn test_unconstrained_edges_are_delaunay() {
    let points = vec![
        p(0, 0),
        p(20, 0),
        p(0, 20),
        p(3, 1),
        p(7, 2),
        p(2, 9),
        p(11, 4),
        p(5, 5),
        p(1, 14),
        p(9, 8),
    ];
    let mut constraints = boundary();
    constraints.push(Constraint::new(3, 9, INTERSECTION_MASK));
    let cdt = ConstrainedTriangulation::triangulate(points, &constraints, true);
    assert_covers_domain(&cdt);

    for (i, t1) in cdt.triangles.iter().enumerate() {
        for t2 in &cdt.triangles[i + 1..] {
            let shared: Vec<usize> = t1.iter().copied().filter(|v| t2.contains(v)).collect();
            if shared.len() != 2 || cdt.edge_mask(shared[0], shared[1]) != 0 {
                continue;
            }
            let Some(&opposite) = t2.iter().find(|v| !t1.contains(v)) else {
                continue;
            };
            let [a, b, c] = t1.map(|v| &cdt.points[v]);
            assert!(incircle(a, b, c, &cdt.points[opposite]) <= 0);
        }
    }
}

#[test]
fn test_dense_constraint_grid() {
    let mut points = vec![p(0, 0), p(100, 0), p(0, 100)];
    let mut constraints = boundary();
    for i in 1..=10 {
        let y = 3 * i + 1;
        let first = points.len();
        points.extend([p(1, y), p(60, y)]);
        constraints.push(Constraint::new(first, first + 1, INTERSECTION_MASK));
    }
    for j in 1..=10 {
        let x = 3 * j + 2;
        let first = points.len();
        points.extend([p(x, 1), p(x, 60)]);
        constraints.push(Constraint::new(first, first + 1, INTERSECTION_MASK));
    }
    let input_len = points.len();
    let cdt = ConstrainedTriangulation::triangulate(points, &constraints, true);

    assert_eq!(cdt.new_intersections.len(), 100);
    assert_eq!(cdt.points.len(), input_len + 100);
    for (k, record) in cdt.new_intersections.iter().enumerate() {
        let horizontal = constraints[record.constraint1.min(record.constraint0)];
        let vertical = constraints[record.constraint1.max(record.constraint0)];
        let expected = [cdt.points[vertical.a][0].clone(), cdt.points[horizontal.a][1].clone()];
        assert_eq!(cdt.points[input_len + k], expected);
    }

    // Every constraint is cut into 11 pieces by the 10 it crosses.
    let cut = cdt.edge_masks.values().filter(|&&m| m & INTERSECTION_MASK != 0).count();
    assert_eq!(cut, 20 * 11);
    assert_eq!(cdt.triangles.len(), 2 * cdt.points.len() - 3 - 2);
    assert_covers_domain(&cdt);
}
