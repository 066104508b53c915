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

use corefine::geometry::{Aabb, Bvh, BvhNodeKind};

/// Small deterministic generator so the boxes are irregular but stable.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn random_boxes(count: usize, seed: u64) -> Vec<Aabb> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| {
            let min = [rng.next() * 10.0, rng.next() * 10.0, rng.next() * 10.0];
            let size = [rng.next(), rng.next(), rng.next()];
            Aabb::new(min, [min[0] + size[0], min[1] + size[1], min[2] + size[2]])
        })
        .collect()
}

fn centers(boxes: &[Aabb]) -> Vec<[f64; 3]> {
    boxes.iter().map(|b| [b.center(0), b.center(1), b.center(2)]).collect()
}

#[test]
fn test_query_matches_brute_force() {
    let boxes = random_boxes(500, 7);
    let bvh = Bvh::build(&boxes, &centers(&boxes), 4);
    let queries = random_boxes(50, 99);

    for query in &queries {
        let mut found = Vec::new();
        bvh.query(query, &mut found);
        found.retain(|&i| boxes[i as usize].intersects(query));
        found.sort_unstable();

        let expected: Vec<u32> = (0..boxes.len() as u32)
            .filter(|&i| boxes[i as usize].intersects(query))
            .collect();
        assert_eq!(found, expected);
    }
}

#[test]
fn test_every_primitive_in_exactly_one_leaf() {
    let boxes = random_boxes(123, 3);
    let bvh = Bvh::build(&boxes, &centers(&boxes), 5);
    let mut seen = vec![0u32; boxes.len()];
    for node in bvh.nodes() {
        if let BvhNodeKind::Leaf { first, count } = node.kind {
            assert!(count >= 1 && count <= 5);
            for &prim in &bvh.primitive_indices()[first as usize..(first + count) as usize] {
                seen[prim as usize] += 1;
                assert!(node.aabb.intersects(&boxes[prim as usize]));
            }
        }
    }
    assert!(seen.iter().all(|&n| n == 1));
}

#[test]
fn test_touching_boxes_are_candidates() {
    let boxes = vec![
        Aabb::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
        Aabb::new([5.0, 5.0, 5.0], [6.0, 6.0, 6.0]),
    ];
    let bvh = Bvh::build(&boxes, &centers(&boxes), 1);
    let mut found = Vec::new();
    bvh.query(&Aabb::new([1.0, 1.0, 1.0], [2.0, 2.0, 2.0]), &mut found);
    assert_eq!(found, vec![0]);
}

#[test]
fn test_empty_tree_yields_nothing() {
    let bvh = Bvh::build(&[], &[], 4);
    assert!(bvh.is_empty());
    let mut found = Vec::new();
    bvh.query(&Aabb::new([0.0; 3], [1.0; 3]), &mut found);
    assert!(found.is_empty());
}
