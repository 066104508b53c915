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

use crate::geometry::aabb::Aabb;

/// Child references of a [`BvhNode`], as indices into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BvhNodeKind {
    /// `count` primitives starting at `first` in [`Bvh::primitive_indices`].
    Leaf { first: u32, count: u32 },
    Interior { left: u32, right: u32 },
}

#[derive(Clone, Debug)]
pub struct BvhNode {
    pub aabb: Aabb,
    pub kind: BvhNodeKind,
}

/// Binary bounding volume hierarchy stored as a flat node array.
///
/// Node 0 is the root. The tree is immutable once built and can be shared
/// across threads for queries.
#[derive(Clone, Debug, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    primitive_indices: Vec<u32>,
    height: usize,
}

struct BuildNode {
    aabb: Aabb,
    first: usize,
    count: usize,
    children: Option<(usize, usize)>,
}

impl Bvh {
    /// Build over primitives given by their boxes and centroids.
    ///
    /// Primitives are first clustered into a full binary tree by recursive
    /// median splits along the longest centroid axis, then every subtree
    /// holding at most `leaf_size` primitives is collapsed into one leaf.
    pub fn build(boxes: &[Aabb], centers: &[[f64; 3]], leaf_size: usize) -> Self {
        assert_eq!(boxes.len(), centers.len());
        if boxes.is_empty() {
            return Bvh::default();
        }

        let mut order: Vec<u32> = (0..boxes.len() as u32).collect();
        let mut full = Vec::with_capacity(2 * boxes.len());
        Self::build_binary_tree(&mut full, &mut order, 0, boxes, centers);

        let mut bvh = Bvh {
            nodes: Vec::new(),
            primitive_indices: order,
            height: 0,
        };
        bvh.collapse_leaves(&full, leaf_size.max(1));
        bvh
    }

    fn build_binary_tree(
        out: &mut Vec<BuildNode>,
        order: &mut [u32],
        first: usize,
        boxes: &[Aabb],
        centers: &[[f64; 3]],
    ) -> usize {
        let mut aabb = Aabb::empty();
        let mut centroid_box = Aabb::empty();
        for &prim in order.iter() {
            aabb = aabb.union(&boxes[prim as usize]);
            centroid_box.expand_point(&centers[prim as usize]);
        }

        let index = out.len();
        out.push(BuildNode {
            aabb,
            first,
            count: order.len(),
            children: None,
        });
        if order.len() == 1 {
            return index;
        }

        let axis = centroid_box.longest_axis();
        let mid = order.len() / 2;
        order.select_nth_unstable_by(mid, |&i, &j| {
            centers[i as usize][axis]
                .total_cmp(&centers[j as usize][axis])
                .then(i.cmp(&j))
        });

        let (left_items, right_items) = order.split_at_mut(mid);
        let left = Self::build_binary_tree(out, left_items, first, boxes, centers);
        let right = Self::build_binary_tree(out, right_items, first + mid, boxes, centers);
        out[index].children = Some((left, right));
        index
    }

    /// Re-emit `full` into the final arena, turning small subtrees into leaves.
    fn collapse_leaves(&mut self, full: &[BuildNode], leaf_size: usize) {
        // (node in `full`, slot in `self.nodes`, depth)
        let mut pending = vec![(0usize, 0usize, 1usize)];
        self.nodes.push(Self::placeholder(&full[0]));

        while let Some((src, dst, depth)) = pending.pop() {
            self.height = self.height.max(depth);
            let node = &full[src];
            match node.children {
                Some((left, right)) if node.count > leaf_size => {
                    let left_slot = self.nodes.len();
                    self.nodes.push(Self::placeholder(&full[left]));
                    let right_slot = self.nodes.len();
                    self.nodes.push(Self::placeholder(&full[right]));
                    self.nodes[dst].kind = BvhNodeKind::Interior {
                        left: left_slot as u32,
                        right: right_slot as u32,
                    };
                    pending.push((right, right_slot, depth + 1));
                    pending.push((left, left_slot, depth + 1));
                }
                _ => {}
            }
        }
    }

    fn placeholder(node: &BuildNode) -> BvhNode {
        BvhNode {
            aabb: node.aabb,
            kind: BvhNodeKind::Leaf {
                first: node.first as u32,
                count: node.count as u32,
            },
        }
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn primitive_indices(&self) -> &[u32] {
        &self.primitive_indices
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of levels from the root down to the deepest leaf.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Broad-phase traversal.
    ///
    /// Descends into a node only when `intersect_box` accepts its box and
    /// calls `add_candidate` once for every primitive of each visited leaf.
    /// The result is a superset of the primitives that truly overlap.
    pub fn collect_candidates<I, A>(&self, mut intersect_box: I, mut add_candidate: A)
    where
        I: FnMut(&Aabb) -> bool,
        A: FnMut(u32),
    {
        if self.nodes.is_empty() || !intersect_box(&self.nodes[0].aabb) {
            return;
        }

        let mut stack: Vec<u32> = Vec::with_capacity(self.height + 1);
        stack.push(0);
        while let Some(node_index) = stack.pop() {
            match self.nodes[node_index as usize].kind {
                BvhNodeKind::Leaf { first, count } => {
                    for &prim in &self.primitive_indices[first as usize..(first + count) as usize] {
                        add_candidate(prim);
                    }
                }
                BvhNodeKind::Interior { left, right } => {
                    if intersect_box(&self.nodes[right as usize].aabb) {
                        stack.push(right);
                    }
                    if intersect_box(&self.nodes[left as usize].aabb) {
                        stack.push(left);
                    }
                }
            }
        }
    }

    /// Collect every primitive whose leaf box chain overlaps `query`.
    pub fn query(&self, query: &Aabb, out: &mut Vec<u32>) {
        self.collect_candidates(|aabb| aabb.intersects(query), |prim| out.push(prim));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_boxes(n: usize) -> (Vec<Aabb>, Vec<[f64; 3]>) {
        let boxes: Vec<Aabb> = (0..n)
            .map(|i| {
                let x = i as f64 * 2.0;
                Aabb::new([x, 0.0, 0.0], [x + 1.0, 1.0, 1.0])
            })
            .collect();
        let centers = boxes.iter().map(|b| [b.center(0), b.center(1), b.center(2)]).collect();
        (boxes, centers)
    }

    #[test]
    fn leaves_respect_leaf_size() {
        let (boxes, centers) = unit_boxes(37);
        let bvh = Bvh::build(&boxes, &centers, 4);
        let mut covered = 0;
        for node in bvh.nodes() {
            if let BvhNodeKind::Leaf { count, .. } = node.kind {
                assert!(count >= 1 && count <= 4);
                covered += count;
            }
        }
        assert_eq!(covered, 37);

        let mut sorted = bvh.primitive_indices().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..37).collect::<Vec<u32>>());
    }

    #[test]
    fn single_primitive_is_a_leaf_root() {
        let (boxes, centers) = unit_boxes(1);
        let bvh = Bvh::build(&boxes, &centers, 4);
        assert_eq!(bvh.nodes().len(), 1);
        assert_eq!(bvh.height(), 1);
    }

    #[test]
    fn deep_tree_never_overflows() {
        let (boxes, centers) = unit_boxes(4096);
        let bvh = Bvh::build(&boxes, &centers, 1);
        let mut out = Vec::new();
        bvh.query(&Aabb::new([-1.0, -1.0, -1.0], [1e9, 2.0, 2.0]), &mut out);
        assert_eq!(out.len(), 4096);
    }
}
