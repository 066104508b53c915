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

//! Corefinement of two triangle meshes.
//!
//! Both meshes are refined so that their mutual intersection curve is made
//! of edges present in each of them. The pipeline runs in barrier-separated
//! phases:
//!
//! 1. lift inputs to exact coordinates and flag collinear triangles,
//! 2. pair each triangle of A with the triangles of B it meets (BVH broad
//!    phase, symbolic classification),
//! 3. resolve the exact coordinates of every symbolic intersection point,
//! 4. retriangulate the affected triangles of A, then of B,
//! 5. weld each mesh's per-triangle outputs.
//!
//! Phases 1 to 4 are data-parallel over triangles; welding is serial.

pub mod options;

mod assemble;
mod classify;
mod resolve;
mod retriangulate;

use tracing::{debug, info};

use crate::{
    error::{CorefineError, MeshLabel},
    geometry::exact_point::ExactPoint,
    mesh::{IndexedMesh, MeshPoint},
    parallel::map_indices,
};

use self::{
    classify::{PreparedMesh, TrianglePairIntersection},
    options::CorefineOptions,
    retriangulate::{PerTriangleOutput, retriangulate},
};

/// Output vertex positions.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputPositions {
    Rounded(Vec<[f64; 3]>),
    Exact(Vec<ExactPoint>),
}

impl OutputPositions {
    pub fn len(&self) -> usize {
        match self {
            OutputPositions::Rounded(p) => p.len(),
            OutputPositions::Exact(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One corefined mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct CorefinedMesh {
    pub positions: OutputPositions,
    /// Three vertex indices per output triangle.
    pub indices: Vec<u32>,
    /// Input triangle of each output triangle.
    pub face_map: Option<Vec<u32>>,
    /// Edges on the intersection curve, `[v0, v1]` with `v0 < v1`, sorted.
    pub cut_edges: Option<Vec<[u32; 2]>>,
}

impl CorefinedMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Positions as doubles, rounding exact output to nearest.
    pub fn rounded_positions(&self) -> Vec<[f64; 3]> {
        match &self.positions {
            OutputPositions::Rounded(p) => p.clone(),
            OutputPositions::Exact(p) => p.iter().map(ExactPoint::to_f64).collect(),
        }
    }

    /// Mesh with exact positions, ready to be corefined again.
    pub fn into_indexed_mesh(self) -> IndexedMesh<ExactPoint> {
        let positions = match self.positions {
            OutputPositions::Exact(p) => p,
            OutputPositions::Rounded(p) => p.into_iter().map(ExactPoint::from).collect(),
        };
        IndexedMesh::new(positions, self.indices)
    }
}

/// Corefined pair, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct Corefinement {
    pub a: CorefinedMesh,
    pub b: CorefinedMesh,
}

/// Corefine `a` against `b`.
///
/// Returns an error only for malformed input. Triangles that meet no
/// triangle of the other mesh, and collinear triangles, are emitted as they
/// are.
pub fn corefine<P: MeshPoint>(
    a: &IndexedMesh<P>,
    b: &IndexedMesh<P>,
    options: &CorefineOptions,
) -> Result<Corefinement, CorefineError> {
    let parallel = options.parallel;
    let mesh_a = PreparedMesh::new(a, MeshLabel::A, parallel)?;
    let mesh_b = PreparedMesh::new(b, MeshLabel::B, parallel)?;
    info!(
        triangles_a = mesh_a.triangle_count(),
        triangles_b = mesh_b.triangle_count(),
        "Corefining meshes"
    );
    debug!(
        degenerate_a = mesh_a.degenerate_count(),
        degenerate_b = mesh_b.degenerate_count(),
        "Flagged degenerate triangles"
    );

    let mut pairs = classify::collect_pairs(&mesh_a, &mesh_b, options.bvh_leaf_size, parallel);
    debug!(
        pairs = pairs.iter().map(Vec::len).sum::<usize>(),
        "Classified intersecting triangle pairs"
    );

    resolve::resolve_pairs(&mut pairs, &mesh_a, &mesh_b, parallel);

    let outputs_a: Vec<PerTriangleOutput> = map_indices(mesh_a.triangle_count(), parallel, |t| {
        let touching: Vec<&TrianglePairIntersection> = pairs[t].iter().collect();
        retriangulate(&mesh_a.corners[t], mesh_a.degenerate[t], &touching, options.delaunay)
    });

    let mut pairs_of_b: Vec<Vec<&TrianglePairIntersection>> = vec![Vec::new(); mesh_b.triangle_count()];
    for pair in pairs.iter().flatten() {
        pairs_of_b[pair.triangle_b as usize].push(pair);
    }
    let outputs_b: Vec<PerTriangleOutput> = map_indices(mesh_b.triangle_count(), parallel, |t| {
        retriangulate(&mesh_b.corners[t], mesh_b.degenerate[t], &pairs_of_b[t], options.delaunay)
    });
    log_retriangulation(MeshLabel::A, &outputs_a);
    log_retriangulation(MeshLabel::B, &outputs_b);

    let result = Corefinement {
        a: assemble::assemble(&outputs_a, options),
        b: assemble::assemble(&outputs_b, options),
    };
    info!(
        output_triangles_a = result.a.triangle_count(),
        output_triangles_b = result.b.triangle_count(),
        "Corefinement complete"
    );
    Ok(result)
}

fn log_retriangulation(mesh: MeshLabel, outputs: &[PerTriangleOutput]) {
    let retriangulated = outputs.iter().filter(|o| !o.passthrough).count();
    let steiner_points: usize = outputs.iter().map(|o| o.steiner_count).sum();
    debug!(%mesh, retriangulated, steiner_points, "Retriangulated triangles");
}
