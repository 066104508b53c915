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

use crate::{
    error::{CorefineError, MeshLabel},
    geometry::exact_point::ExactPoint,
};

/// Position type accepted by [`IndexedMesh`].
pub trait MeshPoint: Clone + Send + Sync {
    /// Exact value of the position, `None` if it has no finite value.
    fn to_exact(&self) -> Option<ExactPoint>;
}

impl MeshPoint for [f64; 3] {
    fn to_exact(&self) -> Option<ExactPoint> {
        ExactPoint::from_f64(*self)
    }
}

impl MeshPoint for ExactPoint {
    fn to_exact(&self) -> Option<ExactPoint> {
        Some(self.clone().compressed())
    }
}

/// Triangle soup: positions plus three vertex indices per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedMesh<P> {
    pub positions: Vec<P>,
    pub indices: Vec<u32>,
}

impl<P: MeshPoint> IndexedMesh<P> {
    pub fn new(positions: Vec<P>, indices: Vec<u32>) -> Self {
        IndexedMesh { positions, indices }
    }

    /// One vertex per triangle corner, no sharing.
    pub fn from_triangles(triangles: impl IntoIterator<Item = [P; 3]>) -> Self {
        let mut mesh = IndexedMesh {
            positions: Vec::new(),
            indices: Vec::new(),
        };
        for corners in triangles {
            for p in corners {
                mesh.indices.push(mesh.positions.len() as u32);
                mesh.positions.push(p);
            }
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangle(&self, t: usize) -> [u32; 3] {
        [self.indices[3 * t], self.indices[3 * t + 1], self.indices[3 * t + 2]]
    }

    pub fn corners(&self, t: usize) -> [&P; 3] {
        self.triangle(t).map(|i| &self.positions[i as usize])
    }

    pub fn validate(&self, mesh: MeshLabel) -> Result<(), CorefineError> {
        if self.indices.len() % 3 != 0 {
            return Err(CorefineError::IndexCountNotMultipleOfThree {
                mesh,
                len: self.indices.len(),
            });
        }
        let vertex_count = self.positions.len();
        if let Some((slot, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertex_count)
        {
            return Err(CorefineError::IndexOutOfRange {
                mesh,
                triangle: slot / 3,
                index,
                vertex_count,
            });
        }
        Ok(())
    }

    /// Validate, then lift every position to exact coordinates.
    pub(crate) fn exact_positions(&self, mesh: MeshLabel) -> Result<Vec<ExactPoint>, CorefineError> {
        self.validate(mesh)?;
        self.positions
            .iter()
            .enumerate()
            .map(|(vertex, p)| p.to_exact().ok_or(CorefineError::NonFiniteCoordinate { mesh, vertex }))
            .collect()
    }
}
