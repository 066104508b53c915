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

//! Exact corefinement of triangle meshes.
//!
//! [`corefine`] takes two triangle soups and refines both so that the curve
//! along which they intersect is made of edges shared by the two results.
//! Every decision is taken with exact rational predicates, so coplanar
//! faces, shared vertices and other degenerate contacts are handled without
//! tolerances. The result is the input of a Boolean classification step,
//! which this crate does not perform.
//!
//! ```
//! use corefine::{CorefineOptions, IndexedMesh, corefine};
//!
//! let a = IndexedMesh::new(
//!     vec![[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]],
//!     vec![0, 1, 2],
//! );
//! let b = IndexedMesh::new(
//!     vec![[1.0, -1.0, -1.0], [1.0, 10.0, -1.0], [1.0, -1.0, 10.0]],
//!     vec![0, 1, 2],
//! );
//! let options = CorefineOptions::default().with_cut_edges(true);
//! let result = corefine(&a, &b, &options).unwrap();
//! assert_eq!(result.a.triangle_count(), 3);
//! assert_eq!(result.a.cut_edges.as_ref().map(Vec::len), Some(1));
//! ```

pub mod corefinement;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod mesh;
pub mod numeric;
pub mod operations;

mod parallel;

pub use corefinement::{
    Corefinement, CorefinedMesh, OutputPositions, corefine,
    options::{CorefineOptions, PrecisionPolicy},
};
pub use error::{CorefineError, MeshLabel};
pub use geometry::ExactPoint;
pub use mesh::{IndexedMesh, MeshPoint};
pub use numeric::Exact;
