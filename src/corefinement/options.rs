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

//! Options for [`corefine`](crate::corefine).
//!
//! ```
//! use corefine::{CorefineOptions, PrecisionPolicy};
//!
//! let options = CorefineOptions::default()
//!     .with_cut_edges(true)
//!     .with_face_map(true)
//!     .with_precision(PrecisionPolicy::Unbounded);
//! assert!(options.track_cut_edges);
//! ```

use tracing::warn;

use crate::geometry::exact_point::ExactPoint;

/// Bound on the size of constructed exact coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionPolicy {
    /// Keep every construction exact, whatever its size.
    Unbounded,
    /// Re-round a constructed point to the nearest double lattice point when
    /// any numerator or denominator exceeds `bits` significant bits.
    ///
    /// Re-rounded triangles that collapse are dropped as in rounded output.
    /// A thin triangle that only turns over is kept, so a tight budget can
    /// emit inverted slivers.
    RoundAbove { bits: u32 },
}

impl Default for PrecisionPolicy {
    fn default() -> Self {
        PrecisionPolicy::RoundAbove { bits: 4096 }
    }
}

impl PrecisionPolicy {
    /// Compress `p` and apply the budget.
    pub fn apply(&self, p: ExactPoint) -> ExactPoint {
        let p = p.compressed();
        match *self {
            PrecisionPolicy::Unbounded => p,
            PrecisionPolicy::RoundAbove { bits } => {
                let size = p.significant_bits();
                if size <= bits {
                    return p;
                }
                warn!(bits = size, budget = bits, "exact point exceeds precision budget, re-rounding");
                p.rounded()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorefineOptions {
    /// Emit exact homogeneous positions instead of rounded doubles.
    pub preserve_exact_positions: bool,
    /// Emit the output triangle to input triangle map.
    pub track_face_map: bool,
    /// Emit the intersection curve as deduplicated vertex pairs.
    pub track_cut_edges: bool,
    /// Flip unconstrained edges of each retriangulation to Delaunay.
    pub delaunay: bool,
    /// Run per-triangle phases on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
    /// Maximum number of triangles per BVH leaf.
    pub bvh_leaf_size: usize,
    pub precision: PrecisionPolicy,
}

impl Default for CorefineOptions {
    fn default() -> Self {
        Self {
            preserve_exact_positions: false,
            track_face_map: false,
            track_cut_edges: false,
            delaunay: true,
            parallel: true,
            bvh_leaf_size: 4,
            precision: PrecisionPolicy::default(),
        }
    }
}

impl CorefineOptions {
    #[must_use]
    pub fn with_exact_positions(mut self, preserve: bool) -> Self {
        self.preserve_exact_positions = preserve;
        self
    }

    #[must_use]
    pub fn with_face_map(mut self, track: bool) -> Self {
        self.track_face_map = track;
        self
    }

    #[must_use]
    pub fn with_cut_edges(mut self, track: bool) -> Self {
        self.track_cut_edges = track;
        self
    }

    #[must_use]
    pub fn with_delaunay(mut self, delaunay: bool) -> Self {
        self.delaunay = delaunay;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_bvh_leaf_size(mut self, leaf_size: usize) -> Self {
        self.bvh_leaf_size = leaf_size.max(1);
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionPolicy) -> Self {
        self.precision = precision;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::exact::Exact;

    #[test]
    fn oversized_points_are_rounded() {
        let third = Exact::from_num_den(1, 3);
        let p = ExactPoint::from_affine([third.clone(), third.clone(), third]);
        let policy = PrecisionPolicy::RoundAbove { bits: 1 };
        assert_eq!(policy.apply(p.clone()).to_f64(), p.to_f64());
        assert!(policy.apply(p.clone()) != p);
        assert_eq!(PrecisionPolicy::Unbounded.apply(p.clone()), p);
    }
}
