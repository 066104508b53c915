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

//! Welding per-triangle outputs into one indexed mesh.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::{
    corefinement::{
        CorefinedMesh, OutputPositions,
        options::{CorefineOptions, PrecisionPolicy},
        retriangulate::PerTriangleOutput,
    },
    geometry::exact_point::ExactPoint,
};

/// Deduplicates output positions in first-seen order.
trait Welder {
    type Key: Clone + PartialEq;

    fn key(&self, p: &ExactPoint) -> Self::Key;
    fn weld(&mut self, key: Self::Key) -> u32;
    fn into_positions(self) -> OutputPositions;
}

#[derive(Default)]
struct RoundedWelder {
    ids: AHashMap<[u64; 3], u32>,
    positions: Vec<[f64; 3]>,
}

impl Welder for RoundedWelder {
    type Key = [u64; 3];

    fn key(&self, p: &ExactPoint) -> [u64; 3] {
        // -0.0 and 0.0 are one position
        p.to_f64().map(|c| (c + 0.0).to_bits())
    }

    fn weld(&mut self, key: [u64; 3]) -> u32 {
        let RoundedWelder { ids, positions } = self;
        *ids.entry(key).or_insert_with(|| {
            positions.push(key.map(f64::from_bits));
            (positions.len() - 1) as u32
        })
    }

    fn into_positions(self) -> OutputPositions {
        OutputPositions::Rounded(self.positions)
    }
}

struct ExactWelder {
    ids: BTreeMap<ExactPoint, u32>,
    positions: Vec<ExactPoint>,
    precision: PrecisionPolicy,
}

impl Welder for ExactWelder {
    type Key = ExactPoint;

    fn key(&self, p: &ExactPoint) -> ExactPoint {
        self.precision.apply(p.clone())
    }

    fn weld(&mut self, key: ExactPoint) -> u32 {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.positions.len() as u32;
        self.positions.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    fn into_positions(self) -> OutputPositions {
        OutputPositions::Exact(self.positions)
    }
}

/// Weld `outputs` (one per input triangle, in order) into a single mesh.
pub(crate) fn assemble(outputs: &[PerTriangleOutput], options: &CorefineOptions) -> CorefinedMesh {
    if options.preserve_exact_positions {
        let welder = ExactWelder {
            ids: BTreeMap::new(),
            positions: Vec::new(),
            precision: options.precision,
        };
        assemble_with(outputs, welder, options)
    } else {
        assemble_with(outputs, RoundedWelder::default(), options)
    }
}

fn assemble_with<W: Welder>(outputs: &[PerTriangleOutput], mut welder: W, options: &CorefineOptions) -> CorefinedMesh {
    let mut indices = Vec::new();
    let mut face_map = options.track_face_map.then(Vec::new);
    let mut cut_edges = options.track_cut_edges.then(Vec::new);

    let mut keys: Vec<W::Key> = Vec::new();
    let mut global: Vec<Option<u32>> = Vec::new();
    for (input_triangle, output) in outputs.iter().enumerate() {
        keys.clear();
        keys.extend(output.points.iter().map(|p| welder.key(p)));
        global.clear();
        global.resize(keys.len(), None);

        for t in &output.triangles {
            let [k0, k1, k2] = t.map(|i| &keys[i as usize]);
            if !output.passthrough && (k0 == k1 || k1 == k2 || k2 == k0) {
                // collapsed by rounding; an inverted sliver is kept
                continue;
            }
            for &i in t {
                let id = match global[i as usize] {
                    Some(id) => id,
                    None => {
                        let id = welder.weld(keys[i as usize].clone());
                        global[i as usize] = Some(id);
                        id
                    }
                };
                indices.push(id);
            }
            if let Some(map) = face_map.as_mut() {
                map.push(input_triangle as u32);
            }
        }

        if let Some(edges) = cut_edges.as_mut() {
            for &[i, j] in &output.cut_edges {
                // a cut edge whose endpoints are not on a kept triangle has collapsed
                let (Some(a), Some(b)) = (global[i as usize], global[j as usize]) else {
                    continue;
                };
                if a != b {
                    edges.push([a.min(b), a.max(b)]);
                }
            }
        }
    }

    if let Some(edges) = cut_edges.as_mut() {
        edges.sort_unstable();
        edges.dedup();
    }

    CorefinedMesh {
        positions: welder.into_positions(),
        indices,
        face_map,
        cut_edges,
    }
}
