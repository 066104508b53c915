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

use std::fmt;

use thiserror::Error;

/// Which corefinement operand an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshLabel {
    A,
    B,
}

impl fmt::Display for MeshLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLabel::A => write!(f, "mesh A"),
            MeshLabel::B => write!(f, "mesh B"),
        }
    }
}

/// Malformed corefinement input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorefineError {
    #[error("{mesh}: index count {len} is not a multiple of 3")]
    IndexCountNotMultipleOfThree { mesh: MeshLabel, len: usize },

    #[error("{mesh}: triangle {triangle} references vertex {index}, but there are only {vertex_count}")]
    IndexOutOfRange {
        mesh: MeshLabel,
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("{mesh}: vertex {vertex} has a non-finite coordinate")]
    NonFiniteCoordinate { mesh: MeshLabel, vertex: usize },
}
