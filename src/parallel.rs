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

//! Index-ordered data-parallel map. The parallel and serial paths return
//! identical vectors.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// `(0..len).map(f).collect()`, spread over the rayon pool when `parallel`
/// is set.
#[cfg(feature = "parallel")]
pub(crate) fn map_indices<T, F>(len: usize, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if parallel {
        (0..len).into_par_iter().map(f).collect()
    } else {
        (0..len).map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_indices<T, F>(len: usize, _parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..len).map(f).collect()
}

/// Apply `f` to every element with its index, on the rayon pool when
/// `parallel` is set.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_indexed<T, F>(items: &mut [T], parallel: bool, f: F)
where
    T: Send,
    F: Fn(usize, &mut T) + Sync + Send,
{
    if parallel {
        items.par_iter_mut().enumerate().for_each(|(i, item)| f(i, item));
    } else {
        items.iter_mut().enumerate().for_each(|(i, item)| f(i, item));
    }
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_indexed<T, F>(items: &mut [T], _parallel: bool, f: F)
where
    T: Send,
    F: Fn(usize, &mut T) + Sync + Send,
{
    items.iter_mut().enumerate().for_each(|(i, item)| f(i, item));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_index_order() {
        let serial = map_indices(1000, false, |i| i * i);
        let parallel = map_indices(1000, true, |i| i * i);
        assert_eq!(serial, parallel);
        assert_eq!(serial[31], 961);
    }

    #[test]
    fn mutates_every_slot() {
        let mut items = vec![0usize; 257];
        for_each_indexed(&mut items, true, |i, item| *item = 2 * i);
        assert!(items.iter().enumerate().all(|(i, &v)| v == 2 * i));
    }
}
