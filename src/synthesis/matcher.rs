//! K-best candidate scan over the texture
//!
//! Every admissible texture anchor is scored with a caller-supplied cost, the
//! K cheapest are retained in a bounded max-heap, and one of them is drawn
//! uniformly at random. Sampling is deliberately not weighted by cost; any of
//! the K best is considered good enough, and the uniform draw is what keeps
//! the synthesis from tiling the single best match everywhere.

use crate::io::error::{internal, QuiltError};
use crate::raster::Coord;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A scored texture anchor held by the K-best heap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Accumulated cost of this anchor
    pub score: u64,
    /// Anchor of the candidate patch in the texture
    pub coord: Coord,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| (self.coord.x, self.coord.y).cmp(&(other.coord.x, other.coord.y)))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded max-heap retaining the K lowest-cost candidates seen so far
#[derive(Debug, Clone)]
pub struct CandidateHeap {
    heap: BinaryHeap<Candidate>,
    capacity: usize,
}

impl CandidateHeap {
    /// Create a heap bounded to `capacity` candidates; zero is treated as one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            heap: BinaryHeap::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Offer a candidate, evicting the current worst when full and beaten
    pub fn offer(&mut self, candidate: Candidate) {
        if self.heap.len() < self.capacity {
            self.heap.push(candidate);
            return;
        }

        if self
            .heap
            .peek()
            .is_some_and(|worst| candidate.score < worst.score)
        {
            self.heap.pop();
            self.heap.push(candidate);
        }
    }

    /// Number of retained candidates
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the heap holds no candidates
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Draw one retained candidate uniformly at random
    ///
    /// Pops a uniform number of entries off the top and returns the anchor
    /// then exposed, so every retained candidate is equally likely regardless
    /// of its score. Returns `None` on an empty heap.
    pub fn select<R: Rng>(mut self, rng: &mut R) -> Option<Coord> {
        if self.heap.is_empty() {
            return None;
        }

        let skip = rng.random_range(0..self.heap.len());
        for _ in 0..skip {
            self.heap.pop();
        }

        self.heap.peek().map(|candidate| candidate.coord)
    }
}

/// Scan all admissible texture anchors and retain the K cheapest
///
/// Anchors range over `[0, TexW - P) x [0, TexH - P)`; a texture measuring
/// exactly `P` along an axis contributes the single anchor at zero.
///
/// # Errors
///
/// Returns `TextureTooSmall` when the texture is smaller than the patch in
/// either dimension
pub fn k_best<C>(
    texture_width: usize,
    texture_height: usize,
    patch: usize,
    samples: usize,
    cost: C,
) -> crate::Result<CandidateHeap>
where
    C: Fn(Coord) -> u64,
{
    if texture_width < patch || texture_height < patch {
        return Err(QuiltError::TextureTooSmall {
            width: texture_width,
            height: texture_height,
            patch,
        });
    }

    let scan_width = (texture_width - patch).max(1);
    let scan_height = (texture_height - patch).max(1);

    let mut heap = CandidateHeap::new(samples);
    for x in 0..scan_width {
        for y in 0..scan_height {
            let coord = Coord::new(x as i32, y as i32);
            heap.offer(Candidate {
                score: cost(coord),
                coord,
            });
        }
    }

    Ok(heap)
}

/// Draw a patch anchor uniformly from the K best
///
/// # Errors
///
/// Returns `Internal` if the heap is empty, which the scan precludes
pub fn sample<R: Rng>(heap: CandidateHeap, rng: &mut R) -> crate::Result<Coord> {
    heap.select(rng)
        .ok_or_else(|| internal("candidate heap drained before sampling"))
}

/// Boundary cost of a candidate anchor against the placed overlap strips
///
/// Sums `metric` over the left `O x P` strip and the top `P x O` strip when
/// the tile has those neighbors, then subtracts the doubly-counted `O x O`
/// corner. All three rectangles are clipped at the output edges. `metric`
/// receives the offset within the patch.
pub fn boundary_cost<M>(
    quilt_width: usize,
    quilt_height: usize,
    quxel: Coord,
    patch: usize,
    overlap: usize,
    chunk: usize,
    metric: M,
) -> u64
where
    M: Fn(Coord) -> u64,
{
    let has_left = quxel.x >= chunk as i32;
    let has_top = quxel.y >= chunk as i32;

    let clip_u = |extent: usize| extent.min(quilt_width.saturating_sub(quxel.x as usize));
    let clip_v = |extent: usize| extent.min(quilt_height.saturating_sub(quxel.y as usize));

    let mut total = 0;

    if has_left {
        total += rect_sum(clip_u(overlap), clip_v(patch), &metric);
    }

    if has_top {
        total += rect_sum(clip_u(patch), clip_v(overlap), &metric);
    }

    if has_left && has_top {
        // The corner was counted by both strips
        total -= rect_sum(clip_u(overlap), clip_v(overlap), &metric);
    }

    total
}

/// Sum `metric` over the clipped tile rectangle anchored at `quxel`
///
/// Used by the transfer driver for the constraint term, which spans the whole
/// `P x P` tile rather than just its overlap strips.
pub fn tile_cost<M>(
    quilt_width: usize,
    quilt_height: usize,
    quxel: Coord,
    patch: usize,
    metric: M,
) -> u64
where
    M: Fn(Coord) -> u64,
{
    let max_u = patch.min(quilt_width.saturating_sub(quxel.x as usize));
    let max_v = patch.min(quilt_height.saturating_sub(quxel.y as usize));

    rect_sum(max_u, max_v, &metric)
}

fn rect_sum<M>(max_u: usize, max_v: usize, metric: &M) -> u64
where
    M: Fn(Coord) -> u64,
{
    let mut sum = 0;
    for u in 0..max_u {
        for v in 0..max_v {
            sum += metric(Coord::new(u as i32, v as i32));
        }
    }

    sum
}
