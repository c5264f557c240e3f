//! Dependency-ordered parallel tile placement
//!
//! Tiles are released to a worker pool in a wavefront from the top-left
//! corner: a tile becomes claimable only once its left, top, and top-left
//! neighbors are done, so every overlap strip a worker reads is already
//! populated. The scheduler owns the status grid and the work queue; what
//! "processing a tile" means is supplied by the caller as a closure.

mod grid;

pub use grid::{TileCoord, TileGrid, TileStatus};

use crate::io::error::{internal, QuiltError};
use ndarray::Array2;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::thread;

struct SchedulerState {
    status: Array2<TileStatus>,
    queue: VecDeque<TileCoord>,
    done: usize,
    terminated: bool,
    failure: Option<QuiltError>,
}

/// Wavefront scheduler running tile placements across a worker pool
pub struct TileScheduler {
    grid: TileGrid,
    state: Mutex<SchedulerState>,
    work_ready: Condvar,
    tile_done: Condvar,
}

impl TileScheduler {
    /// Create a scheduler for the given tile grid; all tiles start unclaimed
    pub fn new(grid: TileGrid) -> Self {
        Self {
            grid,
            state: Mutex::new(SchedulerState {
                status: Array2::from_elem((grid.rows(), grid.cols()), TileStatus::Unclaimed),
                queue: VecDeque::new(),
                done: 0,
                terminated: false,
                failure: None,
            }),
            work_ready: Condvar::new(),
            tile_done: Condvar::new(),
        }
    }

    /// The grid this scheduler places tiles on
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Current status of a tile, or `None` outside the grid
    pub fn status(&self, tile: TileCoord) -> Option<TileStatus> {
        self.state.lock().status.get([tile.gy, tile.gx]).copied()
    }

    /// Number of tiles completed so far
    pub fn completed(&self) -> usize {
        self.state.lock().done
    }

    /// Process every tile of the grid with `process` on `workers` threads
    ///
    /// Seeds the queue with the origin tile, runs workers until every tile is
    /// done, then terminates the pool. The first error returned by `process`
    /// aborts the run and is propagated; remaining workers drain and exit.
    ///
    /// # Errors
    ///
    /// Returns the first tile-processing error, or `Internal` if a tile is
    /// claimed before its overlap ancestors are done
    pub fn run<F>(&self, workers: usize, process: F) -> crate::Result<()>
    where
        F: Fn(TileCoord) -> crate::Result<()> + Sync,
    {
        let workers = workers.max(1);

        {
            let mut state = self.state.lock();
            state.queue.push_back(TileCoord::new(0, 0));
        }
        self.work_ready.notify_one();

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| self.worker_loop(&process));
            }

            let total = self.grid.tile_count();
            let mut state = self.state.lock();
            while state.done < total && state.failure.is_none() {
                self.tile_done.wait(&mut state);
            }
            state.terminated = true;
            drop(state);
            self.work_ready.notify_all();
        });

        let mut state = self.state.lock();
        match state.failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn worker_loop<F>(&self, process: &F)
    where
        F: Fn(TileCoord) -> crate::Result<()>,
    {
        loop {
            let Some(tile) = self.claim_next() else {
                return;
            };

            match process(tile) {
                Ok(()) => self.complete(tile),
                Err(error) => {
                    self.fail(error);
                    return;
                }
            }
        }
    }

    // Blocks until a claimable tile is available; None means the pool is
    // shutting down
    fn claim_next(&self) -> Option<TileCoord> {
        let mut state = self.state.lock();

        loop {
            if state.terminated {
                return None;
            }

            // Duplicate enqueues are tolerated: anything already claimed is
            // skipped here
            while let Some(tile) = state.queue.pop_front() {
                let unclaimed = state
                    .status
                    .get([tile.gy, tile.gx])
                    .is_some_and(|&status| status == TileStatus::Unclaimed);
                if !unclaimed {
                    continue;
                }

                if !self.ancestors_done(&state, tile) {
                    state.failure.get_or_insert_with(|| {
                        internal(format!(
                            "tile ({}, {}) claimed before its overlap ancestors completed",
                            tile.gx, tile.gy
                        ))
                    });
                    state.terminated = true;
                    drop(state);
                    self.work_ready.notify_all();
                    self.tile_done.notify_all();
                    return None;
                }

                if let Some(status) = state.status.get_mut([tile.gy, tile.gx]) {
                    *status = TileStatus::InProgress;
                }

                return Some(tile);
            }

            self.work_ready.wait(&mut state);
        }
    }

    fn ancestors_done(&self, state: &SchedulerState, tile: TileCoord) -> bool {
        self.grid.ancestors(tile).all(|ancestor| {
            state
                .status
                .get([ancestor.gy, ancestor.gx])
                .is_some_and(|&status| status == TileStatus::Done)
        })
    }

    fn complete(&self, tile: TileCoord) {
        let released = {
            let mut state = self.state.lock();

            if let Some(status) = state.status.get_mut([tile.gy, tile.gx]) {
                *status = TileStatus::Done;
            }
            state.done += 1;

            let released = self.releasable_neighbors(&state, tile);
            state.queue.extend(released.iter().copied());
            released
        };

        self.tile_done.notify_all();
        for _ in &released {
            self.work_ready.notify_one();
        }
    }

    // A completed tile releases its right neighbor once the top-right tile is
    // done (trivially on the first row) and its bottom neighbor once the
    // bottom-left tile is done (trivially in the first column). Together with
    // the origin seed this sweeps a wavefront from the top-left corner and
    // guarantees the diagonal dependency of every released tile.
    fn releasable_neighbors(&self, state: &SchedulerState, tile: TileCoord) -> Vec<TileCoord> {
        let is_done = |gx: usize, gy: usize| {
            state
                .status
                .get([gy, gx])
                .is_some_and(|&status| status == TileStatus::Done)
        };

        let mut released = Vec::with_capacity(2);

        if tile.gx + 1 < self.grid.cols() && (tile.gy == 0 || is_done(tile.gx + 1, tile.gy - 1)) {
            released.push(TileCoord::new(tile.gx + 1, tile.gy));
        }

        if tile.gy + 1 < self.grid.rows() && (tile.gx == 0 || is_done(tile.gx - 1, tile.gy + 1)) {
            released.push(TileCoord::new(tile.gx, tile.gy + 1));
        }

        released
    }

    fn fail(&self, error: QuiltError) {
        let mut state = self.state.lock();
        state.failure.get_or_insert(error);
        state.terminated = true;
        drop(state);
        self.work_ready.notify_all();
        self.tile_done.notify_all();
    }
}
