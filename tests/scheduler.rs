//! Validates dependency ordering, completion accounting, and failure
//! propagation in the tile scheduler

use seamquilt::scheduler::{TileCoord, TileGrid, TileScheduler, TileStatus};
use seamquilt::QuiltError;
use std::sync::Mutex;

#[test]
fn test_every_tile_completes_exactly_once() {
    let grid = TileGrid::new(40, 30, 10).unwrap();
    let scheduler = TileScheduler::new(grid);

    let processed = Mutex::new(Vec::new());
    scheduler
        .run(1, |tile| {
            processed.lock().unwrap().push(tile);
            Ok(())
        })
        .unwrap();

    let processed = processed.into_inner().unwrap();
    assert_eq!(processed.len(), grid.tile_count());
    assert_eq!(scheduler.completed(), grid.tile_count());

    let mut unique: Vec<_> = processed.clone();
    unique.sort_by_key(|tile| (tile.gy, tile.gx));
    unique.dedup();
    assert_eq!(unique.len(), processed.len(), "a tile was processed twice");
}

#[test]
fn test_ancestors_are_done_when_a_tile_is_processed() {
    let grid = TileGrid::new(144, 144, 12).unwrap();
    let scheduler = TileScheduler::new(grid);

    let violations = Mutex::new(Vec::new());
    scheduler
        .run(8, |tile| {
            for ancestor in grid.ancestors(tile) {
                if scheduler.status(ancestor) != Some(TileStatus::Done) {
                    violations.lock().unwrap().push((tile, ancestor));
                }
            }
            Ok(())
        })
        .unwrap();

    assert_eq!(scheduler.completed(), 144);
    let violations = violations.into_inner().unwrap();
    assert!(
        violations.is_empty(),
        "tiles ran before their ancestors: {violations:?}"
    );
}

#[test]
fn test_single_worker_processes_the_seed_first() {
    let grid = TileGrid::new(30, 30, 10).unwrap();
    let scheduler = TileScheduler::new(grid);

    let order = Mutex::new(Vec::new());
    scheduler
        .run(1, |tile| {
            order.lock().unwrap().push(tile);
            Ok(())
        })
        .unwrap();

    let order = order.into_inner().unwrap();
    assert_eq!(order.first(), Some(&TileCoord::new(0, 0)));
}

#[test]
fn test_worker_error_aborts_the_run() {
    let grid = TileGrid::new(40, 40, 10).unwrap();
    let scheduler = TileScheduler::new(grid);

    let result = scheduler.run(4, |tile| {
        if tile == TileCoord::new(1, 1) {
            return Err(seamquilt::io::error::invalid_parameter(
                "tile",
                &"(1, 1)",
                &"injected failure",
            ));
        }
        Ok(())
    });

    assert!(matches!(result, Err(QuiltError::InvalidParameter { .. })));
    assert!(scheduler.completed() < grid.tile_count());
}

#[test]
fn test_single_tile_grid_completes() {
    let grid = TileGrid::new(5, 5, 10).unwrap();
    assert_eq!(grid.tile_count(), 1);

    let scheduler = TileScheduler::new(grid);
    scheduler.run(4, |_| Ok(())).unwrap();
    assert_eq!(scheduler.completed(), 1);
}

#[test]
fn test_more_workers_than_tiles_terminates() {
    let grid = TileGrid::new(20, 10, 10).unwrap();
    let scheduler = TileScheduler::new(grid);

    scheduler.run(16, |_| Ok(())).unwrap();
    assert_eq!(scheduler.completed(), 2);
}
