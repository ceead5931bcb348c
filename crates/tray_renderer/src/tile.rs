//! Row-tile partitioning for parallel rendering.
//!
//! The image is cut into horizontal bands of whole rows. Tiles are dealt to
//! workers round-robin, so each worker renders several non-contiguous bands
//! and uneven per-band cost evens out.

/// Target number of tiles per worker.
pub const TILES_PER_THREAD: u32 = 4;

/// A horizontal band of image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Index of this tile, top to bottom in buffer order
    pub index: usize,
    /// First row covered by the tile
    pub y_start: u32,
    /// Number of rows in the tile
    pub rows: u32,
}

impl Tile {
    /// One past the last row covered.
    pub fn y_end(&self) -> u32 {
        self.y_start + self.rows
    }

    /// Worker that renders this tile.
    pub fn worker(&self, threads: usize) -> usize {
        self.index % threads.max(1)
    }
}

/// Rows per tile for an image of `height` rows split across `threads` workers.
///
/// Never less than one row.
pub fn tile_rows(height: u32, threads: usize) -> u32 {
    let threads = threads.max(1) as u32;
    (height / (threads.saturating_mul(TILES_PER_THREAD))).max(1)
}

/// Split `height` rows into tiles. The last tile may be shorter.
pub fn row_tiles(height: u32, threads: usize) -> Vec<Tile> {
    let rows = tile_rows(height, threads);
    let mut tiles = Vec::with_capacity(height.div_ceil(rows) as usize);

    let mut y = 0;
    while y < height {
        let band = rows.min(height - y);
        tiles.push(Tile {
            index: tiles.len(),
            y_start: y,
            rows: band,
        });
        y += band;
    }

    tiles
}

/// Deal tiles to workers: worker `w` gets every tile with `index % threads == w`.
pub fn assign_tiles(tiles: &[Tile], threads: usize) -> Vec<Vec<Tile>> {
    let threads = threads.max(1);
    let mut assignment = vec![Vec::new(); threads];
    for tile in tiles {
        assignment[tile.worker(threads)].push(*tile);
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_rows_minimum_is_one() {
        assert_eq!(tile_rows(1, 16), 1);
        assert_eq!(tile_rows(10, 8), 1);
        assert_eq!(tile_rows(0, 4), 1);
    }

    #[test]
    fn test_tile_rows_follow_thread_count() {
        // 768 rows over 8 threads x 4 tiles each
        assert_eq!(tile_rows(768, 8), 24);
        assert_eq!(tile_rows(100, 1), 25);
    }

    #[test]
    fn test_last_tile_is_shorter() {
        let tiles = row_tiles(10, 1);
        // 10 / 4 = 2 rows per tile
        assert_eq!(tiles.len(), 5);
        assert!(tiles.iter().all(|t| t.rows == 2));

        let tiles = row_tiles(11, 1);
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles.last().unwrap().rows, 1);
        assert_eq!(tiles.last().unwrap().y_end(), 11);
    }

    #[test]
    fn test_round_robin_assignment() {
        let tiles = row_tiles(64, 4);
        let assignment = assign_tiles(&tiles, 4);

        assert_eq!(assignment.len(), 4);
        for (worker, worker_tiles) in assignment.iter().enumerate() {
            assert!(worker_tiles.iter().all(|t| t.index % 4 == worker));
            // Each worker gets several non-contiguous bands
            assert!(worker_tiles.len() >= 2);
            for pair in worker_tiles.windows(2) {
                assert!(pair[1].y_start > pair[0].y_end());
            }
        }
    }

    #[test]
    fn test_every_row_covered_exactly_once() {
        for height in [1u32, 2, 3, 7, 31, 64, 100, 257, 768] {
            for threads in [1usize, 2, 3, 4, 7, 8, 16, 64] {
                let tiles = row_tiles(height, threads);
                let assignment = assign_tiles(&tiles, threads);

                let mut owners = vec![0u32; height as usize];
                for worker_tiles in &assignment {
                    for tile in worker_tiles {
                        for y in tile.y_start..tile.y_end() {
                            owners[y as usize] += 1;
                        }
                    }
                }
                assert!(
                    owners.iter().all(|&count| count == 1),
                    "height={height} threads={threads}"
                );
            }
        }
    }
}
