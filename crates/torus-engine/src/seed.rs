//! Initial board seeding.
//!
//! Explicit cells from the config win; otherwise the board is filled
//! randomly from a seeded RNG, so a run is reproducible from its
//! config alone.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EngineConfig;

/// The live cells the initial board should start with.
pub fn seed_cells(config: &EngineConfig) -> Vec<(u32, u32)> {
    if !config.seed.cells.is_empty() {
        return config.seed.cells.iter().map(|&[x, y]| (x, y)).collect();
    }

    let mut rng = StdRng::seed_from_u64(config.seed.rng_seed);
    let mut cells = Vec::new();
    for y in 0..config.board.height {
        for x in 0..config.board.width {
            if rng.random_bool(config.seed.density) {
                cells.push((x, y));
            }
        }
    }
    cells
}
