use crate::*;

pub const POINTS_PER_TILE: u32 = 10;

/// Extra points for every tile beyond the minimum run.
pub const POINTS_PER_EXTRA_TILE: u32 = 5;

/// Points for clearing `cleared` tiles in one resolution step.
pub const fn points_for_clear(cleared: CellCount, min_run: u8) -> u32 {
    let cleared = cleared as u32;
    let extra = cleared.saturating_sub(min_run as u32);
    cleared * POINTS_PER_TILE + extra * POINTS_PER_EXTRA_TILE
}
