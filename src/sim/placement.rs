//! Collision-safe random placement
//!
//! Used to scatter the field at match start and to respawn soldiers. Sampling
//! is capped so a crowded arena reports a failure instead of spinning forever.

use glam::{UVec2, Vec2};
use rand::Rng;

use super::collision::Aabb;

/// Random placement could not find room
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementFailure {
    #[error("a {extent:?} box does not fit in a {arena:?} arena")]
    DoesNotFit { extent: UVec2, arena: UVec2 },

    #[error("no free spot for a {extent:?} box after {attempts} attempts")]
    Exhausted { extent: UVec2, attempts: u32 },
}

/// Sample a top-left corner for a box of `extent` that keeps clear of `existing`
///
/// Coordinates are whole pixels in `[0, arena - extent)`. A candidate is
/// rejected when it overlaps any existing box with both grown by `padding`.
pub fn place_without_overlap<R: Rng + ?Sized>(
    rng: &mut R,
    arena: UVec2,
    extent: UVec2,
    existing: &[Aabb],
    padding: u32,
    max_attempts: u32,
) -> Result<Vec2, PlacementFailure> {
    if extent.x >= arena.x || extent.y >= arena.y {
        return Err(PlacementFailure::DoesNotFit { extent, arena });
    }
    let limit = arena - extent;

    for _ in 0..max_attempts {
        let candidate = Vec2::new(
            rng.random_range(0..limit.x) as f32,
            rng.random_range(0..limit.y) as f32,
        );
        let padded = Aabb::new(candidate, extent).padded(padding);
        if !existing.iter().any(|other| other.padded(padding).overlaps(&padded)) {
            return Ok(candidate);
        }
    }

    log::warn!(
        "Placement gave up on a {:?} box after {} attempts ({} boxes placed)",
        extent,
        max_attempts,
        existing.len()
    );
    Err(PlacementFailure::Exhausted {
        extent,
        attempts: max_attempts,
    })
}

/// Place boxes one after another, each avoiding every box placed before it
pub fn place_all<R: Rng + ?Sized>(
    rng: &mut R,
    arena: UVec2,
    extents: &[UVec2],
    placed: &mut Vec<Aabb>,
    padding: u32,
    max_attempts: u32,
) -> Result<Vec<Vec2>, PlacementFailure> {
    let mut positions = Vec::with_capacity(extents.len());
    for &extent in extents {
        let position = place_without_overlap(rng, arena, extent, placed, padding, max_attempts)?;
        placed.push(Aabb::new(position, extent));
        positions.push(position);
    }
    Ok(positions)
}
