//! Trench Duel - collision and movement core for a top-down shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, locomotion, projectiles, arena)
//! - `config`: Data-driven match configuration and presets
//!
//! Rendering, input mapping and asset loading live outside this crate. The
//! simulation only produces positions, sprite frames and visibility flags.

pub mod config;
pub mod sim;

pub use config::{ConfigError, MatchConfig, MatchPreset};
pub use sim::{Arena, ArenaError, CombatantId, Facing, Intent};

/// Reference match constants
pub mod consts {
    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: u32 = 1024;
    pub const ARENA_HEIGHT: u32 = 746;

    /// Distance covered by one stride and by a projectile per tick
    pub const SPEED: f32 = 18.0;

    /// Entity counts
    pub const PLAYERS: usize = 2;
    pub const OBSTACLES: usize = 5;
    pub const DESTRUCTIBLES: usize = 5;

    /// Minimum clearance between bounding boxes at match start
    pub const PLACEMENT_PADDING: u32 = 30;
    /// Random samples tried before a placement gives up
    pub const PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Points needed to win a match
    pub const WIN_SCORE: u32 = 10;

    /// Sandbag sprite and the part of it that is shadow
    pub const SANDBAG_SIZE: [u32; 2] = [85, 68];
    pub const SANDBAG_SHRINK: [u32; 2] = [5, 28];

    /// Barrel sprite and the part of it that is shadow
    pub const BARREL_SIZE: [u32; 2] = [45, 88];
    pub const BARREL_SHRINK: [u32; 2] = [5, 38];

    /// Soldier sprite frames share one size in the reference art
    pub const SOLDIER_SIZE: [u32; 2] = [90, 90];
    pub const SOLDIER_SHRINK: [u32; 2] = [50, 50];

    /// Bullet sprite when travelling vertically
    pub const BULLET_SIZE: [u32; 2] = [10, 30];

    /// Muzzle offsets from the soldier position, per facing
    pub const MUZZLE_UP: [f32; 2] = [30.0, -25.0];
    pub const MUZZLE_DOWN: [f32; 2] = [0.0, 60.0];
    pub const MUZZLE_LEFT: [f32; 2] = [-40.0, 10.0];
    pub const MUZZLE_RIGHT: [f32; 2] = [55.0, 45.0];
}
