//! Match configuration and presets
//!
//! Everything the simulation needs at construction time. Defaults reproduce
//! the reference two-player match.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Facing, LocomotionState};

/// Errors raised while building or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("a match needs at least 2 players, got {0}")]
    PlayerCount(usize),

    #[error("{what} shrink {shrink:?} is larger than its sprite {size:?}")]
    Shrink {
        what: &'static str,
        size: UVec2,
        shrink: UVec2,
    },

    #[error("speed must be positive and finite, got {0}")]
    Speed(f32),

    #[error("win score must be at least 1")]
    WinScore,

    #[error("placement attempts must be at least 1")]
    PlacementAttempts,

    #[error("{what} hitbox {extent:?} does not fit in a {width}x{height} arena")]
    ArenaTooSmall {
        what: &'static str,
        extent: UVec2,
        width: u32,
        height: u32,
    },

    #[error("invalid match config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Named configuration presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MatchPreset {
    /// The reference match: 5 sandbags, 5 barrels, first to 10
    #[default]
    Classic,
    /// Sparse field, first to 5
    Skirmish,
    /// Dense field with little room to manoeuvre
    Crowded,
}

impl MatchPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPreset::Classic => "Classic",
            MatchPreset::Skirmish => "Skirmish",
            MatchPreset::Crowded => "Crowded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(MatchPreset::Classic),
            "skirmish" | "quick" => Some(MatchPreset::Skirmish),
            "crowded" => Some(MatchPreset::Crowded),
            _ => None,
        }
    }
}

/// A sprite size and the margin trimmed off it for collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteConfig {
    pub size: UVec2,
    pub shrink: UVec2,
}

impl SpriteConfig {
    pub fn new(size: [u32; 2], shrink: [u32; 2]) -> Self {
        Self {
            size: UVec2::from(size),
            shrink: UVec2::from(shrink),
        }
    }

    /// Collision box size
    pub fn hitbox(&self) -> UVec2 {
        self.size.saturating_sub(self.shrink)
    }

    fn check(&self, what: &'static str) -> Result<(), ConfigError> {
        if self.shrink.cmpgt(self.size).any() {
            return Err(ConfigError::Shrink {
                what,
                size: self.size,
                shrink: self.shrink,
            });
        }
        Ok(())
    }
}

/// Soldier sprite frames, one per locomotion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSprites {
    /// Raw frame sizes indexed by `LocomotionState::frame()`
    pub frames: [UVec2; LocomotionState::COUNT],
    pub shrink: UVec2,
}

impl Default for CombatantSprites {
    fn default() -> Self {
        Self::uniform(UVec2::from(SOLDIER_SIZE), UVec2::from(SOLDIER_SHRINK))
    }
}

impl CombatantSprites {
    /// Every frame the same size
    pub fn uniform(size: UVec2, shrink: UVec2) -> Self {
        Self {
            frames: [size; LocomotionState::COUNT],
            shrink,
        }
    }

    /// Hitbox per frame
    pub fn hitboxes(&self) -> [UVec2; LocomotionState::COUNT] {
        self.frames.map(|frame| frame.saturating_sub(self.shrink))
    }

    /// Offset of the sprite's top-left corner from the hitbox position
    pub fn origin(&self) -> Vec2 {
        -self.shrink.as_vec2() / 2.0
    }
}

/// Where a projectile appears relative to its shooter, per facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuzzleOffsets {
    pub up: Vec2,
    pub down: Vec2,
    pub left: Vec2,
    pub right: Vec2,
}

impl Default for MuzzleOffsets {
    fn default() -> Self {
        Self {
            up: Vec2::from(MUZZLE_UP),
            down: Vec2::from(MUZZLE_DOWN),
            left: Vec2::from(MUZZLE_LEFT),
            right: Vec2::from(MUZZLE_RIGHT),
        }
    }
}

impl MuzzleOffsets {
    pub fn for_facing(&self, facing: Facing) -> Vec2 {
        match facing {
            Facing::Up => self.up,
            Facing::Down => self.down,
            Facing::Left => self.left,
            Facing::Right => self.right,
        }
    }
}

/// Full match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // === Field ===
    pub width: u32,
    pub height: u32,
    /// Stride length and projectile speed, per tick
    pub speed: f32,

    // === Population ===
    pub players: usize,
    /// Indestructible obstacles (sandbags)
    pub obstacles: usize,
    /// Destructible obstacles (barrels)
    pub destructibles: usize,

    // === Placement ===
    pub padding: u32,
    pub placement_attempts: u32,
    /// Seed for `Arena::from_seed`
    pub seed: u64,

    // === Rules ===
    pub win_score: u32,

    // === Sprites ===
    pub obstacle_sprite: SpriteConfig,
    pub destructible_sprite: SpriteConfig,
    pub combatant_sprites: CombatantSprites,
    /// Projectile size when travelling vertically; transposed for horizontal shots
    pub projectile_size: UVec2,
    pub muzzle: MuzzleOffsets,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            speed: SPEED,

            players: PLAYERS,
            obstacles: OBSTACLES,
            destructibles: DESTRUCTIBLES,

            padding: PLACEMENT_PADDING,
            placement_attempts: PLACEMENT_ATTEMPTS,
            seed: 0,

            win_score: WIN_SCORE,

            obstacle_sprite: SpriteConfig::new(SANDBAG_SIZE, SANDBAG_SHRINK),
            destructible_sprite: SpriteConfig::new(BARREL_SIZE, BARREL_SHRINK),
            combatant_sprites: CombatantSprites::default(),
            projectile_size: UVec2::from(BULLET_SIZE),
            muzzle: MuzzleOffsets::default(),
        }
    }
}

impl MatchConfig {
    /// Create a configuration from a preset
    pub fn from_preset(preset: MatchPreset) -> Self {
        let mut config = Self::default();
        match preset {
            MatchPreset::Classic => {}
            MatchPreset::Skirmish => {
                config.obstacles = 3;
                config.destructibles = 3;
                config.win_score = 5;
            }
            MatchPreset::Crowded => {
                config.obstacles = 12;
                config.destructibles = 12;
                config.padding = 10;
            }
        }
        config
    }

    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Arena size as a vector
    pub fn arena_size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Projectile hitbox for a given travel direction
    pub fn projectile_extent(&self, facing: Facing) -> UVec2 {
        if facing.is_horizontal() {
            UVec2::new(self.projectile_size.y, self.projectile_size.x)
        } else {
            self.projectile_size
        }
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players < 2 {
            return Err(ConfigError::PlayerCount(self.players));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::Speed(self.speed));
        }
        if self.win_score == 0 {
            return Err(ConfigError::WinScore);
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::PlacementAttempts);
        }

        self.obstacle_sprite.check("obstacle")?;
        self.destructible_sprite.check("destructible")?;
        for frame in &self.combatant_sprites.frames {
            SpriteConfig {
                size: *frame,
                shrink: self.combatant_sprites.shrink,
            }
            .check("combatant")?;
        }

        self.check_fits("obstacle", self.obstacle_sprite.hitbox())?;
        self.check_fits("destructible", self.destructible_sprite.hitbox())?;
        for hitbox in self.combatant_sprites.hitboxes() {
            self.check_fits("combatant", hitbox)?;
        }
        Ok(())
    }

    fn check_fits(&self, what: &'static str, extent: UVec2) -> Result<(), ConfigError> {
        if extent.x >= self.width || extent.y >= self.height {
            return Err(ConfigError::ArenaTooSmall {
                what,
                extent,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
