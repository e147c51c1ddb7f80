//! Arena state: every entity of a match and the match lifecycle
//!
//! The arena is the only mutator of its entities. Entities are allocated once
//! at construction and re-placed in place on reset.

use glam::{UVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::combatant::{Combatant, CombatantId};
use super::entity::{Body, DestructibleObstacle, Obstacle, Terrain};
use super::locomotion::Facing;
use super::placement::{PlacementFailure, place_all};
use super::projectile::{Projectile, ProjectileRegistry};
use crate::config::{ConfigError, MatchConfig};

/// Errors surfaced by the arena; none of them leave a half-built arena behind
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Placement(#[from] PlacementFailure),

    #[error("expected {expected} intents, got {actual}")]
    IntentCount { expected: usize, actual: usize },

    #[error("match is over, {winner} won")]
    MatchOver { winner: CombatantId },
}

/// Something that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArenaEvent {
    Fired {
        shooter: CombatantId,
        facing: Facing,
    },
    /// Projectile stopped by a sandbag
    Absorbed {
        shooter: CombatantId,
        obstacle: usize,
    },
    BarrelDestroyed {
        shooter: CombatantId,
        destructible: usize,
    },
    Hit {
        shooter: CombatantId,
        target: CombatantId,
    },
    Respawned {
        id: CombatantId,
        position: Vec2,
    },
    /// Projectile left the arena
    Expired {
        shooter: CombatantId,
    },
    Won {
        winner: CombatantId,
    },
}

/// Explicit positions for every entity, in arena order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub obstacles: Vec<Vec2>,
    pub destructibles: Vec<Vec2>,
    pub combatants: Vec<Vec2>,
}

impl Layout {
    /// Random layout honouring the configured padding
    ///
    /// Sandbags go down first, then barrels, then soldiers; each entity only
    /// avoids the ones placed before it.
    pub fn random<R: Rng + ?Sized>(config: &MatchConfig, rng: &mut R) -> Result<Self, PlacementFailure> {
        let arena = config.arena_size();
        let padding = config.padding;
        let attempts = config.placement_attempts;
        let mut placed: Vec<Aabb> = Vec::new();

        let obstacles = place_all(
            rng,
            arena,
            &vec![config.obstacle_sprite.hitbox(); config.obstacles],
            &mut placed,
            padding,
            attempts,
        )?;
        let destructibles = place_all(
            rng,
            arena,
            &vec![config.destructible_sprite.hitbox(); config.destructibles],
            &mut placed,
            padding,
            attempts,
        )?;
        // Soldiers start on frame 0
        let soldier = config.combatant_sprites.hitboxes()[0];
        let combatants = place_all(
            rng,
            arena,
            &vec![soldier; config.players],
            &mut placed,
            padding,
            attempts,
        )?;

        Ok(Self {
            obstacles,
            destructibles,
            combatants,
        })
    }
}

/// Serializable read-only view of an arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub obstacles: Vec<Aabb>,
    pub destructibles: Vec<DestructibleSnapshot>,
    pub combatants: Vec<CombatantSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub winner: Option<CombatantId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestructibleSnapshot {
    pub bounds: Aabb,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub bounds: Aabb,
    pub frame: usize,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub owner: CombatantId,
    pub facing: Facing,
    pub bounds: Aabb,
}

/// A complete match
#[derive(Debug, Clone)]
pub struct Arena<R = Pcg32> {
    pub(crate) config: MatchConfig,
    pub(crate) rng: R,
    pub(crate) terrain: Terrain,
    pub(crate) combatants: Vec<Combatant>,
    /// One per combatant, same index
    pub(crate) registries: Vec<ProjectileRegistry>,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
}

impl Arena<Pcg32> {
    /// Arena driven by a PCG stream seeded from `seed`
    pub fn from_seed(config: MatchConfig, seed: u64) -> Result<Self, ArenaError> {
        Self::new(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Arena<R> {
    /// Validate the configuration and scatter the field
    pub fn new(config: MatchConfig, mut rng: R) -> Result<Self, ArenaError> {
        config.validate()?;
        let layout = Layout::random(&config, &mut rng)?;
        let arena = Self::assemble(config, layout, rng);
        log::info!(
            "Match ready: {}x{} arena, {} players, {} sandbags, {} barrels",
            arena.config.width,
            arena.config.height,
            arena.combatants.len(),
            arena.terrain.obstacles.len(),
            arena.terrain.destructibles.len()
        );
        Ok(arena)
    }

    /// Arena with hand-placed entities
    ///
    /// Entity counts in `config` are replaced by the layout's counts, so a
    /// later `reset` scatters the same population.
    pub fn with_layout(mut config: MatchConfig, layout: Layout, rng: R) -> Result<Self, ArenaError> {
        config.obstacles = layout.obstacles.len();
        config.destructibles = layout.destructibles.len();
        config.players = layout.combatants.len();
        config.validate()?;
        Ok(Self::assemble(config, layout, rng))
    }

    fn assemble(config: MatchConfig, layout: Layout, rng: R) -> Self {
        let obstacle = config.obstacle_sprite.hitbox();
        let destructible = config.destructible_sprite.hitbox();
        let hitboxes = config.combatant_sprites.hitboxes();

        let terrain = Terrain::new(
            layout
                .obstacles
                .iter()
                .map(|&pos| Obstacle::new(pos, obstacle))
                .collect(),
            layout
                .destructibles
                .iter()
                .map(|&pos| DestructibleObstacle::new(pos, destructible))
                .collect(),
        );
        let combatants: Vec<Combatant> = layout
            .combatants
            .iter()
            .enumerate()
            .map(|(i, &pos)| Combatant::new(CombatantId(i), pos, hitboxes))
            .collect();
        let registries = combatants
            .iter()
            .map(|c| ProjectileRegistry::new(c.id()))
            .collect();

        Self {
            config,
            rng,
            terrain,
            combatants,
            registries,
            time_ticks: 0,
        }
    }

    /// Start over: new layout, barrels restored, projectiles gone, scores zeroed
    ///
    /// The new layout is computed before anything is touched, so a placement
    /// failure leaves the current match as it was.
    pub fn reset(&mut self) -> Result<(), ArenaError> {
        let layout = Layout::random(&self.config, &mut self.rng)?;

        let obstacle = self.config.obstacle_sprite.hitbox();
        let destructible = self.config.destructible_sprite.hitbox();
        for (slot, &pos) in self.terrain.obstacles.iter_mut().zip(&layout.obstacles) {
            *slot = Obstacle::new(pos, obstacle);
        }
        for (slot, &pos) in self.terrain.destructibles.iter_mut().zip(&layout.destructibles) {
            *slot = DestructibleObstacle::new(pos, destructible);
        }
        for (combatant, &pos) in self.combatants.iter_mut().zip(&layout.combatants) {
            combatant.reset(pos);
        }
        for registry in &mut self.registries {
            registry.clear();
        }
        self.time_ticks = 0;

        log::info!("Match reset");
        Ok(())
    }
}

impl<R> Arena<R> {
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn arena_size(&self) -> UVec2 {
        self.config.arena_size()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.terrain.obstacles()
    }

    pub fn destructibles(&self) -> &[DestructibleObstacle] {
        self.terrain.destructibles()
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.index())
    }

    pub fn registry(&self, id: CombatantId) -> Option<&ProjectileRegistry> {
        self.registries.get(id.index())
    }

    /// Every live projectile, grouped by shooter
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.registries.iter().flat_map(ProjectileRegistry::iter)
    }

    /// Scores in combatant order
    pub fn scoreboard(&self) -> Vec<u32> {
        self.combatants.iter().map(Combatant::score).collect()
    }

    /// First combatant to reach the winning score
    pub fn winner(&self) -> Option<CombatantId> {
        self.combatants
            .iter()
            .find(|c| c.score() >= self.config.win_score)
            .map(Combatant::id)
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            tick: self.time_ticks,
            width: self.config.width,
            height: self.config.height,
            obstacles: self.terrain.obstacles.iter().map(Body::aabb).collect(),
            destructibles: self
                .terrain
                .destructibles
                .iter()
                .map(|d| DestructibleSnapshot {
                    bounds: d.aabb(),
                    visible: d.is_visible(),
                })
                .collect(),
            combatants: self
                .combatants
                .iter()
                .map(|c| CombatantSnapshot {
                    id: c.id(),
                    bounds: c.aabb(),
                    frame: c.frame(),
                    score: c.score(),
                })
                .collect(),
            projectiles: self
                .projectiles()
                .map(|p| ProjectileSnapshot {
                    owner: p.owner(),
                    facing: p.facing(),
                    bounds: p.aabb(),
                })
                .collect(),
            winner: self.winner(),
        }
    }
}
