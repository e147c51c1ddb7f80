//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only
//! - Injected RNG only
//! - Stable iteration order (by entity index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combatant;
pub mod entity;
pub mod locomotion;
pub mod placement;
pub mod projectile;
pub mod state;
pub mod tick;

pub use collision::{Aabb, overlaps};
pub use combatant::{Combatant, CombatantId, Walk, respawn};
pub use entity::{Body, DestructibleObstacle, Obstacle, Terrain};
pub use locomotion::{Facing, Gait, LocomotionState, Rule, Step, TRANSITIONS, transition};
pub use placement::{PlacementFailure, place_all, place_without_overlap};
pub use projectile::{Projectile, ProjectileRegistry};
pub use state::{
    Arena, ArenaError, ArenaEvent, ArenaSnapshot, CombatantSnapshot, DestructibleSnapshot, Layout,
    ProjectileSnapshot,
};
pub use tick::{Intent, TickReport};
