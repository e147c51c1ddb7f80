//! Soldiers: locomotion, movement checks, scoring and respawn

use glam::{UVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::entity::{Body, Terrain};
use super::locomotion::{Facing, Gait, LocomotionState};
use super::placement::{PlacementFailure, place_without_overlap};

/// Stable index of a combatant within its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub usize);

impl CombatantId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Result of a walk intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Stride taken
    Moved,
    /// Stride rejected by terrain, another soldier or the arena edge
    Blocked,
    /// Turning or holding; no stride this step
    Stationary,
}

/// A player-controlled soldier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    id: CombatantId,
    position: Vec2,
    gait: Gait,
    score: u32,
    /// Hitbox per sprite frame
    hitboxes: [UVec2; LocomotionState::COUNT],
}

impl Combatant {
    pub fn new(id: CombatantId, position: Vec2, hitboxes: [UVec2; LocomotionState::COUNT]) -> Self {
        Self {
            id,
            position,
            gait: Gait::default(),
            score: 0,
            hitboxes,
        }
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn gait(&self) -> &Gait {
        &self.gait
    }

    pub fn locomotion(&self) -> LocomotionState {
        self.gait.state
    }

    /// Sprite frame to draw
    pub fn frame(&self) -> usize {
        self.gait.state.frame()
    }

    /// Direction a shot fired now would travel
    pub fn aim(&self) -> Option<Facing> {
        self.gait.state.aim()
    }

    /// Hitbox size for a given frame
    pub fn extent_for(&self, state: LocomotionState) -> UVec2 {
        self.hitboxes[state.frame()]
    }

    pub(crate) fn add_point(&mut self) {
        self.score += 1;
    }

    /// Back to a fresh soldier at `position`
    pub(crate) fn reset(&mut self, position: Vec2) {
        self.position = position;
        self.gait = Gait::default();
        self.score = 0;
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Run one locomotion step and move if the stride is clear
    ///
    /// The frame changes even when the stride is rejected. `blocked` reports
    /// whether a candidate box hits terrain or another soldier.
    pub fn walk(
        &mut self,
        intent: Facing,
        speed: f32,
        arena: UVec2,
        blocked: impl Fn(&Aabb) -> bool,
    ) -> Walk {
        let Some(direction) = self.gait.advance(intent) else {
            return Walk::Stationary;
        };

        let candidate = Aabb::new(self.position + direction.unit() * speed, self.extent());
        if blocked(&candidate) || !within_walk_bounds(&candidate, arena) {
            return Walk::Blocked;
        }
        self.position = candidate.position;
        Walk::Moved
    }
}

impl Body for Combatant {
    fn position(&self) -> Vec2 {
        self.position
    }

    /// Depends on the current sprite frame
    fn extent(&self) -> UVec2 {
        self.extent_for(self.gait.state)
    }
}

/// Soldiers may hang half their hitbox over the top and left edges, none over
/// the bottom and right
fn within_walk_bounds(aabb: &Aabb, arena: UVec2) -> bool {
    let size = aabb.extent.as_vec2();
    let arena = arena.as_vec2();
    aabb.position.x >= -size.x / 2.0
        && aabb.position.y >= -size.y / 2.0
        && aabb.position.x < arena.x - size.x
        && aabb.position.y < arena.y - size.y
}

/// Move a soldier to a random spot clear of solid terrain and the other soldiers
pub fn respawn<R: Rng + ?Sized>(
    combatants: &mut [Combatant],
    victim: CombatantId,
    terrain: &Terrain,
    arena: UVec2,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Vec2, PlacementFailure> {
    let occupied: Vec<Aabb> = terrain
        .solid_boxes()
        .chain(
            combatants
                .iter()
                .filter(|c| c.id != victim)
                .map(Body::aabb),
        )
        .collect();

    let combatant = &mut combatants[victim.index()];
    let position = place_without_overlap(rng, arena, combatant.extent(), &occupied, 0, max_attempts)?;
    combatant.set_position(position);
    log::debug!("{} respawned at ({}, {})", victim, position.x, position.y);
    Ok(position)
}
