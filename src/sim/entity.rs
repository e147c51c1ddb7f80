//! Static terrain and the shared body accessors
//!
//! Sandbags (`Obstacle`) always block. Barrels (`DestructibleObstacle`) block
//! until a projectile knocks them out.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Anything with a position and a collision box
pub trait Body {
    fn position(&self) -> Vec2;
    fn extent(&self) -> UVec2;

    fn aabb(&self) -> Aabb {
        Aabb::new(self.position(), self.extent())
    }

    /// Whether the body currently takes part in collisions
    fn is_solid(&self) -> bool {
        true
    }
}

/// Indestructible terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    position: Vec2,
    extent: UVec2,
}

impl Obstacle {
    pub fn new(position: Vec2, extent: UVec2) -> Self {
        Self { position, extent }
    }
}

impl Body for Obstacle {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn extent(&self) -> UVec2 {
        self.extent
    }
}

/// Terrain that disappears when shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DestructibleObstacle {
    position: Vec2,
    extent: UVec2,
    visible: bool,
}

impl DestructibleObstacle {
    pub fn new(position: Vec2, extent: UVec2) -> Self {
        Self {
            position,
            extent,
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn destroy(&mut self) {
        self.visible = false;
    }
}

impl Body for DestructibleObstacle {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn extent(&self) -> UVec2 {
        self.extent
    }

    fn is_solid(&self) -> bool {
        self.visible
    }
}

/// All static terrain of an arena
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Terrain {
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) destructibles: Vec<DestructibleObstacle>,
}

impl Terrain {
    pub fn new(obstacles: Vec<Obstacle>, destructibles: Vec<DestructibleObstacle>) -> Self {
        Self {
            obstacles,
            destructibles,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn destructibles(&self) -> &[DestructibleObstacle] {
        &self.destructibles
    }

    /// Boxes of everything that currently blocks movement
    pub fn solid_boxes(&self) -> impl Iterator<Item = Aabb> + '_ {
        self.destructibles
            .iter()
            .filter(|d| d.is_solid())
            .map(Body::aabb)
            .chain(self.obstacles.iter().map(Body::aabb))
    }

    /// Whether any solid terrain overlaps `aabb`
    pub fn blocks(&self, aabb: &Aabb) -> bool {
        self.solid_boxes().any(|solid| solid.overlaps(aabb))
    }
}
