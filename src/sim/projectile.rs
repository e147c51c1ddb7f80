//! Projectiles and the per-shooter registries that own them
//!
//! Each tick a registry walks its projectiles in firing order. A projectile
//! is checked against sandbags, then live barrels, then enemy soldiers, then
//! the arena edge; the first match destroys it. Survivors advance.

use glam::{UVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::combatant::{Combatant, CombatantId, respawn};
use super::entity::{Body, Terrain};
use super::locomotion::Facing;
use super::state::ArenaEvent;
use crate::config::MatchConfig;

/// A fired shot; velocity never changes after spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    owner: CombatantId,
    facing: Facing,
    position: Vec2,
    extent: UVec2,
    velocity: Vec2,
}

impl Projectile {
    /// Spawn at the shooter's muzzle
    pub fn spawn(owner: CombatantId, origin: Vec2, facing: Facing, config: &MatchConfig) -> Self {
        Self {
            owner,
            facing,
            position: origin + config.muzzle.for_facing(facing),
            extent: config.projectile_extent(facing),
            velocity: facing.unit() * config.speed,
        }
    }

    pub fn owner(&self) -> CombatantId {
        self.owner
    }

    /// Travel direction, for sprite rotation
    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn advance(&mut self) {
        self.position += self.velocity;
    }

    /// Entirely past an edge; the far edges use the raw arena size
    fn out_of_bounds(&self, arena: UVec2) -> bool {
        let size = self.extent.as_vec2();
        let arena = arena.as_vec2();
        self.position.x < -size.x
            || self.position.y < -size.y
            || self.position.x > arena.x
            || self.position.y > arena.y
    }
}

impl Body for Projectile {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn extent(&self) -> UVec2 {
        self.extent
    }
}

/// Mutable view of everything a projectile can hit
pub(crate) struct Field<'a, R: ?Sized> {
    pub terrain: &'a mut Terrain,
    pub combatants: &'a mut [Combatant],
    pub arena: UVec2,
    pub placement_attempts: u32,
    pub rng: &'a mut R,
}

/// What ended a projectile
#[derive(Debug, Clone, Copy, PartialEq)]
enum Impact {
    Sandbag { obstacle: usize },
    Barrel { destructible: usize },
    Soldier {
        target: CombatantId,
        respawn: Option<Vec2>,
    },
    OutOfBounds,
}

/// Live projectiles fired by one combatant, in firing order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileRegistry {
    owner: CombatantId,
    projectiles: Vec<Projectile>,
}

impl ProjectileRegistry {
    pub fn new(owner: CombatantId) -> Self {
        Self {
            owner,
            projectiles: Vec::new(),
        }
    }

    pub fn owner(&self) -> CombatantId {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    /// Fire from the shooter's current frame; mid-turn frames cannot shoot
    pub fn fire(&mut self, shooter: &Combatant, config: &MatchConfig) -> Option<&Projectile> {
        let facing = shooter.aim()?;
        self.projectiles
            .push(Projectile::spawn(self.owner, shooter.position(), facing, config));
        self.projectiles.last()
    }

    /// Resolve collisions and advance every projectile by one tick
    ///
    /// Removal compacts the list in place, keeping firing order.
    pub(crate) fn update<R: Rng + ?Sized>(
        &mut self,
        field: &mut Field<'_, R>,
        events: &mut Vec<ArenaEvent>,
    ) {
        let shooter = self.owner;
        self.projectiles
            .retain_mut(|projectile| match strike(projectile, field) {
                None => {
                    projectile.advance();
                    true
                }
                Some(impact) => {
                    events.extend(impact_events(shooter, impact));
                    false
                }
            });
    }
}

/// First thing the projectile hits at its current position, applying the effect
///
/// A victim with no free spot to respawn in stays where it is; the hit still scores.
fn strike<R: Rng + ?Sized>(projectile: &Projectile, field: &mut Field<'_, R>) -> Option<Impact> {
    let hitbox = projectile.aabb();
    let touches = |other: Aabb| other.overlaps(&hitbox);

    if let Some(obstacle) = field.terrain.obstacles.iter().position(|o| touches(o.aabb())) {
        return Some(Impact::Sandbag { obstacle });
    }

    if let Some(destructible) = field
        .terrain
        .destructibles
        .iter()
        .position(|d| d.is_solid() && touches(d.aabb()))
    {
        field.terrain.destructibles[destructible].destroy();
        return Some(Impact::Barrel { destructible });
    }

    if let Some(target) = field
        .combatants
        .iter()
        .find(|c| c.id() != projectile.owner && touches(c.aabb()))
        .map(Combatant::id)
    {
        let position = respawn(
            field.combatants,
            target,
            field.terrain,
            field.arena,
            field.placement_attempts,
            field.rng,
        )
        .inspect_err(|err| log::warn!("{} left in place: {}", target, err))
        .ok();
        if let Some(shooter) = field.combatants.get_mut(projectile.owner.index()) {
            shooter.add_point();
        }
        return Some(Impact::Soldier {
            target,
            respawn: position,
        });
    }

    if projectile.out_of_bounds(field.arena) {
        return Some(Impact::OutOfBounds);
    }
    None
}

fn impact_events(shooter: CombatantId, impact: Impact) -> Vec<ArenaEvent> {
    match impact {
        Impact::Sandbag { obstacle } => vec![ArenaEvent::Absorbed { shooter, obstacle }],
        Impact::Barrel { destructible } => {
            log::debug!("{} destroyed barrel {}", shooter, destructible);
            vec![ArenaEvent::BarrelDestroyed {
                shooter,
                destructible,
            }]
        }
        Impact::Soldier { target, respawn } => {
            log::debug!("{} hit {}", shooter, target);
            let mut events = vec![ArenaEvent::Hit { shooter, target }];
            events.extend(respawn.map(|position| ArenaEvent::Respawned {
                id: target,
                position,
            }));
            events
        }
        Impact::OutOfBounds => vec![ArenaEvent::Expired { shooter }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{DestructibleObstacle, Obstacle};
    use crate::sim::locomotion::LocomotionState;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn config() -> MatchConfig {
        MatchConfig::default()
    }

    fn soldier(id: usize, x: f32, y: f32) -> Combatant {
        Combatant::new(
            CombatantId(id),
            Vec2::new(x, y),
            [UVec2::splat(40); LocomotionState::COUNT],
        )
    }

    fn shot(owner: usize, x: f32, y: f32, facing: Facing) -> Projectile {
        let config = config();
        Projectile {
            owner: CombatantId(owner),
            facing,
            position: Vec2::new(x, y),
            extent: config.projectile_extent(facing),
            velocity: facing.unit() * config.speed,
        }
    }

    struct World {
        terrain: Terrain,
        combatants: Vec<Combatant>,
        rng: Pcg32,
        placement_attempts: u32,
    }

    impl World {
        fn new(terrain: Terrain) -> Self {
            Self {
                terrain,
                combatants: vec![soldier(0, 20.0, 600.0), soldier(1, 900.0, 600.0)],
                rng: Pcg32::seed_from_u64(5),
                placement_attempts: 10_000,
            }
        }

        fn update(&mut self, registry: &mut ProjectileRegistry) -> Vec<ArenaEvent> {
            let mut events = Vec::new();
            let mut field = Field {
                terrain: &mut self.terrain,
                combatants: &mut self.combatants,
                arena: UVec2::new(1024, 746),
                placement_attempts: self.placement_attempts,
                rng: &mut self.rng,
            };
            registry.update(&mut field, &mut events);
            events
        }
    }

    #[test]
    fn test_spawn_uses_muzzle_offset_and_speed() {
        let config = config();
        let p = Projectile::spawn(CombatantId(0), Vec2::new(50.0, 50.0), Facing::Right, &config);
        assert_eq!(p.position(), Vec2::new(105.0, 95.0));
        assert_eq!(p.velocity(), Vec2::new(18.0, 0.0));
        assert_eq!(p.extent(), UVec2::new(30, 10));

        let p = Projectile::spawn(CombatantId(0), Vec2::new(50.0, 50.0), Facing::Up, &config);
        assert_eq!(p.position(), Vec2::new(80.0, 25.0));
        assert_eq!(p.velocity(), Vec2::new(0.0, -18.0));
    }

    #[test]
    fn test_mid_turn_cannot_fire() {
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        let mut shooter = soldier(0, 100.0, 100.0);
        shooter.walk(Facing::Right, 18.0, UVec2::new(1024, 746), |_| false);
        assert_eq!(shooter.locomotion(), LocomotionState::TurnUpRight);
        assert!(registry.fire(&shooter, &config()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_free_projectile_advances() {
        let mut world = World::new(Terrain::default());
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        registry.projectiles.push(shot(0, 300.0, 300.0, Facing::Down));

        let events = world.update(&mut registry);
        assert!(events.is_empty());
        assert_eq!(registry.iter().next().unwrap().position(), Vec2::new(300.0, 318.0));
    }

    #[test]
    fn test_out_of_bounds_removed() {
        let mut world = World::new(Terrain::default());
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        registry.projectiles.push(shot(0, 1025.0, 300.0, Facing::Right));
        registry.projectiles.push(shot(0, -31.0, 300.0, Facing::Left));
        registry.projectiles.push(shot(0, 300.0, -31.0, Facing::Up));
        registry.projectiles.push(shot(0, 300.0, 747.0, Facing::Down));
        // On the boundary: still alive
        registry.projectiles.push(shot(0, 1024.0, 300.0, Facing::Right));

        let events = world.update(&mut registry);
        assert_eq!(events.len(), 4);
        assert!(
            events
                .iter()
                .all(|e| matches!(e, ArenaEvent::Expired { .. }))
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.iter().next().unwrap().position().x, 1042.0);

        world.update(&mut registry);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_barrel_and_projectile_vanish_together() {
        let terrain = Terrain::new(
            Vec::new(),
            vec![DestructibleObstacle::new(
                Vec2::new(300.0, 300.0),
                UVec2::new(40, 50),
            )],
        );
        let mut world = World::new(terrain);
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        registry.projectiles.push(shot(0, 290.0, 310.0, Facing::Right));
        registry.projectiles.push(shot(0, 250.0, 310.0, Facing::Right));

        let events = world.update(&mut registry);
        assert_eq!(
            events,
            vec![ArenaEvent::BarrelDestroyed {
                shooter: CombatantId(0),
                destructible: 0
            }]
        );
        assert!(!world.terrain.destructibles()[0].is_visible());
        assert_eq!(registry.len(), 1);

        // The second shot flies through where the barrel was
        for _ in 0..3 {
            let events = world.update(&mut registry);
            assert!(events.is_empty());
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sandbag_absorbs_before_barrel() {
        let terrain = Terrain::new(
            vec![Obstacle::new(Vec2::new(300.0, 300.0), UVec2::new(80, 40))],
            vec![DestructibleObstacle::new(
                Vec2::new(310.0, 300.0),
                UVec2::new(40, 50),
            )],
        );
        let mut world = World::new(terrain);
        let mut registry = ProjectileRegistry::new(CombatantId(1));
        registry.projectiles.push(shot(1, 320.0, 310.0, Facing::Left));

        let events = world.update(&mut registry);
        assert_eq!(
            events,
            vec![ArenaEvent::Absorbed {
                shooter: CombatantId(1),
                obstacle: 0
            }]
        );
        assert!(world.terrain.destructibles()[0].is_visible());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_hit_scores_and_respawns_target() {
        let terrain = Terrain::new(
            vec![Obstacle::new(Vec2::new(500.0, 100.0), UVec2::new(80, 40))],
            Vec::new(),
        );
        let mut world = World::new(terrain);
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        registry.projectiles.push(shot(0, 890.0, 610.0, Facing::Right));

        let events = world.update(&mut registry);
        assert!(registry.is_empty());
        assert_eq!(
            events[0],
            ArenaEvent::Hit {
                shooter: CombatantId(0),
                target: CombatantId(1)
            }
        );
        let ArenaEvent::Respawned { id, position } = events[1] else {
            panic!("expected respawn, got {:?}", events[1]);
        };
        assert_eq!(id, CombatantId(1));

        assert_eq!(world.combatants[0].score(), 1);
        assert_eq!(world.combatants[1].score(), 0);
        let victim = world.combatants[1].aabb();
        assert_eq!(victim.position, position);
        assert!(!world.terrain.blocks(&victim));
        assert!(!world.combatants[0].aabb().overlaps(&victim));
    }

    #[test]
    fn test_barrel_shields_soldier_behind_it() {
        let terrain = Terrain::new(
            Vec::new(),
            vec![DestructibleObstacle::new(Vec2::new(880.0, 600.0), UVec2::new(35, 50))],
        );
        let mut world = World::new(terrain);
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        // Touches both the barrel and soldier 1 at (900, 600)
        registry.projectiles.push(shot(0, 890.0, 610.0, Facing::Right));

        let events = world.update(&mut registry);
        assert_eq!(
            events,
            vec![ArenaEvent::BarrelDestroyed {
                shooter: CombatantId(0),
                destructible: 0
            }]
        );
        assert!(!world.terrain.destructibles()[0].is_visible());
        assert_eq!(world.combatants[0].score(), 0);
        assert_eq!(world.combatants[1].position(), Vec2::new(900.0, 600.0));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_hit_counts_past_the_edge() {
        let mut world = World::new(Terrain::default());
        world.combatants[1].set_position(Vec2::new(1000.0, 600.0));
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        let projectile = shot(0, 1030.0, 610.0, Facing::Right);
        assert!(projectile.out_of_bounds(UVec2::new(1024, 746)));
        registry.projectiles.push(projectile);

        let events = world.update(&mut registry);
        assert_eq!(
            events[0],
            ArenaEvent::Hit {
                shooter: CombatantId(0),
                target: CombatantId(1)
            }
        );
        assert!(!events.contains(&ArenaEvent::Expired {
            shooter: CombatantId(0)
        }));
        assert_eq!(world.combatants[0].score(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_hit_without_room_to_respawn_leaves_target() {
        let mut world = World::new(Terrain::default());
        world.placement_attempts = 0;
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        registry.projectiles.push(shot(0, 890.0, 610.0, Facing::Right));

        let events = world.update(&mut registry);
        assert_eq!(
            events,
            vec![ArenaEvent::Hit {
                shooter: CombatantId(0),
                target: CombatantId(1)
            }]
        );
        assert_eq!(world.combatants[0].score(), 1);
        assert_eq!(world.combatants[1].position(), Vec2::new(900.0, 600.0));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_own_shots_pass_through_shooter() {
        let mut world = World::new(Terrain::default());
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        registry.projectiles.push(shot(0, 30.0, 610.0, Facing::Right));

        let events = world.update(&mut registry);
        assert!(events.is_empty());
        assert_eq!(world.combatants[0].score(), 0);
        assert_eq!(world.combatants[0].position(), Vec2::new(20.0, 600.0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_removal_keeps_firing_order() {
        let terrain = Terrain::new(
            vec![Obstacle::new(Vec2::new(400.0, 0.0), UVec2::new(80, 40))],
            Vec::new(),
        );
        let mut world = World::new(terrain);
        let mut registry = ProjectileRegistry::new(CombatantId(0));
        for x in [100.0, 410.0, 200.0, 420.0, 300.0] {
            registry.projectiles.push(shot(0, x, 10.0, Facing::Down));
        }

        world.update(&mut registry);
        let xs: Vec<f32> = registry.iter().map(|p| p.position().x).collect();
        assert_eq!(xs, vec![100.0, 200.0, 300.0]);
    }
}
