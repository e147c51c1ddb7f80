//! Discrete simulation tick
//!
//! Order within a tick:
//! 1. every registry resolves and advances its projectiles (scoring, barrel
//!    hits and respawns happen here)
//! 2. fire intents spawn new projectiles
//! 3. movement intents run the locomotion state machine
//!
//! A soldier respawned in step 1 walks from its new position in step 3.
//! A soldier that cannot be respawned is left in place and the hit still counts.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::combatant::{CombatantId, Walk};
use super::entity::Body;
use super::locomotion::Facing;
use super::projectile::Field;
use super::state::{Arena, ArenaError, ArenaEvent};

/// Input for one combatant for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Direction held, if any
    pub movement: Option<Facing>,
    /// Fire pressed this tick
    pub fire: bool,
}

impl Intent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn walk(facing: Facing) -> Self {
        Self {
            movement: Some(facing),
            fire: false,
        }
    }

    pub fn fire() -> Self {
        Self {
            movement: None,
            fire: true,
        }
    }
}

/// What a tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<ArenaEvent>,
    /// Movement outcome per combatant, `None` when no direction was held
    pub walks: Vec<Option<Walk>>,
    pub winner: Option<CombatantId>,
}

impl<R: Rng> Arena<R> {
    /// Advance the match by one tick
    ///
    /// `intents` is indexed by combatant id. Refused without any state change
    /// once a winner exists or when the intent count is wrong; past those
    /// checks the tick always runs to completion. A hit soldier with no free
    /// spot to respawn in stays where it was.
    pub fn tick(&mut self, intents: &[Intent]) -> Result<TickReport, ArenaError> {
        if let Some(winner) = self.winner() {
            return Err(ArenaError::MatchOver { winner });
        }
        if intents.len() != self.combatants.len() {
            return Err(ArenaError::IntentCount {
                expected: self.combatants.len(),
                actual: intents.len(),
            });
        }

        self.time_ticks += 1;
        let mut events = Vec::new();

        let mut field = Field {
            terrain: &mut self.terrain,
            combatants: &mut self.combatants,
            arena: self.config.arena_size(),
            placement_attempts: self.config.placement_attempts,
            rng: &mut self.rng,
        };
        for registry in &mut self.registries {
            registry.update(&mut field, &mut events);
        }

        for (combatant, intent) in self.combatants.iter().zip(intents) {
            if !intent.fire {
                continue;
            }
            let registry = &mut self.registries[combatant.id().index()];
            if let Some(projectile) = registry.fire(combatant, &self.config) {
                events.push(ArenaEvent::Fired {
                    shooter: combatant.id(),
                    facing: projectile.facing(),
                });
            }
        }

        let walks = intents
            .iter()
            .enumerate()
            .map(|(i, intent)| intent.movement.map(|facing| self.walk(CombatantId(i), facing)))
            .collect();

        let winner = self.winner();
        if let Some(winner) = winner {
            log::info!("{} wins {:?}", winner, self.scoreboard());
            events.push(ArenaEvent::Won { winner });
        }

        Ok(TickReport {
            tick: self.time_ticks,
            events,
            walks,
            winner,
        })
    }

    /// One locomotion step for a combatant against the current field
    fn walk(&mut self, id: CombatantId, facing: Facing) -> Walk {
        let others: Vec<Aabb> = self
            .combatants
            .iter()
            .filter(|c| c.id() != id)
            .map(Body::aabb)
            .collect();
        let terrain = &self.terrain;
        let arena = self.config.arena_size();
        let speed = self.config.speed;

        self.combatants[id.index()].walk(facing, speed, arena, |candidate| {
            terrain.blocks(candidate) || others.iter().any(|other| other.overlaps(candidate))
        })
    }
}
