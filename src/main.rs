//! Trench Duel headless entry point
//!
//! Plays a bot-versus-bot match on the simulation core and prints the final
//! arena as JSON. Usage: `trench-duel [config.json | preset] [seed]`

fn main() {
    env_logger::init();
    log::info!("Trench Duel (headless) starting...");

    if let Err(e) = demo::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

mod demo {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use trench_duel::sim::{Arena, Body, Combatant, Facing, Intent};
    use trench_duel::{MatchConfig, MatchPreset};

    /// Give up on a match that nobody wins
    const MAX_TICKS: u64 = 50_000;
    /// How often the scoreboard is logged
    const REPORT_EVERY: u64 = 1_000;

    pub fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
        let config = match args.first() {
            Some(arg) => match MatchPreset::from_str(arg) {
                Some(preset) => MatchConfig::from_preset(preset),
                None => MatchConfig::from_json(&std::fs::read_to_string(arg)?)?,
            },
            None => MatchConfig::default(),
        };
        let seed = match args.get(1) {
            Some(seed) => seed.parse()?,
            None => config.seed,
        };

        let mut arena = Arena::from_seed(config, seed)?;
        let mut bots = Pcg32::seed_from_u64(seed.wrapping_add(1));

        while arena.winner().is_none() && arena.time_ticks() < MAX_TICKS {
            let intents: Vec<Intent> = arena
                .combatants()
                .iter()
                .map(|me| bot_intent(me, arena.combatants(), &mut bots))
                .collect();
            let report = arena.tick(&intents)?;

            if report.tick % REPORT_EVERY == 0 {
                log::info!("Tick {}: scores {:?}", report.tick, arena.scoreboard());
            }
        }

        match arena.winner() {
            Some(winner) => log::info!(
                "{} wins after {} ticks, scores {:?}",
                winner,
                arena.time_ticks(),
                arena.scoreboard()
            ),
            None => log::warn!("No winner after {} ticks", MAX_TICKS),
        }

        println!("{}", serde_json::to_string_pretty(&arena.snapshot())?);
        Ok(())
    }

    /// Line up with the nearest opponent on one axis, turn toward it and shoot
    fn bot_intent<R: Rng>(me: &Combatant, everyone: &[Combatant], rng: &mut R) -> Intent {
        // Wander now and then so bots do not wedge against terrain
        if rng.random_bool(0.15) {
            let facing = Facing::ALL[rng.random_range(0..Facing::ALL.len())];
            return Intent::walk(facing);
        }

        let Some(target) = everyone
            .iter()
            .filter(|c| c.id() != me.id())
            .min_by(|a, b| {
                let da = a.position().distance_squared(me.position());
                let db = b.position().distance_squared(me.position());
                da.total_cmp(&db)
            })
        else {
            return Intent::idle();
        };

        let delta = target.position() - me.position();
        let tolerance = me.extent().y.min(target.extent().y) as f32 / 2.0;
        let wanted = if delta.y.abs() <= tolerance {
            if delta.x >= 0.0 { Facing::Right } else { Facing::Left }
        } else if delta.y > 0.0 {
            Facing::Down
        } else {
            Facing::Up
        };

        if delta.y.abs() <= tolerance && me.aim() == Some(wanted) {
            return Intent {
                movement: None,
                fire: rng.random_bool(0.25),
            };
        }
        Intent::walk(wanted)
    }
}
