//! Tank Duel headless driver
//!
//! Runs a seeded bot match on a stage and prints each tank's final snapshot.
//!
//! Usage: `tank-duel [stage.json] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use std::{error::Error, fs, path::Path};

#[cfg(not(target_arch = "wasm32"))]
use tank_duel::{
    Settings,
    sim::{
        Control, GameEvent, GameState, MapTile, MoveInput, Spawn, Stage, TankColor, TankInput,
        TickInput, tick,
    },
    sync,
};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tank Duel (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser client embeds the library directly
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn Error>> {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match args.get(1) {
        Some(path) => Settings::load(Path::new(path)),
        None => Settings::default(),
    };
    let stage = match args.first() {
        Some(path) => Stage::from_json(&fs::read_to_string(path)?)?,
        None => demo_stage(&settings)?,
    };

    // Both players are bots here, so nothing is remote
    let mut state = GameState::from_stage(&stage, &settings, Control::Local)?;
    let mut rng = Pcg32::seed_from_u64(settings.seed);

    for _ in 0..settings.ticks {
        let tanks: Vec<TankInput> = state
            .tanks
            .iter()
            .filter(|t| t.alive)
            .map(|t| {
                // Aim at the nearest other living tank
                let target = state
                    .tanks
                    .iter()
                    .filter(|o| o.alive && o.id != t.id)
                    .map(|o| o.pos.pos)
                    .min_by(|a, b| {
                        a.distance_squared(t.pos.pos)
                            .total_cmp(&b.distance_squared(t.pos.pos))
                    });
                TankInput {
                    id: t.id,
                    movement: MoveInput {
                        up: rng.random_bool(0.3),
                        down: rng.random_bool(0.3),
                        left: rng.random_bool(0.3),
                        right: rng.random_bool(0.3),
                    },
                    aim: target,
                    fire: target.is_some() && rng.random_range(0..40) == 0,
                }
            })
            .collect();

        for event in tick(&mut state, &TickInput { pause: false, tanks }) {
            match event {
                GameEvent::TankKilled { killed, killer } => {
                    log::info!("tick {}: tank {} killed tank {}", state.time_ticks, killer, killed)
                }
                other => log::debug!("tick {}: {:?}", state.time_ticks, other),
            }
        }

        if state.alive_count() <= 1 {
            log::info!("Match over after {} ticks", state.time_ticks);
            break;
        }
    }

    for (id, kills) in &state.kills {
        log::info!("tank {id}: {kills} kills");
    }
    for tank in &state.tanks {
        for msg in sync::outgoing(tank) {
            println!("{}", msg.to_json()?);
        }
    }
    Ok(())
}

/// Two players facing each other across a walled center, plus two enemies
#[cfg(not(target_arch = "wasm32"))]
fn demo_stage(settings: &Settings) -> Result<Stage, Box<dyn Error>> {
    let (rows, cols) = (settings.grid_rows, settings.grid_cols);
    let mut stage = Stage::new(rows, cols);
    let (mid_i, mid_j) = (rows / 2, cols / 2);

    for i in mid_i.saturating_sub(3)..(mid_i + 3).min(rows) {
        stage.set_tile(MapTile::Wall, i, mid_j)?;
    }
    stage.set_tile(MapTile::BreakableWall, mid_i, mid_j.saturating_sub(4))?;
    stage.set_tile(MapTile::BreakableWall, mid_i, (mid_j + 4).min(cols - 1))?;
    stage.set_tile(MapTile::Hole, 2, mid_j)?;
    stage.set_tile(MapTile::Hole, rows - 3, mid_j)?;

    stage.set_spawn(Spawn::Player1, mid_i, 2)?;
    stage.set_spawn(Spawn::Player2, mid_i, cols - 3)?;
    stage.set_spawn(Spawn::Enemy(TankColor::Brown), 1, 2)?;
    stage.set_spawn(Spawn::Enemy(TankColor::Teal), rows - 2, cols - 3)?;
    Ok(stage)
}
