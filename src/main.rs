//! Tower Climb entry point
//!
//! The browser build starts from the library's wasm entry; natively this
//! runs a headless autopilot climb and logs how far it got.
//!
//! Usage: `tower-climb [seed] [ball]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tower_climb::consts::TICKS_PER_SECOND;
    use tower_climb::sim::{BallKind, ControlFlags, Snapshot, World, tick};
    use tower_climb::{Progress, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Bad seed ({}), using 1", e);
            1
        }
        None => 1,
    };
    let kind = match args.next().map(|s| s.parse::<BallKind>()) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => {
            log::warn!("{}, falling back to standard", e);
            BallKind::Standard
        }
        None => BallKind::Standard,
    };

    let settings = Settings::load();
    let mut progress = Progress::load();
    let flags = ControlFlags {
        auto_jump: true,
        ..settings.control_flags()
    };
    let mut world = World::new(seed, kind, progress.config_for(kind), flags, progress.best_score);

    // Five simulated minutes at most
    let max_ticks = 5 * 60 * TICKS_PER_SECOND as u64;
    while !world.is_game_over() && world.time_ticks < max_ticks {
        let input = autopilot::steer(&world);
        tick(&mut world, &input);
        progress.apply_events(&world.drain_events());
    }

    let snapshot = Snapshot::capture(&world);
    log::info!(
        "{} ball reached floor {} with {} coins in {:.1}s (game over: {})",
        kind.display_name(),
        snapshot.score,
        snapshot.coins_collected,
        world.time_ticks as f32 / TICKS_PER_SECOND as f32,
        snapshot.game_over
    );
    match snapshot.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize snapshot: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use tower_climb::sim::{TickInput, World};

    /// Steer toward the middle of the next floor up
    pub fn steer(world: &World) -> TickInput {
        let ball = &world.ball;
        let target = world
            .floors
            .iter()
            .filter(|f| f.is_solid() && f.y < ball.bottom() - 1.0)
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .map(|f| f.x + f.width / 2.0);

        let mut input = TickInput::default();
        if let Some(target_x) = target {
            let dx = target_x - ball.pos.x;
            input.move_right = dx > 4.0;
            input.move_left = dx < -4.0;
        }
        input
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start in the library, this is just to satisfy the compiler
}
