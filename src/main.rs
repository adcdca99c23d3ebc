//! Headless simulation harness
//!
//! Runs the attract-mode autopilot for a fixed number of ticks and prints
//! the final state as JSON. Useful for eyeballing balance changes and for
//! checking that two runs with the same seed stay identical.
//!
//! Usage: nova-swarm [seed] [ticks]

use nova_swarm::sim::{GamePhase, GameState, TickInput, tick};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 0,
    };
    let ticks: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 3600,
    };

    let mut state = GameState::new(seed);
    let input = TickInput {
        idle_mode: true,
        ..TickInput::default()
    };
    for _ in 0..ticks {
        tick(&mut state, &input);
        if state.phase == GamePhase::GameOver {
            log::info!("run over at tick {}", state.time_ticks);
            break;
        }
    }

    log::info!(
        "seed {}: wave {}, score {}, {} kills over {} ticks",
        seed,
        state.wave_index,
        state.player.score,
        state.player.kills,
        state.time_ticks
    );
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
