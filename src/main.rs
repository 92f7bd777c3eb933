//! Fish Head demo entry point
//!
//! Runs a headless banquet driven by the autopilot and prints the final
//! snapshot as JSON. Usage: `fish-head [settings.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

/// Default demo length
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: f32 = 120.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    use std::path::Path;

    use fish_head::Settings;
    use fish_head::consts::REFERENCE_FRAME_MS;
    use fish_head::sim::{Autopilot, Intent, Session};

    env_logger::init();
    log::info!("Fish Head (native demo) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::from_file(Path::new(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    let seconds = match args.next().map(|s| s.parse::<f32>()) {
        Some(Ok(seconds)) if seconds > 0.0 => seconds,
        Some(_) => {
            log::error!("Demo length must be a positive number of seconds");
            return ExitCode::FAILURE;
        }
        None => DEMO_SECONDS,
    };

    let mut session = Session::new(settings);
    session.handle(Intent::StartSession);
    log::info!("Seed {}", session.state().seed);

    let mut pilot = Autopilot::new();
    let frames = (seconds * 1000.0 / REFERENCE_FRAME_MS) as u64;
    let mut events = 0usize;
    for _ in 0..frames {
        for intent in pilot.plan(session.state()) {
            events += session.handle(intent).len();
        }
        let frame = session.frame(REFERENCE_FRAME_MS);
        events += frame.report.events.len();
        if !session.is_running() {
            break;
        }
    }

    let state = session.state();
    log::info!(
        "Finished after {} frames ({:.1}s): score {}, respect {:.1}, {} events",
        state.frames,
        state.clock_ms / 1000.0,
        state.score,
        state.respect,
        events
    );

    match session.snapshot().to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Could not serialize snapshot: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts on the web drive `Session` directly, this is just to satisfy the compiler
}
