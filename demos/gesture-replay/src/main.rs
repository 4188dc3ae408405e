//! Gesture replay demo
//!
//! Runs a scripted operator session (select arm mode, start tracking, sweep
//! the hand, grip, stop) through the full pipeline with a dry-run driver
//! behind the async worker.
//!
//! Usage: gesture-replay [config.json] [--json-logs]

use std::error::Error;
use std::fs;

use gestarm_control::DryRunDriver;
use gestarm_core::{GestarmConfig, GestureSymbol, Vec3};
use gestarm_runtime::{init_tracing, AsyncDriver, LogFormat, LoggingConfig, Session, DEFAULT_QUEUE_CAPACITY};
use gestarm_test::GestureScript;
use tracing::info;

const FPS: u32 = 30;

fn demo_script() -> GestureScript {
    GestureScript::new()
        .at_arm(Vec3::new(200.0, 0.0, 50.0))
        .no_hand(15)
        .hold(GestureSymbol::SelectArmMode, 10)
        .hold(GestureSymbol::ToggleTracking, 10)
        .sweep(GestureSymbol::None, (0.35, 0.45), 45)
        .hold(GestureSymbol::CloseGripper, 30)
        .sweep(GestureSymbol::CloseGripper, (0.6, 0.45), 45)
        .hold(GestureSymbol::OpenGripper, 10)
        .hold(GestureSymbol::ToggleTracking, 10)
        .no_hand(15)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => GestarmConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => GestarmConfig::default(),
    };

    let logging = LoggingConfig {
        format: if args.iter().any(|a| a == "--json-logs") {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        ..LoggingConfig::default()
    };
    init_tracing(&logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let driver = AsyncDriver::spawn_on(runtime.handle(), DryRunDriver::new(), DEFAULT_QUEUE_CAPACITY);

    let mut session = Session::replay(&config, demo_script().into_source(), driver, FPS)?;
    let stats = session.run_with(|report| {
        if let Some(gesture) = report.gesture.filter(|g| !g.is_none()) {
            info!(gesture = gesture.name(), mode = ?report.mode, tracking = ?report.tracking, "gesture");
        }
    })?;

    let worker = runtime.block_on(session.into_driver().shutdown());
    info!(
        frames = stats.frames,
        commands = stats.commands_sent,
        delivered = worker.delivered,
        superseded = worker.superseded,
        "replay finished"
    );
    Ok(())
}
