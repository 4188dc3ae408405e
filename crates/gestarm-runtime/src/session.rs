//! Frame-synchronous session loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gestarm_control::{ArmDriver, CommandDispatcher, FrameReport, LandmarkSource, ModeCoordinator};
use gestarm_core::GestarmConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{FixedRateClock, FrameClock, LoggingConfig, SessionClock, SessionError, SessionResult};

/// Runtime settings outside the pipeline itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub logging: LoggingConfig,
    /// Discrete command queue depth for `AsyncDriver`
    pub command_queue: usize,
    /// Stop after this many frames; `None` runs until the source ends
    pub max_frames: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            command_queue: crate::DEFAULT_QUEUE_CAPACITY,
            max_frames: None,
        }
    }
}

/// Session counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub frames_without_hand: u64,
    pub commands_sent: u64,
    pub command_failures: u64,
}

/// Cloneable flag that ends `Session::run` after the current frame
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One operator session: source → coordinator → driver
pub struct Session<S, D, C = SessionClock> {
    coordinator: ModeCoordinator,
    dispatcher: CommandDispatcher,
    source: S,
    driver: D,
    clock: C,
    stop: StopHandle,
    max_frames: Option<u64>,
    stats: SessionStats,
}

impl<S: LandmarkSource, D: ArmDriver> Session<S, D, SessionClock> {
    /// Live session on the monotonic clock. The configuration is validated.
    pub fn new(config: &GestarmConfig, source: S, driver: D) -> SessionResult<Self> {
        Self::with_clock(config, source, driver, SessionClock::new())
    }
}

impl<S: LandmarkSource, D: ArmDriver> Session<S, D, FixedRateClock> {
    /// Replay session with frames spaced at `fps`
    pub fn replay(config: &GestarmConfig, source: S, driver: D, fps: u32) -> SessionResult<Self> {
        Self::with_clock(config, source, driver, FixedRateClock::from_fps(fps))
    }
}

impl<S: LandmarkSource, D: ArmDriver, C: FrameClock> Session<S, D, C> {
    pub fn with_clock(config: &GestarmConfig, source: S, driver: D, clock: C) -> SessionResult<Self> {
        Ok(Self {
            coordinator: ModeCoordinator::new(config)?,
            dispatcher: CommandDispatcher::new(&config.rail),
            source,
            driver,
            clock,
            stop: StopHandle::default(),
            max_frames: None,
            stats: SessionStats::default(),
        })
    }

    pub fn with_runtime_config(mut self, runtime: &RuntimeConfig) -> Self {
        self.max_frames = runtime.max_frames;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn coordinator(&self) -> &ModeCoordinator {
        &self.coordinator
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Connect the driver and send the startup sequence
    pub fn start(&mut self) -> SessionResult<()> {
        self.driver.connect().map_err(SessionError::Connect)?;
        let startup = self.coordinator.startup_commands();
        self.send(&startup);
        info!(mode = ?self.coordinator.mode(), "session started");
        Ok(())
    }

    /// Process exactly one frame
    pub fn step(&mut self) -> FrameReport {
        let frame = self.source.next_frame();
        let now = self.clock.now();

        self.stats.frames += 1;
        if frame.is_none() {
            self.stats.frames_without_hand += 1;
        }

        let report = self.coordinator.process_frame(frame.as_ref(), now);
        self.send(&report.commands);
        report
    }

    /// Send the shutdown sequence and disconnect
    pub fn finish(&mut self) {
        let shutdown = self.coordinator.shutdown_commands();
        self.send(&shutdown);
        if let Err(e) = self.driver.disconnect() {
            warn!(error = %e, "driver disconnect failed");
        }
        info!(frames = self.stats.frames, "session finished");
    }

    /// Run until the source is exhausted or the stop flag is raised
    pub fn run(&mut self) -> SessionResult<SessionStats> {
        self.run_with(|_| {})
    }

    /// Like `run`, handing each frame's report to `on_frame` (display hooks)
    pub fn run_with<F: FnMut(&FrameReport)>(&mut self, mut on_frame: F) -> SessionResult<SessionStats> {
        self.start()?;

        while !self.should_stop() {
            let report = self.step();
            on_frame(&report);
        }

        self.finish();
        Ok(self.stats.clone())
    }

    fn should_stop(&self) -> bool {
        self.stop.is_stopped()
            || self.source.is_exhausted()
            || self.max_frames.map_or(false, |max| self.stats.frames >= max)
    }

    fn send(&mut self, commands: &[gestarm_core::Command]) {
        let summary = self.dispatcher.dispatch_all(&mut self.driver, commands);
        self.stats.commands_sent += summary.sent as u64;
        self.stats.command_failures += summary.failed as u64;
    }
}
