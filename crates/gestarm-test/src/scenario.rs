//! Scenario runner and end-to-end tests
//!
//! A scenario replays a gesture script through a full session (fixed-rate
//! clock, real coordinator, recording driver) and keeps every frame report.

use gestarm_control::{FrameReport, LandmarkSource};
use gestarm_core::{Command, GestarmConfig};
use gestarm_runtime::{Session, SessionResult, SessionStats};

use crate::{DriverLog, GestureScript, RecordingDriver};

/// Everything observed while a scenario ran
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub reports: Vec<FrameReport>,
    pub stats: SessionStats,
    pub driver: DriverLog,
}

impl ScenarioOutcome {
    /// Commands produced by frames, excluding startup and shutdown
    pub fn frame_commands(&self) -> Vec<Command> {
        self.reports
            .iter()
            .flat_map(|r| r.commands.iter().copied())
            .collect()
    }

    pub fn motion_commands(&self) -> Vec<Command> {
        self.frame_commands()
            .into_iter()
            .filter(Command::is_motion)
            .collect()
    }

    pub fn last_report(&self) -> Option<&FrameReport> {
        self.reports.last()
    }
}

/// Session harness
#[derive(Debug, Clone)]
pub struct Scenario {
    config: GestarmConfig,
    fps: u32,
}

impl Scenario {
    pub fn new(config: GestarmConfig) -> Self {
        Self { config, fps: 30 }
    }

    /// Classify on every frame instead of every tenth
    pub fn every_frame() -> Self {
        let mut config = GestarmConfig::default();
        config.control.gesture_interval = 1;
        Self::new(config)
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn config(&self) -> &GestarmConfig {
        &self.config
    }

    pub fn run(&self, script: GestureScript) -> SessionResult<ScenarioOutcome> {
        self.run_source(script.into_source())
    }

    pub fn run_source<S: LandmarkSource>(&self, source: S) -> SessionResult<ScenarioOutcome> {
        let driver = RecordingDriver::new();
        let log = driver.log();
        let mut session = Session::replay(&self.config, source, driver, self.fps)?;

        let mut reports = Vec::new();
        let stats = session.run_with(|r| reports.push(r.clone()))?;

        Ok(ScenarioOutcome {
            reports,
            stats,
            driver: log,
        })
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new(GestarmConfig::default())
    }
}
