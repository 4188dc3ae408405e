//! Mode coordinator - per-frame gesture and motion state machine

use std::time::Duration;

use gestarm_core::{
    Command, ConfigResult, ControlMode, GestarmConfig, GestureSymbol, LandmarkFrame, Timestamp,
    TrackingIndicator, TrackingState, Vec3,
};
use gestarm_gesture::GestureClassifier;
use gestarm_motion::{HandPosition, MotionPredictor, PalmAverager, PositionSample, WorkspaceMapper};
use gestarm_reach::{Reachability, ReachabilityValidator, Rejection};
use tracing::{debug, info, warn};

use crate::Cooldown;

/// Everything the coordinator decided for one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    /// Commands to dispatch, in order
    pub commands: Vec<Command>,
    pub indicator: TrackingIndicator,
    /// Gesture classified on this frame; `None` on non-tick frames
    pub gesture: Option<GestureSymbol>,
    pub tracking: TrackingState,
    pub mode: ControlMode,
    /// Why the motion target was refused, if it was
    pub rejection: Option<Rejection>,
}

/// Outcome of one tracking step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackOutcome {
    pub command: Option<Command>,
    pub indicator: TrackingIndicator,
    pub rejection: Option<Rejection>,
}

impl TrackOutcome {
    const IDLE: TrackOutcome = TrackOutcome {
        command: None,
        indicator: TrackingIndicator::NotTracking,
        rejection: None,
    };
}

/// Coordinator counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorStats {
    pub frames: u64,
    pub invalid_frames: u64,
    pub ticks: u64,
    pub toggles: u64,
    /// Non-`None` gestures dropped during a cooldown
    pub suppressed_gestures: u64,
    pub motion_commands: u64,
    pub rejected_targets: u64,
    pub degenerate_samples: u64,
}

/// Session state machine.
///
/// One coordinator per tracked hand. It owns the tracking flag, control
/// mode, previous tick symbol, cooldown deadline and motion history, and
/// performs no I/O: it turns frames into commands.
#[derive(Debug, Clone)]
pub struct ModeCoordinator {
    classifier: GestureClassifier,
    validator: ReachabilityValidator,
    mapper: WorkspaceMapper,
    predictor: MotionPredictor,
    averager: Option<PalmAverager>,
    horizon: Duration,
    interval: u64,
    home: Vec3,
    default_mode: ControlMode,
    state: TrackingState,
    mode: ControlMode,
    last_tick_symbol: GestureSymbol,
    cooldown: Cooldown,
    frame_count: u64,
    stats: CoordinatorStats,
}

impl ModeCoordinator {
    /// Coordinator for a validated configuration.
    ///
    /// An inconsistent configuration (empty depth range, zero sampling
    /// floor, ...) is refused here rather than failing on the first frame.
    pub fn new(config: &GestarmConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &GestarmConfig) -> Self {
        let averager = config
            .mapping
            .averaging
            .then(|| PalmAverager::new(config.mapping.averaging_jump));

        Self {
            classifier: GestureClassifier::new(&config.gesture),
            validator: ReachabilityValidator::new(config.arm.clone(), &config.rail),
            mapper: WorkspaceMapper::new(config.mapping.clone(), &config.rail),
            predictor: MotionPredictor::new(&config.predictor),
            averager,
            horizon: config.predictor.horizon,
            interval: u64::from(config.control.gesture_interval.max(1)),
            home: config.control.home_position,
            default_mode: config.control.default_mode,
            state: TrackingState::Idle,
            mode: config.control.default_mode,
            last_tick_symbol: GestureSymbol::None,
            cooldown: Cooldown::new(config.control.cooldown),
            frame_count: 0,
            stats: CoordinatorStats::default(),
        }
    }

    /// Replace the gesture classifier (custom pattern tables)
    pub fn with_classifier(mut self, classifier: GestureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn last_tick_symbol(&self) -> GestureSymbol {
        self.last_tick_symbol
    }

    pub fn stats(&self) -> &CoordinatorStats {
        &self.stats
    }

    pub fn has_motion_history(&self) -> bool {
        self.predictor.has_history()
    }

    pub fn cooldown_remaining(&self, now: Timestamp) -> Duration {
        self.cooldown.remaining(now)
    }

    /// Home the arm, set the rail to match the starting mode, open the gripper
    pub fn startup_commands(&self) -> Vec<Command> {
        vec![
            Command::move_to(self.home),
            Command::SetRailEnabled {
                enabled: self.default_mode == ControlMode::Rail,
            },
            Command::SetGripper { closed: false },
        ]
    }

    pub fn shutdown_commands(&self) -> Vec<Command> {
        vec![Command::SetGripper { closed: false }]
    }

    /// Run one frame. `frame` is `None` when no hand was detected.
    pub fn process_frame(&mut self, frame: Option<&LandmarkFrame>, now: Timestamp) -> FrameReport {
        self.frame_count += 1;
        self.stats.frames += 1;

        let mut report = FrameReport::default();

        if let Some(frame) = frame {
            if let Err(e) = frame.validate() {
                warn!(error = %e, "skipping invalid landmark frame");
                self.stats.invalid_frames += 1;
                return self.finish(report);
            }
        }

        if self.frame_count % self.interval == 0 {
            self.stats.ticks += 1;
            // A validated frame cannot fail classification
            let symbol = frame
                .and_then(|f| self.classifier.classify(f).ok())
                .unwrap_or(GestureSymbol::None);
            report.gesture = Some(symbol);
            report.commands.extend(self.apply_gesture(symbol, now));
        }

        if let Some(frame) = frame.filter(|_| self.state.is_tracking()) {
            match self.mapper.map(frame) {
                Ok(position) => {
                    let outcome = self.track_position(position, now);
                    report.commands.extend(outcome.command);
                    report.indicator = outcome.indicator;
                    report.rejection = outcome.rejection;
                }
                Err(e) => warn!(error = %e, "failed to map landmark frame"),
            }
        }

        self.finish(report)
    }

    /// Apply one classification tick's symbol.
    ///
    /// The symbol is always recorded for edge detection, even while the
    /// cooldown suppresses its effect.
    pub fn apply_gesture(&mut self, symbol: GestureSymbol, now: Timestamp) -> Vec<Command> {
        let previous = std::mem::replace(&mut self.last_tick_symbol, symbol);

        if self.cooldown.is_active(now) {
            if !symbol.is_none() {
                self.stats.suppressed_gestures += 1;
                debug!(gesture = symbol.name(), "gesture ignored during cooldown");
            }
            return Vec::new();
        }

        match symbol {
            GestureSymbol::None => Vec::new(),
            GestureSymbol::ToggleTracking => {
                if previous != GestureSymbol::ToggleTracking {
                    self.toggle_tracking(now);
                }
                Vec::new()
            }
            GestureSymbol::SelectRailMode => {
                self.select_mode(ControlMode::Rail);
                vec![Command::SetRailEnabled { enabled: true }]
            }
            GestureSymbol::SelectArmMode => {
                self.select_mode(ControlMode::Arm);
                vec![Command::SetRailEnabled { enabled: false }]
            }
            GestureSymbol::CloseGripper => vec![Command::SetGripper { closed: true }],
            GestureSymbol::OpenGripper => vec![Command::SetGripper { closed: false }],
        }
    }

    /// Predict ahead of `position` and emit a motion command for the active
    /// mode if the prediction is reachable.
    ///
    /// Arm mode predicts the arm-frame palm; rail mode predicts the
    /// carriage offset.
    pub fn track_position(&mut self, position: HandPosition, now: Timestamp) -> TrackOutcome {
        if !self.state.is_tracking() {
            return TrackOutcome::IDLE;
        }

        let observed = match self.mode {
            ControlMode::Arm => {
                let mut arm = position.arm;
                if let Some(averager) = self.averager.as_mut() {
                    let (x, y) = averager.push(arm.x, arm.y);
                    arm.x = x;
                    arm.y = y;
                }
                arm
            }
            ControlMode::Rail => Vec3::new(position.rail_lateral, 0.0, 0.0),
        };

        let prediction = match self
            .predictor
            .predict(PositionSample::new(observed, now), self.horizon)
        {
            Ok(prediction) => prediction,
            Err(e) => {
                debug!(error = %e, "skipping motion for degenerate sample");
                self.stats.degenerate_samples += 1;
                return TrackOutcome::IDLE;
            }
        };

        let target = prediction.position;
        let reachability = match self.mode {
            ControlMode::Arm => self
                .validator
                .evaluate(self.mode, target.x, target.y, target.z, 0.0),
            ControlMode::Rail => self.validator.evaluate_rail(target.x),
        };

        match reachability {
            Reachability::Reachable => {
                self.stats.motion_commands += 1;
                let command = match self.mode {
                    ControlMode::Arm => Command::move_to(target),
                    ControlMode::Rail => Command::MoveRail { lateral: target.x },
                };
                TrackOutcome {
                    command: Some(command),
                    indicator: TrackingIndicator::Tracking,
                    rejection: None,
                }
            }
            Reachability::Unreachable(rejection) => {
                self.stats.rejected_targets += 1;
                debug!(?rejection, ?target, "target out of reach");
                TrackOutcome {
                    rejection: Some(rejection),
                    ..TrackOutcome::IDLE
                }
            }
        }
    }

    fn toggle_tracking(&mut self, now: Timestamp) {
        self.state = self.state.toggled();
        self.cooldown.start(now);
        self.stats.toggles += 1;

        if !self.state.is_tracking() {
            self.reset_motion();
        }
        info!(state = ?self.state, "tracking toggled");
    }

    fn select_mode(&mut self, mode: ControlMode) {
        if self.mode != mode {
            self.mode = mode;
            // Arm and rail histories are in different units
            self.reset_motion();
            info!(?mode, "control mode selected");
        }
    }

    fn reset_motion(&mut self) {
        self.predictor.reset();
        if let Some(averager) = self.averager.as_mut() {
            averager.reset();
        }
    }

    fn finish(&self, mut report: FrameReport) -> FrameReport {
        report.tracking = self.state;
        report.mode = self.mode;
        report
    }
}

impl Default for ModeCoordinator {
    fn default() -> Self {
        Self::build(&GestarmConfig::default())
    }
}
