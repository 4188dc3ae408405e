//! Test drivers

use std::sync::Arc;

use gestarm_control::ArmDriver;
use gestarm_core::{Command, DriverError, Vec3};
use parking_lot::Mutex;

/// Something the driver was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    Connected,
    Command(Command),
    /// Arm pose the rail move was issued with
    RailPose(Vec3),
    Disconnected,
}

/// Shared view of a driver's event log
#[derive(Debug, Clone, Default)]
pub struct DriverLog(Arc<Mutex<Vec<DriverEvent>>>);

impl DriverLog {
    fn push(&self, event: DriverEvent) {
        self.0.lock().push(event);
    }

    pub fn events(&self) -> Vec<DriverEvent> {
        self.0.lock().clone()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.0
            .lock()
            .iter()
            .filter_map(|e| match e {
                DriverEvent::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn motion_commands(&self) -> Vec<Command> {
        self.commands().into_iter().filter(Command::is_motion).collect()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.commands().iter().filter(|c| c.kind() == kind).count()
    }
}

/// Driver that records every accepted call.
///
/// Behaves like real hardware in one respect: commands before `connect`
/// fail with `NotConnected`.
#[derive(Debug, Clone, Default)]
pub struct RecordingDriver {
    log: DriverLog,
    connected: bool,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that stays valid after the driver moves into a session or worker
    pub fn log(&self) -> DriverLog {
        self.log.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn record(&self, command: Command) -> Result<(), DriverError> {
        if !self.connected {
            return Err(DriverError::NotConnected);
        }
        self.log.push(DriverEvent::Command(command));
        Ok(())
    }
}

impl ArmDriver for RecordingDriver {
    fn connect(&mut self) -> Result<(), DriverError> {
        self.connected = true;
        self.log.push(DriverEvent::Connected);
        Ok(())
    }

    fn move_absolute(&mut self, x: f64, y: f64, z: f64) -> Result<(), DriverError> {
        self.record(Command::MoveAbsolute { x, y, z })
    }

    fn move_rail(&mut self, x: f64, y: f64, z: f64, lateral: f64) -> Result<(), DriverError> {
        self.record(Command::MoveRail { lateral })?;
        self.log.push(DriverEvent::RailPose(Vec3::new(x, y, z)));
        Ok(())
    }

    fn set_gripper(&mut self, closed: bool) -> Result<(), DriverError> {
        self.record(Command::SetGripper { closed })
    }

    fn set_rail_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.record(Command::SetRailEnabled { enabled })
    }

    fn disconnect(&mut self) -> Result<(), DriverError> {
        self.connected = false;
        self.log.push(DriverEvent::Disconnected);
        Ok(())
    }
}

/// How a `FailingDriver` misbehaves
#[derive(Debug, Clone, PartialEq)]
pub enum FailureMode {
    /// `connect` fails
    RefuseConnect,
    /// Commands of this kind (see `Command::kind`) are rejected
    Reject(&'static str),
    /// Every nth command fails with an I/O error
    EveryNth(u32),
}

/// Recording driver with injected failures
#[derive(Debug, Clone)]
pub struct FailingDriver {
    inner: RecordingDriver,
    mode: FailureMode,
    calls: u32,
    failures: Arc<Mutex<u32>>,
}

impl FailingDriver {
    pub fn new(mode: FailureMode) -> Self {
        Self {
            inner: RecordingDriver::new(),
            mode,
            calls: 0,
            failures: Arc::new(Mutex::new(0)),
        }
    }

    pub fn log(&self) -> DriverLog {
        self.inner.log()
    }

    /// Shared failure counter
    pub fn failures(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.failures)
    }

    fn check(&mut self, kind: &'static str) -> Result<(), DriverError> {
        self.calls += 1;
        let result = match &self.mode {
            FailureMode::Reject(rejected) if *rejected == kind => {
                Err(DriverError::CommandRejected(format!("{} refused", kind)))
            }
            FailureMode::EveryNth(n) if *n > 0 && self.calls % n == 0 => {
                Err(DriverError::Io("serial write timed out".to_string()))
            }
            _ => Ok(()),
        };
        if result.is_err() {
            *self.failures.lock() += 1;
        }
        result
    }
}

impl ArmDriver for FailingDriver {
    fn connect(&mut self) -> Result<(), DriverError> {
        if self.mode == FailureMode::RefuseConnect {
            *self.failures.lock() += 1;
            return Err(DriverError::ConnectionFailed("device busy".to_string()));
        }
        self.inner.connect()
    }

    fn move_absolute(&mut self, x: f64, y: f64, z: f64) -> Result<(), DriverError> {
        self.check("move-absolute")?;
        self.inner.move_absolute(x, y, z)
    }

    fn move_rail(&mut self, x: f64, y: f64, z: f64, lateral: f64) -> Result<(), DriverError> {
        self.check("move-rail")?;
        self.inner.move_rail(x, y, z, lateral)
    }

    fn set_gripper(&mut self, closed: bool) -> Result<(), DriverError> {
        self.check("set-gripper")?;
        self.inner.set_gripper(closed)
    }

    fn set_rail_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.check("set-rail-enabled")?;
        self.inner.set_rail_enabled(enabled)
    }

    fn disconnect(&mut self) -> Result<(), DriverError> {
        self.inner.disconnect()
    }
}
