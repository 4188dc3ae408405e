//! Arm driver capability interface and command dispatch
//!
//! The core depends only on this trait. Each physical device implements it
//! once; the wire protocol, queueing and any retry policy live behind it.

use gestarm_core::{Command, DriverError, RailConfig, Vec3};
use tracing::{debug, info, warn};

/// One physical manipulator with an arm and a rail.
///
/// All calls may block. Errors are reported, never retried by the caller.
pub trait ArmDriver {
    fn connect(&mut self) -> Result<(), DriverError>;

    fn move_absolute(&mut self, x: f64, y: f64, z: f64) -> Result<(), DriverError>;

    /// Move the rail carriage to `lateral` while holding the arm at `(x, y, z)`
    fn move_rail(&mut self, x: f64, y: f64, z: f64, lateral: f64) -> Result<(), DriverError>;

    /// `closed = true` closes the gripper jaws
    fn set_gripper(&mut self, closed: bool) -> Result<(), DriverError>;

    fn set_rail_enabled(&mut self, enabled: bool) -> Result<(), DriverError>;

    fn disconnect(&mut self) -> Result<(), DriverError>;
}

impl<D: ArmDriver + ?Sized> ArmDriver for Box<D> {
    fn connect(&mut self) -> Result<(), DriverError> {
        (**self).connect()
    }

    fn move_absolute(&mut self, x: f64, y: f64, z: f64) -> Result<(), DriverError> {
        (**self).move_absolute(x, y, z)
    }

    fn move_rail(&mut self, x: f64, y: f64, z: f64, lateral: f64) -> Result<(), DriverError> {
        (**self).move_rail(x, y, z, lateral)
    }

    fn set_gripper(&mut self, closed: bool) -> Result<(), DriverError> {
        (**self).set_gripper(closed)
    }

    fn set_rail_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
        (**self).set_rail_enabled(enabled)
    }

    fn disconnect(&mut self) -> Result<(), DriverError> {
        (**self).disconnect()
    }
}

/// Outcome of dispatching a batch of commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Maps `Command` values onto driver calls
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    rail_pose: Vec3,
}

impl CommandDispatcher {
    pub fn new(rail: &RailConfig) -> Self {
        Self {
            rail_pose: rail.arm_pose,
        }
    }

    pub fn dispatch<D: ArmDriver + ?Sized>(&self, driver: &mut D, command: &Command) -> Result<(), DriverError> {
        match *command {
            Command::MoveAbsolute { x, y, z } => driver.move_absolute(x, y, z),
            Command::MoveRail { lateral } => {
                let p = self.rail_pose;
                driver.move_rail(p.x, p.y, p.z, lateral)
            }
            Command::SetGripper { closed } => driver.set_gripper(closed),
            Command::SetRailEnabled { enabled } => driver.set_rail_enabled(enabled),
        }
    }

    /// Send every command in order. Failures are logged and skipped.
    pub fn dispatch_all<D: ArmDriver + ?Sized>(&self, driver: &mut D, commands: &[Command]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        for command in commands {
            match self.dispatch(driver, command) {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    warn!(command = command.kind(), error = %e, "driver command failed");
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new(&RailConfig::default())
    }
}

/// Driver that only logs; for dry runs without hardware
#[derive(Debug, Default)]
pub struct DryRunDriver {
    connected: bool,
}

impl DryRunDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_connected(&self) -> Result<(), DriverError> {
        if self.connected {
            Ok(())
        } else {
            Err(DriverError::NotConnected)
        }
    }
}

impl ArmDriver for DryRunDriver {
    fn connect(&mut self) -> Result<(), DriverError> {
        self.connected = true;
        info!("dry-run driver connected");
        Ok(())
    }

    fn move_absolute(&mut self, x: f64, y: f64, z: f64) -> Result<(), DriverError> {
        self.ensure_connected()?;
        debug!(x, y, z, "move absolute");
        Ok(())
    }

    fn move_rail(&mut self, x: f64, y: f64, z: f64, lateral: f64) -> Result<(), DriverError> {
        self.ensure_connected()?;
        debug!(x, y, z, lateral, "move rail");
        Ok(())
    }

    fn set_gripper(&mut self, closed: bool) -> Result<(), DriverError> {
        self.ensure_connected()?;
        debug!(closed, "set gripper");
        Ok(())
    }

    fn set_rail_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.ensure_connected()?;
        debug!(enabled, "set rail enabled");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), DriverError> {
        self.connected = false;
        info!("dry-run driver disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        calls: Vec<String>,
        fail_gripper: bool,
    }

    impl ArmDriver for Log {
        fn connect(&mut self) -> Result<(), DriverError> {
            self.calls.push("connect".into());
            Ok(())
        }

        fn move_absolute(&mut self, x: f64, y: f64, z: f64) -> Result<(), DriverError> {
            self.calls.push(format!("move {} {} {}", x, y, z));
            Ok(())
        }

        fn move_rail(&mut self, x: f64, y: f64, z: f64, lateral: f64) -> Result<(), DriverError> {
            self.calls.push(format!("rail {} {} {} {}", x, y, z, lateral));
            Ok(())
        }

        fn set_gripper(&mut self, closed: bool) -> Result<(), DriverError> {
            if self.fail_gripper {
                return Err(DriverError::CommandRejected("gripper jammed".into()));
            }
            self.calls.push(format!("gripper {}", closed));
            Ok(())
        }

        fn set_rail_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
            self.calls.push(format!("rail-enabled {}", enabled));
            Ok(())
        }

        fn disconnect(&mut self) -> Result<(), DriverError> {
            self.calls.push("disconnect".into());
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_maps_commands() {
        let dispatcher = CommandDispatcher::default();
        let mut driver = Log::default();

        let summary = dispatcher.dispatch_all(
            &mut driver,
            &[
                Command::MoveAbsolute { x: 200.0, y: 0.0, z: 50.0 },
                Command::MoveRail { lateral: 420.0 },
                Command::SetGripper { closed: true },
                Command::SetRailEnabled { enabled: false },
            ],
        );

        assert_eq!(summary, DispatchSummary { sent: 4, failed: 0 });
        assert_eq!(
            driver.calls,
            vec![
                "move 200 0 50",
                "rail 200 0 0 420",
                "gripper true",
                "rail-enabled false",
            ]
        );
    }

    #[test]
    fn test_failures_do_not_stop_batch() {
        let dispatcher = CommandDispatcher::default();
        let mut driver = Log {
            fail_gripper: true,
            ..Log::default()
        };

        let summary = dispatcher.dispatch_all(
            &mut driver,
            &[
                Command::SetGripper { closed: false },
                Command::MoveAbsolute { x: 1.0, y: 2.0, z: 3.0 },
            ],
        );

        assert_eq!(summary, DispatchSummary { sent: 1, failed: 1 });
        assert_eq!(driver.calls, vec!["move 1 2 3"]);
    }

    #[test]
    fn test_boxed_driver() {
        let dispatcher = CommandDispatcher::default();
        let mut driver: Box<dyn ArmDriver> = Box::new(DryRunDriver::new());

        assert_eq!(
            dispatcher.dispatch(&mut driver, &Command::SetGripper { closed: true }),
            Err(DriverError::NotConnected)
        );
        driver.connect().unwrap();
        assert!(dispatcher
            .dispatch(&mut driver, &Command::MoveRail { lateral: 10.0 })
            .is_ok());
    }
}
