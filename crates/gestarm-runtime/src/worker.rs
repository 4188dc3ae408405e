//! Async driver worker
//!
//! A tokio task owns the blocking driver and runs each call on the
//! blocking pool. Discrete calls (gripper, rail enable, disconnect) travel
//! through a bounded queue and are all delivered in order. Motion calls
//! travel through a single watch slot: a newer target overwrites one the
//! driver has not picked up yet, so a slow controller always moves to the
//! freshest position instead of working through a backlog. A discrete call
//! lands after every motion target submitted before it and before every
//! target submitted after it.

use std::sync::Arc;

use gestarm_control::ArmDriver;
use gestarm_core::DriverError;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Default discrete command queue depth
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// One deferred driver call
#[derive(Debug, Clone, Copy, PartialEq)]
enum DriverCall {
    MoveAbsolute { x: f64, y: f64, z: f64 },
    MoveRail { x: f64, y: f64, z: f64, lateral: f64 },
    SetGripper(bool),
    SetRailEnabled(bool),
    Disconnect,
}

impl DriverCall {
    fn apply<D: ArmDriver + ?Sized>(self, driver: &mut D) -> Result<(), DriverError> {
        match self {
            DriverCall::MoveAbsolute { x, y, z } => driver.move_absolute(x, y, z),
            DriverCall::MoveRail { x, y, z, lateral } => driver.move_rail(x, y, z, lateral),
            DriverCall::SetGripper(closed) => driver.set_gripper(closed),
            DriverCall::SetRailEnabled(enabled) => driver.set_rail_enabled(enabled),
            DriverCall::Disconnect => driver.disconnect(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            DriverCall::MoveAbsolute { .. } => "move-absolute",
            DriverCall::MoveRail { .. } => "move-rail",
            DriverCall::SetGripper(_) => "set-gripper",
            DriverCall::SetRailEnabled(_) => "set-rail-enabled",
            DriverCall::Disconnect => "disconnect",
        }
    }
}

/// Motion slot contents: sequence number plus the call
type MotionSlot = Option<(u64, DriverCall)>;

/// Worker counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Calls the driver accepted
    pub delivered: u64,
    /// Calls the driver refused
    pub failed: u64,
    /// Motion targets overwritten before the driver saw them
    pub superseded: u64,
}

/// Non-blocking `ArmDriver` front for a blocking driver.
///
/// Calls return as soon as they are queued. `connect` runs inline on the
/// caller's thread; everything else runs on the worker.
pub struct AsyncDriver<D> {
    inner: Arc<Mutex<D>>,
    motion: watch::Sender<MotionSlot>,
    discrete: mpsc::Sender<(u64, DriverCall)>,
    motion_seq: u64,
    stats: Arc<Mutex<WorkerStats>>,
    task: JoinHandle<()>,
}

impl<D: ArmDriver + Send + 'static> AsyncDriver<D> {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// Panics outside a runtime context, like `tokio::spawn`.
    pub fn spawn(driver: D, queue_capacity: usize) -> Self {
        Self::spawn_on(&Handle::current(), driver, queue_capacity)
    }

    pub fn spawn_on(handle: &Handle, driver: D, queue_capacity: usize) -> Self {
        let inner = Arc::new(Mutex::new(driver));
        let stats = Arc::new(Mutex::new(WorkerStats::default()));
        let (motion, motion_rx) = watch::channel(None);
        let (discrete, discrete_rx) = mpsc::channel(queue_capacity.max(1));

        let task = handle.spawn(run_worker(
            Arc::clone(&inner),
            Arc::clone(&stats),
            motion_rx,
            discrete_rx,
        ));

        Self {
            inner,
            motion,
            discrete,
            motion_seq: 0,
            stats,
            task,
        }
    }

    pub fn stats(&self) -> WorkerStats {
        *self.stats.lock()
    }

    /// Close the queues and wait for the worker to deliver what is left
    pub async fn shutdown(self) -> WorkerStats {
        let AsyncDriver {
            motion,
            discrete,
            stats,
            task,
            ..
        } = self;

        drop(discrete);
        drop(motion);
        if let Err(e) = task.await {
            error!(error = %e, "driver worker terminated abnormally");
        }

        let stats = *stats.lock();
        stats
    }

    fn submit_motion(&mut self, call: DriverCall) -> Result<(), DriverError> {
        self.motion_seq += 1;
        self.motion
            .send(Some((self.motion_seq, call)))
            .map_err(|_| DriverError::NotConnected)
    }

    fn submit_discrete(&self, call: DriverCall) -> Result<(), DriverError> {
        self.discrete.try_send((self.motion_seq, call)).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DriverError::Io("command queue full".to_string()),
            mpsc::error::TrySendError::Closed(_) => DriverError::NotConnected,
        })
    }
}

impl<D: ArmDriver + Send + 'static> ArmDriver for AsyncDriver<D> {
    fn connect(&mut self) -> Result<(), DriverError> {
        self.inner.lock().connect()
    }

    fn move_absolute(&mut self, x: f64, y: f64, z: f64) -> Result<(), DriverError> {
        self.submit_motion(DriverCall::MoveAbsolute { x, y, z })
    }

    fn move_rail(&mut self, x: f64, y: f64, z: f64, lateral: f64) -> Result<(), DriverError> {
        self.submit_motion(DriverCall::MoveRail { x, y, z, lateral })
    }

    fn set_gripper(&mut self, closed: bool) -> Result<(), DriverError> {
        self.submit_discrete(DriverCall::SetGripper(closed))
    }

    fn set_rail_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.submit_discrete(DriverCall::SetRailEnabled(enabled))
    }

    /// Queued behind every discrete command already submitted
    fn disconnect(&mut self) -> Result<(), DriverError> {
        self.submit_discrete(DriverCall::Disconnect)
    }
}

async fn run_worker<D: ArmDriver + Send + 'static>(
    driver: Arc<Mutex<D>>,
    stats: Arc<Mutex<WorkerStats>>,
    mut motion_rx: watch::Receiver<MotionSlot>,
    mut discrete_rx: mpsc::Receiver<(u64, DriverCall)>,
) {
    let mut last_seq = 0u64;
    let mut motion_open = true;

    loop {
        tokio::select! {
            biased;

            queued = discrete_rx.recv() => match queued {
                Some((after_motion, call)) => {
                    if after_motion > last_seq {
                        let flushed = flush_motion(&mut motion_rx, after_motion, &mut last_seq, &stats);
                        if let Some(motion) = flushed {
                            execute(&driver, &stats, motion).await;
                        }
                    }
                    execute(&driver, &stats, call).await;
                }
                None => break,
            },

            changed = motion_rx.changed(), if motion_open => match changed {
                Ok(()) => {
                    let slot = *motion_rx.borrow_and_update();
                    if let Some(call) = take_motion(slot, &mut last_seq, &stats) {
                        execute(&driver, &stats, call).await;
                    }
                }
                Err(_) => motion_open = false,
            },
        }
    }

    // The final target may still be sitting in the slot
    let slot = *motion_rx.borrow();
    if let Some(call) = take_motion(slot, &mut last_seq, &stats) {
        execute(&driver, &stats, call).await;
    }
    debug!("driver worker stopped");
}

/// Motion that must land before a discrete call submitted after target
/// `after_motion`.
///
/// A slot already overwritten by a later target is left for the normal
/// motion path; the targets it replaced up to `after_motion` count as
/// superseded.
fn flush_motion(
    motion_rx: &mut watch::Receiver<MotionSlot>,
    after_motion: u64,
    last_seq: &mut u64,
    stats: &Mutex<WorkerStats>,
) -> Option<DriverCall> {
    let slot = *motion_rx.borrow();
    match slot {
        Some((seq, _)) if seq > after_motion => {
            stats.lock().superseded += after_motion - *last_seq;
            *last_seq = after_motion;
            None
        }
        _ => {
            let slot = *motion_rx.borrow_and_update();
            take_motion(slot, last_seq, stats)
        }
    }
}

fn take_motion(slot: MotionSlot, last_seq: &mut u64, stats: &Mutex<WorkerStats>) -> Option<DriverCall> {
    let (seq, call) = slot?;
    if seq <= *last_seq {
        return None;
    }
    stats.lock().superseded += seq - *last_seq - 1;
    *last_seq = seq;
    Some(call)
}

async fn execute<D: ArmDriver + Send + 'static>(
    driver: &Arc<Mutex<D>>,
    stats: &Arc<Mutex<WorkerStats>>,
    call: DriverCall,
) {
    let driver = Arc::clone(driver);
    let result = tokio::task::spawn_blocking(move || call.apply(&mut *driver.lock())).await;

    match result {
        Ok(Ok(())) => stats.lock().delivered += 1,
        Ok(Err(e)) => {
            warn!(call = call.kind(), error = %e, "driver command failed");
            stats.lock().failed += 1;
        }
        Err(e) => {
            error!(call = call.kind(), error = %e, "driver call panicked");
            stats.lock().failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Move(f64, f64, f64),
        Rail(f64),
        Gripper(bool),
        RailEnabled(bool),
        Disconnect,
    }

    /// Records calls into a shared log; motion calls take `delay`
    #[derive(Clone, Default)]
    struct SlowDriver {
        log: Arc<Mutex<Vec<Call>>>,
        delay: Duration,
        connected: bool,
    }

    impl ArmDriver for SlowDriver {
        fn connect(&mut self) -> Result<(), DriverError> {
            self.connected = true;
            Ok(())
        }

        fn move_absolute(&mut self, x: f64, y: f64, z: f64) -> Result<(), DriverError> {
            std::thread::sleep(self.delay);
            self.log.lock().push(Call::Move(x, y, z));
            Ok(())
        }

        fn move_rail(&mut self, _x: f64, _y: f64, _z: f64, lateral: f64) -> Result<(), DriverError> {
            std::thread::sleep(self.delay);
            self.log.lock().push(Call::Rail(lateral));
            Ok(())
        }

        fn set_gripper(&mut self, closed: bool) -> Result<(), DriverError> {
            if !self.connected {
                return Err(DriverError::NotConnected);
            }
            self.log.lock().push(Call::Gripper(closed));
            Ok(())
        }

        fn set_rail_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
            self.log.lock().push(Call::RailEnabled(enabled));
            Ok(())
        }

        fn disconnect(&mut self) -> Result<(), DriverError> {
            self.connected = false;
            self.log.lock().push(Call::Disconnect);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_discrete_commands_delivered_in_order() {
        let driver = SlowDriver::default();
        let log = Arc::clone(&driver.log);
        let mut worker = AsyncDriver::spawn(driver, 8);

        worker.connect().unwrap();
        worker.set_rail_enabled(false).unwrap();
        worker.set_gripper(true).unwrap();
        worker.set_gripper(false).unwrap();
        worker.disconnect().unwrap();

        let stats = worker.shutdown().await;
        assert_eq!(
            *log.lock(),
            vec![
                Call::RailEnabled(false),
                Call::Gripper(true),
                Call::Gripper(false),
                Call::Disconnect,
            ]
        );
        assert_eq!(stats.delivered, 4);
        assert_eq!(stats.failed, 0);
    }

    #[tokio::test]
    async fn test_slow_driver_receives_latest_motion() {
        let driver = SlowDriver {
            delay: Duration::from_millis(50),
            ..SlowDriver::default()
        };
        let log = Arc::clone(&driver.log);
        let mut worker = AsyncDriver::spawn(driver, 8);

        for i in 1..=10 {
            worker.move_absolute(f64::from(i), 0.0, 0.0).unwrap();
        }
        let stats = worker.shutdown().await;

        let log = log.lock();
        assert!(log.len() < 10, "no motion was coalesced: {:?}", *log);
        assert_eq!(log.last(), Some(&Call::Move(10.0, 0.0, 0.0)));
        assert_eq!(stats.delivered + stats.superseded, 10);

        // Delivered targets stay in submission order
        let xs: Vec<f64> = log
            .iter()
            .map(|c| match c {
                Call::Move(x, _, _) => *x,
                other => panic!("unexpected call {:?}", other),
            })
            .collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_discrete_does_not_overtake_earlier_motion() {
        let driver = SlowDriver::default();
        let log = Arc::clone(&driver.log);
        let mut worker = AsyncDriver::spawn(driver, 8);

        worker.move_absolute(1.0, 0.0, 0.0).unwrap();
        worker.set_rail_enabled(true).unwrap();
        worker.move_absolute(2.0, 0.0, 0.0).unwrap();
        let stats = worker.shutdown().await;

        // Target 1 was overwritten before the worker ran; target 2 waits
        assert_eq!(
            *log.lock(),
            vec![Call::RailEnabled(true), Call::Move(2.0, 0.0, 0.0)]
        );
        assert_eq!(stats.superseded, 1);
        assert_eq!(stats.delivered, 2);
    }

    #[tokio::test]
    async fn test_gripper_closes_before_later_motion() {
        let driver = SlowDriver::default();
        let log = Arc::clone(&driver.log);
        let mut worker = AsyncDriver::spawn(driver, 8);

        worker.connect().unwrap();
        worker.move_absolute(1.0, 0.0, 0.0).unwrap();
        worker.set_gripper(true).unwrap();
        worker.move_absolute(2.0, 0.0, 0.0).unwrap();
        worker.move_absolute(3.0, 0.0, 0.0).unwrap();
        worker.set_gripper(false).unwrap();
        worker.shutdown().await;

        let log = log.lock();
        let close = log.iter().position(|c| *c == Call::Gripper(true));
        let open = log.iter().position(|c| *c == Call::Gripper(false));
        let carry = log.iter().position(|c| *c == Call::Move(3.0, 0.0, 0.0));
        assert!(close < carry, "moved before the gripper closed: {:?}", *log);
        assert!(carry < open, "released before the move landed: {:?}", *log);
        assert!(!log.contains(&Call::Move(2.0, 0.0, 0.0)));
    }

    #[tokio::test]
    async fn test_motion_before_discrete_lands_first() {
        let driver = SlowDriver::default();
        let log = Arc::clone(&driver.log);
        let mut worker = AsyncDriver::spawn(driver, 8);

        worker.connect().unwrap();
        worker.move_absolute(1.0, 0.0, 0.0).unwrap();
        worker.set_gripper(true).unwrap();
        let stats = worker.shutdown().await;

        assert_eq!(
            *log.lock(),
            vec![Call::Move(1.0, 0.0, 0.0), Call::Gripper(true)]
        );
        assert_eq!(stats.superseded, 0);
    }

    #[tokio::test]
    async fn test_rail_motion_passes_pose() {
        let driver = SlowDriver::default();
        let log = Arc::clone(&driver.log);
        let mut worker = AsyncDriver::spawn(driver, 8);

        worker.move_rail(200.0, 0.0, 0.0, 640.0).unwrap();
        worker.shutdown().await;

        assert_eq!(*log.lock(), vec![Call::Rail(640.0)]);
    }

    #[tokio::test]
    async fn test_driver_failures_counted() {
        let driver = SlowDriver::default();
        let mut worker = AsyncDriver::spawn(driver, 8);

        // Never connected: the gripper refuses
        worker.set_gripper(true).unwrap();
        let stats = worker.shutdown().await;

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.delivered, 0);
    }

    #[tokio::test]
    async fn test_full_queue_reports_error() {
        let mut worker = AsyncDriver::spawn(SlowDriver::default(), 2);

        // The worker cannot run until this task yields
        worker.set_rail_enabled(true).unwrap();
        worker.set_rail_enabled(true).unwrap();
        assert_eq!(
            worker.set_rail_enabled(true),
            Err(DriverError::Io("command queue full".to_string()))
        );

        // Motion never queues behind discrete commands
        assert!(worker.move_absolute(200.0, 0.0, 50.0).is_ok());

        let stats = worker.shutdown().await;
        assert_eq!(stats.delivered, 3);
    }
}
