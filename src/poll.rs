use crate::bridge::PeripheralBridge;
use crate::error::BridgeError;
use crate::machine::SessionStateMachine;
use crate::storage::PersistentCounter;
use rand::Rng;
use std::time::Duration;

pub const DEFAULT_PERIOD: Duration = Duration::from_millis(10);

/// The cooperative scheduler: one thread, one iteration per period.
///
///  |-- presence = sensor.is_triggered()
///  |-- key = keypad.poll_key()            // at most one
///  |-- machine.tick()                     // timers fire even with no key
///  |-- dispatch presence, then key
///  |-- tone.service()                     // end timed tones
///  `-- sleep(period)
///
/// The tick runs before the key is dispatched, so a key arriving in the
/// same poll the countdown expires finds the question already graded.
pub struct PollLoop {
    period: Duration,
}

impl PollLoop {
    pub fn new(period: Duration) -> Self {
        PollLoop { period }
    }

    pub fn step<C: PersistentCounter, R: Rng>(
        &self,
        machine: &mut SessionStateMachine<C, R>,
        io: &mut dyn PeripheralBridge,
    ) -> Result<(), BridgeError> {
        let triggered = io.presence().is_triggered()?;
        let key = io.keypad().poll_key()?;
        machine.tick(io)?;
        if triggered {
            machine.on_presence(io)?;
        }
        if let Some(key) = key {
            log::debug!("key {:?} in {:?}", key, machine.state());
            machine.on_key(key, io)?;
        }
        io.tone().service()
    }

    /// Poll until the host asks to quit or `max_steps` iterations have run;
    /// returns the number of iterations.
    pub fn run<C: PersistentCounter, R: Rng>(
        &self,
        machine: &mut SessionStateMachine<C, R>,
        io: &mut dyn PeripheralBridge,
        max_steps: Option<u64>,
    ) -> Result<u64, BridgeError> {
        let mut steps = 0;
        while !io.quit_requested() && max_steps.map_or(true, |max| steps < max) {
            self.step(machine, io)?;
            io.clock().delay(self.period);
            steps += 1;
        }
        Ok(steps)
    }
}

impl Default for PollLoop {
    fn default() -> Self {
        PollLoop::new(DEFAULT_PERIOD)
    }
}
