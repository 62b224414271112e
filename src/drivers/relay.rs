//! Two-line gate relay driver.
//!
//! Maps [`RelayLine`] onto the board pins and keeps a shadow copy of each
//! line's electrical mode so callers (and tests) can confirm the lines
//! ended up released.

use log::debug;

use super::hw_init;
use crate::app::ports::{LineError, LineMode, RelayLine, RelayPort};
use crate::pins;

pub struct RelayDriver {
    modes: [LineMode; 2],
}

impl RelayDriver {
    /// Both lines are assumed released; `main()` releases them before
    /// constructing the driver.
    pub fn new() -> Self {
        Self {
            modes: [LineMode::Released; 2],
        }
    }

    pub const fn gpio(line: RelayLine) -> i32 {
        match line {
            RelayLine::A => pins::RELAY_A_GPIO,
            RelayLine::B => pins::RELAY_B_GPIO,
        }
    }

    pub fn mode(&self, line: RelayLine) -> LineMode {
        self.modes[line as usize]
    }

    pub fn all_released(&self) -> bool {
        self.modes.iter().all(|m| *m == LineMode::Released)
    }
}

impl Default for RelayDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayPort for RelayDriver {
    fn drive(&mut self, line: RelayLine) -> Result<(), LineError> {
        hw_init::gpio_drive_output(Self::gpio(line)).map_err(|e| LineError { line, code: e.code() })?;
        self.modes[line as usize] = LineMode::Driven;
        debug!("Relay: line {:?} driven", line);
        Ok(())
    }

    fn release(&mut self, line: RelayLine) -> Result<(), LineError> {
        hw_init::gpio_release(Self::gpio(line)).map_err(|e| LineError { line, code: e.code() })?;
        self.modes[line as usize] = LineMode::Released;
        debug!("Relay: line {:?} released", line);
        Ok(())
    }
}
