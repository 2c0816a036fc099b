use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::clock::Monotonic;
use crate::error::{ConfigurationError, DhtError};

/// Physical-layer access to the single-wire data line.
///
/// The pin must be bidirectional open-drain with the pull-up enabled, the
/// pull-down disabled and no interrupts attached. Releasing the line lets the
/// pull-up (and the sensor) decide its level, so the idle level is high.
pub struct Line<P, C> {
    pin: P,
    clock: C,
}

impl<P, C, E> Line<P, C>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    C: Monotonic,
{
    /// Binds a pin that the HAL already put in open-drain, pulled-up mode.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the pin cannot be driven to its idle level.
    pub fn init(pin: P, clock: C) -> Result<Self, ConfigurationError<E>> {
        Self::init_with(pin, clock, |_| Ok(()))
    }

    /// Binds a pin after letting the platform configure its mode.
    ///
    /// `setup` runs first and is where a HAL that switches pin modes at
    /// runtime selects open-drain input/output and enables the pull-up.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if `setup` fails or the idle level cannot be set.
    pub fn init_with<F>(mut pin: P, clock: C, setup: F) -> Result<Self, ConfigurationError<E>>
    where
        F: FnOnce(&mut P) -> Result<(), E>,
    {
        setup(&mut pin).map_err(ConfigurationError)?;
        let mut line = Line { pin, clock };
        line.configure()?;
        Ok(line)
    }

    /// Puts the line in its idle state (released, pulled high).
    ///
    /// Calling it again is harmless.
    pub fn configure(&mut self) -> Result<(), ConfigurationError<E>> {
        self.pin.set_high().map_err(ConfigurationError)
    }

    /// Drives the line low, or releases it so the pull-up brings it high.
    pub fn set_level(&mut self, level: PinState) -> Result<(), DhtError<E>> {
        self.pin.set_state(level)?;
        Ok(())
    }

    /// Busy-waits until the line reads `level`.
    ///
    /// Returns the microseconds spent waiting. Polling never yields: the
    /// pulses being measured are only tens of microseconds wide.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::Timeout` once more than `timeout_us` has elapsed
    /// without the line reaching `level`.
    pub fn wait_for_level(
        &mut self,
        level: PinState,
        timeout_us: u32,
    ) -> Result<u32, DhtError<E>> {
        let start = self.clock.now_us();
        while PinState::from(self.pin.is_high()?) != level {
            if self.clock.now_us().wrapping_sub(start) > timeout_us {
                return Err(DhtError::Timeout);
            }
        }
        Ok(self.clock.now_us().wrapping_sub(start))
    }

    /// Gives back the pin and clock.
    pub fn release(self) -> (P, C) {
        (self.pin, self.clock)
    }
}
