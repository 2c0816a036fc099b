use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin, PinState},
};

use crate::clock::Monotonic;
use crate::error::DhtError;
use crate::line::Line;

/// How long the host holds the line low to wake the sensor (datasheet minimum is 18 ms).
pub const START_LOW_US: u32 = 20_000;

/// How long the host waits after releasing the line before sampling.
pub const START_RELEASE_US: u32 = 30;

/// Budget for each half of the sensor's 80 µs low / 80 µs high acknowledge.
pub const HANDSHAKE_TIMEOUT_US: u32 = 100;

/// Budget for the low and rising edges that frame every data bit.
pub const BIT_LEVEL_TIMEOUT_US: u32 = 1_000;

/// Budget for the high pulse whose width carries the bit value.
pub const BIT_HIGH_TIMEOUT_US: u32 = 120;

/// High pulses longer than this are a `1` (~70 µs), anything else a `0` (~26-28 µs).
pub const BIT_ONE_THRESHOLD_US: u32 = 50;

/// The sensor needs this long between two transactions to recover.
pub const MIN_READ_INTERVAL_MS: u32 = 2_000;

/// Driver for the DHT11 temperature and humidity sensor.
pub struct Dht11<P, D, C> {
    line: Line<P, C>,
    delay: D,
}

/// Reading returned by the DHT11 sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    /// Temperature in whole degrees Celsius.
    pub temperature: i16,
    /// Relative humidity in whole percent.
    pub humidity: u8,
}

/// The 5 bytes of one transmission: humidity, humidity fraction,
/// temperature, temperature fraction and checksum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Frame([u8; 5]);

impl Frame {
    /// Sum of the four data bytes, truncated to 8 bits.
    fn checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Validates and decodes the frame. The fraction bytes are always zero on the DHT11.
    fn reading<E>(&self) -> Result<Reading, DhtError<E>> {
        let [humidity, _, temperature, _, actual] = self.0;
        let expected = self.checksum();
        if actual != expected {
            return Err(DhtError::ChecksumMismatch { expected, actual });
        }
        Ok(Reading {
            temperature: i16::from(temperature),
            humidity,
        })
    }
}

impl<P, D, C, E> Dht11<P, D, C>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayNs,
    C: Monotonic,
{
    /// Creates a new instance of the DHT11 driver.
    ///
    /// # Arguments
    ///
    /// * `line` - The configured data line, see [`Line::init`].
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(line: Line<P, C>, delay: D) -> Self {
        Dht11 { line, delay }
    }

    /// Reads a temperature and humidity measurement from the DHT11 sensor.
    ///
    /// Every call runs the whole transaction: start signal, sensor
    /// acknowledge, 40 data bits and checksum validation. Nothing is cached
    /// between calls and nothing is retried. The call blocks for about 25 ms.
    ///
    /// Calls must be spaced at least [`MIN_READ_INTERVAL_MS`] apart. The bit
    /// timing is measured by polling, so a preemption of a few tens of
    /// microseconds in the middle of a bit can flip it; enable the
    /// `critical-section` feature to keep interrupts off while the sensor talks.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError)` if a communication or checksum error occurs.
    pub fn read(&mut self) -> Result<Reading, DhtError<E>> {
        self.start()?;
        self.receive()?.reading()
    }

    /// Gives back the data line and the delay provider.
    pub fn release(self) -> (Line<P, C>, D) {
        (self.line, self.delay)
    }

    /// Sends the start signal: at least 18 ms low, then release.
    fn start(&mut self) -> Result<(), DhtError<E>> {
        self.line.set_level(PinState::Low)?;
        self.delay.delay_us(START_LOW_US);
        self.line.set_level(PinState::High)?;
        self.delay.delay_us(START_RELEASE_US);
        Ok(())
    }

    #[cfg(not(feature = "critical-section"))]
    fn receive(&mut self) -> Result<Frame, DhtError<E>> {
        self.read_response()
    }

    #[cfg(feature = "critical-section")]
    fn receive(&mut self) -> Result<Frame, DhtError<E>> {
        critical_section::with(|_cs| self.read_response())
    }

    fn read_response(&mut self) -> Result<Frame, DhtError<E>> {
        self.handshake()?;

        let mut frame = Frame::default();
        for b in frame.0.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(frame)
    }

    /// Waits for the sensor's 80us low and 80us high response.
    fn handshake(&mut self) -> Result<(), DhtError<E>> {
        self.line
            .wait_for_level(PinState::Low, HANDSHAKE_TIMEOUT_US)?;
        self.line
            .wait_for_level(PinState::High, HANDSHAKE_TIMEOUT_US)?;
        Ok(())
    }

    /// Reads one byte (8 bits) from the sensor, MSB first.
    fn read_byte(&mut self) -> Result<u8, DhtError<E>> {
        let mut byte: u8 = 0;

        for i in 0..8 {
            let bit_mask = 1 << (7 - i);
            if self.read_bit()? {
                byte |= bit_mask;
            }
        }

        Ok(byte)
    }

    /// Reads a single bit from the sensor.
    ///
    /// The bit is determined by the duration of the high signal
    /// after the DHT11 pulls the line low.
    fn read_bit(&mut self) -> Result<bool, DhtError<E>> {
        self.line
            .wait_for_level(PinState::Low, BIT_LEVEL_TIMEOUT_US)?; // ~50us
        self.line
            .wait_for_level(PinState::High, BIT_LEVEL_TIMEOUT_US)?;

        let high_us = self
            .line
            .wait_for_level(PinState::Low, BIT_HIGH_TIMEOUT_US)?;
        Ok(high_us > BIT_ONE_THRESHOLD_US)
    }
}
