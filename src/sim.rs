//! Simulated DHT11 data line for tests.
//!
//! Time is virtual and only moves when the driver does something: every pin
//! read costs one microsecond and delays advance it by their length. Clock
//! reads are free, so a measured pulse width equals the simulated one.

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use crate::clock::Monotonic;

/// Sensor waits this long after the host releases the line before answering.
pub const RESPONSE_DELAY_US: u32 = 20;
pub const ACK_US: u32 = 80;
pub const BIT_LOW_US: u32 = 50;
pub const ZERO_HIGH_US: u32 = 27;
pub const ONE_HIGH_US: u32 = 70;

#[derive(Default)]
struct Bus {
    now: u32,
    driven_low: bool,
    released_at: Option<u32>,
    response: Vec<(PinState, u32)>,
    writes: Vec<PinState>,
}

impl Bus {
    fn level(&self) -> PinState {
        if self.driven_low {
            return PinState::Low;
        }
        let Some(released_at) = self.released_at else {
            return PinState::High;
        };

        let mut offset = self.now - released_at;
        for &(state, width) in &self.response {
            if offset < width {
                return state;
            }
            offset -= width;
        }
        PinState::High
    }
}

/// One shared timeline. Clone it to hand out the pin, delay and clock.
#[derive(Clone, Default)]
pub struct SimLine(Rc<RefCell<Bus>>);

impl SimLine {
    /// Line whose sensor plays `response` after every start signal.
    ///
    /// Segments are relative to the moment the host releases the line; past
    /// the last segment the line idles high.
    pub fn replaying(response: Vec<(PinState, u32)>) -> Self {
        let line = SimLine::default();
        line.0.borrow_mut().response = response;
        line
    }

    /// Line whose sensor answers with `frame`, bit widths per the datasheet.
    pub fn responding_with(frame: [u8; 5]) -> Self {
        Self::replaying(Waveform::handshake().frame(&frame).end())
    }

    pub fn now(&self) -> u32 {
        self.0.borrow().now
    }

    pub fn released_at(&self) -> Option<u32> {
        self.0.borrow().released_at
    }

    pub fn writes(&self) -> Vec<PinState> {
        self.0.borrow().writes.clone()
    }
}

/// Builder for sensor response waveforms.
pub struct Waveform(Vec<(PinState, u32)>);

impl Waveform {
    /// Response delay followed by the 80 µs low / 80 µs high acknowledge.
    pub fn handshake() -> Self {
        Waveform(vec![
            (PinState::High, RESPONSE_DELAY_US),
            (PinState::Low, ACK_US),
            (PinState::High, ACK_US),
        ])
    }

    /// One data bit with an explicit high pulse width.
    pub fn pulse(mut self, high_us: u32) -> Self {
        self.0.push((PinState::Low, BIT_LOW_US));
        self.0.push((PinState::High, high_us));
        self
    }

    pub fn bit(self, one: bool) -> Self {
        self.pulse(if one { ONE_HIGH_US } else { ZERO_HIGH_US })
    }

    /// The first `count` bits of `frame`, MSB first.
    pub fn bits(mut self, frame: &[u8; 5], count: usize) -> Self {
        for i in 0..count {
            let one = (frame[i / 8] >> (7 - i % 8)) & 1 == 1;
            self = self.bit(one);
        }
        self
    }

    pub fn frame(self, frame: &[u8; 5]) -> Self {
        self.bits(frame, 40)
    }

    /// Closing low pulse, after which the sensor lets the line idle.
    pub fn end(mut self) -> Vec<(PinState, u32)> {
        self.0.push((PinState::Low, BIT_LOW_US));
        self.0
    }

    /// Stops here and leaves the line idling high.
    pub fn cut(self) -> Vec<(PinState, u32)> {
        self.0
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut bus = self.0.borrow_mut();
        let level = bus.level();
        bus.now += 1;
        Ok(level == PinState::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        bus.driven_low = true;
        bus.writes.push(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        if bus.driven_low {
            bus.driven_low = false;
            bus.released_at = Some(bus.now);
        }
        bus.writes.push(PinState::High);
        Ok(())
    }
}

impl DelayNs for SimLine {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now += ns.div_ceil(1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().now += us;
    }
}

impl Monotonic for SimLine {
    fn now_us(&mut self) -> u32 {
        self.0.borrow().now
    }
}
