//! DHT11 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT11 temperature
//! and humidity sensor, built on top of the [`embedded-hal`] traits.
//!
//! The DHT11 talks over a single open-drain data line: the host pulls it low
//! to request a measurement, the sensor acknowledges and then sends 40 bits
//! whose values are encoded in the width of each high pulse. The last byte is
//! a checksum of the first four.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for the start signal
//!
//! and on a [`Monotonic`] microsecond counter to measure pulse widths.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//! - `std`: Adds [`StdClock`](clock::StdClock) and `std::error::Error` impls
//! - `critical-section`: Receives the sensor response with interrupts disabled.
//!   The binary must provide a `critical-section` implementation; the test
//!   suite uses the `std` one, so run it as `cargo test --features critical-section`
//!   as well as plain `cargo test`.
//!
//! # Usage
//!
//! ```ignore
//! let line = Line::init(pin, timer)?;
//! let mut dht = Dht11::new(line, delay);
//!
//! loop {
//!     match dht.read() {
//!         Ok(Reading { temperature, humidity }) => report(temperature, humidity),
//!         Err(DhtError::Timeout) => { /* sensor missing or glitch, try next cycle */ }
//!         Err(e) => { /* checksum or pin error */ }
//!     }
//!     sleep_ms(dht11_sensor::dht11::MIN_READ_INTERVAL_MS);
//! }
//! ```
//!
//! A transaction is not reentrant. `read` takes `&mut self`, so share a
//! driver between tasks only behind a mutex.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod clock;
pub mod dht11;
pub mod error;
pub mod line;

#[cfg(test)]
mod sim;

pub use clock::Monotonic;
pub use dht11::{Dht11, Reading};
pub use error::{ConfigurationError, DhtError, ReadError};
pub use line::Line;
