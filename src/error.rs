/// Possible errors from a DHT11 transaction.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DhtError<E> {
    /// Timed out waiting for a pin state change.
    #[error("timed out waiting for the sensor")]
    Timeout,
    /// Checksum did not match the received data.
    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch {
        /// Truncated sum of the four data bytes.
        expected: u8,
        /// Checksum byte sent by the sensor.
        actual: u8,
    },
    /// Error from the GPIO pin (input/output).
    #[error("pin error: {0:?}")]
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

/// Error returned by [`Dht11::read`](crate::Dht11::read).
pub type ReadError<E> = DhtError<E>;

/// The platform rejected the pin setup for the data line.
///
/// Fatal for that pin; the driver never retries configuration.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("pin configuration rejected: {0:?}")]
pub struct ConfigurationError<E>(pub E);
