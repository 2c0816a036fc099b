/// Free-running microsecond counter used to time pulse widths.
///
/// The counter only has to be monotonic between two reads taken during the
/// same wait. It may wrap; the driver measures elapsed time with wrapping
/// subtraction, so a 32-bit hardware timer is enough.
pub trait Monotonic {
    /// Current counter value in microseconds.
    fn now_us(&mut self) -> u32;
}

impl<C: Monotonic + ?Sized> Monotonic for &mut C {
    fn now_us(&mut self) -> u32 {
        C::now_us(self)
    }
}

/// [`Monotonic`] clock backed by [`std::time::Instant`], for hosted targets.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Creates a clock counting from now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Monotonic for StdClock {
    fn now_us(&mut self) -> u32 {
        // Truncation is the wrap-around.
        self.origin.elapsed().as_micros() as u32
    }
}
