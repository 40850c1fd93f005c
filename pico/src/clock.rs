//! Microsecond clock for echo timing.

use distance_meter::MicrosClock;
use embassy_time::Instant;

/// [`MicrosClock`] backed by the embassy time driver (1 MHz tick on the RP2350).
pub struct EmbassyMicros;

impl MicrosClock for EmbassyMicros {
    fn now_us(&mut self) -> u64 { Instant::now().as_micros() }
}
