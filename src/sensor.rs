//! HC-SR04 ultrasonic range sensor.
//!
//! A measurement is one trigger/echo cycle:
//!
//! 1. Drive the trigger line low for 2 µs, high for 10 µs, then low again
//! 2. Time how long the echo line stays high, giving up after [`ECHO_TIMEOUT_US`]
//! 3. Convert the round trip to centimeters (343 m/s, halved)
//! 4. Clamp: above 400 cm reads 400, below 2 cm reads 0
//!
//! There are no retries. A cycle without an echo is one sample at maximum
//! range and the next cycle simply measures again.
//!
//! # Hardware Abstraction
//!
//! The trigger pin and the microsecond delay are `embedded-hal` 1.0 traits.
//! The echo side is [`EchoPin`], which any HAL can implement directly (the
//! simulator does) or get from [`PolledEcho`] by supplying an `InputPin` and a
//! [`MicrosClock`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::config::{
    ECHO_TIMEOUT_US,
    SENSOR_MAX_CM,
    SENSOR_MIN_CM,
    SPEED_OF_SOUND_CM_PER_US,
    TRIGGER_PULSE_US,
    TRIGGER_SETTLE_US,
};

// =============================================================================
// Distance Sample
// =============================================================================

/// A clamped distance reading, stored in centimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Distance(f32);

impl Distance {
    /// Zero distance. Also what a too-close reading reports.
    pub const ZERO: Self = Self(0.0);

    /// The sensor's maximum range. Also what a missing echo reports.
    pub const MAX: Self = Self(SENSOR_MAX_CM);

    /// Build a sample from centimeters, applying the sensor clamping policy.
    pub fn from_cm(cm: f32) -> Self {
        if cm > SENSOR_MAX_CM {
            Self::MAX
        } else if cm < SENSOR_MIN_CM || cm.is_nan() {
            Self::ZERO
        } else {
            Self(cm)
        }
    }

    /// Convert an echo pulse width (round trip) to a clamped distance.
    pub fn from_round_trip_us(width_us: u32) -> Self {
        Self::from_cm(width_us as f32 * SPEED_OF_SOUND_CM_PER_US / 2.0)
    }

    /// Convert an echo measurement to a clamped distance.
    ///
    /// No echo within the timeout means nothing reflected within range.
    pub fn from_echo(echo: Echo) -> Self {
        match echo {
            Echo::Pulse { width_us } => Self::from_round_trip_us(width_us),
            Echo::Timeout => Self::MAX,
        }
    }

    /// Distance in centimeters.
    #[inline]
    pub const fn cm(self) -> f32 { self.0 }

    /// Distance in millimeters (display unit).
    #[inline]
    pub fn mm(self) -> f32 { self.0 * 10.0 }
}

// =============================================================================
// Echo Measurement
// =============================================================================

/// Result of timing one pulse on the echo line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Echo {
    /// The line held the level for this many microseconds.
    Pulse { width_us: u32 },
    /// No complete pulse before the timeout.
    Timeout,
}

impl Echo {
    /// The echo an ideal sensor returns for an object `cm` away.
    ///
    /// Objects far enough that the round trip exceeds [`ECHO_TIMEOUT_US`]
    /// produce [`Echo::Timeout`].
    pub fn round_trip(cm: f32) -> Self {
        let width_us = cm.max(0.0) * 2.0 / SPEED_OF_SOUND_CM_PER_US;
        if width_us >= ECHO_TIMEOUT_US as f32 {
            Self::Timeout
        } else {
            Self::Pulse {
                width_us: width_us as u32,
            }
        }
    }
}

/// An input line whose pulses can be timed.
pub trait EchoPin {
    /// Time the next pulse at `level`.
    ///
    /// Returns [`Echo::Timeout`] if no complete pulse is seen within
    /// `timeout_us` of the call. Must never block longer than that.
    fn pulse_width(
        &mut self,
        level: PinState,
        timeout_us: u32,
    ) -> Echo;
}

/// Free-running microsecond counter used to time echo pulses.
pub trait MicrosClock {
    /// Microseconds since an arbitrary fixed origin. Must not go backwards.
    fn now_us(&mut self) -> u64;
}

/// [`EchoPin`] that busy-polls an `InputPin` against a [`MicrosClock`].
///
/// Semantics match Arduino `pulseIn`: a pulse already in progress at the call
/// is skipped, then the next pulse is timed from its leading to its trailing
/// edge. The timeout covers the whole wait. A line that cannot be read is
/// treated as silent.
pub struct PolledEcho<P, C> {
    pin: P,
    clock: C,
}

impl<P, C> PolledEcho<P, C>
where
    P: InputPin,
    C: MicrosClock,
{
    /// Wrap an input pin and a clock.
    pub const fn new(
        pin: P,
        clock: C,
    ) -> Self {
        Self { pin, clock }
    }

    /// Give back the pin and the clock.
    pub fn release(self) -> (P, C) { (self.pin, self.clock) }

    /// Whether the line is at `level`, or `None` if it cannot be read.
    fn is_at(
        &mut self,
        level: PinState,
    ) -> Option<bool> {
        self.pin.is_high().ok().map(|high| high == (level == PinState::High))
    }

    /// Spin until the line's "at level" state equals `want`.
    ///
    /// Returns the time the state was observed, or `None` on timeout or a read error.
    fn wait_for(
        &mut self,
        level: PinState,
        want: bool,
        start_us: u64,
        timeout_us: u32,
    ) -> Option<u64> {
        loop {
            if self.is_at(level)? == want {
                return Some(self.clock.now_us());
            }
            if self.clock.now_us().saturating_sub(start_us) >= u64::from(timeout_us) {
                return None;
            }
        }
    }
}

impl<P, C> EchoPin for PolledEcho<P, C>
where
    P: InputPin,
    C: MicrosClock,
{
    fn pulse_width(
        &mut self,
        level: PinState,
        timeout_us: u32,
    ) -> Echo {
        let start = self.clock.now_us();

        let edges = self.wait_for(level, false, start, timeout_us).and_then(|_| {
            let leading = self.wait_for(level, true, start, timeout_us)?;
            let trailing = self.wait_for(level, false, start, timeout_us)?;
            Some((leading, trailing))
        });

        match edges {
            Some((leading, trailing)) => Echo::Pulse {
                width_us: u32::try_from(trailing.saturating_sub(leading)).unwrap_or(u32::MAX),
            },
            None => Echo::Timeout,
        }
    }
}

// =============================================================================
// Range Sensor
// =============================================================================

/// Anything that produces one distance sample per call.
///
/// This is the seam the scheduler drives, so it can run against a real
/// sensor, the simulator or a test double.
pub trait DistanceSource {
    /// Take one measurement. Never fails; out-of-range and missing echoes are
    /// folded into the clamped value.
    fn measure(&mut self) -> Distance;
}

impl<S: DistanceSource + ?Sized> DistanceSource for &mut S {
    fn measure(&mut self) -> Distance { S::measure(self) }
}

/// HC-SR04 driver: trigger output, echo input and a microsecond delay.
pub struct RangeSensor<T, E, D> {
    trigger: T,
    echo: E,
    delay: D,
    timeout_us: u32,
}

impl<T, E, D> RangeSensor<T, E, D>
where
    T: OutputPin,
    E: EchoPin,
    D: DelayNs,
{
    /// Create a sensor using the default echo timeout.
    ///
    /// The trigger line is driven low immediately so the first pulse has a
    /// clean rising edge.
    pub fn new(
        trigger: T,
        echo: E,
        delay: D,
    ) -> Self {
        Self::with_timeout(trigger, echo, delay, ECHO_TIMEOUT_US)
    }

    /// Create a sensor with a custom echo timeout in microseconds.
    pub fn with_timeout(
        mut trigger: T,
        echo: E,
        delay: D,
        timeout_us: u32,
    ) -> Self {
        // A failed write shows up as a timed-out echo on the next measurement
        trigger.set_low().ok();
        Self {
            trigger,
            echo,
            delay,
            timeout_us,
        }
    }

    /// Emit the low-settle + 10 µs high trigger pulse.
    pub fn fire_trigger(&mut self) {
        self.trigger.set_low().ok();
        self.delay.delay_us(TRIGGER_SETTLE_US);
        self.trigger.set_high().ok();
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().ok();
    }

    /// Run one trigger/echo cycle and return the raw echo.
    pub fn measure_echo(&mut self) -> Echo {
        self.fire_trigger();
        self.echo.pulse_width(PinState::High, self.timeout_us)
    }

    /// Echo timeout in microseconds.
    #[inline]
    pub const fn timeout_us(&self) -> u32 { self.timeout_us }

    /// The trigger pin.
    #[inline]
    pub const fn trigger(&self) -> &T { &self.trigger }

    /// Access the echo line (e.g. to steer a simulated sensor).
    #[inline]
    pub fn echo_mut(&mut self) -> &mut E { &mut self.echo }

    /// Give back the trigger pin, echo line and delay.
    pub fn release(self) -> (T, E, D) { (self.trigger, self.echo, self.delay) }
}

impl<T, E, D> DistanceSource for RangeSensor<T, E, D>
where
    T: OutputPin,
    E: EchoPin,
    D: DelayNs,
{
    fn measure(&mut self) -> Distance { Distance::from_echo(self.measure_echo()) }
}

// =============================================================================
// Tests
// =============================================================================
