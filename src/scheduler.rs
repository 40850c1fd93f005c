//! Non-blocking measure/display/wait cycle.
//!
//! # State Machine
//!
//! ```text
//!            measure()               update_reading()
//! ReadingSensor ──────► UpdatingDisplay ──────────► Waiting { since }
//!       ▲                                              │
//!       └──────────── now - since >= interval ─────────┘
//! ```
//!
//! Each [`UpdateScheduler::step`] call does the work of exactly one phase and
//! returns immediately. Waiting never sleeps: it compares the clock and either
//! stays put or moves on, so the caller's loop stays responsive. The interval
//! runs from the end of a display update, so the real period is the interval
//! plus measurement and drawing time.

use core::fmt;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::config::UPDATE_INTERVAL_MS;
use crate::meter::MeterRenderer;
use crate::sensor::{Distance, DistanceSource};

// =============================================================================
// Phases
// =============================================================================

/// Where the cycle currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Next step takes a measurement.
    ReadingSensor,
    /// Next step shows the stored measurement.
    UpdatingDisplay,
    /// Idle since the given clock value (ms).
    Waiting { since_ms: u64 },
}

impl Phase {
    /// The phase after one step at `now_ms`.
    pub const fn next(
        self,
        now_ms: u64,
        interval_ms: u64,
    ) -> Self {
        match self {
            Self::ReadingSensor => Self::UpdatingDisplay,
            Self::UpdatingDisplay => Self::Waiting { since_ms: now_ms },
            Self::Waiting { since_ms } => {
                if now_ms.saturating_sub(since_ms) >= interval_ms {
                    Self::ReadingSensor
                } else {
                    self
                }
            }
        }
    }
}

// =============================================================================
// Step Events
// =============================================================================

/// What a single [`UpdateScheduler::step`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// A measurement was taken.
    Measured(Distance),
    /// The reading was shown. `gauge_repainted` is false when only the text changed.
    Displayed { gauge_repainted: bool },
    /// Still inside the interval.
    Waiting,
    /// The interval elapsed. The next step measures.
    Resumed,
}

impl fmt::Display for Step {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Measured(distance) => write!(f, "Measured {:.1} cm", distance.cm()),
            Self::Displayed { gauge_repainted: true } => f.write_str("Displayed, gauge redrawn"),
            Self::Displayed { gauge_repainted: false } => f.write_str("Displayed, text only"),
            Self::Waiting => f.write_str("Waiting"),
            Self::Resumed => f.write_str("Resumed"),
        }
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Drives a [`DistanceSource`] and a [`MeterRenderer`] through the cycle.
pub struct UpdateScheduler<S> {
    source: S,
    meter: MeterRenderer,
    phase: Phase,
    sample: Distance,
    interval_ms: u64,
}

impl<S: DistanceSource> UpdateScheduler<S> {
    /// Scheduler with the default refresh interval.
    pub const fn new(source: S) -> Self { Self::with_interval(source, UPDATE_INTERVAL_MS) }

    /// Scheduler with a custom refresh interval in milliseconds.
    pub const fn with_interval(
        source: S,
        interval_ms: u64,
    ) -> Self {
        Self {
            source,
            meter: MeterRenderer::new(),
            phase: Phase::ReadingSensor,
            sample: Distance::ZERO,
            interval_ms,
        }
    }

    /// Show the boot message.
    pub fn show_boot_screen<D>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.meter.draw_boot_screen(display)
    }

    /// Draw the static meter and restart the cycle with a measurement.
    pub fn begin<D>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.phase = Phase::ReadingSensor;
        self.meter.draw_frame(display)
    }

    /// Do the current phase's work and advance.
    ///
    /// The phase advances even when drawing fails, so a flaky display never
    /// stalls measurement. The error is still returned for logging.
    pub fn step<D>(
        &mut self,
        now_ms: u64,
        display: &mut D,
    ) -> Result<Step, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let current = self.phase;
        self.phase = current.next(now_ms, self.interval_ms);

        match current {
            Phase::ReadingSensor => {
                self.sample = self.source.measure();
                Ok(Step::Measured(self.sample))
            }
            Phase::UpdatingDisplay => {
                let gauge_repainted = self.meter.update_reading(display, self.sample)?;
                Ok(Step::Displayed { gauge_repainted })
            }
            Phase::Waiting { .. } if self.phase == Phase::ReadingSensor => Ok(Step::Resumed),
            Phase::Waiting { .. } => Ok(Step::Waiting),
        }
    }

    /// Current phase.
    #[inline]
    pub const fn phase(&self) -> Phase { self.phase }

    /// Most recent measurement.
    #[inline]
    pub const fn sample(&self) -> Distance { self.sample }

    /// Refresh interval in milliseconds.
    #[inline]
    pub const fn interval_ms(&self) -> u64 { self.interval_ms }

    /// The meter renderer.
    #[inline]
    pub const fn meter(&self) -> &MeterRenderer { &self.meter }

    /// The distance source (e.g. to steer a simulated sensor).
    #[inline]
    pub fn source_mut(&mut self) -> &mut S { &mut self.source }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingSurface, ScriptedSource, SurfaceFault, TestSurface};

    // -------------------------------------------------------------------------
    // Transition function
    // -------------------------------------------------------------------------

    #[test]
    fn test_phase_cycle() {
        let p = Phase::ReadingSensor.next(0, 250);
        assert_eq!(p, Phase::UpdatingDisplay);
        let p = p.next(1000, 250);
        assert_eq!(p, Phase::Waiting { since_ms: 1000 });
        assert_eq!(p.next(1249, 250), p);
        assert_eq!(p.next(1250, 250), Phase::ReadingSensor);
    }

    #[test]
    fn test_waiting_tolerates_clock_behind_start() {
        let p = Phase::Waiting { since_ms: 500 };
        assert_eq!(p.next(400, 250), p);
    }

    // -------------------------------------------------------------------------
    // Scheduler
    // -------------------------------------------------------------------------

    #[test]
    fn test_two_steps_reach_waiting() {
        let mut surface = TestSurface::new();
        let mut scheduler = UpdateScheduler::new(ScriptedSource::new([50.0]));
        scheduler.begin(&mut surface).ok();

        assert_eq!(scheduler.step(0, &mut surface), Ok(Step::Measured(Distance::from_cm(50.0))));
        assert_eq!(scheduler.phase(), Phase::UpdatingDisplay);
        assert_eq!(scheduler.step(10, &mut surface), Ok(Step::Displayed { gauge_repainted: true }));
        assert_eq!(scheduler.phase(), Phase::Waiting { since_ms: 10 });
    }

    #[test]
    fn test_no_measurement_before_interval() {
        let mut surface = TestSurface::new();
        let mut scheduler = UpdateScheduler::new(ScriptedSource::new([50.0, 60.0]));
        assert_eq!(scheduler.interval_ms(), UPDATE_INTERVAL_MS);
        scheduler.begin(&mut surface).ok();
        scheduler.step(0, &mut surface).ok();
        scheduler.step(0, &mut surface).ok();

        for now in [1, 100, 200, 249] {
            assert_eq!(scheduler.step(now, &mut surface), Ok(Step::Waiting));
        }
        assert_eq!(scheduler.source_mut().calls, 1);

        assert_eq!(scheduler.step(250, &mut surface), Ok(Step::Resumed));
        assert_eq!(scheduler.phase(), Phase::ReadingSensor);
        assert_eq!(scheduler.step(251, &mut surface), Ok(Step::Measured(Distance::from_cm(60.0))));
        assert_eq!(scheduler.source_mut().calls, 2);
    }

    #[test]
    fn test_interval_counts_from_display_update() {
        let mut surface = TestSurface::new();
        let mut scheduler = UpdateScheduler::with_interval(ScriptedSource::new([10.0]), 100);
        assert_eq!(scheduler.interval_ms(), 100);
        scheduler.step(0, &mut surface).ok();
        scheduler.step(40, &mut surface).ok();

        assert_eq!(scheduler.step(139, &mut surface), Ok(Step::Waiting));
        assert_eq!(scheduler.step(140, &mut surface), Ok(Step::Resumed));
    }

    #[test]
    fn test_repeat_reading_skips_gauge() {
        let mut surface = TestSurface::new();
        let mut scheduler = UpdateScheduler::new(ScriptedSource::new([70.0, 70.5]));
        scheduler.begin(&mut surface).ok();

        let mut now = 0;
        let mut displayed = Vec::new();
        while displayed.len() < 2 {
            if let Ok(Step::Displayed { gauge_repainted }) = scheduler.step(now, &mut surface) {
                displayed.push(gauge_repainted);
            }
            now += 10;
        }
        assert_eq!(displayed, vec![true, false]);
        assert_eq!(scheduler.meter().displayed_cm(), Some(70.0));
    }

    #[test]
    fn test_display_error_still_advances() {
        let mut scheduler = UpdateScheduler::new(ScriptedSource::new([30.0]));
        scheduler.step(0, &mut FailingSurface).ok();

        assert_eq!(scheduler.step(5, &mut FailingSurface), Err(SurfaceFault));
        assert_eq!(scheduler.phase(), Phase::Waiting { since_ms: 5 });
        assert_eq!(scheduler.sample(), Distance::from_cm(30.0));
    }

    #[test]
    fn test_begin_restarts_cycle() {
        let mut surface = TestSurface::new();
        let mut scheduler = UpdateScheduler::new(ScriptedSource::new([30.0]));
        scheduler.step(0, &mut surface).ok();
        scheduler.step(0, &mut surface).ok();

        scheduler.begin(&mut surface).ok();
        assert_eq!(scheduler.phase(), Phase::ReadingSensor);
        assert_eq!(scheduler.meter().displayed_cm(), None);
    }

    #[test]
    fn test_step_display_text() {
        assert_eq!(Step::Measured(Distance::from_cm(12.34)).to_string(), "Measured 12.3 cm");
        assert_eq!(Step::Displayed { gauge_repainted: false }.to_string(), "Displayed, text only");
        assert_eq!(Step::Resumed.to_string(), "Resumed");
    }
}
