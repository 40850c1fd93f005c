//! Host-side fakes shared by the unit tests.
//!
//! - [`TestSurface`]: in-memory 240x320 `DrawTarget` that counts blits
//! - [`FailingSurface`]: `DrawTarget` whose every draw fails
//! - [`ScriptedSource`]: `DistanceSource` replaying fixed samples
//! - Sensor line fakes: trigger/delay recorders, scripted and clock-driven echo lines

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin, PinState};

use crate::colors::BLACK;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sensor::{Distance, DistanceSource, Echo, EchoPin, MicrosClock};

// =============================================================================
// Drawing Surfaces
// =============================================================================

/// Framebuffer-backed draw target the size of the real panel.
pub struct TestSurface {
    pixels: Vec<Rgb565>,
    /// Number of `fill_contiguous` calls (each buffer blit is one).
    pub blits: usize,
}

impl TestSurface {
    pub fn new() -> Self {
        Self {
            pixels: vec![BLACK; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            blits: 0,
        }
    }

    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Rgb565 {
        self.pixels[(y as u32 * SCREEN_WIDTH + x as u32) as usize]
    }

    /// Whether any pixel inside `area` differs from `background`.
    pub fn any_in(
        &self,
        area: Rectangle,
        background: Rgb565,
    ) -> bool {
        area.points().any(|p| self.pixel(p.x, p.y) != background)
    }

    fn set(
        &mut self,
        point: Point,
        color: Rgb565,
    ) {
        if self.bounding_box().contains(point) {
            self.pixels[(point.y as u32 * SCREEN_WIDTH + point.x as u32) as usize] = color;
        }
    }
}

impl OriginDimensions for TestSurface {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for TestSurface {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(
        &mut self,
        area: &Rectangle,
        colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.blits += 1;
        for (point, color) in area.points().zip(colors) {
            self.set(point, color);
        }
        Ok(())
    }

    // Solid fills (clears, rectangle edges) are not blits
    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        for point in area.points() {
            self.set(point, color);
        }
        Ok(())
    }
}

/// Error reported by [`FailingSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceFault;

/// Draw target that rejects every operation.
pub struct FailingSurface;

impl OriginDimensions for FailingSurface {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for FailingSurface {
    type Color = Rgb565;
    type Error = SurfaceFault;

    fn draw_iter<I>(
        &mut self,
        _pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        Err(SurfaceFault)
    }
}

/// Draw target that accepts text and solid fills but rejects every blit.
pub struct BlitFailingSurface(pub TestSurface);

impl OriginDimensions for BlitFailingSurface {
    fn size(&self) -> Size { self.0.size() }
}

impl DrawTarget for BlitFailingSurface {
    type Color = Rgb565;
    type Error = SurfaceFault;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let Ok(()) = self.0.draw_iter(pixels);
        Ok(())
    }

    fn fill_contiguous<I>(
        &mut self,
        _area: &Rectangle,
        _colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        Err(SurfaceFault)
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let Ok(()) = self.0.fill_solid(area, color);
        Ok(())
    }
}

// =============================================================================
// Distance Sources
// =============================================================================

/// Replays a fixed list of samples, then repeats the last one.
pub struct ScriptedSource {
    samples: VecDeque<Distance>,
    last: Distance,
    /// Number of `measure` calls so far.
    pub calls: usize,
}

impl ScriptedSource {
    pub fn new(cms: impl IntoIterator<Item = f32>) -> Self {
        Self {
            samples: cms.into_iter().map(Distance::from_cm).collect(),
            last: Distance::ZERO,
            calls: 0,
        }
    }
}

impl DistanceSource for ScriptedSource {
    fn measure(&mut self) -> Distance {
        self.calls += 1;
        if let Some(next) = self.samples.pop_front() {
            self.last = next;
        }
        self.last
    }
}

// =============================================================================
// Trigger Side
// =============================================================================

/// One recorded trigger-side action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    Low,
    High,
    DelayNs(u32),
}

/// Shared, ordered record of pin writes and delays.
#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<TraceEvent>>>);

impl Trace {
    pub fn events(&self) -> Vec<TraceEvent> { self.0.borrow().clone() }

    pub fn clear(&self) { self.0.borrow_mut().clear(); }

    fn record(
        &self,
        event: TraceEvent,
    ) {
        self.0.borrow_mut().push(event);
    }
}

/// Output pin that logs every write.
pub struct RecordingPin(Trace);

impl RecordingPin {
    pub fn new(trace: &Trace) -> Self { Self(trace.clone()) }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.record(TraceEvent::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.record(TraceEvent::High);
        Ok(())
    }
}

/// Delay that logs instead of sleeping.
pub struct RecordingDelay(Trace);

impl RecordingDelay {
    pub fn new(trace: &Trace) -> Self { Self(trace.clone()) }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        self.0.record(TraceEvent::DelayNs(ns));
    }
}

// =============================================================================
// Echo Side
// =============================================================================

/// Echo line returning pre-scripted results and recording each request.
pub struct ScriptedEcho {
    script: VecDeque<Echo>,
    requests: Vec<(PinState, u32)>,
}

impl ScriptedEcho {
    pub fn new(script: impl IntoIterator<Item = Echo>) -> Self {
        Self {
            script: script.into_iter().collect(),
            requests: Vec::new(),
        }
    }

    pub fn requests(&self) -> &[(PinState, u32)] { &self.requests }
}

impl EchoPin for ScriptedEcho {
    fn pulse_width(
        &mut self,
        level: PinState,
        timeout_us: u32,
    ) -> Echo {
        self.requests.push((level, timeout_us));
        self.script.pop_front().unwrap_or(Echo::Timeout)
    }
}

/// Microsecond clock that advances by 1 µs on every read.
#[derive(Clone, Default)]
pub struct FakeClock(Rc<Cell<u64>>);

impl FakeClock {
    pub fn new() -> Self { Self::default() }

    /// Current time without advancing.
    pub fn peek(&self) -> u64 { self.0.get() }
}

impl MicrosClock for FakeClock {
    fn now_us(&mut self) -> u64 {
        let now = self.0.get();
        self.0.set(now + 1);
        now
    }
}

/// Input line that is high during `[rise_us, fall_us)` on a [`FakeClock`].
pub struct PulseLine {
    clock: FakeClock,
    rise_us: u64,
    fall_us: u64,
    inverted: bool,
}

impl PulseLine {
    pub fn new(
        clock: &FakeClock,
        rise_us: u64,
        fall_us: u64,
    ) -> Self {
        Self {
            clock: clock.clone(),
            rise_us,
            fall_us,
            inverted: false,
        }
    }

    /// Low during the window and high outside it.
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }
}

impl ErrorType for PulseLine {
    type Error = Infallible;
}

impl InputPin for PulseLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let now = self.clock.peek();
        let in_window = now >= self.rise_us && now < self.fall_us;
        Ok(in_window != self.inverted)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> { self.is_high().map(|high| !high) }
}

/// Read failure reported by [`BrokenLine`].
#[derive(Debug)]
pub struct LineFault;

impl digital::Error for LineFault {
    fn kind(&self) -> ErrorKind { ErrorKind::Other }
}

/// Input line that can never be read.
pub struct BrokenLine;

impl ErrorType for BrokenLine {
    type Error = LineFault;
}

impl InputPin for BrokenLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> { Err(LineFault) }

    fn is_low(&mut self) -> Result<bool, Self::Error> { Err(LineFault) }
}
