//! HC-SR04 Distance Meter simulator for desktop.
//!
//! Runs the same scheduler, sensor driver and renderer as the Pico firmware
//! against an SDL window and a simulated sensor.
//!
//! # Controls
//!
//! - `S`: toggle the automatic sweep (0-450 cm) / manual target
//! - `Up` / `Down`: move the manual target by 5 cm
//! - `T`: toggle echo dropout (every read times out)
//! - `L`: switch between the meter and the event log
//!
//! The meter is always rendered to its own off-screen display, so measuring
//! and drawing keep running while the log page is shown.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

mod log_page;
mod sim_sensor;

use std::thread;
use std::time::{Duration, Instant};

use distance_meter::config::{BOOT_SCREEN_MS, SCREEN_HEIGHT, SCREEN_WIDTH};
use distance_meter::{EventLog, RangeSensor, Step, UpdateScheduler};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

use crate::log_page::{SensorStatus, draw_log_page};
use crate::sim_sensor::{MANUAL_STEP_CM, SimDelay, SimEcho, SimTrigger, sweep_target_cm};

/// Main loop frame budget, ~50 FPS.
const FRAME_TIME: Duration = Duration::from_millis(20);

type SimSensor = RangeSensor<SimTrigger, SimEcho, SimDelay>;

fn main() {
    let size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let mut meter_display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(size);
    let mut log_display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(size);
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("HC-SR04 Distance Meter", &output_settings);

    let sensor: SimSensor = RangeSensor::new(SimTrigger::default(), SimEcho::new(0.0), SimDelay);
    let mut scheduler = UpdateScheduler::new(sensor);
    let mut log = EventLog::new();
    let started = Instant::now();

    // Boot message, window stays responsive while it is up
    scheduler.show_boot_screen(&mut meter_display).ok();
    log.push(0, "Initialising...");
    if !hold_screen(&mut window, &meter_display, Duration::from_millis(BOOT_SCREEN_MS)) {
        return;
    }

    scheduler.begin(&mut meter_display).ok();
    log.push(elapsed_ms(started), "Meter ready");

    // ==========================================================================
    // Main Loop State
    // ==========================================================================

    let mut show_log = false;
    let mut sweeping = true;
    let mut log_dirty = true;

    // ==========================================================================
    // Main Loop
    // ==========================================================================

    loop {
        let frame_start = Instant::now();
        let now_ms = elapsed_ms(started);

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    let echo = scheduler.source_mut().echo_mut();
                    match keycode {
                        // Holding the arrows keeps moving the target
                        Keycode::Up if !sweeping => echo.nudge(MANUAL_STEP_CM),
                        Keycode::Down if !sweeping => echo.nudge(-MANUAL_STEP_CM),
                        _ if repeat => {}
                        Keycode::S => {
                            sweeping = !sweeping;
                            log.push(now_ms, if sweeping { "Sweep on" } else { "Manual target" });
                        }
                        Keycode::T => {
                            let dropout = echo.toggle_dropout();
                            log.push(now_ms, if dropout { "Echo dropout on" } else { "Echo dropout off" });
                        }
                        Keycode::L => show_log = !show_log,
                        _ => {}
                    }
                    log_dirty = true;
                }
                _ => {}
            }
        }

        if sweeping {
            scheduler.source_mut().echo_mut().set_target(sweep_target_cm(now_ms));
        }

        let Ok(step) = scheduler.step(now_ms, &mut meter_display);
        if matches!(step, Step::Measured(_) | Step::Displayed { gauge_repainted: true }) {
            log.push_fmt(now_ms, format_args!("{step}"));
            log_dirty = true;
        }

        if show_log {
            if log_dirty {
                draw_log_page(&mut log_display, &log, &sensor_status(&mut scheduler, sweeping));
                log_dirty = false;
            }
            window.update(&log_display);
        } else {
            window.update(&meter_display);
        }

        // Sleep off the rest of the frame
        let spent = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(spent) {
            thread::sleep(remaining);
        }
    }
}

/// Keep showing `display` for `duration` while pumping window events.
///
/// Returns `false` if the window was closed.
fn hold_screen(
    window: &mut Window,
    display: &SimulatorDisplay<Rgb565>,
    duration: Duration,
) -> bool {
    let start = Instant::now();
    while start.elapsed() < duration {
        window.update(display);
        if window.events().any(|ev| matches!(ev, SimulatorEvent::Quit)) {
            return false;
        }
        thread::sleep(FRAME_TIME);
    }
    true
}

fn sensor_status(
    scheduler: &mut UpdateScheduler<SimSensor>,
    sweeping: bool,
) -> SensorStatus {
    let echo = scheduler.source_mut().echo_mut();
    let (target_cm, dropout) = (echo.target_cm(), echo.dropout());
    SensorStatus {
        sweeping,
        target_cm,
        dropout,
        pings: scheduler.source_mut().trigger().pulses(),
    }
}

fn elapsed_ms(since: Instant) -> u64 { u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX) }
