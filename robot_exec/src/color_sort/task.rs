//! Colour sort task, runs ColorSort against the hardware

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use embedded_hal::blocking::delay::DelayMs;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};

// Internal
use super::{ColorClass, ColorSort, InputData, SortEnable, SortSummary};
use hw_if::eqpt::{sensor::HueSensor, spinner::{SpinnerActuator, SpinnerDems}};
use util::{archive::Archived, module::State};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Owns the hue sensor and the two spinners and runs [`ColorSort`] on them
/// while the enable flag is set.
pub struct SortTask<S, T, B, D> {
    sort: ColorSort,
    sensor: S,
    top: T,
    bottom: B,
    delay: D,
    enable: SortEnable,
}

/// Result of a single enabled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOutcome {
    pub class: ColorClass,

    /// The demands which were sent to the spinners
    pub dems: SpinnerDems,

    /// How long the task waits before the next tick.
    ///
    /// Units: milliseconds
    pub hold_ms: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<S, T, B, D> SortTask<S, T, B, D>
where
    S: HueSensor,
    T: SpinnerActuator,
    B: SpinnerActuator,
    D: DelayMs<u32>,
{
    pub fn new(sort: ColorSort, sensor: S, top: T, bottom: B, delay: D, enable: SortEnable) -> Self {
        Self {
            sort,
            sensor,
            top,
            bottom,
            delay,
            enable,
        }
    }

    /// Enable or disable the task. Takes effect at the next tick.
    pub fn set_enabled(&self, enabled: bool) {
        self.enable.set(enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enable.is_enabled()
    }

    /// Sample the sensor once and command both spinners.
    ///
    /// Returns `None` without touching the sensor or spinners if the task is
    /// disabled.
    pub fn tick(&mut self) -> Option<SortOutcome> {
        if !self.enable.is_enabled() {
            return None;
        }

        let hue = self.sensor.read_hue();

        let (output, report) = match self.sort.proc(&InputData { hue }) {
            Ok(r) => r,
            Err(e) => match e {},
        };

        self.bottom.set_power(output.dems.bottom);
        self.top.set_power(output.dems.top);

        if let Err(e) = self.sort.write() {
            warn!("Could not archive colour sort decision: {}", e);
        }

        if report.class == ColorClass::Target {
            debug!("Target colour detected (hue {:.1}), holding for {} ms", hue, output.hold_ms);
        }

        Some(SortOutcome {
            class: report.class,
            dems: output.dems,
            hold_ms: output.hold_ms,
        })
    }

    /// Run until `shutdown` is raised.
    ///
    /// While enabled each tick is followed by the hold time it requested. While disabled the flag
    /// is re-checked every poll period, so re-enabling takes effect within one poll period.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        info!("Colour sort task started");

        while !shutdown.load(Ordering::Relaxed) {
            let hold_ms = match self.tick() {
                Some(outcome) => outcome.hold_ms,
                None => self.sort.policy().poll_period_ms,
            };

            self.delay.delay_ms(hold_ms);
        }

        info!("Colour sort task stopped");
    }

    pub fn summary(&self) -> SortSummary {
        self.sort.summary()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color_sort::SortPolicy;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Event {
        Read,
        Top(i32),
        Bottom(i32),
        Delay(u32),
    }

    type Log = Arc<Mutex<Vec<Event>>>;

    struct ScriptedSensor {
        hues: VecDeque<f64>,
        last: f64,
        log: Log,
    }

    struct Recorder {
        top: bool,
        log: Log,
    }

    struct HookDelay {
        count: usize,
        log: Log,
        hook: Box<dyn FnMut(usize)>,
    }

    impl HueSensor for ScriptedSensor {
        fn read_hue(&mut self) -> f64 {
            self.log.lock().unwrap().push(Event::Read);
            if let Some(h) = self.hues.pop_front() {
                self.last = h;
            }
            self.last
        }
    }

    impl SpinnerActuator for Recorder {
        fn set_power(&mut self, power: i32) {
            let e = if self.top { Event::Top(power) } else { Event::Bottom(power) };
            self.log.lock().unwrap().push(e);
        }
    }

    impl DelayMs<u32> for HookDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.log.lock().unwrap().push(Event::Delay(ms));
            (self.hook)(self.count);
            self.count += 1;
        }
    }

    fn task(
        hues: &[f64],
        enabled: bool,
        hook: Box<dyn FnMut(usize)>,
    ) -> (SortTask<ScriptedSensor, Recorder, Recorder, HookDelay>, Log) {
        let log: Log = Arc::new(Mutex::new(vec![]));

        let t = SortTask::new(
            ColorSort::new(SortPolicy::default()).unwrap(),
            ScriptedSensor { hues: hues.iter().copied().collect(), last: 0.0, log: log.clone() },
            Recorder { top: true, log: log.clone() },
            Recorder { top: false, log: log.clone() },
            HookDelay { count: 0, log: log.clone(), hook },
            SortEnable::new(enabled),
        );

        (t, log)
    }

    fn stop_after(n: usize, shutdown: Arc<AtomicBool>) -> Box<dyn FnMut(usize)> {
        Box::new(move |i| {
            if i + 1 >= n {
                shutdown.store(true, Ordering::Relaxed)
            }
        })
    }

    #[test]
    fn test_tick_target() {
        let (mut t, log) = task(&[200.0], true, Box::new(|_| ()));

        let outcome = t.tick().unwrap();
        assert_eq!(outcome.class, ColorClass::Target);
        assert_eq!(outcome.dems, SpinnerDems { top: 0, bottom: 0 });
        assert_eq!(outcome.hold_ms, 1000);

        assert_eq!(*log.lock().unwrap(), vec![Event::Read, Event::Bottom(0), Event::Top(0)]);
    }

    #[test]
    fn test_tick_boundary_is_other() {
        let (mut t, log) = task(&[150.0, 270.0], true, Box::new(|_| ()));

        for _ in 0..2 {
            let outcome = t.tick().unwrap();
            assert_eq!(outcome.class, ColorClass::Other);
            assert_eq!(outcome.dems, SpinnerDems { top: 127, bottom: 0 });
        }

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Event::Read, Event::Bottom(0), Event::Top(127),
                Event::Read, Event::Bottom(0), Event::Top(127),
            ]
        );
    }

    #[test]
    fn test_tick_idempotent() {
        let (mut t, _) = task(&[42.0, 42.0], true, Box::new(|_| ()));
        assert_eq!(t.tick(), t.tick());

        let (mut t, _) = task(&[220.0, 220.0], true, Box::new(|_| ()));
        assert_eq!(t.tick(), t.tick());
    }

    #[test]
    fn test_tick_disabled_is_silent() {
        let (mut t, log) = task(&[200.0], false, Box::new(|_| ()));

        assert_eq!(t.tick(), None);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_between_ticks() {
        let (mut t, log) = task(&[50.0], true, Box::new(|_| ()));

        assert!(t.tick().is_some());
        t.set_enabled(false);
        assert!(!t.is_enabled());
        assert_eq!(t.tick(), None);
        t.set_enabled(true);
        assert_eq!(t.tick().map(|o| o.class), Some(ColorClass::Other));

        // Nothing was read or commanded while disabled
        assert_eq!(log.lock().unwrap().len(), 6);
    }

    #[test]
    fn test_run_sequence() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (mut t, log) = task(&[200.0, 200.0, 50.0], true, stop_after(3, shutdown.clone()));

        t.run(&shutdown);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Event::Read, Event::Bottom(0), Event::Top(0), Event::Delay(1000),
                Event::Read, Event::Bottom(0), Event::Top(0), Event::Delay(1000),
                Event::Read, Event::Bottom(0), Event::Top(127), Event::Delay(10),
            ]
        );
        assert_eq!(t.summary().num_target, 2);
        assert_eq!(t.summary().num_other, 1);
    }

    #[test]
    fn test_run_disabled_commands_nothing() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (mut t, log) = task(&[200.0, 50.0, 300.0], false, stop_after(5, shutdown.clone()));

        t.run(&shutdown);

        assert_eq!(*log.lock().unwrap(), vec![Event::Delay(10); 5]);
    }

    #[test]
    fn test_run_reenable_within_one_poll() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let enable = SortEnable::new(true);

        let hook_enable = enable.clone();
        let hook_shutdown = shutdown.clone();
        let hook = Box::new(move |i: usize| match i {
            0 => hook_enable.set(false),
            2 => hook_enable.set(true),
            3 => hook_shutdown.store(true, Ordering::Relaxed),
            _ => (),
        });

        let (t, log) = task(&[50.0], true, hook);
        let mut t = SortTask { enable, ..t };

        t.run(&shutdown);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Event::Read, Event::Bottom(0), Event::Top(127), Event::Delay(10),
                Event::Delay(10),
                Event::Delay(10),
                Event::Read, Event::Bottom(0), Event::Top(127), Event::Delay(10),
            ]
        );
    }
}
