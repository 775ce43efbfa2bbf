//! Blocking delay for the host

use embedded_hal::blocking::delay::DelayMs;
use std::thread;
use std::time::Duration;

/// Delay which puts the calling thread to sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayMs<u32> for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64))
    }
}
