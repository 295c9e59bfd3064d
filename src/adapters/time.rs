//! Monotonic clock adapter.
//!
//! - **`feature = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer and sleeps through FreeRTOS so other
//!   tasks (WiFi, MQTT) keep running.
//! - **host**: uses `std::time::Instant` for tests and simulation.
//!
//! Milliseconds are truncated to `u32` and wrap after ~49.7 days; every
//! consumer compares timestamps with `wrapping_sub`.

use crate::app::ports::Clock;

pub struct MonotonicClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot.
    #[cfg(feature = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time has no preconditions once the IDF is up.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since the clock was created.
    #[cfg(not(feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        (self.uptime_us() / 1000) as u32
    }

    #[cfg(feature = "espidf")]
    fn sleep_ms(&self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(feature = "espidf"))]
    fn sleep_ms(&self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
