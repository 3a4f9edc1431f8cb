//! The two 32-bit down counting timers.

use bitos::{
    bitos,
    integer::{u2, u3},
};
use strum::FromRepr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRepr)]
#[repr(u8)]
pub enum CountMode {
    #[default]
    Single = 0,
    AutoRestart = 1,
    FreeRunning = 2,
    EventCount = 3,
}

/// `TIMERx_CFG`.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerConfig {
    #[bits(0..2)]
    pub scale: u2,
    #[bits(2..5)]
    pub count_mode: u3,
    #[bits(8)]
    pub pause: bool,
    #[bits(9)]
    pub update_mmio: bool,
    #[bits(10)]
    pub restart: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Timer {
    pub config: TimerConfig,
    pub start_low: u16,
    pub start_high: u16,
    pub counter: u32,
    pub counter_low: u16,
    pub counter_high: u16,
}

impl Timer {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn count_mode(&self) -> CountMode {
        let mode = self.config.count_mode().value();
        CountMode::from_repr(mode).unwrap_or_else(|| {
            tracing::warn!("unknown timer count mode {mode}");
            CountMode::Single
        })
    }

    fn start(&self) -> u32 {
        self.start_low as u32 | ((self.start_high as u32) << 16)
    }

    fn update_mmio(&mut self) {
        if self.config.update_mmio() {
            self.counter_high = (self.counter >> 16) as u16;
            self.counter_low = self.counter as u16;
        }
    }

    /// Writes `TIMERx_CFG`. A set restart bit reloads the counter immediately.
    pub fn write_config(&mut self, value: u16) {
        self.config = TimerConfig::from_bits(value).with_restart(false);
        if TimerConfig::from_bits(value).restart() {
            self.restart();
        }
    }

    pub fn restart(&mut self) {
        if self.count_mode() != CountMode::FreeRunning {
            self.counter = self.start();
            self.update_mmio();
        }
    }

    /// Advances the timer by one cycle. Returns whether it fired.
    pub fn tick(&mut self) -> bool {
        if self.config.pause() {
            return false;
        }

        match self.count_mode() {
            CountMode::EventCount => false,
            mode if self.counter == 0 => {
                match mode {
                    CountMode::AutoRestart => self.restart(),
                    CountMode::FreeRunning => {
                        self.counter = u32::MAX;
                        self.update_mmio();
                    }
                    _ => (),
                }

                false
            }
            _ => {
                self.counter -= 1;
                self.update_mmio();
                self.counter == 0
            }
        }
    }

    /// Counts one external event. Returns whether the timer fired.
    pub fn tick_event(&mut self) -> bool {
        if self.config.pause() || self.count_mode() != CountMode::EventCount || self.counter == 0 {
            return false;
        }

        self.counter -= 1;
        self.update_mmio();
        self.counter == 0
    }

    /// How many cycles can pass without the timer firing.
    pub fn max_skip(&self) -> u64 {
        if self.config.pause() {
            return u64::MAX;
        }

        match self.count_mode() {
            CountMode::EventCount => u64::MAX,
            CountMode::AutoRestart if self.counter == 0 => self.start() as u64,
            CountMode::FreeRunning if self.counter == 0 => u32::MAX as u64,
            CountMode::Single if self.counter == 0 => u64::MAX,
            _ => self.counter as u64 - 1,
        }
    }

    pub fn skip(&mut self, ticks: u64) {
        if ticks == 0 || self.config.pause() {
            return;
        }

        let mode = self.count_mode();
        if mode == CountMode::EventCount {
            return;
        }

        if self.counter == 0 {
            let reload = match mode {
                CountMode::AutoRestart => self.start(),
                CountMode::FreeRunning => u32::MAX,
                _ => return,
            };

            self.counter = reload - (ticks as u32 - 1);
        } else {
            self.counter -= ticks as u32;
        }

        self.update_mmio();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn timer(mode: CountMode, start: u32) -> Timer {
        let mut timer = Timer::default();
        timer.config = TimerConfig::default()
            .with_count_mode(u3::new(mode as u8))
            .with_update_mmio(true);
        timer.start_low = start as u16;
        timer.start_high = (start >> 16) as u16;
        timer
    }

    #[test]
    fn single_fires_once() {
        let mut timer = timer(CountMode::Single, 3);
        timer.restart();
        assert_eq!(timer.counter_low, 3);

        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!((0..10).all(|_| !timer.tick()));
        assert_eq!(timer.max_skip(), u64::MAX);
    }

    #[test]
    fn auto_restart_reloads() {
        let mut timer = timer(CountMode::AutoRestart, 2);
        timer.restart();

        let fired: Vec<bool> = (0..6).map(|_| timer.tick()).collect();
        assert_eq!(fired, [false, true, false, false, true, false]);
    }

    #[test]
    fn free_running_wraps() {
        let mut timer = timer(CountMode::FreeRunning, 0);
        timer.tick();
        assert_eq!(timer.counter, u32::MAX);
        assert_eq!(timer.counter_high, 0xFFFF);
    }

    #[test]
    fn event_count_ignores_cycles() {
        let mut timer = timer(CountMode::EventCount, 2);
        timer.restart();
        assert!(!timer.tick());
        assert_eq!(timer.counter, 2);
        assert!(!timer.tick_event());
        assert!(timer.tick_event());
    }

    #[test]
    fn skip_matches_ticks() {
        let mut skipped = timer(CountMode::AutoRestart, 100);
        let mut ticked = skipped.clone();
        skipped.restart();
        ticked.restart();

        let max = skipped.max_skip();
        assert_eq!(max, 99);
        skipped.skip(max);
        for _ in 0..max {
            assert!(!ticked.tick());
        }

        assert_eq!(skipped.counter, ticked.counter);
        assert!(skipped.tick());
    }

    #[test]
    fn config_restart_bit() {
        let mut timer = timer(CountMode::Single, 0x12345);
        let config = timer.config.with_restart(true).to_bits();
        timer.write_config(config);
        assert_eq!(timer.counter, 0x12345);
        assert!(!timer.config.restart());
    }
}
