//! Audio serial ports.
//!
//! The DSP fills a small transmit queue with interleaved stereo samples. Frames leave the queue
//! either on the port's own transmit clock or whenever the host drives [`Btdmp::sample_clock`].

use bitos::bitos;
use std::collections::VecDeque;

pub const QUEUE_LEN: usize = 16;
pub const DEFAULT_PERIOD: u16 = 4096;

/// `BTDMPx_TX_STATUS`.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Status {
    #[bits(3)]
    pub full: bool,
    #[bits(4)]
    pub empty: bool,
}

/// A stereo frame leaving the transmit queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub sample: [i16; 2],
    /// Whether the queue ran empty with this frame.
    pub drained: bool,
}

#[derive(Debug, Clone)]
pub struct Btdmp {
    pub transmit_clock_config: u16,
    pub transmit_period: u16,
    pub transmit_enable: u16,
    transmit_timer: u16,
    transmit_queue: VecDeque<u16>,

    pub receive_enable: bool,
    receive_queue: VecDeque<i16>,
}

impl Default for Btdmp {
    fn default() -> Self {
        Self {
            transmit_clock_config: 0,
            transmit_period: DEFAULT_PERIOD,
            transmit_enable: 0,
            transmit_timer: 0,
            transmit_queue: VecDeque::with_capacity(QUEUE_LEN),
            receive_enable: false,
            receive_queue: VecDeque::with_capacity(QUEUE_LEN),
        }
    }
}

impl Btdmp {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn status(&self) -> Status {
        Status::default()
            .with_full(self.transmit_queue.len() == QUEUE_LEN)
            .with_empty(self.transmit_queue.is_empty())
    }

    pub fn send(&mut self, value: u16) {
        if self.transmit_queue.len() == QUEUE_LEN {
            tracing::warn!("audio transmit queue overrun, dropping 0x{value:04X}");
            return;
        }

        self.transmit_queue.push_back(value);
    }

    pub fn flush(&mut self, value: u16) {
        if value != 0 {
            self.transmit_queue.clear();
        }
    }

    #[inline(always)]
    fn transmitting(&self) -> bool {
        self.transmit_enable != 0 && !self.transmit_queue.is_empty()
    }

    fn pop_frame(&mut self) -> Frame {
        let mut sample = [0; 2];
        for s in &mut sample {
            *s = self.transmit_queue.pop_front().unwrap_or_default() as i16;
        }

        Frame {
            sample,
            drained: self.transmit_queue.is_empty(),
        }
    }

    /// Advances the transmit clock by one cycle.
    pub fn tick(&mut self) -> Option<Frame> {
        if !self.transmitting() {
            return None;
        }

        self.transmit_timer += 1;
        if self.transmit_timer < self.transmit_period {
            return None;
        }

        self.transmit_timer = 0;
        Some(self.pop_frame())
    }

    pub fn max_skip(&self) -> u64 {
        if !self.transmitting() {
            return u64::MAX;
        }

        self.transmit_period.saturating_sub(self.transmit_timer + 1) as u64
    }

    pub fn skip(&mut self, ticks: u64) {
        if ticks == 0 || !self.transmitting() {
            return;
        }

        let ticks = ticks.min(self.max_skip()) as u16;
        self.transmit_timer += ticks;
    }

    /// Host-driven frame exchange. Pops one output frame if transmitting and queues the
    /// microphone sample twice if receiving. Returns the frame and whether the receive queue
    /// filled up.
    pub fn sample_clock(&mut self, input: i16) -> (Option<Frame>, bool) {
        let frame = self.transmitting().then(|| self.pop_frame());

        let mut received = false;
        if self.receive_enable {
            for _ in 0..2 {
                if self.receive_queue.len() < QUEUE_LEN {
                    self.receive_queue.push_back(input);
                }
            }

            received = self.receive_queue.len() == QUEUE_LEN;
        }

        (frame, received)
    }

    pub fn receive(&mut self) -> Option<i16> {
        self.receive_queue.pop_front()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_flags() {
        let mut port = Btdmp::default();
        assert!(port.status().empty());

        for i in 0..QUEUE_LEN as u16 {
            port.send(i);
        }

        assert!(port.status().full());
        port.send(0xFFFF);
        assert!(port.status().full());

        port.flush(1);
        assert!(port.status().empty());
    }

    #[test]
    fn transmit_period() {
        let mut port = Btdmp {
            transmit_period: 4,
            transmit_enable: 1,
            ..Default::default()
        };

        for s in [1, 0xFFFF, 2, 3] {
            port.send(s);
        }

        assert!((0..3).all(|_| port.tick().is_none()));
        assert_eq!(
            port.tick(),
            Some(Frame {
                sample: [1, -1],
                drained: false
            })
        );

        assert_eq!(port.max_skip(), 3);
        port.skip(3);
        assert_eq!(
            port.tick(),
            Some(Frame {
                sample: [2, 3],
                drained: true
            })
        );
        assert_eq!(port.max_skip(), u64::MAX);
    }

    #[test]
    fn disabled_port_holds_samples() {
        let mut port = Btdmp::default();
        port.send(5);
        port.send(6);
        assert!((0..10_000).all(|_| port.tick().is_none()));
        assert_eq!(port.sample_clock(0).0, None);
    }

    #[test]
    fn sample_clock_exchanges_frames() {
        let mut port = Btdmp {
            transmit_enable: 1,
            receive_enable: true,
            ..Default::default()
        };

        port.send(7);
        port.send(8);

        let (frame, full) = port.sample_clock(-3);
        assert_eq!(
            frame,
            Some(Frame {
                sample: [7, 8],
                drained: true
            })
        );
        assert!(!full);
        assert_eq!(port.receive(), Some(-3));
        assert_eq!(port.receive(), Some(-3));
        assert_eq!(port.receive(), None);

        let full = (0..8).map(|_| port.sample_clock(1).1).last();
        assert_eq!(full, Some(true));
    }
}
