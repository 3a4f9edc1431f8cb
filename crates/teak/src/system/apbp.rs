//! Host interface: mailbox data channels and the semaphore register.
//!
//! There are two instances, one per direction. Operations that would notify the other side
//! return `true` and leave the notification itself to the owner.

#[derive(Debug, Clone, Copy, Default)]
pub struct DataChannel {
    pub ready: bool,
    pub data: u16,
    pub disable_interrupt: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Apbp {
    pub channels: [DataChannel; 3],
    pub semaphore: u16,
    pub semaphore_mask: u16,
    pub semaphore_signaled: bool,
}

impl Apbp {
    /// Empties every channel and clears the semaphore. The per-channel interrupt disable
    /// survives.
    pub fn reset(&mut self) {
        let disabled = self.channels.map(|c| c.disable_interrupt);
        *self = Self::default();
        for (channel, disable_interrupt) in self.channels.iter_mut().zip(disabled) {
            channel.disable_interrupt = disable_interrupt;
        }
    }

    /// Fills a data channel. A value still waiting in a full channel is overwritten. Returns
    /// whether the receiving side should be notified.
    pub fn send(&mut self, channel: usize, value: u16) -> bool {
        let channel = &mut self.channels[channel];
        channel.ready = true;
        channel.data = value;

        !channel.disable_interrupt
    }

    pub fn recv(&mut self, channel: usize) -> u16 {
        let channel = &mut self.channels[channel];
        channel.ready = false;
        channel.data
    }

    #[inline(always)]
    pub fn peek(&self, channel: usize) -> u16 {
        self.channels[channel].data
    }

    #[inline(always)]
    pub fn is_ready(&self, channel: usize) -> bool {
        self.channels[channel].ready
    }

    /// Sets semaphore bits. Returns whether an unmasked bit went from 0 to 1.
    pub fn set_semaphore(&mut self, bits: u16) -> bool {
        let before = self.semaphore & !self.semaphore_mask;
        self.semaphore |= bits;

        let after = self.semaphore & !self.semaphore_mask;
        self.semaphore_signaled |= after != 0;

        after & !before != 0
    }

    pub fn clear_semaphore(&mut self, bits: u16) {
        self.semaphore &= !bits;
        self.semaphore_signaled = self.semaphore & !self.semaphore_mask != 0;
    }

    pub fn mask_semaphore(&mut self, bits: u16) {
        self.semaphore_mask = bits;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn data_channel_occupancy() {
        let mut apbp = Apbp::default();
        assert!(!apbp.is_ready(1));

        assert!(apbp.send(1, 0xBEEF));
        assert!(apbp.is_ready(1));
        assert_eq!(apbp.peek(1), 0xBEEF);
        assert!(apbp.is_ready(1));

        assert_eq!(apbp.recv(1), 0xBEEF);
        assert!(!apbp.is_ready(1));
    }

    #[test]
    fn disabled_interrupt_suppresses_notification() {
        let mut apbp = Apbp::default();
        apbp.channels[2].disable_interrupt = true;
        assert!(!apbp.send(2, 1));
        assert!(apbp.is_ready(2));
    }

    #[test]
    fn send_overwrites_full_channel() {
        let mut apbp = Apbp::default();
        assert!(apbp.send(0, 1));
        assert!(apbp.send(0, 2));
        assert!(apbp.is_ready(0));
        assert_eq!(apbp.recv(0), 2);
        assert!(!apbp.is_ready(0));
    }

    #[test]
    fn reset_keeps_interrupt_disable() {
        let mut apbp = Apbp::default();
        apbp.channels[1].disable_interrupt = true;
        apbp.send(1, 0x55);
        apbp.set_semaphore(0x8000);
        apbp.mask_semaphore(0x00FF);

        apbp.reset();
        assert!(!apbp.is_ready(1));
        assert_eq!(apbp.peek(1), 0);
        assert_eq!(apbp.semaphore, 0);
        assert_eq!(apbp.semaphore_mask, 0);
        assert!(!apbp.semaphore_signaled);
        assert!(apbp.channels[1].disable_interrupt);
        assert!(!apbp.channels[0].disable_interrupt);
        assert!(!apbp.send(1, 0x66));
    }

    #[test]
    fn semaphore_is_edge_triggered() {
        let mut apbp = Apbp::default();
        assert!(apbp.set_semaphore(0b0001));
        assert!(!apbp.set_semaphore(0b0001));
        assert!(apbp.set_semaphore(0b0010));
        assert!(apbp.semaphore_signaled);

        apbp.clear_semaphore(0b0011);
        assert!(!apbp.semaphore_signaled);
        assert!(apbp.set_semaphore(0b0001));
    }

    #[test]
    fn masked_bits_do_not_signal() {
        let mut apbp = Apbp::default();
        apbp.mask_semaphore(0x00FF);
        assert!(!apbp.set_semaphore(0x0001));
        assert!(!apbp.semaphore_signaled);
        assert_eq!(apbp.semaphore, 0x0001);

        assert!(apbp.set_semaphore(0x0100));
        apbp.clear_semaphore(0x0100);
        assert!(!apbp.semaphore_signaled);
    }
}
