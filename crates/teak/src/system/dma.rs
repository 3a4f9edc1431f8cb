//! DMA engine.
//!
//! Channels are configured through a window of registers that always refers to the active
//! channel. A transfer walks three nested counters and runs to completion when triggered.

use super::{Bus, ahbm::Ahbm, memory::Memory};
use bitos::{bitos, integer::u4};
use strum::FromRepr;

pub const CHANNEL_COUNT: usize = 8;

/// Value written to `DMA_Z` that starts a transfer.
pub const START_TRANSFER: u16 = 0x40C0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum Space {
    Data = 0,
    Mmio = 1,
    Ahbm = 7,
}

/// `DMA_CONFIG`.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceConfig {
    #[bits(0..4)]
    pub src_space: u4,
    #[bits(4..8)]
    pub dst_space: u4,
    #[bits(10)]
    pub dword: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Channel {
    pub src_low: u16,
    pub src_high: u16,
    pub dst_low: u16,
    pub dst_high: u16,
    pub size: [u16; 3],
    pub src_step: [u16; 3],
    pub dst_step: [u16; 3],
    pub space: SpaceConfig,
    pub y: u16,
    pub z: u16,
}

impl Channel {
    #[inline(always)]
    pub fn src(&self) -> u32 {
        self.src_low as u32 | ((self.src_high as u32) << 16)
    }

    #[inline(always)]
    pub fn dst(&self) -> u32 {
        self.dst_low as u32 | ((self.dst_high as u32) << 16)
    }
}

fn space(raw: u4) -> Option<Space> {
    let space = Space::from_repr(raw.value());
    if space.is_none() {
        tracing::warn!("unknown DMA space {}", raw.value());
    }

    space
}

struct Transfer<'a> {
    mem: &'a mut Memory,
    ahbm: &'a mut Ahbm,
    bus: &'a mut dyn Bus,
    unit: usize,
}

impl Transfer<'_> {
    fn read16(&mut self, space: Option<Space>, addr: u32) -> u16 {
        match space {
            Some(Space::Data) => self.mem.read_data(addr),
            Some(Space::Ahbm) => self.ahbm.read16(self.bus, self.unit, addr),
            Some(Space::Mmio) => {
                tracing::warn!("DMA read from MMIO space is not supported");
                0
            }
            None => 0,
        }
    }

    fn read32(&mut self, space: Option<Space>, addr: u32) -> u32 {
        match space {
            Some(Space::Data) => {
                let low = self.mem.read_data(addr & !1);
                let high = self.mem.read_data(addr | 1);
                low as u32 | ((high as u32) << 16)
            }
            Some(Space::Ahbm) => self.ahbm.read32(self.bus, self.unit, addr),
            Some(Space::Mmio) => {
                tracing::warn!("DMA read from MMIO space is not supported");
                0
            }
            None => 0,
        }
    }

    fn write16(&mut self, space: Option<Space>, addr: u32, value: u16) {
        match space {
            Some(Space::Data) => self.mem.write_data(addr, value),
            Some(Space::Ahbm) => self.ahbm.write16(self.bus, self.unit, addr, value),
            Some(Space::Mmio) => tracing::warn!("DMA write to MMIO space is not supported"),
            None => (),
        }
    }

    fn write32(&mut self, space: Option<Space>, addr: u32, value: u32) {
        match space {
            Some(Space::Data) => {
                self.mem.write_data(addr & !1, value as u16);
                self.mem.write_data(addr | 1, (value >> 16) as u16);
            }
            Some(Space::Ahbm) => self.ahbm.write32(self.bus, self.unit, addr, value),
            Some(Space::Mmio) => tracing::warn!("DMA write to MMIO space is not supported"),
            None => (),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dma {
    pub enabled: u16,
    pub active: u16,
    pub channels: [Channel; CHANNEL_COUNT],
}

impl Dma {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline(always)]
    pub fn active(&self) -> &Channel {
        &self.channels[self.active as usize % CHANNEL_COUNT]
    }

    #[inline(always)]
    pub fn active_mut(&mut self) -> &mut Channel {
        &mut self.channels[self.active as usize % CHANNEL_COUNT]
    }

    /// Runs a whole transfer on `channel`.
    pub fn run(&mut self, channel: u16, mem: &mut Memory, ahbm: &mut Ahbm, bus: &mut dyn Bus) {
        let channel = channel % CHANNEL_COUNT as u16;
        let config = self.channels[channel as usize];
        let unit = ahbm.unit_for_dma(channel);
        let src_space = space(config.space.src_space());
        let dst_space = space(config.space.dst_space());

        tracing::debug!(
            "DMA channel {channel}: 0x{:08X} -> 0x{:08X}, sizes {:?}, dword: {}",
            config.src(),
            config.dst(),
            config.size,
            config.space.dword()
        );

        let mut transfer = Transfer {
            mem,
            ahbm,
            bus,
            unit,
        };

        let mut src = config.src();
        let mut dst = config.dst();
        let mut counters = [0u16; 3];
        loop {
            if config.space.dword() {
                let value = transfer.read32(src_space, src);
                transfer.write32(dst_space, dst, value);
                counters[0] = counters[0].wrapping_add(2);
            } else {
                let value = transfer.read16(src_space, src);
                transfer.write16(dst_space, dst, value);
                counters[0] = counters[0].wrapping_add(1);
            }

            // innermost level that has not wrapped yet decides the step
            let mut level = 0;
            while level < 3 && counters[level] >= config.size[level] {
                counters[level] = 0;
                level += 1;
                if level < 3 {
                    counters[level] = counters[level].wrapping_add(1);
                }
            }

            if level == 3 {
                break;
            }

            src = src.wrapping_add(config.src_step[level] as u32);
            dst = dst.wrapping_add(config.dst_step[level] as u32);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::system::NullBus;

    fn channel(src: u32, dst: u32, size: [u16; 3], step: [u16; 3]) -> Channel {
        Channel {
            src_low: src as u16,
            src_high: (src >> 16) as u16,
            dst_low: dst as u16,
            dst_high: (dst >> 16) as u16,
            size,
            src_step: step,
            dst_step: step,
            ..Default::default()
        }
    }

    #[test]
    fn linear_word_copy() {
        let mut mem = Memory::default();
        let mut ahbm = Ahbm::default();
        for i in 0..4 {
            mem.write_data(0x100 + i, 0x10 + i as u16);
        }

        let mut dma = Dma::default();
        dma.channels[2] = channel(0x100, 0x200, [4, 1, 1], [1, 0, 0]);
        dma.run(2, &mut mem, &mut ahbm, &mut NullBus);

        let copied: Vec<u16> = (0..5).map(|i| mem.read_data(0x200 + i)).collect();
        assert_eq!(copied, [0x10, 0x11, 0x12, 0x13, 0]);
    }

    #[test]
    fn nested_counters() {
        let mut mem = Memory::default();
        let mut ahbm = Ahbm::default();
        for i in 0..16 {
            mem.write_data(i, i as u16 + 1);
        }

        // two rows of two words, skipping two words between rows
        let mut dma = Dma::default();
        let mut config = channel(0, 0x40, [2, 2, 1], [1, 3, 0]);
        config.dst_step = [1, 1, 0];
        dma.channels[0] = config;
        dma.run(0, &mut mem, &mut ahbm, &mut NullBus);

        let copied: Vec<u16> = (0..4).map(|i| mem.read_data(0x40 + i)).collect();
        assert_eq!(copied, [1, 2, 5, 6]);
    }

    #[test]
    fn dword_mode_aligns_pairs() {
        let mut mem = Memory::default();
        let mut ahbm = Ahbm::default();
        mem.write_data(0x10, 0xAAAA);
        mem.write_data(0x11, 0xBBBB);

        let mut dma = Dma::default();
        let mut config = channel(0x11, 0x20, [2, 1, 1], [2, 0, 0]);
        config.space = config.space.with_dword(true);
        dma.channels[1] = config;
        dma.run(1, &mut mem, &mut ahbm, &mut NullBus);

        assert_eq!(mem.read_data(0x20), 0xAAAA);
        assert_eq!(mem.read_data(0x21), 0xBBBB);
        assert_eq!(mem.read_data(0x22), 0);
    }

    #[test]
    fn active_channel_window() {
        let mut dma = Dma::default();
        dma.active = 5;
        dma.active_mut().size[1] = 7;
        assert_eq!(dma.channels[5].size[1], 7);
        assert_eq!(dma.active().size[1], 7);
    }

    #[test]
    fn channel_number_wraps() {
        let mut mem = Memory::default();
        let mut ahbm = Ahbm::default();
        mem.write_data(0x30, 0x1234);

        let mut dma = Dma::default();
        dma.channels[0] = channel(0x30, 0x31, [1, 1, 1], [1, 0, 0]);
        dma.run(0x10, &mut mem, &mut ahbm, &mut NullBus);
        dma.run(u16::MAX, &mut mem, &mut ahbm, &mut NullBus);

        assert_eq!(mem.read_data(0x31), 0x1234);
    }
}
