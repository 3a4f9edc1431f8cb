//! Bus-master path to memory outside of the DSP.
//!
//! Each of the three units buffers a burst of transfers. Reads fill the burst queue from the
//! external [`Bus`] when it runs empty, writes are flushed once a whole burst has been queued.

use super::Bus;
use bitos::{
    bitos,
    integer::{u1, u2},
};
use std::collections::VecDeque;
use strum::FromRepr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRepr)]
#[repr(u8)]
pub enum UnitSize {
    #[default]
    U8 = 0,
    U16 = 1,
    U32 = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRepr)]
#[repr(u8)]
pub enum BurstSize {
    #[default]
    X1 = 0,
    X4 = 1,
    X8 = 2,
}

impl BurstSize {
    pub fn len(self) -> usize {
        match self {
            Self::X1 => 1,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRepr)]
#[repr(u8)]
pub enum Direction {
    #[default]
    Read = 0,
    Write = 1,
}

/// First configuration register of a unit.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitConfig {
    #[bits(1..3)]
    pub burst_size: u2,
    #[bits(4..6)]
    pub unit_size: u2,
}

/// Second configuration register of a unit.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitControl {
    #[bits(8)]
    pub direction: u1,
}

#[derive(Debug, Clone, Default)]
pub struct Unit {
    pub unit_size: UnitSize,
    pub burst_size: BurstSize,
    pub direction: Direction,
    /// Bitmask of the DMA channels bound to this unit.
    pub dma_channel: u16,

    burst_queue: VecDeque<u32>,
    write_burst_start: u32,
}

impl Unit {
    pub fn config(&self) -> UnitConfig {
        UnitConfig::default()
            .with_burst_size(u2::new(self.burst_size as u8))
            .with_unit_size(u2::new(self.unit_size as u8))
    }

    pub fn set_config(&mut self, value: u16) {
        let config = UnitConfig::from_bits(value);
        self.burst_size = BurstSize::from_repr(config.burst_size().value()).unwrap_or_else(|| {
            tracing::warn!("unknown AHBM burst size {}", config.burst_size().value());
            BurstSize::X1
        });
        self.unit_size = UnitSize::from_repr(config.unit_size().value()).unwrap_or_else(|| {
            tracing::warn!("unknown AHBM unit size {}", config.unit_size().value());
            UnitSize::U8
        });
    }

    pub fn control(&self) -> UnitControl {
        UnitControl::default().with_direction(u1::new(self.direction as u8))
    }

    pub fn set_control(&mut self, value: u16) {
        let control = UnitControl::from_bits(value);
        self.direction = match control.direction().value() {
            0 => Direction::Read,
            _ => Direction::Write,
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ahbm {
    pub busy_flag: u16,
    pub units: [Unit; 3],
}

impl Ahbm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Finds the unit bound to a DMA channel.
    pub fn unit_for_dma(&self, dma_channel: u16) -> usize {
        self.units
            .iter()
            .position(|u| (u.dma_channel >> dma_channel) & 1 != 0)
            .unwrap_or_else(|| {
                tracing::warn!("no AHBM unit bound to DMA channel {dma_channel}");
                0
            })
    }

    pub fn read16(&mut self, bus: &mut dyn Bus, unit: usize, addr: u32) -> u16 {
        let value = self.read32(bus, unit, addr);
        if addr & 1 == 0 {
            value as u16
        } else {
            (value >> 16) as u16
        }
    }

    pub fn read32(&mut self, bus: &mut dyn Bus, unit: usize, addr: u32) -> u32 {
        let unit = &mut self.units[unit];
        if unit.direction != Direction::Read {
            tracing::warn!("AHBM read at 0x{addr:08X} on a write unit");
        }

        if unit.burst_queue.is_empty() {
            let mut current = addr;
            for _ in 0..unit.burst_size.len() {
                let value = match unit.unit_size {
                    UnitSize::U8 => {
                        let value = bus.read8(current) as u32;
                        let value = if current & 1 == 1 { value << 8 } else { value };
                        current = current.wrapping_add(1);
                        value
                    }
                    UnitSize::U16 => {
                        let value = bus.read16(current & !1) as u32;
                        current = current.wrapping_add(2);
                        value
                    }
                    UnitSize::U32 => {
                        let value = bus.read32(current & !3);
                        current = current.wrapping_add(4);
                        value
                    }
                };

                unit.burst_queue.push_back(value);
            }
        }

        unit.burst_queue.pop_front().unwrap_or_default()
    }

    pub fn write16(&mut self, bus: &mut dyn Bus, unit: usize, addr: u32, value: u16) {
        self.write(bus, unit, addr, value as u32);
    }

    pub fn write32(&mut self, bus: &mut dyn Bus, unit: usize, addr: u32, value: u32) {
        let value = if addr & 1 == 1 { value >> 16 } else { value };
        self.write(bus, unit, addr, value);
    }

    fn write(&mut self, bus: &mut dyn Bus, unit: usize, addr: u32, value: u32) {
        let unit = &mut self.units[unit];
        if unit.direction != Direction::Write {
            tracing::warn!("AHBM write at 0x{addr:08X} on a read unit");
        }

        if unit.burst_queue.is_empty() {
            unit.write_burst_start = addr;
        }

        unit.burst_queue.push_back(value);
        if unit.burst_queue.len() < unit.burst_size.len() {
            return;
        }

        let mut current = unit.write_burst_start;
        while let Some(value) = unit.burst_queue.pop_front() {
            match unit.unit_size {
                UnitSize::U8 => {
                    let byte = if current & 1 == 1 { value >> 8 } else { value };
                    bus.write8(current, byte as u8);
                    current = current.wrapping_add(1);
                }
                UnitSize::U16 => {
                    let c0 = current & !1;
                    if c0 >= current {
                        bus.write16(c0, value as u16);
                    } else {
                        bus.write8(c0 + 1, (value >> 8) as u8);
                    }

                    current = current.wrapping_add(2);
                }
                UnitSize::U32 => {
                    let c0 = current & !3;
                    let (c1, c2, c3) = (c0 + 1, c0 + 2, c0 + 3);

                    if c0 >= current {
                        bus.write32(c0, value);
                    } else if c2 >= current {
                        if c1 >= current {
                            bus.write8(c1, (value >> 8) as u8);
                        }

                        bus.write16(c2, (value >> 16) as u16);
                    } else {
                        bus.write8(c3, (value >> 24) as u8);
                    }

                    current = current.wrapping_add(4);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        reads: Vec<(u8, u32)>,
        writes: Vec<(u8, u32, u32)>,
    }

    impl Bus for Recorder {
        fn read8(&mut self, addr: u32) -> u8 {
            self.reads.push((8, addr));
            addr as u8
        }

        fn read16(&mut self, addr: u32) -> u16 {
            self.reads.push((16, addr));
            addr as u16
        }

        fn read32(&mut self, addr: u32) -> u32 {
            self.reads.push((32, addr));
            addr
        }

        fn write8(&mut self, addr: u32, value: u8) {
            self.writes.push((8, addr, value as u32));
        }

        fn write16(&mut self, addr: u32, value: u16) {
            self.writes.push((16, addr, value as u32));
        }

        fn write32(&mut self, addr: u32, value: u32) {
            self.writes.push((32, addr, value));
        }
    }

    #[test]
    fn read_burst() {
        let mut bus = Recorder::default();
        let mut ahbm = Ahbm::default();
        ahbm.units[1].set_config(
            UnitConfig::default()
                .with_burst_size(u2::new(1))
                .with_unit_size(u2::new(1))
                .to_bits(),
        );

        assert_eq!(ahbm.read32(&mut bus, 1, 0x1001), 0x1000);
        assert_eq!(
            bus.reads,
            [(16, 0x1000), (16, 0x1002), (16, 0x1004), (16, 0x1006)]
        );

        // the remaining queued values are consumed before the bus is touched again
        assert_eq!(ahbm.read32(&mut bus, 1, 0x2000), 0x1002);
        assert_eq!(bus.reads.len(), 4);
    }

    #[test]
    fn odd_byte_reads_are_shifted() {
        let mut bus = Recorder::default();
        let mut ahbm = Ahbm::default();
        assert_eq!(ahbm.read32(&mut bus, 0, 0x11), 0x1100);
        assert_eq!(ahbm.read16(&mut bus, 0, 0x10), 0x10);
    }

    #[test]
    fn write_burst_is_flushed_when_full() {
        let mut bus = Recorder::default();
        let mut ahbm = Ahbm::default();
        ahbm.units[0].set_config(
            UnitConfig::default()
                .with_burst_size(u2::new(1))
                .with_unit_size(u2::new(2))
                .to_bits(),
        );
        ahbm.units[0].set_control(1 << 8);

        for i in 0..3 {
            ahbm.write32(&mut bus, 0, 0x100 + 4 * i, i);
            assert!(bus.writes.is_empty());
        }

        ahbm.write32(&mut bus, 0, 0x10C, 3);
        assert_eq!(
            bus.writes,
            [(32, 0x100, 0), (32, 0x104, 1), (32, 0x108, 2), (32, 0x10C, 3)]
        );
    }

    #[test]
    fn unaligned_word_write() {
        let mut bus = Recorder::default();
        let mut ahbm = Ahbm::default();
        ahbm.units[0].set_config(UnitConfig::default().with_unit_size(u2::new(2)).to_bits());
        ahbm.units[0].set_control(1 << 8);

        ahbm.write32(&mut bus, 0, 0x101, 0xAABB_CCDD);
        // the upper half of the value is dropped, byte 0x101 and half 0x102 receive what is left
        assert_eq!(bus.writes, [(8, 0x101, 0xAA), (16, 0x102, 0x0000)]);
    }

    #[test]
    fn dma_binding() {
        let mut ahbm = Ahbm::default();
        ahbm.units[2].dma_channel = 1 << 5;
        assert_eq!(ahbm.unit_for_dma(5), 2);
        assert_eq!(ahbm.unit_for_dma(4), 0);
    }
}
