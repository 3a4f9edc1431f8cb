//! The MMIO register map.
//!
//! Offsets are relative to the MMIO base configured in the MIU. Cells without a peripheral
//! behind them behave as plain storage.

use super::{
    System,
    ahbm::{UnitConfig, UnitControl},
    dma::{SpaceConfig, START_TRANSFER},
    icu::VectorConfig,
    irq,
    memory::{PageConfig, PageMode},
};
use bitos::BitUtils;

const CHIP_ID: u16 = 0xC902;

impl System {
    fn stored(&self, offset: u16) -> u16 {
        self.mmio_cells[offset as usize]
    }

    fn store(&mut self, offset: u16, value: u16) {
        self.mmio_cells[offset as usize] = value;
    }

    pub fn read_mmio(&mut self, offset: u16) -> u16 {
        let offset = offset & 0x7FF;
        let value = match offset {
            0x01A => CHIP_ID,

            // Timers
            0x020 | 0x030 => self.timers[(offset as usize - 0x20) / 0x10].config.to_bits(),
            0x022 | 0x032 => 0,
            0x024 | 0x034 => self.timers[(offset as usize - 0x24) / 0x10].start_low,
            0x026 | 0x036 => self.timers[(offset as usize - 0x26) / 0x10].start_high,
            0x028 | 0x038 => self.timers[(offset as usize - 0x28) / 0x10].counter_low,
            0x02A | 0x03A => self.timers[(offset as usize - 0x2A) / 0x10].counter_high,

            // APBP
            0x0C0 | 0x0C4 | 0x0C8 => self.apbp_from_dsp.peek((offset as usize - 0xC0) / 4),
            0x0C2 | 0x0C6 | 0x0CA => {
                let channel = (offset as usize - 0xC2) / 4;
                let value = self.apbp_from_cpu.recv(channel);
                tracing::debug!("DSP received 0x{value:04X} on channel {channel}");
                value
            }
            0x0CC => self.apbp_from_dsp.semaphore,
            0x0CE => self.apbp_from_cpu.semaphore_mask,
            0x0D0 => 0,
            0x0D2 => self.apbp_from_cpu.semaphore,
            0x0D4 => {
                let disabled = |i: usize| self.apbp_from_cpu.channels[i].disable_interrupt;
                self.stored(offset)
                    .with_bit(8, disabled(0))
                    .with_bit(12, disabled(1))
                    .with_bit(13, disabled(2))
            }
            0x0D6 => 0u16
                .with_bit(5, self.apbp_from_dsp.is_ready(0))
                .with_bit(6, self.apbp_from_dsp.is_ready(1))
                .with_bit(7, self.apbp_from_dsp.is_ready(2))
                .with_bit(8, self.apbp_from_cpu.is_ready(0))
                .with_bit(9, self.apbp_from_cpu.semaphore_signaled)
                .with_bit(12, self.apbp_from_cpu.is_ready(1))
                .with_bit(13, self.apbp_from_cpu.is_ready(2)),
            0x0D8 => 0u16
                .with_bit(9, self.apbp_from_cpu.semaphore_signaled)
                .with_bit(10, self.apbp_from_dsp.is_ready(0))
                .with_bit(11, self.apbp_from_dsp.is_ready(1))
                .with_bit(12, self.apbp_from_dsp.is_ready(2))
                .with_bit(13, self.apbp_from_cpu.is_ready(0))
                .with_bit(14, self.apbp_from_cpu.is_ready(1))
                .with_bit(15, self.apbp_from_cpu.is_ready(2)),

            // AHBM
            0x0E0 => self.ahbm.busy_flag,
            0x0E2 | 0x0E8 | 0x0EE => {
                let unit = &self.ahbm.units[(offset as usize - 0xE2) / 6];
                let config = unit.config().to_bits();
                self.stored(offset).with_bits(1, 3, 0).with_bits(4, 6, 0) | config
            }
            0x0E4 | 0x0EA | 0x0F0 => {
                let unit = &self.ahbm.units[(offset as usize - 0xE4) / 6];
                self.stored(offset).with_bit(8, false) | unit.control().to_bits()
            }
            0x0E6 | 0x0EC | 0x0F2 => self.ahbm.units[(offset as usize - 0xE6) / 6].dma_channel,

            // MIU
            0x10E => self.miu.x_page,
            0x110 => self.miu.y_page,
            0x112 => self.miu.z_page,
            0x114 | 0x116 => {
                let config = self.miu.page_config[(offset as usize - 0x114) / 2].to_bits();
                self.stored(offset).with_bits(0, 6, 0).with_bits(8, 14, 0) | config
            }
            0x11A => self.stored(offset).with_bit(6, self.miu.page_mode.mode()),
            0x11E => self.miu.mmio_base,

            // DMA
            0x184 => self.dma.enabled,
            0x18C => 0xFFFF,
            0x1BE => self.dma.active,
            0x1C0 => self.dma.active().src_low,
            0x1C2 => self.dma.active().src_high,
            0x1C4 => self.dma.active().dst_low,
            0x1C6 => self.dma.active().dst_high,
            0x1C8 | 0x1CA | 0x1CC => self.dma.active().size[(offset as usize - 0x1C8) / 2],
            0x1CE | 0x1D2 | 0x1D6 => self.dma.active().src_step[(offset as usize - 0x1CE) / 4],
            0x1D0 | 0x1D4 | 0x1D8 => self.dma.active().dst_step[(offset as usize - 0x1D0) / 4],
            0x1DA => self.dma.active().space.to_bits(),
            0x1DC => self.dma.active().y,
            0x1DE => self.dma.active().z,

            // ICU
            0x200 => self.icu.request,
            0x202 | 0x204 => 0,
            0x206 | 0x208 | 0x20A => self.icu.enabled[(offset as usize - 0x206) / 2],
            0x20C => self.icu.vectored_enabled,
            0x212..0x252 if offset % 4 == 2 => {
                self.icu.vector_config[(offset as usize - 0x212) / 4].to_bits()
            }
            0x214..0x254 if offset % 4 == 0 => self.icu.vector_low[(offset as usize - 0x214) / 4],

            // BTDMP
            0x2A2 | 0x322 => self.btdmp[(offset as usize - 0x2A2) / 0x80].transmit_clock_config,
            0x2BE | 0x33E => self.btdmp[(offset as usize - 0x2BE) / 0x80].transmit_enable,
            0x2C2 | 0x342 => self.btdmp[(offset as usize - 0x2C2) / 0x80].status().to_bits(),
            0x2C6 | 0x346 | 0x2CA | 0x34A => 0,

            _ => {
                let value = self.stored(offset);
                tracing::debug!("read 0x{value:04X} from unmapped MMIO 0x{offset:03X}");
                value
            }
        };

        value
    }

    pub fn write_mmio(&mut self, offset: u16, value: u16) {
        let offset = offset & 0x7FF;
        match offset {
            0x01A => tracing::warn!("write 0x{value:04X} to read-only chip id"),

            // Timers
            0x020 | 0x030 => self.timers[(offset as usize - 0x20) / 0x10].write_config(value),
            0x022 | 0x032 => {
                let index = (offset as usize - 0x22) / 0x10;
                if value != 0 && self.timers[index].tick_event() {
                    self.icu
                        .trigger_single(if index == 0 { irq::TIMER0 } else { irq::TIMER1 });
                }
            }
            0x024 | 0x034 => self.timers[(offset as usize - 0x24) / 0x10].start_low = value,
            0x026 | 0x036 => self.timers[(offset as usize - 0x26) / 0x10].start_high = value,
            0x028 | 0x038 => self.timers[(offset as usize - 0x28) / 0x10].counter_low = value,
            0x02A | 0x03A => self.timers[(offset as usize - 0x2A) / 0x10].counter_high = value,

            // APBP
            0x0C0 | 0x0C4 | 0x0C8 => {
                let channel = (offset as usize - 0xC0) / 4;
                tracing::debug!("DSP sending 0x{value:04X} on channel {channel}");
                if self.apbp_from_dsp.send(channel, value)
                    && let Some(handler) = &mut self.callbacks.recv_data[channel]
                {
                    handler();
                }
            }
            0x0C2 | 0x0C6 | 0x0CA => (),
            0x0CC => {
                tracing::debug!("DSP setting semaphore 0x{value:04X}");
                if self.apbp_from_dsp.set_semaphore(value)
                    && let Some(handler) = &mut self.callbacks.semaphore
                {
                    handler();
                }
            }
            0x0CE => self.apbp_from_cpu.mask_semaphore(value),
            0x0D0 => self.apbp_from_cpu.clear_semaphore(value),
            0x0D2 => (),
            0x0D4 => {
                self.store(offset, value);
                for (channel, bit) in [8, 12, 13].into_iter().enumerate() {
                    self.apbp_from_cpu.channels[channel].disable_interrupt = value.bit(bit);
                }
            }
            0x0D6 | 0x0D8 => self.store(offset, value),

            // AHBM
            0x0E0 => tracing::warn!("write 0x{value:04X} to read-only AHBM busy flag"),
            0x0E2 | 0x0E8 | 0x0EE => {
                self.store(offset, value);
                self.ahbm.units[(offset as usize - 0xE2) / 6].set_config(value);
            }
            0x0E4 | 0x0EA | 0x0F0 => {
                self.store(offset, value);
                self.ahbm.units[(offset as usize - 0xE4) / 6].set_control(value);
            }
            0x0E6 | 0x0EC | 0x0F2 => self.ahbm.units[(offset as usize - 0xE6) / 6].dma_channel = value,

            // MIU
            0x10E => self.miu.x_page = value,
            0x110 => self.miu.y_page = value,
            0x112 => self.miu.z_page = value,
            0x114 | 0x116 => {
                self.store(offset, value);
                self.miu.page_config[(offset as usize - 0x114) / 2] = PageConfig::from_bits(value);
            }
            0x11A => {
                self.store(offset, value);
                self.miu.page_mode = PageMode::from_bits(value);
            }
            0x11E => {
                tracing::debug!("MMIO base moved to 0x{value:04X}");
                self.miu.mmio_base = value;
            }

            // DMA
            0x184 => self.dma.enabled = value,
            0x1BE => self.dma.active = value,
            0x1C0 => self.dma.active_mut().src_low = value,
            0x1C2 => self.dma.active_mut().src_high = value,
            0x1C4 => self.dma.active_mut().dst_low = value,
            0x1C6 => self.dma.active_mut().dst_high = value,
            0x1C8 | 0x1CA | 0x1CC => self.dma.active_mut().size[(offset as usize - 0x1C8) / 2] = value,
            0x1CE | 0x1D2 | 0x1D6 => {
                self.dma.active_mut().src_step[(offset as usize - 0x1CE) / 4] = value
            }
            0x1D0 | 0x1D4 | 0x1D8 => {
                self.dma.active_mut().dst_step[(offset as usize - 0x1D0) / 4] = value
            }
            0x1DA => self.dma.active_mut().space = SpaceConfig::from_bits(value),
            0x1DC => self.dma.active_mut().y = value,
            0x1DE => {
                self.dma.active_mut().z = value;
                if value == START_TRANSFER {
                    let channel = self.dma.active;
                    self.dma
                        .run(channel, &mut self.mem, &mut self.ahbm, self.bus.as_mut());
                    self.icu.trigger_single(irq::DMA);
                }
            }

            // ICU
            0x200 => tracing::warn!("write 0x{value:04X} to read-only ICU request"),
            0x202 => self.icu.acknowledge(value),
            0x204 => self.icu.trigger(value),
            0x206 | 0x208 | 0x20A => self.icu.enabled[(offset as usize - 0x206) / 2] = value,
            0x20C => self.icu.vectored_enabled = value,
            0x212..0x252 if offset % 4 == 2 => {
                self.icu.vector_config[(offset as usize - 0x212) / 4] = VectorConfig::from_bits(value)
            }
            0x214..0x254 if offset % 4 == 0 => {
                self.icu.vector_low[(offset as usize - 0x214) / 4] = value
            }

            // BTDMP
            0x2A2 | 0x322 => {
                self.btdmp[(offset as usize - 0x2A2) / 0x80].transmit_clock_config = value
            }
            0x2BE | 0x33E => self.btdmp[(offset as usize - 0x2BE) / 0x80].transmit_enable = value,
            0x2C2 | 0x342 => (),
            0x2C6 | 0x346 => self.btdmp[(offset as usize - 0x2C6) / 0x80].send(value),
            0x2CA | 0x34A => self.btdmp[(offset as usize - 0x2CA) / 0x80].flush(value),

            _ => {
                tracing::debug!("write 0x{value:04X} to unmapped MMIO 0x{offset:03X}");
                self.store(offset, value);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::system::ahbm::{Direction, UnitSize};

    #[test]
    fn unmapped_cells_are_storage() {
        let mut sys = System::default();
        sys.write_mmio(0x400, 0x1234);
        assert_eq!(sys.read_mmio(0x400), 0x1234);
        assert_eq!(sys.read_mmio(0x402), 0);
    }

    #[test]
    fn event_and_trigger_cells_read_zero() {
        let mut sys = System::default();
        for offset in [0x022, 0x0D0, 0x202, 0x204] {
            sys.write_mmio(offset, 0xFFFF);
            assert_eq!(sys.read_mmio(offset), 0, "offset 0x{offset:03X}");
        }
    }

    #[test]
    fn timer_restart_bit_reads_zero() {
        let mut sys = System::default();
        sys.write_mmio(0x024, 0x0010);
        sys.write_mmio(0x020, (1 << 10) | (1 << 9) | 0b11);

        assert_eq!(sys.read_mmio(0x020), (1 << 9) | 0b11);
        assert_eq!(sys.read_mmio(0x028), 0x0010);
    }

    #[test]
    fn mailbox_round_trip() {
        let mut sys = System::default();
        sys.send_data(2, 0xCAFE);
        assert_eq!(sys.read_mmio(0x0D6), 1 << 13);
        assert_eq!(sys.read_mmio(0x0D8), 1 << 15);

        assert_eq!(sys.read_mmio(0x0CA), 0xCAFE);
        assert_eq!(sys.read_mmio(0x0D6), 0);

        sys.write_mmio(0x0C4, 0x1111);
        assert!(sys.apbp_from_dsp.is_ready(1));
        assert_eq!(sys.read_mmio(0x0C4), 0x1111);
        assert_eq!(sys.read_mmio(0x0D6), 1 << 6);
    }

    #[test]
    fn interrupt_disable_bits() {
        let mut sys = System::default();
        sys.icu.enabled[0] = 1 << irq::APBP;
        sys.write_mmio(0x0D4, (1 << 12) | (1 << 2));
        assert_eq!(sys.read_mmio(0x0D4), (1 << 12) | (1 << 2));

        sys.send_data(1, 1);
        assert!(!sys.icu.take_pending(0));
        sys.send_data(0, 1);
        assert!(sys.icu.take_pending(0));
    }

    #[test]
    fn ahbm_configuration() {
        let mut sys = System::default();
        sys.write_mmio(0x0E8, (2 << 4) | (1 << 1));
        sys.write_mmio(0x0EA, 1 << 8);
        sys.write_mmio(0x0EC, 0x0003);

        let unit = &sys.ahbm.units[1];
        assert_eq!(unit.unit_size, UnitSize::U32);
        assert_eq!(unit.direction, Direction::Write);
        assert_eq!(unit.dma_channel, 3);
        assert_eq!(sys.read_mmio(0x0E8), (2 << 4) | (1 << 1));
    }

    #[test]
    fn miu_registers() {
        let mut sys = System::default();
        sys.write_mmio(0x114, 0x0401);
        assert_eq!(sys.miu.page_config[0].x_size().value(), 1);
        assert_eq!(sys.miu.page_config[0].y_size().value(), 4);
        assert_eq!(sys.read_mmio(0x114), 0x0401);

        sys.write_mmio(0x11E, 0xF000);
        assert_eq!(sys.read_data(0xF01A), 0xC902);
    }

    #[test]
    fn dma_trigger() {
        let mut sys = System::default();
        sys.icu.enabled[1] = 1 << irq::DMA;
        for i in 0..3 {
            sys.mem.write_data(0x100 + i, 0xA0 + i as u16);
        }

        sys.write_mmio(0x1BE, 3);
        sys.write_mmio(0x1C0, 0x100);
        sys.write_mmio(0x1C4, 0x300);
        sys.write_mmio(0x1C8, 3);
        sys.write_mmio(0x1CA, 1);
        sys.write_mmio(0x1CC, 1);
        sys.write_mmio(0x1CE, 1);
        sys.write_mmio(0x1D0, 1);
        assert_eq!(sys.dma.channels[3].size, [3, 1, 1]);

        sys.write_mmio(0x1DE, START_TRANSFER);
        assert_eq!(sys.mem.read_data(0x302), 0xA2);
        assert!(sys.icu.take_pending(1));
    }

    #[test]
    fn dma_trigger_with_wide_channel_number() {
        let mut sys = System::default();
        sys.mem.write_data(0x100, 0xBEEF);

        sys.write_mmio(0x1BE, 0x10);
        sys.write_mmio(0x1C0, 0x100);
        sys.write_mmio(0x1C4, 0x200);
        sys.write_mmio(0x1C8, 1);
        sys.write_mmio(0x1CA, 1);
        sys.write_mmio(0x1CC, 1);
        assert_eq!(sys.dma.channels[0].size, [1, 1, 1]);

        sys.write_mmio(0x1DE, START_TRANSFER);
        assert_eq!(sys.mem.read_data(0x200), 0xBEEF);
    }

    #[test]
    fn icu_vectors() {
        let mut sys = System::default();
        sys.write_mmio(0x212 + 4 * 5, 0x8001);
        sys.write_mmio(0x214 + 4 * 5, 0x2000);
        assert_eq!(sys.icu.vector(5), 0x12000);
        assert!(sys.icu.vector_config[5].context_switch());
    }

    #[test]
    fn audio_port_status() {
        let mut sys = System::default();
        assert_eq!(sys.read_mmio(0x342), 1 << 4);
        sys.write_mmio(0x346, 5);
        assert_eq!(sys.read_mmio(0x342), 0);
        sys.write_mmio(0x34A, 1);
        assert_eq!(sys.read_mmio(0x342), 1 << 4);
    }
}
