//! Everything around the core: shared memory, the MMIO peripherals and the host callbacks.

pub mod ahbm;
pub mod apbp;
pub mod btdmp;
pub mod dma;
pub mod icu;
pub mod memory;
pub mod mmio;
pub mod timer;

use ahbm::Ahbm;
use apbp::Apbp;
use btdmp::Btdmp;
use dma::Dma;
use icu::Icu;
use memory::{MMIO_LEN, Memory, Miu};
use timer::Timer;
use util::boxed_array;

/// IRQ lines of the interrupt control unit.
pub mod irq {
    pub const TIMER1: u32 = 0x9;
    pub const TIMER0: u32 = 0xA;
    pub const AUDIO: u32 = 0xB;
    pub const APBP: u32 = 0xE;
    pub const DMA: u32 = 0xF;
}

/// Memory outside of the DSP, reached through the AHBM. Addresses are flattened host addresses.
pub trait Bus {
    fn read8(&mut self, addr: u32) -> u8;
    fn read16(&mut self, addr: u32) -> u16;
    fn read32(&mut self, addr: u32) -> u32;
    fn write8(&mut self, addr: u32, value: u8);
    fn write16(&mut self, addr: u32, value: u16);
    fn write32(&mut self, addr: u32, value: u32);
}

/// A [`Bus`] with nothing attached.
pub struct NullBus;

impl Bus for NullBus {
    fn read8(&mut self, addr: u32) -> u8 {
        tracing::warn!("AHBM read8 from 0x{addr:08X} with no bus attached");
        0
    }

    fn read16(&mut self, addr: u32) -> u16 {
        tracing::warn!("AHBM read16 from 0x{addr:08X} with no bus attached");
        0
    }

    fn read32(&mut self, addr: u32) -> u32 {
        tracing::warn!("AHBM read32 from 0x{addr:08X} with no bus attached");
        0
    }

    fn write8(&mut self, addr: u32, _: u8) {
        tracing::warn!("AHBM write8 to 0x{addr:08X} with no bus attached");
    }

    fn write16(&mut self, addr: u32, _: u16) {
        tracing::warn!("AHBM write16 to 0x{addr:08X} with no bus attached");
    }

    fn write32(&mut self, addr: u32, _: u32) {
        tracing::warn!("AHBM write32 to 0x{addr:08X} with no bus attached");
    }
}

/// Host notifications. They run inline, during [`crate::Teak::run`].
#[derive(Default)]
pub struct Callbacks {
    /// DSP to CPU data channel filled.
    pub recv_data: [Option<Box<dyn FnMut()>>; 3],
    /// DSP to CPU semaphore raised.
    pub semaphore: Option<Box<dyn FnMut()>>,
    /// Stereo frame emitted by the first audio port.
    pub audio: Option<Box<dyn FnMut([i16; 2])>>,
}

pub struct System {
    pub mem: Memory,
    pub miu: Miu,
    pub icu: Icu,
    pub apbp_from_cpu: Apbp,
    pub apbp_from_dsp: Apbp,
    pub timers: [Timer; 2],
    pub dma: Dma,
    pub ahbm: Ahbm,
    pub btdmp: [Btdmp; 2],
    pub callbacks: Callbacks,
    pub bus: Box<dyn Bus>,

    /// Backing store of MMIO cells without a peripheral behind them.
    mmio_cells: Box<[u16; MMIO_LEN as usize]>,
}

impl Default for System {
    fn default() -> Self {
        Self {
            mem: Memory::default(),
            miu: Miu::default(),
            icu: Icu::default(),
            apbp_from_cpu: Apbp::default(),
            apbp_from_dsp: Apbp::default(),
            timers: Default::default(),
            dma: Dma::default(),
            ahbm: Ahbm::default(),
            btdmp: Default::default(),
            callbacks: Callbacks::default(),
            bus: Box::new(NullBus),
            mmio_cells: boxed_array(0),
        }
    }
}

impl System {
    /// Resets memory and every peripheral. Callbacks and the bus stay attached.
    pub fn reset(&mut self) {
        self.mem.clear();
        self.miu = Miu::default();
        self.icu.reset();
        self.apbp_from_cpu.reset();
        self.apbp_from_dsp.reset();
        self.timers.iter_mut().for_each(Timer::reset);
        self.dma.reset();
        self.ahbm.reset();
        self.btdmp.iter_mut().for_each(Btdmp::reset);
        self.mmio_cells.fill(0);
    }

    #[inline(always)]
    pub fn read_program(&self, addr: u32) -> u16 {
        self.mem.read(addr)
    }

    #[inline(always)]
    pub fn write_program(&mut self, addr: u32, value: u16) {
        self.mem.write(addr, value);
    }

    /// Reads from data space, going through MMIO unless `bypass_mmio` is set.
    pub fn read_data_with(&mut self, addr: u16, bypass_mmio: bool) -> u16 {
        if !bypass_mmio && self.miu.in_mmio(addr) {
            return self.read_mmio(addr - self.miu.mmio_base);
        }

        self.mem.read_data(self.miu.translate(addr))
    }

    /// Writes to data space, going through MMIO unless `bypass_mmio` is set.
    pub fn write_data_with(&mut self, addr: u16, value: u16, bypass_mmio: bool) {
        if !bypass_mmio && self.miu.in_mmio(addr) {
            self.write_mmio(addr - self.miu.mmio_base, value);
            return;
        }

        self.mem.write_data(self.miu.translate(addr), value);
    }

    #[inline(always)]
    pub fn read_data(&mut self, addr: u16) -> u16 {
        self.read_data_with(addr, false)
    }

    #[inline(always)]
    pub fn write_data(&mut self, addr: u16, value: u16) {
        self.write_data_with(addr, value, false);
    }

    /// Reads data space through a flattened byte address. Never touches MMIO.
    pub fn read_data_a32(&self, addr: u32) -> u16 {
        self.mem.read_data((addr >> 1) & 0x1FFFF)
    }

    pub fn write_data_a32(&mut self, addr: u32, value: u16) {
        self.mem.write_data((addr >> 1) & 0x1FFFF, value);
    }

    /// Fills a CPU to DSP data channel.
    pub fn send_data(&mut self, channel: usize, value: u16) {
        tracing::debug!("CPU sending 0x{value:04X} on channel {channel}");
        if self.apbp_from_cpu.send(channel, value) {
            self.icu.trigger_single(irq::APBP);
        }
    }

    /// Raises CPU to DSP semaphore bits.
    pub fn set_semaphore(&mut self, bits: u16) {
        tracing::debug!("CPU setting semaphore 0x{bits:04X}");
        if self.apbp_from_cpu.set_semaphore(bits) {
            self.icu.trigger_single(irq::APBP);
        }
    }

    fn emit_audio(&mut self, port: usize, frame: btdmp::Frame) {
        if frame.drained {
            self.icu.trigger_single(irq::AUDIO);
        }

        if port == 0
            && let Some(audio) = &mut self.callbacks.audio
        {
            audio(frame.sample);
        }
    }

    /// Drives the audio ports from the host sample clock. Returns the frame of the first port.
    pub fn sample_clock(&mut self, input: i16) -> [i16; 2] {
        let mut output = [0; 2];
        for port in 0..2 {
            let (frame, received) = self.btdmp[port].sample_clock(input);
            if let Some(frame) = frame {
                if port == 0 {
                    output = frame.sample;
                }

                if frame.drained {
                    self.icu.trigger_single(irq::AUDIO);
                }
            }

            if received {
                self.icu.trigger_single(irq::AUDIO);
            }
        }

        output
    }

    /// Advances every timed component by one cycle.
    pub fn tick(&mut self) {
        if self.timers[0].tick() {
            self.icu.trigger_single(irq::TIMER0);
        }

        if self.timers[1].tick() {
            self.icu.trigger_single(irq::TIMER1);
        }

        for port in 0..2 {
            if let Some(frame) = self.btdmp[port].tick() {
                self.emit_audio(port, frame);
            }
        }
    }

    /// How many cycles can pass before some component does something observable.
    pub fn max_skip(&self) -> u64 {
        self.timers
            .iter()
            .map(Timer::max_skip)
            .chain(self.btdmp.iter().map(Btdmp::max_skip))
            .min()
            .unwrap_or(u64::MAX)
    }

    pub fn skip(&mut self, ticks: u64) {
        self.timers.iter_mut().for_each(|t| t.skip(ticks));
        self.btdmp.iter_mut().for_each(|b| b.skip(ticks));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn data_goes_through_mmio() {
        let mut sys = System::default();
        assert_eq!(sys.read_data(0x801A), 0xC902);
        assert_eq!(sys.read_data_with(0x801A, true), 0);

        sys.write_data_with(0x801A, 0x1234, true);
        assert_eq!(sys.read_data_with(0x801A, true), 0x1234);
        assert_eq!(sys.read_data(0x801A), 0xC902);
    }

    #[test]
    fn a32_aliases_data_space() {
        let mut sys = System::default();
        sys.write_data(0x0123, 0xBEEF);
        assert_eq!(sys.read_data_a32(0x0246), 0xBEEF);

        sys.write_data_a32(0x4_0000 + 0x10, 7);
        assert_eq!(sys.read_data_with(0x0008, true), 7);
    }

    #[test]
    fn mailbox_interrupts() {
        let mut sys = System::default();
        sys.icu.enabled[0] = 1 << irq::APBP;

        sys.send_data(1, 0x55);
        assert!(sys.icu.take_pending(0));

        sys.set_semaphore(0x8000);
        assert!(sys.icu.take_pending(0));
        sys.set_semaphore(0x8000);
        assert!(!sys.icu.take_pending(0));
    }

    #[test]
    fn timer_interrupt_after_skip() {
        let mut sys = System::default();
        sys.icu.enabled[2] = 1 << irq::TIMER0;
        sys.timers[0].start_low = 50;
        sys.timers[0].write_config((1 << 2) | (1 << 10));

        let max = sys.max_skip();
        assert_eq!(max, 49);
        sys.skip(max);
        assert!(!sys.icu.take_pending(2));

        sys.tick();
        assert!(sys.icu.take_pending(2));
    }

    #[test]
    fn audio_callback() {
        let frames = Rc::new(Cell::new(0));
        let mut sys = System::default();
        sys.callbacks.audio = Some(Box::new({
            let frames = frames.clone();
            move |sample| {
                assert_eq!(sample, [1, 2]);
                frames.set(frames.get() + 1);
            }
        }));

        sys.btdmp[0].transmit_enable = 1;
        sys.btdmp[0].send(1);
        sys.btdmp[0].send(2);

        let max = sys.max_skip();
        sys.skip(max);
        sys.tick();
        assert_eq!(frames.get(), 1);
        assert_eq!(sys.icu.request, 1 << irq::AUDIO);
    }
}
