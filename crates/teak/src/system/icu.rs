//! Interrupt control unit.
//!
//! Routes the 16 IRQ request lines to the three maskable interrupt lines of the core and to the
//! vectored interrupt. Signals are latched here and collected by the interpreter at the start of
//! every cycle.

use bitos::{bitos, integer::u2};

/// Per-IRQ vector configuration, high half.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorConfig {
    #[bits(0..2)]
    pub high: u2,
    #[bits(15)]
    pub context_switch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectoredInterrupt {
    pub address: u32,
    pub context_switch: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Icu {
    pub request: u16,
    pub enabled: [u16; 3],
    pub vectored_enabled: u16,
    pub vector_config: [VectorConfig; 16],
    pub vector_low: [u16; 16],

    pending: [bool; 3],
    vectored: Option<VectoredInterrupt>,
}

impl Icu {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn vector(&self, irq: usize) -> u32 {
        self.vector_low[irq] as u32 | ((self.vector_config[irq].high().value() as u32) << 16)
    }

    pub fn acknowledge(&mut self, bits: u16) {
        self.request &= !bits;
    }

    pub fn trigger(&mut self, bits: u16) {
        self.request |= bits;
        for irq in (0..16).filter(|irq| bits & (1 << irq) != 0) {
            for (line, enabled) in self.enabled.iter().enumerate() {
                if enabled & (1 << irq) != 0 {
                    self.pending[line] = true;
                }
            }

            if self.vectored_enabled & (1 << irq) != 0 {
                self.vectored = Some(VectoredInterrupt {
                    address: self.vector(irq),
                    context_switch: self.vector_config[irq].context_switch(),
                });
            }
        }
    }

    #[inline(always)]
    pub fn trigger_single(&mut self, irq: u32) {
        self.trigger(1 << irq);
    }

    /// Takes the pending signal of an interrupt line.
    #[inline(always)]
    pub fn take_pending(&mut self, line: usize) -> bool {
        std::mem::take(&mut self.pending[line])
    }

    #[inline(always)]
    pub fn take_vectored(&mut self) -> Option<VectoredInterrupt> {
        self.vectored.take()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn routes_to_enabled_lines() {
        let mut icu = Icu::default();
        icu.enabled[1] = 1 << 0xE;
        icu.trigger_single(0xE);

        assert_eq!(icu.request, 1 << 0xE);
        assert!(!icu.take_pending(0));
        assert!(icu.take_pending(1));
        assert!(!icu.take_pending(1));
    }

    #[test]
    fn disabled_irq_only_sets_request() {
        let mut icu = Icu::default();
        icu.trigger_single(3);
        assert_eq!(icu.request, 1 << 3);
        assert!((0..3).all(|line| !icu.take_pending(line)));
        assert_eq!(icu.take_vectored(), None);

        icu.acknowledge(1 << 3);
        assert_eq!(icu.request, 0);
    }

    #[test]
    fn vectored_interrupt() {
        let mut icu = Icu::default();
        icu.vectored_enabled = 1 << 0xF;
        icu.vector_low[0xF] = 0x1234;
        icu.vector_config[0xF] = VectorConfig::from_bits(0x8002);
        icu.trigger_single(0xF);

        assert_eq!(
            icu.take_vectored(),
            Some(VectoredInterrupt {
                address: 0x21234,
                context_switch: true,
            })
        );
    }
}
