//! Instruction semantics.
//!
//! Accumulators hold 40-bit values sign extended to the full 64 bits. Every arithmetic operation
//! wraps. Handlers are split by area: arithmetic and logic in [`alu`], multiplication and product
//! sums in [`mul`], data movement in [`mov`] and everything touching the program counter, the
//! stack or the addressing configuration in [`flow`].

mod alu;
mod flow;
mod mov;
mod mul;

use crate::{
    Interpreter, PC_MASK,
    ins::{
        Ins, Operand, SumBase, SumOp,
        operand::{Acc, AccPart, Mem, Offset, RegName, Step},
    },
    system::System,
};
use util::{sign_extend, sign_extend16};

/// The meaningful bits of an accumulator.
const ACC_MASK: u64 = 0xFF_FFFF_FFFF;

/// Sign extends the lowest `bits` bits of `value`, with a width only known at runtime.
#[inline(always)]
fn sext(value: u64, bits: u32) -> u64 {
    let shift = 64 - bits;
    (((value << shift) as i64) >> shift) as u64
}

#[inline(always)]
fn sext16(value: u16) -> u64 {
    value as i16 as i64 as u64
}

/// Saturates a 40-bit value to 32 bits.
#[inline(always)]
fn saturated(value: u64) -> Option<u64> {
    (value != sign_extend::<32>(value)).then_some(if (value >> 39) != 0 {
        0xFFFF_FFFF_8000_0000
    } else {
        0x7FFF_FFFF
    })
}

/// Mask covering every bit up to the highest set bit of `value`.
#[inline(always)]
fn low_mask(value: u16) -> u16 {
    ((1u32 << (16 - value.leading_zeros())) - 1) as u16
}

/// A resolved `arN` indirect access.
#[derive(Clone, Copy)]
struct ArAccess {
    unit: usize,
    step: Step,
    offset: Offset,
}

/// A resolved `arpN` paired indirect access. `j` units are `r4` to `r7`.
#[derive(Clone, Copy)]
struct ArpAccess {
    i: usize,
    j: usize,
    step_i: Step,
    step_j: Step,
    offset_i: Offset,
    offset_j: Offset,
}

impl Interpreter {
    // ---- accumulators ----

    #[inline(always)]
    fn acc(&self, name: RegName) -> u64 {
        match name.acc() {
            Some((Acc::A0, _)) => self.regs.a[0],
            Some((Acc::A1, _)) => self.regs.a[1],
            Some((Acc::B0, _)) => self.regs.b[0],
            Some((Acc::B1, _)) => self.regs.b[1],
            None => unreachable!("{name} is not an accumulator"),
        }
    }

    #[inline(always)]
    fn set_acc(&mut self, name: RegName, value: u64) {
        let slot = match name.acc() {
            Some((Acc::A0, _)) => &mut self.regs.a[0],
            Some((Acc::A1, _)) => &mut self.regs.a[1],
            Some((Acc::B0, _)) => &mut self.regs.b[0],
            Some((Acc::B1, _)) => &mut self.regs.b[1],
            None => unreachable!("{name} is not an accumulator"),
        };

        *slot = value;
    }

    fn set_acc_flags(&mut self, value: u64) {
        let regs = &mut self.regs;
        regs.fz = value == 0;
        regs.fm = (value >> 39) != 0;
        regs.fe = value != sign_extend::<32>(value);

        let bit31 = (value >> 31) & 1;
        let bit30 = (value >> 30) & 1;
        regs.fn_ = regs.fz || (!regs.fe && bit31 != bit30);
    }

    /// Saturates `value` to 32 bits, raising `flm` if it had to be clamped.
    fn saturate(&mut self, value: u64) -> u64 {
        match saturated(value) {
            Some(clamped) => {
                self.regs.flm = true;
                clamped
            }
            None => value,
        }
    }

    /// Reads an accumulator, saturated unless saturation is disabled.
    fn acc_saturated(&mut self, name: RegName) -> u64 {
        let value = self.acc(name);
        if self.regs.sat {
            value
        } else {
            self.saturate(value)
        }
    }

    /// Reads an accumulator, saturated unless saturation is disabled, without touching `flm`.
    fn acc_saturated_quiet(&self, name: RegName) -> u64 {
        let value = self.acc(name);
        if self.regs.sat {
            value
        } else {
            saturated(value).unwrap_or(value)
        }
    }

    /// Writes an accumulator and updates the flags from the written value.
    fn write_acc(&mut self, name: RegName, value: u64) {
        self.set_acc_flags(value);
        self.set_acc(name, value);
    }

    /// Like [`Self::write_acc`], but saturates the stored value unless store saturation is
    /// disabled. Flags come from the unsaturated value.
    fn write_acc_sat(&mut self, name: RegName, value: u64) {
        self.set_acc_flags(value);
        let value = if self.regs.sata {
            value
        } else {
            self.saturate(value)
        };

        self.set_acc(name, value);
    }

    /// 40-bit adder. Updates `fc0`, `fv` and `fvl`.
    fn add_sub(&mut self, a: u64, b: u64, sub: bool) -> u64 {
        let a = a & ACC_MASK;
        let b = b & ACC_MASK;
        let result = if sub {
            a.wrapping_sub(b)
        } else {
            a.wrapping_add(b)
        };

        let b = if sub { !b } else { b };
        let regs = &mut self.regs;
        regs.fc0 = ((result >> 40) & 1) != 0;
        regs.fv = (((!(a ^ b) & (a ^ result)) >> 39) & 1) != 0;
        regs.fvl |= regs.fv;

        sign_extend::<40>(result)
    }

    /// 40-bit barrel shifter. `amount` is signed: positive shifts left, negative shifts right.
    /// Arithmetic unless the `s` mode bit is set.
    fn shift_bus40(&mut self, value: u64, amount: u16, dest: RegName) {
        let mut value = value & ACC_MASK;
        let negative = (value >> 39) != 0;
        let logic = self.regs.s;

        let regs = &mut self.regs;
        if (amount >> 15) == 0 {
            if amount >= 40 {
                if !logic {
                    regs.fv = value != 0;
                    regs.fvl |= regs.fv;
                }

                value = 0;
                regs.fc0 = false;
            } else {
                if !logic {
                    regs.fv = sign_extend::<40>(value) != sext(value, 40 - amount as u32);
                    regs.fvl |= regs.fv;
                }

                value <<= amount;
                regs.fc0 = (value & (1 << 40)) != 0;
            }
        } else {
            let amount = amount.wrapping_neg();
            if amount >= 40 {
                if logic {
                    value = 0;
                    regs.fc0 = false;
                } else {
                    regs.fc0 = negative;
                    value = if negative { ACC_MASK } else { 0 };
                }
            } else {
                regs.fc0 = (value & (1 << (amount - 1))) != 0;
                value >>= amount;
                if !logic {
                    value = sext(value, 40 - amount as u32);
                }
            }

            if !logic {
                regs.fv = false;
            }
        }

        let mut value = sign_extend::<40>(value);
        self.set_acc_flags(value);
        if !logic
            && !self.regs.sata
            && (self.regs.fv || sign_extend::<32>(value) != value)
        {
            self.regs.flm = true;
            value = if negative {
                0xFFFF_FFFF_8000_0000
            } else {
                0x7FFF_FFFF
            };
        }

        self.set_acc(dest, value);
    }

    /// Count of redundant sign bits of a 40-bit value, minus 8.
    fn exponent(value: u64) -> u16 {
        let sign = (value >> 39) & 1;
        let mut count: u16 = 0;
        for bit in (0..39).rev() {
            if ((value >> bit) & 1) != sign {
                break;
            }

            count += 1;
        }

        count.wrapping_sub(8)
    }

    // ---- products ----

    /// Reads a product register through the product shifter.
    fn product_bus40(&self, unit: usize) -> u64 {
        let value = self.regs.p[unit] as u64 | ((self.regs.pe[unit] as u64) << 32);
        match self.regs.ps[unit] {
            0 => sign_extend::<33>(value),
            1 => sign_extend::<32>(value >> 1),
            2 => sign_extend::<34>(value << 1),
            _ => sign_extend::<35>(value << 2),
        }
    }

    fn set_product(&mut self, unit: usize, value: u32) {
        self.regs.p[unit] = value;
        self.regs.pe[unit] = (value >> 31) != 0;
    }

    /// Multiplies `x[unit]` by `y[unit]` into `p[unit]`.
    fn multiply(&mut self, unit: usize, x_signed: bool, y_signed: bool) {
        let regs = &mut self.regs;
        let mut x = regs.x[unit] as u32;
        let mut y = regs.y[unit] as u32;

        match (regs.hwm, unit) {
            (1, _) | (3, 0) => y >>= 8,
            (2, _) | (3, 1) => y &= 0xFF,
            _ => (),
        }

        if x_signed {
            x = sign_extend::<16>(x as u64) as u32;
        }

        if y_signed {
            y = sign_extend::<16>(y as u64) as u32;
        }

        let product = x.wrapping_mul(y);
        regs.p[unit] = product;
        regs.pe[unit] = (x_signed || y_signed) && (product >> 31) != 0;
    }

    /// Adds or subtracts both product registers to a base value and stores the result.
    fn product_sum(&mut self, base: SumBase, acc: RegName, op0: SumOp, op1: SumOp) {
        let mut p0 = self.product_bus40(0);
        let mut p1 = self.product_bus40(1);
        if op0.is_aligned() {
            p0 = sign_extend::<24>(p0 >> 16);
        }

        if op1.is_aligned() {
            p1 = sign_extend::<24>(p1 >> 16);
        }

        let sv = sign_extend::<32>((self.regs.sv as u64) << 16);
        let base = match base {
            SumBase::Zero => 0,
            SumBase::Acc => self.acc(acc),
            SumBase::Sv => sv,
            SumBase::SvRnd => sv | 0x8000,
        };

        let result = self.add_sub(base, p0, op0.is_sub());
        let (fc0, fv) = (self.regs.fc0, self.regs.fv);
        let result = self.add_sub(result, p1, op1.is_sub());

        if op0.is_sub() == op1.is_sub() {
            self.regs.fc0 |= fc0;
            self.regs.fv |= fv;
        } else {
            self.regs.fc0 ^= fc0;
            self.regs.fv ^= fv;
        }

        self.write_acc_sat(acc, result);
    }

    // ---- register bus ----

    /// Reads a register as a 16-bit value. Accumulator halves are saturated when `sat` is set.
    fn reg_to_bus16(&mut self, name: RegName, sat: bool) -> u16 {
        if let Some((_, part)) = name.acc() {
            let value = match part {
                AccPart::Full => return self.acc(name) as u16,
                AccPart::Ext => {
                    tracing::warn!("reading {name} through the 16-bit bus");
                    return 0;
                }
                _ if sat => self.acc_saturated(name),
                _ => self.acc(name),
            };

            return if part == AccPart::High {
                (value >> 16) as u16
            } else {
                value as u16
            };
        }

        if let Some(index) = name.rn() {
            return self.regs.r[index];
        }

        match name {
            RegName::Y0 => self.regs.y[0],
            RegName::P => (self.product_bus40(0) >> 16) as u16,
            RegName::Sp => self.regs.sp,
            RegName::Sv => self.regs.sv,
            RegName::Lc => self.regs.lc(),
            RegName::Ext0 => self.regs.ext[0],
            RegName::Ext1 => self.regs.ext[1],
            RegName::Ext2 => self.regs.ext[2],
            RegName::Ext3 => self.regs.ext[3],
            RegName::Pc => {
                tracing::warn!("reading pc through the 16-bit bus");
                0
            }
            _ => self.regs.pseudo(name).unwrap_or_else(|| {
                tracing::warn!("reading undefined register");
                0
            }),
        }
    }

    /// Writes a 16-bit value to a register.
    fn reg_from_bus16(&mut self, name: RegName, value: u16) {
        if let Some((_, part)) = name.acc() {
            match part {
                AccPart::Full => self.write_acc_sat(name, sext16(value)),
                AccPart::Low => self.write_acc_sat(name, value as u64),
                AccPart::High => {
                    self.write_acc_sat(name, sign_extend::<32>((value as u64) << 16));
                }
                AccPart::Ext => tracing::warn!("writing {name} through the 16-bit bus"),
            }

            return;
        }

        if let Some(index) = name.rn() {
            self.regs.r[index] = value;
            return;
        }

        match name {
            RegName::Y0 => self.regs.y[0] = value,
            RegName::P => {
                self.regs.pe[0] = value > 0x7FFF;
                self.regs.p[0] = (self.regs.p[0] & 0xFFFF) | ((value as u32) << 16);
            }
            RegName::Sp => self.regs.sp = value,
            RegName::Sv => self.regs.sv = value,
            RegName::Lc => *self.regs.lc_mut() = value,
            RegName::Ext0 => self.regs.ext[0] = value,
            RegName::Ext1 => self.regs.ext[1] = value,
            RegName::Ext2 => self.regs.ext[2] = value,
            RegName::Ext3 => self.regs.ext[3] = value,
            RegName::Pc => tracing::warn!("writing pc through the 16-bit bus"),
            _ => {
                if !self.regs.set_pseudo(name, value) {
                    tracing::warn!("writing undefined register");
                }
            }
        }
    }

    // ---- addressing ----

    /// Applies bit reversal to an address register value, if enabled for `unit`.
    fn rn_address(&self, unit: usize, value: u16) -> u16 {
        if self.regs.br[unit] && !self.regs.m[unit] {
            value.reverse_bits()
        } else {
            value
        }
    }

    /// Post-modifies `r[unit]` and returns its previous value.
    fn rn_and_modify(&mut self, unit: usize, step: Step, dmod: bool) -> u16 {
        let old = self.regs.r[unit];
        let reset = (unit == 3 && self.regs.epi) || (unit == 7 && self.regs.epj);
        if reset && !step.is_double() {
            self.regs.r[unit] = 0;
            return old;
        }

        self.regs.r[unit] = self.step_address(unit, old, step, dmod);
        old
    }

    /// Address of an indirect access through `r[unit]`, post-modifying the register.
    #[inline(always)]
    fn indirect(&mut self, unit: usize, step: Step) -> u16 {
        self.indirect_dmod(unit, step, false)
    }

    fn indirect_dmod(&mut self, unit: usize, step: Step, dmod: bool) -> u16 {
        let value = self.rn_and_modify(unit, step, dmod);
        self.rn_address(unit, value)
    }

    #[inline(always)]
    fn modulo(&self, unit: usize) -> u16 {
        if unit < 4 {
            self.regs.modi
        } else {
            self.regs.modj
        }
    }

    /// Address of the second word of a paired access.
    fn offset_address(&self, unit: usize, addr: u16, offset: Offset, dmod: bool) -> u16 {
        match offset {
            Offset::Zero => return addr,
            Offset::MinusOneDmod => return addr.wrapping_sub(1),
            _ => (),
        }

        let emod = self.regs.m[unit] && !self.regs.br[unit] && !dmod;
        let modulo = self.modulo(unit);
        let mask = (0..9).fold(1, |mask, i| mask | (modulo >> i));

        match offset {
            Offset::PlusOne if emod && (addr & mask) == modulo => addr & !mask,
            Offset::PlusOne => addr.wrapping_add(1),
            _ if !emod => addr.wrapping_sub(1),
            _ => {
                tracing::warn!("decrementing offset with modulo addressing");
                if (addr & mask) == 0 {
                    addr | modulo
                } else {
                    addr.wrapping_sub(1)
                }
            }
        }
    }

    fn step_address(&self, unit: usize, addr: u16, step: Step, dmod: bool) -> u16 {
        let regs = &self.regs;
        let legacy = regs.cmd;
        let (step0, step7) = if unit < 4 {
            (regs.stepi0, regs.stepi)
        } else {
            (regs.stepj0, regs.stepj)
        };

        let mut mode1 = false;
        let mut mode2 = false;
        let mut s = match step {
            Step::Zero => 0,
            Step::Increase => 1,
            Step::Decrease => 0xFFFF,
            Step::Increase2Mode1 | Step::Decrease2Mode1 => {
                mode1 = !legacy;
                if step == Step::Increase2Mode1 { 2 } else { 0xFFFE }
            }
            Step::Increase2Mode2 | Step::Decrease2Mode2 => {
                mode2 = !legacy;
                if step == Step::Increase2Mode2 { 2 } else { 0xFFFE }
            }
            Step::PlusStep => {
                if regs.stp16 && !legacy {
                    if regs.m[unit] {
                        sign_extend16::<9>(step0)
                    } else {
                        step0
                    }
                } else if regs.br[unit] && !regs.m[unit] {
                    step0
                } else {
                    sign_extend16::<7>(step7)
                }
            }
        };

        if s == 0 {
            return addr;
        }

        if dmod || regs.br[unit] || !regs.m[unit] {
            return addr.wrapping_add(s);
        }

        let modulo = self.modulo(unit);
        if modulo == 0 || (modulo == 1 && mode2) {
            return addr;
        }

        let iterations = if mode1 {
            s = sign_extend16::<15>(s >> 1);
            2
        } else {
            1
        };

        let mut addr = addr;
        for _ in 0..iterations {
            let (mask, next) = if legacy || mode2 {
                let negative = (s >> 15) != 0;
                let mask = low_mask(modulo | if negative { !s } else { s });
                let wraps = !mode2 || modulo != mask;
                let next = if !negative && (addr & mask) == modulo && wraps {
                    0
                } else if negative && (addr & mask) == 0 && wraps {
                    modulo
                } else {
                    addr.wrapping_add(s) & mask
                };

                (mask, next)
            } else {
                let mask = low_mask(modulo);
                let next = if s < 0x8000 {
                    let next = addr.wrapping_add(s) & mask;
                    if next == (modulo.wrapping_add(1) & mask) {
                        0
                    } else {
                        next
                    }
                } else {
                    let mut next = addr & mask;
                    if next == 0 {
                        next = modulo.wrapping_add(1);
                    }

                    next.wrapping_add(s) & mask
                };

                (mask, next)
            };

            addr = (addr & !mask) | next;
        }

        addr
    }

    fn ar_access(&self, ins: Ins, rn: Operand, step: Operand) -> ArAccess {
        let config = ins.unit(step);
        ArAccess {
            unit: self.regs.arrn[ins.unit(rn)] as usize,
            step: Step::from_config(self.regs.arstep[config]),
            offset: Offset::from_config(self.regs.aroffset[config]),
        }
    }

    fn arp_access(&self, ins: Ins, rn: Operand, step_i: Operand, step_j: Operand) -> ArpAccess {
        let regs = &self.regs;
        let index = ins.unit(rn);
        let config_i = ins.unit(step_i);
        let config_j = ins.unit(step_j);

        ArpAccess {
            i: regs.arprni[index] as usize,
            j: regs.arprnj[index] as usize + 4,
            step_i: Step::from_config(regs.arpstepi[config_i]),
            step_j: Step::from_config(regs.arpstepj[config_j]),
            offset_i: Offset::from_config(regs.arpoffseti[config_i]),
            offset_j: Offset::from_config(regs.arpoffsetj[config_j]),
        }
    }

    // ---- data memory ----

    fn mem_address(&self, mem: Mem) -> u16 {
        match mem {
            Mem::Page(offset) => offset as u16 | ((self.regs.page as u16) << 8),
            Mem::Imm16(addr) => addr,
            Mem::R7Imm16(offset) | Mem::R7Imm7s(offset) => offset.wrapping_add(self.regs.r[7]),
        }
    }

    #[inline(always)]
    fn load(&self, sys: &mut System, mem: Mem) -> u16 {
        sys.read_data(self.mem_address(mem))
    }

    #[inline(always)]
    fn store(&self, sys: &mut System, mem: Mem, value: u16) {
        sys.write_data(self.mem_address(mem), value);
    }

    fn push(&mut self, sys: &mut System, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        sys.write_data(self.regs.sp, value);
    }

    fn pop(&mut self, sys: &mut System) -> u16 {
        let value = sys.read_data(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        value
    }

    /// Logs an encoding without defined behaviour. The instruction then acts as a `nop`.
    #[cold]
    fn reserved(&self, ins: Ins) {
        tracing::warn!(
            "undefined behaviour for {ins:?} near pc 0x{:05X}, ignoring",
            self.regs.pc
        );
    }

    // ---- program counter ----

    pub(crate) fn set_pc(&mut self, addr: u32) {
        if addr > PC_MASK {
            tracing::warn!("program counter 0x{addr:08X} out of range");
        }

        self.regs.pc = addr & PC_MASK;
    }

    pub(crate) fn push_pc(&mut self, sys: &mut System) {
        let low = self.regs.pc as u16;
        let high = (self.regs.pc >> 16) as u16;
        if self.regs.cpc {
            self.push(sys, high);
            self.push(sys, low);
        } else {
            self.push(sys, low);
            self.push(sys, high);
        }
    }

    pub(crate) fn pop_pc(&mut self, sys: &mut System) {
        let (low, high) = if self.regs.cpc {
            let low = self.pop(sys);
            (low, self.pop(sys))
        } else {
            let high = self.pop(sys);
            (self.pop(sys), high)
        };

        self.set_pc(low as u32 | ((high as u32) << 16));
    }

    /// Switches to the interrupt context: flags, banked registers, the repeat counter and the
    /// second accumulators.
    pub(crate) fn context_store(&mut self) {
        let regs = &mut self.regs;
        regs.shadow_store();
        regs.shadow_swap();

        if !regs.crep {
            regs.repcs = regs.repc;
        }

        if regs.ccnta {
            let a1 = regs.a[1];
            let b1 = regs.b[1];
            regs.b[1] = a1;
            self.write_acc(RegName::A1, b1);
        } else {
            regs.a1s = regs.a[1];
            regs.b1s = regs.b[1];
        }
    }

    pub(crate) fn context_restore(&mut self) {
        let regs = &mut self.regs;
        regs.shadow_restore();
        regs.shadow_swap();

        if !regs.crep {
            regs.repc = regs.repcs;
        }

        if regs.ccnta {
            std::mem::swap(&mut regs.a[1], &mut regs.b[1]);
        } else {
            regs.a[1] = regs.a1s;
            regs.b[1] = regs.b1s;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn interp() -> (Interpreter, System) {
        (Interpreter::default(), System::default())
    }

    #[test]
    fn adder_flags() {
        let (mut int, _) = interp();

        let r = int.add_sub(0x7F_FFFF_FFFF, 1, false);
        assert_eq!(r, 0xFFFF_FF80_0000_0000);
        assert!(int.regs.fv);
        assert!(int.regs.fvl);
        assert!(!int.regs.fc0);

        let r = int.add_sub(0, 1, true);
        assert_eq!(r, u64::MAX);
        assert!(int.regs.fc0);
        assert!(!int.regs.fv);
    }

    #[test]
    fn accumulator_flags() {
        let (mut int, _) = interp();

        int.write_acc(RegName::A0, 0);
        assert!(int.regs.fz);
        assert!(int.regs.fn_);

        int.write_acc(RegName::A0, 0x1_0000_0000);
        assert!(int.regs.fe);
        assert!(!int.regs.fm);

        int.write_acc(RegName::B1, sign_extend::<40>(0x80_0000_0000));
        assert!(int.regs.fm);
    }

    #[test]
    fn store_saturation() {
        let (mut int, _) = interp();
        int.regs.sata = false;

        int.write_acc_sat(RegName::A1, 0x1_2345_6789);
        assert_eq!(int.regs.a[1], 0x7FFF_FFFF);
        assert!(int.regs.flm);

        int.regs.sata = true;
        int.write_acc_sat(RegName::A1, 0x1_2345_6789);
        assert_eq!(int.regs.a[1], 0x1_2345_6789);
    }

    #[test]
    fn bus_reads_saturate_halves() {
        let (mut int, _) = interp();
        int.regs.a[0] = 0x12_3456_789A;

        assert_eq!(int.reg_to_bus16(RegName::A0l, false), 0x789A);
        assert_eq!(int.reg_to_bus16(RegName::A0l, true), 0xFFFF);
        assert_eq!(int.reg_to_bus16(RegName::A0h, true), 0x7FFF);
        assert_eq!(int.reg_to_bus16(RegName::A0, true), 0x789A);
    }

    #[test]
    fn bus_writes_sign_extend() {
        let (mut int, _) = interp();

        int.reg_from_bus16(RegName::B0h, 0x8000);
        assert_eq!(int.regs.b[0], 0xFFFF_FFFF_8000_0000);

        int.reg_from_bus16(RegName::B0l, 0x8000);
        assert_eq!(int.regs.b[0], 0x8000);

        int.reg_from_bus16(RegName::B0, 0x8000);
        assert_eq!(int.regs.b[0], 0xFFFF_FFFF_FFFF_8000);
    }

    #[test]
    fn shifter() {
        let (mut int, _) = interp();

        int.shift_bus40(0x1234, 4, RegName::A0);
        assert_eq!(int.regs.a[0], 0x12340);

        int.shift_bus40(sign_extend::<40>(0x80_0000_0000), 0xFFFF, RegName::A0);
        assert_eq!(int.regs.a[0], 0xFFFF_FFC0_0000_0000);
        assert!(!int.regs.fc0);

        int.shift_bus40(3, 0xFFFF, RegName::A0);
        assert_eq!(int.regs.a[0], 1);
        assert!(int.regs.fc0);

        int.regs.s = true;
        int.shift_bus40(sign_extend::<40>(0x80_0000_0000), 0xFFFF, RegName::A0);
        assert_eq!(int.regs.a[0], 0x40_0000_0000);
    }

    #[test]
    fn shifter_saturates_on_overflow() {
        let (mut int, _) = interp();
        int.regs.sata = false;

        int.shift_bus40(0x4000_0000, 1, RegName::B0);
        assert_eq!(int.regs.b[0], 0x7FFF_FFFF);
        assert!(int.regs.flm);
    }

    #[test]
    fn products() {
        let (mut int, _) = interp();
        int.regs.x[0] = 0xFFFF;
        int.regs.y[0] = 2;

        int.multiply(0, true, true);
        assert_eq!(int.regs.p[0], 0xFFFF_FFFE);
        assert!(int.regs.pe[0]);
        assert_eq!(int.product_bus40(0), 0xFFFF_FFFF_FFFF_FFFE);

        int.multiply(0, false, false);
        assert_eq!(int.regs.p[0], 0x1FFFE);
        assert!(!int.regs.pe[0]);

        int.regs.ps[0] = 2;
        assert_eq!(int.product_bus40(0), 0x3FFFC);
    }

    #[test]
    fn half_word_multiply() {
        let (mut int, _) = interp();
        int.regs.x[1] = 3;
        int.regs.y[1] = 0x1234;

        int.regs.hwm = 3;
        int.multiply(1, false, false);
        assert_eq!(int.regs.p[1], 3 * 0x34);

        int.regs.hwm = 1;
        int.multiply(1, false, false);
        assert_eq!(int.regs.p[1], 3 * 0x12);
    }

    #[test]
    fn product_sum_combines_carries() {
        let (mut int, _) = interp();
        int.set_product(0, 0x10);
        int.set_product(1, 0x4);
        int.regs.a[0] = 0x100;

        int.product_sum(SumBase::Acc, RegName::A0, SumOp::Add, SumOp::Sub);
        assert_eq!(int.regs.a[0], 0x10C);

        int.product_sum(SumBase::Zero, RegName::B0, SumOp::Sub, SumOp::Sub);
        assert_eq!(int.regs.b[0], sign_extend::<40>(0u64.wrapping_sub(0x14)));
    }

    #[test]
    fn linear_steps() {
        let (mut int, _) = interp();
        int.regs.r[2] = 10;

        assert_eq!(int.indirect(2, Step::Increase), 10);
        assert_eq!(int.regs.r[2], 11);
        assert_eq!(int.indirect(2, Step::Decrease), 11);
        assert_eq!(int.regs.r[2], 10);

        int.regs.stepi = 0x7E;
        int.indirect(2, Step::PlusStep);
        assert_eq!(int.regs.r[2], 8);
    }

    #[test]
    fn modulo_steps() {
        let (mut int, _) = interp();
        int.regs.m[1] = true;
        int.regs.modi = 3;
        int.regs.r[1] = 0x0103;

        int.indirect(1, Step::Increase);
        assert_eq!(int.regs.r[1], 0x0100);

        int.indirect(1, Step::Decrease);
        assert_eq!(int.regs.r[1], 0x0103);

        // dmod bypasses modulo
        int.indirect_dmod(1, Step::Increase, true);
        assert_eq!(int.regs.r[1], 0x0104);
    }

    #[test]
    fn modulo_steps_new_mode() {
        let (mut int, _) = interp();
        int.regs.cmd = false;
        int.regs.m[5] = true;
        int.regs.modj = 4;
        int.regs.r[5] = 4;

        int.indirect(5, Step::Increase);
        assert_eq!(int.regs.r[5], 0);

        int.indirect(5, Step::Decrease);
        assert_eq!(int.regs.r[5], 4);
    }

    #[test]
    fn bit_reversed_addresses() {
        let (mut int, _) = interp();
        int.regs.br[0] = true;
        int.regs.r[0] = 1;

        assert_eq!(int.indirect(0, Step::Increase), 0x8000);
        assert_eq!(int.regs.r[0], 2);
    }

    #[test]
    fn pointer_reset_units() {
        let (mut int, _) = interp();
        int.regs.epi = true;
        int.regs.r[3] = 0x55;

        assert_eq!(int.rn_and_modify(3, Step::Increase, false), 0x55);
        assert_eq!(int.regs.r[3], 0);
    }

    #[test]
    fn offsets() {
        let (mut int, _) = interp();
        assert_eq!(int.offset_address(0, 7, Offset::PlusOne, false), 8);
        assert_eq!(int.offset_address(0, 7, Offset::MinusOneDmod, false), 6);

        int.regs.m[0] = true;
        int.regs.modi = 7;
        assert_eq!(int.offset_address(0, 0x17, Offset::PlusOne, false), 0x10);
        assert_eq!(int.offset_address(0, 0x17, Offset::PlusOne, true), 0x18);
    }

    #[test]
    fn pc_stack_order() {
        let (mut int, mut sys) = interp();
        int.regs.sp = 0x100;
        int.regs.pc = 0x2_1234;

        int.push_pc(&mut sys);
        assert_eq!(int.regs.sp, 0xFE);
        assert_eq!(sys.read_data(0xFF), 0x0002);
        assert_eq!(sys.read_data(0xFE), 0x1234);

        int.regs.pc = 0;
        int.pop_pc(&mut sys);
        assert_eq!(int.regs.pc, 0x2_1234);
        assert_eq!(int.regs.sp, 0x100);
    }

    #[test]
    fn context_switch_swaps_second_accumulators() {
        let (mut int, _) = interp();
        int.regs.a[1] = 1;
        int.regs.b[1] = 2;
        int.regs.repc = 9;

        int.context_store();
        assert_eq!(int.regs.a[1], 2);
        assert_eq!(int.regs.b[1], 1);

        int.context_restore();
        assert_eq!(int.regs.a[1], 1);
        assert_eq!(int.regs.b[1], 2);
        assert_eq!(int.regs.repc, 9);
    }

    #[test]
    fn exponents() {
        assert_eq!(Interpreter::exponent(0), 31);
        assert_eq!(Interpreter::exponent(0x4000_0000), 0);
        assert_eq!(Interpreter::exponent(0x40_0000_0000), 0xFFF8);
        assert_eq!(Interpreter::exponent(u64::MAX), 31);
    }
}
