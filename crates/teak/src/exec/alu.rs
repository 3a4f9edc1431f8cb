//! Arithmetic, logic, shifts, comparisons and the vector trace unit.

use super::{ACC_MASK, sext16};
use crate::{
    Interpreter,
    ins::{
        Ins,
        operand::{AlbOp, AlmOp, ModaOp, RegName, SwapType},
    },
    system::System,
};
use util::sign_extend;

/// Widens a 16-bit `alm` operand the way the operation expects it.
fn alm_operand(op: AlmOp, value: u16) -> u64 {
    match op {
        AlmOp::Cmp | AlmOp::Sub | AlmOp::Add => sext16(value),
        AlmOp::Addh | AlmOp::Subh => sign_extend::<32>((value as u64) << 16),
        _ => value as u64,
    }
}

/// Whether an `alm` operation accepts a full 40-bit operand (`p`, `a0` or `a1`).
fn alm_takes_bus40(op: AlmOp) -> bool {
    matches!(
        op,
        AlmOp::Or | AlmOp::And | AlmOp::Xor | AlmOp::Add | AlmOp::Cmp | AlmOp::Sub
    )
}

/// The second accumulator cleared by `clr`/`clrr`. Some encodings name the same accumulator twice.
fn second_clear_target(first: RegName, second: RegName) -> RegName {
    use RegName::{A0, A1, B0, B1};
    match first {
        B0 => B1,
        B1 => B0,
        A0 if second == A0 => A1,
        A0 => second,
        _ if second == B1 => B1,
        _ => B0,
    }
}

impl Interpreter {
    fn alm_generic(&mut self, op: AlmOp, operand: u64, dest: RegName) {
        let value = self.acc(dest);
        match op {
            AlmOp::Or => self.write_acc(dest, sign_extend::<40>(value | operand)),
            AlmOp::And => self.write_acc(dest, sign_extend::<40>(value & operand)),
            AlmOp::Xor => self.write_acc(dest, sign_extend::<40>(value ^ operand)),
            AlmOp::Tst0 => self.regs.fz = (value & 0xFFFF & operand) == 0,
            AlmOp::Tst1 => self.regs.fz = (value & 0xFFFF & !operand) == 0,
            AlmOp::Add
            | AlmOp::Addl
            | AlmOp::Addh
            | AlmOp::Sub
            | AlmOp::Subl
            | AlmOp::Subh
            | AlmOp::Cmp
            | AlmOp::Cmpu => {
                let sub = !matches!(op, AlmOp::Add | AlmOp::Addl | AlmOp::Addh);
                let result = self.add_sub(value, operand, sub);
                if matches!(op, AlmOp::Cmp | AlmOp::Cmpu) {
                    self.set_acc_flags(result);
                } else {
                    self.write_acc_sat(dest, result);
                }
            }
            AlmOp::Msu => {
                let product = self.product_bus40(0);
                let result = self.add_sub(value, product, true);
                self.write_acc_sat(dest, result);

                self.regs.x[0] = operand as u16;
                self.multiply(0, true, true);
            }
            AlmOp::Sqr | AlmOp::Sqra => {
                if op == AlmOp::Sqra {
                    let product = self.product_bus40(0);
                    let result = self.add_sub(value, product, false);
                    self.write_acc_sat(dest, result);
                }

                self.regs.x[0] = operand as u16;
                self.regs.y[0] = operand as u16;
                self.multiply(0, true, true);
            }
        }
    }

    /// `alm`/`alu` with a 16-bit operand.
    fn alm16(&mut self, op: AlmOp, operand: u16, dest: RegName) {
        self.alm_generic(op, alm_operand(op, operand), dest);
    }

    pub fn alm_page(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let Some(op) = ins.alm(ops[0]) else {
            return self.reserved(ins);
        };

        let value = self.load(sys, ins.mem(ops[1]));
        self.alm16(op, value, ins.reg(ops[2]));
    }

    pub fn alm_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let Some(op) = ins.alm(ops[0]) else {
            return self.reserved(ins);
        };

        let addr = self.indirect(ins.unit(ops[1]), ins.step(ops[2]));
        let value = sys.read_data(addr);
        self.alm16(op, value, ins.reg(ops[3]));
    }

    pub fn alm_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let Some(op) = ins.alm(ops[0]) else {
            return self.reserved(ins);
        };

        let src = ins.reg(ops[1]);
        let dest = ins.reg(ops[2]);
        match src {
            RegName::P | RegName::A0 | RegName::A1 => {
                if !alm_takes_bus40(op) {
                    return self.reserved(ins);
                }

                let value = if src == RegName::P {
                    self.product_bus40(0)
                } else {
                    self.acc(src)
                };

                self.alm_generic(op, value, dest);
            }
            _ => {
                let value = self.reg_to_bus16(src, false);
                self.alm16(op, value, dest);
            }
        }
    }

    pub fn alm_r6(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let Some(op) = ins.alm(ops[0]) else {
            return self.reserved(ins);
        };

        self.alm16(op, self.regs.r[6], ins.reg(ops[1]));
    }

    /// `alu` with a memory or 16-bit immediate operand.
    pub fn alu(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let Some(op) = ins.alm(ops[0]) else {
            return self.reserved(ins);
        };

        let value = match ops[1] {
            crate::ins::Operand::Imm16 => ins.imm(ops[1]),
            operand => self.load(sys, ins.mem(operand)),
        };

        self.alm16(op, value, ins.reg(ops[2]));
    }

    /// `alu` with an 8-bit immediate. `and` leaves bits 8 to 15 of the accumulator untouched, but
    /// sets the flags as if they were cleared.
    pub fn alu_imm8(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let Some(op) = ins.alm(ops[0]) else {
            return self.reserved(ins);
        };

        let dest = ins.reg(ops[2]);
        let kept = self.acc(dest) & 0xFF00;
        self.alm16(op, ins.imm(ops[1]), dest);

        if op == AlmOp::And {
            let value = self.acc(dest) & !0xFF00;
            self.set_acc(dest, value | kept);
        }
    }

    pub fn or(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc(ins.reg(ops[0])) | self.acc(ins.reg(ops[1]));
        self.write_acc(ins.reg(ops[2]), value);
    }

    pub fn and(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc(ins.reg(ops[0])) & self.acc(ins.reg(ops[1]));
        self.write_acc(ins.reg(ops[2]), value);
    }

    // ---- bit manipulation on 16-bit values ----

    fn alb_generic(&mut self, op: AlbOp, imm: u16, value: u16) -> u16 {
        let regs = &mut self.regs;
        let result = match op {
            AlbOp::Set => {
                let result = imm | value;
                regs.fm = (result >> 15) != 0;
                result
            }
            AlbOp::Rst => {
                let result = !imm & value;
                regs.fm = (result >> 15) != 0;
                result
            }
            AlbOp::Chng => {
                let result = imm ^ value;
                regs.fm = (result >> 15) != 0;
                result
            }
            AlbOp::Addv => {
                let sum = imm as u32 + value as u32;
                regs.fc0 = (sum >> 16) != 0;
                regs.fm = (value as i16 as i32 + imm as i16 as i32) < 0;
                sum as u16
            }
            AlbOp::Tst0 => ((imm & value) != 0) as u16,
            AlbOp::Tst1 => ((imm & !value) != 0) as u16,
            AlbOp::Cmpv | AlbOp::Subv => {
                let diff = (value as u32).wrapping_sub(imm as u32);
                regs.fc0 = (diff >> 16) != 0;
                regs.fm = (value as i16 as i32 - imm as i16 as i32) < 0;
                diff as u16
            }
        };

        regs.fz = result == 0;
        result
    }

    pub fn alb_page(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let op = ins.alb(ops[0]);
        let mem = ins.mem(ops[2]);

        let value = self.load(sys, mem);
        let result = self.alb_generic(op, ins.imm(ops[1]), value);
        if op.modifies() {
            self.store(sys, mem, result);
        }
    }

    pub fn alb_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let op = ins.alb(ops[0]);

        let addr = self.indirect(ins.unit(ops[2]), ins.step(ops[3]));
        let value = sys.read_data(addr);
        let result = self.alb_generic(op, ins.imm(ops[1]), value);
        if op.modifies() {
            sys.write_data(addr, result);
        }
    }

    /// `alb` on a register. Accumulator halves are modified in place, bypassing saturation and
    /// the accumulator flags.
    pub fn alb_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let op = ins.alb(ops[0]);
        let dest = ins.reg(ops[2]);

        let value = match dest {
            RegName::P => (self.product_bus40(0) >> 16) as u16,
            RegName::A0 | RegName::A1 => return self.reserved(ins),
            _ => self.reg_to_bus16(dest, false),
        };

        let result = self.alb_generic(op, ins.imm(ops[1]), value) as u64;
        if !op.modifies() {
            return;
        }

        match dest {
            RegName::A0l | RegName::A1l | RegName::B0l | RegName::B1l => {
                let value = (self.acc(dest) & !0xFFFF) | result;
                self.set_acc(dest, value);
            }
            RegName::A0h | RegName::A1h | RegName::B0h | RegName::B1h => {
                let value = (self.acc(dest) & !0xFFFF_0000) | (result << 16);
                self.set_acc(dest, value);
            }
            _ => self.reg_from_bus16(dest, result as u16),
        }
    }

    pub fn alb_r6(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let op = ins.alb(ops[0]);

        let result = self.alb_generic(op, ins.imm(ops[1]), self.regs.r[6]);
        if op.modifies() {
            self.regs.r[6] = result;
        }
    }

    pub fn alb_stt_mod(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let op = ins.alb(ops[0]);
        let dest = ins.reg(ops[2]);

        let value = self.reg_to_bus16(dest, false);
        let result = self.alb_generic(op, ins.imm(ops[1]), value);
        if op.modifies() {
            self.reg_from_bus16(dest, result);
        }
    }

    // ---- accumulator add and subtract ----

    fn add_sub_into(&mut self, operand: u64, dest: RegName, sub: bool) {
        let value = self.acc(dest);
        let result = self.add_sub(value, operand, sub);
        self.write_acc_sat(dest, result);
    }

    pub fn add_acc(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let operand = self.acc(ins.reg(ops[0]));
        self.add_sub_into(operand, ins.reg(ops[1]), false);
    }

    pub fn add_p1(&mut self, _: &mut System, ins: Ins) {
        let operand = self.product_bus40(1);
        self.add_sub_into(operand, ins.reg(ins.operands()[0]), false);
    }

    pub fn add_px(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let operand = self.product_bus40(ins.unit(ops[0]));
        self.add_sub_into(operand, ins.reg(ops[1]), false);
    }

    pub fn sub_acc(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let operand = self.acc(ins.reg(ops[0]));
        self.add_sub_into(operand, ins.reg(ops[1]), true);
    }

    pub fn sub_p1(&mut self, _: &mut System, ins: Ins) {
        let operand = self.product_bus40(1);
        self.add_sub_into(operand, ins.reg(ins.operands()[0]), true);
    }

    pub fn sub_px(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let operand = self.product_bus40(ins.unit(ops[0]));
        self.add_sub_into(operand, ins.reg(ops[1]), true);
    }

    // ---- split high/low sums ----

    /// Resolves the paired indirect access of `ops[0..3]` and post-modifies both pointers,
    /// returning the access and the `i` and `j` addresses.
    fn paired_addresses(&mut self, ins: Ins) -> (super::ArpAccess, u16, u16) {
        let ops = ins.operands();
        let arp = self.arp_access(ins, ops[0], ops[1], ops[2]);
        let i = self.indirect(arp.i, arp.step_i);
        let j = self.indirect(arp.j, arp.step_j);
        (arp, i, j)
    }

    /// Computes both halves of an accumulator independently from two memory pairs.
    fn paired_sum(&mut self, sys: &mut System, ins: Ins, high_sub: bool, low_sub: bool) {
        let (arp, i, j) = self.paired_addresses(ins);

        let high_j = sext16(sys.read_data(j));
        let high_i = sext16(sys.read_data(i));
        let high = if high_sub {
            high_j.wrapping_sub(high_i)
        } else {
            high_j.wrapping_add(high_i)
        };

        let low_j = sys.read_data(self.offset_address(arp.j, j, arp.offset_j, false));
        let low_i = sys.read_data(self.offset_address(arp.i, i, arp.offset_i, false));
        let low = if low_sub {
            low_j.wrapping_sub(low_i)
        } else {
            low_j.wrapping_add(low_i)
        };

        let dest = ins.reg(ins.operands()[3]);
        self.set_acc(dest, (high << 16) | low as u64);
    }

    /// Adds `sv` to one half of a memory pair and subtracts it from the other.
    fn sv_sum(&self, sys: &mut System, unit: usize, addr: u16, offset: super::Offset, high_sub: bool) -> u64 {
        let sv = self.regs.sv;
        let high = sext16(sys.read_data(addr));
        let high = if high_sub {
            high.wrapping_sub(sext16(sv))
        } else {
            high.wrapping_add(sext16(sv))
        };

        let low = sys.read_data(self.offset_address(unit, addr, offset, false));
        let low = if high_sub {
            low.wrapping_add(sv)
        } else {
            low.wrapping_sub(sv)
        };

        (high << 16) | low as u64
    }

    pub fn add_add(&mut self, sys: &mut System, ins: Ins) {
        self.paired_sum(sys, ins, false, false);
    }

    pub fn add_sub(&mut self, sys: &mut System, ins: Ins) {
        self.paired_sum(sys, ins, false, true);
    }

    pub fn sub_add(&mut self, sys: &mut System, ins: Ins) {
        self.paired_sum(sys, ins, true, false);
    }

    pub fn sub_sub(&mut self, sys: &mut System, ins: Ins) {
        self.paired_sum(sys, ins, true, true);
    }

    fn sv_sum_indirect(&mut self, sys: &mut System, ins: Ins, high_sub: bool) {
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.indirect(ar.unit, ar.step);
        let result = self.sv_sum(sys, ar.unit, addr, ar.offset, high_sub);
        self.set_acc(ins.reg(ops[2]), result);
    }

    pub fn add_sub_sv(&mut self, sys: &mut System, ins: Ins) {
        self.sv_sum_indirect(sys, ins, false);
    }

    pub fn sub_add_sv(&mut self, sys: &mut System, ins: Ins) {
        self.sv_sum_indirect(sys, ins, true);
    }

    /// `sub_add` with `sv` on one pointer of a pair while `sv` is reloaded through the other.
    fn sv_sum_reload(&mut self, sys: &mut System, ins: Ins, from_i: bool) {
        let (arp, i, j) = self.paired_addresses(ins);
        let result = if from_i {
            self.sv_sum(sys, arp.i, i, arp.offset_i, true)
        } else {
            self.sv_sum(sys, arp.j, j, arp.offset_j, true)
        };

        self.set_acc(ins.reg(ins.operands()[3]), result);
        self.regs.sv = sys.read_data(if from_i { j } else { i });
    }

    pub fn sub_add_i_mov_j_sv(&mut self, sys: &mut System, ins: Ins) {
        self.sv_sum_reload(sys, ins, true);
    }

    pub fn sub_add_j_mov_i_sv(&mut self, sys: &mut System, ins: Ins) {
        self.sv_sum_reload(sys, ins, false);
    }

    /// `add_sub` with `sv` on one pointer of a pair while the old low half of the accumulator is
    /// stored through the other.
    fn sv_sum_exchange(&mut self, sys: &mut System, ins: Ins, from_i: bool) {
        let (arp, i, j) = self.paired_addresses(ins);
        let result = if from_i {
            self.sv_sum(sys, arp.i, i, arp.offset_i, false)
        } else {
            self.sv_sum(sys, arp.j, j, arp.offset_j, false)
        };

        let dest = ins.reg(ins.operands()[3]);
        let exchange = self.acc_saturated_quiet(dest) as u16;
        self.set_acc(dest, result);
        sys.write_data(if from_i { j } else { i }, exchange);
    }

    pub fn add_sub_i_mov_j(&mut self, sys: &mut System, ins: Ins) {
        self.sv_sum_exchange(sys, ins, true);
    }

    pub fn add_sub_j_mov_i(&mut self, sys: &mut System, ins: Ins) {
        self.sv_sum_exchange(sys, ins, false);
    }

    // ---- accumulator modification ----

    fn modify_acc(&mut self, op: ModaOp, name: RegName) {
        let value = self.acc(name);
        match op {
            ModaOp::Shr => self.shift_bus40(value, 0xFFFF, name),
            ModaOp::Shr4 => self.shift_bus40(value, 0xFFFC, name),
            ModaOp::Shl => self.shift_bus40(value, 1, name),
            ModaOp::Shl4 => self.shift_bus40(value, 4, name),
            ModaOp::Ror => {
                let value = value & ACC_MASK;
                let carry = self.regs.fc0 as u64;
                self.regs.fc0 = (value & 1) != 0;
                self.write_acc(name, sign_extend::<40>((value >> 1) | (carry << 39)));
            }
            ModaOp::Rol => {
                let carry = self.regs.fc0 as u64;
                self.regs.fc0 = ((value >> 39) & 1) != 0;
                self.write_acc(name, sign_extend::<40>((value << 1) | carry));
            }
            ModaOp::Clr => self.write_acc_sat(name, 0),
            ModaOp::Clrr => self.write_acc_sat(name, 0x8000),
            ModaOp::Not => self.write_acc(name, !value),
            ModaOp::Neg => {
                let regs = &mut self.regs;
                regs.fc0 = value != 0;
                regs.fv = value == 0xFFFF_FF80_0000_0000;
                regs.fvl |= regs.fv;
                self.write_acc_sat(name, sign_extend::<40>((!value).wrapping_add(1)));
            }
            ModaOp::Rnd => {
                let result = self.add_sub(value, 0x8000, false);
                self.write_acc_sat(name, result);
            }
            ModaOp::Pacr => {
                let product = self.product_bus40(0);
                let result = self.add_sub(product, 0x8000, false);
                self.write_acc_sat(name, result);
            }
            ModaOp::Inc => {
                let result = self.add_sub(value, 1, false);
                self.write_acc_sat(name, result);
            }
            ModaOp::Dec => {
                let result = self.add_sub(value, 1, true);
                self.write_acc_sat(name, result);
            }
            ModaOp::Copy => {
                let src = if name == RegName::A0 {
                    RegName::A1
                } else {
                    RegName::A0
                };

                let value = self.acc(src);
                self.write_acc_sat(name, value);
            }
        }
    }

    pub fn moda(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let Some(op) = ins.moda(ops[0]) else {
            return self.reserved(ins);
        };

        if self.regs.condition(ins.cond(ops[2])) {
            self.modify_acc(op, ins.reg(ops[1]));
        }
    }

    pub fn pacr1(&mut self, _: &mut System, ins: Ins) {
        let product = self.product_bus40(1);
        let result = self.add_sub(product, 0x8000, false);
        self.write_acc_sat(ins.reg(ins.operands()[0]), result);
    }

    fn clear_two(&mut self, ins: Ins, value: u64) {
        let ops = ins.operands();
        let first = ins.reg(ops[0]);
        let second = second_clear_target(first, ins.reg(ops[1]));
        self.write_acc_sat(first, value);
        self.write_acc_sat(second, value);
    }

    pub fn clr(&mut self, _: &mut System, ins: Ins) {
        self.clear_two(ins, 0);
    }

    pub fn clrr(&mut self, _: &mut System, ins: Ins) {
        self.clear_two(ins, 0x8000);
    }

    /// Normalization step: shifts left by one while the value is not yet normalized.
    pub fn norm(&mut self, _: &mut System, ins: Ins) {
        if self.regs.fn_ {
            return;
        }

        let ops = ins.operands();
        let name = ins.reg(ops[0]);
        let value = self.acc(name);

        self.regs.fv = value != sign_extend::<39>(value);
        self.regs.fvl |= self.regs.fv;

        let value = value << 1;
        self.regs.fc0 = (value & (1 << 40)) != 0;
        self.write_acc(name, sign_extend::<40>(value));

        let unit = ins.unit(ops[1]);
        self.rn_and_modify(unit, ins.step(ops[2]), false);
        self.regs.fr = self.regs.r[unit] == 0;
    }

    fn exchange_accs(&mut self, a: RegName, b: RegName) {
        let (u, v) = (self.acc(a), self.acc(b));
        self.write_acc_sat(a, v);
        self.write_acc_sat(b, u);
    }

    /// Swaps or rotates accumulators. Only the last write is visible in the flags.
    pub fn swap(&mut self, _: &mut System, ins: Ins) {
        use RegName::{A0, A1, B0, B1};

        let Some(kind) = ins.swap_type(ins.operands()[0]) else {
            return self.reserved(ins);
        };

        // (first source, first destination, second source, second destination)
        let (s0, d0, s1, d1) = match kind {
            SwapType::A0B0 => (A0, B0, B0, A0),
            SwapType::A0B1 => (A0, B1, B1, A0),
            SwapType::A1B0 => (A1, B0, B0, A1),
            SwapType::A1B1 => (A1, B1, B1, A1),
            SwapType::A0B0A1B1 => {
                self.exchange_accs(A1, B1);
                (A0, B0, B0, A0)
            }
            SwapType::A0B1A1B0 => {
                self.exchange_accs(A1, B0);
                (A0, B1, B1, A0)
            }
            SwapType::A0B0A1 => (A0, B0, B0, A1),
            SwapType::A0B1A1 => (A0, B1, B1, A1),
            SwapType::A1B0A0 => (A1, B0, B0, A0),
            SwapType::A1B1A0 => (A1, B1, B1, A0),
            SwapType::B0A0B1 => (A0, B1, B0, A0),
            SwapType::B0A1B1 => (A1, B1, B0, A1),
            SwapType::B1A0B0 => (A0, B0, B1, A0),
            SwapType::B1A1B0 => (A1, B0, B1, A1),
        };

        let (u, v) = (self.acc(s0), self.acc(s1));
        self.write_acc_sat(d0, u);
        self.write_acc_sat(d1, v);
    }

    // ---- shifts ----

    pub fn shfc(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        if self.regs.condition(ins.cond(ops[2])) {
            let value = self.acc(ins.reg(ops[0]));
            self.shift_bus40(value, self.regs.sv, ins.reg(ops[1]));
        }
    }

    pub fn shfi(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc(ins.reg(ops[0]));
        self.shift_bus40(value, ins.imm(ops[2]), ins.reg(ops[1]));
    }

    // ---- bit tests ----

    fn test_bit(&mut self, value: u16, bit: u16) {
        self.regs.fz = (value.checked_shr(bit as u32).unwrap_or(0) & 1) != 0;
    }

    /// Tests the bit of a memory word selected by the low nibble of `a0`.
    fn test_bit_a0(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let bit = self.regs.a[0] & 0xF;
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.indirect(ar.unit, ar.step);

        let set = ((sys.read_data(addr) >> bit) & 1) != 0;
        self.regs.fz = set;
        self.regs.fc0 = set;
    }

    pub fn tst4b(&mut self, sys: &mut System, ins: Ins) {
        self.test_bit_a0(sys, ins);
    }

    /// `tst4b` that also shifts `a0` by `sv` into an accumulator. Only `fz`, `fc0` and `fc1`
    /// are affected.
    pub fn tst4b_ax(&mut self, sys: &mut System, ins: Ins) {
        let dest = ins.reg(ins.operands()[2]);
        let a0 = self.regs.a[0];

        let regs = &self.regs;
        let saved = (regs.fv, regs.fvl, regs.fm, regs.fn_, regs.fe);
        self.shift_bus40(a0, self.regs.sv, dest);

        let regs = &mut self.regs;
        regs.fc1 = regs.fc0;
        (regs.fv, regs.fvl, regs.fm, regs.fn_, regs.fe) = saved;

        // the tested bit comes from a0 before the shift
        let bit = a0 & 0xF;
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.indirect(ar.unit, ar.step);
        let set = ((sys.read_data(addr) >> bit) & 1) != 0;
        self.regs.fz = set;
        self.regs.fc0 = set;
    }

    pub fn tstb_page(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.load(sys, ins.mem(ops[0]));
        self.test_bit(value, ins.imm(ops[1]));
    }

    pub fn tstb_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.indirect(ins.unit(ops[0]), ins.step(ops[1]));
        let value = sys.read_data(addr);
        self.test_bit(value, ins.imm(ops[2]));
    }

    pub fn tstb_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), false);
        self.test_bit(value, ins.imm(ops[1]));
    }

    pub fn tstb_r6(&mut self, _: &mut System, ins: Ins) {
        let bit = ins.imm(ins.operands()[0]);
        self.test_bit(self.regs.r[6], bit);
    }

    pub fn tstb_stt_mod(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), false);
        self.test_bit(value, ins.imm(ops[1]));
    }

    // ---- exponent ----

    /// Stores the exponent in `sv`, and also into an accumulator when the encoding names one.
    fn store_exponent(&mut self, value: u64, dest: Option<crate::ins::Operand>, ins: Ins) {
        self.regs.sv = Self::exponent(value);
        if let Some(dest) = dest {
            self.set_acc(ins.reg(dest), sext16(self.regs.sv));
        }
    }

    pub fn exp_bx(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc(ins.reg(ops[0]));
        self.store_exponent(value, ops.get(1).copied(), ins);
    }

    pub fn exp_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.indirect(ins.unit(ops[0]), ins.step(ops[1]));
        let value = sign_extend::<32>((sys.read_data(addr) as u64) << 16);
        self.store_exponent(value, ops.get(2).copied(), ins);
    }

    pub fn exp_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let src = ins.reg(ops[0]);
        let value = match src {
            RegName::A0 | RegName::A1 => self.acc(src),
            _ => sign_extend::<32>((self.reg_to_bus16(src, false) as u64) << 16),
        };

        self.store_exponent(value, ops.get(1).copied(), ins);
    }

    pub fn exp_r6(&mut self, _: &mut System, ins: Ins) {
        let value = sign_extend::<32>((self.regs.r[6] as u64) << 16);
        self.store_exponent(value, ins.operands().first().copied(), ins);
    }

    // ---- limits, comparisons and selection ----

    pub fn lim(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc(ins.reg(ops[0]));
        let value = self.saturate(value);
        self.write_acc(ins.reg(ops[1]), value);
    }

    fn compare(&mut self, operand: u64, value: u64) {
        let result = self.add_sub(value, operand, true);
        self.set_acc_flags(result);
    }

    pub fn cmp(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let operand = self.acc(ins.reg(ops[0]));
        let value = self.acc(ins.reg(ops[1]));
        self.compare(operand, value);
    }

    pub fn cmp_b0_b1(&mut self, _: &mut System, _: Ins) {
        self.compare(self.regs.b[0], self.regs.b[1]);
    }

    pub fn cmp_b1_b0(&mut self, _: &mut System, _: Ins) {
        self.compare(self.regs.b[1], self.regs.b[0]);
    }

    pub fn cmp_p1_to(&mut self, _: &mut System, ins: Ins) {
        let operand = self.product_bus40(1);
        let value = self.acc(ins.reg(ins.operands()[0]));
        self.compare(operand, value);
    }

    /// Replaces an accumulator by `candidate` if `pick` accepts their difference, recording the
    /// pointer of the winner in `mixp`.
    fn select(&mut self, name: RegName, candidate: u64, pointer: u16, pick: fn(u64) -> bool) {
        let diff = candidate.wrapping_sub(self.acc(name));
        if pick(diff) {
            self.regs.fm = true;
            self.regs.mixp = pointer;
            self.set_acc(name, candidate);
        } else {
            self.regs.fm = false;
        }
    }

    /// Selection against the sibling accumulator, stepping `r0`.
    fn select_acc(&mut self, ins: Ins, pick: fn(u64) -> bool) {
        let ops = ins.operands();
        let name = ins.reg(ops[0]);
        let candidate = self.acc(name.counterpart());
        let pointer = self.rn_and_modify(0, ins.step(ops[1]), false);
        self.select(name, candidate, pointer, pick);
    }

    /// Selection against the memory word pointed to by `r0`.
    fn select_mem(&mut self, sys: &mut System, ins: Ins, pick: fn(u64) -> bool) {
        let ops = ins.operands();
        let name = ins.reg(ops[0]);
        let pointer = self.rn_and_modify(0, ins.step(ops[1]), false);
        let candidate = sext16(sys.read_data(self.rn_address(0, pointer)));
        self.select(name, candidate, pointer, pick);
    }

    pub fn max_ge(&mut self, _: &mut System, ins: Ins) {
        self.select_acc(ins, |d| (d >> 63) == 0);
    }

    pub fn max_gt(&mut self, _: &mut System, ins: Ins) {
        self.select_acc(ins, |d| (d >> 63) == 0 && d != 0);
    }

    pub fn min_le(&mut self, _: &mut System, ins: Ins) {
        self.select_acc(ins, |d| (d >> 63) == 1 || d == 0);
    }

    pub fn min_lt(&mut self, _: &mut System, ins: Ins) {
        self.select_acc(ins, |d| (d >> 63) == 1);
    }

    pub fn max_ge_r0(&mut self, sys: &mut System, ins: Ins) {
        self.select_mem(sys, ins, |d| (d >> 63) == 0);
    }

    pub fn max_gt_r0(&mut self, sys: &mut System, ins: Ins) {
        self.select_mem(sys, ins, |d| (d >> 63) == 0 && d != 0);
    }

    pub fn min_le_r0(&mut self, sys: &mut System, ins: Ins) {
        self.select_mem(sys, ins, |d| (d >> 63) == 1 || d == 0);
    }

    pub fn min_lt_r0(&mut self, sys: &mut System, ins: Ins) {
        self.select_mem(sys, ins, |d| (d >> 63) == 1);
    }

    /// One step of a conditional-subtract division.
    pub fn divs(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let divisor = self.load(sys, ins.mem(ops[0])) as u64;
        let name = ins.reg(ops[1]);
        let dividend = self.acc(name);

        let diff = dividend.wrapping_sub(divisor << 15);
        let result = if (diff >> 63) != 0 {
            dividend << 1
        } else {
            (diff << 1) + 1
        };

        self.write_acc(name, sign_extend::<40>(result));
    }

    // ---- vector trace ----

    fn shift_vtr(&mut self) {
        let regs = &mut self.regs;
        regs.vtr0 = (regs.vtr0 >> 1) | ((regs.fc0 as u16) << 15);
        regs.vtr1 = (regs.vtr1 >> 1) | ((regs.fc1 as u16) << 15);
    }

    /// Selects the maximum (or minimum) of the high and low halves of two accumulators
    /// independently, tracing both decisions into the vtr registers.
    fn min_max_vtr(&mut self, a: RegName, b: RegName, min: bool) {
        let u = self.acc(a);
        let v = self.acc(b);
        let (uh, ul) = (sign_extend::<24>(u >> 16), sext16(u as u16));
        let (vh, vl) = (sign_extend::<24>(v >> 16), sext16(v as u16));

        let (wh, wl) = if min {
            (uh.wrapping_sub(vh), ul.wrapping_sub(vl))
        } else {
            (vh.wrapping_sub(uh), vl.wrapping_sub(ul))
        };

        self.regs.fc0 = (wh >> 63) == 0;
        self.regs.fc1 = (wl >> 63) == 0;

        let high = if self.regs.fc0 { vh } else { uh };
        let low = if self.regs.fc1 { vl } else { ul };
        self.set_acc(a, (high << 16) | (low & 0xFFFF));
        self.shift_vtr();
    }

    fn min_max_vtr_pair(&mut self, ins: Ins, min: bool) {
        let ops = ins.operands();
        let a = ins.reg(ops[0]);
        let b = match ops.get(1) {
            Some(&b) => ins.reg(b),
            None => a.counterpart(),
        };

        self.min_max_vtr(a, b, min);
    }

    /// Vector min/max that also stores one half of the sibling accumulator.
    fn min_max_vtr_store(&mut self, sys: &mut System, ins: Ins, min: bool, high: bool) {
        let ops = ins.operands();
        let a = ins.reg(ops[0]);
        self.min_max_vtr(a, ins.reg(ops[1]), min);

        let value = self.acc_saturated_quiet(a.counterpart());
        let ar = self.ar_access(ins, ops[2], ops[3]);
        let addr = self.indirect(ar.unit, ar.step);
        sys.write_data(addr, if high { (value >> 16) as u16 } else { value as u16 });
    }

    /// Vector min/max that also stores both halves of the sibling accumulator through a pointer
    /// pair.
    fn min_max_vtr_store_pair(&mut self, sys: &mut System, ins: Ins, min: bool, high_to_i: bool) {
        let ops = ins.operands();
        let a = ins.reg(ops[0]);
        self.min_max_vtr(a, ins.reg(ops[1]), min);

        let value = self.acc_saturated_quiet(a.counterpart());
        let (high, low) = ((value >> 16) as u16, value as u16);

        let arp = self.arp_access(ins, ops[2], ops[3], ops[4]);
        let i = self.indirect(arp.i, arp.step_i);
        let j = self.indirect(arp.j, arp.step_j);
        if high_to_i {
            sys.write_data(i, high);
            sys.write_data(j, low);
        } else {
            sys.write_data(i, low);
            sys.write_data(j, high);
        }
    }

    pub fn vtrclr0(&mut self, _: &mut System, _: Ins) {
        self.regs.vtr0 = 0;
    }

    pub fn vtrclr1(&mut self, _: &mut System, _: Ins) {
        self.regs.vtr1 = 0;
    }

    pub fn vtrclr(&mut self, _: &mut System, _: Ins) {
        self.regs.vtr0 = 0;
        self.regs.vtr1 = 0;
    }

    pub fn vtrmov0(&mut self, _: &mut System, ins: Ins) {
        let value = self.regs.vtr0 as u64;
        self.write_acc_sat(ins.reg(ins.operands()[0]), value);
    }

    pub fn vtrmov1(&mut self, _: &mut System, ins: Ins) {
        let value = self.regs.vtr1 as u64;
        self.write_acc_sat(ins.reg(ins.operands()[0]), value);
    }

    /// Packs the high bytes of both vtr registers.
    pub fn vtrmov(&mut self, _: &mut System, ins: Ins) {
        let value = (self.regs.vtr1 & 0xFF00) | (self.regs.vtr0 >> 8);
        self.write_acc_sat(ins.reg(ins.operands()[0]), value as u64);
    }

    pub fn vtrshr(&mut self, _: &mut System, _: Ins) {
        self.shift_vtr();
    }

    pub fn max2_vtr(&mut self, _: &mut System, ins: Ins) {
        self.min_max_vtr_pair(ins, false);
    }

    pub fn min2_vtr(&mut self, _: &mut System, ins: Ins) {
        self.min_max_vtr_pair(ins, true);
    }

    pub fn max2_vtr_movl(&mut self, sys: &mut System, ins: Ins) {
        self.min_max_vtr_store(sys, ins, false, false);
    }

    pub fn max2_vtr_movh(&mut self, sys: &mut System, ins: Ins) {
        self.min_max_vtr_store(sys, ins, false, true);
    }

    pub fn min2_vtr_movl(&mut self, sys: &mut System, ins: Ins) {
        self.min_max_vtr_store(sys, ins, true, false);
    }

    pub fn min2_vtr_movh(&mut self, sys: &mut System, ins: Ins) {
        self.min_max_vtr_store(sys, ins, true, true);
    }

    pub fn max2_vtr_movij(&mut self, sys: &mut System, ins: Ins) {
        self.min_max_vtr_store_pair(sys, ins, false, true);
    }

    pub fn max2_vtr_movji(&mut self, sys: &mut System, ins: Ins) {
        self.min_max_vtr_store_pair(sys, ins, false, false);
    }

    pub fn min2_vtr_movij(&mut self, sys: &mut System, ins: Ins) {
        self.min_max_vtr_store_pair(sys, ins, true, true);
    }

    pub fn min2_vtr_movji(&mut self, sys: &mut System, ins: Ins) {
        self.min_max_vtr_store_pair(sys, ins, true, false);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ins::Opcode;

    fn interp() -> (Interpreter, System) {
        (Interpreter::default(), System::default())
    }

    fn exec(int: &mut Interpreter, sys: &mut System, base: u16, extra: u16) {
        let ins = Ins::with_extra(base, extra);
        crate::OPCODE_EXEC_LUT[ins.decoded().opcode as usize](int, sys, ins);
    }

    #[test]
    fn alm_operand_widening() {
        assert_eq!(alm_operand(AlmOp::Add, 0x8000), 0xFFFF_FFFF_FFFF_8000);
        assert_eq!(alm_operand(AlmOp::Addl, 0x8000), 0x8000);
        assert_eq!(alm_operand(AlmOp::Addh, 0x8000), 0xFFFF_FFFF_8000_0000);
        assert_eq!(alm_operand(AlmOp::Or, 0x8000), 0x8000);
    }

    #[test]
    fn alm_logic_and_tests() {
        let (mut int, _) = interp();
        int.regs.a[0] = 0xF0F0;

        int.alm16(AlmOp::Or, 0x0F0F, RegName::A0);
        assert_eq!(int.regs.a[0], 0xFFFF);

        int.alm16(AlmOp::Tst0, 0x0100, RegName::A0);
        assert!(!int.regs.fz);

        int.alm16(AlmOp::Xor, 0xFFFF, RegName::A0);
        assert_eq!(int.regs.a[0], 0);
        assert!(int.regs.fz);

        int.alm16(AlmOp::Tst1, 0x0000, RegName::A0);
        assert!(int.regs.fz);
    }

    #[test]
    fn alm_compare_keeps_accumulator() {
        let (mut int, _) = interp();
        int.regs.b[1] = 5;

        int.alm16(AlmOp::Cmp, 5, RegName::B1);
        assert_eq!(int.regs.b[1], 5);
        assert!(int.regs.fz);

        int.alm16(AlmOp::Sub, 6, RegName::B1);
        assert_eq!(int.regs.b[1], u64::MAX);
        assert!(int.regs.fm);
    }

    #[test]
    fn alm_square_accumulates() {
        let (mut int, _) = interp();
        int.set_product(0, 9);
        int.regs.a[1] = 1;

        int.alm16(AlmOp::Sqra, 4, RegName::A1);
        assert_eq!(int.regs.a[1], 10);
        assert_eq!(int.regs.p[0], 16);
        assert_eq!(int.regs.x[0], 4);
        assert_eq!(int.regs.y[0], 4);
    }

    #[test]
    fn alu_imm8_and_keeps_middle_byte() {
        let (mut int, mut sys) = interp();
        int.regs.a[0] = 0x1234;

        // and 0x0F, a0
        let base = 0b1100_0010_0000_1111;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::AluImm8);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.a[0], 0x1204);
    }

    #[test]
    fn alb_arithmetic_flags() {
        let (mut int, _) = interp();

        assert_eq!(int.alb_generic(AlbOp::Addv, 1, 0xFFFF), 0);
        assert!(int.regs.fc0);
        assert!(int.regs.fz);

        assert_eq!(int.alb_generic(AlbOp::Subv, 2, 1), 0xFFFF);
        assert!(int.regs.fc0);
        assert!(int.regs.fm);

        assert_eq!(int.alb_generic(AlbOp::Rst, 0x00FF, 0x0FFF), 0x0F00);
        assert_eq!(int.alb_generic(AlbOp::Tst1, 0x000F, 0x000F), 0);
        assert!(int.regs.fz);
    }

    #[test]
    fn alb_on_accumulator_half_bypasses_flags() {
        let (mut int, mut sys) = interp();
        int.regs.a[0] = 0x12_0000_0000;

        // set 0x00FF, a0l (alb register form, register index 26)
        let base = 0b1000_0001_1111_1010;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::AlbReg);
        exec(&mut int, &mut sys, base, 0x00FF);
        assert_eq!(int.regs.a[0], 0x12_0000_00FF);
        assert!(!int.regs.fe);
    }

    #[test]
    fn paired_sums() {
        let (mut int, mut sys) = interp();
        // arp0 pairs r0 with r4, no steps, offsets +1
        int.regs.arpoffseti[0] = 1;
        int.regs.arpoffsetj[0] = 1;
        int.regs.arpstepi[0] = 0;
        int.regs.arpstepj[0] = 0;
        int.regs.arprni[0] = 0;
        int.regs.arprnj[0] = 0;
        int.regs.r[0] = 0x10;
        int.regs.r[4] = 0x20;
        sys.write_data(0x10, 3);
        sys.write_data(0x11, 1);
        sys.write_data(0x20, 10);
        sys.write_data(0x21, 7);

        // sub_add: high = j - i, low = j + i
        let base = 0b0110_1111_1100_0000;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::SubAdd);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.b[0], (7 << 16) | 8);
    }

    #[test]
    fn negate_and_rotate() {
        let (mut int, _) = interp();
        int.regs.a[0] = 5;

        int.modify_acc(ModaOp::Neg, RegName::A0);
        assert_eq!(int.regs.a[0], sign_extend::<40>(0u64.wrapping_sub(5)));
        assert!(int.regs.fc0);

        int.regs.fc0 = true;
        int.regs.b[0] = 2;
        int.modify_acc(ModaOp::Ror, RegName::B0);
        assert_eq!(int.regs.b[0], 0xFFFF_FF80_0000_0001);
        assert!(!int.regs.fc0);
    }

    #[test]
    fn moda_respects_condition() {
        let (mut int, mut sys) = interp();
        int.regs.a[1] = 7;
        int.regs.fz = false;

        // clr a1, eq
        let base = 0b0111_0111_0110_0001;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Moda4);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.a[1], 7);

        int.regs.fz = true;
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.a[1], 0);
    }

    #[test]
    fn clear_targets() {
        use RegName::{A0, A1, B0, B1};
        assert_eq!(second_clear_target(B0, B0), B1);
        assert_eq!(second_clear_target(A0, A0), A1);
        assert_eq!(second_clear_target(A0, B1), B1);
        assert_eq!(second_clear_target(A1, A0), B0);
        assert_eq!(second_clear_target(A1, B1), B1);
    }

    #[test]
    fn swap_rotations() {
        let (mut int, mut sys) = interp();
        int.regs.a[0] = 1;
        int.regs.b[0] = 2;
        int.regs.a[1] = 3;

        // a0 -> b0 -> a1
        let base = 0b0100_1001_1000_0110;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Swap);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.b[0], 1);
        assert_eq!(int.regs.a[1], 2);
        assert_eq!(int.regs.a[0], 1);
    }

    #[test]
    fn norm_stops_when_normalized() {
        let (mut int, mut sys) = interp();
        int.regs.a[0] = 0x1000_0000;
        int.regs.fn_ = false;
        int.regs.r[1] = 3;

        // norm a0, r1--
        let base = 0b1001_0100_1101_0001;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Norm);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.a[0], 0x2000_0000);
        assert_eq!(int.regs.r[1], 2);
        assert!(!int.regs.fr);

        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.a[0], 0x4000_0000);
        assert!(int.regs.fn_);

        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.a[0], 0x4000_0000);
        assert_eq!(int.regs.r[1], 1);
    }

    #[test]
    fn selection_records_pointer() {
        let (mut int, _) = interp();
        int.regs.a[0] = 3;
        int.select(RegName::A0, 5, 0x42, |d| (d >> 63) == 0);
        assert_eq!(int.regs.a[0], 5);
        assert_eq!(int.regs.mixp, 0x42);
        assert!(int.regs.fm);

        int.select(RegName::A0, 5, 0x43, |d| (d >> 63) == 0 && d != 0);
        assert_eq!(int.regs.mixp, 0x42);
        assert!(!int.regs.fm);
    }

    #[test]
    fn division_step() {
        let (mut int, mut sys) = interp();
        sys.write_data(0x0005, 3);
        int.regs.a[0] = 7;

        // divs [page:0x05], a0
        for _ in 0..16 {
            exec(&mut int, &mut sys, 0b0000_1110_0000_0101, 0);
        }

        assert_eq!(int.regs.a[0] & 0xFFFF, 2);
        assert_eq!((int.regs.a[0] >> 16) & 0xFFFF, 1);
    }

    #[test]
    fn vector_min_max() {
        let (mut int, _) = interp();
        int.regs.a[0] = (5 << 16) | 1;
        int.regs.b[0] = (2 << 16) | 9;

        int.min_max_vtr(RegName::A0, RegName::B0, false);
        assert_eq!(int.regs.a[0], (5 << 16) | 9);
        assert!(!int.regs.fc0);
        assert!(int.regs.fc1);
        assert_eq!(int.regs.vtr0, 0);
        assert_eq!(int.regs.vtr1, 0x8000);
    }

    #[test]
    fn exponent_into_accumulator() {
        let (mut int, mut sys) = interp();
        int.regs.b[1] = 0x0100;

        // exp b1, a0
        let base = 0b1001_0000_0110_0001;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::ExpBxAx);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.sv, 22);
        assert_eq!(int.regs.a[0], 22);
    }
}
