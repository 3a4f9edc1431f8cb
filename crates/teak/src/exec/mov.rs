//! Data movement between registers, data memory and program memory.

use crate::{
    Interpreter, PC_MASK,
    ins::{Ins, Operand, operand::RegName},
    system::System,
};
use util::sign_extend;

/// Destination of a `mov p, reg`. The product always lands in `a0` or `a1`, picked by the lowest
/// bit of the destination register field.
fn product_destination(ins: Ins, operand: Operand) -> RegName {
    match operand {
        Operand::Register(p) if (ins.base >> p) & 1 != 0 => RegName::A1,
        _ => RegName::A0,
    }
}

impl Interpreter {
    pub fn mov_ab_ab(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc(ins.reg(ops[0]));
        self.write_acc_sat(ins.reg(ops[1]), value);
    }

    pub fn mov_dvm(&mut self, _: &mut System, ins: Ins) {
        self.reserved(ins);
    }

    pub fn mov_dvm_to(&mut self, _: &mut System, ins: Ins) {
        self.reserved(ins);
    }

    pub fn mov_x0(&mut self, _: &mut System, ins: Ins) {
        self.regs.x[0] = self.reg_to_bus16(ins.reg(ins.operands()[0]), true);
    }

    pub fn mov_x1(&mut self, _: &mut System, ins: Ins) {
        self.regs.x[1] = self.reg_to_bus16(ins.reg(ins.operands()[0]), true);
    }

    pub fn mov_y1(&mut self, _: &mut System, ins: Ins) {
        self.regs.y[1] = self.reg_to_bus16(ins.reg(ins.operands()[0]), true);
    }

    // ---- direct memory ----

    pub fn mov_reg_to_mem(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), true);
        self.store(sys, ins.mem(ops[1]), value);
    }

    pub fn mov_rn_old_page(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), false);
        self.store(sys, ins.mem(ops[1]), value);
    }

    pub fn mov_mem_to_reg(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.load(sys, ins.mem(ops[0]));
        self.reg_from_bus16(ins.reg(ops[1]), value);
    }

    /// Loads the middle 16 bits of an accumulator, keeping the extension and low halves.
    pub fn mov_eu(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let name = ins.reg(ops[1]);
        let value = self.load(sys, ins.mem(ops[0]));
        let acc = (self.acc(name) & 0xFFFF_FFFF_0000_0000) | ((value as u64) << 16);
        self.write_acc(name, acc);
    }

    pub fn mov_sv_page(&mut self, sys: &mut System, ins: Ins) {
        self.regs.sv = self.load(sys, ins.mem(ins.operands()[0]));
    }

    pub fn mov_sv_to(&mut self, sys: &mut System, ins: Ins) {
        self.store(sys, ins.mem(ins.operands()[0]), self.regs.sv);
    }

    pub fn mov_repc_to_r7(&mut self, sys: &mut System, ins: Ins) {
        self.store(sys, ins.mem(ins.operands()[0]), self.regs.repc);
    }

    pub fn mov_repc_r7(&mut self, sys: &mut System, ins: Ins) {
        self.regs.repc = self.load(sys, ins.mem(ins.operands()[0]));
    }

    pub fn mov_cfg_r7(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), false);
        self.store(sys, ins.mem(ops[1]), value);
    }

    pub fn mov_r7_cfg(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.load(sys, ins.mem(ops[0]));
        self.reg_from_bus16(ins.reg(ops[1]), value);
    }

    // ---- immediates ----

    pub fn mov_imm(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.reg_from_bus16(ins.reg(ops[1]), ins.imm(ops[0]));
    }

    /// Replaces the low 5 bits of `icr`.
    pub fn mov_icr_imm5(&mut self, _: &mut System, ins: Ins) {
        let value = (self.regs.icr() & !0x1F) | ins.imm(ins.operands()[0]);
        self.regs.set_icr(value);
    }

    pub fn mov_ext<const N: usize>(&mut self, _: &mut System, ins: Ins) {
        self.regs.ext[N] = ins.imm(ins.operands()[0]);
    }

    pub fn mov_sv_imm8s(&mut self, _: &mut System, ins: Ins) {
        self.regs.sv = ins.imm(ins.operands()[0]);
    }

    pub fn mov_r6_imm(&mut self, _: &mut System, ins: Ins) {
        self.regs.r[6] = ins.imm(ins.operands()[0]);
    }

    pub fn mov_repc_imm(&mut self, _: &mut System, ins: Ins) {
        self.regs.repc = ins.imm(ins.operands()[0]);
    }

    pub fn mov_stepi0(&mut self, _: &mut System, ins: Ins) {
        self.regs.stepi0 = ins.imm(ins.operands()[0]);
    }

    pub fn mov_stepj0(&mut self, _: &mut System, ins: Ins) {
        self.regs.stepj0 = ins.imm(ins.operands()[0]);
    }

    pub fn mov_prpage_imm4(&mut self, _: &mut System, ins: Ins) {
        self.regs.prpage = ins.imm(ins.operands()[0]);
    }

    // ---- indirect memory ----

    pub fn mov_rn_to_reg(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.rn_and_modify(ins.unit(ops[0]), ins.step(ops[1]), false);
        let value = sys.read_data(addr);
        self.reg_from_bus16(ins.reg(ops[2]), value);
    }

    pub fn mov_reg_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), true);
        let addr = self.rn_and_modify(ins.unit(ops[1]), ins.step(ops[2]), false);
        sys.write_data(addr, value);
    }

    pub fn mov_memsp_to(&mut self, sys: &mut System, ins: Ins) {
        let value = sys.read_data(self.regs.sp);
        self.reg_from_bus16(ins.reg(ins.operands()[0]), value);
    }

    pub fn mov_repc_to_ar(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.rn_and_modify(ar.unit, ar.step, false);
        sys.write_data(addr, self.regs.repc);
    }

    pub fn mov_repc_ar(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.rn_and_modify(ar.unit, ar.step, false);
        self.regs.repc = sys.read_data(addr);
    }

    pub fn mov_cfg_to_ar(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[1], ops[2]);
        let addr = self.rn_and_modify(ar.unit, ar.step, false);
        let value = self.reg_to_bus16(ins.reg(ops[0]), false);
        sys.write_data(addr, value);
    }

    pub fn mov_ar_to_cfg(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.rn_and_modify(ar.unit, ar.step, false);
        let value = sys.read_data(addr);
        self.reg_from_bus16(ins.reg(ops[2]), value);
    }

    // ---- registers ----

    pub fn mov_icr_to(&mut self, _: &mut System, ins: Ins) {
        let value = self.regs.icr();
        self.reg_from_bus16(ins.reg(ins.operands()[0]), value);
    }

    pub fn mov_icr_reg(&mut self, _: &mut System, ins: Ins) {
        let value = self.reg_to_bus16(ins.reg(ins.operands()[0]), true);
        self.regs.set_icr(value);
    }

    pub fn mov_mixp(&mut self, _: &mut System, ins: Ins) {
        self.regs.mixp = self.reg_to_bus16(ins.reg(ins.operands()[0]), true);
    }

    pub fn mov_mixp_to(&mut self, _: &mut System, ins: Ins) {
        self.reg_from_bus16(ins.reg(ins.operands()[0]), self.regs.mixp);
    }

    pub fn mov_mixp_r6(&mut self, _: &mut System, _: Ins) {
        self.regs.r[6] = self.regs.mixp;
    }

    pub fn mov_r6_mixp(&mut self, _: &mut System, _: Ins) {
        self.regs.mixp = self.regs.r[6];
    }

    /// Moves into `bx`. Whole accumulators and the product move all 40 bits.
    pub fn mov_reg_bx(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let (src, dest) = (ins.reg(ops[0]), ins.reg(ops[1]));
        match src {
            RegName::P => {
                let value = self.product_bus40(0);
                self.write_acc_sat(dest, value);
            }
            RegName::A0 | RegName::A1 => {
                let value = self.acc(src);
                self.write_acc_sat(dest, value);
            }
            _ => {
                let value = self.reg_to_bus16(src, true);
                self.reg_from_bus16(dest, value);
            }
        }
    }

    pub fn mov_reg_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let (src, dest) = (ins.reg(ops[0]), ins.reg(ops[1]));
        match src {
            RegName::P => {
                let value = self.product_bus40(0);
                self.write_acc_sat(product_destination(ins, ops[1]), value);
            }
            RegName::Pc => match dest {
                RegName::A0 | RegName::A1 => self.write_acc_sat(dest, self.regs.pc as u64),
                _ => self.reg_from_bus16(dest, self.regs.pc as u16),
            },
            _ => {
                let value = self.reg_to_bus16(src, true);
                self.reg_from_bus16(dest, value);
            }
        }
    }

    pub fn mov_repc_to(&mut self, _: &mut System, ins: Ins) {
        self.reg_from_bus16(ins.reg(ins.operands()[0]), self.regs.repc);
    }

    pub fn mov_x0_to(&mut self, _: &mut System, ins: Ins) {
        self.reg_from_bus16(ins.reg(ins.operands()[0]), self.regs.x[0]);
    }

    pub fn mov_x1_to(&mut self, _: &mut System, ins: Ins) {
        self.reg_from_bus16(ins.reg(ins.operands()[0]), self.regs.x[1]);
    }

    pub fn mov_y1_to(&mut self, _: &mut System, ins: Ins) {
        self.reg_from_bus16(ins.reg(ins.operands()[0]), self.regs.y[1]);
    }

    pub fn mov_a0h_stepi0(&mut self, _: &mut System, _: Ins) {
        self.regs.stepi0 = self.reg_to_bus16(RegName::A0h, true);
    }

    pub fn mov_a0h_stepj0(&mut self, _: &mut System, _: Ins) {
        self.regs.stepj0 = self.reg_to_bus16(RegName::A0h, true);
    }

    pub fn mov_stepi0_a0h(&mut self, _: &mut System, _: Ins) {
        self.reg_from_bus16(RegName::A0h, self.regs.stepi0);
    }

    pub fn mov_stepj0_a0h(&mut self, _: &mut System, _: Ins) {
        self.reg_from_bus16(RegName::A0h, self.regs.stepj0);
    }

    /// Only the low nibble of the accumulator is kept, without saturation.
    pub fn mov_prpage_abl(&mut self, _: &mut System, ins: Ins) {
        self.regs.prpage = (self.acc(ins.reg(ins.operands()[0])) & 0xF) as u16;
    }

    pub fn mov_prpage_to(&mut self, _: &mut System, ins: Ins) {
        self.reg_from_bus16(ins.reg(ins.operands()[0]), self.regs.prpage);
    }

    pub fn mov_repc_abl(&mut self, _: &mut System, ins: Ins) {
        self.regs.repc = self.reg_to_bus16(ins.reg(ins.operands()[0]), true);
    }

    pub fn mov_abl_cfg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), true);
        self.reg_from_bus16(ins.reg(ops[1]), value);
    }

    pub fn mov_cfg_abl(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), false);
        self.reg_from_bus16(ins.reg(ops[1]), value);
    }

    /// Jumps to the address held in an accumulator.
    pub fn mov_pc(&mut self, _: &mut System, ins: Ins) {
        let value = self.acc(ins.reg(ins.operands()[0]));
        self.set_pc(value as u32);
    }

    pub fn mov_p0h_to(&mut self, _: &mut System, ins: Ins) {
        let value = (self.product_bus40(0) >> 16) as u16;
        self.reg_from_bus16(ins.reg(ins.operands()[0]), value);
    }

    pub fn mov_p0h_r6(&mut self, _: &mut System, _: Ins) {
        self.regs.r[6] = (self.product_bus40(0) >> 16) as u16;
    }

    pub fn mov_p0(&mut self, _: &mut System, ins: Ins) {
        let value = self.acc_saturated(ins.reg(ins.operands()[0]));
        self.set_product(0, value as u32);
    }

    pub fn mov_p1_to(&mut self, _: &mut System, ins: Ins) {
        let value = self.product_bus40(1);
        self.write_acc_sat(ins.reg(ins.operands()[0]), value);
    }

    // ---- r6 ----

    pub fn mov_r6_to(&mut self, _: &mut System, ins: Ins) {
        self.reg_from_bus16(ins.reg(ins.operands()[0]), self.regs.r[6]);
    }

    pub fn mov_r6_reg(&mut self, _: &mut System, ins: Ins) {
        self.regs.r[6] = self.reg_to_bus16(ins.reg(ins.operands()[0]), true);
    }

    pub fn mov_memsp_r6(&mut self, sys: &mut System, _: Ins) {
        self.regs.r[6] = sys.read_data(self.regs.sp);
    }

    pub fn mov_r6_to_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.rn_and_modify(ins.unit(ops[0]), ins.step(ops[1]), false);
        sys.write_data(addr, self.regs.r[6]);
    }

    pub fn mov_r6_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.rn_and_modify(ins.unit(ops[0]), ins.step(ops[1]), false);
        self.regs.r[6] = sys.read_data(addr);
    }

    // ---- program memory ----

    /// Copies a data word into program memory, in the page selected by `movpd`.
    pub fn movd(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let src = self.rn_and_modify(ins.unit(ops[0]), ins.step(ops[1]), false);
        let dest = self.rn_and_modify(ins.unit(ops[2]), ins.step(ops[3]), false);
        let value = sys.read_data(src);
        sys.write_program(dest as u32 | ((self.regs.pcmhi as u32) << 16), value);
    }

    pub fn movp_axl(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.reg_to_bus16(ins.reg(ops[0]), false) as u32;
        let value = sys.read_program(addr | ((self.regs.pcmhi as u32) << 16));
        self.reg_from_bus16(ins.reg(ops[1]), value);
    }

    pub fn movp_ax(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.acc(ins.reg(ops[0])) as u32 & PC_MASK;
        let value = sys.read_program(addr);
        self.reg_from_bus16(ins.reg(ops[1]), value);
    }

    pub fn movp_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let src = self.rn_and_modify(ins.unit(ops[0]), ins.step(ops[1]), false);
        let dest = self.rn_and_modify(ins.unit(ops[2]), ins.step(ops[3]), false);
        let value = sys.read_program(src as u32 | ((self.regs.pcmhi as u32) << 16));
        sys.write_data(dest, value);
    }

    /// Jumps to a 32-bit address read from program memory, high word first.
    pub fn movpdw(&mut self, sys: &mut System, ins: Ins) {
        let addr = self.acc(ins.reg(ins.operands()[0])) as u32 & PC_MASK;
        let high = sys.read_program(addr);
        let low = sys.read_program((addr + 1) & PC_MASK);
        self.set_pc(low as u32 | ((high as u32) << 16));
    }

    // ---- 32-bit transfers ----

    /// Resolves the address pair of an `arN` double word access: the high word goes to the
    /// stepped address and the low word to its offset.
    fn double_address(&mut self, ins: Ins, rn: Operand, step: Operand) -> (u16, u16) {
        let ar = self.ar_access(ins, rn, step);
        let high = self.rn_and_modify(ar.unit, ar.step, false);
        let low = self.offset_address(ar.unit, high, ar.offset, false);
        (high, low)
    }

    /// Writes the low word first, so the high word wins when both addresses are the same.
    fn store_double(&mut self, sys: &mut System, (high, low): (u16, u16), value: u32) {
        sys.write_data(low, value as u16);
        sys.write_data(high, (value >> 16) as u16);
    }

    fn load_double(&mut self, sys: &mut System, (high, low): (u16, u16)) -> u32 {
        let low = sys.read_data(low);
        let high = sys.read_data(high);
        low as u32 | ((high as u32) << 16)
    }

    /// Stores a product register, unshifted.
    pub fn mov2_px_mem(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.regs.p[ins.unit(ops[0])];
        let addrs = self.double_address(ins, ops[1], ops[2]);
        self.store_double(sys, addrs, value);
    }

    /// Stores a product register through the product shifter.
    pub fn mov2s(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.product_bus40(ins.unit(ops[0])) as u32;
        let addrs = self.double_address(ins, ops[1], ops[2]);
        self.store_double(sys, addrs, value);
    }

    pub fn mov2_mem_px(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addrs = self.double_address(ins, ops[0], ops[1]);
        let value = self.load_double(sys, addrs);
        self.set_product(ins.unit(ops[2]), value);
    }

    pub fn mova_ab_mem(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc_saturated(ins.reg(ops[0])) as u32;
        let addrs = self.double_address(ins, ops[1], ops[2]);
        self.store_double(sys, addrs, value);
    }

    pub fn mova_mem_ab(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addrs = self.double_address(ins, ops[0], ops[1]);
        let value = sign_extend::<32>(self.load_double(sys, addrs) as u64);
        self.write_acc_sat(ins.reg(ops[2]), value);
    }

    /// Stores the high half of an accumulator and `y0` as a pair.
    pub fn mov2_axh_m_y0_m(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let high = (self.acc_saturated_quiet(ins.reg(ops[0])) >> 16) as u16;
        let addrs = self.double_address(ins, ops[1], ops[2]);
        self.store_double(sys, addrs, ((high as u32) << 16) | self.regs.y[0] as u32);
    }

    /// Stores the high halves of two accumulators as a pair.
    pub fn mov2_abh_m(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let high = (self.acc_saturated_quiet(ins.reg(ops[0])) >> 16) as u16;
        let low = (self.acc_saturated_quiet(ins.reg(ops[1])) >> 16) as u16;
        let addrs = self.double_address(ins, ops[2], ops[3]);
        self.store_double(sys, addrs, ((high as u32) << 16) | low as u32);
    }

    /// Steps both pointers of an `arp` pair, returning the `i` and `j` addresses.
    fn pair_addresses(&mut self, ins: Ins, rn: Operand, si: Operand, sj: Operand) -> (u16, u16) {
        let arp = self.arp_access(ins, rn, si, sj);
        let i = self.rn_and_modify(arp.i, arp.step_i, false);
        let j = self.rn_and_modify(arp.j, arp.step_j, false);
        (i, j)
    }

    fn mov2_ax_pair(&mut self, sys: &mut System, ins: Ins, high_to_i: bool) {
        let ops = ins.operands();
        let (i, j) = self.pair_addresses(ins, ops[1], ops[2], ops[3]);
        let value = self.acc_saturated_quiet(ins.reg(ops[0]));
        let (high, low) = if high_to_i { (i, j) } else { (j, i) };
        sys.write_data(high, (value >> 16) as u16);
        sys.write_data(low, value as u16);
    }

    pub fn mov2_ax_mij(&mut self, sys: &mut System, ins: Ins) {
        self.mov2_ax_pair(sys, ins, true);
    }

    pub fn mov2_ax_mji(&mut self, sys: &mut System, ins: Ins) {
        self.mov2_ax_pair(sys, ins, false);
    }

    fn mov2_pair_ax(&mut self, sys: &mut System, ins: Ins, high_from_i: bool) {
        let ops = ins.operands();
        let (i, j) = self.pair_addresses(ins, ops[0], ops[1], ops[2]);
        let first = sys.read_data(i);
        let second = sys.read_data(j);
        let (high, low) = if high_from_i {
            (first, second)
        } else {
            (second, first)
        };

        let value = sign_extend::<32>(((high as u64) << 16) | low as u64);
        self.set_acc(ins.reg(ops[3]), value);
    }

    pub fn mov2_mij_ax(&mut self, sys: &mut System, ins: Ins) {
        self.mov2_pair_ax(sys, ins, true);
    }

    pub fn mov2_mji_ax(&mut self, sys: &mut System, ins: Ins) {
        self.mov2_pair_ax(sys, ins, false);
    }

    /// Stores the high half of an accumulator to one pointer of a pair and reloads it from the
    /// other. `round` sets bit 15 of the reloaded value.
    fn exchange(&mut self, sys: &mut System, ins: Ins, store_to_j: bool, round: bool) {
        let ops = ins.operands();
        let name = ins.reg(ops[0]);
        let (i, j) = self.pair_addresses(ins, ops[1], ops[2], ops[3]);
        let (store, load) = if store_to_j { (j, i) } else { (i, j) };

        let high = (self.acc_saturated_quiet(name) >> 16) as u16;
        sys.write_data(store, high);

        let loaded = ((sys.read_data(load) as u64) << 16) | if round { 0x8000 } else { 0 };
        self.set_acc(name, sign_extend::<32>(loaded));
    }

    pub fn exchange_iaj(&mut self, sys: &mut System, ins: Ins) {
        self.exchange(sys, ins, true, false);
    }

    pub fn exchange_riaj(&mut self, sys: &mut System, ins: Ins) {
        self.exchange(sys, ins, true, true);
    }

    pub fn exchange_jai(&mut self, sys: &mut System, ins: Ins) {
        self.exchange(sys, ins, false, false);
    }

    pub fn exchange_rjai(&mut self, sys: &mut System, ins: Ins) {
        self.exchange(sys, ins, false, true);
    }

    // ---- shifted moves ----

    fn move_shifted(&mut self, value: u16, amount: u16, dest: RegName) {
        self.shift_bus40(sign_extend::<16>(value as u64), amount, dest);
    }

    pub fn movs_page(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.load(sys, ins.mem(ops[0]));
        self.move_shifted(value, self.regs.sv, ins.reg(ops[1]));
    }

    pub fn movs_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.rn_and_modify(ins.unit(ops[0]), ins.step(ops[1]), false);
        let value = sys.read_data(addr);
        self.move_shifted(value, self.regs.sv, ins.reg(ops[2]));
    }

    pub fn movs_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), false);
        self.move_shifted(value, self.regs.sv, ins.reg(ops[1]));
    }

    pub fn movs_r6_to(&mut self, _: &mut System, ins: Ins) {
        self.move_shifted(self.regs.r[6], self.regs.sv, ins.reg(ins.operands()[0]));
    }

    /// Shifted move with an immediate shift amount.
    pub fn movsi(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.reg_to_bus16(ins.reg(ops[0]), false);
        self.move_shifted(value, ins.imm(ops[2]), ins.reg(ops[1]));
    }

    // ---- rounding moves ----

    /// Rounds a 16-bit value with 16-bit arithmetic. The carry comes from bit 16 and overflow
    /// is always cleared.
    fn round16(&mut self, value: u16, dest: RegName) {
        let result = value as u64 + 0x8000;
        self.regs.fc0 = (result >> 16) != 0;
        self.regs.fv = false;
        self.write_acc_sat(dest, result & 0xFFFF);
    }

    fn round40(&mut self, value: u64, dest: RegName) {
        let result = self.add_sub(value, 0x8000, false);
        self.write_acc_sat(dest, result);
    }

    pub fn movr_ar(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.rn_and_modify(ar.unit, ar.step, false);
        let value = sign_extend::<32>((sys.read_data(addr) as u64) << 16);
        self.round40(value, ins.reg(ops[2]));
    }

    pub fn movr_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.rn_and_modify(ins.unit(ops[0]), ins.step(ops[1]), false);
        let value = sys.read_data(addr);
        self.round16(value, ins.reg(ops[2]));
    }

    pub fn movr_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let (src, dest) = (ins.reg(ops[0]), ins.reg(ops[1]));
        match src {
            RegName::A0 | RegName::A1 => self.round40(self.acc(src), dest),
            RegName::P => self.round40(self.product_bus40(0), dest),
            _ => {
                let value = self.reg_to_bus16(src, false);
                self.round16(value, dest);
            }
        }
    }

    pub fn movr_bx(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc(ins.reg(ops[0]));
        self.round40(value, ins.reg(ops[1]));
    }

    pub fn movr_r6_to(&mut self, _: &mut System, ins: Ins) {
        self.round16(self.regs.r[6], ins.reg(ins.operands()[0]));
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
    fn page_moves() {
        let (mut int, mut sys) = interp();
        int.regs.page = 0x12;
        int.regs.a[0] = 0x1234_5678;

        // mov a0h, [page:0x34]
        let base = 0b0011_1010_0011_0100;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::MovAblhPage);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(sys.read_data(0x1234), 0x1234);

        // mov [page:0x34], b1
        exec(&mut int, &mut sys, 0b0110_1001_0011_0100, 0);
        assert_eq!(int.regs.b[1], 0x1234);
    }

    #[test]
    fn high_half_load_sign_extends() {
        let (mut int, mut sys) = interp();
        sys.write_data(0x0010, 0x8000);

        // mov [0x0010], a1h
        exec(&mut int, &mut sys, 0b0111_1110_0001_0000, 0);
        assert_eq!(int.regs.a[1], 0xFFFF_FFFF_8000_0000);
        assert!(int.regs.fm);
    }

    #[test]
    fn middle_load_keeps_outer_bits() {
        let (mut int, mut sys) = interp();
        int.regs.a[0] = 0x12_3456_789A;
        sys.write_data(0x0005, 0xBEEF);

        // mov_eu [0x05], a0h
        exec(&mut int, &mut sys, 0b0110_0101_0000_0101, 0);
        assert_eq!(int.regs.a[0], 0x12_BEEF_0000);
    }

    #[test]
    fn immediates() {
        let (mut int, mut sys) = interp();

        // mov -1, a1h
        exec(&mut int, &mut sys, 0b0011_0101_1111_1111, 0);
        assert_eq!(int.regs.a[1], 0xFFFF_FFFF_FFFF_0000);

        // mov 0xFF, a0l
        exec(&mut int, &mut sys, 0b0010_0001_1111_1111, 0);
        assert_eq!(int.regs.a[0], 0xFF);

        // mov_ext2 -2
        exec(&mut int, &mut sys, 0b0011_1001_1111_1110, 0);
        assert_eq!(int.regs.ext[2], 0xFFFE);

        // mov 0x1234, r3
        exec(&mut int, &mut sys, 0b0101_1110_0000_0011, 0x1234);
        assert_eq!(int.regs.r[3], 0x1234);
    }

    #[test]
    fn indirect_moves_step_pointer() {
        let (mut int, mut sys) = interp();
        int.regs.r[1] = 0x100;
        int.regs.x[0] = 0;
        sys.write_data(0x100, 0xCAFE);

        // mov [r1++], r2
        let base = 0b0001_1100_0100_1001;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::MovRnReg);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.r[2], 0xCAFE);
        assert_eq!(int.regs.r[1], 0x101);
    }

    #[test]
    fn accumulator_into_bx_keeps_all_bits() {
        let (mut int, mut sys) = interp();
        int.regs.a[1] = 0x7F_0000_0001;

        // mov a1, b0
        exec(&mut int, &mut sys, 0b0101_1110_1101_1001, 0);
        assert_eq!(int.regs.b[0], 0x7F_0000_0001);
    }

    #[test]
    fn product_into_accumulator() {
        let (mut int, mut sys) = interp();
        int.set_product(0, 0x0001_0000);

        // mov p, a1 (destination field r1)
        exec(&mut int, &mut sys, 0b0101_1000_0010_1011, 0);
        assert_eq!(int.regs.a[1], 0x0001_0000);
        assert_eq!(int.regs.a[0], 0);
    }

    #[test]
    fn double_word_store_order() {
        let (mut int, mut sys) = interp();
        int.regs.r[0] = 0x200;
        int.regs.arrn = [0, 1, 2, 3];
        int.regs.arstep = [0; 4];
        int.regs.aroffset = [1, 0, 0, 0];
        int.regs.a[0] = 0x1234_5678;

        // mova a0, [ar0]
        let base = 0b0100_1101_1110_0000;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::MovaAbMem);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(sys.read_data(0x200), 0x1234);
        assert_eq!(sys.read_data(0x201), 0x5678);

        // mova [ar0], b1
        let base = 0b0100_1011_1101_0000;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::MovaMemAb);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.b[1], 0x1234_5678);
    }

    #[test]
    fn exchange_rounds() {
        let (mut int, mut sys) = interp();
        int.regs.arprni = [0, 1, 2, 3];
        int.regs.arprnj = [0, 1, 2, 3];
        int.regs.arpstepi = [0; 4];
        int.regs.arpstepj = [0; 4];
        int.regs.r[0] = 0x300;
        int.regs.r[4] = 0x301;
        int.regs.a[0] = 0x0011_0000;
        sys.write_data(0x300, 0x0022);

        // exchange_riaj a0h, arp0
        let base = 0b0111_1111_1000_0000;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::ExchangeRiaj);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(sys.read_data(0x301), 0x0011);
        assert_eq!(int.regs.a[0], 0x0022_8000);
    }

    #[test]
    fn shifted_moves() {
        let (mut int, mut sys) = interp();
        int.regs.r[0] = 0x0003;

        // movsi r0, a0, 4
        let base = 0b0100_0000_1100_0100;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Movsi);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.a[0], 0x30);

        int.regs.sv = 0xFFFF;
        int.regs.r[6] = 0x8000;
        // movs r6, a1
        exec(&mut int, &mut sys, 0b0101_1111_0100_0011, 0);
        assert_eq!(int.regs.a[1], 0xFFFF_FFFF_FFFF_C000);
    }

    #[test]
    fn rounding_move_from_register() {
        let (mut int, mut sys) = interp();
        int.regs.r[6] = 0x9000;

        // movr r6, a0
        exec(&mut int, &mut sys, 0b1000_1001_0110_0001, 0);
        assert_eq!(int.regs.a[0], 0x1000);
        assert!(int.regs.fc0);
        assert!(!int.regs.fv);
    }

    #[test]
    fn program_memory_transfers() {
        let (mut int, mut sys) = interp();
        int.regs.pcmhi = 1;
        int.regs.r[0] = 0x40;
        int.regs.r[4] = 0x80;
        sys.write_data(0x40, 0xABCD);

        // movd r0, r4
        exec(&mut int, &mut sys, 0b0101_1111_1000_0000, 0);
        assert_eq!(sys.read_program(0x1_0080), 0xABCD);

        sys.write_program(0x500, 0x0001);
        sys.write_program(0x501, 0x2345);
        int.regs.a[0] = 0x500;
        // movpdw a0
        exec(&mut int, &mut sys, 0b1101_0100_1001_1001, 0);
        assert_eq!(int.regs.pc, 0x1_2345);
    }

    #[test]
    fn icr_low_bits() {
        let (mut int, mut sys) = interp();
        // mov_icr 0x10
        exec(&mut int, &mut sys, 0b0100_1111_1001_0000, 0);
        assert!(!int.regs.lp);
        assert_eq!(int.regs.icr() & 0x1F, 0);
    }
}
