//! Program flow, repeats, the stack and addressing configuration.

use crate::{
    Interpreter,
    ins::{Ins, operand::Step},
    regs::BlockRepeatFrame,
    system::System,
};
use util::sign_extend;

impl Interpreter {
    pub fn undefined(&mut self, _: &mut System, ins: Ins) {
        self.reserved(ins);
    }

    pub fn nop(&mut self, _: &mut System, _: Ins) {}

    pub fn trap(&mut self, _: &mut System, ins: Ins) {
        self.reserved(ins);
    }

    // ---- branches ----

    pub fn br(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        if self.regs.condition(ins.cond(ops[1])) {
            self.set_pc(ins.address(ops[0]));
        }
    }

    /// Relative branch. A branch to itself puts the core to sleep until something happens.
    pub fn brr(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        if self.regs.condition(ins.cond(ops[1])) {
            let offset = ins.rel(ops[0]);
            self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u32);
            if offset == 0xFFFF {
                self.idle = true;
            }
        }
    }

    pub fn call(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        if self.regs.condition(ins.cond(ops[1])) {
            self.push_pc(sys);
            self.set_pc(ins.address(ops[0]));
        }
    }

    pub fn calla_axl(&mut self, sys: &mut System, ins: Ins) {
        let target = self.reg_to_bus16(ins.reg(ins.operands()[0]), false);
        self.push_pc(sys);
        self.set_pc(target as u32);
    }

    pub fn calla_ax(&mut self, sys: &mut System, ins: Ins) {
        let target = self.acc(ins.reg(ins.operands()[0])) as u32 & crate::PC_MASK;
        self.push_pc(sys);
        self.set_pc(target);
    }

    pub fn callr(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        if self.regs.condition(ins.cond(ops[1])) {
            self.push_pc(sys);
            let offset = ins.rel(ops[0]);
            self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u32);
        }
    }

    pub fn ret(&mut self, sys: &mut System, ins: Ins) {
        if self.regs.condition(ins.cond(ins.operands()[0])) {
            self.pop_pc(sys);
        }
    }

    pub fn reti(&mut self, sys: &mut System, ins: Ins) {
        if self.regs.condition(ins.cond(ins.operands()[0])) {
            self.pop_pc(sys);
            self.regs.ie = true;
        }
    }

    pub fn retic(&mut self, sys: &mut System, ins: Ins) {
        if self.regs.condition(ins.cond(ins.operands()[0])) {
            self.pop_pc(sys);
            self.regs.ie = true;
            self.context_restore();
        }
    }

    /// `retd`, `retid` and `retidc`: returns with delay slots, which are not emulated.
    pub fn delayed_return(&mut self, _: &mut System, ins: Ins) {
        self.reserved(ins);
    }

    /// Returns and drops `imm8` words from the stack.
    pub fn rets(&mut self, sys: &mut System, ins: Ins) {
        self.pop_pc(sys);
        self.regs.sp = self.regs.sp.wrapping_add(ins.imm(ins.operands()[0]));
    }

    pub fn cntx_s(&mut self, _: &mut System, _: Ins) {
        self.context_store();
    }

    pub fn cntx_r(&mut self, _: &mut System, _: Ins) {
        self.context_restore();
    }

    pub fn dint(&mut self, _: &mut System, _: Ins) {
        self.regs.ie = false;
    }

    pub fn eint(&mut self, _: &mut System, _: Ins) {
        self.regs.ie = true;
    }

    // ---- repeats ----

    fn repeat(&mut self, count: u16) {
        self.regs.repc = count;
        self.regs.rep = true;
    }

    pub fn rep_imm8(&mut self, _: &mut System, ins: Ins) {
        self.repeat(ins.imm(ins.operands()[0]));
    }

    pub fn rep_reg(&mut self, _: &mut System, ins: Ins) {
        let count = self.reg_to_bus16(ins.reg(ins.operands()[0]), false);
        self.repeat(count);
    }

    pub fn rep_r6(&mut self, _: &mut System, _: Ins) {
        self.repeat(self.regs.r[6]);
    }

    /// Opens a block repeat from the next instruction up to `end`, inclusive.
    fn block_repeat(&mut self, ins: Ins, count: u16, end: u32) {
        let regs = &mut self.regs;
        if regs.bcn > 3 {
            tracing::warn!("block repeat stack overflow");
            return self.reserved(ins);
        }

        regs.bkrep_stack[regs.bcn as usize] = BlockRepeatFrame {
            start: regs.pc,
            end,
            lc: count,
        };
        regs.lp = true;
        regs.bcn += 1;
    }

    /// `bkrep` with a 16-bit end address inside the current 64K page.
    pub fn bkrep_imm8(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let end = ins.address(ops[1]) | (self.regs.pc & 0x30000);
        self.block_repeat(ins, ins.imm(ops[0]), end);
    }

    pub fn bkrep_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let count = self.reg_to_bus16(ins.reg(ops[0]), false);
        self.block_repeat(ins, count, ins.address(ops[1]));
    }

    pub fn bkrep_r6(&mut self, _: &mut System, ins: Ins) {
        let end = ins.address(ins.operands()[0]);
        self.block_repeat(ins, self.regs.r[6], end);
    }

    /// Leaves the innermost block repeat. Execution continues until the end of the block.
    pub fn break_(&mut self, _: &mut System, ins: Ins) {
        if !self.regs.lp {
            return self.reserved(ins);
        }

        self.regs.bcn -= 1;
        self.regs.lp = self.regs.bcn != 0;
    }

    /// Pops a block repeat frame from memory, growing upwards from `addr`. Returns the updated
    /// pointer.
    fn restore_block_repeat(&mut self, sys: &mut System, ins: Ins, mut addr: u16) -> u16 {
        let regs = &mut self.regs;
        if regs.lp {
            if regs.bcn > 3 {
                tracing::warn!("block repeat stack overflow");
                self.reserved(ins);
                return addr;
            }

            let bcn = regs.bcn as usize;
            regs.bkrep_stack.copy_within(0..bcn, 1);
            regs.bcn += 1;
        }

        let mut next = || {
            let value = sys.read_data(addr);
            addr = addr.wrapping_add(1);
            value
        };

        let flag = next();
        let end = next();
        let start = next();
        let lc = next();

        let valid = (flag >> 15) != 0;
        let regs = &mut self.regs;
        if regs.lp {
            if !valid {
                tracing::warn!("restoring an inactive block repeat into an active loop");
            }
        } else if valid {
            regs.lp = true;
            regs.bcn = 1;
        }

        regs.bkrep_stack[0] = BlockRepeatFrame {
            start: start as u32 | ((flag as u32 & 3) << 16),
            end: end as u32 | (((flag as u32 >> 8) & 3) << 16),
            lc,
        };

        addr
    }

    /// Pushes the innermost block repeat frame to memory, growing downwards from `addr`. Returns
    /// the updated pointer.
    fn store_block_repeat(&mut self, sys: &mut System, mut addr: u16) -> u16 {
        let regs = &mut self.regs;
        let frame = regs.bkrep_stack[0];
        let flag = ((regs.lp as u16) << 15)
            | (frame.start >> 16) as u16
            | (((frame.end >> 16) as u16) << 8);

        for value in [frame.lc, frame.start as u16, frame.end as u16, flag] {
            addr = addr.wrapping_sub(1);
            sys.write_data(addr, value);
        }

        if regs.lp {
            let bcn = regs.bcn as usize;
            regs.bkrep_stack.copy_within(1..bcn, 0);
            regs.bcn -= 1;
            regs.lp = regs.bcn != 0;
        }

        addr
    }

    pub fn bkreprst(&mut self, sys: &mut System, ins: Ins) {
        let ar = self.ar_access(ins, ins.operands()[0], ins.operands()[0]);
        let addr = self.restore_block_repeat(sys, ins, self.regs.r[ar.unit]);
        self.regs.r[ar.unit] = addr;
    }

    pub fn bkreprst_memsp(&mut self, sys: &mut System, ins: Ins) {
        self.regs.sp = self.restore_block_repeat(sys, ins, self.regs.sp);
    }

    pub fn bkrepsto(&mut self, sys: &mut System, ins: Ins) {
        let ar = self.ar_access(ins, ins.operands()[0], ins.operands()[0]);
        let addr = self.store_block_repeat(sys, self.regs.r[ar.unit]);
        self.regs.r[ar.unit] = addr;
    }

    pub fn bkrepsto_memsp(&mut self, sys: &mut System, _: Ins) {
        self.regs.sp = self.store_block_repeat(sys, self.regs.sp);
    }

    // ---- banks ----

    /// Exchanges the selected registers with their bank copies.
    pub fn banke(&mut self, _: &mut System, ins: Ins) {
        let flags = ins.bank_flags(ins.operands()[0]);
        let regs = &mut self.regs;

        if flags.cfgi() {
            std::mem::swap(&mut regs.stepi, &mut regs.stepib);
            std::mem::swap(&mut regs.modi, &mut regs.modib);
            if regs.stp16 {
                std::mem::swap(&mut regs.stepi0, &mut regs.stepi0b);
            }
        }

        if flags.r4() {
            std::mem::swap(&mut regs.r[4], &mut regs.r4b);
        }

        if flags.r1() {
            std::mem::swap(&mut regs.r[1], &mut regs.r1b);
        }

        if flags.r0() {
            std::mem::swap(&mut regs.r[0], &mut regs.r0b);
        }

        if flags.r7() {
            std::mem::swap(&mut regs.r[7], &mut regs.r7b);
        }

        if flags.cfgj() {
            std::mem::swap(&mut regs.stepj, &mut regs.stepjb);
            std::mem::swap(&mut regs.modj, &mut regs.modjb);
            if regs.stp16 {
                std::mem::swap(&mut regs.stepj0, &mut regs.stepj0b);
            }
        }
    }

    pub fn bankr(&mut self, _: &mut System, _: Ins) {
        self.regs.swap_all_ar_arp();
    }

    pub fn bankr_ar(&mut self, _: &mut System, ins: Ins) {
        self.regs.swap_ar(ins.unit(ins.operands()[0]));
    }

    pub fn bankr_ar_arp(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.regs.swap_ar(ins.unit(ops[0]));
        self.regs.swap_arp(ins.unit(ops[1]));
    }

    pub fn bankr_arp(&mut self, _: &mut System, ins: Ins) {
        self.regs.swap_arp(ins.unit(ins.operands()[0]));
    }

    // ---- bit reversal ----

    fn reverse_rn(&mut self, ins: Ins) -> usize {
        let unit = ins.unit(ins.operands()[0]);
        self.regs.r[unit] = self.regs.r[unit].reverse_bits();
        unit
    }

    pub fn bitrev(&mut self, _: &mut System, ins: Ins) {
        self.reverse_rn(ins);
    }

    pub fn bitrev_dbrv(&mut self, _: &mut System, ins: Ins) {
        let unit = self.reverse_rn(ins);
        self.regs.br[unit] = false;
    }

    pub fn bitrev_ebrv(&mut self, _: &mut System, ins: Ins) {
        let unit = self.reverse_rn(ins);
        self.regs.br[unit] = true;
    }

    // ---- configuration loads ----

    pub fn load_ps(&mut self, _: &mut System, ins: Ins) {
        self.regs.ps[0] = ins.imm(ins.operands()[0]) as u8;
    }

    /// Only the low 7 bits of the signed step are kept.
    pub fn load_stepi(&mut self, _: &mut System, ins: Ins) {
        self.regs.stepi = ins.imm(ins.operands()[0]) & 0x7F;
    }

    pub fn load_stepj(&mut self, _: &mut System, ins: Ins) {
        self.regs.stepj = ins.imm(ins.operands()[0]) & 0x7F;
    }

    pub fn load_page(&mut self, _: &mut System, ins: Ins) {
        self.regs.page = ins.imm(ins.operands()[0]) as u8;
    }

    pub fn load_modi(&mut self, _: &mut System, ins: Ins) {
        self.regs.modi = ins.imm(ins.operands()[0]);
    }

    pub fn load_modj(&mut self, _: &mut System, ins: Ins) {
        self.regs.modj = ins.imm(ins.operands()[0]);
    }

    pub fn load_movpd(&mut self, _: &mut System, ins: Ins) {
        self.regs.pcmhi = ins.imm(ins.operands()[0]) as u8;
    }

    pub fn load_ps01(&mut self, _: &mut System, ins: Ins) {
        let value = ins.imm(ins.operands()[0]);
        self.regs.ps = [(value & 3) as u8, (value >> 2) as u8];
    }

    // ---- address register modification ----

    fn modify_rn(&mut self, unit: usize, step: Step, dmod: bool) {
        self.rn_and_modify(unit, step, dmod);
        self.regs.fr = self.regs.r[unit] == 0;
    }

    pub fn modr(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.modify_rn(ins.unit(ops[0]), ins.step(ops[1]), false);
    }

    pub fn modr_dmod(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.modify_rn(ins.unit(ops[0]), ins.step(ops[1]), true);
    }

    pub fn modr_i2(&mut self, _: &mut System, ins: Ins) {
        self.modify_rn(ins.unit(ins.operands()[0]), Step::Increase2Mode1, false);
    }

    pub fn modr_i2_dmod(&mut self, _: &mut System, ins: Ins) {
        self.modify_rn(ins.unit(ins.operands()[0]), Step::Increase2Mode1, true);
    }

    pub fn modr_d2(&mut self, _: &mut System, ins: Ins) {
        self.modify_rn(ins.unit(ins.operands()[0]), Step::Decrease2Mode1, false);
    }

    pub fn modr_d2_dmod(&mut self, _: &mut System, ins: Ins) {
        self.modify_rn(ins.unit(ins.operands()[0]), Step::Decrease2Mode1, true);
    }

    /// Steps both pointers of an `arp` pair. Does not affect `fr`.
    fn modify_pair(&mut self, ins: Ins, dmod_i: bool, dmod_j: bool) {
        let ops = ins.operands();
        let arp = self.arp_access(ins, ops[0], ops[1], ops[2]);
        self.rn_and_modify(arp.i, arp.step_i, dmod_i);
        self.rn_and_modify(arp.j, arp.step_j, dmod_j);
    }

    pub fn modr_eemod(&mut self, _: &mut System, ins: Ins) {
        self.modify_pair(ins, false, false);
    }

    pub fn modr_edmod(&mut self, _: &mut System, ins: Ins) {
        self.modify_pair(ins, false, true);
    }

    pub fn modr_demod(&mut self, _: &mut System, ins: Ins) {
        self.modify_pair(ins, true, false);
    }

    pub fn modr_ddmod(&mut self, _: &mut System, ins: Ins) {
        self.modify_pair(ins, true, true);
    }

    // ---- stack ----

    /// Pushes a 32-bit value, low half first.
    fn push32(&mut self, sys: &mut System, value: u32) {
        self.push(sys, value as u16);
        self.push(sys, (value >> 16) as u16);
    }

    /// Pops a 32-bit value pushed by [`Self::push32`].
    fn pop32(&mut self, sys: &mut System) -> u32 {
        let high = self.pop(sys);
        let low = self.pop(sys);
        low as u32 | ((high as u32) << 16)
    }

    pub fn push_imm(&mut self, sys: &mut System, ins: Ins) {
        self.push(sys, ins.imm(ins.operands()[0]));
    }

    pub fn push_reg(&mut self, sys: &mut System, ins: Ins) {
        let value = self.reg_to_bus16(ins.reg(ins.operands()[0]), true);
        self.push(sys, value);
    }

    /// Pushes the extension byte of an accumulator, after saturation.
    pub fn push_abe(&mut self, sys: &mut System, ins: Ins) {
        let value = self.acc_saturated(ins.reg(ins.operands()[0]));
        self.push(sys, (value >> 32) as u16);
    }

    pub fn push_cfg(&mut self, sys: &mut System, ins: Ins) {
        let value = self.reg_to_bus16(ins.reg(ins.operands()[0]), false);
        self.push(sys, value);
    }

    pub fn push_prpage(&mut self, sys: &mut System, _: Ins) {
        self.push(sys, self.regs.prpage);
    }

    pub fn push_px(&mut self, sys: &mut System, ins: Ins) {
        let value = self.product_bus40(ins.unit(ins.operands()[0])) as u32;
        self.push32(sys, value);
    }

    pub fn push_r6(&mut self, sys: &mut System, _: Ins) {
        self.push(sys, self.regs.r[6]);
    }

    pub fn push_repc(&mut self, sys: &mut System, _: Ins) {
        self.push(sys, self.regs.repc);
    }

    pub fn push_x0(&mut self, sys: &mut System, _: Ins) {
        self.push(sys, self.regs.x[0]);
    }

    pub fn push_x1(&mut self, sys: &mut System, _: Ins) {
        self.push(sys, self.regs.x[1]);
    }

    pub fn push_y1(&mut self, sys: &mut System, _: Ins) {
        self.push(sys, self.regs.y[1]);
    }

    pub fn pusha(&mut self, sys: &mut System, ins: Ins) {
        let value = self.acc_saturated(ins.reg(ins.operands()[0]));
        self.push32(sys, value as u32);
    }

    /// `pop` into a register, a configuration register or `bx`.
    pub fn pop_reg(&mut self, sys: &mut System, ins: Ins) {
        let value = self.pop(sys);
        self.reg_from_bus16(ins.reg(ins.operands()[0]), value);
    }

    /// Pops the extension byte of an accumulator.
    pub fn pop_abe(&mut self, sys: &mut System, ins: Ins) {
        let name = ins.reg(ins.operands()[0]);
        let ext = sign_extend::<8>(self.pop(sys) as u64 & 0xFF) as u32;
        let value = (self.acc(name) & 0xFFFF_FFFF) | ((ext as u64) << 32);
        self.write_acc(name, value);
    }

    pub fn pop_prpage(&mut self, sys: &mut System, _: Ins) {
        self.regs.prpage = self.pop(sys);
    }

    pub fn pop_px(&mut self, sys: &mut System, ins: Ins) {
        let value = self.pop32(sys);
        self.set_product(ins.unit(ins.operands()[0]), value);
    }

    pub fn pop_r6(&mut self, sys: &mut System, _: Ins) {
        self.regs.r[6] = self.pop(sys);
    }

    pub fn pop_repc(&mut self, sys: &mut System, _: Ins) {
        self.regs.repc = self.pop(sys);
    }

    pub fn pop_x0(&mut self, sys: &mut System, _: Ins) {
        self.regs.x[0] = self.pop(sys);
    }

    pub fn pop_x1(&mut self, sys: &mut System, _: Ins) {
        self.regs.x[1] = self.pop(sys);
    }

    pub fn pop_y1(&mut self, sys: &mut System, _: Ins) {
        self.regs.y[1] = self.pop(sys);
    }

    pub fn popa(&mut self, sys: &mut System, ins: Ins) {
        let value = sign_extend::<32>(self.pop32(sys) as u64);
        self.write_acc(ins.reg(ins.operands()[0]), value);
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
    fn relative_branch_to_self_idles() {
        let (mut int, mut sys) = interp();
        int.regs.pc = 0x101;

        // brr -1, always
        exec(&mut int, &mut sys, 0b0101_0111_1111_0000, 0);
        assert_eq!(int.regs.pc, 0x100);
        assert!(int.idle);
    }

    #[test]
    fn call_and_return() {
        let (mut int, mut sys) = interp();
        int.regs.sp = 0x800;
        int.regs.pc = 0x1_2346;

        // call 0x2ABCD, always
        exec(&mut int, &mut sys, 0b0100_0001_1110_0000, 0xABCD);
        assert_eq!(int.regs.pc, 0x2_ABCD);
        assert_eq!(int.regs.sp, 0x7FE);

        // ret, always
        let base = 0b0100_0101_1000_0000;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Ret);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.pc, 0x1_2346);
        assert_eq!(int.regs.sp, 0x800);
    }

    #[test]
    fn rets_drops_words() {
        let (mut int, mut sys) = interp();
        int.regs.sp = 0x800;
        int.regs.pc = 0x10;
        int.push_pc(&mut sys);

        exec(&mut int, &mut sys, 0b0000_1001_0000_0011, 0);
        assert_eq!(int.regs.pc, 0x10);
        assert_eq!(int.regs.sp, 0x803);
    }

    #[test]
    fn block_repeat_frames_round_trip() {
        let (mut int, mut sys) = interp();
        int.regs.pc = 0x20;
        int.regs.sp = 0x400;

        // bkrep 5, 0x0030
        let base = 0b0101_1100_0000_0101;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::BkrepImm8);
        exec(&mut int, &mut sys, base, 0x0030);
        assert!(int.regs.lp);
        assert_eq!(int.regs.bcn, 1);
        assert_eq!(
            int.regs.bkrep_stack[0],
            BlockRepeatFrame {
                start: 0x20,
                end: 0x30,
                lc: 5
            }
        );

        // bkrepsto [sp]
        exec(&mut int, &mut sys, 0b1001_0100_0110_1000, 0);
        assert!(!int.regs.lp);
        assert_eq!(int.regs.bcn, 0);
        assert_eq!(int.regs.sp, 0x3FC);
        assert_eq!(sys.read_data(0x3FC), 0x8000);

        // bkreprst [sp]
        exec(&mut int, &mut sys, 0b0101_1111_0100_1000, 0);
        assert!(int.regs.lp);
        assert_eq!(int.regs.bcn, 1);
        assert_eq!(int.regs.sp, 0x400);
        assert_eq!(int.regs.bkrep_stack[0].lc, 5);
        assert_eq!(int.regs.bkrep_stack[0].end, 0x30);
    }

    #[test]
    fn nested_block_repeat_shifts_stack() {
        let (mut int, mut sys) = interp();
        int.regs.sp = 0x400;
        for (lc, end) in [(1, 0x50), (2, 0x40)] {
            let ins = Ins::with_extra(0b0101_1100_0000_0000 | lc, end);
            int.bkrep_imm8(&mut sys, ins);
        }

        int.bkrepsto_memsp(&mut sys, Ins::new(0b1001_0100_0110_1000));
        assert_eq!(int.regs.bcn, 1);
        assert_eq!(int.regs.bkrep_stack[0].lc, 2);
    }

    #[test]
    fn break_leaves_innermost_loop() {
        let (mut int, mut sys) = interp();
        int.block_repeat(Ins::new(0), 3, 0x10);
        int.block_repeat(Ins::new(0), 3, 0x08);

        exec(&mut int, &mut sys, 0b1101_0011_1100_0000, 0);
        assert_eq!(int.regs.bcn, 1);
        assert!(int.regs.lp);

        exec(&mut int, &mut sys, 0b1101_0011_1100_0000, 0);
        assert!(!int.regs.lp);
    }

    #[test]
    fn bank_exchange() {
        let (mut int, mut sys) = interp();
        int.regs.r[0] = 1;
        int.regs.r0b = 2;
        int.regs.stepi = 3;
        int.regs.stepib = 4;

        // banke r0, cfgi
        let base = 0b0100_1011_1000_1001;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Banke);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!((int.regs.r[0], int.regs.r0b), (2, 1));
        assert_eq!((int.regs.stepi, int.regs.stepib), (4, 3));
    }

    #[test]
    fn product_push_and_pop() {
        let (mut int, mut sys) = interp();
        int.regs.sp = 0x100;
        int.set_product(1, 0x8000_1234);

        // push p1, clear, pop p1
        exec(&mut int, &mut sys, 0b1101_0111_1000_1110, 0);
        assert_eq!(int.regs.sp, 0xFE);
        assert_eq!(sys.read_data(0xFE), 0x8000);
        assert_eq!(sys.read_data(0xFF), 0x1234);

        int.set_product(1, 0);
        exec(&mut int, &mut sys, 0b1101_0100_1001_0111, 0);
        assert_eq!(int.regs.p[1], 0x8000_1234);
        assert!(int.regs.pe[1]);
    }

    #[test]
    fn popa_sign_extends() {
        let (mut int, mut sys) = interp();
        int.regs.sp = 0x100;
        int.push32(&mut sys, 0x8000_0001);

        // popa a1
        exec(&mut int, &mut sys, 0b0100_0111_1011_0011, 0);
        assert_eq!(int.regs.a[1], 0xFFFF_FFFF_8000_0001);
        assert!(int.regs.fm);
    }

    #[test]
    fn pop_extension_byte() {
        let (mut int, mut sys) = interp();
        int.regs.sp = 0x100;
        int.regs.b[0] = 0x1234_5678;
        int.push(&mut sys, 0x00FF);

        // pop b0e
        exec(&mut int, &mut sys, 0b0100_0111_1011_0100, 0);
        assert_eq!(int.regs.b[0], 0xFFFF_FFFF_1234_5678);
    }

    #[test]
    fn loads() {
        let (mut int, mut sys) = interp();

        exec(&mut int, &mut sys, 0b0000_0000_0001_1110, 0);
        assert_eq!(int.regs.ps, [2, 3]);

        exec(&mut int, &mut sys, 0b1101_1011_1111_1111, 0);
        assert_eq!(int.regs.stepi, 0x7F);

        exec(&mut int, &mut sys, 0b0000_0011_0000_0011, 0);
        assert_eq!(int.regs.modi, 0x103);
    }

    #[test]
    fn modr_sets_fr() {
        let (mut int, mut sys) = interp();
        int.regs.r[2] = 1;

        // modr r2--
        let base = 0b0000_0000_1001_0010;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Modr);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.r[2], 0);
        assert!(int.regs.fr);
    }

    #[test]
    fn bit_reverse() {
        let (mut int, mut sys) = interp();
        int.regs.r[3] = 0x0001;

        exec(&mut int, &mut sys, 0b1101_0111_1110_0011, 0);
        assert_eq!(int.regs.r[3], 0x8000);
        assert!(int.regs.br[3]);
    }
}
