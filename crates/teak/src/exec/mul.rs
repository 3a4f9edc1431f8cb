//! Multiplication, product sums, codebook search and the `mma` family.

use crate::{
    Interpreter,
    ins::{
        Ins, Operand, SumBase, SumOp,
        operand::{CbsCond, MulOp, RegName},
    },
    system::System,
};
use util::sign_extend;

impl Interpreter {
    /// Accumulates the previous product (if the operation accumulates) and multiplies `x0` by
    /// `y0`.
    fn mul_generic(&mut self, op: MulOp, dest: RegName) {
        if !matches!(op, MulOp::Mpy | MulOp::Mpysu) {
            let value = self.acc(dest);
            let mut product = self.product_bus40(0);
            if matches!(op, MulOp::Maa | MulOp::Maasu) {
                product = sign_extend::<24>(product >> 16);
            }

            let result = self.add_sub(value, product, false);
            self.write_acc_sat(dest, result);
        }

        // "su" multiplies a signed y by an unsigned x
        match op {
            MulOp::Mpy | MulOp::Mac | MulOp::Maa => self.multiply(0, true, true),
            MulOp::Mpysu | MulOp::Macsu | MulOp::Maasu => self.multiply(0, false, true),
            MulOp::Macus => self.multiply(0, true, false),
            MulOp::Macuu => self.multiply(0, false, false),
        }
    }

    /// Subtracts `p0` from an accumulator.
    fn subtract_product(&mut self, dest: RegName) {
        let value = self.acc(dest);
        let product = self.product_bus40(0);
        let result = self.add_sub(value, product, true);
        self.write_acc_sat(dest, result);
    }

    pub fn mul_rn_imm(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.indirect(ins.unit(ops[1]), ins.step(ops[2]));
        self.regs.y[0] = sys.read_data(addr);
        self.regs.x[0] = ins.imm(ops[3]);
        self.mul_generic(ins.mul(ops[0]), ins.reg(ops[4]));
    }

    pub fn mul_y0_rn(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let addr = self.indirect(ins.unit(ops[1]), ins.step(ops[2]));
        self.regs.x[0] = sys.read_data(addr);
        self.mul_generic(ins.mul(ops[0]), ins.reg(ops[3]));
    }

    pub fn mul_y0_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.regs.x[0] = self.reg_to_bus16(ins.reg(ops[1]), false);
        self.mul_generic(ins.mul(ops[0]), ins.reg(ops[2]));
    }

    pub fn mul_r45_r0123(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let y = self.indirect(ins.unit(ops[1]), ins.step(ops[2]));
        let x = self.indirect(ins.unit(ops[3]), ins.step(ops[4]));
        self.regs.y[0] = sys.read_data(y);
        self.regs.x[0] = sys.read_data(x);
        self.mul_generic(ins.mul(ops[0]), ins.reg(ops[5]));
    }

    pub fn mul_y0_r6(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.regs.x[0] = self.regs.r[6];
        self.mul_generic(ins.mul(ops[0]), ins.reg(ops[1]));
    }

    pub fn mul_y0_page(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.regs.x[0] = self.load(sys, ins.mem(ops[1]));
        self.mul_generic(ins.mul(ops[0]), ins.reg(ops[2]));
    }

    pub fn mpyi(&mut self, _: &mut System, ins: Ins) {
        self.regs.x[0] = ins.imm(ins.operands()[0]);
        self.multiply(0, true, true);
    }

    pub fn msu_r45_r0123(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let y = self.indirect(ins.unit(ops[0]), ins.step(ops[1]));
        let x = self.indirect(ins.unit(ops[2]), ins.step(ops[3]));
        self.subtract_product(ins.reg(ops[4]));

        self.regs.y[0] = sys.read_data(y);
        self.regs.x[0] = sys.read_data(x);
        self.multiply(0, true, true);
    }

    pub fn msu_rn_imm(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let y = self.indirect(ins.unit(ops[0]), ins.step(ops[1]));
        self.subtract_product(ins.reg(ops[3]));

        self.regs.y[0] = sys.read_data(y);
        self.regs.x[0] = ins.imm(ops[2]);
        self.multiply(0, true, true);
    }

    pub fn msusu(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let x = self.indirect(ar.unit, ar.step);
        self.subtract_product(ins.reg(ops[2]));

        self.regs.x[0] = sys.read_data(x);
        self.multiply(0, false, true);
    }

    pub fn mac_x1to0(&mut self, _: &mut System, ins: Ins) {
        let dest = ins.reg(ins.operands()[0]);
        let value = self.acc(dest);
        let product = self.product_bus40(0);
        let result = self.add_sub(value, product, false);
        self.write_acc_sat(dest, result);

        self.regs.x[0] = self.regs.x[1];
        self.multiply(0, true, true);
    }

    pub fn mac1(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let arp = self.arp_access(ins, ops[0], ops[1], ops[2]);
        let i = self.indirect(arp.i, arp.step_i);
        let j = self.indirect(arp.j, arp.step_j);

        let dest = ins.reg(ops[3]);
        let value = self.acc(dest);
        let product = self.product_bus40(1);
        let result = self.add_sub(value, product, false);
        self.write_acc_sat(dest, result);

        self.regs.x[1] = sys.read_data(i);
        self.regs.y[1] = sys.read_data(j);
        self.multiply(1, true, true);
    }

    // ---- squares ----

    pub fn sqr_sqr_add3(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc(ins.reg(ops[0]));
        self.product_sum(SumBase::Acc, ins.reg(ops[1]), SumOp::Add, SumOp::Add);

        let (high, low) = ((value >> 16) as u16, value as u16);
        self.regs.x[0] = high;
        self.regs.y[0] = high;
        self.regs.x[1] = low;
        self.regs.y[1] = low;
        self.multiply(0, true, true);
        self.multiply(1, true, true);
    }

    pub fn sqr_sqr_add3_mem(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.product_sum(SumBase::Acc, ins.reg(ops[2]), SumOp::Add, SumOp::Add);

        let ar = self.ar_access(ins, ops[0], ops[1]);
        let first = self.indirect(ar.unit, ar.step);
        let second = self.offset_address(ar.unit, first, ar.offset, false);

        let first = sys.read_data(first);
        let second = sys.read_data(second);
        self.regs.x[0] = first;
        self.regs.y[0] = first;
        self.regs.x[1] = second;
        self.regs.y[1] = second;
        self.multiply(0, true, true);
        self.multiply(1, true, true);
    }

    pub fn sqr_mpysu_add3a(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let value = self.acc(ins.reg(ops[0]));
        self.product_sum(SumBase::Acc, ins.reg(ops[1]), SumOp::Add, SumOp::AddAligned);

        let (high, low) = ((value >> 16) as u16, value as u16);
        self.regs.x[0] = high;
        self.regs.y[0] = high;
        self.regs.y[1] = high;
        self.regs.x[1] = low;
        self.multiply(0, true, true);
        self.multiply(1, false, true);
    }

    // ---- product sums ----

    fn sum_into(&mut self, ins: Ins, dest: Operand, sum: Operand) {
        let (base, op0, op1) = ins.sum(sum);
        self.product_sum(base, ins.reg(dest), op0, op1);
    }

    pub fn app(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.sum_into(ins, ops[0], ops[1]);
    }

    pub fn mov_sv_app(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.indirect(ar.unit, ar.step);
        self.regs.sv = sys.read_data(addr);
        self.sum_into(ins, ops[2], ops[3]);
    }

    pub fn clrp0(&mut self, _: &mut System, _: Ins) {
        self.set_product(0, 0);
    }

    pub fn clrp1(&mut self, _: &mut System, _: Ins) {
        self.set_product(1, 0);
    }

    pub fn clrp(&mut self, _: &mut System, _: Ins) {
        self.set_product(0, 0);
        self.set_product(1, 0);
    }

    /// Adds a rounded memory word, taken as the high half, to a product register.
    pub fn addhp(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.indirect(ar.unit, ar.step);

        let value = sign_extend::<32>(((sys.read_data(addr) as u64) << 16) | 0x8000);
        let product = self.product_bus40(ins.unit(ops[2]));
        let result = self.add_sub(value, product, false);
        self.write_acc_sat(ins.reg(ops[3]), result);
    }

    // ---- codebook search ----

    /// One step of a codebook search. Compares both products, keeping the winner's pointer in
    /// `mixp`, then starts the next pair of multiplications.
    fn codebook_search(&mut self, u: u16, v: u16, pointer: u16, cond: CbsCond) {
        let diff = self.product_bus40(0).wrapping_sub(self.product_bus40(1));
        let take = match cond {
            CbsCond::Ge => (diff >> 63) == 0,
            CbsCond::Gt => (diff >> 63) == 0 && diff != 0,
        };

        let regs = &mut self.regs;
        if take {
            regs.x[1] = regs.p0h_cbs;
            regs.x[0] = regs.y[1];
            regs.mixp = pointer;
        }

        regs.y[0] = u;
        let x0 = std::mem::replace(&mut regs.x[0], u);
        self.multiply(0, true, true);

        let high = (self.product_bus40(0) >> 16) as u16;
        let regs = &mut self.regs;
        regs.p0h_cbs = high;
        regs.y[0] = high;
        regs.x[0] = x0;
        regs.y[1] = v;
        self.multiply(0, true, true);
        self.multiply(1, true, true);
    }

    pub fn cbs_axh(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let name = ins.reg(ops[0]);
        let u = (self.acc(name) >> 16) as u16;
        let v = (self.acc(name.counterpart()) >> 16) as u16;
        self.codebook_search(u, v, self.regs.r[0], ins.cbs_cond(ops[1]));
    }

    pub fn cbs_axh_bxh(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        let u = (self.acc(ins.reg(ops[0])) >> 16) as u16;
        let v = (self.acc(ins.reg(ops[1])) >> 16) as u16;
        self.codebook_search(u, v, self.regs.r[0], ins.cbs_cond(ops[2]));
    }

    pub fn cbs_arp(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let arp = self.arp_access(ins, ops[0], ops[1], ops[2]);
        let pointer = self.rn_and_modify(arp.i, arp.step_i, false);
        let i = self.rn_address(arp.i, pointer);
        let j = self.indirect(arp.j, arp.step_j);

        let u = sys.read_data(i);
        let v = sys.read_data(j);
        self.codebook_search(u, v, pointer, ins.cbs_cond(ops[3]));
    }

    // ---- multiply and accumulate pairs ----

    /// Multiplies both units with the signedness encoded in `signs`.
    fn multiply_both(&mut self, ins: Ins, signs: Operand) {
        let [x0, y0, x1, y1] = ins.signs(signs);
        self.multiply(0, x0, y0);
        self.multiply(1, x1, y1);
    }

    pub fn mma_reg(&mut self, _: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.sum_into(ins, ops[0], ops[2]);
        self.regs.x.swap(0, 1);
        self.multiply_both(ins, ops[1]);
    }

    /// `mma` loading both operand pairs through an `arp` pointer pair.
    pub fn mma_arp(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.sum_into(ins, ops[4], ops[6]);

        let arp = self.arp_access(ins, ops[0], ops[1], ops[2]);
        let (dmod_i, dmod_j) = ins.dmod(ops[3]);
        let x = self.indirect_dmod(arp.i, arp.step_i, dmod_i);
        let y = self.indirect_dmod(arp.j, arp.step_j, dmod_j);
        let x1 = self.offset_address(arp.i, x, arp.offset_i, dmod_i);
        let y1 = self.offset_address(arp.j, y, arp.offset_j, dmod_j);

        self.regs.x[0] = sys.read_data(x);
        self.regs.y[0] = sys.read_data(y);
        self.regs.x[1] = sys.read_data(x1);
        self.regs.y[1] = sys.read_data(y1);
        self.multiply_both(ins, ops[5]);
    }

    fn mma_load_y(&mut self, sys: &mut System, ins: Ins, unit: usize) {
        let ops = ins.operands();
        self.sum_into(ins, ops[2], ops[4]);
        self.regs.x.swap(0, 1);

        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.indirect(ar.unit, ar.step);
        self.regs.y[unit] = sys.read_data(addr);
        self.multiply_both(ins, ops[3]);
    }

    pub fn mma_mx_xy(&mut self, sys: &mut System, ins: Ins) {
        self.mma_load_y(sys, ins, 0);
    }

    pub fn mma_xy_mx(&mut self, sys: &mut System, ins: Ins) {
        self.mma_load_y(sys, ins, 1);
    }

    pub fn mma_my_my(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        self.sum_into(ins, ops[2], ops[4]);

        let ar = self.ar_access(ins, ops[0], ops[1]);
        let addr = self.indirect(ar.unit, ar.step);
        let next = self.offset_address(ar.unit, addr, ar.offset, false);
        self.regs.x[0] = sys.read_data(addr);
        self.regs.x[1] = sys.read_data(next);
        self.multiply_both(ins, ops[3]);
    }

    /// Stores the high halves of two accumulators, then runs an `mma`.
    fn mma_store(
        &mut self,
        sys: &mut System,
        ins: Ins,
        (u, v): (RegName, RegName),
        ar: (Operand, Operand),
        rest: &[Operand],
    ) {
        let ar = self.ar_access(ins, ar.0, ar.1);
        let addr = self.indirect(ar.unit, ar.step);
        let u = (self.acc_saturated_quiet(u) >> 16) as u16;
        let v = (self.acc_saturated_quiet(v) >> 16) as u16;

        // the second word is written first
        sys.write_data(self.offset_address(ar.unit, addr, ar.offset, false), v);
        sys.write_data(addr, u);

        self.sum_into(ins, rest[0], rest[2]);
        self.regs.x.swap(0, 1);
        self.multiply_both(ins, rest[1]);
    }

    pub fn mma_mov(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let pair = (ins.reg(ops[0]), ins.reg(ops[1]));
        self.mma_store(sys, ins, pair, (ops[2], ops[3]), &ops[4..]);
    }

    pub fn mma_mov_ar(&mut self, sys: &mut System, ins: Ins) {
        let ops = ins.operands();
        let name = ins.reg(ops[2]);
        self.mma_store(sys, ins, (name, name.counterpart()), (ops[0], ops[1]), &ops[2..]);
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
    fn mac_accumulates_previous_product() {
        let (mut int, _) = interp();
        int.regs.a[0] = 10;
        int.set_product(0, 5);
        int.regs.x[0] = 3;
        int.regs.y[0] = 0xFFFF;

        int.mul_generic(MulOp::Mac, RegName::A0);
        assert_eq!(int.regs.a[0], 15);
        assert_eq!(int.product_bus40(0), (-3i64) as u64);
    }

    #[test]
    fn unsigned_multiply() {
        let (mut int, _) = interp();
        int.regs.x[0] = 0xFFFF;
        int.regs.y[0] = 2;

        int.mul_generic(MulOp::Macuu, RegName::B0);
        assert_eq!(int.regs.p[0], 0x1FFFE);
        assert!(!int.regs.pe[0]);
    }

    #[test]
    fn aligned_accumulate() {
        let (mut int, _) = interp();
        int.set_product(0, 0x0003_0000);
        int.regs.x[0] = 0;

        int.mul_generic(MulOp::Maa, RegName::A1);
        assert_eq!(int.regs.a[1], 3);
        assert_eq!(int.regs.p[0], 0);
    }

    #[test]
    fn mpyi_signed_immediate() {
        let (mut int, mut sys) = interp();
        int.regs.y[0] = 4;

        // mpyi -2
        let base = 0b0000_1000_1111_1110;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Mpyi);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.x[0], 0xFFFE);
        assert_eq!(int.product_bus40(0), (-8i64) as u64);
    }

    #[test]
    fn squares_of_both_halves() {
        let (mut int, mut sys) = interp();
        int.regs.a[0] = (3 << 16) | 5;

        // sqr_sqr_add3 a0, b0
        let base = 0b1101_0111_1001_1000;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::SqrSqrAdd3);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.p[0], 9);
        assert_eq!(int.regs.p[1], 25);
        assert_eq!(int.regs.b[0], 0);

        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.b[0], 34);
    }

    #[test]
    fn product_sum_with_sv_base() {
        let (mut int, _) = interp();
        int.regs.sv = 1;
        int.set_product(0, 2);
        int.set_product(1, 1);

        int.product_sum(SumBase::SvRnd, RegName::B1, SumOp::Add, SumOp::Sub);
        assert_eq!(int.regs.b[1], 0x1_8001);
    }

    #[test]
    fn codebook_search_tracks_winner() {
        let (mut int, _) = interp();
        int.set_product(0, 10);
        int.set_product(1, 4);
        int.regs.y[1] = 7;
        int.regs.p0h_cbs = 9;

        int.codebook_search(2, 3, 0x55, CbsCond::Gt);
        assert_eq!(int.regs.mixp, 0x55);
        assert_eq!(int.regs.x[1], 9);
        assert_eq!(int.regs.x[0], 7);
        assert_eq!(int.regs.y[1], 3);

        // p0 = 2 * 2, its high half feeds y0
        assert_eq!(int.regs.p0h_cbs, 0);
        assert_eq!(int.regs.y[0], 0);
        assert_eq!(int.regs.p[1], 27);
    }

    #[test]
    fn mma_swaps_x_registers() {
        let (mut int, mut sys) = interp();
        int.regs.x = [2, 3];
        int.regs.y = [5, 7];

        // mma with a zero base into a0
        let base = 0b0101_1110_0010_0110;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Mma2);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.x, [3, 2]);
        assert_eq!(int.regs.p[0], 15);
        assert_eq!(int.regs.p[1], 14);
        assert_eq!(int.regs.a[0], 0);
    }

    #[test]
    fn addhp_rounds() {
        let (mut int, mut sys) = interp();
        int.regs.arrn[0] = 2;
        int.regs.arstep[0] = 0;
        int.regs.r[2] = 0x40;
        sys.write_data(0x40, 1);
        int.set_product(0, 1);

        // addhp [ar0], p0, a0
        let base = 0b1001_0000_1110_0000;
        assert_eq!(Ins::new(base).decoded().opcode, Opcode::Addhp);
        exec(&mut int, &mut sys, base, 0);
        assert_eq!(int.regs.a[0], 0x1_8001);
    }
}
