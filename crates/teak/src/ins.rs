mod opcodes;

pub mod disasm;
pub mod operand;

pub use opcodes::{ModMode, Opcode, Operand, Sign, SumBase, SumOp};

use operand::{
    AB, ABE, ABH, ABL, ABLH, ALB, ALM, ALU, AR_ARP, AR_ARP_STT_MOD, AX, AXH, AXL, AlbOp, AlmOp,
    BX, BXH, BankFlags, COND, CbsCond, Cond, MODA3, MODA4, MUL2, MUL3, Mem, ModaOp, MulOp, REGISTER,
    RN, RN_OLD, RegName, STT_MOD, SWAP, Step, SwapType,
};

include!(concat!(env!("OUT_DIR"), "/teak_decoding_lut.rs"));

#[derive(Clone, Copy)]
pub struct Ins {
    pub base: u16,
    pub extra: u16,
}

impl std::fmt::Debug for Ins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} ({:04X}:{:04X})",
            self.decoded().opcode,
            self.base,
            self.extra
        )
    }
}

#[derive(Clone, Copy)]
pub struct Decoded {
    pub opcode: Opcode,
    pub needs_extra: bool,
}

impl Decoded {
    pub fn len(self) -> u16 {
        if self.needs_extra { 2 } else { 1 }
    }
}

impl Ins {
    pub fn new(base: u16) -> Self {
        Self { base, extra: 0 }
    }

    pub fn with_extra(base: u16, extra: u16) -> Self {
        Self { base, extra }
    }

    #[inline(always)]
    pub fn decoded(self) -> Decoded {
        DECODING_LUT[self.base as usize]
    }

    /// Operand layout of this instruction.
    #[inline(always)]
    pub fn operands(self) -> &'static [Operand] {
        self.decoded().opcode.operands()
    }

    #[inline(always)]
    fn field(self, pos: u8, width: u8) -> u16 {
        (self.base >> pos) & ((1 << width) - 1)
    }

    #[inline(always)]
    fn index(self, pos: u8, width: u8) -> usize {
        self.field(pos, width) as usize
    }

    /// Decodes a register operand.
    pub fn reg(self, operand: Operand) -> RegName {
        match operand {
            Operand::Ax(p) => AX[self.index(p, 1)],
            Operand::Axl(p) => AXL[self.index(p, 1)],
            Operand::Axh(p) => AXH[self.index(p, 1)],
            Operand::Bx(p) => BX[self.index(p, 1)],
            Operand::Bxl(p) => [RegName::B0l, RegName::B1l][self.index(p, 1)],
            Operand::Bxh(p) => BXH[self.index(p, 1)],
            Operand::Ab(p) => AB[self.index(p, 2)],
            Operand::Abl(p) => ABL[self.index(p, 2)],
            Operand::Abh(p) => ABH[self.index(p, 2)],
            Operand::Abe(p) => ABE[self.index(p, 2)],
            Operand::Ablh(p) => ABLH[self.index(p, 3)],
            Operand::RnOld(p) => RN_OLD[self.index(p, 3)],
            Operand::Rn(p) => RN[self.index(p, 3)],
            Operand::Register(p) => REGISTER[self.index(p, 5)],
            Operand::ArArpSttMod(p) => AR_ARP_STT_MOD[self.index(p, 4)],
            Operand::ArArp(p) => AR_ARP[self.index(p, 3)],
            Operand::SttMod(p) => STT_MOD[self.index(p, 3)],
            Operand::FixedAx(n) => AX[n as usize],
            Operand::FixedBx(n) => BX[n as usize],
            _ => unreachable!("{operand:?} is not a register operand"),
        }
    }

    /// Decodes the unit index of an address register, product register or indirect configuration
    /// operand.
    pub fn unit(self, operand: Operand) -> usize {
        match operand {
            Operand::Rn(p) => self.index(p, 3),
            Operand::R45(p) => 4 + self.index(p, 1),
            Operand::R0123(p) => self.index(p, 2),
            Operand::ArRn1(p) | Operand::ArStep1(p) => self.index(p, 1),
            Operand::ArStep1Alt(p) => 2 + self.index(p, 1),
            Operand::ArRn2(p) | Operand::ArStep2(p) => self.index(p, 2),
            Operand::ArpRn1(p) | Operand::ArpStep1(p) => self.index(p, 1),
            Operand::ArpRn2(p) | Operand::ArpStep2(p) => self.index(p, 2),
            Operand::Px(p) | Operand::Ar(p) => self.index(p, 1),
            Operand::Arp(p) => self.index(p, 2),
            _ => unreachable!("{operand:?} is not a unit operand"),
        }
    }

    pub fn step(self, operand: Operand) -> Step {
        match operand {
            Operand::StepZids(p) => Step::zids(self.field(p, 2)),
            _ => unreachable!("{operand:?} is not a step operand"),
        }
    }

    /// Decodes an immediate operand, sign extending it to 16 bits when it is signed.
    pub fn imm(self, operand: Operand) -> u16 {
        match operand {
            Operand::Imm2(p) => self.field(p, 2),
            Operand::Imm4(p) => self.field(p, 4),
            Operand::Imm5(p) => self.field(p, 5),
            Operand::Imm5s(p) => util::sign_extend16::<5>(self.field(p, 5)),
            Operand::Imm6s(p) => util::sign_extend16::<6>(self.field(p, 6)),
            Operand::Imm7s(p) => util::sign_extend16::<7>(self.field(p, 7)),
            Operand::Imm8(p) => self.field(p, 8),
            Operand::Imm8s(p) => util::sign_extend16::<8>(self.field(p, 8)),
            Operand::Imm9(p) => self.field(p, 9),
            Operand::Imm16 => self.extra,
            _ => unreachable!("{operand:?} is not an immediate operand"),
        }
    }

    pub fn mem(self, operand: Operand) -> Mem {
        match operand {
            Operand::MemImm8(p) => Mem::Page(self.field(p, 8) as u8),
            Operand::MemImm16 => Mem::Imm16(self.extra),
            Operand::MemR7Imm16 => Mem::R7Imm16(self.extra),
            Operand::MemR7Imm7s(p) => Mem::R7Imm7s(util::sign_extend16::<7>(self.field(p, 7))),
            _ => unreachable!("{operand:?} is not a memory operand"),
        }
    }

    /// Decodes an absolute program address.
    pub fn address(self, operand: Operand) -> u32 {
        match operand {
            Operand::Address16 => self.extra as u32,
            Operand::Address18(p) => self.extra as u32 | ((self.field(p, 2) as u32) << 16),
            _ => unreachable!("{operand:?} is not an address operand"),
        }
    }

    /// Decodes a relative branch offset.
    pub fn rel(self, operand: Operand) -> u16 {
        match operand {
            Operand::RelAddr7(p) => util::sign_extend16::<7>(self.field(p, 7)),
            _ => unreachable!("{operand:?} is not a relative address operand"),
        }
    }

    pub fn cond(self, operand: Operand) -> Cond {
        match operand {
            Operand::Cond(p) => COND[self.index(p, 4)],
            _ => unreachable!("{operand:?} is not a condition operand"),
        }
    }

    /// Decodes an `alm`/`alu` operation. Reserved `alu` encodings decode to `None`.
    pub fn alm(self, operand: Operand) -> Option<AlmOp> {
        match operand {
            Operand::Alm(p) => Some(ALM[self.index(p, 4)]),
            Operand::Alu(p) => ALU[self.index(p, 3)],
            Operand::FixedAlm(n) => Some(ALM[n as usize]),
            _ => unreachable!("{operand:?} is not an alm operand"),
        }
    }

    pub fn alb(self, operand: Operand) -> AlbOp {
        match operand {
            Operand::Alb(p) => ALB[self.index(p, 3)],
            Operand::FixedAlb(n) => ALB[n as usize],
            _ => unreachable!("{operand:?} is not an alb operand"),
        }
    }

    pub fn mul(self, operand: Operand) -> MulOp {
        match operand {
            Operand::Mul3(p) => MUL3[self.index(p, 3)],
            Operand::Mul2(p) => MUL2[self.index(p, 2)],
            _ => unreachable!("{operand:?} is not a multiply operand"),
        }
    }

    /// Decodes a modify-accumulator operation. The reserved `moda4` encoding decodes to `None`.
    pub fn moda(self, operand: Operand) -> Option<ModaOp> {
        match operand {
            Operand::Moda4(p) => MODA4[self.index(p, 4)],
            Operand::Moda3(p) => Some(MODA3[self.index(p, 3)]),
            _ => unreachable!("{operand:?} is not a moda operand"),
        }
    }

    pub fn swap_type(self, operand: Operand) -> Option<SwapType> {
        match operand {
            Operand::SwapType(p) => SWAP[self.index(p, 4)],
            _ => unreachable!("{operand:?} is not a swap operand"),
        }
    }

    pub fn bank_flags(self, operand: Operand) -> BankFlags {
        match operand {
            Operand::BankFlags(p) => BankFlags::from_bits(self.field(p, 6) as u8),
            _ => unreachable!("{operand:?} is not a bank flags operand"),
        }
    }

    /// Decodes a product sum descriptor into its base and the operation applied to each product.
    pub fn sum(self, operand: Operand) -> (SumBase, SumOp, SumOp) {
        match operand {
            Operand::Sum(base, p0, p1) => (base, p0, p1),
            _ => unreachable!("{operand:?} is not a product sum operand"),
        }
    }

    /// Decodes the signedness of `x0`, `y0`, `x1` and `y1`, in this order.
    pub fn signs(self, operand: Operand) -> [bool; 4] {
        match operand {
            Operand::Signs(x0, y0, x1, y1) => {
                [x0.is_signed(), y0.is_signed(), x1.is_signed(), y1.is_signed()]
            }
            _ => unreachable!("{operand:?} is not a signs operand"),
        }
    }

    /// Decodes whether modulo addressing is disabled for the `i` and `j` units.
    pub fn dmod(self, operand: Operand) -> (bool, bool) {
        match operand {
            Operand::Modulo(i, j) => (i == ModMode::Dmod, j == ModMode::Dmod),
            _ => unreachable!("{operand:?} is not a modulo operand"),
        }
    }

    pub fn cbs_cond(self, operand: Operand) -> CbsCond {
        match operand {
            Operand::CbsCond(p) => [CbsCond::Ge, CbsCond::Gt][self.index(p, 1)],
            _ => unreachable!("{operand:?} is not a codebook search condition"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::VariantArray;

    #[test]
    fn unique_opcodes() {
        for value in 0..=u16::MAX {
            let mut hit = None;
            for opcode in Opcode::VARIANTS {
                if opcode.info().is_some_and(|i| i.matches(value)) {
                    if let Some(hit) = hit {
                        panic!("opcodes {hit:?} and {opcode:?} are valid for {value:016b}");
                    }

                    hit = Some(*opcode);
                }
            }
        }
    }

    #[test]
    fn lut_agrees_with_matcher() {
        for value in (0..=u16::MAX).step_by(7) {
            let decoded = Ins::new(value).decoded();
            assert_eq!(decoded.opcode, Opcode::find_match(value));
            assert_eq!(decoded.needs_extra, decoded.opcode.needs_extra());
        }
    }

    #[test]
    fn known_encodings() {
        assert_eq!(Ins::new(0x0000).decoded().opcode, Opcode::Nop);
        assert_eq!(Ins::new(0x5F40).decoded().opcode, Opcode::PushImm);
        assert!(Ins::new(0x5F40).decoded().needs_extra);
        assert_eq!(Ins::new(0x5F40).decoded().len(), 2);

        // brr with offset -1 and condition true
        let ins = Ins::new(0b0101_0111_1111_0000);
        assert_eq!(ins.decoded().opcode, Opcode::Brr);
        let ops = ins.operands();
        assert_eq!(ins.rel(ops[0]), 0xFFFF);
        assert_eq!(ins.cond(ops[1]), Cond::True);
    }

    #[test]
    fn register_operands() {
        // mov r3, a1h (MovRegReg: src register at 0, dst register at 5)
        let ins = Ins::new(0b0101_1011_1010_0011);
        assert_eq!(ins.decoded().opcode, Opcode::MovRegReg);
        let ops = ins.operands();
        assert_eq!(ins.reg(ops[0]), RegName::R3);
        assert_eq!(ins.reg(ops[1]), RegName::A1h);
    }

    #[test]
    fn indirect_operands() {
        // mov [r5--], a0l (MovRnReg)
        let ins = Ins::new(0b0001_1111_0101_0101);
        assert_eq!(ins.decoded().opcode, Opcode::MovRnReg);
        let ops = ins.operands();
        assert_eq!(ins.unit(ops[0]), 5);
        assert_eq!(ins.step(ops[1]), Step::Decrease);
        assert_eq!(ins.reg(ops[2]), RegName::A0l);
    }

    #[test]
    fn signed_immediates() {
        // mov_sv -1
        let ins = Ins::new(0x05FF);
        assert_eq!(ins.decoded().opcode, Opcode::MovSvImm8s);
        assert_eq!(ins.imm(ins.operands()[0]), 0xFFFF);

        // load_stepi 0x3F
        let ins = Ins::new(0b1101_1011_1011_1111);
        assert_eq!(ins.decoded().opcode, Opcode::LoadStepi);
        assert_eq!(ins.imm(ins.operands()[0]), 0x003F);
    }

    #[test]
    fn long_addresses() {
        // br 0x2ABCD, always
        let ins = Ins::with_extra(0b0100_0001_1010_0000, 0xABCD);
        assert_eq!(ins.decoded().opcode, Opcode::Br);
        assert_eq!(ins.address(ins.operands()[0]), 0x2ABCD);
    }

    #[test]
    fn memory_operands() {
        let ins = Ins::new(0b1101_1000_1111_1111);
        assert_eq!(ins.decoded().opcode, Opcode::MovR7ShortAx);
        assert_eq!(ins.mem(ins.operands()[0]), Mem::R7Imm7s(0xFFFF));
    }
}
