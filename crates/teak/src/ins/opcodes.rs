//! Encodings of every Teak instruction.
//!
//! Each entry maps a bit pattern (`x` marks operand bits) to an opcode, the mnemonic used when
//! disassembling and the layout of its operands. Patterns listed under `except` are carved out of
//! an entry and belong to another opcode (or to none).

use strum::VariantArray;

/// Base value of a product sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumBase {
    Zero,
    Acc,
    Sv,
    SvRnd,
}

/// How a product register takes part in a product sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumOp {
    Add,
    AddAligned,
    Sub,
    SubAligned,
}

impl SumOp {
    pub const fn is_sub(self) -> bool {
        matches!(self, Self::Sub | Self::SubAligned)
    }

    pub const fn is_aligned(self) -> bool {
        matches!(self, Self::AddAligned | Self::SubAligned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Signed,
    Unsigned,
}

impl Sign {
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Signed)
    }
}

/// Whether modulo addressing applies to an address register update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModMode {
    Emod,
    Dmod,
}

/// Layout of a single operand inside an instruction. The number is the position of the lowest
/// bit of the field in the base word. Fields without a position live in the expansion word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Ax(u8),
    Axl(u8),
    Axh(u8),
    Bx(u8),
    Bxl(u8),
    Bxh(u8),
    Px(u8),
    Ab(u8),
    Abl(u8),
    Abh(u8),
    Abe(u8),
    Ablh(u8),
    RnOld(u8),
    Rn(u8),
    R45(u8),
    R0123(u8),
    Register(u8),
    ArArpSttMod(u8),
    ArArp(u8),
    SttMod(u8),
    Ar(u8),
    Arp(u8),
    SwapType(u8),
    StepZids(u8),
    ArRn1(u8),
    ArRn2(u8),
    ArStep1(u8),
    ArStep1Alt(u8),
    ArStep2(u8),
    ArpRn1(u8),
    ArpRn2(u8),
    ArpStep1(u8),
    ArpStep2(u8),
    /// Low 16 bits in the expansion word, high 2 bits in the base word.
    Address18(u8),
    Address16,
    RelAddr7(u8),
    Imm2(u8),
    Imm4(u8),
    Imm5(u8),
    Imm5s(u8),
    Imm6s(u8),
    Imm7s(u8),
    Imm8(u8),
    Imm8s(u8),
    Imm9(u8),
    Imm16,
    MemImm8(u8),
    MemImm16,
    MemR7Imm7s(u8),
    MemR7Imm16,
    Alm(u8),
    Alu(u8),
    Alb(u8),
    Mul3(u8),
    Mul2(u8),
    Moda4(u8),
    Moda3(u8),
    Cond(u8),
    BankFlags(u8),
    CbsCond(u8),
    FixedAlm(u8),
    FixedAlb(u8),
    FixedAx(u8),
    FixedBx(u8),
    Sum(SumBase, SumOp, SumOp),
    Signs(Sign, Sign, Sign, Sign),
    Modulo(ModMode, ModMode),
}

impl Operand {
    /// Whether this operand is read from the expansion word.
    pub const fn is_extra(self) -> bool {
        matches!(
            self,
            Self::Address18(_) | Self::Address16 | Self::Imm16 | Self::MemImm16 | Self::MemR7Imm16
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub mask: u16,
    pub target: u16,
    pub except: &'static [&'static str],
}

impl OpcodeInfo {
    const fn pattern(pattern: &str) -> (u16, u16) {
        let bytes = pattern.as_bytes();
        let mut mask = 0;
        let mut target = 0;

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'0' => {
                    mask = (mask << 1) | 1;
                    target <<= 1;
                }
                b'1' => {
                    mask = (mask << 1) | 1;
                    target = (target << 1) | 1;
                }
                b'x' => {
                    mask <<= 1;
                    target <<= 1;
                }
                _ => (),
            }

            i += 1;
        }

        (mask, target)
    }

    pub const fn parse(pattern: &str, except: &'static [&'static str]) -> Self {
        let (mask, target) = Self::pattern(pattern);
        Self {
            mask,
            target,
            except,
        }
    }

    pub fn matches(&self, value: u16) -> bool {
        value & self.mask == self.target
            && !self.except.iter().any(|e| {
                let (mask, target) = Self::pattern(e);
                value & mask == target
            })
    }
}

macro_rules! opcode {
    ($(
        $name:ident = $mnemonic:literal: $pattern:literal
        $(except [$($except:literal),*])?
        [$($operand:expr),*]
    ),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, VariantArray)]
        pub enum Opcode {
            $($name,)*
            Illegal,
        }

        impl Opcode {
            pub const fn info(self) -> Option<OpcodeInfo> {
                match self {
                    $(Self::$name => Some(const { OpcodeInfo::parse($pattern, &[$($($except),*)?]) }),)*
                    Self::Illegal => None,
                }
            }

            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$name => $mnemonic,)*
                    Self::Illegal => "undefined",
                }
            }

            pub const fn operands(self) -> &'static [Operand] {
                match self {
                    $(Self::$name => &[$($operand),*],)*
                    Self::Illegal => &[],
                }
            }
        }
    };
}

impl Opcode {
    pub fn find_match(base: u16) -> Self {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|op| op.info().is_some_and(|i| i.matches(base)))
            .unwrap_or(Self::Illegal)
    }

    /// Whether the instruction is followed by an expansion word.
    pub fn needs_extra(self) -> bool {
        self.operands().iter().any(|o| o.is_extra())
    }
}

use ModMode::{Dmod, Emod};
use Operand::*;
use Sign::{Signed, Unsigned};
use SumBase::{Acc, Sv, SvRnd, Zero};
use SumOp::{Add, AddAligned, Sub, SubAligned};

opcode! {
    Nop = "nop": "0000_0000_0000_0000" [],
    Norm = "norm": "1001_010x_110x_xxxx" [Ax(8), Rn(0), StepZids(3)],
    Swap = "swap": "0100_1001_1000_xxxx" [SwapType(0)],
    Trap = "trap": "0000_0000_0010_0000" [],
    AlmPage = "alm": "101x_xxxx_xxxx_xxxx" [Alm(9), MemImm8(0), Ax(8)],
    AlmRn = "alm": "100x_xxxx_100x_xxxx" [Alm(9), Rn(0), StepZids(3), Ax(8)],
    AlmReg = "alm": "100x_xxxx_101x_xxxx" [Alm(9), Register(0), Ax(8)],
    AlmR6Or = "alm_r6": "1101_0011_100x_1000" [FixedAlm(0), Ax(4)],
    AlmR6And = "alm_r6": "1101_0011_100x_1001" [FixedAlm(1), Ax(4)],
    AlmR6Xor = "alm_r6": "1101_0011_100x_1010" [FixedAlm(2), Ax(4)],
    AlmR6Add = "alm_r6": "1101_0011_100x_1011" [FixedAlm(3), Ax(4)],
    AlmR6Tst0 = "alm_r6": "1101_0011_100x_1100" [FixedAlm(4), Ax(4)],
    AlmR6Tst1 = "alm_r6": "1101_0011_100x_1101" [FixedAlm(5), Ax(4)],
    AlmR6Cmp = "alm_r6": "1101_0011_100x_1110" [FixedAlm(6), Ax(4)],
    AlmR6Sub = "alm_r6": "1101_0011_100x_1111" [FixedAlm(7), Ax(4)],
    AlmR6Msu = "alm_r6": "1001_0100_0110_001x" [FixedAlm(8), Ax(0)],
    AlmR6Addh = "alm_r6": "1001_0100_0110_010x" [FixedAlm(9), Ax(0)],
    AlmR6Addl = "alm_r6": "1001_0100_0110_011x" [FixedAlm(10), Ax(0)],
    AlmR6Subh = "alm_r6": "0101_111x_0010_0011" [FixedAlm(11), Ax(8)],
    AlmR6Subl = "alm_r6": "0101_111x_0010_0010" [FixedAlm(12), Ax(8)],
    AlmR6Sqr = "alm_r6": "0101_1111_0100_0001" [FixedAlm(13), FixedAx(0)],
    AlmR6Sqra = "alm_r6": "1001_000x_0110_001x" [FixedAlm(14), Ax(8)],
    AlmR6Cmpu = "alm_r6": "1000_1010_0110_x011" [FixedAlm(15), Ax(3)],
    AluMem = "alu": "1101_010x_1111_1xxx" except ["1101_010x_1111_1100", "1101_010x_1111_1101"] [Alu(0), MemImm16, Ax(8)],
    AluR7Mem = "alu": "1101_010x_1101_1xxx" except ["1101_010x_1101_1100", "1101_010x_1101_1101"] [Alu(0), MemR7Imm16, Ax(8)],
    AluImm = "alu": "1000_xxxx_1100_0000" except ["1000_100x_1100_0000", "1000_101x_1100_0000"] [Alu(9), Imm16, Ax(8)],
    AluImm8 = "alu": "1100_xxxx_xxxx_xxxx" except ["1100_100x_xxxx_xxxx", "1100_101x_xxxx_xxxx"] [Alu(9), Imm8(0), Ax(8)],
    AluR7Short = "alu": "0100_xxxx_0xxx_xxxx" except ["0100_100x_0xxx_xxxx", "0100_101x_0xxx_xxxx"] [Alu(9), MemR7Imm7s(0), Ax(8)],
    OrAbAx = "or": "1101_xx10_1xx1_0001" [Ab(10), Ax(6), Ax(5)],
    OrAxBx = "or": "1101_010x_1010_01xx" [Ax(8), Bx(1), Ax(0)],
    OrBxBx = "or": "1101_0x11_1100_01xx" [Bx(10), Bx(1), Ax(0)],
    AlbPage = "alb": "1110_xxx1_xxxx_xxxx" [Alb(9), Imm16, MemImm8(0)],
    AlbRn = "alb": "1000_xxx0_111x_xxxx" [Alb(9), Imm16, Rn(0), StepZids(3)],
    AlbReg = "alb": "1000_xxx1_111x_xxxx" [Alb(9), Imm16, Register(0)],
    AlbR6 = "alb_r6": "0100_0111_1011_1xxx" [Alb(0), Imm16],
    AlbSttModSet = "alb": "0100_0011_1100_1xxx" [FixedAlb(0), Imm16, SttMod(0)],
    AlbSttModRst = "alb": "0100_0011_1000_1xxx" [FixedAlb(1), Imm16, SttMod(0)],
    AlbSttModChng = "alb": "0000_0000_0011_1xxx" [FixedAlb(2), Imm16, SttMod(0)],
    AlbSttModTst0 = "alb": "1001_0100_0111_0xxx" [FixedAlb(4), Imm16, SttMod(0)],
    AlbSttModTst1 = "alb": "1001_0100_0111_1xxx" [FixedAlb(5), Imm16, SttMod(0)],
    AddAbBx = "add": "1101_xx10_1101_101x" [Ab(10), Bx(0)],
    AddBxAx = "add": "0101_1101_1111_00xx" [Bx(1), Ax(0)],
    AddP1 = "add_p1": "1101_0111_1000_001x" [Ax(0)],
    AddPx = "add": "0101_1101_1111_10xx" [Px(1), Bx(0)],
    SubAbBx = "sub": "1000_101x_011x_x001" [Ab(3), Bx(8)],
    SubBxAx = "sub": "1000_1000_011x_x001" [Bx(4), Ax(3)],
    SubP1 = "sub_p1": "1101_010x_1011_1001" [Ax(8)],
    SubPx = "sub": "1000_1111_1101_00xx" [Px(1), Bx(0)],
    App0 = "app": "0101_1101_1100_xx00" [Ab(2), Sum(Zero, Add, Add)],
    App1 = "app": "0101_1101_1100_xx01" [Ab(2), Sum(Zero, Add, AddAligned)],
    App2 = "app": "0100_0101_1001_xx00" [Ab(2), Sum(Acc, Add, Add)],
    App3 = "app": "0100_0101_1001_xx10" [Ab(2), Sum(Acc, Add, AddAligned)],
    App4 = "app": "0100_0101_1001_xx11" [Ab(2), Sum(Acc, AddAligned, AddAligned)],
    App5 = "app": "0101_1101_1100_xx10" [Ab(2), Sum(Zero, Add, Sub)],
    App6 = "app": "0101_1101_1100_xx11" [Ab(2), Sum(Zero, Add, SubAligned)],
    App7 = "app": "1000_xx00_1100_0110" [Ab(10), Sum(Acc, Sub, Sub)],
    App8 = "app": "1000_xx10_1100_0110" [Ab(10), Sum(Acc, Sub, SubAligned)],
    App9 = "app": "1000_xx11_1100_0110" [Ab(10), Sum(Acc, SubAligned, SubAligned)],
    App10 = "app": "1001_0000_0110_11xx" [Ab(0), Sum(Acc, Add, Sub)],
    App11 = "app": "0100_1001_11xx_0010" [Ab(4), Sum(Acc, Sub, Add)],
    App12 = "app": "1001_0001_0110_11xx" [Ab(0), Sum(Acc, Add, SubAligned)],
    App13 = "app": "0100_1001_11xx_0011" [Ab(4), Sum(Acc, Sub, AddAligned)],
    AddAdd = "add_add": "0110_1111_100x_xxxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Ab(3)],
    AddSub = "add_sub": "0110_1111_101x_xxxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Ab(3)],
    SubAdd = "sub_add": "0110_1111_110x_xxxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Ab(3)],
    SubSub = "sub_sub": "0110_1111_111x_xxxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Ab(3)],
    AddSubSv = "add_sub_sv": "0101_1101_1011_xxxx" [ArRn1(1), ArStep1(0), Ab(2)],
    SubAddSv = "sub_add_sv": "0101_1101_1110_xxxx" [ArRn1(1), ArStep1(0), Ab(2)],
    SubAddIMovJSv = "sub_add_i_mov_j_sv": "1000_000x_011x_x1xx" [ArpRn1(8), ArpStep1(0), ArpStep1(1), Ab(3)],
    SubAddJMovISv = "sub_add_j_mov_i_sv": "0101_1101_100x_xxxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Ab(3)],
    AddSubIMovJ = "add_sub_i_mov_j": "1001_000x_0111_xxxx" [ArpRn1(8), ArpStep1(0), ArpStep1(1), Ab(2)],
    AddSubJMovI = "add_sub_j_mov_i": "0101_111x_0011_xxxx" [ArpRn1(8), ArpStep1(0), ArpStep1(1), Ab(2)],
    MulRnImm = "mul": "1000_xxxx_000x_xxxx" [Mul3(8), Rn(0), StepZids(3), Imm16, Ax(11)],
    MulY0Rn = "mul_y0": "1000_xxxx_001x_xxxx" [Mul3(8), Rn(0), StepZids(3), Ax(11)],
    MulY0Reg = "mul_y0": "1000_xxxx_010x_xxxx" [Mul3(8), Register(0), Ax(11)],
    MulR45R0123 = "mul": "1101_xxxx_0xxx_xxxx" [Mul3(8), R45(2), StepZids(5), R0123(0), StepZids(3), Ax(11)],
    MulY0R6 = "mul_y0_r6": "0101_1110_1010_xxxx" [Mul3(1), Ax(0)],
    MulY0Page = "mul_y0": "1110_xxx0_xxxx_xxxx" [Mul2(9), MemImm8(0), Ax(11)],
    Mpyi = "mpyi": "0000_1000_xxxx_xxxx" [Imm8s(0)],
    MsuR45R0123 = "msu": "1101_000x_1xxx_xxxx" [R45(2), StepZids(5), R0123(0), StepZids(3), Ax(8)],
    MsuRnImm = "msu": "1001_000x_110x_xxxx" [Rn(0), StepZids(3), Imm16, Ax(8)],
    Msusu = "msusu": "1000_001x_011x_x1xx" [ArRn2(3), ArStep2(0), Ax(8)],
    MacX1to0 = "mac_x1to0": "0100_1101_1000_01xx" [Ax(1)],
    Mac1 = "mac1": "0101_111x_0010_1xxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Ax(8)],
    Moda4 = "moda4": "011x_0111_xxxx_xxxx" except ["011x_0111_0111_xxxx"] [Moda4(4), Ax(12), Cond(0)],
    Moda3 = "moda3": "011x_1111_0xxx_xxxx" [Moda3(4), Bx(12), Cond(0)],
    Pacr1 = "pacr1": "1101_0111_1100_001x" [Ax(0)],
    Clr = "clr": "1000_1110_1101_xxxx" [Ab(2), Ab(0)],
    Clrr = "clrr": "1000_1101_1101_xxxx" [Ab(2), Ab(0)],
    BkrepImm8 = "bkrep": "0101_1100_xxxx_xxxx" [Imm8(0), Address16],
    BkrepReg = "bkrep": "0101_1101_0xxx_xxxx" [Register(0), Address18(5)],
    BkrepR6 = "bkrep_r6": "1000_1111_1101_11xx" [Address18(0)],
    Bkreprst = "bkreprst": "1101_1010_1001_11xx" [ArRn2(0)],
    BkreprstMemsp = "bkreprst_memsp": "0101_1111_0100_10xx" [],
    Bkrepsto = "bkrepsto": "1101_1x10_1101_11xx" [ArRn2(0)],
    BkrepstoMemsp = "bkrepsto_memsp": "1001_0100_0110_1xxx" [],
    Banke = "banke": "0100_1011_10xx_xxxx" [BankFlags(0)],
    Bankr = "bankr": "1000_1100_1101_1111" [],
    BankrAr = "bankr": "1000_1100_1101_110x" [Ar(0)],
    BankrArArp = "bankr": "1000_1100_1101_0xxx" [Ar(2), Arp(0)],
    BankrArp = "bankr": "1000_1100_1101_10xx" [Arp(0)],
    Bitrev = "bitrev": "0101_1110_1011_1xxx" [Rn(0)],
    BitrevDbrv = "bitrev_dbrv": "1101_0111_1110_1xxx" [Rn(0)],
    BitrevEbrv = "bitrev_ebrv": "1101_0111_1110_0xxx" [Rn(0)],
    Br = "br": "0100_0001_10xx_xxxx" [Address18(4), Cond(0)],
    Brr = "brr": "0101_0xxx_xxxx_xxxx" [RelAddr7(4), Cond(0)],
    Break = "break": "1101_0011_1100_0000" [],
    Call = "call": "0100_0001_11xx_xxxx" [Address18(4), Cond(0)],
    CallaAxl = "calla": "1101_010x_1000_0000" [Axl(8)],
    CallaAx = "calla": "1101_0011_100x_0001" [Ax(4)],
    Callr = "callr": "0001_0xxx_xxxx_xxxx" [RelAddr7(4), Cond(0)],
    CntxS = "cntx_s": "1101_0011_1000_0000" [],
    CntxR = "cntx_r": "1101_0011_1001_0000" [],
    Ret = "ret": "0100_0101_1000_xxxx" [Cond(0)],
    Retd = "retd": "1101_0111_1000_0000" [],
    Reti = "reti": "0100_0101_1100_xxxx" [Cond(0)],
    Retic = "retic": "0100_0101_1101_xxxx" [Cond(0)],
    Retid = "retid": "1101_0111_1100_0000" [],
    Retidc = "retidc": "1101_0011_1100_0011" [],
    Rets = "rets": "0000_1001_xxxx_xxxx" [Imm8(0)],
    LoadPs = "load_ps": "0100_1101_1000_00xx" [Imm2(0)],
    LoadStepi = "load_stepi": "1101_1011_1xxx_xxxx" [Imm7s(0)],
    LoadStepj = "load_stepj": "1101_1111_1xxx_xxxx" [Imm7s(0)],
    LoadPage = "load_page": "0000_0100_xxxx_xxxx" [Imm8(0)],
    LoadModi = "load_modi": "0000_001x_xxxx_xxxx" [Imm9(0)],
    LoadModj = "load_modj": "0000_101x_xxxx_xxxx" [Imm9(0)],
    LoadMovpd = "load_movpd": "1101_0111_1101_1xxx" [Imm2(1)],
    LoadPs01 = "load_ps01": "0000_0000_0001_xxxx" [Imm4(0)],
    PushImm = "push": "0101_1111_0100_0000" [Imm16],
    PushReg = "push": "0101_1110_010x_xxxx" [Register(0)],
    PushAbe = "push": "1101_0111_1100_1xxx" [Abe(1)],
    PushCfg = "push": "1101_0011_1101_xxxx" [ArArpSttMod(0)],
    PushPrpage = "push_prpage": "1101_0111_1111_11xx" [],
    PushPx = "push": "1101_0111_1000_11xx" [Px(1)],
    PushR6 = "push_r6": "1101_0100_11x1_0111" [],
    PushRepc = "push_repc": "1101_0111_1111_10xx" [],
    PushX0 = "push_x0": "1101_0100_11x1_0100" [],
    PushX1 = "push_x1": "1101_0100_11x1_0101" [],
    PushY1 = "push_y1": "1101_0100_11x1_0110" [],
    PushaAx = "pusha": "0100_0011_1x00_01xx" [Ax(6)],
    PushaBx = "pusha": "1101_0111_1000_10xx" [Bx(1)],
    PopReg = "pop": "0101_1110_011x_xxxx" [Register(0)],
    PopAbe = "pop": "0100_0111_1011_01xx" [Abe(0)],
    PopCfg = "pop": "1000_xxxx_1100_0111" [ArArpSttMod(8)],
    PopBx = "pop": "0000_0000_00x0_011x" [Bx(5)],
    PopPrpage = "pop_prpage": "1101_0111_1111_01xx" [],
    PopPx = "pop": "1101_0100_1001_011x" [Px(0)],
    PopR6 = "pop_r6": "0000_0000_0010_010x" [],
    PopRepc = "pop_repc": "1101_0111_1111_00xx" [],
    PopX0 = "pop_x0": "1101_0100_1001_0100" [],
    PopX1 = "pop_x1": "1101_0100_1001_0101" [],
    PopY1 = "pop_y1": "0000_0000_0000_010x" [],
    Popa = "popa": "0100_0111_1011_00xx" [Ab(0)],
    RepImm8 = "rep": "0000_1100_xxxx_xxxx" [Imm8(0)],
    RepReg = "rep": "0000_1101_000x_xxxx" [Register(0)],
    RepR6 = "rep_r6": "0000_0000_0000_001x" [],
    Shfc = "shfc": "1101_xx10_1xx0_xxxx" [Ab(10), Ab(5), Cond(0)],
    Shfi = "shfi": "1001_xx1x_x1xx_xxxx" [Ab(10), Ab(7), Imm6s(0)],
    Tst4b = "tst4b": "1000_xxxx_1100_0001" [ArRn2(10), ArStep2(8)],
    Tst4bAx = "tst4b": "0100_0111_100x_xxxx" [ArRn2(2), ArStep2(0), Ax(4)],
    TstbPage = "tstb": "1111_xxxx_xxxx_xxxx" [MemImm8(0), Imm4(8)],
    TstbRn = "tstb": "1001_xxxx_001x_xxxx" [Rn(0), StepZids(3), Imm4(8)],
    TstbReg = "tstb": "1001_xxxx_000x_xxxx" except ["1001_xxxx_0001_1000"] [Register(0), Imm4(8)],
    TstbR6 = "tstb_r6": "1001_xxxx_0001_1000" [Imm4(8)],
    TstbSttMod = "tstb": "0000_0000_0010_1xxx" [SttMod(0), Imm16],
    And = "and": "011x_0111_0111_xxxx" [Ab(2), Ab(0), Ax(12)],
    Dint = "dint": "0100_0011_1100_0000" [],
    Eint = "eint": "0100_0011_1000_0000" [],
    ExpBx = "exp": "1001_0100_0110_000x" [Bx(0)],
    ExpBxAx = "exp": "1001_000x_0110_000x" [Bx(0), Ax(8)],
    ExpRn = "exp": "1001_1100_010x_xxxx" [Rn(0), StepZids(3)],
    ExpRnAx = "exp": "1001_100x_010x_xxxx" [Rn(0), StepZids(3), Ax(8)],
    ExpReg = "exp": "1001_0100_010x_xxxx" [Register(0)],
    ExpRegAx = "exp": "1001_000x_010x_xxxx" [Register(0), Ax(8)],
    ExpR6 = "exp_r6": "1101_0111_1100_0001" [],
    ExpR6Ax = "exp_r6": "1101_0011_100x_0010" [Ax(4)],
    Modr = "modr": "0000_0000_100x_xxxx" [Rn(0), StepZids(3)],
    ModrDmod = "modr_dmod": "0000_0000_101x_xxxx" [Rn(0), StepZids(3)],
    ModrI2 = "modr_i2": "0100_1001_1001_0xxx" [Rn(0)],
    ModrI2Dmod = "modr_i2_dmod": "0100_1001_1001_1xxx" [Rn(0)],
    ModrD2 = "modr_d2": "0101_1101_1010_0xxx" [Rn(0)],
    ModrD2Dmod = "modr_d2_dmod": "0101_1101_1010_1xxx" [Rn(0)],
    ModrEemod = "modr_eemod": "1101_xx10_1xx1_01xx" [ArpRn2(10), ArpStep2(0), ArpStep2(5)],
    ModrEdmod = "modr_edmod": "0000_1101_1xxx_xxx0" [ArpRn2(5), ArpStep2(1), ArpStep2(3)],
    ModrDemod = "modr_demod": "1000_01xx_011x_x1xx" [ArpRn2(8), ArpStep2(0), ArpStep2(3)],
    ModrDdmod = "modr_ddmod": "0000_1101_1xxx_xxx1" [ArpRn2(5), ArpStep2(1), ArpStep2(3)],
    MovAbAb = "mov": "1101_xx10_1xx1_0000" [Ab(10), Ab(5)],
    MovDvm = "mov_dvm": "1101_xx10_1001_1000" [Abl(10)],
    MovX0 = "mov_x0": "1101_xx10_1101_1000" [Abl(10)],
    MovX1 = "mov_x1": "1101_0011_1001_01xx" [Abl(0)],
    MovY1 = "mov_y1": "1101_0011_1000_01xx" [Abl(0)],
    MovAblhPage = "mov": "0011_xxx0_xxxx_xxxx" [Ablh(9), MemImm8(0)],
    MovAxlMem = "mov": "1101_010x_1011_1100" [Axl(8), MemImm16],
    MovAxlR7Mem = "mov": "1101_010x_1001_1100" [Axl(8), MemR7Imm16],
    MovAxlR7Short = "mov": "1101_110x_1xxx_xxxx" [Axl(8), MemR7Imm7s(0)],
    MovMemAx = "mov": "1101_010x_1011_1000" [MemImm16, Ax(8)],
    MovPageAb = "mov": "011x_x001_xxxx_xxxx" [MemImm8(0), Ab(11)],
    MovPageAblh = "mov": "011x_xx10_xxxx_xxxx" [MemImm8(0), Ablh(10)],
    MovEu = "mov_eu": "011x_0101_xxxx_xxxx" [MemImm8(0), Axh(12)],
    MovPageRnOld = "mov": "011x_xx00_xxxx_xxxx" [MemImm8(0), RnOld(10)],
    MovSvPage = "mov_sv": "0110_1101_xxxx_xxxx" [MemImm8(0)],
    MovDvmTo = "mov_dvm_to": "1101_0100_1xx1_0001" [Ab(5)],
    MovIcrTo = "mov_icr_to": "1101_0100_1xx1_0010" [Ab(5)],
    MovImmBx = "mov": "0101_111x_0010_0000" [Imm16, Bx(8)],
    MovImmReg = "mov": "0101_1110_000x_xxxx" [Imm16, Register(0)],
    MovIcrImm5 = "mov_icr": "0100_1111_100x_xxxx" [Imm5(0)],
    MovImm8sAxh = "mov": "001x_0101_xxxx_xxxx" [Imm8s(0), Axh(12)],
    MovExt0 = "mov_ext0": "0010_1001_xxxx_xxxx" [Imm8s(0)],
    MovExt1 = "mov_ext1": "0010_1101_xxxx_xxxx" [Imm8s(0)],
    MovExt2 = "mov_ext2": "0011_1001_xxxx_xxxx" [Imm8s(0)],
    MovExt3 = "mov_ext3": "0011_1101_xxxx_xxxx" [Imm8s(0)],
    MovImm8sRnOld = "mov": "001x_xx11_xxxx_xxxx" [Imm8s(0), RnOld(10)],
    MovSvImm8s = "mov_sv": "0000_0101_xxxx_xxxx" [Imm8s(0)],
    MovImm8Axl = "mov": "001x_0001_xxxx_xxxx" [Imm8(0), Axl(12)],
    MovR7MemAx = "mov": "1101_010x_1001_1000" [MemR7Imm16, Ax(8)],
    MovR7ShortAx = "mov": "1101_100x_1xxx_xxxx" [MemR7Imm7s(0), Ax(8)],
    MovRnBx = "mov": "1001_100x_110x_xxxx" [Rn(0), StepZids(3), Bx(8)],
    MovRnReg = "mov": "0001_11xx_xxxx_xxxx" [Rn(0), StepZids(3), Register(5)],
    MovMemspTo = "mov_memsp_to": "0100_0111_111x_xxxx" [Register(0)],
    MovMixpToReg = "mov_mixp_to": "0100_0111_110x_xxxx" [Register(0)],
    MovRnOldPage = "mov": "0010_xxx0_xxxx_xxxx" [RnOld(9), MemImm8(0)],
    MovIcrReg = "mov_icr": "0100_1111_110x_xxxx" [Register(0)],
    MovMixp = "mov_mixp": "0101_1110_100x_xxxx" [Register(0)],
    MovRegRn = "mov": "0001_10xx_xxxx_xxxx" except ["0001_1011_000x_xxxx", "0001_1011_001x_xxxx"] [Register(5), Rn(0), StepZids(3)],
    MovRegBx = "mov": "0101_1110_11xx_xxxx" [Register(0), Bx(5)],
    MovRegReg = "mov": "0101_10xx_xxxx_xxxx" except ["0101_10xx_xxx1_1000", "0101_10xx_xxx1_1001"] [Register(0), Register(5)],
    MovRepcToAb = "mov_repc_to": "1101_0100_1xx1_0000" [Ab(5)],
    MovSvTo = "mov_sv_to": "0111_1101_xxxx_xxxx" [MemImm8(0)],
    MovX0To = "mov_x0_to": "1101_0100_1xx1_0011" [Ab(5)],
    MovX1To = "mov_x1_to": "0100_1001_11xx_0001" [Ab(4)],
    MovY1To = "mov_y1_to": "1101_xx10_1001_1001" [Ab(10)],
    MovImmArArp = "mov": "0000_0000_0000_1xxx" [Imm16, ArArp(0)],
    MovR6Imm = "mov_r6": "0000_0000_0010_0011" [Imm16],
    MovRepcImm = "mov_repc": "0000_0000_0000_0001" [Imm16],
    MovStepi0 = "mov_stepi0": "1000_1001_0111_0001" [Imm16],
    MovStepj0 = "mov_stepj0": "1000_1001_0111_1001" [Imm16],
    MovImmSttMod = "mov": "0000_0000_0011_0xxx" [Imm16, SttMod(0)],
    MovPrpageImm4 = "mov_prpage": "0101_1101_1101_xxxx" [Imm4(0)],
    Movd = "movd": "0101_1111_1xxx_xxxx" [R0123(0), StepZids(3), R45(2), StepZids(5)],
    MovpAxlReg = "movp": "0000_0000_01xx_xxxx" [Axl(5), Register(0)],
    MovpAxReg = "movp": "0000_1101_01xx_xxxx" [Ax(5), Register(0)],
    MovpRnR0123 = "movp": "0000_011x_xxxx_xxxx" [Rn(0), StepZids(3), R0123(5), StepZids(7)],
    Movpdw = "movpdw": "1101_010x_1001_1001" [Ax(8)],
    MovA0hStepi0 = "mov_a0h_stepi0": "1101_0100_1001_1011" [],
    MovA0hStepj0 = "mov_a0h_stepj0": "1101_0101_1001_1011" [],
    MovStepi0A0h = "mov_stepi0_a0h": "1101_0100_1000_0010" [],
    MovStepj0A0h = "mov_stepj0_a0h": "1101_0101_1000_0010" [],
    MovPrpageAbl = "mov_prpage": "1001_0001_0110_01xx" [Abl(0)],
    MovRepcAbl = "mov_repc": "1001_0000_0110_01xx" [Abl(0)],
    MovAblArArp = "mov": "1001_0101_010x_xxxx" [Abl(3), ArArp(0)],
    MovAblSttMod = "mov": "1001_1100_011x_xxxx" [Abl(3), SttMod(0)],
    MovPrpageTo = "mov_prpage_to": "0101_1110_1011_00xx" [Abl(0)],
    MovRepcToAbl = "mov_repc_to": "1101_xx10_1101_1001" [Abl(10)],
    MovArArpAbl = "mov": "1001_0101_011x_xxxx" [ArArp(0), Abl(3)],
    MovSttModAbl = "mov": "1101_xx10_1111_1xxx" [SttMod(0), Abl(10)],
    MovRepcToAr = "mov_repc_to": "1101_0111_1101_00xx" [ArRn1(1), ArStep1(0)],
    MovArArpToAr = "mov": "1101_010x_10x0_1xxx" [ArArp(0), ArRn1(8), ArStep1(5)],
    MovSttModToAr = "mov": "0100_1001_101x_xxxx" [SttMod(0), ArRn1(4), ArStep1(3)],
    MovRepcAr = "mov_repc": "1101_0111_1101_01xx" [ArRn1(1), ArStep1(0)],
    MovArToArArp = "mov": "1000_0xxx_011x_x010" [ArRn1(4), ArStep1(3), ArArp(8)],
    MovArToSttMod = "mov": "1000_0xxx_011x_x011" [ArRn1(4), ArStep1(3), SttMod(8)],
    MovRepcToR7Mem = "mov_repc_to": "1101_0011_1100_1xxx" [MemR7Imm16],
    MovCfgR7Mem = "mov": "0101_1111_0101_xxxx" [ArArpSttMod(0), MemR7Imm16],
    MovRepcR7Mem = "mov_repc": "1101_0x10_1101_11xx" [MemR7Imm16],
    MovR7MemCfg = "mov": "0100_1101_1001_xxxx" [MemR7Imm16, ArArpSttMod(0)],
    MovPcAx = "mov_pc": "1000_100x_0110_1011" [Ax(8)],
    MovPcBx = "mov_pc": "1000_100x_0110_0011" [Bx(8)],
    MovMixpToBx = "mov_mixp_to": "1000_1010_0111_x011" [Bx(3)],
    MovMixpR6 = "mov_mixp_r6": "0100_0011_1000_0001" [],
    MovP0hToBx = "mov_p0h_to": "0100_0011_1000_001x" [Bx(0)],
    MovP0hR6 = "mov_p0h_r6": "1101_0011_1100_0010" [],
    MovP0hToReg = "mov_p0h_to": "0100_1011_011x_xxxx" [Register(0)],
    MovP0 = "mov_p0": "1000_1111_1101_01xx" [Ab(0)],
    MovP1To = "mov_p1_to": "1000_1111_1101_10xx" [Ab(0)],
    Mov2PxMem = "mov2": "1000_10xx_1101_xxx0" [Px(1), ArRn2(8), ArStep2(2)],
    Mov2s = "mov2s": "1000_10xx_1101_xxx1" [Px(1), ArRn2(8), ArStep2(2)],
    Mov2MemPx = "mov2": "1101_xx10_1xx1_001x" [ArRn2(10), ArStep2(5), Px(0)],
    MovaAbMem = "mova": "0100_1101_11xx_xxxx" [Ab(4), ArRn2(2), ArStep2(0)],
    MovaMemAb = "mova": "0100_1011_11xx_xxxx" [ArRn2(2), ArStep2(0), Ab(4)],
    MovR6ToBx = "mov_r6_to": "1101_010x_1000_0001" [Bx(8)],
    MovR6Mixp = "mov_r6_mixp": "0100_0011_1100_0001" [],
    MovR6ToReg = "mov_r6_to": "0101_1111_000x_xxxx" [Register(0)],
    MovR6Reg = "mov_r6": "0101_1111_011x_xxxx" [Register(0)],
    MovMemspR6 = "mov_memsp_r6": "1101_0x10_1001_11xx" [],
    MovR6ToRn = "mov_r6_to": "0001_1011_000x_xxxx" [Rn(0), StepZids(3)],
    MovR6Rn = "mov_r6": "0001_1011_001x_xxxx" [Rn(0), StepZids(3)],
    MovsPage = "movs": "011x_x011_xxxx_xxxx" [MemImm8(0), Ab(11)],
    MovsRn = "movs": "0000_0001_1xxx_xxxx" [Rn(0), StepZids(3), Ab(5)],
    MovsReg = "movs": "0000_0001_0xxx_xxxx" [Register(0), Ab(5)],
    MovsR6To = "movs_r6_to": "0101_1111_0100_001x" [Ax(0)],
    Movsi = "movsi": "0100_xxx0_1xxx_xxxx" [RnOld(9), Ab(5), Imm5s(0)],
    Mov2AxhMY0M = "mov2_axh_m_y0_m": "0100_0011_1x01_xxxx" [Axh(6), ArRn2(2), ArStep2(0)],
    Mov2AxMij = "mov2_ax_mij": "0100_0011_101x_xxxx" [Ab(3), ArpRn1(2), ArpStep1(0), ArpStep1(1)],
    Mov2AxMji = "mov2_ax_mji": "0100_0011_111x_xxxx" [Ab(3), ArpRn1(2), ArpStep1(0), ArpStep1(1)],
    Mov2MijAx = "mov2_mij_ax": "1000_xxxx_1100_010x" [ArpRn1(9), ArpStep1(0), ArpStep1(8), Ab(10)],
    Mov2MjiAx = "mov2_mji_ax": "1101_0100_11x0_xxxx" [ArpRn1(5), ArpStep1(0), ArpStep1(1), Ab(2)],
    Mov2AbhM = "mov2_abh_m": "1001_1101_01xx_xxxx" [Abh(4), Abh(2), ArRn1(1), ArStep1(0)],
    ExchangeIaj = "exchange_iaj": "1000_11xx_011x_xxxx" [Axh(4), ArpRn2(8), ArpStep2(0), ArpStep2(2)],
    ExchangeRiaj = "exchange_riaj": "0111_1111_1xxx_xxxx" [Axh(6), ArpRn2(4), ArpStep2(0), ArpStep2(2)],
    ExchangeJai = "exchange_jai": "0100_1001_0xxx_xxxx" [Axh(6), ArpRn2(4), ArpStep2(0), ArpStep2(2)],
    ExchangeRjai = "exchange_rjai": "0100_1000_0xxx_xxxx" [Axh(6), ArpRn2(4), ArpStep2(0), ArpStep2(2)],
    MovrAr = "movr": "1000_10xx_011x_x1xx" [ArRn2(3), ArStep2(0), Abh(8)],
    MovrRnAx = "movr": "1001_110x_111x_xxxx" [Rn(0), StepZids(3), Ax(8)],
    MovrRegAx = "movr": "1001_110x_110x_xxxx" [Register(0), Ax(8)],
    MovrBxAx = "movr": "0101_1101_1111_01xx" [Bx(1), Ax(0)],
    MovrR6To = "movr_r6_to": "1000_1001_0110_x001" [Ax(3)],
    Lim = "lim": "0100_1001_11xx_0000" [Ax(5), Ax(4)],
    Vtrclr0 = "vtrclr0": "0101_1111_0100_0101" [],
    Vtrclr1 = "vtrclr1": "0101_1111_0100_0110" [],
    Vtrclr = "vtrclr": "0101_1111_0100_0111" [],
    Vtrmov0 = "vtrmov0": "1101_0010_1001_101x" [Axl(0)],
    Vtrmov1 = "vtrmov1": "1101_0110_1001_101x" [Axl(0)],
    Vtrmov = "vtrmov": "1101_0011_100x_0011" [Axl(4)],
    Vtrshr = "vtrshr": "1101_0111_1000_0001" [],
    Clrp0 = "clrp0": "0101_1101_1111_1110" [],
    Clrp1 = "clrp1": "0101_1101_1111_1101" [],
    Clrp = "clrp": "0101_1101_1111_1111" [],
    MaxGe = "max_ge": "1000_010x_011x_x000" [Ax(8), StepZids(3)],
    MaxGt = "max_gt": "1000_011x_011x_x000" [Ax(8), StepZids(3)],
    MinLe = "min_le": "1000_100x_011x_x000" [Ax(8), StepZids(3)],
    MinLt = "min_lt": "1000_101x_011x_x000" [Ax(8), StepZids(3)],
    MaxGeR0 = "max_ge_r0": "1000_000x_011x_x000" [Ax(8), StepZids(3)],
    MaxGtR0 = "max_gt_r0": "1000_001x_011x_x000" [Ax(8), StepZids(3)],
    MinLeR0 = "min_le_r0": "0100_0111_1010_x0xx" [Ax(3), StepZids(0)],
    MinLtR0 = "min_lt_r0": "0100_0111_1010_x1xx" [Ax(3), StepZids(0)],
    Divs = "divs": "0000_111x_xxxx_xxxx" [MemImm8(0), Ax(8)],
    SqrSqrAdd3 = "sqr_sqr_add3": "1101_0111_1001_xxxx" [Ab(2), Ab(0)],
    SqrSqrAdd3Mem = "sqr_sqr_add3": "0100_1011_00xx_xxxx" [ArRn2(4), ArStep2(2), Ab(0)],
    SqrMpysuAdd3a = "sqr_mpysu_add3a": "0100_1001_11xx_01xx" [Ab(4), Ab(0)],
    CmpAxBx = "cmp": "0100_1101_1000_11xx" [Ax(1), Bx(0)],
    CmpB0B1 = "cmp_b0_b1": "1101_0100_1000_0011" [],
    CmpB1B0 = "cmp_b1_b0": "1101_0101_1000_0011" [],
    CmpBxAx = "cmp": "1101_1x10_1001_101x" [Bx(10), Ax(0)],
    CmpP1To = "cmp_p1_to": "1000_1011_011x_0011" [Ax(4)],
    Max2Vtr = "max2_vtr": "0101_111x_0010_0001" [Ax(8)],
    Min2Vtr = "min2_vtr": "0100_0011_1100_001x" [Ax(0)],
    Max2VtrBx = "max2_vtr": "1101_0111_1000_01xx" [Ax(1), Bx(0)],
    Min2VtrBx = "min2_vtr": "1101_010x_1011_101x" [Ax(8), Bx(0)],
    Max2VtrMovlAx = "max2_vtr_movl": "0100_1010_010x_x0xx" [Ax(3), Bx(4), ArRn1(1), ArStep1(0)],
    Max2VtrMovhAx = "max2_vtr_movh": "0100_1010_010x_x1xx" [Ax(3), Bx(4), ArRn1(1), ArStep1(0)],
    Max2VtrMovlBx = "max2_vtr_movl": "0100_1010_011x_x0xx" [Bx(4), Ax(3), ArRn1(1), ArStep1(0)],
    Max2VtrMovhBx = "max2_vtr_movh": "0100_1010_011x_x1xx" [Bx(4), Ax(3), ArRn1(1), ArStep1(0)],
    Min2VtrMovlAx = "min2_vtr_movl": "0100_1010_000x_x0xx" [Ax(3), Bx(4), ArRn1(1), ArStep1(0)],
    Min2VtrMovhAx = "min2_vtr_movh": "0100_1010_000x_x1xx" [Ax(3), Bx(4), ArRn1(1), ArStep1(0)],
    Min2VtrMovlBx = "min2_vtr_movl": "0100_1010_001x_x0xx" [Bx(4), Ax(3), ArRn1(1), ArStep1(0)],
    Min2VtrMovhBx = "min2_vtr_movh": "0100_1010_001x_x1xx" [Bx(4), Ax(3), ArRn1(1), ArStep1(0)],
    Max2VtrMovij = "max2_vtr_movij": "1101_0101_1xx1_0xxx" [Ax(6), Bx(5), ArpRn1(2), ArpStep1(0), ArpStep1(1)],
    Max2VtrMovji = "max2_vtr_movji": "0100_0101_101x_xxxx" [Ax(4), Bx(3), ArpRn1(2), ArpStep1(0), ArpStep1(1)],
    Min2VtrMovij = "min2_vtr_movij": "1101_xx10_1011_1xxx" [Ax(11), Bx(10), ArpRn1(2), ArpStep1(0), ArpStep1(1)],
    Min2VtrMovji = "min2_vtr_movji": "0100_0101_111x_xxxx" [Ax(4), Bx(3), ArpRn1(2), ArpStep1(0), ArpStep1(1)],
    MovSvApp0 = "mov_sv_app": "0100_1011_0100_xx0x" [ArRn1(3), ArStep1(2), Bx(0), Sum(Sv, Sub, Add)],
    MovSvApp1 = "mov_sv_app": "1001_1001_011x_xx00" [ArRn1(4), ArStep1Alt(3), Bx(2), Sum(Sv, Sub, Add)],
    MovSvApp2 = "mov_sv_app": "0100_1011_0100_xx1x" [ArRn1(3), ArStep1(2), Bx(0), Sum(SvRnd, Sub, Add)],
    MovSvApp3 = "mov_sv_app": "1001_1001_111x_xx00" [ArRn1(4), ArStep1Alt(3), Bx(2), Sum(SvRnd, Sub, Add)],
    MovSvApp4 = "mov_sv_app": "0101_1111_0100_11xx" [ArRn1(1), ArStep1(0), FixedBx(0), Sum(Sv, Sub, Sub)],
    MovSvApp5 = "mov_sv_app": "1000_100x_0111_x011" [ArRn1(8), ArStep1(3), FixedBx(1), Sum(Sv, Sub, Sub)],
    MovSvApp6 = "mov_sv_app": "1001_1000_011x_xx00" [ArRn1(4), ArStep1Alt(3), Bx(2), Sum(Sv, Sub, Sub)],
    MovSvApp7 = "mov_sv_app": "1101_1110_1001_11xx" [ArRn1(1), ArStep1(0), FixedBx(0), Sum(SvRnd, Sub, Sub)],
    MovSvApp8 = "mov_sv_app": "1101_0100_1011_01xx" [ArRn1(1), ArStep1(0), FixedBx(1), Sum(SvRnd, Sub, Sub)],
    MovSvApp9 = "mov_sv_app": "1001_1000_111x_xx00" [ArRn1(4), ArStep1Alt(3), Bx(2), Sum(SvRnd, Sub, Sub)],
    CbsAxh = "cbs": "1001_000x_0110_100x" [Axh(0), CbsCond(8)],
    CbsAxhBxh = "cbs": "1101_010x_10x1_111x" [Axh(8), Bxh(5), CbsCond(0)],
    CbsArp = "cbs": "1101_0101_1100_xxxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), CbsCond(3)],
    Mma0 = "mma": "0100_1101_1000_10x0" [Ax(1), Signs(Signed, Signed, Signed, Signed), Sum(Zero, Add, Sub)],
    Mma1 = "mma": "1101_0100_10x1_1101" [Bx(5), Signs(Signed, Signed, Signed, Signed), Sum(Zero, Add, Sub)],
    Mma2 = "mma": "0101_1110_0010_01xx" [Ab(0), Signs(Signed, Signed, Signed, Signed), Sum(Zero, Add, Add)],
    Mma3 = "mma": "1000_00xx_0110_0001" [Ab(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Add)],
    Mma4 = "mma": "1000_00xx_0111_0001" [Ab(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, AddAligned)],
    Mma5 = "mma": "1000_01xx_0110_0001" [Ab(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Sub, Sub)],
    Mma6 = "mma": "1000_01xx_0111_0001" [Ab(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Sub, SubAligned)],
    Mma7 = "mma": "1101_0100_1000_01xx" [Ab(0), Signs(Signed, Signed, Signed, Signed), Sum(Acc, AddAligned, AddAligned)],
    Mma8 = "mma": "1101_0100_1010_00xx" [Ab(0), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Sub)],
    Mma9 = "mma": "0100_1101_1000_10x1" [Ax(1), Signs(Signed, Signed, Signed, Unsigned), Sum(Zero, Add, Sub)],
    Mma10 = "mma": "1101_0101_10x1_1101" [Bx(5), Signs(Signed, Signed, Signed, Unsigned), Sum(Zero, Add, Sub)],
    Mma11 = "mma": "0101_1111_0010_01xx" [Ab(0), Signs(Signed, Signed, Signed, Unsigned), Sum(Zero, Add, Add)],
    Mma12 = "mma": "1000_00xx_0110_1001" [Ab(8), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, Add)],
    Mma13 = "mma": "1000_00xx_0111_1001" [Ab(8), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, AddAligned)],
    Mma14 = "mma": "1000_01xx_0110_1001" [Ab(8), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Sub, Sub)],
    Mma15 = "mma": "1000_01xx_0111_1001" [Ab(8), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Sub, SubAligned)],
    Mma16 = "mma": "1101_0101_1000_01xx" [Ab(0), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, AddAligned, AddAligned)],
    Mma17 = "mma": "1101_0101_1010_00xx" [Ab(0), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, Sub)],
    Mma18 = "mma": "1100_1010_xxxx_x000" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Unsigned, Signed, Unsigned, Signed), Sum(Acc, Sub, SubAligned)],
    Mma19 = "mma": "1100_1010_xxxx_x001" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Unsigned, Signed, Signed, Unsigned), Sum(Acc, Sub, SubAligned)],
    Mma20 = "mma": "1100_1010_xxxx_x010" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Unsigned, Signed, Unsigned, Signed), Sum(Acc, SubAligned, SubAligned)],
    Mma21 = "mma": "1100_1010_xxxx_x011" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Unsigned, Signed, Signed, Unsigned), Sum(Acc, SubAligned, SubAligned)],
    Mma22 = "mma": "1100_1010_xxxx_x100" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Unsigned, Signed, Unsigned, Signed), Sum(Acc, Add, AddAligned)],
    Mma23 = "mma": "1100_1010_xxxx_x101" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Unsigned, Signed, Signed, Unsigned), Sum(Acc, Add, AddAligned)],
    Mma24 = "mma": "1100_1010_xxxx_x110" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Unsigned, Signed, Unsigned, Signed), Sum(Acc, AddAligned, AddAligned)],
    Mma25 = "mma": "1100_1010_xxxx_x111" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Unsigned, Signed, Signed, Unsigned), Sum(Acc, AddAligned, AddAligned)],
    Mma26 = "mma": "1100_1011_xxxx_x000" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Unsigned, Signed), Sum(Acc, Sub, Sub)],
    Mma27 = "mma": "1100_1011_xxxx_x001" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Sub, Sub)],
    Mma28 = "mma": "1100_1011_xxxx_x010" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Unsigned, Signed), Sum(Acc, Sub, SubAligned)],
    Mma29 = "mma": "1100_1011_xxxx_x011" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Sub, SubAligned)],
    Mma30 = "mma": "1100_1011_xxxx_x100" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Unsigned, Signed), Sum(Acc, Add, Add)],
    Mma31 = "mma": "1100_1011_xxxx_x101" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, Add)],
    Mma32 = "mma": "1100_1011_xxxx_x110" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Unsigned, Signed), Sum(Acc, Add, AddAligned)],
    Mma33 = "mma": "1100_1011_xxxx_x111" [ArpRn1(5), ArpStep1(3), ArpStep1(4), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, AddAligned)],
    Mma34 = "mma": "0000_1101_0011_xxxx" [ArpRn1(3), ArpStep1(1), ArpStep1(2), Modulo(Emod, Dmod), Ax(0), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, AddAligned)],
    Mma35 = "mma": "0000_1101_0010_xxxx" [ArpRn1(3), ArpStep1(1), ArpStep1(2), Modulo(Dmod, Emod), Ax(0), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, AddAligned)],
    Mma36 = "mma": "0100_1011_0101_xxxx" [ArpRn1(3), ArpStep1(1), ArpStep1(2), Modulo(Dmod, Dmod), Ax(0), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, AddAligned)],
    Mma37 = "mma": "1001_100x_011x_xx01" [ArpRn1(4), ArpStep1(2), ArpStep1(3), Modulo(Emod, Dmod), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Add)],
    Mma38 = "mma": "1001_100x_011x_xx10" [ArpRn1(4), ArpStep1(2), ArpStep1(3), Modulo(Dmod, Emod), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Add)],
    Mma39 = "mma": "1001_100x_011x_xx11" [ArpRn1(4), ArpStep1(2), ArpStep1(3), Modulo(Dmod, Dmod), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Add)],
    Mma40 = "mma": "1001_100x_111x_xx01" [ArpRn1(4), ArpStep1(2), ArpStep1(3), Modulo(Emod, Dmod), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, AddAligned)],
    Mma41 = "mma": "1001_100x_111x_xx10" [ArpRn1(4), ArpStep1(2), ArpStep1(3), Modulo(Dmod, Emod), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, AddAligned)],
    Mma42 = "mma": "1001_100x_111x_xx11" [ArpRn1(4), ArpStep1(2), ArpStep1(3), Modulo(Dmod, Dmod), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, AddAligned)],
    Mma43 = "mma": "1000_xx00_1100_1xxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Modulo(Emod, Emod), Ab(10), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Sub)],
    Mma44 = "mma": "1000_xx01_1100_1xxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Modulo(Emod, Emod), Ab(10), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, SubAligned)],
    Mma45 = "mma": "1000_xx10_1100_1xxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Modulo(Emod, Emod), Ab(10), Signs(Signed, Signed, Signed, Signed), Sum(Zero, Add, Add)],
    Mma46 = "mma": "1000_xx11_1100_1xxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Modulo(Emod, Emod), Ab(10), Signs(Signed, Signed, Signed, Signed), Sum(Zero, Add, AddAligned)],
    Mma47 = "mma": "1000_xxxx_1100_001x" [ArpRn1(0), ArpStep1(8), ArpStep1(9), Modulo(Emod, Emod), Ab(10), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, AddAligned)],
    Mma48 = "mma": "0100_1001_11xx_1xxx" [ArpRn1(2), ArpStep1(0), ArpStep1(1), Modulo(Emod, Emod), Ab(4), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Sub, SubAligned)],
    Mma49 = "mma": "0000_0000_11xx_xxx0" [ArpRn1(3), ArpStep1(1), ArpStep1(2), Modulo(Emod, Emod), Ab(4), Signs(Signed, Signed, Signed, Signed), Sum(Zero, Add, Sub)],
    Mma50 = "mma": "0000_0000_11xx_xxx1" [ArpRn1(3), ArpStep1(1), ArpStep1(2), Modulo(Emod, Emod), Ab(4), Signs(Signed, Signed, Signed, Signed), Sum(Zero, Add, SubAligned)],
    Mma51 = "mma": "1101_0111_101x_xxx0" [ArpRn1(3), ArpStep1(1), ArpStep1(2), Modulo(Emod, Emod), Ax(4), Signs(Signed, Signed, Signed, Signed), Sum(Sv, Add, Add)],
    Mma52 = "mma": "1101_0111_101x_xxx1" [ArpRn1(3), ArpStep1(1), ArpStep1(2), Modulo(Emod, Emod), Ax(4), Signs(Signed, Signed, Signed, Signed), Sum(SvRnd, Add, Add)],
    Mma53 = "mma": "1100_1000_xxxx_xxxx" [ArpRn2(4), ArpStep2(0), ArpStep2(2), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Add)],
    Mma54 = "mma": "1100_1001_xxxx_xxxx" [ArpRn2(4), ArpStep2(0), ArpStep2(2), Modulo(Emod, Emod), Ab(6), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Sub, Sub)],
    MmaMxXy0 = "mma_mx_xy": "1101_0101_1110_x0xx" [ArRn1(1), ArStep1(0), Ax(3), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Sub, Sub)],
    MmaMxXy1 = "mma_mx_xy": "1101_0101_1110_x1xx" [ArRn1(1), ArStep1(0), Ax(3), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Add)],
    MmaXyMx0 = "mma_xy_mx": "1000_100x_011x_x010" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Sub, Sub)],
    MmaXyMx1 = "mma_xy_mx": "1000_101x_011x_x010" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Add)],
    MmaMyMy0 = "mma_my_my": "0100_1101_101x_xx00" [ArRn1(3), ArStep1(2), Ax(4), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Sub, Sub)],
    MmaMyMy1 = "mma_my_my": "0100_1101_101x_xx01" [ArRn1(3), ArStep1(2), Ax(4), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Sub, SubAligned)],
    MmaMyMy2 = "mma_my_my": "0100_1101_101x_xx10" [ArRn1(3), ArStep1(2), Ax(4), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, Add)],
    MmaMyMy3 = "mma_my_my": "0100_1101_101x_xx11" [ArRn1(3), ArStep1(2), Ax(4), Signs(Signed, Signed, Signed, Unsigned), Sum(Acc, Add, AddAligned)],
    MmaMyMy4 = "mma_my_my": "1001_010x_111x_x000" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Sub, Sub)],
    MmaMyMy5 = "mma_my_my": "1001_010x_111x_x001" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Unsigned, Signed), Sum(Acc, Sub, Sub)],
    MmaMyMy6 = "mma_my_my": "1001_010x_111x_x010" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Sub, SubAligned)],
    MmaMyMy7 = "mma_my_my": "1001_010x_111x_x011" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Unsigned, Signed), Sum(Acc, Sub, SubAligned)],
    MmaMyMy8 = "mma_my_my": "1001_010x_111x_x100" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Add)],
    MmaMyMy9 = "mma_my_my": "1001_010x_111x_x101" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Unsigned, Signed), Sum(Acc, Add, Add)],
    MmaMyMy10 = "mma_my_my": "1001_010x_111x_x110" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, AddAligned)],
    MmaMyMy11 = "mma_my_my": "1001_010x_111x_x111" [ArRn1(4), ArStep1(3), Ax(8), Signs(Signed, Signed, Unsigned, Signed), Sum(Acc, Add, AddAligned)],
    MmaMov0 = "mma_mov": "0100_1111_1x1x_xxxx" [Axh(6), Bxh(2), ArRn1(1), ArStep1(0), Ab(3), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Add)],
    MmaMov1 = "mma_mov": "1101_0011_1x1x_xxxx" [Axh(6), Bxh(2), ArRn1(1), ArStep1(0), Ab(3), Signs(Signed, Signed, Signed, Signed), Sum(Acc, Add, Sub)],
    MmaMov2 = "mma_mov": "1000_0xxx_1101_xx00" [Axh(9), Bxh(8), ArRn1(3), ArStep1(2), Ax(10), Signs(Signed, Signed, Signed, Signed), Sum(Sv, Add, Sub)],
    MmaMov3 = "mma_mov": "1000_0xxx_1101_xx01" [Axh(9), Bxh(8), ArRn1(3), ArStep1(2), Ax(10), Signs(Signed, Signed, Signed, Signed), Sum(SvRnd, Add, Sub)],
    MmaMov4 = "mma_mov": "1000_0xxx_1101_xx10" [Axh(9), Bxh(8), ArRn1(3), ArStep1(2), Ax(10), Signs(Signed, Signed, Signed, Signed), Sum(Sv, Add, Add)],
    MmaMov5 = "mma_mov": "1000_0xxx_1101_xx11" [Axh(9), Bxh(8), ArRn1(3), ArStep1(2), Ax(10), Signs(Signed, Signed, Signed, Signed), Sum(SvRnd, Add, Add)],
    MmaMov6 = "mma_mov": "0101_100x_xx01_100x" [ArRn2(7), ArStep1(6), Ax(0), Signs(Signed, Signed, Signed, Signed), Sum(Sv, Add, Sub)],
    MmaMov7 = "mma_mov": "0101_100x_xx11_100x" [ArRn2(7), ArStep1(6), Ax(0), Signs(Signed, Signed, Signed, Signed), Sum(SvRnd, Add, Sub)],
    Addhp = "addhp": "1001_000x_111x_xxxx" [ArRn2(2), ArStep2(0), Px(4), Ax(8)],
}
