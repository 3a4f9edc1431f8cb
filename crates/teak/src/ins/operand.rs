//! Operand kinds of the instruction set.
//!
//! Register operands decode to a [`RegName`] through small lookup tables indexed by the raw
//! operand bits. Entries marked [`RegName::Undefined`] are reserved encodings.

use bitos::bitos;
use strum::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum RegName {
    A0,
    A0l,
    A0h,
    A0e,
    A1,
    A1l,
    A1h,
    A1e,
    B0,
    B0l,
    B0h,
    B0e,
    B1,
    B1l,
    B1h,
    B1e,

    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,

    Y0,
    P,

    Pc,
    Sp,
    Sv,
    Lc,

    Ar0,
    Ar1,
    Arp0,
    Arp1,
    Arp2,
    Arp3,

    Ext0,
    Ext1,
    Ext2,
    Ext3,

    Stt0,
    Stt1,
    Stt2,
    St0,
    St1,
    St2,
    Cfgi,
    Cfgj,
    Mod0,
    Mod1,
    Mod2,
    Mod3,

    #[strum(serialize = "[ERROR]")]
    Undefined,
}

/// Which 40-bit accumulator a register name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acc {
    A0,
    A1,
    B0,
    B1,
}

/// Which part of an accumulator a register name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccPart {
    Full,
    Low,
    High,
    Ext,
}

impl RegName {
    /// Returns the accumulator and part this name refers to, if any.
    pub const fn acc(self) -> Option<(Acc, AccPart)> {
        use RegName::*;
        Some(match self {
            A0 => (Acc::A0, AccPart::Full),
            A0l => (Acc::A0, AccPart::Low),
            A0h => (Acc::A0, AccPart::High),
            A0e => (Acc::A0, AccPart::Ext),
            A1 => (Acc::A1, AccPart::Full),
            A1l => (Acc::A1, AccPart::Low),
            A1h => (Acc::A1, AccPart::High),
            A1e => (Acc::A1, AccPart::Ext),
            B0 => (Acc::B0, AccPart::Full),
            B0l => (Acc::B0, AccPart::Low),
            B0h => (Acc::B0, AccPart::High),
            B0e => (Acc::B0, AccPart::Ext),
            B1 => (Acc::B1, AccPart::Full),
            B1l => (Acc::B1, AccPart::Low),
            B1h => (Acc::B1, AccPart::High),
            B1e => (Acc::B1, AccPart::Ext),
            _ => return None,
        })
    }

    /// Returns the index of an `rN` register.
    pub const fn rn(self) -> Option<usize> {
        use RegName::*;
        Some(match self {
            R0 => 0,
            R1 => 1,
            R2 => 2,
            R3 => 3,
            R4 => 4,
            R5 => 5,
            R6 => 6,
            R7 => 7,
            _ => return None,
        })
    }

    /// Returns the same part of the sibling accumulator (`a0` <-> `a1`, `b0` <-> `b1`).
    pub const fn counterpart(self) -> RegName {
        use RegName::*;
        match self {
            A0 => A1,
            A1 => A0,
            B0 => B1,
            B1 => B0,
            A0l => A1l,
            A1l => A0l,
            B0l => B1l,
            B1l => B0l,
            A0h => A1h,
            A1h => A0h,
            B0h => B1h,
            B1h => B0h,
            A0e => A1e,
            A1e => A0e,
            B0e => B1e,
            B1e => B0e,
            other => other,
        }
    }

    /// Whether this is one of the full 40-bit accumulators.
    pub const fn is_full_acc(self) -> bool {
        matches!(self, RegName::A0 | RegName::A1 | RegName::B0 | RegName::B1)
    }
}

use RegName as R;

pub const REGISTER: [RegName; 32] = [
    R::R0,
    R::R1,
    R::R2,
    R::R3,
    R::R4,
    R::R5,
    R::R7,
    R::Y0,
    R::St0,
    R::St1,
    R::St2,
    R::P,
    R::Pc,
    R::Sp,
    R::Cfgi,
    R::Cfgj,
    R::B0h,
    R::B1h,
    R::B0l,
    R::B1l,
    R::Ext0,
    R::Ext1,
    R::Ext2,
    R::Ext3,
    R::A0,
    R::A1,
    R::A0l,
    R::A1l,
    R::A0h,
    R::A1h,
    R::Lc,
    R::Sv,
];

pub const AX: [RegName; 2] = [R::A0, R::A1];
pub const AXL: [RegName; 2] = [R::A0l, R::A1l];
pub const AXH: [RegName; 2] = [R::A0h, R::A1h];
pub const BX: [RegName; 2] = [R::B0, R::B1];
pub const BXH: [RegName; 2] = [R::B0h, R::B1h];
pub const AB: [RegName; 4] = [R::B0, R::B1, R::A0, R::A1];
pub const ABL: [RegName; 4] = [R::B0l, R::B1l, R::A0l, R::A1l];
pub const ABH: [RegName; 4] = [R::B0h, R::B1h, R::A0h, R::A1h];
pub const ABE: [RegName; 4] = [R::B0e, R::B1e, R::A0e, R::A1e];
pub const ABLH: [RegName; 8] = [
    R::B0l,
    R::B0h,
    R::B1l,
    R::B1h,
    R::A0l,
    R::A0h,
    R::A1l,
    R::A1h,
];
pub const RN_OLD: [RegName; 8] = [R::R0, R::R1, R::R2, R::R3, R::R4, R::R5, R::R7, R::Y0];
pub const RN: [RegName; 8] = [R::R0, R::R1, R::R2, R::R3, R::R4, R::R5, R::R6, R::R7];
pub const AR_ARP_STT_MOD: [RegName; 16] = [
    R::Ar0,
    R::Ar1,
    R::Arp0,
    R::Arp1,
    R::Arp2,
    R::Arp3,
    R::Undefined,
    R::Undefined,
    R::Stt0,
    R::Stt1,
    R::Stt2,
    R::Undefined,
    R::Mod0,
    R::Mod1,
    R::Mod2,
    R::Mod3,
];
pub const AR_ARP: [RegName; 8] = [
    R::Ar0,
    R::Ar1,
    R::Arp0,
    R::Arp1,
    R::Arp2,
    R::Arp3,
    R::Undefined,
    R::Undefined,
];
pub const STT_MOD: [RegName; 8] = [
    R::Stt0,
    R::Stt1,
    R::Stt2,
    R::Undefined,
    R::Mod0,
    R::Mod1,
    R::Mod2,
    R::Mod3,
];

/// Post-modification applied to an address register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Zero,
    Increase,
    Decrease,
    PlusStep,
    Increase2Mode1,
    Decrease2Mode1,
    Increase2Mode2,
    Decrease2Mode2,
}

impl Step {
    /// Decodes the 2-bit `StepZIDS` operand.
    pub const fn zids(value: u16) -> Self {
        match value & 3 {
            0 => Self::Zero,
            1 => Self::Increase,
            2 => Self::Decrease,
            _ => Self::PlusStep,
        }
    }

    /// Decodes a 3-bit step field of the `ar`/`arp` configuration registers.
    pub const fn from_config(value: u8) -> Self {
        match value & 7 {
            0 => Self::Zero,
            1 => Self::Increase,
            2 => Self::Decrease,
            3 => Self::PlusStep,
            4 => Self::Increase2Mode1,
            5 => Self::Decrease2Mode1,
            6 => Self::Increase2Mode2,
            _ => Self::Decrease2Mode2,
        }
    }

    pub const fn is_double(self) -> bool {
        matches!(
            self,
            Self::Increase2Mode1 | Self::Decrease2Mode1 | Self::Increase2Mode2 | Self::Decrease2Mode2
        )
    }

    /// Suffix used when rendering an indirect access.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Zero => "",
            Self::Increase => "++",
            Self::Decrease => "--",
            Self::PlusStep => "++s",
            Self::Increase2Mode1 => "++2",
            Self::Decrease2Mode1 => "--2",
            Self::Increase2Mode2 => "++2*",
            Self::Decrease2Mode2 => "--2*",
        }
    }
}

/// Offset applied to the second word of a paired indirect access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Zero,
    PlusOne,
    MinusOne,
    MinusOneDmod,
}

impl Offset {
    pub const fn from_config(value: u8) -> Self {
        match value & 3 {
            0 => Self::Zero,
            1 => Self::PlusOne,
            2 => Self::MinusOne,
            _ => Self::MinusOneDmod,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Zero => "",
            Self::PlusOne => "+1",
            Self::MinusOne => "-1",
            Self::MinusOneDmod => "-1*",
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum AlmOp {
    Or,
    And,
    Xor,
    Add,
    Tst0,
    Tst1,
    Cmp,
    Sub,
    Msu,
    Addh,
    Addl,
    Subh,
    Subl,
    Sqr,
    Sqra,
    Cmpu,
}

pub const ALM: [AlmOp; 16] = [
    AlmOp::Or,
    AlmOp::And,
    AlmOp::Xor,
    AlmOp::Add,
    AlmOp::Tst0,
    AlmOp::Tst1,
    AlmOp::Cmp,
    AlmOp::Sub,
    AlmOp::Msu,
    AlmOp::Addh,
    AlmOp::Addl,
    AlmOp::Subh,
    AlmOp::Subl,
    AlmOp::Sqr,
    AlmOp::Sqra,
    AlmOp::Cmpu,
];

pub const ALU: [Option<AlmOp>; 8] = [
    Some(AlmOp::Or),
    Some(AlmOp::And),
    Some(AlmOp::Xor),
    Some(AlmOp::Add),
    None,
    None,
    Some(AlmOp::Cmp),
    Some(AlmOp::Sub),
];

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum AlbOp {
    Set,
    Rst,
    Chng,
    Addv,
    Tst0,
    Tst1,
    Cmpv,
    Subv,
}

pub const ALB: [AlbOp; 8] = [
    AlbOp::Set,
    AlbOp::Rst,
    AlbOp::Chng,
    AlbOp::Addv,
    AlbOp::Tst0,
    AlbOp::Tst1,
    AlbOp::Cmpv,
    AlbOp::Subv,
];

impl AlbOp {
    /// Whether the result is written back to the operand.
    pub const fn modifies(self) -> bool {
        !matches!(self, Self::Tst0 | Self::Tst1 | Self::Cmpv)
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum MulOp {
    Mpy,
    Mpysu,
    Mac,
    Macus,
    Maa,
    Macuu,
    Macsu,
    Maasu,
}

pub const MUL3: [MulOp; 8] = [
    MulOp::Mpy,
    MulOp::Mpysu,
    MulOp::Mac,
    MulOp::Macus,
    MulOp::Maa,
    MulOp::Macuu,
    MulOp::Macsu,
    MulOp::Maasu,
];

pub const MUL2: [MulOp; 4] = [MulOp::Mpy, MulOp::Mac, MulOp::Maa, MulOp::Macsu];

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ModaOp {
    Shr,
    Shr4,
    Shl,
    Shl4,
    Ror,
    Rol,
    Clr,
    Not,
    Neg,
    Rnd,
    Pacr,
    Clrr,
    Inc,
    Dec,
    Copy,
}

pub const MODA4: [Option<ModaOp>; 16] = [
    Some(ModaOp::Shr),
    Some(ModaOp::Shr4),
    Some(ModaOp::Shl),
    Some(ModaOp::Shl4),
    Some(ModaOp::Ror),
    Some(ModaOp::Rol),
    Some(ModaOp::Clr),
    None,
    Some(ModaOp::Not),
    Some(ModaOp::Neg),
    Some(ModaOp::Rnd),
    Some(ModaOp::Pacr),
    Some(ModaOp::Clrr),
    Some(ModaOp::Inc),
    Some(ModaOp::Dec),
    Some(ModaOp::Copy),
];

pub const MODA3: [ModaOp; 8] = [
    ModaOp::Shr,
    ModaOp::Shr4,
    ModaOp::Shl,
    ModaOp::Shl4,
    ModaOp::Ror,
    ModaOp::Rol,
    ModaOp::Clr,
    ModaOp::Clrr,
];

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Cond {
    True,
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
    Nn,
    C,
    V,
    E,
    L,
    Nr,
    Niu0,
    Iu0,
    Iu1,
}

pub const COND: [Cond; 16] = [
    Cond::True,
    Cond::Eq,
    Cond::Neq,
    Cond::Gt,
    Cond::Ge,
    Cond::Lt,
    Cond::Le,
    Cond::Nn,
    Cond::C,
    Cond::V,
    Cond::E,
    Cond::L,
    Cond::Nr,
    Cond::Niu0,
    Cond::Iu0,
    Cond::Iu1,
];

/// Accumulator exchange pattern of the `swap` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapType {
    A0B0,
    A0B1,
    A1B0,
    A1B1,
    A0B0A1B1,
    A0B1A1B0,
    A0B0A1,
    A0B1A1,
    A1B0A0,
    A1B1A0,
    B0A0B1,
    B0A1B1,
    B1A0B0,
    B1A1B0,
}

pub const SWAP: [Option<SwapType>; 16] = [
    Some(SwapType::A0B0),
    Some(SwapType::A0B1),
    Some(SwapType::A1B0),
    Some(SwapType::A1B1),
    Some(SwapType::A0B0A1B1),
    Some(SwapType::A0B1A1B0),
    Some(SwapType::A0B0A1),
    Some(SwapType::A0B1A1),
    Some(SwapType::A1B0A0),
    Some(SwapType::A1B1A0),
    Some(SwapType::B0A0B1),
    Some(SwapType::B0A1B1),
    Some(SwapType::B1A0B0),
    Some(SwapType::B1A1B0),
    None,
    None,
];

impl std::fmt::Display for SwapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::A0B0 => "a0<->b0",
            Self::A0B1 => "a0<->b1",
            Self::A1B0 => "a1<->b0",
            Self::A1B1 => "a1<->b1",
            Self::A0B0A1B1 => "a0<->b0, a1<->b1",
            Self::A0B1A1B0 => "a0<->b1, a1<->b0",
            Self::A0B0A1 => "a0->b0->a1",
            Self::A0B1A1 => "a0->b1->a1",
            Self::A1B0A0 => "a1->b0->a0",
            Self::A1B1A0 => "a1->b1->a0",
            Self::B0A0B1 => "b0->a0->b1",
            Self::B0A1B1 => "b0->a1->b1",
            Self::B1A0B0 => "b1->a0->b0",
            Self::B1A1B0 => "b1->a1->b0",
        };

        f.write_str(text)
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum CbsCond {
    Ge,
    Gt,
}

/// Register banks exchanged by `banke`.
#[bitos(8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BankFlags {
    #[bits(0)]
    pub cfgi: bool,
    #[bits(1)]
    pub r4: bool,
    #[bits(2)]
    pub r1: bool,
    #[bits(3)]
    pub r0: bool,
    #[bits(4)]
    pub r7: bool,
    #[bits(5)]
    pub cfgj: bool,
}

/// A data memory operand addressed directly by the instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mem {
    /// `[page:imm8]`
    Page(u8),
    /// `[imm16]`
    Imm16(u16),
    /// `[r7+imm16]`
    R7Imm16(u16),
    /// `[r7+imm7s]`, already sign extended.
    R7Imm7s(u16),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn register_table_has_no_r6() {
        assert!(!REGISTER.contains(&RegName::R6));
        assert_eq!(REGISTER[11], RegName::P);
        assert_eq!(REGISTER[31], RegName::Sv);
    }

    #[test]
    fn counterpart_is_involution() {
        for name in AB.iter().chain(ABL.iter()).chain(ABH.iter()).chain(ABE.iter()) {
            assert_eq!(name.counterpart().counterpart(), *name);
            assert_ne!(name.counterpart(), *name);
        }
    }

    #[test]
    fn names() {
        assert_eq!(RegName::A0h.to_string(), "a0h");
        assert_eq!(RegName::Stt2.to_string(), "stt2");
        assert_eq!(AlmOp::Cmpu.to_string(), "cmpu");
        assert_eq!(SwapType::B1A1B0.to_string(), "b1->a1->b0");
    }
}
