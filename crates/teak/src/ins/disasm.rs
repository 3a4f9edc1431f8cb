//! Textual rendering of instructions.
//!
//! Rendering is driven entirely by the operand layout of each opcode, so every one of the 65536
//! base words produces some text. Operations selected by an operand field (`alm`, `alb`, `mul`,
//! `moda`) replace the family name of the mnemonic.

use super::operand::{Cond, Mem, Step};
use super::{Ins, Opcode, Operand, Sign, SumBase, SumOp};
use crate::regs::{Ar, Arp};
use std::fmt::Write;
use tinyvec::TinyVec;

/// Optional register state used to resolve indirect operands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    /// Values of `ar0` and `ar1`.
    pub ar: Option<[u16; 2]>,
    /// Values of `arp0` to `arp3`.
    pub arp: Option<[u16; 4]>,
}

/// Whether the base word is followed by an expansion word.
pub fn needs_expansion(base: u16) -> bool {
    Ins::new(base).decoded().needs_extra
}

pub fn disassemble(ins: Ins) -> String {
    disassemble_with(ins, &Settings::default())
}

fn signed(value: u16) -> String {
    let value = value as i16;
    if value < 0 {
        format!("-0x{:02X}", value.unsigned_abs())
    } else {
        format!("+0x{value:02X}")
    }
}

fn product(index: u8, op: SumOp) -> String {
    let sign = if op.is_sub() { '-' } else { '+' };
    let aligned = if op.is_aligned() { "a" } else { "" };
    format!("{sign}p{index}{aligned}")
}

fn sign(sign: Sign) -> char {
    match sign {
        Sign::Signed => 's',
        Sign::Unsigned => 'u',
    }
}

/// Replaces the family part of a mnemonic (`alm_r6` -> `add_r6`).
fn rename(mnemonic: &str, op: &str) -> String {
    match mnemonic.split_once('_') {
        Some((_, rest)) => format!("{op}_{rest}"),
        None => op.to_owned(),
    }
}

struct Renderer<'a> {
    ins: Ins,
    settings: &'a Settings,
}

impl Renderer<'_> {
    fn ar_unit(&self, unit: usize) -> Option<(u8, u8)> {
        let ar = Ar::from_bits(self.settings.ar?[unit / 2]);
        Some(if unit % 2 == 0 {
            (ar.rni().value(), ar.stepi().value())
        } else {
            (ar.rnj().value(), ar.stepj().value())
        })
    }

    fn ar_indirect(&self, rn: Operand, step: Operand) -> String {
        let (unit, step_unit) = (self.ins.unit(rn), self.ins.unit(step));
        match (self.ar_unit(unit), self.ar_unit(step_unit)) {
            (Some((rn, _)), Some((_, step))) => {
                format!("[r{rn}{}]", Step::from_config(step).suffix())
            }
            _ => format!("[arrn{unit}+ars{step_unit}]"),
        }
    }

    fn arp_indirect(&self, rn: Operand, stepi: Operand, stepj: Operand) -> String {
        let unit = self.ins.unit(rn);
        let (si, sj) = (self.ins.unit(stepi), self.ins.unit(stepj));
        match self.settings.arp {
            Some(arp) => {
                let rn = Arp::from_bits(arp[unit]);
                let stepi = Arp::from_bits(arp[si]).stepi().value();
                let stepj = Arp::from_bits(arp[sj]).stepj().value();
                format!(
                    "[r{}{}], [r{}{}]",
                    rn.rni().value(),
                    Step::from_config(stepi).suffix(),
                    rn.rnj().value() + 4,
                    Step::from_config(stepj).suffix(),
                )
            }
            None => format!("[arprni{unit}+arpsi{si}], [arprnj{unit}+arpsj{sj}]"),
        }
    }

    fn render(&self) -> String {
        let ins = self.ins;
        let opcode = ins.decoded().opcode;
        if opcode == Opcode::Illegal {
            return "undefined".to_owned();
        }

        let mut mnemonic = opcode.mnemonic().to_owned();
        let mut args: TinyVec<[String; 8]> = TinyVec::new();
        let ops = opcode.operands();

        let mut i = 0;
        while i < ops.len() {
            let op = ops[i];
            let next = ops.get(i + 1).copied();
            i += 1;

            match op {
                Operand::Alm(_) | Operand::Alu(_) | Operand::FixedAlm(_) => {
                    let name = ins.alm(op).map_or("[ERROR]".to_owned(), |o| o.to_string());
                    mnemonic = rename(&mnemonic, &name);
                }
                Operand::Alb(_) | Operand::FixedAlb(_) => {
                    mnemonic = rename(&mnemonic, &ins.alb(op).to_string());
                }
                Operand::Mul3(_) | Operand::Mul2(_) => {
                    mnemonic = rename(&mnemonic, &ins.mul(op).to_string());
                }
                Operand::Moda4(_) | Operand::Moda3(_) => {
                    let name = ins.moda(op).map_or("[ERROR]".to_owned(), |o| o.to_string());
                    mnemonic = rename(&mnemonic, &name);
                }

                Operand::Rn(_) | Operand::R45(_) | Operand::R0123(_) => {
                    let unit = ins.unit(op);
                    if let Some(step @ Operand::StepZids(_)) = next {
                        args.push(format!("[r{unit}{}]", ins.step(step).suffix()));
                        i += 1;
                    } else {
                        args.push(format!("r{unit}"));
                    }
                }
                Operand::StepZids(_) => args.push(format!("[r0{}]", ins.step(op).suffix())),

                Operand::ArRn1(_) | Operand::ArRn2(_) => match next {
                    Some(
                        step @ (Operand::ArStep1(_) | Operand::ArStep1Alt(_) | Operand::ArStep2(_)),
                    ) => {
                        args.push(self.ar_indirect(op, step));
                        i += 1;
                    }
                    _ => args.push(format!("arrn{}", ins.unit(op))),
                },
                Operand::ArStep1(_) | Operand::ArStep1Alt(_) | Operand::ArStep2(_) => {
                    args.push(format!("ars{}", ins.unit(op)));
                }
                Operand::ArpRn1(_) | Operand::ArpRn2(_) => {
                    match (next, ops.get(i + 1).copied()) {
                        (
                            Some(stepi @ (Operand::ArpStep1(_) | Operand::ArpStep2(_))),
                            Some(stepj @ (Operand::ArpStep1(_) | Operand::ArpStep2(_))),
                        ) => {
                            args.push(self.arp_indirect(op, stepi, stepj));
                            i += 2;
                        }
                        _ => args.push(format!("arprn{}", ins.unit(op))),
                    }
                }
                Operand::ArpStep1(_) | Operand::ArpStep2(_) => {
                    args.push(format!("arps{}", ins.unit(op)));
                }
                Operand::Px(_) => args.push(format!("p{}", ins.unit(op))),
                Operand::Ar(_) => args.push(format!("ar{}", ins.unit(op))),
                Operand::Arp(_) => args.push(format!("arp{}", ins.unit(op))),

                Operand::Ax(_)
                | Operand::Axl(_)
                | Operand::Axh(_)
                | Operand::Bx(_)
                | Operand::Bxl(_)
                | Operand::Bxh(_)
                | Operand::Ab(_)
                | Operand::Abl(_)
                | Operand::Abh(_)
                | Operand::Abe(_)
                | Operand::Ablh(_)
                | Operand::RnOld(_)
                | Operand::Register(_)
                | Operand::ArArpSttMod(_)
                | Operand::ArArp(_)
                | Operand::SttMod(_)
                | Operand::FixedAx(_)
                | Operand::FixedBx(_) => args.push(ins.reg(op).to_string()),

                Operand::Imm2(_)
                | Operand::Imm4(_)
                | Operand::Imm5(_)
                | Operand::Imm8(_)
                | Operand::Imm9(_)
                | Operand::Imm16 => args.push(format!("0x{:04X}", ins.imm(op))),
                Operand::Imm5s(_) | Operand::Imm6s(_) | Operand::Imm7s(_) | Operand::Imm8s(_) => {
                    args.push(signed(ins.imm(op)));
                }

                Operand::MemImm8(_)
                | Operand::MemImm16
                | Operand::MemR7Imm16
                | Operand::MemR7Imm7s(_) => {
                    args.push(match ins.mem(op) {
                        Mem::Page(offset) => format!("[page:0x{offset:02X}]"),
                        Mem::Imm16(address) => format!("[0x{address:04X}]"),
                        Mem::R7Imm16(offset) => format!("[r7+0x{offset:04X}]"),
                        Mem::R7Imm7s(offset) => format!("[r7{}]", signed(offset)),
                    });
                }

                Operand::Address16 | Operand::Address18(_) => {
                    args.push(format!("0x{:05X}", ins.address(op)));
                }
                Operand::RelAddr7(_) => args.push(signed(ins.rel(op))),
                Operand::Cond(_) => {
                    let cond = ins.cond(op);
                    if cond != Cond::True {
                        args.push(cond.to_string());
                    }
                }
                Operand::SwapType(_) => args.push(
                    ins.swap_type(op)
                        .map_or("[ERROR]".to_owned(), |s| s.to_string()),
                ),
                Operand::BankFlags(_) => {
                    let flags = ins.bank_flags(op);
                    let names = [
                        (flags.cfgi(), "cfgi"),
                        (flags.r4(), "r4"),
                        (flags.r1(), "r1"),
                        (flags.r0(), "r0"),
                        (flags.r7(), "r7"),
                        (flags.cfgj(), "cfgj"),
                    ];

                    args.extend(
                        names
                            .into_iter()
                            .filter(|(set, _)| *set)
                            .map(|(_, name)| name.to_owned()),
                    );
                }
                Operand::CbsCond(_) => args.push(ins.cbs_cond(op).to_string()),

                Operand::Sum(base, p0, p1) => {
                    match base {
                        SumBase::Zero | SumBase::Acc => (),
                        SumBase::Sv => args.push("sv".to_owned()),
                        SumBase::SvRnd => args.push("sv_rnd".to_owned()),
                    }

                    args.push(product(0, p0));
                    args.push(product(1, p1));
                }
                Operand::Signs(x0, y0, x1, y1) => {
                    args.push(format!(
                        "{}{}{}{}",
                        sign(x0),
                        sign(y0),
                        sign(x1),
                        sign(y1)
                    ));
                }
                Operand::Modulo(i, j) => {
                    args.push(format!("{i:?}, {j:?}").to_lowercase());
                }
            }
        }

        let mut text = mnemonic;
        for (index, arg) in args.iter().enumerate() {
            let separator = if index == 0 { " " } else { ", " };
            let _ = write!(text, "{separator}{arg}");
        }

        text
    }
}

/// Renders an instruction, resolving indirect operands through `settings` when possible.
pub fn disassemble_with(ins: Ins, settings: &Settings) -> String {
    Renderer { ins, settings }.render()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn total_and_pure() {
        for base in 0..=u16::MAX {
            let ins = Ins::with_extra(base, 0x1234);
            let text = disassemble(ins);
            assert!(!text.is_empty());
            assert_eq!(text, disassemble(ins));
            assert_eq!(needs_expansion(base), ins.decoded().needs_extra);
        }
    }

    #[test]
    fn undefined() {
        assert_eq!(disassemble(Ins::new(0x0021)), "undefined");
    }

    #[test]
    fn plain() {
        assert_eq!(disassemble(Ins::new(0x0000)), "nop");
        assert_eq!(disassemble(Ins::with_extra(0x5F40, 0xBEEF)), "push 0xBEEF");
        assert_eq!(disassemble(Ins::new(0x5BA3)), "mov r3, a1h");
        assert_eq!(disassemble(Ins::new(0x57F0)), "brr -0x01");
        assert_eq!(disassemble(Ins::with_extra(0x41A0, 0xABCD)), "br 0x2ABCD");
    }

    #[test]
    fn operations_rename_mnemonic() {
        assert_eq!(disassemble(Ins::new(0x8689)), "add [r1++], a0");
    }

    #[test]
    fn resolved_indirection() {
        // mov_repc [arrn0+ars0] (MovRepcAr)
        let ins = Ins::new(0b1101_0111_1101_0100);
        assert_eq!(disassemble(ins), "mov_repc [arrn0+ars0]");

        let settings = Settings {
            ar: Some([(3 << 13) | (2 << 5), 0]),
            arp: None,
        };
        assert_eq!(disassemble_with(ins, &settings), "mov_repc [r3--]");
    }
}
