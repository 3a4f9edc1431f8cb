use teak::regs::Registers;

/// A register observed by a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    A0,
    A1,
    B0,
    B1,
    R(usize),
    X0,
    Y0,
    P0,
    Sp,
    Pc,
    Repc,
    Bcn,
    Lp,
}

impl Reg {
    pub fn get(self, regs: &Registers) -> u64 {
        match self {
            Reg::A0 => regs.a[0],
            Reg::A1 => regs.a[1],
            Reg::B0 => regs.b[0],
            Reg::B1 => regs.b[1],
            Reg::R(n) => regs.r[n] as u64,
            Reg::X0 => regs.x[0] as u64,
            Reg::Y0 => regs.y[0] as u64,
            Reg::P0 => regs.p[0] as u64,
            Reg::Sp => regs.sp as u64,
            Reg::Pc => regs.pc as u64,
            Reg::Repc => regs.repc as u64,
            Reg::Bcn => regs.bcn as u64,
            Reg::Lp => regs.lp as u64,
        }
    }
}

/// A small program, loaded at address 0 and run until it parks on a branch to itself.
pub struct TestCase {
    pub name: &'static str,
    pub setup: fn(&mut Registers),
    pub code: &'static [u16],
    pub expected: &'static [(Reg, u64)],
    pub memory: &'static [(u16, u16)],
}

/// `brr -1`, always.
const HALT: u16 = 0x57F0;

fn stack(regs: &mut Registers) {
    regs.sp = 0x0200;
}

fn nothing(_: &mut Registers) {}

pub const CASES: &[TestCase] = &[
    TestCase {
        name: "immediates",
        setup: nothing,
        code: &[
            0x5E03, 0x1234, // mov 0x1234, r3
            0x35FF, // mov -1, a1h
            HALT,
        ],
        expected: &[
            (Reg::R(3), 0x1234),
            (Reg::A1, 0xFFFF_FFFF_FFFF_0000),
            (Reg::Pc, 3),
        ],
        memory: &[],
    },
    TestCase {
        name: "block_repeat",
        setup: nothing,
        code: &[
            0x5C04, 0x0002, // bkrep 4, 0x0002
            0x0088, // modr r0++
            HALT,
        ],
        expected: &[(Reg::R(0), 5), (Reg::Bcn, 0), (Reg::Lp, 0), (Reg::Pc, 3)],
        memory: &[],
    },
    TestCase {
        name: "single_repeat",
        setup: nothing,
        code: &[
            0x0C03, // rep 3
            0x0089, // modr r1++
            HALT,
        ],
        expected: &[(Reg::R(1), 4), (Reg::Repc, 0), (Reg::Pc, 2)],
        memory: &[],
    },
    TestCase {
        name: "stack",
        setup: stack,
        code: &[
            0x5F40, 0xBEEF, // push 0xBEEF
            0x5E65, // pop r5
            0x5E02, 0x1111, // mov 0x1111, r2
            0x5E42, // push r2
            0x5E67, // pop y0
            HALT,
        ],
        expected: &[
            (Reg::R(5), 0xBEEF),
            (Reg::Y0, 0x1111),
            (Reg::Sp, 0x0200),
        ],
        memory: &[(0x01FF, 0x1111)],
    },
    TestCase {
        name: "call_and_return",
        setup: stack,
        code: &[
            0x41C0, 0x0004, // call 0x00004
            HALT,
            0x0000, // nop
            0x5E04, 0x0042, // mov 0x42, r4
            0x4580, // ret
        ],
        expected: &[(Reg::R(4), 0x42), (Reg::Pc, 2), (Reg::Sp, 0x0200)],
        memory: &[],
    },
    TestCase {
        name: "shifted_move",
        setup: nothing,
        code: &[
            0x5E00, 0x0003, // mov 3, r0
            0x40C4, // movsi r0, a0, 4
            HALT,
        ],
        expected: &[(Reg::A0, 0x30)],
        memory: &[],
    },
    TestCase {
        name: "signed_multiply",
        setup: nothing,
        code: &[
            0x5E07, 0x0003, // mov 3, y0
            0x08FE, // mpyi -2
            0x580B, // mov p, a0
            HALT,
        ],
        expected: &[
            (Reg::X0, 0xFFFE),
            (Reg::P0, 0xFFFF_FFFA),
            (Reg::A0, 0xFFFF_FFFF_FFFF_FFFA),
        ],
        memory: &[],
    },
    TestCase {
        name: "fill_loop",
        setup: nothing,
        code: &[
            0x5E01, 0x0100, // mov 0x100, r1
            0x5E02, 0x0007, // mov 7, r2
            0x5C02, 0x0006, // bkrep 2, 0x0006
            0x1849, // mov r2, [r1++]
            HALT,
        ],
        expected: &[(Reg::R(1), 0x0103), (Reg::Pc, 7)],
        memory: &[(0x0100, 7), (0x0101, 7), (0x0102, 7), (0x0103, 0)],
    },
];
