mod cases;

use cases::{Reg, TestCase};
use libtest_mimic::{Arguments, Failed, Trial};
use std::fmt::Write;
use teak::{Ins, Teak, ins::disasm, regs::Registers};

/// Budget after which a case that never parks is considered stuck.
const CYCLES: u64 = 4096;

fn parse_code(mut words: &[u16]) -> Vec<Ins> {
    let mut ins = vec![];
    while !words.is_empty() {
        if disasm::needs_expansion(words[0]) && words.len() > 1 {
            ins.push(Ins::with_extra(words[0], words[1]));
            words = &words[2..];
        } else {
            ins.push(Ins::new(words[0]));
            words = &words[1..];
        }
    }

    ins
}

struct FailedCase {
    code: Vec<Ins>,
    initial: Registers,
    divergences: Vec<String>,
}

fn run_case(case: &TestCase) -> Result<(), FailedCase> {
    let mut teak = Teak::new();

    // setup
    (case.setup)(teak.registers_mut());
    let initial = teak.registers().clone();
    for (addr, word) in case.code.iter().enumerate() {
        teak.program_write(addr as u32, *word);
    }

    teak.run(CYCLES);

    // check
    let mut divergences = vec![];
    let regs = teak.registers();
    for &(reg, expected) in case.expected {
        let value = reg.get(regs);
        if value != expected {
            divergences.push(format!("{reg:?}(v={value:X}, e={expected:X})"));
        }
    }

    if !case.expected.iter().any(|(reg, _)| *reg == Reg::Pc) {
        let halt = case.code.len() as u64 - 1;
        let pc = Reg::Pc.get(regs);
        if pc != halt {
            divergences.push(format!("Pc(v={pc:X}, e={halt:X})"));
        }
    }

    for &(addr, expected) in case.memory {
        let value = teak.data_read(addr, true);
        if value != expected {
            divergences.push(format!("[{addr:04X}](v={value:04X}, e={expected:04X})"));
        }
    }

    if !divergences.is_empty() {
        return Err(FailedCase {
            code: parse_code(case.code),
            initial,
            divergences,
        });
    }

    Ok(())
}

fn run_test(case: &TestCase, quiet: bool) -> Result<(), Failed> {
    let Err(failure) = run_case(case) else {
        return Ok(());
    };

    let divergences = failure.divergences.join(", ");
    if quiet {
        return Err(Failed::from(divergences));
    }

    let mut pc = 0;
    let mut listing = String::new();
    for ins in &failure.code {
        writeln!(&mut listing, "{pc:04X} {}", disasm::disassemble(*ins)).unwrap();
        pc += ins.decoded().len();
    }

    Err(Failed::from(format!(
        "DIVERGENCES: {divergences}\r\nINITIAL: {:04X?}\r\nCODE:\r\n{listing}",
        failure.initial
    )))
}

fn main() {
    let args = Arguments::from_args();
    let env_quiet = std::env::var("QUIET").is_ok();
    let quiet = args.quiet || env_quiet;

    let tests = cases::CASES
        .iter()
        .map(|case| Trial::test(case.name, move || run_test(case, quiet)))
        .collect();

    libtest_mimic::run(&args, tests).exit();
}
