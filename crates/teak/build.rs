//! Generates the decoding table, one entry per base word.

#[path = "src/ins/opcodes.rs"]
mod opcodes;

use opcodes::Opcode;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    println!("cargo::rerun-if-changed=src/ins/opcodes.rs");

    let out = PathBuf::from(std::env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
    let file = std::fs::File::create(out.join("teak_decoding_lut.rs"))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "static DECODING_LUT: [Decoded; 1 << 16] = [")?;
    for base in 0..=u16::MAX {
        let opcode = Opcode::find_match(base);
        writeln!(
            file,
            "    Decoded {{ opcode: Opcode::{opcode:?}, needs_extra: {} }}, // 0x{base:04X}",
            opcode.needs_extra()
        )?;
    }
    writeln!(file, "];")?;

    file.flush()
}
