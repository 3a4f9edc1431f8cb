use bytesize::ByteSize;
use coff::{Coff, Section, Space, Symbol};
use std::io::Write;
use teak::{
    Ins,
    ins::disasm::{self, Settings},
};

fn label(symbol: Option<&Symbol>, index: u32) -> String {
    match symbol {
        Some(symbol) => format!("$[{}]{}", symbol.storage, symbol.name),
        None => format!("$[?]#{index}"),
    }
}

/// Applies an `.ar` symbol to the disassembler settings.
fn apply_ar(settings: &mut Settings, symbol: &Symbol) {
    let Some(register) = symbol.storage.ar_register() else {
        return;
    };

    match register {
        0..2 => settings.ar.get_or_insert_default()[register] = symbol.kind,
        _ => settings.arp.get_or_insert_default()[register - 2] = symbol.kind,
    }
}

fn dump_section(
    out: &mut impl Write,
    coff: &Coff,
    section: &Section,
    settings: &mut Settings,
) -> std::io::Result<()> {
    let space = section.space();
    let base = section.address();

    writeln!(out)?;
    writeln!(
        out,
        "section {} | {space} 0x{base:05X} | flags 0x{:08X} | {}",
        section.name,
        section.flags.to_bits(),
        ByteSize(section.data.len() as u64).display()
    )?;
    writeln!(out)?;

    let words = section.words().collect::<Vec<_>>();
    let mut offset = 0;
    while offset < words.len() {
        let rel = offset as u32;
        let addr = base.wrapping_add(rel);

        for symbol in coff.symbols_at(space, addr) {
            apply_ar(settings, symbol);
            writeln!(out, "{}", label(Some(symbol), 0))?;
        }

        if space == Space::Program
            && let Some(lines) = section.lines.get(&addr)
        {
            for line in lines {
                let symbol = coff.symbol(line.symbol);
                writeln!(out, "#{} + {}", line.line, label(symbol, line.symbol))?;
            }
        }

        let base_word = words[offset];
        write!(out, ".{addr:08X}    {base_word:04X}")?;

        if section.flags.executable() {
            if disasm::needs_expansion(base_word) {
                offset += 1;
                let Some(&extra) = words.get(offset) else {
                    writeln!(out, " [broken expansion]")?;
                    break;
                };

                let text = disasm::disassemble_with(Ins::with_extra(base_word, extra), settings);
                write!(out, " {extra:04X} {text}  ;")?;
            } else {
                let text = disasm::disassemble_with(Ins::new(base_word), settings);
                write!(out, "      {text}  ;")?;
            }
        }

        for rel in rel..=offset as u32 {
            for relocation in section.relocations.get(&rel).into_iter().flatten() {
                let symbol = coff.symbol(relocation.symbol);
                write!(
                    out,
                    "{{@{:08X} + {}}}",
                    relocation.kind,
                    label(symbol, relocation.symbol)
                )?;
            }
        }

        writeln!(out)?;
        offset += 1;
    }

    Ok(())
}

/// Writes a listing of every section in the object file.
pub fn dump(out: &mut impl Write, coff: &Coff, mut settings: Settings) -> std::io::Result<()> {
    for section in &coff.sections {
        dump_section(out, coff, section, &mut settings)?;
    }

    out.flush()
}

#[cfg(test)]
mod test {
    use super::*;
    use coff::{Region, StorageClass};

    fn symbol(storage: u8, kind: u16) -> Symbol {
        Symbol {
            name: ".ar".to_owned(),
            value: 0,
            region: Region::Program,
            kind,
            storage: StorageClass(storage),
            aux_count: 0,
        }
    }

    #[test]
    fn ar_symbols_update_settings() {
        let mut settings = Settings::default();
        apply_ar(&mut settings, &symbol(108, 0x1234));
        apply_ar(&mut settings, &symbol(111, 0x5678));
        apply_ar(&mut settings, &symbol(2, 0xFFFF));

        assert_eq!(settings.ar, Some([0, 0x1234]));
        assert_eq!(settings.arp, Some([0, 0, 0x5678, 0]));
    }
}
