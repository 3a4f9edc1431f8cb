//! Loader for the COFF object files produced by the Teak toolchain.
//!
//! Sections live in one of two address spaces, program or data, and addresses are always in
//! 16-bit words. After loading, sections are split so that each belongs to a single space, sorted
//! program space first and then by address, and guaranteed not to overlap.

mod raw;
mod symbol;

pub use raw::{
    FileHeader, LineRecord, RawName, RelocationRecord, SectionFlags, SectionHeader, SymbolRecord,
};
pub use symbol::{Region, StorageClass, Symbol};

use binrw::BinRead;
use easyerr::{Error, ResultExt};
use raw::NameRef;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek, SeekFrom};
use strum::Display;

/// Magic of Teak object files.
pub const MAGIC: u16 = 0x00C1;

/// Addresses that line number entries may use without belonging to their section.
const LINE_SENTINELS: std::ops::RangeInclusive<u32> = 0xFFFF_FFFD..=0xFFFF_FFFF;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Space {
    #[strum(to_string = "program")]
    Program,
    #[strum(to_string = "data")]
    Data,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("bad magic 0x{found:04X}")]
    BadMagic { found: u16 },
    #[error("data of section {section} is at 0x{found:X}, expected 0x{expected:X}")]
    OffsetMismatch {
        section: String,
        expected: u32,
        found: u32,
    },
    #[error("section {section} belongs to no address space")]
    NoRegion { section: String },
    #[error("program section {section} has data address 0x{address:X}")]
    ProgramSectionHasDataAddress { section: String, address: u32 },
    #[error("data section {section} has program address 0x{address:X}")]
    DataSectionHasProgramAddress { section: String, address: u32 },
    #[error("line {line} at 0x{address:08X} is outside of section {section}")]
    LineOutOfRange {
        section: String,
        address: u32,
        line: u16,
    },
    #[error("duplicate of section {section} does not match the original")]
    DuplicateMismatch { section: String },
    #[error("duplicate of section {section} has relocations or line numbers")]
    DuplicateHasDetail { section: String },
    #[error("symbol {symbol} at 0x{address:X} is outside of section {section}")]
    SymbolOutOfRange {
        symbol: String,
        section: String,
        address: u32,
    },
    #[error("{space} section {section} at 0x{address:X} overlaps the previous one")]
    Overlap {
        section: String,
        space: Space,
        address: u32,
    },
    #[error("symbol {symbol} refers to section {index} but there are only {count}")]
    SectionIndexOutOfRange {
        symbol: String,
        index: u16,
        count: usize,
    },
    #[error("name at string table offset 0x{offset:X} is not terminated")]
    UnterminatedName { offset: u32 },
    #[error(transparent)]
    Format { source: binrw::Error },
    #[error(transparent)]
    Io { source: std::io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    /// Address relative to the start of the section.
    pub address: u32,
    /// Index into [`Coff::symbols`].
    pub symbol: u32,
    pub kind: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    /// Index into [`Coff::symbols`] of the symbol this line belongs to.
    pub symbol: u32,
    pub line: u16,
}

#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub flags: SectionFlags,
    pub program_address: u32,
    pub data_address: u32,
    pub data: Vec<u8>,
    /// Relocations, keyed by address relative to the start of the section.
    pub relocations: BTreeMap<u32, Vec<Relocation>>,
    /// Line numbers, keyed by absolute program address.
    pub lines: BTreeMap<u32, Vec<LineNumber>>,
    /// Size in bytes given by the header. Duplicates have no bytes of their own.
    size: u32,
}

impl Section {
    pub fn space(&self) -> Space {
        if self.flags.program() {
            Space::Program
        } else {
            Space::Data
        }
    }

    /// Base address in the section's space.
    pub fn address(&self) -> u32 {
        match self.space() {
            Space::Program => self.program_address,
            Space::Data => self.data_address,
        }
    }

    /// Length in words.
    pub fn len(&self) -> u32 {
        (self.data.len() / 2) as u32
    }

    /// Address right after the last word of the section.
    pub fn end(&self) -> u32 {
        self.address().wrapping_add(self.len())
    }

    pub fn words(&self) -> impl Iterator<Item = u16> + '_ {
        self.data
            .chunks_exact(2)
            .map(|w| u16::from_le_bytes([w[0], w[1]]))
    }

    fn validate_region(&self) -> Result<(), ParseError> {
        let section = || self.name.clone();
        match (self.flags.program(), self.flags.data()) {
            (false, false) => Err(ParseError::NoRegion { section: section() }),
            (true, false) if self.data_address != 0 => {
                Err(ParseError::ProgramSectionHasDataAddress {
                    section: section(),
                    address: self.data_address,
                })
            }
            (false, true) if self.program_address != 0 => {
                Err(ParseError::DataSectionHasProgramAddress {
                    section: section(),
                    address: self.program_address,
                })
            }
            _ => Ok(()),
        }
    }

    /// Length in words given by the header.
    fn declared_len(&self) -> u32 {
        self.size / 2
    }

    fn has_detail(&self) -> bool {
        !self.relocations.is_empty() || !self.lines.is_empty()
    }
}

/// A parsed object file.
#[derive(Debug, Clone)]
pub struct Coff {
    pub timestamp: u32,
    /// Program sections by ascending address, then data sections by ascending address.
    pub sections: Vec<Section>,
    /// Every symbol record, auxiliary records included as [`Region::Aux`] placeholders.
    pub symbols: Vec<Symbol>,
    /// Indices of bound symbols, keyed by address.
    symbol_lut: BTreeMap<u32, Vec<usize>>,
}

fn read_name(
    mut reader: impl Read + Seek,
    name: &RawName,
    strings: u64,
) -> Result<String, ParseError> {
    let offset = match name.get() {
        NameRef::Inline(bytes) => return Ok(String::from_utf8_lossy(bytes).into_owned()),
        NameRef::Table(offset) => offset,
    };

    reader
        .seek(SeekFrom::Start(strings + u64::from(offset)))
        .context(ParseCtx::Io)?;

    let mut bytes = Vec::new();
    loop {
        let mut byte = [0];
        match reader.read_exact(&mut byte) {
            Ok(()) if byte[0] == 0 => break,
            Ok(()) => bytes.push(byte[0]),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ParseError::UnterminatedName { offset });
            }
            Err(source) => return Err(ParseError::Io { source }),
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl Coff {
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        Self::read(Cursor::new(bytes))
    }

    pub fn read(mut reader: impl Read + Seek) -> Result<Self, ParseError> {
        reader.seek(SeekFrom::Start(0)).context(ParseCtx::Io)?;
        let header = FileHeader::read(&mut reader).context(ParseCtx::Format)?;
        if header.magic != MAGIC {
            return Err(ParseError::BadMagic {
                found: header.magic,
            });
        }

        let symbols_start = u64::from(header.symbol_offset);
        let strings = symbols_start + u64::from(header.symbol_count) * SymbolRecord::SIZE;

        let mut sections = Vec::with_capacity(header.section_count as usize);
        let mut expected = 0u32;
        for i in 0..u64::from(header.section_count) {
            let offset = FileHeader::SIZE
                + u64::from(header.optional_header_size)
                + i * SectionHeader::SIZE;

            reader.seek(SeekFrom::Start(offset)).context(ParseCtx::Io)?;
            let sheader = SectionHeader::read(&mut reader).context(ParseCtx::Format)?;
            let name = read_name(&mut reader, &sheader.name, strings)?;
            let flags = SectionFlags::from_bits(sheader.flags);

            if expected == 0 {
                expected = sheader.data_offset;
            }

            if sheader.data_offset != expected {
                return Err(ParseError::OffsetMismatch {
                    section: name,
                    expected,
                    found: sheader.data_offset,
                });
            }

            // duplicates carry no bytes of their own
            let mut data = Vec::new();
            if !flags.duplicate() {
                reader
                    .seek(SeekFrom::Start(sheader.data_offset.into()))
                    .context(ParseCtx::Io)?;

                let read = (&mut reader)
                    .take(sheader.size.into())
                    .read_to_end(&mut data)
                    .context(ParseCtx::Io)?;

                if read != sheader.size as usize {
                    return Err(ParseError::Io {
                        source: std::io::ErrorKind::UnexpectedEof.into(),
                    });
                }

                expected = expected.wrapping_add(sheader.size);
            }

            let mut section = Section {
                name,
                flags,
                program_address: sheader.program_address,
                data_address: sheader.data_address,
                data,
                relocations: BTreeMap::new(),
                lines: BTreeMap::new(),
                size: sheader.size,
            };
            section.validate_region()?;

            reader
                .seek(SeekFrom::Start(sheader.line_offset.into()))
                .context(ParseCtx::Io)?;

            let mut current_symbol = 0;
            for _ in 0..sheader.line_count {
                let record = LineRecord::read(&mut reader).context(ParseCtx::Format)?;
                if record.line == 0 {
                    current_symbol = record.value;
                    continue;
                }

                let address = record.value;
                let start = section.program_address;
                let end = start.wrapping_add(section.declared_len());
                if !(start..end).contains(&address) && !LINE_SENTINELS.contains(&address) {
                    return Err(ParseError::LineOutOfRange {
                        section: section.name,
                        address,
                        line: record.line,
                    });
                }

                section.lines.entry(address).or_default().push(LineNumber {
                    symbol: current_symbol,
                    line: record.line,
                });
            }

            reader
                .seek(SeekFrom::Start(sheader.relocation_offset.into()))
                .context(ParseCtx::Io)?;

            for _ in 0..sheader.relocation_count {
                let record = RelocationRecord::read(&mut reader).context(ParseCtx::Format)?;
                section
                    .relocations
                    .entry(record.address)
                    .or_default()
                    .push(Relocation {
                        address: record.address,
                        symbol: record.symbol,
                        kind: record.kind,
                    });
            }

            tracing::debug!(
                "section {} (flags 0x{:08X}): program 0x{:05X}, data 0x{:04X}, {} bytes",
                section.name,
                sheader.flags,
                section.program_address,
                section.data_address,
                section.size
            );

            sections.push(section);
        }

        let mut symbols = Vec::new();
        let mut symbol_lut: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        let mut index = 0;
        while index < header.symbol_count {
            let offset = symbols_start + u64::from(index) * SymbolRecord::SIZE;
            reader.seek(SeekFrom::Start(offset)).context(ParseCtx::Io)?;

            let record = SymbolRecord::read(&mut reader).context(ParseCtx::Format)?;
            let name = read_name(&mut reader, &record.name, strings)?;
            let (region, value) = match record.section_index {
                1..0x7FFF => {
                    let Some(section) = sections.get(usize::from(record.section_index - 1)) else {
                        return Err(ParseError::SectionIndexOutOfRange {
                            symbol: name,
                            index: record.section_index,
                            count: sections.len(),
                        });
                    };

                    let (region, base) = if section.flags.program() {
                        (Region::Program, section.program_address)
                    } else {
                        (Region::Data, section.data_address)
                    };

                    // one past the end is accepted as an end label
                    let value = base.wrapping_add(record.value);
                    if record.value > section.declared_len() {
                        return Err(ParseError::SymbolOutOfRange {
                            symbol: name,
                            section: section.name.clone(),
                            address: value,
                        });
                    }

                    (region, value)
                }
                _ => (Region::Absolute, record.value),
            };

            let symbol = Symbol {
                name,
                value,
                region,
                kind: record.kind,
                storage: StorageClass(record.storage),
                aux_count: record.aux_count,
            };

            if region.space().is_some() {
                symbol_lut.entry(value).or_default().push(symbols.len());
            }

            let aux = Symbol {
                region: Region::Aux,
                ..symbol.clone()
            };

            symbols.push(symbol);
            symbols.extend(std::iter::repeat_n(aux, record.aux_count.into()));
            index += 1 + u32::from(record.aux_count);
        }

        let sections = normalize(sections)?;
        tracing::info!(
            "loaded {} sections and {} symbols",
            sections.len(),
            symbols.len()
        );

        Ok(Self {
            timestamp: header.timestamp,
            sections,
            symbols,
            symbol_lut,
        })
    }

    pub fn symbol(&self, index: u32) -> Option<&Symbol> {
        self.symbols.get(index as usize)
    }

    /// Symbols bound to the given address of the given space, in file order.
    pub fn symbols_at(&self, space: Space, address: u32) -> impl Iterator<Item = &Symbol> {
        self.symbol_lut
            .get(&address)
            .into_iter()
            .flatten()
            .map(|&i| &self.symbols[i])
            .filter(move |s| s.region.space() == Some(space))
    }
}

/// Merges duplicated sections, splits shared sections, sorts, and checks for overlaps.
fn normalize(sections: Vec<Section>) -> Result<Vec<Section>, ParseError> {
    let (duplicates, mut sections): (Vec<_>, Vec<_>) =
        sections.into_iter().partition(|s| s.flags.duplicate());

    for duplicate in duplicates {
        let original = sections
            .iter()
            .find(|s| s.name == duplicate.name)
            .filter(|s| {
                s.program_address == duplicate.program_address
                    && s.data_address == duplicate.data_address
                    && s.size == duplicate.size
                    && s.flags.with_duplicate(true) == duplicate.flags
            });

        if original.is_none() {
            return Err(ParseError::DuplicateMismatch {
                section: duplicate.name,
            });
        }

        if duplicate.has_detail() {
            return Err(ParseError::DuplicateHasDetail {
                section: duplicate.name,
            });
        }
    }

    let mut split = Vec::new();
    for section in &mut sections {
        if section.flags.is_shared() {
            let mut program = section.clone();
            program.flags = program.flags.with_data(false);
            program.data_address = 0;
            split.push(program);

            section.flags = section.flags.with_program(false);
            section.program_address = 0;
        }
    }

    sections.extend(split);
    sections.sort_by_key(|s| (s.space(), s.address(), s.data.len()));

    let mut ends = [0u32; 2];
    for section in &sections {
        let end = &mut ends[section.space() as usize];
        if section.address() < *end {
            return Err(ParseError::Overlap {
                section: section.name.clone(),
                space: section.space(),
                address: section.address(),
            });
        }

        *end = section.end();
    }

    Ok(sections)
}

#[cfg(test)]
mod test {
    use super::*;
    use binrw::BinWrite;

    struct TestSection {
        name: &'static str,
        flags: SectionFlags,
        program_address: u32,
        data_address: u32,
        words: Vec<u16>,
        lines: Vec<LineRecord>,
        relocations: Vec<RelocationRecord>,
    }

    impl TestSection {
        fn program(name: &'static str, address: u32, words: Vec<u16>) -> Self {
            Self {
                name,
                flags: SectionFlags::default()
                    .with_program(true)
                    .with_executable(true),
                program_address: address,
                data_address: 0,
                words,
                lines: vec![],
                relocations: vec![],
            }
        }

        fn data(name: &'static str, address: u32, words: Vec<u16>) -> Self {
            Self {
                name,
                flags: SectionFlags::default().with_data(true),
                program_address: 0,
                data_address: address,
                words,
                lines: vec![],
                relocations: vec![],
            }
        }
    }

    /// Lays out an object file: header, section headers, section bytes, lines, relocations,
    /// symbols, strings.
    fn build(sections: &[TestSection], symbols: &[SymbolRecord], strings: &[u8]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let headers_end = FileHeader::SIZE + sections.len() as u64 * SectionHeader::SIZE;

        let mut offset = headers_end as u32;
        let mut headers = vec![];
        let mut body = vec![];
        for section in sections {
            let size = section.words.len() as u32 * 2;
            let data_offset = offset;
            if !section.flags.duplicate() {
                offset += size;
            }

            headers.push((section, size, data_offset));
        }

        for (section, size, data_offset) in headers {
            let line_offset = offset;
            offset += section.lines.len() as u32 * 6;
            let relocation_offset = offset;
            offset += section.relocations.len() as u32 * 12;

            body.push(SectionHeader {
                name: RawName::inline(section.name),
                program_address: section.program_address,
                data_address: section.data_address,
                size,
                data_offset,
                relocation_offset,
                line_offset,
                relocation_count: section.relocations.len() as u16,
                line_count: section.lines.len() as u16,
                flags: section.flags.to_bits(),
            });
        }

        FileHeader {
            magic: MAGIC,
            section_count: sections.len() as u16,
            timestamp: 0x1234_5678,
            symbol_offset: offset,
            symbol_count: symbols.len() as u32,
            optional_header_size: 0,
            flags: 0,
        }
        .write(&mut cursor)
        .unwrap();

        for header in &body {
            header.write(&mut cursor).unwrap();
        }

        for section in sections.iter().filter(|s| !s.flags.duplicate()) {
            for word in &section.words {
                cursor.get_mut().extend_from_slice(&word.to_le_bytes());
            }
        }

        cursor.set_position(cursor.get_ref().len() as u64);
        for section in sections {
            for line in &section.lines {
                line.write(&mut cursor).unwrap();
            }

            for relocation in &section.relocations {
                relocation.write(&mut cursor).unwrap();
            }
        }

        for symbol in symbols {
            symbol.write(&mut cursor).unwrap();
        }

        let mut bytes = cursor.into_inner();
        bytes.extend_from_slice(strings);
        bytes
    }

    fn symbol(name: &str, section_index: u16, value: u32, storage: u8) -> SymbolRecord {
        SymbolRecord {
            name: RawName::inline(name),
            value,
            section_index,
            kind: 0,
            storage,
            aux_count: 0,
        }
    }

    #[test]
    fn bad_magic() {
        let mut bytes = build(&[], &[], &[]);
        bytes[0] = 0xC2;

        let result = Coff::parse(&bytes);
        assert!(matches!(
            result,
            Err(ParseError::BadMagic { found: 0x00C2 })
        ));
    }

    #[test]
    fn huge_symbol_count() {
        let mut bytes = build(&[], &[], &[]);
        bytes[12..16].copy_from_slice(&u32::MAX.to_le_bytes());

        assert!(matches!(
            Coff::parse(&bytes),
            Err(ParseError::Format { .. })
        ));
    }

    #[test]
    fn huge_section_size() {
        let size = FileHeader::SIZE as usize + 16;
        let mut bytes = build(&[TestSection::program("text", 0, vec![1, 2])], &[], &[]);
        bytes[size..size + 4].copy_from_slice(&0x7FFF_FFFFu32.to_le_bytes());

        assert!(matches!(
            Coff::parse(&bytes),
            Err(ParseError::Io { .. })
        ));

        let mut duplicate = TestSection::program("text", 0, vec![0]);
        duplicate.flags = duplicate.flags.with_duplicate(true);
        let original = TestSection::program("text", 0, vec![1]);
        let mut bytes = build(&[original, duplicate], &[], &[]);

        let size = size + SectionHeader::SIZE as usize;
        bytes[size..size + 4].copy_from_slice(&0xFFFF_FFFEu32.to_le_bytes());
        assert!(matches!(
            Coff::parse(&bytes),
            Err(ParseError::DuplicateMismatch { .. })
        ));
    }

    #[test]
    fn two_sections() {
        let bytes = build(
            &[
                TestSection::data("data", 0x100, vec![0xAAAA, 0xBBBB]),
                TestSection::program("text", 0x10, vec![0x0000, 0x57F0, 0x1234]),
            ],
            &[],
            &[],
        );

        let coff = Coff::parse(&bytes).unwrap();
        assert_eq!(coff.timestamp, 0x1234_5678);
        assert_eq!(coff.sections.len(), 2);

        let text = &coff.sections[0];
        assert_eq!(text.name, "text");
        assert_eq!(text.space(), Space::Program);
        assert_eq!(text.address(), 0x10);
        assert_eq!(text.words().collect::<Vec<_>>(), [0x0000, 0x57F0, 0x1234]);

        let data = &coff.sections[1];
        assert_eq!(data.name, "data");
        assert_eq!(data.space(), Space::Data);
        assert_eq!(data.address(), 0x100);
        assert_eq!(data.data, [0xAA, 0xAA, 0xBB, 0xBB]);
    }

    #[test]
    fn offset_mismatch() {
        let mut bytes = build(
            &[
                TestSection::program("a", 0, vec![1, 2]),
                TestSection::program("b", 2, vec![3]),
            ],
            &[],
            &[],
        );

        // second section header, data offset field
        let field = (FileHeader::SIZE + SectionHeader::SIZE + 20) as usize;
        bytes[field] += 2;

        assert!(matches!(
            Coff::parse(&bytes),
            Err(ParseError::OffsetMismatch { .. })
        ));
    }

    #[test]
    fn region_checks() {
        let mut section = TestSection::program("text", 0, vec![0]);
        section.data_address = 4;
        assert!(matches!(
            Coff::parse(&build(&[section], &[], &[])),
            Err(ParseError::ProgramSectionHasDataAddress { address: 4, .. })
        ));

        let mut section = TestSection::data("data", 0, vec![0]);
        section.program_address = 8;
        assert!(matches!(
            Coff::parse(&build(&[section], &[], &[])),
            Err(ParseError::DataSectionHasProgramAddress { address: 8, .. })
        ));

        let mut section = TestSection::data("none", 0, vec![0]);
        section.flags = SectionFlags::default();
        assert!(matches!(
            Coff::parse(&build(&[section], &[], &[])),
            Err(ParseError::NoRegion { .. })
        ));
    }

    #[test]
    fn overlap() {
        let bytes = build(
            &[
                TestSection::program("a", 0x10, vec![0; 4]),
                TestSection::program("b", 0x12, vec![0; 4]),
                TestSection::data("c", 0x10, vec![0; 4]),
            ],
            &[],
            &[],
        );

        assert!(matches!(
            Coff::parse(&bytes),
            Err(ParseError::Overlap {
                space: Space::Program,
                address: 0x12,
                ..
            })
        ));

        // same addresses in different spaces are fine
        let bytes = build(
            &[
                TestSection::program("a", 0x10, vec![0; 4]),
                TestSection::data("b", 0x10, vec![0; 4]),
                TestSection::data("c", 0x14, vec![0; 1]),
            ],
            &[],
            &[],
        );
        assert_eq!(Coff::parse(&bytes).unwrap().sections.len(), 3);
    }

    #[test]
    fn shared_sections_are_split() {
        let mut shared = TestSection::program("shared", 0x200, vec![7, 8]);
        shared.flags = shared.flags.with_data(true);
        shared.data_address = 0x40;

        let coff = Coff::parse(&build(&[shared], &[], &[])).unwrap();
        assert_eq!(coff.sections.len(), 2);

        let program = &coff.sections[0];
        assert_eq!(program.space(), Space::Program);
        assert_eq!((program.program_address, program.data_address), (0x200, 0));
        assert!(!program.flags.data());

        let data = &coff.sections[1];
        assert_eq!(data.space(), Space::Data);
        assert_eq!((data.program_address, data.data_address), (0, 0x40));
        assert_eq!(data.words().collect::<Vec<_>>(), [7, 8]);
    }

    #[test]
    fn duplicates_are_merged() {
        let mut original = TestSection::program("text", 0, vec![1, 2, 3]);
        original.lines = vec![
            LineRecord { value: 0, line: 0 },
            LineRecord { value: 1, line: 10 },
            LineRecord {
                value: 0xFFFF_FFFE,
                line: 11,
            },
        ];

        let mut duplicate = TestSection::program("text", 0, vec![0, 0, 0]);
        duplicate.flags = duplicate.flags.with_duplicate(true);

        let coff = Coff::parse(&build(&[original, duplicate], &[], &[])).unwrap();
        assert_eq!(coff.sections.len(), 1);
        assert_eq!(coff.sections[0].words().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(
            coff.sections[0].lines[&1],
            [LineNumber {
                symbol: 0,
                line: 10
            }]
        );

        let mut duplicate = TestSection::program("text", 4, vec![0, 0, 0]);
        duplicate.flags = duplicate.flags.with_duplicate(true);
        let original = TestSection::program("text", 0, vec![1, 2, 3]);
        assert!(matches!(
            Coff::parse(&build(&[original, duplicate], &[], &[])),
            Err(ParseError::DuplicateMismatch { .. })
        ));

        let mut duplicate = TestSection::program("text", 0, vec![0]);
        duplicate.flags = duplicate.flags.with_duplicate(true);
        duplicate.relocations = vec![RelocationRecord::default()];
        let original = TestSection::program("text", 0, vec![1]);
        assert!(matches!(
            Coff::parse(&build(&[original, duplicate], &[], &[])),
            Err(ParseError::DuplicateHasDetail { .. })
        ));
    }

    #[test]
    fn line_out_of_range() {
        let mut section = TestSection::program("text", 0x10, vec![0; 2]);
        section.lines = vec![LineRecord {
            value: 0x12,
            line: 3,
        }];

        assert!(matches!(
            Coff::parse(&build(&[section], &[], &[])),
            Err(ParseError::LineOutOfRange {
                address: 0x12,
                line: 3,
                ..
            })
        ));
    }

    #[test]
    fn symbols() {
        let mut text = TestSection::program("text", 0x100, vec![0; 4]);
        text.relocations = vec![RelocationRecord {
            address: 1,
            symbol: 3,
            kind: 0x10,
        }];

        let mut file = symbol("", 0xFFFE, 0, 103);
        file.name = RawName::table(0);
        file.aux_count = 1;

        let symbols = [
            file,
            SymbolRecord::default(),
            symbol("abs", 0, 0x42, 2),
            symbol("main", 1, 0, 101),
            symbol("end", 1, 4, 0),
            symbol("var", 2, 1, 3),
        ];

        let coff = Coff::parse(&build(
            &[text, TestSection::data("data", 0x80, vec![0; 2])],
            &symbols,
            b"a_very_long_file_name.c\0",
        ))
        .unwrap();

        assert_eq!(coff.symbols.len(), 6);
        assert_eq!(coff.symbols[0].name, "a_very_long_file_name.c");
        assert_eq!(coff.symbols[0].region, Region::Absolute);
        assert_eq!(coff.symbols[1].region, Region::Aux);
        assert_eq!(coff.symbols[2].value, 0x42);
        assert_eq!(coff.symbols[3].value, 0x100);
        assert_eq!(coff.symbols[3].storage.to_string(), "func");
        assert_eq!(coff.symbols[4].value, 0x104);
        assert_eq!(coff.symbols[5].region, Region::Data);
        assert_eq!(coff.symbols[5].value, 0x81);

        let at = |space, addr| {
            coff.symbols_at(space, addr)
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(at(Space::Program, 0x100), ["main"]);
        assert_eq!(at(Space::Data, 0x81), ["var"]);
        assert!(at(Space::Data, 0x100).is_empty());

        let relocation = coff.sections[0].relocations[&1][0];
        assert_eq!(coff.symbol(relocation.symbol).unwrap().name, "main");
    }

    #[test]
    fn symbol_out_of_range() {
        let text = TestSection::program("text", 0x100, vec![0; 4]);
        let symbols = [symbol("far", 1, 5, 0)];
        assert!(matches!(
            Coff::parse(&build(&[text], &symbols, &[])),
            Err(ParseError::SymbolOutOfRange {
                address: 0x105,
                ..
            })
        ));

        let text = TestSection::program("text", 0x100, vec![0; 4]);
        let symbols = [symbol("lost", 3, 0, 0)];
        assert!(matches!(
            Coff::parse(&build(&[text], &symbols, &[])),
            Err(ParseError::SectionIndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn unterminated_name() {
        let mut file = symbol("", 0, 0, 103);
        file.name = RawName::table(0);

        assert!(matches!(
            Coff::parse(&build(&[], &[file], b"abc")),
            Err(ParseError::UnterminatedName { offset: 0 })
        ));
    }
}
