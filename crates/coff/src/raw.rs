//! On-disk records. Everything is little endian and tightly packed.

use binrw::{BinRead, BinWrite};
use bitos::bitos;

/// Name of a section or symbol: either up to 8 inline bytes, or a zero word followed by an
/// offset into the string table.
#[derive(Debug, Clone, Copy, Default, BinRead, BinWrite)]
pub struct RawName(pub [u8; 8]);

pub enum NameRef<'a> {
    Inline(&'a [u8]),
    Table(u32),
}

impl RawName {
    pub fn inline(name: &str) -> Self {
        let mut bytes = [0; 8];
        let len = name.len().min(8);
        bytes[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self(bytes)
    }

    pub fn table(offset: u32) -> Self {
        let mut bytes = [0; 8];
        bytes[4..].copy_from_slice(&offset.to_le_bytes());
        Self(bytes)
    }

    pub fn get(&self) -> NameRef<'_> {
        let [a, b, c, d, e, f, g, h] = self.0;
        if u32::from_le_bytes([a, b, c, d]) == 0 {
            return NameRef::Table(u32::from_le_bytes([e, f, g, h]));
        }

        let len = self.0.iter().position(|b| *b == 0).unwrap_or(8);
        NameRef::Inline(&self.0[..len])
    }
}

#[derive(Debug, Clone, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct FileHeader {
    pub magic: u16,
    pub section_count: u16,
    pub timestamp: u32,
    pub symbol_offset: u32,
    pub symbol_count: u32,
    pub optional_header_size: u16,
    pub flags: u16,
}

impl FileHeader {
    pub const SIZE: u64 = 20;
}

#[derive(Debug, Clone, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct SectionHeader {
    pub name: RawName,
    pub program_address: u32,
    pub data_address: u32,
    /// Size in bytes.
    pub size: u32,
    pub data_offset: u32,
    pub relocation_offset: u32,
    pub line_offset: u32,
    pub relocation_count: u16,
    pub line_count: u16,
    pub flags: u32,
}

impl SectionHeader {
    pub const SIZE: u64 = 40;
}

#[derive(Debug, Clone, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct SymbolRecord {
    pub name: RawName,
    pub value: u32,
    pub section_index: u16,
    pub kind: u16,
    pub storage: u8,
    pub aux_count: u8,
}

impl SymbolRecord {
    pub const SIZE: u64 = 18;
}

/// A line number entry. Line zero marks the symbol that the following entries belong to, in
/// which case `value` is a symbol index instead of an address.
#[derive(Debug, Clone, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct LineRecord {
    pub value: u32,
    pub line: u16,
}

#[derive(Debug, Clone, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct RelocationRecord {
    pub address: u32,
    pub symbol: u32,
    pub kind: u32,
}

#[bitos(32)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionFlags {
    #[bits(0)]
    pub executable: bool,
    #[bits(3)]
    pub program: bool,
    #[bits(4)]
    pub data: bool,
    #[bits(7)]
    pub duplicate: bool,
}

impl SectionFlags {
    /// Whether the section belongs to both address spaces at once.
    pub fn is_shared(self) -> bool {
        self.program() && self.data()
    }
}
