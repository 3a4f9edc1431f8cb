//! Shared memory and the memory interface unit.
//!
//! Program and data space live in one block of 0x40000 little-endian words. Program space maps
//! the first half word for word, data space is translated by the [`Miu`] into the second half.

use bitos::{bitos, integer::u6};
use util::boxed_array;
use zerocopy::{IntoBytes, byteorder::little_endian::U16};

pub const MEMORY_WORDS: usize = 0x40000;
pub const MEMORY_BYTES: usize = MEMORY_WORDS * 2;

/// Word offset of data space inside shared memory.
pub const DATA_OFFSET: u32 = 0x20000;

/// Size of the MMIO window, in words.
pub const MMIO_LEN: u16 = 0x800;

const PAGE_SIZE_UNIT: u32 = 0x400;

pub struct Memory {
    words: Box<[U16; MEMORY_WORDS]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            words: boxed_array(U16::new(0)),
        }
    }
}

impl Memory {
    #[inline(always)]
    pub fn read(&self, addr: u32) -> u16 {
        self.words[addr as usize & (MEMORY_WORDS - 1)].get()
    }

    #[inline(always)]
    pub fn write(&mut self, addr: u32, value: u16) {
        self.words[addr as usize & (MEMORY_WORDS - 1)] = U16::new(value);
    }

    #[inline(always)]
    pub fn read_data(&self, addr: u32) -> u16 {
        self.read(DATA_OFFSET + (addr & 0x1FFFF))
    }

    #[inline(always)]
    pub fn write_data(&mut self, addr: u32, value: u16) {
        self.write(DATA_OFFSET + (addr & 0x1FFFF), value);
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.words.as_bytes()
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        self.words.as_mut_bytes()
    }

    pub fn clear(&mut self) {
        self.words.fill(U16::new(0));
    }
}

/// `MIU_PAGE0CFG`/`MIU_PAGE1CFG`: sizes of the X and Y pages, in units of 0x400 words.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct PageConfig {
    #[bits(0..6)]
    pub x_size: u6,
    #[bits(8..14)]
    pub y_size: u6,
}

/// `MIU_PAGEMODE`.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct PageMode {
    #[bits(6)]
    pub mode: bool,
}

#[derive(Debug, Clone)]
pub struct Miu {
    pub x_page: u16,
    pub y_page: u16,
    pub z_page: u16,
    pub page_config: [PageConfig; 2],
    pub page_mode: PageMode,
    pub mmio_base: u16,
}

impl Default for Miu {
    fn default() -> Self {
        let config = PageConfig::default()
            .with_x_size(u6::new(0x20))
            .with_y_size(u6::new(0x1E));

        Self {
            x_page: 0,
            y_page: 0,
            z_page: 0,
            page_config: [config; 2],
            page_mode: PageMode::default(),
            mmio_base: 0x8000,
        }
    }
}

impl Miu {
    #[inline(always)]
    pub fn in_mmio(&self, addr: u16) -> bool {
        addr >= self.mmio_base && (addr - self.mmio_base) < MMIO_LEN
    }

    /// Translates a data address into a word offset inside data space.
    pub fn translate(&self, addr: u16) -> u32 {
        let config = self.page_config[self.page_mode.mode() as usize];
        let x_end = config.x_size().value() as u32 * PAGE_SIZE_UNIT;
        let y_end = x_end + config.y_size().value() as u32 * PAGE_SIZE_UNIT;

        let addr = addr as u32;
        let page = if addr < x_end {
            self.x_page
        } else if addr < y_end {
            self.y_page
        } else {
            self.z_page
        };

        (((page as u32) << 16) | addr) & 0x1FFFF
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn words_are_little_endian() {
        let mut mem = Memory::default();
        mem.write(1, 0xABCD);
        assert_eq!(&mem.as_bytes()[2..4], &[0xCD, 0xAB]);

        mem.as_mut_bytes()[4] = 0x34;
        mem.as_mut_bytes()[5] = 0x12;
        assert_eq!(mem.read(2), 0x1234);
    }

    #[test]
    fn addresses_wrap() {
        let mut mem = Memory::default();
        mem.write(MEMORY_WORDS as u32 + 5, 7);
        assert_eq!(mem.read(5), 7);

        mem.write_data(0x20003, 9);
        assert_eq!(mem.read(DATA_OFFSET + 3), 9);
    }

    #[test]
    fn default_translation_is_identity() {
        let miu = Miu::default();
        for addr in [0x0000, 0x1234, 0x7FFF, 0x8800, 0xFFFF] {
            assert_eq!(miu.translate(addr), addr as u32);
        }
    }

    #[test]
    fn pages_offset_addresses() {
        let mut miu = Miu::default();
        miu.x_page = 1;
        assert_eq!(miu.translate(0x0010), 0x10010);
        assert_eq!(miu.translate(0xFFF0), 0xFFF0);

        miu.z_page = 1;
        assert_eq!(miu.translate(0xFFF0), 0x1FFF0);
    }

    #[test]
    fn mmio_window_follows_base() {
        let mut miu = Miu::default();
        assert!(miu.in_mmio(0x8000));
        assert!(miu.in_mmio(0x87FF));
        assert!(!miu.in_mmio(0x8800));
        assert!(!miu.in_mmio(0x7FFF));

        miu.mmio_base = 0xF800;
        assert!(miu.in_mmio(0xFFFF));
        assert!(!miu.in_mmio(0x8000));
    }
}
