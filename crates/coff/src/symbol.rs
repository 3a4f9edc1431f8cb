use crate::Space;

/// Where a symbol's value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Placeholder for an auxiliary record, keeping symbol indices stable.
    Aux,
    Absolute,
    Program,
    Data,
}

impl Region {
    pub fn space(self) -> Option<Space> {
        match self {
            Region::Program => Some(Space::Program),
            Region::Data => Some(Space::Data),
            _ => None,
        }
    }
}

/// Storage class of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageClass(pub u8);

impl StorageClass {
    pub fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "label",
            1 => "auto",
            2 => "external",
            3 => "static",
            4 => "register",
            8 => "struct",
            9 => "arg",
            10 => "struct-tag",
            11 => "union",
            12 => "union-tag",
            13 => "typedef",
            15 => "enum-tag",
            16 => "enum",
            18 => "bitfield",
            19 => "auto-arg",
            98 => "start",
            99 => "end",
            100 => "block",
            101 => "func",
            102 => "struct-size",
            103 => "file",
            107..=112 => "ar",
            255 => "physical-function-end",
            _ => return None,
        })
    }

    /// For `.ar` symbols, which indirect addressing register they configure: `0..2` are `ar0`
    /// and `ar1`, `2..6` are `arp0` to `arp3`.
    pub fn ar_register(self) -> Option<usize> {
        matches!(self.0, 107..=112).then(|| usize::from(self.0 - 107))
    }
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "storage-{:02X}", self.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    /// Absolute address for bound symbols, raw value otherwise.
    pub value: u32,
    pub region: Region,
    pub kind: u16,
    pub storage: StorageClass,
    /// Number of auxiliary records following this symbol.
    pub aux_count: u8,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn storage_names() {
        assert_eq!(StorageClass(0).to_string(), "label");
        assert_eq!(StorageClass(101).to_string(), "func");
        assert_eq!(StorageClass(110).to_string(), "ar");
        assert_eq!(StorageClass(255).to_string(), "physical-function-end");
        assert_eq!(StorageClass(5).to_string(), "storage-05");
    }

    #[test]
    fn ar_registers() {
        assert_eq!(StorageClass(107).ar_register(), Some(0));
        assert_eq!(StorageClass(112).ar_register(), Some(5));
        assert_eq!(StorageClass(2).ar_register(), None);
    }
}
