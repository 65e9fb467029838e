use core::fmt::{Display, Formatter, Result};

/// Packing method of a header record, stored as a little-endian `u32`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Payload is stored as-is
    Uncompressed,
    /// Payload is stored compressed (`srpC` on disk)
    Packed,
    /// Record is the archive's product entry, followed by key/value pairs (`sreV` on disk)
    ProductEntry,
    Unknown(u32),
}

impl Flag {
    pub const UNCOMPRESSED: u32 = 0x0000_0000;
    pub const PACKED: u32 = 0x4370_7273;
    pub const PRODUCT_ENTRY: u32 = 0x5665_7273;

    pub fn bits(&self) -> u32 {
        match *self {
            Flag::Uncompressed => Self::UNCOMPRESSED,
            Flag::Packed => Self::PACKED,
            Flag::ProductEntry => Self::PRODUCT_ENTRY,
            Flag::Unknown(bits) => bits,
        }
    }
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Uncompressed
    }
}

impl From<u32> for Flag {
    fn from(value: u32) -> Self {
        match value {
            Self::UNCOMPRESSED => Flag::Uncompressed,
            Self::PACKED => Flag::Packed,
            Self::PRODUCT_ENTRY => Flag::ProductEntry,
            bits => Flag::Unknown(bits),
        }
    }
}

impl From<Flag> for u32 {
    fn from(flag: Flag) -> u32 {
        flag.bits()
    }
}

impl Display for Flag {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Flag::Uncompressed => write!(f, "Uncompressed"),
            Flag::Packed => write!(f, "Packed"),
            Flag::ProductEntry => write!(f, "ProductEntry"),
            Flag::Unknown(bits) => write!(f, "Unknown({:#010x})", bits),
        }
    }
}
