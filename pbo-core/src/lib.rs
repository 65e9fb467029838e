//! Core data types of the Bohemia Interactive PBO archive format.
//!
//! A pbo starts with a header table of NUL-terminated names followed by five
//! little-endian `u32` fields, ended by an all-zero sentinel record. The
//! payloads of all entries follow the table, back to back, in header order.

pub use crate::entry::{Entry, EntryFields};
pub use crate::error::Error;
pub use crate::extension::Extension;
pub use crate::flags::Flag;
pub use crate::header::{Header, HeaderRecord};
pub use crate::reader::EntryReader;
pub use crate::src::{PboBuf, PboSrc};

mod entry;
mod error;
mod extension;
mod flags;
mod header;
mod reader;
mod src;
#[cfg(test)]
mod test;

use core::mem;

/// Size of the fixed-width fields of a header record
pub const FIELDS_SIZE: usize = mem::size_of::<EntryFields>();
/// Size of the sentinel record ending the header table
pub const SENTINEL_SIZE: usize = FIELDS_SIZE + 1;

#[cfg(test)]
mod tests {
    use core::mem;

    use crate::{Entry, EntryFields, FIELDS_SIZE, SENTINEL_SIZE};

    #[test]
    fn fields_size() {
        assert_eq!(mem::size_of::<EntryFields>(), 20);
        assert_eq!(FIELDS_SIZE, 20);
    }

    #[test]
    fn sentinel_size() {
        assert_eq!(Entry::sentinel().header_size(), SENTINEL_SIZE as u64);
        assert_eq!(SENTINEL_SIZE, 21);
    }
}
