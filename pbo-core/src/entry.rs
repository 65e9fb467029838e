//! Header records, as they appear in the header table of a pbo
use std::borrow::Cow;
use std::fmt::{self, Display};
use std::io::{BufRead, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytemuck::{Pod, Zeroable};

use crate::{Error, Flag, FIELDS_SIZE};

/// The fixed-width part of a header record, which follows the NUL-terminated
/// name. All fields are little-endian on disk.
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct EntryFields {
    pub flag: u32,
    pub unpacked_size: u32,
    pub reserved: u32,
    pub timestamp: u32,
    pub data_block_size: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    name: Vec<u8>,
    flag: Flag,
    unpacked_size: u32,
    reserved: u32,
    timestamp: u32,
    data_block_size: u32,
    /// Absolute offset of the payload, known once the whole header was read
    pub(crate) content_offset: Option<u64>,
}

impl Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name={:?} flag={} unpacked={} size={} timestamp={}",
            self.name(),
            self.flag,
            self.unpacked_size,
            self.data_block_size,
            self.timestamp,
        )?;
        if let Some(offset) = self.content_offset {
            write!(f, " offset={}", offset)?;
        }
        Ok(())
    }
}

impl Entry {
    pub fn new(
        name: impl Into<Vec<u8>>,
        flag: Flag,
        unpacked_size: u32,
        reserved: u32,
        timestamp: u32,
        data_block_size: u32,
    ) -> Entry {
        Entry {
            name: name.into(),
            flag,
            unpacked_size,
            reserved,
            timestamp,
            data_block_size,
            content_offset: None,
        }
    }

    /// The record terminating the header table
    pub fn sentinel() -> Entry {
        Entry::new(Vec::new(), Flag::Uncompressed, 0, 0, 0, 0)
    }

    /// Decode one record: the name up to its NUL terminator, then the
    /// five fixed-width fields
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Entry, Error> {
        let mut name = Vec::new();
        reader
            .read_until(0, &mut name)
            .map_err(|err| Error::header(err, "entry name"))?;
        if name.pop() != Some(0) {
            return Err(Error::CorruptHeader("unterminated entry name"));
        }

        let mut raw = [0; FIELDS_SIZE];
        reader
            .read_exact(&mut raw)
            .map_err(|err| Error::header(err, "truncated entry fields"))?;
        let fields: EntryFields = bytemuck::pod_read_unaligned(&raw);

        Ok(Entry {
            name,
            flag: Flag::from(u32::from_le(fields.flag)),
            unpacked_size: u32::from_le(fields.unpacked_size),
            reserved: u32::from_le(fields.reserved),
            timestamp: u32::from_le(fields.timestamp),
            data_block_size: u32::from_le(fields.data_block_size),
            content_offset: None,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        let fields = EntryFields {
            flag: self.flag.bits().to_le(),
            unpacked_size: self.unpacked_size.to_le(),
            reserved: self.reserved.to_le(),
            timestamp: self.timestamp.to_le(),
            data_block_size: self.data_block_size.to_le(),
        };
        writer.write_all(&self.name)?;
        writer.write_all(&[0])?;
        writer.write_all(bytemuck::bytes_of(&fields))?;
        Ok(())
    }

    /// Size in bytes of the encoded record (not of its payload)
    pub fn header_size(&self) -> u64 {
        self.name.len() as u64 + 1 + FIELDS_SIZE as u64
    }

    pub fn is_sentinel(&self) -> bool {
        self.name.is_empty()
            && self.flag == Flag::Uncompressed
            && self.unpacked_size == 0
            && self.reserved == 0
            && self.timestamp == 0
            && self.data_block_size == 0
    }

    /// Raw name, without the NUL terminator
    pub fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    pub fn flag(&self) -> Flag {
        self.flag
    }

    pub fn unpacked_size(&self) -> u32 {
        self.unpacked_size
    }

    pub fn reserved(&self) -> u32 {
        self.reserved
    }

    /// Seconds since the Unix epoch
    pub fn timestamp(&self) -> u64 {
        u64::from(self.timestamp)
    }

    pub fn modified(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.timestamp())
    }

    pub fn data_block_size(&self) -> u32 {
        self.data_block_size
    }

    /// Absolute offset of the payload in the archive, `None` for records that
    /// have not been indexed by a [`Header`](crate::Header)
    pub fn content_offset(&self) -> Option<u64> {
        self.content_offset
    }

    /// Fails for entries whose stored bytes are not the file's contents
    pub fn check_unpacked(&self) -> Result<(), Error> {
        match self.flag {
            Flag::Packed => Err(Error::UnsupportedFeature(self.flag)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Entry;
    use crate::{Error, Flag};

    const CONFIG: &[u8] = b"config.bin\0\
        \x00\x00\x00\x00\
        \x10\x00\x00\x00\
        \x00\x00\x00\x00\
        \x00\xe1\xf5\x05\
        \x10\x00\x00\x00";

    #[test]
    fn decode_record() {
        let entry = Entry::read(&mut Cursor::new(CONFIG)).unwrap();
        assert_eq!(entry.name(), "config.bin");
        assert_eq!(entry.flag(), Flag::Uncompressed);
        assert_eq!(entry.unpacked_size(), 16);
        assert_eq!(entry.reserved(), 0);
        assert_eq!(entry.timestamp(), 100_000_000);
        assert_eq!(entry.data_block_size(), 16);
        assert_eq!(entry.content_offset(), None);
        assert_eq!(entry.header_size(), CONFIG.len() as u64);
    }

    #[test]
    fn encode_record() {
        let entry = Entry::read(&mut Cursor::new(CONFIG)).unwrap();
        let mut out = Vec::new();
        entry.write(&mut out).unwrap();
        assert_eq!(out, CONFIG);
    }

    #[test]
    fn sentinel() {
        let bytes = [0u8; 21];
        let entry = Entry::read(&mut Cursor::new(&bytes[..])).unwrap();
        assert!(entry.is_sentinel());
        assert_eq!(entry, Entry::sentinel());
        assert_eq!(entry.header_size(), 21);
    }

    #[test]
    fn empty_name_with_fields_is_not_sentinel() {
        let entry = Entry::new(Vec::new(), Flag::Uncompressed, 0, 0, 0, 4);
        assert!(!entry.is_sentinel());
    }

    #[test]
    fn truncated_fields() {
        let err = Entry::read(&mut Cursor::new(&CONFIG[..CONFIG.len() - 3])).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader(_)), "{}", err);
    }

    #[test]
    fn unterminated_name() {
        let err = Entry::read(&mut Cursor::new(&b"config.b"[..])).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader(_)), "{}", err);
    }

    #[test]
    fn packed_is_unsupported() {
        let entry = Entry::new("a.paa", Flag::Packed, 64, 0, 0, 20);
        assert!(matches!(
            entry.check_unpacked(),
            Err(Error::UnsupportedFeature(Flag::Packed))
        ));
    }
}
