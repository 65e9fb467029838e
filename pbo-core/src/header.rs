//! The header table of a pbo and the layout of its data section
use std::io::{BufRead, Write};

use crate::{Entry, Error, Extension, Flag};

/// One record of the header table
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderRecord {
    Entry(Entry),
    Product(Extension),
}

impl HeaderRecord {
    pub fn read<R: BufRead>(reader: &mut R) -> Result<HeaderRecord, Error> {
        let entry = Entry::read(reader)?;
        if entry.flag() == Flag::ProductEntry {
            Ok(HeaderRecord::Product(Extension::read_fields(entry, reader)?))
        } else {
            Ok(HeaderRecord::Entry(entry))
        }
    }

    /// Encoded size of the record, including extension fields
    pub fn size(&self) -> u64 {
        match self {
            HeaderRecord::Entry(entry) => entry.header_size(),
            HeaderRecord::Product(ext) => ext.size(),
        }
    }
}

/// The parsed header table. Every entry carries the absolute offset of its
/// payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    extension: Option<Extension>,
    entries: Vec<Entry>,
    /// Bytes taken by the header table, sentinel included
    size: u64,
}

impl Header {
    /// Scan the header table up to its sentinel, then lay out the data
    /// section. The table's length depends on every name and on the product
    /// entry, so offsets are only assigned once the sentinel was reached.
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Header, Error> {
        let mut header = Header::default();

        loop {
            let record = HeaderRecord::read(reader)?;
            header.size = header
                .size
                .checked_add(record.size())
                .ok_or(Error::Overflow)?;

            match record {
                HeaderRecord::Product(ext) => {
                    if header.extension.is_some() {
                        return Err(Error::CorruptHeader("more than one product entry"));
                    }
                    header.extension = Some(ext);
                }
                HeaderRecord::Entry(entry) if entry.is_sentinel() => break,
                HeaderRecord::Entry(entry) => header.entries.push(entry),
            }
        }

        let mut offset = header.size;
        for entry in header.entries.iter_mut() {
            entry.content_offset = Some(offset);
            offset = offset
                .checked_add(u64::from(entry.data_block_size()))
                .ok_or(Error::Overflow)?;
        }

        Ok(header)
    }

    /// Build a header from records in declaration order, laid out the same
    /// way as a header read from disk
    pub fn new(extension: Option<Extension>, entries: Vec<Entry>) -> Result<Header, Error> {
        let mut table = Vec::new();
        Header {
            extension,
            entries,
            size: 0,
        }
        .write(&mut table)?;
        Header::read(&mut &table[..])
    }

    /// Encode the header table, sentinel included
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        if let Some(ext) = &self.extension {
            ext.write(writer)?;
        }
        for entry in self.entries.iter() {
            entry.write(writer)?;
        }
        Entry::sentinel().write(writer)
    }

    pub fn extension(&self) -> Option<&Extension> {
        self.extension.as_ref()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Find an entry by its exact name
    pub fn entry(&self, name: impl AsRef<[u8]>) -> Option<&Entry> {
        let name = name.as_ref();
        self.entries.iter().find(|entry| entry.name_bytes() == name)
    }

    /// Index of the entry with this exact name
    pub fn position(&self, name: impl AsRef<[u8]>) -> Option<usize> {
        let name = name.as_ref();
        self.entries.iter().position(|entry| entry.name_bytes() == name)
    }

    /// Size of the header table, which is also the offset of the data section
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Size of the data section
    pub fn data_size(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.data_block_size()))
            .sum()
    }

    /// Size of the header table and the data section it describes
    pub fn total_size(&self) -> u64 {
        self.size + self.data_size()
    }
}
