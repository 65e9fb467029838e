use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::{Entry, Error, Flag};

/// The product entry of a pbo, carrying archive-level key/value pairs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extension {
    entry: Entry,
    /// Pairs in the order they appear in the archive, duplicates included,
    /// as the raw bytes on disk
    pairs: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Extension {
    /// A product entry carrying `pairs`
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Extension
    where
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        Extension {
            entry: Entry::new(Vec::new(), Flag::ProductEntry, 0, 0, 0, 0),
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Decode the key/value block which follows a product entry, up to and
    /// including its terminating NUL
    pub fn read_fields<R: BufRead>(entry: Entry, reader: &mut R) -> Result<Extension, Error> {
        if entry.flag() != Flag::ProductEntry {
            return Err(Error::CorruptHeader("extension fields after a non-product entry"));
        }

        let mut pairs = Vec::new();
        loop {
            let next = reader
                .fill_buf()
                .map_err(|err| Error::header(err, "extension fields"))?
                .first()
                .copied();
            match next {
                None => return Err(Error::CorruptHeader("unterminated extension fields")),
                Some(0) => {
                    reader.consume(1);
                    break;
                }
                Some(_) => {
                    let key = read_string(reader)?;
                    let value = read_string(reader)?;
                    pairs.push((key, value));
                }
            }
        }
        Ok(Extension { entry, pairs })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        self.entry.write(writer)?;
        for (key, value) in self.pairs.iter() {
            writer.write_all(key)?;
            writer.write_all(&[0])?;
            writer.write_all(value)?;
            writer.write_all(&[0])?;
        }
        writer.write_all(&[0])?;
        Ok(())
    }

    /// Encoded size of the product entry and its key/value block
    pub fn size(&self) -> u64 {
        let fields: u64 = self
            .pairs
            .iter()
            .map(|(key, value)| key.len() as u64 + value.len() as u64 + 2)
            .sum();
        self.entry.header_size() + fields + 1
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn pairs(&self) -> &[(Vec<u8>, Vec<u8>)] {
        &self.pairs
    }

    /// Pairs in archive order, decoded for display
    pub fn pairs_lossy(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        self.pairs
            .iter()
            .map(|(key, value)| (String::from_utf8_lossy(key), String::from_utf8_lossy(value)))
    }

    /// Key/value pairs as a map; a key repeated in the archive keeps its last value
    pub fn fields(&self) -> HashMap<Cow<'_, str>, Cow<'_, str>> {
        self.pairs_lossy().collect()
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<Cow<'_, str>> {
        let key = key.as_ref();
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, value)| String::from_utf8_lossy(value))
    }

    /// Virtual path the archive's entries are mounted under
    pub fn prefix(&self) -> Option<Cow<'_, str>> {
        self.get("prefix")
    }
}

fn read_string<R: BufRead>(reader: &mut R) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    reader
        .read_until(0, &mut bytes)
        .map_err(|err| Error::header(err, "extension fields"))?;
    if bytes.pop() != Some(0) {
        return Err(Error::CorruptHeader("unterminated extension string"));
    }
    Ok(bytes)
}
