use std::io;

use crate::{Entry, EntryReader, Error, Header};

/// Random access to the bytes of a pbo whose header has been read
pub trait PboSrc {
    type Err: From<Error>;

    fn header(&self) -> &Header;

    /// Fill `buf` with the bytes at absolute `offset`
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Err>;

    /// Read from this src at a given entry's data with a given offset within that entry
    fn read_entry(&mut self, entry: &Entry, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Err> {
        let size = u64::from(entry.data_block_size());
        if offset >= size {
            return Ok(0);
        }

        let mut end = usize::try_from(size - offset).map_err(Error::TryFromInt)?;
        if end > buf.len() {
            end = buf.len();
        }

        let start = entry
            .content_offset()
            .and_then(|content_offset| content_offset.checked_add(offset))
            .ok_or(Error::Overflow)?;

        self.read_at(start, &mut buf[..end])
    }

    /// Bounded reader over the payload of the entry at `index`
    fn entry_reader(&mut self, index: usize) -> Result<EntryReader<'_, Self>, Self::Err>
    where
        Self: Sized,
    {
        Ok(EntryReader::new(self, index)?)
    }

    /// Read a whole payload, as stored in the archive
    fn read_entry_data(&mut self, index: usize) -> Result<Vec<u8>, Self::Err>
    where
        Self: Sized,
    {
        let mut reader = self.entry_reader(index)?;
        let mut data = Vec::new();
        let mut buf = [0; 8192];
        loop {
            let count = reader.read(&mut buf)?;
            if count == 0 {
                break;
            }
            data.extend_from_slice(&buf[..count]);
        }
        Ok(data)
    }
}

/// A pbo held in memory
#[derive(Debug)]
pub struct PboBuf<T> {
    data: T,
    header: Header,
}

impl<T: AsRef<[u8]>> PboBuf<T> {
    pub fn new(data: T) -> Result<PboBuf<T>, Error> {
        let header = Header::read(&mut data.as_ref())?;
        Ok(PboBuf { data, header })
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: AsRef<[u8]>> PboSrc for PboBuf<T> {
    type Err = Error;

    fn header(&self) -> &Header {
        &self.header
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Error> {
        let start = usize::try_from(offset)?;
        let end = start.checked_add(buf.len()).ok_or(Error::Overflow)?;
        let src = self
            .data
            .as_ref()
            .get(start..end)
            .ok_or_else(|| Error::Io(io::ErrorKind::UnexpectedEof.into()))?;
        buf.copy_from_slice(src);
        Ok(buf.len())
    }
}
