use std::io::{self, Read, Seek, SeekFrom};

use crate::{Entry, Error, PboSrc};

/// Reads the payload of one entry of a [`PboSrc`].
///
/// Every read is issued at an absolute position of the source, so readers
/// never depend on where a previous read left the underlying handle.
/// Only absolute seeks from the start of the payload are supported.
#[derive(Debug)]
pub struct EntryReader<'a, S> {
    src: &'a mut S,
    index: usize,
    /// Absolute offset of the payload
    offset: u64,
    size: u64,
    /// Position relative to the start of the payload
    pos: u64,
}

impl<'a, S: PboSrc> EntryReader<'a, S> {
    pub fn new(src: &'a mut S, index: usize) -> Result<EntryReader<'a, S>, Error> {
        let entry = src
            .header()
            .entries()
            .get(index)
            .ok_or(Error::EntryNotFound(index))?;
        let offset = entry
            .content_offset()
            .ok_or(Error::CorruptHeader("entry without content offset"))?;
        let size = u64::from(entry.data_block_size());
        offset.checked_add(size).ok_or(Error::Overflow)?;

        Ok(EntryReader {
            src,
            index,
            offset,
            size,
            pos: 0,
        })
    }

    pub fn entry(&self) -> &Entry {
        &self.src.header().entries()[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Size of the payload as stored in the archive
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Read the next bytes of the payload. Returns `Ok(0)` once the end of the
    /// payload was reached.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, S::Err> {
        if self.pos >= self.size {
            return Ok(0);
        }

        let remaining = self.size - self.pos;
        let count = match usize::try_from(remaining) {
            Ok(remaining) if remaining < buf.len() => remaining,
            _ => buf.len(),
        };

        let count = self.src.read_at(self.offset + self.pos, &mut buf[..count])?;
        self.pos += count as u64;
        Ok(count)
    }

    /// Move to `offset` bytes from the start of the payload. `offset` may be
    /// the size of the payload, but not beyond it.
    pub fn seek(&mut self, offset: i64) -> Result<u64, Error> {
        match u64::try_from(offset) {
            Ok(pos) if pos <= self.size => {
                self.pos = pos;
                Ok(pos)
            }
            _ => Err(Error::InvalidSeek(offset)),
        }
    }
}

impl<S> Read for EntryReader<'_, S>
where
    S: PboSrc,
    S::Err: Into<io::Error>,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        EntryReader::read(self, buf).map_err(Into::into)
    }
}

impl<S> Seek for EntryReader<'_, S>
where
    S: PboSrc,
{
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::Start(offset) => {
                let offset = i64::try_from(offset).map_err(|_| Error::InvalidSeek(i64::MAX))?;
                Ok(EntryReader::seek(self, offset)?)
            }
            SeekFrom::Current(offset) | SeekFrom::End(offset) => {
                Err(Error::InvalidSeek(offset).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read, Seek, SeekFrom};

    use crate::test::{archive, CONFIG_DATA, SCRIPT_DATA};
    use crate::{Error, PboBuf, PboSrc};

    #[test]
    fn read_to_end_then_eof() {
        let (bytes, _) = archive();
        let mut src = PboBuf::new(bytes).unwrap();
        let mut reader = src.entry_reader(1).unwrap();
        assert_eq!(reader.entry().name(), "scripts\\init.sqf");

        let mut data = Vec::new();
        let mut buf = [0; 7];
        loop {
            let count = reader.read(&mut buf).unwrap();
            if count == 0 {
                break;
            }
            data.extend_from_slice(&buf[..count]);
        }
        assert_eq!(data, SCRIPT_DATA);
        assert_eq!(reader.position(), SCRIPT_DATA.len() as u64);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn large_buffer_reads_only_the_payload() {
        let (bytes, _) = archive();
        let mut src = PboBuf::new(bytes).unwrap();
        let mut reader = src.entry_reader(0).unwrap();

        let mut buf = [0xff; 256];
        let count = reader.read(&mut buf).unwrap();
        assert_eq!(count, CONFIG_DATA.len());
        assert_eq!(&buf[..count], CONFIG_DATA);
        assert!(buf[count..].iter().all(|byte| *byte == 0xff));
    }

    #[test]
    fn seek_within_window() {
        let (bytes, _) = archive();
        let mut src = PboBuf::new(bytes).unwrap();
        let mut reader = src.entry_reader(0).unwrap();

        assert_eq!(reader.seek(5).unwrap(), 5);
        let mut buf = [0; 4];
        assert_eq!(reader.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, &CONFIG_DATA[5..9]);
    }

    #[test]
    fn seek_to_end() {
        let (bytes, _) = archive();
        let mut src = PboBuf::new(bytes).unwrap();
        let mut reader = src.entry_reader(0).unwrap();

        let end = CONFIG_DATA.len() as i64;
        assert_eq!(reader.seek(end).unwrap(), end as u64);
        let mut buf = [0; 4];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn seek_out_of_window() {
        let (bytes, _) = archive();
        let mut src = PboBuf::new(bytes).unwrap();
        let mut reader = src.entry_reader(0).unwrap();
        reader.seek(3).unwrap();

        let end = CONFIG_DATA.len() as i64;
        assert!(matches!(reader.seek(end + 1), Err(Error::InvalidSeek(_))));
        assert!(matches!(reader.seek(-1), Err(Error::InvalidSeek(-1))));
        // Failed seeks leave the cursor alone
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn io_traits() {
        let (bytes, _) = archive();
        let mut src = PboBuf::new(bytes).unwrap();
        let mut reader = src.entry_reader(1).unwrap();

        let mut data = String::new();
        reader.read_to_string(&mut data).unwrap();
        assert_eq!(data.as_bytes(), SCRIPT_DATA);

        assert_eq!(Seek::seek(&mut reader, SeekFrom::Start(1)).unwrap(), 1);
        let mut rest = Vec::new();
        Read::read_to_end(&mut reader, &mut rest).unwrap();
        assert_eq!(rest, &SCRIPT_DATA[1..]);

        let err = Seek::seek(&mut reader, SeekFrom::Start(SCRIPT_DATA.len() as u64 + 1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn relative_seeks_are_unsupported() {
        let (bytes, _) = archive();
        let mut src = PboBuf::new(bytes).unwrap();
        let mut reader = src.entry_reader(0).unwrap();

        for pos in [SeekFrom::Current(0), SeekFrom::End(0), SeekFrom::End(-1)] {
            let err = Seek::seek(&mut reader, pos).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        }
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn readers_do_not_share_a_cursor() {
        let (bytes, _) = archive();
        let mut src = PboBuf::new(bytes).unwrap();

        let mut buf = [0; 3];
        {
            let mut first = src.entry_reader(0).unwrap();
            first.seek(4).unwrap();
            first.read(&mut buf).unwrap();
        }
        let mut second = src.entry_reader(1).unwrap();
        second.read(&mut buf).unwrap();
        assert_eq!(&buf, &SCRIPT_DATA[..3]);
    }

    #[test]
    fn missing_entry() {
        let (bytes, _) = archive();
        let mut src = PboBuf::new(bytes).unwrap();
        assert!(matches!(src.entry_reader(7), Err(Error::EntryNotFound(7))));
    }
}
