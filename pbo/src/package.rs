use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use pbo_core::{Entry, EntryReader, Extension, Header, PboSrc};
use tracing::debug;

use crate::{wrap_io_err, Error};

/// A `.pbo` file on disk
#[derive(Debug)]
pub struct PboFile {
    path: PathBuf,
    src: BufReader<File>,
    header: Header,
}

impl PboFile {
    /// Open the archive at `path` and read its header table. Fails without
    /// returning an archive if the table is truncated or malformed.
    pub fn new(path: impl AsRef<Path>) -> Result<PboFile, Error> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(wrap_io_err!(path, "Open"))?;
        let mut src = BufReader::new(file);

        let header = Header::read(&mut src).map_err(|err| match err {
            pbo_core::Error::Io(source) => Error::Io {
                source,
                path: Some(path.clone()),
                context: "Read header",
            },
            err => Error::Core(err),
        })?;

        debug!(
            path = %path.display(),
            entries = header.entries().len(),
            header_size = header.size(),
            data_size = header.data_size(),
            "read pbo header"
        );
        if let Some(ext) = header.extension() {
            for (key, value) in ext.pairs_lossy() {
                debug!(%key, %value, "product entry field");
            }
        }
        for entry in header.entries() {
            debug!(
                name = %entry.name(),
                flag = %entry.flag(),
                offset = entry.content_offset().unwrap_or_default(),
                size = entry.data_block_size(),
                "entry"
            );
        }

        Ok(PboFile { path, src, header })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> Option<&Extension> {
        self.header.extension()
    }

    pub fn entries(&self) -> &[Entry] {
        self.header.entries()
    }

    /// Bounded reader over the payload of the entry named `name`
    pub fn entry_reader_by_name(
        &mut self,
        name: impl AsRef<[u8]>,
    ) -> Result<Option<EntryReader<'_, PboFile>>, Error> {
        match self.header.position(name) {
            Some(index) => self.entry_reader(index).map(Some),
            None => Ok(None),
        }
    }
}

impl PboSrc for PboFile {
    type Err = Error;

    fn header(&self) -> &Header {
        &self.header
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Err> {
        self.src
            .seek(SeekFrom::Start(offset))
            .map_err(wrap_io_err!(self.path, "Seek at read_at"))?;
        self.src
            .read_exact(buf)
            .map_err(wrap_io_err!(self.path, "Read at read_at"))?;
        Ok(buf.len())
    }
}
