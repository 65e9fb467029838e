use std::error;
use std::fmt::{Display, Formatter, Result};
use std::io;

use crate::Flag;

#[derive(Debug)]
pub enum Error {
    /// The header table is truncated or malformed
    CorruptHeader(&'static str),
    /// No entry at this index of the header table
    EntryNotFound(usize),
    Io(io::Error),
    /// Seek outside of an entry's content window, or an unsupported seek mode
    InvalidSeek(i64),
    Overflow,
    TryFromInt(core::num::TryFromIntError),
    /// The entry's payload needs a decoder this crate does not provide
    UnsupportedFeature(Flag),
}

impl Error {
    /// Map an io error from the header codecs, turning a premature end of
    /// stream into a corruption error
    pub(crate) fn header(err: io::Error, what: &'static str) -> Error {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::CorruptHeader(what),
            _ => Error::Io(err),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        use Error::*;

        match self {
            CorruptHeader(what) => write!(f, "Corrupt Header: {}", what),
            EntryNotFound(index) => write!(f, "Entry Not Found: {}", index),
            Io(err) => write!(f, "Io: {}", err),
            InvalidSeek(offset) => write!(f, "Invalid Seek: {}", offset),
            Overflow => write!(f, "Overflow"),
            TryFromInt(err) => write!(f, "TryFromInt: {}", err),
            UnsupportedFeature(flag) => write!(f, "Unsupported Feature: {} entries", flag),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::TryFromInt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<core::num::TryFromIntError> for Error {
    fn from(err: core::num::TryFromIntError) -> Error {
        Error::TryFromInt(err)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(err) => err,
            Error::InvalidSeek(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
            Error::EntryNotFound(_) => io::Error::new(io::ErrorKind::NotFound, err),
            Error::UnsupportedFeature(_) => io::Error::new(io::ErrorKind::Unsupported, err),
            err => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}
