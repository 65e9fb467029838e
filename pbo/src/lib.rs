mod bin;
pub mod ext;
mod package;

pub use bin::*;
pub use package::*;

pub use pbo_core::{
    Entry, EntryReader, Extension, Flag, Header, HeaderRecord, PboBuf, PboSrc,
};

use std::io;
use std::path::PathBuf;

const READ_WRITE_BUF_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] pbo_core::Error),

    #[error("{context}{}: {source}", display_path(.path))]
    Io {
        source: io::Error,
        path: Option<PathBuf>,
        context: &'static str,
    },

    #[error("Invalid path component {} in entry {}", .component.display(), .entry.display())]
    InvalidPath { entry: PathBuf, component: PathBuf },
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" {}", path.display()),
        None => String::new(),
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Core(err) => err.into(),
            Error::Io { source, .. } => source,
            err => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}

/// Wrap an `io::Error` into [`Error::Io`], with an optional path and a context
#[macro_export]
macro_rules! wrap_io_err {
    ($context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: None,
            context: $context,
        }
    };
    ($path:expr, $context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: Some(::std::path::PathBuf::from(&$path)),
            context: $context,
        }
    };
}
