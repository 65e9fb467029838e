//! Extention traits for base types defined in `pbo-core`.
use std::path::{Component, Path, PathBuf};

use pbo_core::Entry;

use crate::Error;

pub trait EntryExt {
    fn check_path(&self) -> Result<PathBuf, Error>;
}

impl EntryExt for Entry {
    /// Convert the entry's name, which uses `\` as separator, to a relative
    /// path, and ensure that there are no non-normal components.
    fn check_path(&self) -> Result<PathBuf, Error> {
        let name = self.name().replace('\\', "/");
        let path = Path::new(&name);
        for component in path.components() {
            match component {
                Component::Normal(_) => {}
                invalid => {
                    let bad_component: &Path = invalid.as_ref();
                    return Err(Error::InvalidPath {
                        entry: path.to_path_buf(),
                        component: bad_component.to_path_buf(),
                    });
                }
            }
        }
        if path.components().next().is_none() {
            return Err(Error::InvalidPath {
                entry: path.to_path_buf(),
                component: PathBuf::new(),
            });
        }
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pbo_core::{Entry, Flag};

    use super::EntryExt;
    use crate::Error;

    fn entry(name: &str) -> Entry {
        Entry::new(name, Flag::Uncompressed, 0, 0, 0, 0)
    }

    #[test]
    fn backslashes_become_components() {
        let path = entry("scripts\\init.sqf").check_path().unwrap();
        assert_eq!(path, PathBuf::from("scripts").join("init.sqf"));
    }

    #[test]
    fn rejects_escaping_paths() {
        for name in ["..\\evil.sqf", "\\abs.sqf", "a\\..\\b", ""] {
            let err = entry(name).check_path().unwrap_err();
            assert!(matches!(err, Error::InvalidPath { .. }), "{}: {}", name, err);
        }
    }
}
