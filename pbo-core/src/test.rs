//! A small pbo with a product entry and two files, shared by the unit tests
use crate::{Entry, Extension, Flag};

pub const CONFIG_DATA: &[u8] = b"class CfgPatches {};\n";
pub const SCRIPT_DATA: &[u8] = b"hint \"hello\";\nsleep 1;\n";

pub const CONFIG_PATH: &str = "config.cpp";
pub const SCRIPT_PATH: &str = "scripts\\init.sqf";

/// Returns the archive and the offset of its data section
pub fn archive() -> (Vec<u8>, usize) {
    let mut bytes = Vec::new();

    Extension::new([("prefix", "my_mod")])
        .write(&mut bytes)
        .unwrap();

    for (path, data, timestamp) in [
        (CONFIG_PATH, CONFIG_DATA, 1_600_000_000),
        (SCRIPT_PATH, SCRIPT_DATA, 1_600_000_060),
    ] {
        let size = data.len() as u32;
        Entry::new(path, Flag::Uncompressed, size, 0, timestamp, size)
            .write(&mut bytes)
            .unwrap();
    }
    Entry::sentinel().write(&mut bytes).unwrap();

    let data_offset = bytes.len();
    bytes.extend_from_slice(CONFIG_DATA);
    bytes.extend_from_slice(SCRIPT_DATA);
    (bytes, data_offset)
}
