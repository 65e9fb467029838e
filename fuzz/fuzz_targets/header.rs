#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate pbo_core;

use pbo_core::{Header, PboBuf, PboSrc};

fuzz_target!(|data: &[u8]| {
    let header = match Header::read(&mut &data[..]) {
        Ok(header) => header,
        Err(_) => return,
    };

    assert!(header.size() <= data.len() as u64);
    assert!(header.entries().iter().all(|entry| !entry.is_sentinel()));

    let mut table = Vec::new();
    header.write(&mut table).unwrap();
    assert_eq!(&table[..], &data[..header.size() as usize]);

    let mut src = PboBuf::new(data).unwrap();
    for index in 0..src.header().entries().len() {
        let _result = src.read_entry_data(index);
    }
});
