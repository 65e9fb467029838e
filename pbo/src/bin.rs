use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use blake3::{Hash, Hasher};
use pbo_core::{EntryReader, PboSrc};
use tracing::{info, warn};

use crate::ext::EntryExt;
use crate::package::PboFile;
use crate::{wrap_io_err, Error, READ_WRITE_BUF_SIZE};

/// Copy everything `read` yields into `write`, hashing it on the way
fn copy_and_hash<R: Read, W: Write>(
    mut read: R,
    mut write: W,
    buf: &mut [u8],
) -> Result<(u64, Hash), Error> {
    let mut hasher = Hasher::new();
    let mut total = 0;
    loop {
        let count = read
            .read(buf)
            .map_err(wrap_io_err!("Read entry for copy"))?;
        if count == 0 {
            break;
        }
        total += count as u64;
        write
            .write_all(&buf[..count])
            .map_err(wrap_io_err!("Copy entry"))?;
        hasher.update_rayon(&buf[..count]);
    }
    Ok((total, hasher.finalize()))
}

/// Print one line per entry. With `hash`, the blake3 sum of each payload as
/// stored in the archive is printed as well.
pub fn list(archive_path: &str, hash: bool) -> Result<(), Error> {
    let mut pbo = PboFile::new(archive_path)?;
    let mut buf = vec![0; READ_WRITE_BUF_SIZE];

    for index in 0..pbo.entries().len() {
        let entry = &pbo.entries()[index];
        let line = format!(
            "{:<48} {:<12} {:>10} {:>10} {:>10} {}",
            entry.name(),
            entry.flag().to_string(),
            entry.unpacked_size(),
            entry.data_block_size(),
            entry.content_offset().unwrap_or_default(),
            entry.timestamp(),
        );

        if hash {
            let reader = pbo.entry_reader(index)?;
            let (_, hash) = copy_and_hash(reader, std::io::sink(), &mut buf)?;
            println!("{} {}", line, hash.to_hex());
        } else {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Print the product entry's fields and the layout of the archive
pub fn info(archive_path: &str) -> Result<(), Error> {
    let pbo = PboFile::new(archive_path)?;

    match pbo.extension() {
        Some(ext) => {
            for (key, value) in ext.pairs_lossy() {
                println!("{}={}", key, value);
            }
        }
        None => println!("no product entry"),
    }
    println!("entries: {}", pbo.entries().len());
    println!("header size: {}", pbo.header().size());
    println!("data size: {}", pbo.header().data_size());

    Ok(())
}

/// Write the payload of every entry under `base_dir`. Packed entries are
/// skipped, as their payload can not be decompressed. Returns the number of
/// files written.
pub fn extract(archive_path: &str, base_dir: &str) -> Result<usize, Error> {
    let mut pbo = PboFile::new(archive_path)?;
    let base_dir = Path::new(base_dir);
    let mut buf = vec![0; READ_WRITE_BUF_SIZE];
    let mut written = 0;

    for index in 0..pbo.entries().len() {
        let entry = &pbo.entries()[index];
        if let Err(err) = entry.check_unpacked() {
            warn!(entry = %entry.name(), "skipping: {}", err);
            continue;
        }

        let target = base_dir.join(entry.check_path()?);
        let modified = entry.modified();
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(wrap_io_err!(parent, "Create directory"))?;
        }

        let mut file = fs::File::create(&target).map_err(wrap_io_err!(target, "Create file"))?;
        let reader: EntryReader<'_, PboFile> = pbo.entry_reader(index)?;
        let (count, _) = copy_and_hash(reader, &mut file, &mut buf)?;
        file.set_modified(modified)
            .map_err(wrap_io_err!(target, "Set modification time"))?;

        info!(path = %target.display(), bytes = count, "extracted");
        written += 1;
    }

    Ok(written)
}
