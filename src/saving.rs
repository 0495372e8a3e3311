use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

use crate::error::{LiveloError, Result};
use crate::table::OfferTable;

/// Write a gzip-compressed bincode snapshot of the table.
pub fn save_table(table: &OfferTable, filename: impl AsRef<Path>) -> Result<()> {
    let path = filename.as_ref();
    let file = File::create(path)
        .map_err(|e| LiveloError::Load(format!("{}: {}", path.display(), e)))?;
    write_snapshot(table, file)
}

pub fn load_table(filename: impl AsRef<Path>) -> Result<OfferTable> {
    let path = filename.as_ref();
    let file = File::open(path)
        .map_err(|e| LiveloError::Load(format!("{}: {}", path.display(), e)))?;
    read_snapshot(file)
}

/// Snapshot into an in-memory buffer, e.g. for download.
pub fn to_bytes(table: &OfferTable) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_snapshot(table, &mut buffer)?;
    Ok(buffer)
}

pub fn from_bytes(buffer: &[u8]) -> Result<OfferTable> {
    read_snapshot(Cursor::new(buffer))
}

fn write_snapshot<W: Write>(table: &OfferTable, sink: W) -> Result<()> {
    let encoder = GzEncoder::new(sink, Compression::default());
    let mut writer = BufWriter::new(encoder);
    serialize_into(&mut writer, table)?;

    let encoder = writer
        .into_inner()
        .map_err(|e| LiveloError::Load(format!("flush failed: {}", e.error())))?;
    encoder
        .finish()
        .map_err(|e| LiveloError::Load(format!("compression failed: {}", e)))?;
    log::debug!("wrote snapshot of {} rows", table.len());
    Ok(())
}

fn read_snapshot<R: std::io::Read>(source: R) -> Result<OfferTable> {
    let decoder = GzDecoder::new(source);
    let mut reader = BufReader::new(decoder);
    let table: OfferTable = deserialize_from(&mut reader)?;
    Ok(table)
}
