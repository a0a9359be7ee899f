//! Append-only CSV ledger of daily quote snapshots.
//!
//! Rows are always written comma-separated with `\n` line endings. Reading
//! accepts comma or semicolon per line, so a ledger that was once re-saved by
//! a spreadsheet with `;` keeps working after new comma rows are appended.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::iter;
use std::path::Path;

use crate::error::JobError;
use crate::types::QuoteRecord;

pub const HEADER: [&str; 11] = [
    "Date", "Contract", "Latest", "Change", "Open", "High", "Low", "Previous", "Volume",
    "Open Int", "Time",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

/// Serialize rows into one buffer so the file sees a single write
fn encode_rows<'a, I, R>(rows: I) -> io::Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = &'a str>,
{
    let mut writer = csv_writer(Vec::new());
    for row in rows {
        writer.write_record(row).map_err(io::Error::from)?;
    }
    writer.into_inner().map_err(|e| e.into_error())
}

/// Write `header` if the file is missing or empty. Returns whether it wrote.
pub fn ensure_header(path: &Path, header: &[&str]) -> Result<bool, JobError> {
    let needs_header = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(e) => return Err(JobError::io(path)(e)),
    };
    if !needs_header {
        return Ok(false);
    }

    let bytes = encode_rows([header.iter().copied()]).map_err(JobError::io(path))?;
    let mut file = File::create(path).map_err(JobError::io(path))?;
    file.write_all(&bytes).map_err(JobError::io(path))?;
    file.sync_all().map_err(JobError::io(path))?;
    log::debug!("wrote ledger header to {}", path.display());
    Ok(true)
}

/// First field of a raw ledger line: up to whichever of `,` or `;` comes first
fn first_field(line: &[u8]) -> &[u8] {
    let line = line.strip_prefix(UTF8_BOM).unwrap_or(line);
    let end = line
        .iter()
        .position(|&b| b == b',' || b == b';' || b == b'\r')
        .unwrap_or(line.len());
    let field = line[..end].trim_ascii();
    field
        .strip_prefix(b"\"")
        .and_then(|f| f.strip_suffix(b"\""))
        .unwrap_or(field)
}

/// Whether any row's date column equals `date_iso`. A missing file has none.
pub fn has_entry_for_date(path: &Path, date_iso: &str) -> Result<bool, JobError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(JobError::io(path)(e)),
    };

    for line in BufReader::new(file).split(b'\n') {
        let line = line.map_err(JobError::io(path))?;
        if first_field(&line) == date_iso.as_bytes() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// True when the file has content that does not end in a newline
fn missing_trailing_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Append one row per record, each prefixed with `date_iso`.
///
/// The batch is encoded up front and written in one call, so an encoding
/// failure leaves the file as it was.
pub fn append(path: &Path, date_iso: &str, batch: &[QuoteRecord]) -> Result<usize, JobError> {
    ensure_header(path, &HEADER)?;

    let rows = batch
        .iter()
        .map(|record| iter::once(date_iso).chain(record.fields()));
    let mut bytes = encode_rows(rows).map_err(JobError::io(path))?;

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .map_err(JobError::io(path))?;
    if missing_trailing_newline(&mut file).map_err(JobError::io(path))? {
        log::warn!("{} did not end with a newline, adding one", path.display());
        bytes.insert(0, b'\n');
    }
    file.write_all(&bytes).map_err(JobError::io(path))?;
    file.sync_all().map_err(JobError::io(path))?;

    Ok(batch.len())
}
