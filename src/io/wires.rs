//! Plain-text wire list files.
//!
//! One segment per line, seven whitespace-separated numbers
//! `ax ay az bx by bz i`. Lines starting with `#` and blank lines are ignored.
//! Numbers are written in shortest round-trip form, so `write` followed by
//! `read` reproduces every triple bit for bit.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::parse_record;
use crate::errors::{FieldError, ResourceError};
use crate::math::vector;
use crate::wires::WireList;

/// Writes `wires` to `writer`.
pub fn write_wires<W: Write>(wires: &WireList, mut writer: W) -> Result<(), FieldError> {
    writeln!(writer, "# wirefield wires {}", wires.len())?;
    for s in wires.iter() {
        writeln!(
            writer,
            "{:e} {:e} {:e} {:e} {:e} {:e} {:e}",
            s.start.x, s.start.y, s.start.z, s.end.x, s.end.y, s.end.z, s.current
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a wire list from `reader`.
///
/// Malformed records, including zero-length segments, are reported as
/// [`ResourceError::Format`] with the offending line number.
pub fn read_wires<R: BufRead>(reader: R) -> Result<WireList, FieldError> {
    let mut wires = WireList::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let Some(v) = parse_record(&line?, line_no)? else {
            continue;
        };
        if v.len() != 7 {
            return Err(ResourceError::Format {
                line: line_no,
                reason: format!("expected 7 numbers, found {}", v.len()),
            }
            .into());
        }
        wires
            .append(vector(v[0], v[1], v[2]), vector(v[3], v[4], v[5]), v[6])
            .map_err(|err| ResourceError::Format {
                line: line_no,
                reason: err.to_string(),
            })?;
    }
    Ok(wires)
}

impl WireList {
    /// Saves the list to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FieldError> {
        let path = path.as_ref();
        debug!(path = %path.display(), segments = self.len(), "saving wire list");
        write_wires(self, BufWriter::new(File::create(path)?))
    }

    /// Loads a list previously written by [`WireList::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FieldError> {
        let path = path.as_ref();
        let wires = read_wires(BufReader::new(File::open(path)?))?;
        debug!(path = %path.display(), segments = wires.len(), "loaded wire list");
        Ok(wires)
    }
}
