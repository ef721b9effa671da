use crate::StreamError;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

pub const DEFAULT_CHUNK_SIZE: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyOptions {
    /// Bytes moved per read. Bounds memory use regardless of stream size.
    pub chunk_size: usize,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl CopyOptions {
    pub fn validate(&self) -> Result<(), StreamError> {
        if self.chunk_size == 0 {
            return Err(StreamError::Configuration(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which side of a chunked copy failed.
#[derive(Debug)]
pub enum CopyFailure {
    Read(io::Error),
    Write(io::Error),
}

impl CopyFailure {
    pub fn into_io(self) -> io::Error {
        match self {
            CopyFailure::Read(e) | CopyFailure::Write(e) => e,
        }
    }
}

/// Moves `reader` into `writer` one chunk at a time until a zero-length read.
/// Returns the number of bytes written.
pub fn copy_chunked<R, W>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
) -> Result<u64, CopyFailure>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyFailure::Read(e)),
        };
        writer.write_all(&buffer[..read]).map_err(CopyFailure::Write)?;
        total += read as u64;
    }

    writer.flush().map_err(CopyFailure::Write)?;
    Ok(total)
}
