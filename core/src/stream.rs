use crate::StreamError;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Full name of the unnamed primary data fork.
pub const DEFAULT_STREAM: &str = "::$DATA";

/// Type suffix NTFS gives every data stream.
pub const DATA_TYPE: &str = "$DATA";

/// One entry of a file's stream list, as the filesystem reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Full form, e.g. `:label:$DATA` or `::$DATA`.
    pub name: String,
    pub size: i64,
}

impl StreamDescriptor {
    pub fn new(name: impl Into<String>, size: i64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn label(&self) -> &str {
        split_full(&self.name).map(|(label, _)| label).unwrap_or("")
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_STREAM
    }
}

/// A validated stream address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamName {
    label: String,
    kind: String,
}

impl StreamName {
    /// Bare label as given to `add`. The filesystem appends `:$DATA` itself.
    pub fn from_label(label: &str) -> Result<Self, StreamError> {
        if label.is_empty() {
            return Err(StreamError::InvalidStreamName(
                "stream label must not be empty".to_string(),
            ));
        }
        check_label(label)?;
        Ok(Self {
            label: label.to_string(),
            kind: DATA_TYPE.to_string(),
        })
    }

    /// Checks the shape of a full name (`:label:$DATA`). `:label` alone parses
    /// and implies `$DATA`, but lookups still compare the caller's string as
    /// given, so only the listed form finds a stream.
    pub fn parse(full: &str) -> Result<Self, StreamError> {
        let (label, kind) = split_full(full).ok_or_else(|| {
            StreamError::InvalidStreamName(format!(
                "'{}' is not a full stream name (expected :<label>:$DATA)",
                full
            ))
        })?;
        check_label(label)?;
        if kind.contains(':') || kind.is_empty() {
            return Err(StreamError::InvalidStreamName(format!(
                "'{}' has a malformed type suffix",
                full
            )));
        }
        Ok(Self {
            label: label.to_string(),
            kind: kind.to_string(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_default(&self) -> bool {
        self.label.is_empty() && self.kind == DATA_TYPE
    }

    /// `:<label>:<type>`, the form enumeration reports.
    pub fn full(&self) -> String {
        format!(":{}:{}", self.label, self.kind)
    }

    /// Address of this stream on `host`.
    pub fn path_on(&self, host: &Path) -> PathBuf {
        stream_path(host, &self.full())
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full())
    }
}

/// Appends `suffix` to `host` verbatim. No separator is inserted, so a stream
/// suffix must carry its own leading colon.
pub fn stream_path(host: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = host.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Descriptor whose name matches `name` exactly.
pub fn locate<'a>(streams: &'a [StreamDescriptor], name: &str) -> Option<&'a StreamDescriptor> {
    streams.iter().find(|s| s.name == name)
}

/// Decodes a NUL-terminated UTF-16 stream name. Unpaired surrogates are an
/// error: a lossy name could never be addressed again.
pub fn decode_wide_name(raw: &[u16]) -> io::Result<String> {
    let len = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    String::from_utf16(&raw[..len])
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "stream name is not valid UTF-16"))
}

/// True when `dest` is the very stream `host` + `stream_name` being read.
/// NTFS paths compare without regard to ASCII case.
pub fn addresses_stream(dest: &Path, host: &Path, stream_name: &str) -> bool {
    let source = stream_path(host, stream_name);
    if dest.as_os_str().eq_ignore_ascii_case(source.as_os_str()) {
        return true;
    }
    stream_name == DEFAULT_STREAM && dest.as_os_str().eq_ignore_ascii_case(host.as_os_str())
}

fn split_full(full: &str) -> Option<(&str, &str)> {
    let rest = full.strip_prefix(':')?;
    match rest.split_once(':') {
        Some((label, kind)) => Some((label, kind)),
        None => Some((rest, DATA_TYPE)),
    }
}

fn check_label(label: &str) -> Result<(), StreamError> {
    if let Some(bad) = label.chars().find(|c| matches!(c, ':' | '\\' | '/' | '\0')) {
        return Err(StreamError::InvalidStreamName(format!(
            "'{}' contains forbidden character {:?}",
            label, bad
        )));
    }
    Ok(())
}
