use crate::{StreamDescriptor, StreamError};
use std::path::Path;

/// The four operations on a file's alternate data streams.
///
/// Each call is a self-contained, blocking transaction against one host file.
/// Handles opened by an implementation are released before it returns, on
/// every path. Nothing is locked: callers touching the same file from
/// several threads serialize themselves.
pub trait StreamManager: Send + Sync {
    /// Every stream on `file`, the default `::$DATA` included, in the order the
    /// filesystem reports them.
    fn list_streams(&self, file: &Path) -> Result<Vec<StreamDescriptor>, StreamError>;

    /// Creates or replaces stream `label` on `target` with the content of
    /// `source`. `label` is bare: no colons and no `$DATA` suffix.
    fn add_stream(&self, target: &Path, source: &Path, label: &str) -> Result<(), StreamError>;

    /// Copies stream `stream_name` (full form, `:label:$DATA`) of
    /// `source_file` into `dest_file`, truncating it. Returns bytes copied.
    ///
    /// The stream is located by enumeration before it is opened, so it can
    /// vanish in between; that surfaces as `StreamError::Open`. `dest_file`
    /// is untouched unless the stream was found.
    fn copy_stream(
        &self,
        source_file: &Path,
        stream_name: &str,
        dest_file: &Path,
    ) -> Result<u64, StreamError>;

    /// Deletes stream `stream_name` (full form) from `file`. An absent stream,
    /// a stream in use and a permission failure all report `StreamError::Delete`.
    fn delete_stream(&self, file: &Path, stream_name: &str) -> Result<(), StreamError>;
}
