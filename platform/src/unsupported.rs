// Hosts without NTFS alternate data streams. Every operation fails the way it
// would on a filesystem that cannot hold streams.

use adstream_core::{CopyOptions, StreamDescriptor, StreamError, StreamManager, StreamName};
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct UnsupportedStreamManager {
    options: CopyOptions,
}

impl UnsupportedStreamManager {
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }
}

fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "alternate data streams require NTFS on Windows",
    )
}

impl StreamManager for UnsupportedStreamManager {
    fn list_streams(&self, file: &Path) -> Result<Vec<StreamDescriptor>, StreamError> {
        log::debug!("Stream enumeration unavailable for {}", file.display());
        Err(StreamError::Enumeration {
            path: file.to_path_buf(),
            source: unsupported(),
        })
    }

    fn add_stream(&self, target: &Path, _source: &Path, label: &str) -> Result<(), StreamError> {
        let name = StreamName::from_label(label)?;
        Err(StreamError::Write {
            path: name.path_on(target),
            source: unsupported(),
        })
    }

    fn copy_stream(
        &self,
        source_file: &Path,
        stream_name: &str,
        _dest_file: &Path,
    ) -> Result<u64, StreamError> {
        self.options.validate()?;
        StreamName::parse(stream_name)?;
        Err(StreamError::Enumeration {
            path: source_file.to_path_buf(),
            source: unsupported(),
        })
    }

    fn delete_stream(&self, file: &Path, stream_name: &str) -> Result<(), StreamError> {
        let name = StreamName::parse(stream_name)?;
        Err(StreamError::Delete {
            path: name.path_on(file),
            source: unsupported(),
        })
    }
}
