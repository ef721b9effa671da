use super::find::{enumerate_streams, find_stream};
use adstream_core::{
    addresses_stream, copy_chunked, stream_path, CopyFailure, CopyOptions, StreamDescriptor,
    StreamError, StreamManager, StreamName,
};
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Stream operations against a real NTFS volume.
#[derive(Debug, Clone, Default)]
pub struct NtfsStreamManager {
    options: CopyOptions,
}

impl NtfsStreamManager {
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }
}

impl StreamManager for NtfsStreamManager {
    fn list_streams(&self, file: &Path) -> Result<Vec<StreamDescriptor>, StreamError> {
        enumerate_streams(file)
    }

    fn add_stream(&self, target: &Path, source: &Path, label: &str) -> Result<(), StreamError> {
        let name = StreamName::from_label(label)?;
        // `file:label`; NTFS appends `:$DATA` when it creates the stream.
        let destination = stream_path(target, &format!(":{}", name.label()));

        // Writing `missing:label` would create `missing` as a side effect.
        fs::metadata(target).map_err(|e| StreamError::Write {
            path: target.to_path_buf(),
            source: e,
        })?;

        log::debug!("Copying {} into {}", source.display(), destination.display());
        let written = fs::copy(source, &destination).map_err(|e| StreamError::Write {
            path: destination.clone(),
            source: e,
        })?;
        log::debug!("Wrote {} bytes to {}", written, destination.display());
        Ok(())
    }

    fn copy_stream(
        &self,
        source_file: &Path,
        stream_name: &str,
        dest_file: &Path,
    ) -> Result<u64, StreamError> {
        self.options.validate()?;
        StreamName::parse(stream_name)?;

        let located = find_stream(source_file, stream_name)?.ok_or_else(|| {
            StreamError::StreamNotFound {
                path: source_file.to_path_buf(),
                stream: stream_name.to_string(),
            }
        })?;
        log::debug!(
            "Located {} ({} bytes) on {}",
            located.name,
            located.size,
            source_file.display()
        );

        // Creating the destination would truncate the stream before it is read.
        if addresses_stream(dest_file, source_file, stream_name) {
            return Err(StreamError::Open {
                path: dest_file.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "destination is the stream being copied",
                ),
            });
        }

        // The stream may have gone since it was listed.
        let stream = stream_path(source_file, stream_name);
        let mut reader = File::open(&stream).map_err(|e| StreamError::Open {
            path: stream.clone(),
            source: e,
        })?;

        let mut writer = File::create(dest_file).map_err(|e| StreamError::Open {
            path: dest_file.to_path_buf(),
            source: e,
        })?;

        let copied =
            copy_chunked(&mut reader, &mut writer, self.options.chunk_size).map_err(|e| {
                let path = match &e {
                    CopyFailure::Read(_) => stream.clone(),
                    CopyFailure::Write(_) => dest_file.to_path_buf(),
                };
                StreamError::Copy {
                    path,
                    source: e.into_io(),
                }
            })?;

        log::debug!(
            "Copied {} bytes from {} to {}",
            copied,
            stream.display(),
            dest_file.display()
        );
        Ok(copied)
    }

    fn delete_stream(&self, file: &Path, stream_name: &str) -> Result<(), StreamError> {
        let name = StreamName::parse(stream_name)?;
        if name.is_default() {
            return Err(StreamError::InvalidStreamName(
                "refusing to delete the default ::$DATA stream".to_string(),
            ));
        }

        let stream = stream_path(file, stream_name);
        log::debug!("Deleting {}", stream.display());
        fs::remove_file(&stream).map_err(|e| StreamError::Delete {
            path: stream,
            source: e,
        })
    }
}
