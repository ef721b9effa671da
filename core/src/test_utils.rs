/// In-memory stream store for exercising callers without an NTFS volume
use crate::copy::copy_chunked;
use crate::{
    addresses_stream, locate, stream_path, CopyOptions, StreamDescriptor, StreamError,
    StreamManager, StreamName, DEFAULT_STREAM,
};
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Default)]
struct MockFile {
    data: Vec<u8>,
    /// Named streams in creation order. The default stream lives in `data`.
    streams: Vec<(String, Vec<u8>)>,
}

impl MockFile {
    fn descriptors(&self) -> Vec<StreamDescriptor> {
        let mut out = vec![StreamDescriptor::new(DEFAULT_STREAM, self.data.len() as i64)];
        out.extend(self.streams.iter().map(|(label, bytes)| {
            StreamDescriptor::new(format!(":{}:$DATA", label), bytes.len() as i64)
        }));
        out
    }

    fn stream(&self, label: &str) -> Option<&Vec<u8>> {
        if label.is_empty() {
            return Some(&self.data);
        }
        self.streams.iter().find(|(l, _)| l == label).map(|(_, b)| b)
    }
}

/// Stand-in volume that behaves like NTFS for the four stream operations.
pub struct MockStreamManager {
    files: Mutex<HashMap<PathBuf, MockFile>>,
    options: CopyOptions,
    vanish_before_open: Mutex<Option<(PathBuf, String)>>,
    list_call_count: Arc<Mutex<usize>>,
}

impl Default for MockStreamManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStreamManager {
    pub fn new() -> Self {
        Self::with_options(CopyOptions::default())
    }

    pub fn with_options(options: CopyOptions) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            options,
            vanish_before_open: Mutex::new(None),
            list_call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates or overwrites a host file with the given primary content.
    pub fn insert_file(&self, path: impl Into<PathBuf>, content: &[u8]) {
        self.files.lock().unwrap().insert(
            path.into(),
            MockFile {
                data: content.to_vec(),
                streams: Vec::new(),
            },
        );
    }

    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    /// Primary content of a host file.
    pub fn read_file(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).map(|f| f.data.clone())
    }

    /// Content of a named stream, by bare label.
    pub fn read_stream(&self, path: &Path, label: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .and_then(|f| f.stream(label).cloned())
    }

    /// Makes the next `copy_stream` of `stream_name` on `path` lose the stream
    /// after it was located but before it is opened.
    pub fn vanish_before_open(&self, path: impl Into<PathBuf>, stream_name: &str) {
        *self.vanish_before_open.lock().unwrap() = Some((path.into(), stream_name.to_string()));
    }

    pub fn list_count(&self) -> usize {
        *self.list_call_count.lock().unwrap()
    }

    fn take_vanish(&self, path: &Path, stream_name: &str, label: &str) {
        let mut pending = self.vanish_before_open.lock().unwrap();
        let hit = matches!(&*pending, Some((p, n)) if p == path && n == stream_name);
        if hit {
            *pending = None;
            if let Some(file) = self.files.lock().unwrap().get_mut(path) {
                file.streams.retain(|(l, _)| l != label);
            }
        }
    }
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, what.to_string())
}

fn same_stream() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "destination is the stream being copied")
}

impl StreamManager for MockStreamManager {
    fn list_streams(&self, file: &Path) -> Result<Vec<StreamDescriptor>, StreamError> {
        *self.list_call_count.lock().unwrap() += 1;
        self.files
            .lock()
            .unwrap()
            .get(file)
            .map(MockFile::descriptors)
            .ok_or_else(|| StreamError::Enumeration {
                path: file.to_path_buf(),
                source: not_found("no such file"),
            })
    }

    fn add_stream(&self, target: &Path, source: &Path, label: &str) -> Result<(), StreamError> {
        let name = StreamName::from_label(label)?;
        let mut files = self.files.lock().unwrap();

        let content = files
            .get(source)
            .map(|f| f.data.clone())
            .ok_or_else(|| StreamError::Write {
                path: source.to_path_buf(),
                source: not_found("source file missing"),
            })?;

        let host = files.get_mut(target).ok_or_else(|| StreamError::Write {
            path: name.path_on(target),
            source: not_found("target file missing"),
        })?;

        match host.streams.iter_mut().find(|(l, _)| l == name.label()) {
            Some((_, bytes)) => *bytes = content,
            None => host.streams.push((name.label().to_string(), content)),
        }
        Ok(())
    }

    fn copy_stream(
        &self,
        source_file: &Path,
        stream_name: &str,
        dest_file: &Path,
    ) -> Result<u64, StreamError> {
        self.options.validate()?;
        let name = StreamName::parse(stream_name)?;

        let streams = self.list_streams(source_file)?;
        if locate(&streams, stream_name).is_none() {
            return Err(StreamError::StreamNotFound {
                path: source_file.to_path_buf(),
                stream: stream_name.to_string(),
            });
        }

        self.take_vanish(source_file, stream_name, name.label());

        let stream = stream_path(source_file, stream_name);
        let mut files = self.files.lock().unwrap();
        let content = files
            .get(source_file)
            .and_then(|f| f.stream(name.label()).cloned())
            .ok_or_else(|| StreamError::Open {
                path: stream.clone(),
                source: not_found("stream removed after it was listed"),
            })?;

        if addresses_stream(dest_file, source_file, stream_name) {
            return Err(StreamError::Open {
                path: dest_file.to_path_buf(),
                source: same_stream(),
            });
        }

        let dest = files.entry(dest_file.to_path_buf()).or_default();
        dest.data.clear();
        copy_chunked(&mut Cursor::new(content), &mut dest.data, self.options.chunk_size).map_err(
            |e| StreamError::Copy {
                path: dest_file.to_path_buf(),
                source: e.into_io(),
            },
        )
    }

    fn delete_stream(&self, file: &Path, stream_name: &str) -> Result<(), StreamError> {
        let name = StreamName::parse(stream_name)?;
        if name.is_default() {
            return Err(StreamError::InvalidStreamName(
                "refusing to delete the default ::$DATA stream".to_string(),
            ));
        }

        let mut files = self.files.lock().unwrap();
        let host = files.get_mut(file).ok_or_else(|| StreamError::Delete {
            path: name.path_on(file),
            source: not_found("no such file"),
        })?;

        let before = host.streams.len();
        host.streams.retain(|(label, _)| label != name.label());
        if host.streams.len() == before {
            return Err(StreamError::Delete {
                path: name.path_on(file),
                source: not_found("no such stream"),
            });
        }
        Ok(())
    }
}
