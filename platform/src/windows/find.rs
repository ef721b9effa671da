// NTFS stream enumeration via FindFirstStreamW / FindNextStreamW

use adstream_core::{decode_wide_name, StreamDescriptor, StreamError};
use std::ffi::OsStr;
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use winapi::shared::winerror::ERROR_HANDLE_EOF;
use winapi::um::fileapi::{FindClose, FindFirstStreamW, FindNextStreamW, WIN32_FIND_STREAM_DATA};
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::minwinbase::FindStreamInfoStandard;
use winapi::um::winnt::HANDLE;

/// Owns a stream search handle and closes it on drop.
struct FindStreamHandle(HANDLE);

impl Drop for FindStreamHandle {
    fn drop(&mut self) {
        unsafe {
            FindClose(self.0);
        }
    }
}

/// Streams of one file, in the order NTFS reports them.
pub struct StreamIter {
    path: PathBuf,
    handle: Option<FindStreamHandle>,
    data: WIN32_FIND_STREAM_DATA,
    pending: bool,
}

impl StreamIter {
    pub fn open(path: &Path) -> Result<Self, StreamError> {
        log::debug!("Enumerating streams of {}", path.display());

        let wide_path: Vec<u16> = OsStr::new(path)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let mut data: WIN32_FIND_STREAM_DATA = unsafe { std::mem::zeroed() };
        let handle = unsafe {
            FindFirstStreamW(
                wide_path.as_ptr(),
                FindStreamInfoStandard,
                &mut data as *mut _ as *mut _,
                0,
            )
        };

        if handle == INVALID_HANDLE_VALUE {
            let error = io::Error::last_os_error();
            // A directory without data streams: nothing to list.
            if error.raw_os_error() == Some(ERROR_HANDLE_EOF as i32) {
                log::debug!("{} has no data streams", path.display());
                return Ok(Self {
                    path: path.to_path_buf(),
                    handle: None,
                    data,
                    pending: false,
                });
            }
            return Err(StreamError::Enumeration {
                path: path.to_path_buf(),
                source: error,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            handle: Some(FindStreamHandle(handle)),
            data,
            pending: true,
        })
    }

    fn current(&self) -> Result<StreamDescriptor, StreamError> {
        // A name that is not valid UTF-16 could not be addressed later.
        let name = decode_wide_name(&self.data.cStreamName).map_err(|e| StreamError::Enumeration {
            path: self.path.clone(),
            source: e,
        })?;
        let size = unsafe { *self.data.StreamSize.QuadPart() };
        Ok(StreamDescriptor::new(name, size))
    }
}

impl Iterator for StreamIter {
    type Item = Result<StreamDescriptor, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.handle.as_ref()?.0;

        if self.pending {
            self.pending = false;
            return Some(self.current());
        }

        let ok = unsafe { FindNextStreamW(handle, &mut self.data as *mut _ as *mut _) };
        if ok != 0 {
            return Some(self.current());
        }

        let error = io::Error::last_os_error();
        // Either way the search is over; drop closes the handle now.
        self.handle = None;
        if error.raw_os_error() == Some(ERROR_HANDLE_EOF as i32) {
            return None;
        }
        Some(Err(StreamError::Enumeration {
            path: self.path.clone(),
            source: error,
        }))
    }
}

pub fn enumerate_streams(path: &Path) -> Result<Vec<StreamDescriptor>, StreamError> {
    let streams = StreamIter::open(path)?.collect::<Result<Vec<_>, _>>()?;
    for stream in &streams {
        log::trace!("  {} ({} bytes)", stream.name, stream.size);
    }
    Ok(streams)
}

/// Walks the stream list of `path` until `full_name` turns up. The search
/// handle is closed before returning.
pub fn find_stream(
    path: &Path,
    full_name: &str,
) -> Result<Option<StreamDescriptor>, StreamError> {
    for stream in StreamIter::open(path)? {
        let stream = stream?;
        if stream.name == full_name {
            return Ok(Some(stream));
        }
    }
    Ok(None)
}
