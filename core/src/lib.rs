pub mod copy;
pub mod error;
pub mod manager;
pub mod stream;
pub mod test_utils;

pub use copy::{copy_chunked, CopyFailure, CopyOptions, DEFAULT_CHUNK_SIZE};
pub use error::StreamError;
pub use manager::StreamManager;
pub use stream::{
    addresses_stream, decode_wide_name, locate, stream_path, StreamDescriptor, StreamName,
    DATA_TYPE, DEFAULT_STREAM,
};
