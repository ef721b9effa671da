pub mod find;
pub mod streams;

pub use find::{enumerate_streams, find_stream, StreamIter};
pub use streams::NtfsStreamManager;
