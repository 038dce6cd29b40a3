//! The buffer contract the copy engine consumes.

pub mod buffer;
pub mod raw_buffer;

pub use buffer::TensorBuffer;
pub use raw_buffer::RawBuffer;
