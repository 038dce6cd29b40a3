use std::ffi::c_void;

use super::RuntimeError;

/// Opaque execution-stream handle.
///
/// The zero handle is the runtime's legacy default stream, which the copy
/// engine never creates or destroys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(usize);

impl StreamHandle {
    pub const DEFAULT: StreamHandle = StreamHandle(0);

    pub fn from_raw(raw: *mut c_void) -> Self {
        StreamHandle(raw as usize)
    }

    pub const fn from_id(id: usize) -> Self {
        StreamHandle(id)
    }

    pub fn as_raw(self) -> *mut c_void {
        self.0 as *mut c_void
    }

    pub const fn id(self) -> usize {
        self.0
    }

    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

/// Copy direction, numbered like `cudaMemcpyKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MemcpyKind {
    HostToHost = 0,
    HostToDevice = 1,
    DeviceToHost = 2,
    DeviceToDevice = 3,
}

/// The device-runtime primitives the copy engine is built on.
///
/// Every status other than success comes back as a [`RuntimeError`] carrying
/// the runtime's own code.
pub trait DeviceRuntime: Send + Sync {
    fn default_stream(&self) -> StreamHandle {
        StreamHandle::DEFAULT
    }

    /// Enqueue a copy on `stream` and return without waiting for it.
    ///
    /// # Safety
    ///
    /// `src` and `dst` must address `bytes` bytes in the memory spaces `kind`
    /// names, and stay valid until `stream` has been synchronized.
    unsafe fn memcpy_async(
        &self,
        dst: *mut u8,
        src: *const u8,
        bytes: usize,
        kind: MemcpyKind,
        stream: StreamHandle,
    ) -> Result<(), RuntimeError>;

    /// Copy and block the calling thread until the transfer has completed.
    ///
    /// # Safety
    ///
    /// `src` and `dst` must address `bytes` bytes in the memory spaces `kind`
    /// names.
    unsafe fn memcpy(
        &self,
        dst: *mut u8,
        src: *const u8,
        bytes: usize,
        kind: MemcpyKind,
    ) -> Result<(), RuntimeError>;

    /// Create a stream that does not synchronize with the default stream.
    fn stream_create_non_blocking(&self) -> Result<StreamHandle, RuntimeError>;

    fn stream_destroy(&self, stream: StreamHandle) -> Result<(), RuntimeError>;

    /// Block until all work previously enqueued on `stream` has completed.
    fn stream_synchronize(&self, stream: StreamHandle) -> Result<(), RuntimeError>;
}
