use libloading::{Library, Symbol};
use std::env;
use std::ffi::{CStr, c_char, c_void};
use std::ptr;

use super::{DeviceRuntime, MemcpyKind, RuntimeError, RuntimeLoadError, StreamHandle};

type CudaStream = *mut c_void;

type MemcpyFn = unsafe extern "C" fn(*mut c_void, *const c_void, usize, i32) -> i32;
type MemcpyAsyncFn = unsafe extern "C" fn(*mut c_void, *const c_void, usize, i32, CudaStream) -> i32;
type StreamCreateWithFlagsFn = unsafe extern "C" fn(*mut CudaStream, u32) -> i32;
type StreamFn = unsafe extern "C" fn(CudaStream) -> i32;
type GetErrorStringFn = unsafe extern "C" fn(i32) -> *const c_char;
type MallocFn = unsafe extern "C" fn(*mut *mut c_void, usize) -> i32;
type FreeFn = unsafe extern "C" fn(*mut c_void) -> i32;
type GetIntFn = unsafe extern "C" fn(*mut i32) -> i32;

/// `cudaStreamNonBlocking`
const CUDA_STREAM_NON_BLOCKING: u32 = 0x01;

/// Environment override for the runtime library path.
pub const CUDART_PATH_ENV: &str = "GPU_TRANSFER_CUDART";

#[cfg(windows)]
const CUDART_CANDIDATES: &[&str] = &["cudart64_12.dll", "cudart64_110.dll", "cudart64_101.dll"];

#[cfg(not(windows))]
const CUDART_CANDIDATES: &[&str] = &["libcudart.so", "libcudart.so.12", "libcudart.so.11.0"];

struct CudartApi {
    memcpy: MemcpyFn,
    memcpy_async: MemcpyAsyncFn,
    stream_create_with_flags: StreamCreateWithFlagsFn,
    stream_destroy: StreamFn,
    stream_synchronize: StreamFn,
    get_error_string: GetErrorStringFn,
    malloc: MallocFn,
    free: FreeFn,
    malloc_host: MallocFn,
    free_host: FreeFn,
    get_device: GetIntFn,
    get_device_count: GetIntFn,
}

/// The CUDA runtime (`cudart`), loaded at run time.
///
/// Function pointers are resolved once in [`CudaRuntime::load`]; the library
/// handle is kept alive for as long as this value exists.
pub struct CudaRuntime {
    api: CudartApi,
    _library: Library,
}

impl CudaRuntime {
    pub fn load() -> Result<Self, RuntimeLoadError> {
        let library = open_cudart()?;

        unsafe {
            let api = CudartApi {
                memcpy: symbol(&library, b"cudaMemcpy\0")?,
                memcpy_async: symbol(&library, b"cudaMemcpyAsync\0")?,
                stream_create_with_flags: symbol(&library, b"cudaStreamCreateWithFlags\0")?,
                stream_destroy: symbol(&library, b"cudaStreamDestroy\0")?,
                stream_synchronize: symbol(&library, b"cudaStreamSynchronize\0")?,
                get_error_string: symbol(&library, b"cudaGetErrorString\0")?,
                malloc: symbol(&library, b"cudaMalloc\0")?,
                free: symbol(&library, b"cudaFree\0")?,
                malloc_host: symbol(&library, b"cudaMallocHost\0")?,
                free_host: symbol(&library, b"cudaFreeHost\0")?,
                get_device: symbol(&library, b"cudaGetDevice\0")?,
                get_device_count: symbol(&library, b"cudaGetDeviceCount\0")?,
            };

            tracing::debug!("CUDA runtime symbols resolved");

            Ok(Self {
                api,
                _library: library,
            })
        }
    }

    fn error_string(&self, code: i32) -> String {
        unsafe {
            let msg = (self.api.get_error_string)(code);
            if msg.is_null() {
                return String::from("unknown CUDA error");
            }
            CStr::from_ptr(msg).to_string_lossy().into_owned()
        }
    }

    fn check(&self, code: i32) -> Result<(), RuntimeError> {
        if code == 0 {
            Ok(())
        } else {
            Err(RuntimeError::new(code, self.error_string(code)))
        }
    }

    pub fn device_count(&self) -> Result<usize, RuntimeError> {
        let mut count = 0i32;
        self.check(unsafe { (self.api.get_device_count)(&mut count) })?;
        Ok(count.max(0) as usize)
    }

    /// Index of the device the calling thread currently targets.
    pub fn current_device(&self) -> Result<i16, RuntimeError> {
        let mut device = 0i32;
        self.check(unsafe { (self.api.get_device)(&mut device) })?;
        Ok(device as i16)
    }

    pub(crate) fn malloc_device(&self, bytes: usize) -> Result<*mut u8, RuntimeError> {
        let mut ptr: *mut c_void = ptr::null_mut();
        self.check(unsafe { (self.api.malloc)(&mut ptr, bytes) })?;
        Ok(ptr as *mut u8)
    }

    pub(crate) fn malloc_pinned(&self, bytes: usize) -> Result<*mut u8, RuntimeError> {
        let mut ptr: *mut c_void = ptr::null_mut();
        self.check(unsafe { (self.api.malloc_host)(&mut ptr, bytes) })?;
        Ok(ptr as *mut u8)
    }

    /// # Safety
    ///
    /// `ptr` must come from [`CudaRuntime::malloc_device`] and not be used
    /// afterwards.
    pub(crate) unsafe fn free_device(&self, ptr: *mut u8) -> Result<(), RuntimeError> {
        self.check(unsafe { (self.api.free)(ptr as *mut c_void) })
    }

    /// # Safety
    ///
    /// `ptr` must come from [`CudaRuntime::malloc_pinned`] and not be used
    /// afterwards.
    pub(crate) unsafe fn free_pinned(&self, ptr: *mut u8) -> Result<(), RuntimeError> {
        self.check(unsafe { (self.api.free_host)(ptr as *mut c_void) })
    }
}

impl DeviceRuntime for CudaRuntime {
    unsafe fn memcpy_async(
        &self,
        dst: *mut u8,
        src: *const u8,
        bytes: usize,
        kind: MemcpyKind,
        stream: StreamHandle,
    ) -> Result<(), RuntimeError> {
        let res = unsafe {
            (self.api.memcpy_async)(
                dst as *mut c_void,
                src as *const c_void,
                bytes,
                kind as i32,
                stream.as_raw(),
            )
        };
        self.check(res)
    }

    unsafe fn memcpy(
        &self,
        dst: *mut u8,
        src: *const u8,
        bytes: usize,
        kind: MemcpyKind,
    ) -> Result<(), RuntimeError> {
        let res = unsafe {
            (self.api.memcpy)(dst as *mut c_void, src as *const c_void, bytes, kind as i32)
        };
        self.check(res)
    }

    fn stream_create_non_blocking(&self) -> Result<StreamHandle, RuntimeError> {
        let mut stream: CudaStream = ptr::null_mut();
        let res = unsafe { (self.api.stream_create_with_flags)(&mut stream, CUDA_STREAM_NON_BLOCKING) };
        self.check(res)?;
        Ok(StreamHandle::from_raw(stream))
    }

    fn stream_destroy(&self, stream: StreamHandle) -> Result<(), RuntimeError> {
        self.check(unsafe { (self.api.stream_destroy)(stream.as_raw()) })
    }

    fn stream_synchronize(&self, stream: StreamHandle) -> Result<(), RuntimeError> {
        self.check(unsafe { (self.api.stream_synchronize)(stream.as_raw()) })
    }
}

fn open_cudart() -> Result<Library, RuntimeLoadError> {
    let mut tried = Vec::new();

    let override_path = env::var(CUDART_PATH_ENV).ok().filter(|p| !p.is_empty());
    let candidates = override_path
        .iter()
        .map(String::as_str)
        .chain(CUDART_CANDIDATES.iter().copied());

    for name in candidates {
        match unsafe { Library::new(name) } {
            Ok(library) => {
                tracing::debug!(library = name, "CUDA runtime loaded");
                return Ok(library);
            }
            Err(_) => tried.push(name.to_string()),
        }
    }

    Err(RuntimeLoadError::LibraryNotFound(tried.join(", ")))
}

unsafe fn symbol<T: Copy>(library: &Library, name: &[u8]) -> Result<T, RuntimeLoadError> {
    unsafe {
        let sym: Symbol<'_, T> = library.get(name).map_err(|_| {
            let trimmed = name.strip_suffix(b"\0").unwrap_or(name);
            RuntimeLoadError::MissingSymbol(String::from_utf8_lossy(trimmed).into())
        })?;
        Ok(*sym)
    }
}
