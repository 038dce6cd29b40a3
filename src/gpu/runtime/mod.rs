pub mod context;
pub mod cuda_buffer;
pub mod device_runtime;
pub mod error;
pub mod global;
pub mod simulated;

pub use context::{CUDART_PATH_ENV, CudaRuntime};
pub use cuda_buffer::CudaBuffer;
pub use device_runtime::{DeviceRuntime, MemcpyKind, StreamHandle};
pub use error::{RuntimeError, RuntimeLoadError};
pub use global::{cuda_runtime, init_cuda_runtime, set_manual_init, shutdown_cuda_runtime};
pub use simulated::{RuntimeCall, SimulatedBuffer, SimulatedRuntime};
