//! Cross-device tensor copy engine.
//!
//! Moves raw tensor bytes between pageable host memory, pinned host memory
//! and CUDA device memory. See [`transfer::GpuDataTransfer`] for the entry
//! point and [`gpu::runtime`] for the runtimes it can drive.

pub mod config;
pub mod device;
pub mod gpu;
pub mod tensor;
pub mod transfer;

pub use config::TransferConfig;
pub use device::{DeviceKind, Endpoint, MemType, MemoryLocation};
pub use tensor::{RawBuffer, TensorBuffer};
pub use transfer::{CopyStrategy, GpuDataTransfer, StreamRole, TransferError};
