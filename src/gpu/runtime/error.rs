use thiserror::Error;

/// `cudaErrorInvalidValue`
pub const CUDA_ERROR_INVALID_VALUE: i32 = 1;
/// `cudaErrorInvalidDevice`
pub const CUDA_ERROR_INVALID_DEVICE: i32 = 101;
/// `cudaErrorInvalidResourceHandle`
pub const CUDA_ERROR_INVALID_RESOURCE_HANDLE: i32 = 400;

/// Non-success status reported by a device-runtime primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("CUDA error {code}: {message}")]
pub struct RuntimeError {
    pub code: i32,
    pub message: String,
}

impl RuntimeError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failure to bring up the dynamically loaded CUDA runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeLoadError {
    #[error("CUDA runtime library not found (tried: {0})")]
    LibraryNotFound(String),
    #[error("CUDA runtime symbol missing: {0}")]
    MissingSymbol(String),
    #[error("CUDA runtime not initialized (manual init mode is on)")]
    NotInitialized,
}
