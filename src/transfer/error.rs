use thiserror::Error;

use crate::gpu::runtime::RuntimeError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// A copy or synchronize primitive reported a non-success status.
    #[error("transfer failed: {0}")]
    Runtime(#[from] RuntimeError),
    /// Creating a dedicated copy stream failed during construction.
    #[error("failed to create copy stream: {0}")]
    StreamCreate(RuntimeError),
    #[error("source and destination sizes differ: {src} bytes vs {dst} bytes")]
    SizeMismatch { src: usize, dst: usize },
}

impl TransferError {
    /// The device runtime's own status code, when one caused the failure.
    pub fn code(&self) -> Option<i32> {
        match self {
            TransferError::Runtime(err) | TransferError::StreamCreate(err) => Some(err.code),
            TransferError::SizeMismatch { .. } => None,
        }
    }
}
