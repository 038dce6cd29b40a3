//! Process-wide CUDA runtime handle.
//!
//! Nothing is loaded at program start. The runtime library is opened either
//! lazily by the first [`cuda_runtime`] call or explicitly through
//! [`init_cuda_runtime`]; with manual init enabled only the explicit path
//! loads it. [`shutdown_cuda_runtime`] releases the process-wide reference;
//! engines holding their own `Arc` keep the library alive until they drop.

use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{CudaRuntime, RuntimeLoadError};

#[derive(Default)]
struct GlobalRuntime {
    runtime: Option<Arc<CudaRuntime>>,
    manual_init: bool,
}

static CUDA_RUNTIME: Lazy<Mutex<GlobalRuntime>> = Lazy::new(|| Mutex::new(GlobalRuntime::default()));

fn global() -> MutexGuard<'static, GlobalRuntime> {
    CUDA_RUNTIME.lock().unwrap_or_else(PoisonError::into_inner)
}

/// When on, [`cuda_runtime`] no longer loads on first use.
pub fn set_manual_init(manual: bool) {
    global().manual_init = manual;
}

pub fn manual_init() -> bool {
    global().manual_init
}

/// Load the runtime if needed and return it. Idempotent.
pub fn init_cuda_runtime() -> Result<Arc<CudaRuntime>, RuntimeLoadError> {
    let mut state = global();
    if let Some(rt) = &state.runtime {
        return Ok(Arc::clone(rt));
    }

    let rt = Arc::new(CudaRuntime::load()?);
    tracing::debug!("process-wide CUDA runtime initialized");
    state.runtime = Some(Arc::clone(&rt));
    Ok(rt)
}

/// The process-wide runtime, loading it on first use unless manual init is on.
pub fn cuda_runtime() -> Result<Arc<CudaRuntime>, RuntimeLoadError> {
    {
        let state = global();
        if let Some(rt) = &state.runtime {
            return Ok(Arc::clone(rt));
        }
        if state.manual_init {
            return Err(RuntimeLoadError::NotInitialized);
        }
    }
    init_cuda_runtime()
}

pub fn is_initialized() -> bool {
    global().runtime.is_some()
}

/// Drop the process-wide reference. Returns whether one was held.
pub fn shutdown_cuda_runtime() -> bool {
    let released = global().runtime.take().is_some();
    if released {
        tracing::debug!("process-wide CUDA runtime released");
    }
    released
}
