use serial_test::serial;

use gpu_transfer::gpu::runtime::global::{is_initialized, manual_init};
use gpu_transfer::gpu::runtime::{
    RuntimeLoadError, cuda_runtime, init_cuda_runtime, set_manual_init, shutdown_cuda_runtime,
};

#[test]
#[serial]
fn manual_init_blocks_lazy_loading() {
    shutdown_cuda_runtime();
    set_manual_init(true);
    assert!(manual_init());

    assert_eq!(cuda_runtime().err(), Some(RuntimeLoadError::NotInitialized));
    assert!(!is_initialized());

    set_manual_init(false);
}

#[test]
#[serial]
fn shutdown_without_runtime_is_a_no_op() {
    shutdown_cuda_runtime();
    assert!(!shutdown_cuda_runtime());
    assert!(!is_initialized());
}

#[test]
#[serial]
fn explicit_init_then_shutdown() {
    shutdown_cuda_runtime();
    set_manual_init(true);

    // No CUDA runtime on this host: nothing else to check.
    let rt = match init_cuda_runtime() {
        Ok(rt) => rt,
        Err(_) => {
            set_manual_init(false);
            return;
        }
    };

    assert!(is_initialized());
    let again = cuda_runtime().expect("initialized runtime");
    assert!(std::sync::Arc::ptr_eq(&rt, &again));

    assert!(shutdown_cuda_runtime());
    assert!(!is_initialized());
    assert_eq!(cuda_runtime().err(), Some(RuntimeLoadError::NotInitialized));

    set_manual_init(false);
}
