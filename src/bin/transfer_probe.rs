use std::sync::Arc;
use std::time::Instant;

use gpu_transfer::config::TransferConfig;
use gpu_transfer::gpu::runtime::{CudaBuffer, CudaRuntime, cuda_runtime};
use gpu_transfer::tensor::RawBuffer;
use gpu_transfer::transfer::{GpuDataTransfer, StreamRole, TransferError};

const ITERATIONS: usize = 20;

fn pageable_round_trip(
    engine: &GpuDataTransfer<CudaRuntime>,
    device: &mut CudaBuffer,
    size: usize,
) -> Result<f64, TransferError> {
    let mut host: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    let mut back = vec![0u8; size];

    let t0 = Instant::now();
    for _ in 0..ITERATIONS {
        engine.copy_tensor_blocking(&RawBuffer::host(&mut host), &mut *device, StreamRole::CopyIn)?;
        engine.copy_tensor_blocking(&*device, &mut RawBuffer::host(&mut back), StreamRole::CopyOut)?;
    }
    let dt = t0.elapsed().as_secs_f64();

    if back != host {
        eprintln!("[PROBE] pageable round trip mismatch at {} bytes", size);
    }
    Ok(dt)
}

fn pinned_round_trip(
    engine: &GpuDataTransfer<CudaRuntime>,
    rt: &Arc<CudaRuntime>,
    device: &mut CudaBuffer,
    size: usize,
) -> Result<f64, TransferError> {
    let mut pinned_in = CudaBuffer::pinned(rt, size)?;
    let mut pinned_out = CudaBuffer::pinned(rt, size)?;
    if let Some(bytes) = pinned_in.host_bytes_mut() {
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
    }

    let t0 = Instant::now();
    for _ in 0..ITERATIONS {
        engine.copy_tensor_blocking(&pinned_in, &mut *device, StreamRole::CopyIn)?;
        engine.copy_tensor_blocking(&*device, &mut pinned_out, StreamRole::CopyOut)?;
    }
    let dt = t0.elapsed().as_secs_f64();

    if pinned_in.host_bytes() != pinned_out.host_bytes() {
        eprintln!("[PROBE] pinned round trip mismatch at {} bytes", size);
    }
    Ok(dt)
}

fn gib_per_s(size: usize, secs: f64) -> f64 {
    let moved = (size * ITERATIONS * 2) as f64;
    moved / secs / (1u64 << 30) as f64
}

fn run(rt: Arc<CudaRuntime>) -> Result<(), TransferError> {
    let sizes: [usize; 3] = [4096, 1 << 20, 16 << 20];

    for config in [TransferConfig::new(true), TransferConfig::dedicated_streams()] {
        let engine = GpuDataTransfer::new(Arc::clone(&rt), config)?;
        println!(
            "[PROBE] copy_in_default_stream={} owns_copy_streams={}",
            config.copy_in_default_stream,
            engine.owns_copy_streams()
        );

        for size in sizes {
            let mut device = CudaBuffer::device(&rt, size)?;

            let pageable = pageable_round_trip(&engine, &mut device, size)?;
            let pinned = pinned_round_trip(&engine, &rt, &mut device, size)?;

            println!(
                "[PROBE] size={} bytes pageable {:.2} GiB/s | pinned {:.2} GiB/s",
                size,
                gib_per_s(size, pageable),
                gib_per_s(size, pinned)
            );
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    let rt = match cuda_runtime() {
        Ok(rt) => rt,
        Err(err) => {
            println!("[PROBE] CUDA runtime unavailable: {}", err);
            return;
        }
    };

    match rt.device_count() {
        Ok(n) if n > 0 => println!("[PROBE] {} CUDA device(s) visible", n),
        Ok(_) => {
            println!("[PROBE] no CUDA devices visible");
            return;
        }
        Err(err) => {
            println!("[PROBE] device query failed: {}", err);
            return;
        }
    }

    if let Err(err) = run(rt) {
        eprintln!("[PROBE] transfer failed: {}", err);
        std::process::exit(1);
    }
}
