use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use gpu_transfer::config::TransferConfig;
use gpu_transfer::gpu::runtime::{RuntimeError, SimulatedRuntime};
use gpu_transfer::transfer::GpuDataTransfer;

#[derive(Clone, Default)]
struct WarnCapture(Arc<Mutex<Vec<String>>>);

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for WarnCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0.lock().unwrap().push(visitor.0);
        }
    }
}

#[test]
fn failed_stream_destroy_is_logged_as_warning() {
    let capture = WarnCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let rt = Arc::new(SimulatedRuntime::default());
        let engine = GpuDataTransfer::new(Arc::clone(&rt), TransferConfig::dedicated_streams()).unwrap();
        rt.fail_next_stream_destroy(RuntimeError::new(4, "driver shutting down"));
        drop(engine);
    });

    let warnings = capture.0.lock().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("failed to destroy copy stream"), "{warnings:?}");
}

#[test]
fn clean_drop_logs_no_warning() {
    let capture = WarnCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let rt = Arc::new(SimulatedRuntime::default());
        drop(GpuDataTransfer::new(rt, TransferConfig::dedicated_streams()).unwrap());
    });

    assert!(capture.0.lock().unwrap().is_empty());
}
