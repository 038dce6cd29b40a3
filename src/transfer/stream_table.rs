use super::TransferError;
use crate::config::TransferConfig;
use crate::gpu::runtime::{DeviceRuntime, StreamHandle};

/// What a stream is used for. Doubles as the caller's queue selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamRole {
    #[default]
    Default,
    CopyIn,
    CopyOut,
}

impl StreamRole {
    pub const ALL: [StreamRole; 3] = [StreamRole::Default, StreamRole::CopyIn, StreamRole::CopyOut];

    const fn index(self) -> usize {
        match self {
            StreamRole::Default => 0,
            StreamRole::CopyIn => 1,
            StreamRole::CopyOut => 2,
        }
    }
}

/// Role-to-stream mapping, fixed once built.
///
/// `Default` is always the runtime's default stream. `CopyIn`/`CopyOut`
/// either alias it or are two streams this table created and owns.
#[derive(Debug)]
pub(crate) struct StreamTable {
    streams: [StreamHandle; 3],
    owns_copy_streams: bool,
}

impl StreamTable {
    pub(crate) fn create<R>(runtime: &R, config: &TransferConfig) -> Result<Self, TransferError>
    where
        R: DeviceRuntime + ?Sized,
    {
        let default = runtime.default_stream();

        if config.copy_in_default_stream {
            tracing::debug!("copy streams aliased to the default stream");
            return Ok(Self {
                streams: [default; 3],
                owns_copy_streams: false,
            });
        }

        let copy_in = runtime
            .stream_create_non_blocking()
            .map_err(TransferError::StreamCreate)?;

        let copy_out = match runtime.stream_create_non_blocking() {
            Ok(stream) => stream,
            Err(err) => {
                if let Err(destroy_err) = runtime.stream_destroy(copy_in) {
                    tracing::warn!(
                        stream = ?copy_in,
                        error = %destroy_err,
                        "failed to release copy-in stream after construction error"
                    );
                }
                return Err(TransferError::StreamCreate(err));
            }
        };

        tracing::debug!(?copy_in, ?copy_out, "created dedicated copy streams");

        Ok(Self {
            streams: [default, copy_in, copy_out],
            owns_copy_streams: true,
        })
    }

    pub(crate) fn get(&self, role: StreamRole) -> StreamHandle {
        self.streams[role.index()]
    }

    pub(crate) fn owns_copy_streams(&self) -> bool {
        self.owns_copy_streams
    }

    /// Streams that are synchronized by a full drain: the default stream plus
    /// any owned copy streams.
    pub(crate) fn distinct_streams(&self) -> Vec<StreamHandle> {
        if self.owns_copy_streams {
            self.streams.to_vec()
        } else {
            vec![self.get(StreamRole::Default)]
        }
    }

    /// Destroy owned copy streams. Failures are logged, never returned.
    pub(crate) fn release<R>(&mut self, runtime: &R)
    where
        R: DeviceRuntime + ?Sized,
    {
        if !self.owns_copy_streams {
            return;
        }

        for role in [StreamRole::CopyIn, StreamRole::CopyOut] {
            let stream = self.get(role);
            match runtime.stream_destroy(stream) {
                Ok(()) => tracing::debug!(?role, ?stream, "destroyed copy stream"),
                Err(err) => tracing::warn!(
                    ?role,
                    ?stream,
                    code = err.code,
                    error = %err,
                    "failed to destroy copy stream"
                ),
            }
        }

        let default = self.get(StreamRole::Default);
        self.streams = [default; 3];
        self.owns_copy_streams = false;
    }
}
