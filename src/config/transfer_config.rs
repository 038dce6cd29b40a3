use std::env;

/// Environment variable read by [`TransferConfig::from_env`].
pub const COPY_IN_DEFAULT_STREAM_ENV: &str = "GPU_TRANSFER_COPY_IN_DEFAULT_STREAM";

/// Construction-time policy of the copy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    /// Issue host-boundary copies on the default stream instead of dedicated
    /// copy-in/copy-out streams.
    ///
    /// On (the default), pinned copies serialize with all other default-stream
    /// work. A caching allocator that tracks buffer lifetimes per stream can
    /// then never hand out memory that an in-flight copy is still touching.
    /// Off, copies overlap with compute, but that allocator race is back and
    /// callers must order copy streams against compute themselves.
    pub copy_in_default_stream: bool,
}

impl TransferConfig {
    pub const fn new(copy_in_default_stream: bool) -> Self {
        Self {
            copy_in_default_stream,
        }
    }

    /// Dedicated non-blocking copy streams.
    pub const fn dedicated_streams() -> Self {
        Self::new(false)
    }

    /// Defaults, overridden by `GPU_TRANSFER_COPY_IN_DEFAULT_STREAM` when it
    /// holds a recognised boolean.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var(COPY_IN_DEFAULT_STREAM_ENV) {
            match parse_bool_flag(&value) {
                Some(v) => config.copy_in_default_stream = v,
                None => tracing::warn!(
                    variable = COPY_IN_DEFAULT_STREAM_ENV,
                    value = %value,
                    "ignoring unrecognised boolean"
                ),
            }
        }
        config
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
