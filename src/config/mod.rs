pub mod transfer_config;

pub use transfer_config::{COPY_IN_DEFAULT_STREAM_ENV, TransferConfig, parse_bool_flag};
