use serial_test::serial;

use gpu_transfer::config::{COPY_IN_DEFAULT_STREAM_ENV, TransferConfig, parse_bool_flag};

#[test]
fn parse_bool_flag_accepts_common_spellings() {
    for v in ["true", "1", "yes", "on", "TRUE", " On "] {
        assert_eq!(parse_bool_flag(v), Some(true), "{v:?}");
    }
    for v in ["false", "0", "no", "off", "False"] {
        assert_eq!(parse_bool_flag(v), Some(false), "{v:?}");
    }
    for v in ["", "2", "maybe", "enable"] {
        assert_eq!(parse_bool_flag(v), None, "{v:?}");
    }
}

#[test]
fn constructors() {
    assert_eq!(TransferConfig::default(), TransferConfig::new(true));
    assert!(!TransferConfig::dedicated_streams().copy_in_default_stream);
}

#[test]
#[serial]
fn from_env_reads_override() {
    unsafe { std::env::set_var(COPY_IN_DEFAULT_STREAM_ENV, "off") };
    assert!(!TransferConfig::from_env().copy_in_default_stream);

    unsafe { std::env::set_var(COPY_IN_DEFAULT_STREAM_ENV, "yes") };
    assert!(TransferConfig::from_env().copy_in_default_stream);

    unsafe { std::env::remove_var(COPY_IN_DEFAULT_STREAM_ENV) };
}

#[test]
#[serial]
fn from_env_falls_back_to_default() {
    unsafe { std::env::remove_var(COPY_IN_DEFAULT_STREAM_ENV) };
    assert_eq!(TransferConfig::from_env(), TransferConfig::default());

    unsafe { std::env::set_var(COPY_IN_DEFAULT_STREAM_ENV, "sometimes") };
    assert_eq!(TransferConfig::from_env(), TransferConfig::default());

    unsafe { std::env::remove_var(COPY_IN_DEFAULT_STREAM_ENV) };
}
