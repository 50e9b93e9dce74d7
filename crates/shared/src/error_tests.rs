use super::*;

#[test]
fn test_bootstrap_error_codes() {
    let err = BootstrapError::Config(config::ConfigError::NotFound("store".into()));
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert_eq!(
        BootstrapError::Tracing("already set".into()).error_code(),
        "TRACING_ERROR"
    );
}

#[test]
fn test_bootstrap_error_display() {
    assert_eq!(
        BootstrapError::Tracing("already set".into()).to_string(),
        "Tracing setup error: already set"
    );
    let err = BootstrapError::Config(config::ConfigError::Message("bad value".into()));
    assert_eq!(err.to_string(), "Configuration error: bad value");
}
