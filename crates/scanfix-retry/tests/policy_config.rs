use scanfix_retry::{PolicyError, RetryPolicy, RetryPolicyConfig};
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_policy_from_file() {
    let file = write_config(
        r#"
max_attempts = 5
initial_delay_ms = 250
max_delay_ms = 4000
jitter_ceiling_ms = 0
"#,
    );

    let policy = RetryPolicy::load(file.path()).unwrap();

    assert_eq!(policy.max_attempts(), 5);
    assert_eq!(policy.initial_delay(), Duration::from_millis(250));
    assert_eq!(policy.max_delay(), Duration::from_secs(4));
    assert_eq!(policy.jitter_ceiling(), Duration::ZERO);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = RetryPolicy::load(&path).unwrap_err();

    assert!(matches!(err, PolicyError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_missing_required_key_is_parse_error() {
    let err = RetryPolicy::from_toml_str("max_attempts = 3\n").unwrap_err();
    assert!(matches!(err, PolicyError::Parse(_)));
}

#[test]
fn test_inverted_delays_rejected_from_file() {
    let file = write_config("max_attempts = 3\ninitial_delay_ms = 900\nmax_delay_ms = 100\n");
    let err = RetryPolicy::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        PolicyError::DelayOrder {
            initial_ms: 900,
            max_ms: 100
        }
    ));
}

#[test]
fn test_raw_config_can_be_overridden_before_validation() {
    let mut config = RetryPolicyConfig::from_toml_str(
        "max_attempts = 0\ninitial_delay_ms = 1\nmax_delay_ms = 2\n",
    )
    .unwrap();
    config.max_attempts = 2;

    let policy = RetryPolicy::try_from(config).unwrap();
    assert_eq!(policy.max_attempts(), 2);
}

#[test]
fn test_policy_serializes_as_millisecond_table() {
    let policy = RetryPolicy::new(4, Duration::from_millis(10), Duration::from_millis(80))
        .unwrap()
        .with_jitter_ceiling(Duration::from_millis(5));

    let text = toml::to_string(&policy).unwrap();
    assert!(text.contains("initial_delay_ms = 10"));
    assert_eq!(RetryPolicy::from_toml_str(&text).unwrap(), policy);
}
