use fabula::{ConfigOverrides, ContextMode, FabulaConfig, FabulaErrorKind};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("fabula.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

const DESERT: &str = r#"
api_key = "test-key"
keywords = "desert, exile, prophecy"
chapter_count = 3
"#;

#[test]
fn test_minimal_file_gets_defaults() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = FabulaConfig::from_file(write_config(&dir, DESERT))?;

    assert_eq!(config.keywords(), "desert, exile, prophecy");
    assert_eq!(*config.chapter_count(), 3);
    assert_eq!(config.model(), "gemini-2.0-flash");
    assert_eq!(config.output_dir(), &PathBuf::from("./book"));
    assert_eq!(*config.context_mode(), ContextMode::Summary);
    assert_eq!(*config.max_iterations(), None);

    let policy = config.retry_policy();
    assert_eq!(policy.max_attempts, 6);
    assert_eq!(policy.initial_delay, Duration::from_millis(1000));
    assert!(policy.fatal_statuses.is_empty());

    config.validate()?;
    Ok(())
}

#[test]
fn test_nested_retry_table_and_context_mode() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
api_key = "test-key"
keywords = "sea"
chapter_count = 12
context_mode = "full"
max_iterations = 400

[retry]
max_attempts = 3
initial_delay_ms = 250
fatal_statuses = [401, 403]
"#,
    );
    let config = FabulaConfig::from_file(path)?;

    assert_eq!(*config.context_mode(), ContextMode::Full);
    assert_eq!(*config.max_iterations(), Some(400));
    let policy = config.retry_policy();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.initial_delay, Duration::from_millis(250));
    assert!(policy.is_fatal_status(401));
    assert!(!policy.is_fatal_status(429));
    Ok(())
}

#[test]
fn test_missing_api_key_is_config_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = FabulaConfig::from_file(write_config(
        &dir,
        "keywords = \"desert\"\nchapter_count = 3\n",
    ))?;

    let err = config.validate().unwrap_err();
    assert!(err.message.contains("API key"));
    Ok(())
}

#[test]
fn test_api_key_fallback_only_fills_blank_key() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "keywords = \"desert\"\nchapter_count = 3\n");

    let config = FabulaConfig::from_file(&path)?.with_api_key_fallback(Some("env-key".into()));
    assert_eq!(config.api_key(), "env-key");
    config.validate()?;

    let config =
        FabulaConfig::from_file(write_config(&dir, DESERT))?.with_api_key_fallback(Some("env-key".into()));
    assert_eq!(config.api_key(), "test-key");
    Ok(())
}

#[test]
fn test_invalid_values_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let base = FabulaConfig::from_file(write_config(&dir, DESERT))?;

    let cases = [
        ConfigOverrides {
            keywords: Some("   ".to_string()),
            ..Default::default()
        },
        ConfigOverrides {
            chapter_count: Some(0),
            ..Default::default()
        },
        ConfigOverrides {
            max_iterations: Some(0),
            ..Default::default()
        },
    ];
    for overrides in cases {
        let config = base.clone().apply(overrides.clone());
        assert!(config.validate().is_err(), "accepted {:?}", overrides);
    }

    let zero_attempts = write_config(
        &dir,
        &format!("{}\n[retry]\nmax_attempts = 0\n", DESERT),
    );
    assert!(FabulaConfig::from_file(zero_attempts)?.validate().is_err());
    Ok(())
}

#[test]
fn test_overrides_win_over_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = FabulaConfig::from_file(write_config(&dir, DESERT))?.apply(ConfigOverrides {
        keywords: Some("ice, betrayal".to_string()),
        chapter_count: Some(5),
        output_dir: Some(PathBuf::from("/tmp/ice")),
        context_mode: Some(ContextMode::Full),
        ..Default::default()
    });

    assert_eq!(config.keywords(), "ice, betrayal");
    assert_eq!(*config.chapter_count(), 5);
    assert_eq!(config.output_dir(), &PathBuf::from("/tmp/ice"));
    assert_eq!(config.model(), "gemini-2.0-flash");

    let settings = config.pipeline_settings()?;
    assert_eq!(*settings.chapter_count(), 5);
    assert_eq!(*settings.context_mode(), ContextMode::Full);
    Ok(())
}

#[test]
fn test_missing_file_is_config_error() {
    let err = FabulaConfig::from_file("/nonexistent/fabula.toml").unwrap_err();
    assert!(matches!(err.kind(), FabulaErrorKind::Config(_)));
}
